// ABOUTME: Raw pose-source frames and canonical unit-space skeleton frames
// ABOUTME: Includes the coordinate convention declared by a source and frame skip reasons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::joint::Joint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coordinate convention declared by a pose source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Coordinates are already fractions of the image (0.0 - 1.0)
    #[default]
    Unit,
    /// Coordinates are pixels of an image with the given dimensions
    Pixel {
        /// Image width in pixels
        width: f64,
        /// Image height in pixels
        height: f64,
    },
}

/// One joint exactly as a pose source reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKeypoint {
    /// Joint name in the source's own spelling
    pub name: String,
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (grows downwards)
    pub y: f64,
    /// Depth, when the source estimates one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Source confidence for this joint
    #[serde(default)]
    pub confidence: f64,
}

/// A frame as produced by an external pose-estimation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoseFrame {
    /// Source identifier (`primary`, `secondary`, ...)
    #[serde(default = "default_source")]
    pub source: String,
    /// Capture timestamp in milliseconds since session start
    pub timestamp_ms: u64,
    /// Reported joints
    pub keypoints: Vec<RawKeypoint>,
    /// Coordinate convention of `keypoints`
    #[serde(default)]
    pub coordinates: CoordinateSpace,
}

fn default_source() -> String {
    crate::constants::sources::PRIMARY.to_owned()
}

/// A position in normalized unit space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal, 0.0 (left edge) to 1.0 (right edge)
    pub x: f64,
    /// Vertical, 0.0 (top) to 1.0 (bottom)
    pub y: f64,
    /// Relative depth when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Position {
    /// Planar position without depth
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Euclidean distance, using depth only when both positions carry it
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => a - b,
            _ => 0.0,
        };
        dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt()
    }

    /// Midpoint between two positions
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: f64::midpoint(self.x, other.x),
            y: f64::midpoint(self.y, other.y),
            z: match (self.z, other.z) {
                (Some(a), Some(b)) => Some(f64::midpoint(a, b)),
                _ => None,
            },
        }
    }
}

/// A joint position with the confidence the engine assigns to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Position in unit space
    pub position: Position,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Keypoint {
    /// Planar keypoint
    #[must_use]
    pub const fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            position: Position::new(x, y),
            confidence,
        }
    }
}

/// Canonical skeleton for one timestamp
///
/// Produced by the normalizer (one source) or the fuser (several sources);
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFrame {
    /// Source identifier, `ensemble` for fused frames
    pub source: String,
    /// Frame timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Joints present in this frame
    pub joints: BTreeMap<Joint, Keypoint>,
    /// Joints whose sources disagreed beyond tolerance during fusion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub low_consensus: Vec<Joint>,
    /// Number of pose sources that contributed to this frame
    pub source_count: usize,
    /// Joints reported by two or more sources (fusion only)
    #[serde(default)]
    pub shared_joints: usize,
}

impl SkeletonFrame {
    /// Empty single-source frame
    #[must_use]
    pub fn new(source: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            source: source.into(),
            timestamp_ms,
            joints: BTreeMap::new(),
            low_consensus: Vec::new(),
            source_count: 1,
            shared_joints: 0,
        }
    }

    /// Builder-style joint insertion
    #[must_use]
    pub fn with_joint(mut self, joint: Joint, keypoint: Keypoint) -> Self {
        self.joints.insert(joint, keypoint);
        self
    }

    /// Keypoint for `joint`, regardless of confidence
    #[must_use]
    pub fn joint(&self, joint: Joint) -> Option<&Keypoint> {
        self.joints.get(&joint)
    }

    /// Keypoint for `joint` if its confidence reaches `min_confidence`
    #[must_use]
    pub fn confident(&self, joint: Joint, min_confidence: f64) -> Option<&Keypoint> {
        self.joints
            .get(&joint)
            .filter(|keypoint| keypoint.confidence >= min_confidence)
    }

    /// Fraction of shared joints whose sources agreed, `None` for single-source frames
    #[must_use]
    pub fn consensus_rate(&self) -> Option<f64> {
        if self.source_count < 2 || self.shared_joints == 0 {
            return None;
        }
        let agreed = self.shared_joints.saturating_sub(self.low_consensus.len());
        #[allow(clippy::cast_precision_loss)]
        Some(agreed as f64 / self.shared_joints as f64)
    }
}

/// Why a raw frame did not become a skeleton frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The source reported no usable joints at all
    NoKeypoints,
    /// Pixel coordinates were declared with a zero or non-finite image size
    InvalidDimensions,
    /// None of the exercise's required joint groups was fully visible
    MissingRequiredJoints {
        /// Joints of the closest group that were missing or low confidence
        missing: Vec<Joint>,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoKeypoints => f.write_str("no keypoints"),
            Self::InvalidDimensions => f.write_str("invalid image dimensions"),
            Self::MissingRequiredJoints { missing } => {
                let names: Vec<&str> = missing.iter().map(|joint| joint.name()).collect();
                write!(f, "missing required joints: {}", names.join(", "))
            }
        }
    }
}
