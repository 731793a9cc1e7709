// ABOUTME: Keypoint normalizer turning raw pose-source output into unit-space skeleton frames
// ABOUTME: Rescales pixel coordinates, drops out-of-frame joints, and skips unusable frames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::{AnalysisConfig, ExerciseProfile};
use pierre_movement_core::models::{
    CoordinateSpace, Joint, Keypoint, Position, RawPoseFrame, SkeletonFrame, SkipReason,
};
use std::collections::btree_map::Entry;
use tracing::{debug, trace};

/// Result of normalizing one raw frame
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    /// A canonical skeleton frame
    Frame(SkeletonFrame),
    /// The frame cannot be analyzed
    Skipped(SkipReason),
}

impl NormalizeOutcome {
    /// The frame, if one was produced
    #[must_use]
    pub fn frame(self) -> Option<SkeletonFrame> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::Skipped(_) => None,
        }
    }
}

/// Validates raw keypoints and rescales them into unit space
#[derive(Debug, Clone)]
pub struct KeypointNormalizer {
    min_joint_confidence: f64,
    coordinate_tolerance: f64,
    required_joints: Vec<Vec<Joint>>,
}

impl KeypointNormalizer {
    /// Normalizer for the active exercise
    #[must_use]
    pub fn new(config: &AnalysisConfig, profile: &ExerciseProfile) -> Self {
        Self {
            min_joint_confidence: config.normalizer.min_joint_confidence,
            coordinate_tolerance: config.normalizer.coordinate_tolerance,
            required_joints: profile.required_joints.clone(),
        }
    }

    /// Rescale, validate, and check the exercise's required joints
    #[must_use]
    pub fn normalize(&self, raw: &RawPoseFrame) -> NormalizeOutcome {
        match self.rescale(raw) {
            NormalizeOutcome::Frame(frame) => match self.check_required(&frame) {
                Some(reason) => NormalizeOutcome::Skipped(reason),
                None => NormalizeOutcome::Frame(frame),
            },
            skipped @ NormalizeOutcome::Skipped(_) => skipped,
        }
    }

    /// Rescale and validate without the required-joint check
    ///
    /// Used per source before fusion: a joint one source misses may be
    /// supplied by another.
    #[must_use]
    pub fn rescale(&self, raw: &RawPoseFrame) -> NormalizeOutcome {
        let (width, height) = match raw.coordinates {
            CoordinateSpace::Unit => (1.0, 1.0),
            CoordinateSpace::Pixel { width, height } => {
                if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                    debug!(source = %raw.source, width, height, "Skipping frame with invalid image size");
                    return NormalizeOutcome::Skipped(SkipReason::InvalidDimensions);
                }
                (width, height)
            }
        };

        let mut frame = SkeletonFrame::new(raw.source.clone(), raw.timestamp_ms);
        for keypoint in &raw.keypoints {
            let Some(joint) = Joint::from_name(&keypoint.name) else {
                trace!(name = %keypoint.name, "Ignoring unknown joint name");
                continue;
            };
            let (Some(x), Some(y)) = (
                self.unit_coordinate(keypoint.x / width),
                self.unit_coordinate(keypoint.y / height),
            ) else {
                trace!(%joint, x = keypoint.x, y = keypoint.y, "Dropping out-of-frame joint");
                continue;
            };
            let confidence = if keypoint.confidence.is_finite() {
                keypoint.confidence.clamp(0.0, 1.0)
            } else {
                0.0
            };
            let normalized = Keypoint {
                position: Position {
                    x,
                    y,
                    z: keypoint.z.filter(|z| z.is_finite()),
                },
                confidence,
            };

            match frame.joints.entry(joint) {
                Entry::Vacant(slot) => {
                    slot.insert(normalized);
                }
                Entry::Occupied(mut slot) => {
                    if normalized.confidence > slot.get().confidence {
                        slot.insert(normalized);
                    }
                }
            }
        }

        if frame.joints.is_empty() {
            return NormalizeOutcome::Skipped(SkipReason::NoKeypoints);
        }
        NormalizeOutcome::Frame(frame)
    }

    /// Why `frame` lacks the exercise's required joints, `None` if it has them
    #[must_use]
    pub fn check_required(&self, frame: &SkeletonFrame) -> Option<SkipReason> {
        if self.required_joints.is_empty() {
            return None;
        }

        let mut closest: Option<Vec<Joint>> = None;
        for group in &self.required_joints {
            let missing: Vec<Joint> = group
                .iter()
                .copied()
                .filter(|joint| frame.confident(*joint, self.min_joint_confidence).is_none())
                .collect();
            if missing.is_empty() {
                return None;
            }
            if closest.as_ref().map_or(true, |best| missing.len() < best.len()) {
                closest = Some(missing);
            }
        }

        Some(SkipReason::MissingRequiredJoints {
            missing: closest.unwrap_or_default(),
        })
    }

    fn unit_coordinate(&self, value: f64) -> Option<f64> {
        let tolerance = self.coordinate_tolerance;
        (value.is_finite() && value >= -tolerance && value <= 1.0 + tolerance)
            .then(|| value.clamp(0.0, 1.0))
    }
}
