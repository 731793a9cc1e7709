// ABOUTME: Enumerated body joints with canonical names, aliases, and left/right mirroring
// ABOUTME: Covers the COCO-17 set plus the heel and foot landmarks of richer pose models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Anatomical landmark identifier
///
/// Serialized in `SCREAMING_SNAKE_CASE` (`LEFT_KNEE`), the convention used by
/// the pose sources feeding the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Joint {
    /// Nose tip
    Nose,
    /// Left eye
    LeftEye,
    /// Right eye
    RightEye,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
    /// Left heel
    LeftHeel,
    /// Right heel
    RightHeel,
    /// Left foot index (toe tip)
    LeftFootIndex,
    /// Right foot index (toe tip)
    RightFootIndex,
}

impl Joint {
    /// Number of joints known to the engine
    pub const COUNT: usize = 21;

    /// Every joint, in declaration order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Joints that carry the body's mass (shoulders to ankles)
    ///
    /// Used for the overall coverage confidence of a frame; face and foot
    /// landmarks are too often occluded to be a fair signal.
    pub const TORSO_AND_LIMBS: [Self; 12] = [
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Canonical `SCREAMING_SNAKE_CASE` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "NOSE",
            Self::LeftEye => "LEFT_EYE",
            Self::RightEye => "RIGHT_EYE",
            Self::LeftEar => "LEFT_EAR",
            Self::RightEar => "RIGHT_EAR",
            Self::LeftShoulder => "LEFT_SHOULDER",
            Self::RightShoulder => "RIGHT_SHOULDER",
            Self::LeftElbow => "LEFT_ELBOW",
            Self::RightElbow => "RIGHT_ELBOW",
            Self::LeftWrist => "LEFT_WRIST",
            Self::RightWrist => "RIGHT_WRIST",
            Self::LeftHip => "LEFT_HIP",
            Self::RightHip => "RIGHT_HIP",
            Self::LeftKnee => "LEFT_KNEE",
            Self::RightKnee => "RIGHT_KNEE",
            Self::LeftAnkle => "LEFT_ANKLE",
            Self::RightAnkle => "RIGHT_ANKLE",
            Self::LeftHeel => "LEFT_HEEL",
            Self::RightHeel => "RIGHT_HEEL",
            Self::LeftFootIndex => "LEFT_FOOT_INDEX",
            Self::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }

    /// Parse a joint name as reported by a pose source
    ///
    /// Accepts `LEFT_KNEE`, `left_knee`, `left-knee` and `left knee`, plus the
    /// `*_toe` alias some models use for the foot index.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let canonical: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        match canonical.as_str() {
            "LEFT_TOE" => return Some(Self::LeftFootIndex),
            "RIGHT_TOE" => return Some(Self::RightFootIndex),
            _ => {}
        }

        Self::ALL.into_iter().find(|joint| joint.name() == canonical)
    }

    /// The same landmark on the other side of the body, `None` for the nose
    #[must_use]
    pub const fn mirror(self) -> Option<Self> {
        Some(match self {
            Self::Nose => return None,
            Self::LeftEye => Self::RightEye,
            Self::RightEye => Self::LeftEye,
            Self::LeftEar => Self::RightEar,
            Self::RightEar => Self::LeftEar,
            Self::LeftShoulder => Self::RightShoulder,
            Self::RightShoulder => Self::LeftShoulder,
            Self::LeftElbow => Self::RightElbow,
            Self::RightElbow => Self::LeftElbow,
            Self::LeftWrist => Self::RightWrist,
            Self::RightWrist => Self::LeftWrist,
            Self::LeftHip => Self::RightHip,
            Self::RightHip => Self::LeftHip,
            Self::LeftKnee => Self::RightKnee,
            Self::RightKnee => Self::LeftKnee,
            Self::LeftAnkle => Self::RightAnkle,
            Self::RightAnkle => Self::LeftAnkle,
            Self::LeftHeel => Self::RightHeel,
            Self::RightHeel => Self::LeftHeel,
            Self::LeftFootIndex => Self::RightFootIndex,
            Self::RightFootIndex => Self::LeftFootIndex,
        })
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_accepts_source_spellings() {
        assert_eq!(Joint::from_name("LEFT_KNEE"), Some(Joint::LeftKnee));
        assert_eq!(Joint::from_name("left_knee"), Some(Joint::LeftKnee));
        assert_eq!(Joint::from_name("right-shoulder"), Some(Joint::RightShoulder));
        assert_eq!(Joint::from_name("left toe"), Some(Joint::LeftFootIndex));
        assert_eq!(Joint::from_name("tail"), None);
    }

    #[test]
    fn test_mirror_is_an_involution() {
        for joint in Joint::ALL {
            if let Some(mirrored) = joint.mirror() {
                assert_eq!(mirrored.mirror(), Some(joint));
                assert_ne!(mirrored, joint);
            }
        }
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Joint::RightFootIndex).unwrap();
        assert_eq!(json, "\"RIGHT_FOOT_INDEX\"");
    }
}
