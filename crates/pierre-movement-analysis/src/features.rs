// ABOUTME: Feature extraction from skeleton frames: joint angles, trunk lean, symmetry, motion energy
// ABOUTME: Pure function of the current and previous frame, absent joints null only their features
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Feature Extraction
//!
//! Angles use the three-point formula at the middle joint: the absolute
//! difference of the two arm directions' `atan2`, folded into [0°, 180°].
//! Each feature's confidence is the minimum confidence of the joints it used.
//! A joint that is missing or below the confidence threshold nulls the
//! features that depend on it and nothing else.

use crate::config::AnalysisConfig;
use pierre_movement_core::models::{
    Feature, FeatureValue, FeatureVector, Joint, Keypoint, Position, SkeletonFrame,
};

const DEGENERATE_LENGTH: f64 = 1e-9;

/// Joint triplet (first, vertex, last) behind a single-side angle feature
#[must_use]
pub const fn angle_triplet(feature: Feature) -> Option<[Joint; 3]> {
    use Joint::{
        LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightElbow,
        RightHip, RightKnee, RightShoulder, RightWrist,
    };
    Some(match feature {
        Feature::LeftKneeAngle => [LeftHip, LeftKnee, LeftAnkle],
        Feature::RightKneeAngle => [RightHip, RightKnee, RightAnkle],
        Feature::LeftHipAngle => [LeftShoulder, LeftHip, LeftKnee],
        Feature::RightHipAngle => [RightShoulder, RightHip, RightKnee],
        Feature::LeftElbowAngle => [LeftShoulder, LeftElbow, LeftWrist],
        Feature::RightElbowAngle => [RightShoulder, RightElbow, RightWrist],
        Feature::LeftShoulderAngle => [LeftElbow, LeftShoulder, LeftHip],
        Feature::RightShoulderAngle => [RightElbow, RightShoulder, RightHip],
        _ => return None,
    })
}

/// Joint groups that make `feature` computable; any one complete group suffices
#[must_use]
pub fn required_groups(feature: Feature) -> Vec<Vec<Joint>> {
    if let Some(triplet) = angle_triplet(feature) {
        return vec![triplet.to_vec()];
    }
    if let Some((left, right)) = feature.sides() {
        return [left, right]
            .into_iter()
            .filter_map(angle_triplet)
            .map(|triplet| triplet.to_vec())
            .collect();
    }
    match feature {
        Feature::TrunkLean => vec![
            vec![Joint::LeftShoulder, Joint::LeftHip],
            vec![Joint::RightShoulder, Joint::RightHip],
        ],
        Feature::CenterOfMassHeight => vec![vec![Joint::LeftHip], vec![Joint::RightHip]],
        _ => Vec::new(),
    }
}

/// Included angle at `vertex`, in degrees within [0, 180]
///
/// Returns `None` when either arm of the angle has zero length.
#[must_use]
pub fn three_point_angle(first: &Position, vertex: &Position, last: &Position) -> Option<f64> {
    let (ax, ay) = (first.x - vertex.x, first.y - vertex.y);
    let (cx, cy) = (last.x - vertex.x, last.y - vertex.y);
    if ax.hypot(ay) < DEGENERATE_LENGTH || cx.hypot(cy) < DEGENERATE_LENGTH {
        return None;
    }

    let mut angle = (cy.atan2(cx) - ay.atan2(ax)).to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle.is_finite().then(|| angle.clamp(0.0, 180.0))
}

/// Stateless feature extractor
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    min_joint_confidence: f64,
    asymmetry_threshold_degrees: f64,
}

impl FeatureExtractor {
    /// Extractor using the thresholds of `config`
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            min_joint_confidence: config.normalizer.min_joint_confidence,
            asymmetry_threshold_degrees: config.features.asymmetry_threshold_degrees,
        }
    }

    /// Compute the feature vector of `current`
    ///
    /// `previous` is only used for motion energy; pass `None` for the first
    /// frame of a session.
    #[must_use]
    pub fn extract(&self, current: &SkeletonFrame, previous: Option<&SkeletonFrame>) -> FeatureVector {
        let mut vector = FeatureVector::empty(current.timestamp_ms);
        vector.coverage_confidence = Self::coverage_confidence(current);
        vector.consensus = current.consensus_rate();

        for feature in Feature::ALL {
            if let Some(triplet) = angle_triplet(feature) {
                if let Some(value) = self.angle(current, triplet) {
                    vector.set(feature, value);
                }
            }
        }

        for composite in [
            Feature::KneeAngle,
            Feature::HipAngle,
            Feature::ElbowAngle,
            Feature::ShoulderAngle,
        ] {
            if let Some(value) = Self::mean_of_sides(&vector, composite) {
                vector.set(composite, value);
            }
        }

        for asymmetry in Feature::ASYMMETRIES {
            if let Some(value) = self.asymmetry(&vector, asymmetry) {
                vector.set(asymmetry, value);
            }
        }

        if let Some(value) = self.trunk_lean(current) {
            vector.set(Feature::TrunkLean, value);
        }
        if let Some(value) = self.center_of_mass_height(current) {
            vector.set(Feature::CenterOfMassHeight, value);
        }
        if let Some(value) = previous.and_then(|prev| self.motion_energy(current, prev)) {
            vector.set(Feature::MotionEnergy, value);
        }

        vector
    }

    fn keypoint<'a>(&self, frame: &'a SkeletonFrame, joint: Joint) -> Option<&'a Keypoint> {
        frame.confident(joint, self.min_joint_confidence)
    }

    fn angle(&self, frame: &SkeletonFrame, [first, vertex, last]: [Joint; 3]) -> Option<FeatureValue> {
        let a = self.keypoint(frame, first)?;
        let b = self.keypoint(frame, vertex)?;
        let c = self.keypoint(frame, last)?;
        let angle = three_point_angle(&a.position, &b.position, &c.position)?;
        Some(FeatureValue::new(
            angle,
            a.confidence.min(b.confidence).min(c.confidence),
        ))
    }

    fn mean_of_sides(vector: &FeatureVector, composite: Feature) -> Option<FeatureValue> {
        let (left, right) = composite.sides()?;
        match (vector.get(left), vector.get(right)) {
            (Some(l), Some(r)) => Some(FeatureValue::new(
                f64::midpoint(l.value, r.value),
                l.confidence.min(r.confidence),
            )),
            (Some(side), None) | (None, Some(side)) => Some(side),
            (None, None) => None,
        }
    }

    fn asymmetry(&self, vector: &FeatureVector, asymmetry: Feature) -> Option<FeatureValue> {
        let (left, right) = asymmetry.sides()?;
        let l = vector.get(left)?;
        let r = vector.get(right)?;
        Some(FeatureValue::new(
            (l.value - r.value).abs() / self.asymmetry_threshold_degrees,
            l.confidence.min(r.confidence),
        ))
    }

    /// Midpoint of a left/right pair, or the single confident side
    fn centre(&self, frame: &SkeletonFrame, left: Joint, right: Joint) -> Option<(Position, f64)> {
        match (self.keypoint(frame, left), self.keypoint(frame, right)) {
            (Some(l), Some(r)) => Some((
                l.position.midpoint(&r.position),
                l.confidence.min(r.confidence),
            )),
            (Some(side), None) | (None, Some(side)) => Some((side.position, side.confidence)),
            (None, None) => None,
        }
    }

    fn trunk_lean(&self, frame: &SkeletonFrame) -> Option<FeatureValue> {
        let both_sides = [
            Joint::LeftShoulder,
            Joint::RightShoulder,
            Joint::LeftHip,
            Joint::RightHip,
        ]
        .into_iter()
        .all(|joint| self.keypoint(frame, joint).is_some());

        let ((shoulder, shoulder_conf), (hip, hip_conf)) = if both_sides {
            (
                self.centre(frame, Joint::LeftShoulder, Joint::RightShoulder)?,
                self.centre(frame, Joint::LeftHip, Joint::RightHip)?,
            )
        } else {
            // Same-side pair so a half-visible body does not mix sides
            [(Joint::LeftShoulder, Joint::LeftHip), (Joint::RightShoulder, Joint::RightHip)]
                .into_iter()
                .find_map(|(s, h)| {
                    let s = self.keypoint(frame, s)?;
                    let h = self.keypoint(frame, h)?;
                    Some(((s.position, s.confidence), (h.position, h.confidence)))
                })?
        };

        let dx = shoulder.x - hip.x;
        let dy = shoulder.y - hip.y;
        if dx.hypot(dy) < DEGENERATE_LENGTH {
            return None;
        }
        // Image y grows downwards, so an upright trunk has dy < 0
        let lean = dx.abs().atan2(-dy).to_degrees().clamp(0.0, 180.0);
        Some(FeatureValue::new(lean, shoulder_conf.min(hip_conf)))
    }

    fn center_of_mass_height(&self, frame: &SkeletonFrame) -> Option<FeatureValue> {
        let (hip, hip_conf) = self.centre(frame, Joint::LeftHip, Joint::RightHip)?;
        let (y, confidence) = match self.centre(frame, Joint::LeftShoulder, Joint::RightShoulder) {
            Some((shoulder, shoulder_conf)) => {
                (f64::midpoint(hip.y, shoulder.y), hip_conf.min(shoulder_conf))
            }
            None => (hip.y, hip_conf),
        };
        Some(FeatureValue::new(1.0 - y, confidence))
    }

    fn motion_energy(&self, current: &SkeletonFrame, previous: &SkeletonFrame) -> Option<FeatureValue> {
        let elapsed_ms = current.timestamp_ms.checked_sub(previous.timestamp_ms)?;
        if elapsed_ms == 0 {
            return None;
        }

        let mut total = 0.0;
        let mut count = 0_u32;
        let mut confidence = 1.0_f64;
        for joint in Joint::TORSO_AND_LIMBS {
            if let (Some(now), Some(before)) =
                (self.keypoint(current, joint), self.keypoint(previous, joint))
            {
                total += now.position.distance(&before.position);
                count += 1;
                confidence = confidence.min(now.confidence).min(before.confidence);
            }
        }
        if count == 0 {
            return None;
        }

        let seconds = elapsed_ms as f64 / 1000.0;
        Some(FeatureValue::new(
            total / f64::from(count) / seconds,
            confidence,
        ))
    }

    /// Mean torso and limb confidence, missing joints count as zero
    fn coverage_confidence(frame: &SkeletonFrame) -> f64 {
        let sum: f64 = Joint::TORSO_AND_LIMBS
            .iter()
            .map(|joint| frame.joint(*joint).map_or(0.0, |keypoint| keypoint.confidence))
            .sum();
        sum / Joint::TORSO_AND_LIMBS.len() as f64
    }
}
