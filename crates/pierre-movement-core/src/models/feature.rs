// ABOUTME: Feature identifiers, per-frame feature vectors, and running min/max/mean statistics
// ABOUTME: A feature vector is fixed-size and ordered, absent features are None rather than zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named scalar computed for every analyzed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Hip-knee-ankle angle, left side (degrees)
    LeftKneeAngle,
    /// Hip-knee-ankle angle, right side (degrees)
    RightKneeAngle,
    /// Mean of the available knee angles (degrees)
    KneeAngle,
    /// Shoulder-hip-knee angle, left side (degrees)
    LeftHipAngle,
    /// Shoulder-hip-knee angle, right side (degrees)
    RightHipAngle,
    /// Mean of the available hip angles (degrees)
    HipAngle,
    /// Shoulder-elbow-wrist angle, left side (degrees)
    LeftElbowAngle,
    /// Shoulder-elbow-wrist angle, right side (degrees)
    RightElbowAngle,
    /// Mean of the available elbow angles (degrees)
    ElbowAngle,
    /// Elbow-shoulder-hip angle, left side (degrees)
    LeftShoulderAngle,
    /// Elbow-shoulder-hip angle, right side (degrees)
    RightShoulderAngle,
    /// Mean of the available shoulder angles (degrees)
    ShoulderAngle,
    /// Inclination of the hip-to-shoulder line from vertical (degrees)
    TrunkLean,
    /// Left/right knee angle difference over the asymmetry threshold
    KneeAsymmetry,
    /// Left/right hip angle difference over the asymmetry threshold
    HipAsymmetry,
    /// Left/right elbow angle difference over the asymmetry threshold
    ElbowAsymmetry,
    /// Left/right shoulder angle difference over the asymmetry threshold
    ShoulderAsymmetry,
    /// Height of the hip/shoulder centroid, 1.0 at the top of the image
    CenterOfMassHeight,
    /// Mean joint displacement per second since the previous frame
    MotionEnergy,
}

impl Feature {
    /// Number of features in a vector
    pub const COUNT: usize = 19;

    /// Every feature, in vector order
    pub const ALL: [Self; Self::COUNT] = [
        Self::LeftKneeAngle,
        Self::RightKneeAngle,
        Self::KneeAngle,
        Self::LeftHipAngle,
        Self::RightHipAngle,
        Self::HipAngle,
        Self::LeftElbowAngle,
        Self::RightElbowAngle,
        Self::ElbowAngle,
        Self::LeftShoulderAngle,
        Self::RightShoulderAngle,
        Self::ShoulderAngle,
        Self::TrunkLean,
        Self::KneeAsymmetry,
        Self::HipAsymmetry,
        Self::ElbowAsymmetry,
        Self::ShoulderAsymmetry,
        Self::CenterOfMassHeight,
        Self::MotionEnergy,
    ];

    /// Asymmetry features, one per mirrored angle pair
    pub const ASYMMETRIES: [Self; 4] = [
        Self::KneeAsymmetry,
        Self::HipAsymmetry,
        Self::ElbowAsymmetry,
        Self::ShoulderAsymmetry,
    ];

    /// Position of this feature in a `FeatureVector`
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable `snake_case` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LeftKneeAngle => "left_knee_angle",
            Self::RightKneeAngle => "right_knee_angle",
            Self::KneeAngle => "knee_angle",
            Self::LeftHipAngle => "left_hip_angle",
            Self::RightHipAngle => "right_hip_angle",
            Self::HipAngle => "hip_angle",
            Self::LeftElbowAngle => "left_elbow_angle",
            Self::RightElbowAngle => "right_elbow_angle",
            Self::ElbowAngle => "elbow_angle",
            Self::LeftShoulderAngle => "left_shoulder_angle",
            Self::RightShoulderAngle => "right_shoulder_angle",
            Self::ShoulderAngle => "shoulder_angle",
            Self::TrunkLean => "trunk_lean",
            Self::KneeAsymmetry => "knee_asymmetry",
            Self::HipAsymmetry => "hip_asymmetry",
            Self::ElbowAsymmetry => "elbow_asymmetry",
            Self::ShoulderAsymmetry => "shoulder_asymmetry",
            Self::CenterOfMassHeight => "center_of_mass_height",
            Self::MotionEnergy => "motion_energy",
        }
    }

    /// True for features measured in degrees and bounded to [0, 180]
    #[must_use]
    pub const fn is_angle(self) -> bool {
        (self as usize) <= Self::TrunkLean as usize
    }

    /// Left and right side features behind a composite angle or an asymmetry
    #[must_use]
    pub const fn sides(self) -> Option<(Self, Self)> {
        match self {
            Self::KneeAngle | Self::KneeAsymmetry => Some((Self::LeftKneeAngle, Self::RightKneeAngle)),
            Self::HipAngle | Self::HipAsymmetry => Some((Self::LeftHipAngle, Self::RightHipAngle)),
            Self::ElbowAngle | Self::ElbowAsymmetry => {
                Some((Self::LeftElbowAngle, Self::RightElbowAngle))
            }
            Self::ShoulderAngle | Self::ShoulderAsymmetry => {
                Some((Self::LeftShoulderAngle, Self::RightShoulderAngle))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A computed feature and the confidence of the joints behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    /// Feature value (degrees for angles)
    pub value: f64,
    /// Minimum confidence of the joints used to compute it
    pub confidence: f64,
}

impl FeatureValue {
    /// Construct a feature value
    #[must_use]
    pub const fn new(value: f64, confidence: f64) -> Self {
        Self { value, confidence }
    }
}

/// Ordered per-frame feature values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Timestamp of the skeleton frame this vector was derived from
    pub timestamp_ms: u64,
    /// Values indexed by `Feature::index`, `None` when not computable
    pub values: [Option<FeatureValue>; Feature::COUNT],
    /// Mean confidence over the torso and limb joints, missing joints count as zero
    ///
    /// Measures how much of the body was seen. Each entry of `values` carries
    /// its own confidence, the minimum over the joints it was computed from.
    pub coverage_confidence: f64,
    /// Fraction of shared joints the ensemble sources agreed on, `None` for one source
    pub consensus: Option<f64>,
}

impl FeatureVector {
    /// Vector with every feature absent
    #[must_use]
    pub const fn empty(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            values: [None; Feature::COUNT],
            coverage_confidence: 0.0,
            consensus: None,
        }
    }

    /// Feature value with its confidence
    #[must_use]
    pub const fn get(&self, feature: Feature) -> Option<FeatureValue> {
        self.values[feature.index()]
    }

    /// Bare feature value
    #[must_use]
    pub fn value(&self, feature: Feature) -> Option<f64> {
        self.get(feature).map(|feature_value| feature_value.value)
    }

    /// Store a value for `feature`
    pub fn set(&mut self, feature: Feature, value: FeatureValue) {
        self.values[feature.index()] = Some(value);
    }

    /// Builder-style variant of `set`
    #[must_use]
    pub fn with(mut self, feature: Feature, value: f64, confidence: f64) -> Self {
        self.values[feature.index()] = Some(FeatureValue::new(value, confidence));
        self
    }

    /// Number of features present
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    /// Features present in this vector, in order
    pub fn present(&self) -> impl Iterator<Item = (Feature, FeatureValue)> + '_ {
        Feature::ALL
            .into_iter()
            .filter_map(|feature| self.get(feature).map(|value| (feature, value)))
    }
}

/// Running min / max / mean of a scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningStat {
    /// Smallest observed value
    pub min: f64,
    /// Largest observed value
    pub max: f64,
    /// Sum of observed values
    pub sum: f64,
    /// Number of observations
    pub count: u64,
}

impl RunningStat {
    /// Statistic seeded with one observation
    #[must_use]
    pub const fn from_value(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Fold one observation in
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Arithmetic mean of the observations
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.count as f64;
        self.sum / count
    }

    /// `max - min`
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Running statistics for every feature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatsTable {
    stats: [Option<RunningStat>; Feature::COUNT],
}

impl FeatureStatsTable {
    /// Fold every present feature of `vector` in
    pub fn observe(&mut self, vector: &FeatureVector) {
        for (feature, value) in vector.present() {
            self.observe_value(feature, value.value);
        }
    }

    /// Fold a single feature observation in
    pub fn observe_value(&mut self, feature: Feature, value: f64) {
        match &mut self.stats[feature.index()] {
            Some(stat) => stat.observe(value),
            slot @ None => *slot = Some(RunningStat::from_value(value)),
        }
    }

    /// Statistic for `feature`, `None` if it was never observed
    #[must_use]
    pub const fn get(&self, feature: Feature) -> Option<&RunningStat> {
        self.stats[feature.index()].as_ref()
    }

    /// Observed features with their statistics, in vector order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &RunningStat)> + '_ {
        Feature::ALL
            .into_iter()
            .filter_map(|feature| self.get(feature).map(|stat| (feature, stat)))
    }
}
