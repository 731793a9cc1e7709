// ABOUTME: Exercise catalog mapping identifiers to data-only profiles interpreted by the engine
// ABOUTME: Profiles hold the primary feature, thresholds, ideal ranges, validation, and exit rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise Catalog
//!
//! The state machine and the scorer are generic interpreters over
//! `ExerciseProfile` records. Adding an exercise means adding a record, not
//! code. Unknown identifiers resolve to the adaptive profile, which picks the
//! dominant joint angle from the athlete's own movement.

use super::error::ConfigError;
use crate::features::required_groups;
use pierre_movement_core::models::{Feature, Joint, PerformanceRating, Severity, ViolationKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Identifier of the adaptive fallback profile
pub const ADAPTIVE_EXERCISE_ID: &str = "adaptive";

/// Which end of the primary feature's range is the working position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Low values are the working position (squat knee angle)
    LowIsDown,
    /// High values are the working position (throw arm extension)
    HighIsDown,
}

/// Hysteresis band of the primary feature
///
/// The machine enters `ACTIVE_DOWN` past `down` and `ACTIVE_UP` past `up`;
/// values between the two never cause a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Working-position threshold
    pub down: f64,
    /// Rest-position threshold
    pub up: f64,
}

/// Which statistic of a rep an ideal range is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extreme {
    /// Smallest value in the rep
    Min,
    /// Largest value in the rep
    Max,
    /// Mean value over the rep
    Mean,
}

/// Closed interval a rep statistic must fall in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    /// Feature checked
    pub feature: Feature,
    /// Rep statistic checked
    pub extreme: Extreme,
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
    /// Catalog key reported when the statistic falls outside
    pub violation: ViolationKind,
    /// Ranking weight of the violation
    pub severity: Severity,
    /// Points deducted from the rep score
    pub penalty: f64,
}

impl IdealRange {
    fn new(
        feature: Feature,
        extreme: Extreme,
        (min, max): (f64, f64),
        violation: ViolationKind,
        severity: Severity,
        penalty: f64,
    ) -> Self {
        Self {
            feature,
            extreme,
            min,
            max,
            violation,
            severity,
            penalty,
        }
    }

    /// True when `value` lies inside the closed interval
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Conditions a DOWN -> UP cycle must meet to be counted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepValidation {
    /// Minimum travel of the primary feature over the cycle
    pub min_range_of_motion: f64,
    /// Longest allowed descent-to-turnaround time
    pub max_rep_duration_ms: Option<u64>,
}

/// Conditions that end a session on their own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitCondition {
    /// Session length from the first analyzed frame
    pub time_limit_ms: Option<u64>,
    /// Rep count that finishes the set
    pub target_reps: Option<u32>,
}

/// Rep-count standards for the performance rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepStandards {
    /// Reps for an excellent rating
    pub excellent: u32,
    /// Reps for a good rating
    pub good: u32,
    /// Reps for an average rating
    pub average: u32,
}

impl RepStandards {
    /// Rating of a rep count
    #[must_use]
    pub const fn rate(&self, reps: u32) -> PerformanceRating {
        if reps >= self.excellent {
            PerformanceRating::Excellent
        } else if reps >= self.good {
            PerformanceRating::Good
        } else if reps >= self.average {
            PerformanceRating::Average
        } else {
            PerformanceRating::BelowAverage
        }
    }
}

/// Calibration rules of the adaptive fallback profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSettings {
    /// Features competing to become the primary feature
    pub candidates: Vec<Feature>,
    /// Range a candidate must cover before the machine locks onto it
    pub min_activation_range: f64,
    /// Half-width of the hysteresis band as a fraction of the observed range
    pub hysteresis_fraction: f64,
}

/// Data-only description of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProfile {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Feature driving the phase machine
    pub primary: Feature,
    /// Which end of the primary feature is the working position
    pub polarity: Polarity,
    /// Hysteresis band of the primary feature
    pub thresholds: PhaseThresholds,
    /// A frame is analyzed only if one of these joint groups is fully visible
    pub required_joints: Vec<Vec<Joint>>,
    /// Form checks applied to each counted rep
    pub ideal_ranges: Vec<IdealRange>,
    /// Rep acceptance rules
    pub validation: RepValidation,
    /// Automatic session end
    #[serde(default)]
    pub exit: ExitCondition,
    /// Rep-count rating standards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standards: Option<RepStandards>,
    /// Present only on the adaptive fallback profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive: Option<AdaptiveSettings>,
}

impl ExerciseProfile {
    /// True when `value` is at or past the working-position threshold
    #[must_use]
    pub fn in_down_zone(&self, value: f64) -> bool {
        in_down_zone(self.polarity, self.thresholds, value)
    }

    /// True when `value` is at or past the rest-position threshold
    #[must_use]
    pub fn in_up_zone(&self, value: f64) -> bool {
        in_up_zone(self.polarity, self.thresholds, value)
    }

    /// Check that thresholds and ranges are consistent
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidProfile` describing the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidProfile {
            id: self.id.clone(),
            reason,
        };

        let ordered = match self.polarity {
            Polarity::LowIsDown => self.thresholds.down < self.thresholds.up,
            Polarity::HighIsDown => self.thresholds.down > self.thresholds.up,
        };
        if self.adaptive.is_none() && !ordered {
            return Err(invalid("thresholds leave no hysteresis band"));
        }
        if self.required_joints.is_empty() || self.required_joints.iter().any(Vec::is_empty) {
            return Err(invalid("required joint groups must not be empty"));
        }
        if self
            .ideal_ranges
            .iter()
            .any(|range| range.min > range.max || range.penalty < 0.0)
        {
            return Err(invalid("ideal ranges need min <= max and a non-negative penalty"));
        }
        if self.validation.min_range_of_motion < 0.0 {
            return Err(invalid("minimum range of motion must not be negative"));
        }
        if let Some(standards) = &self.standards {
            if !(standards.excellent >= standards.good && standards.good >= standards.average) {
                return Err(invalid("rating standards must be descending"));
            }
        }
        if let Some(adaptive) = &self.adaptive {
            if adaptive.candidates.is_empty() || !(0.0..0.5).contains(&adaptive.hysteresis_fraction) {
                return Err(invalid("adaptive settings need candidates and a fraction below 0.5"));
            }
        }
        Ok(())
    }
}

/// Working-position test shared with the adaptive calibration
#[must_use]
pub fn in_down_zone(polarity: Polarity, thresholds: PhaseThresholds, value: f64) -> bool {
    match polarity {
        Polarity::LowIsDown => value <= thresholds.down,
        Polarity::HighIsDown => value >= thresholds.down,
    }
}

/// Rest-position test shared with the adaptive calibration
#[must_use]
pub fn in_up_zone(polarity: Polarity, thresholds: PhaseThresholds, value: f64) -> bool {
    match polarity {
        Polarity::LowIsDown => value >= thresholds.up,
        Polarity::HighIsDown => value <= thresholds.up,
    }
}

/// A catalog lookup result
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExercise {
    /// Identifier the caller asked for
    pub requested_id: String,
    /// Profile to run
    pub profile: ExerciseProfile,
    /// True when the identifier was unknown
    pub used_fallback: bool,
}

/// Table of exercise profiles
#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    profiles: BTreeMap<String, ExerciseProfile>,
    fallback: ExerciseProfile,
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExerciseCatalog {
    /// Catalog with every built-in exercise
    #[must_use]
    pub fn builtin() -> Self {
        let profiles = [
            squat(),
            push_up(),
            sit_up(),
            lunge(),
            vertical_jump(),
            medicine_ball_throw(),
            sit_and_reach(),
            bicep_curl(),
        ]
        .into_iter()
        .map(|profile| (profile.id.clone(), profile))
        .collect();

        Self {
            profiles,
            fallback: adaptive(),
        }
    }

    /// Add or replace a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the profile fails validation
    pub fn register(&mut self, profile: ExerciseProfile) -> Result<(), ConfigError> {
        profile.validate()?;
        self.profiles.insert(canonical_id(&profile.id), profile);
        Ok(())
    }

    /// Profile for `id`, if it is in the catalog
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExerciseProfile> {
        let canonical = canonical_id(id);
        self.profiles.get(alias(&canonical).unwrap_or(&canonical))
    }

    /// Profile for `id`, falling back to the adaptive profile for unknown ids
    #[must_use]
    pub fn resolve(&self, id: &str) -> ResolvedExercise {
        self.get(id).map_or_else(
            || {
                warn!(
                    exercise_id = id,
                    "Unknown exercise, using adaptive fallback profile"
                );
                ResolvedExercise {
                    requested_id: id.to_owned(),
                    profile: self.fallback.clone(),
                    used_fallback: true,
                }
            },
            |profile| ResolvedExercise {
                requested_id: id.to_owned(),
                profile: profile.clone(),
                used_fallback: false,
            },
        )
    }

    /// Every catalog profile, ordered by identifier
    pub fn profiles(&self) -> impl Iterator<Item = &ExerciseProfile> {
        self.profiles.values()
    }

    /// The adaptive fallback profile
    #[must_use]
    pub const fn fallback(&self) -> &ExerciseProfile {
        &self.fallback
    }
}

fn canonical_id(id: &str) -> String {
    id.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

fn alias(canonical: &str) -> Option<&'static str> {
    Some(match canonical {
        "squats" | "bodyweight_squat" => "squat",
        "pushup" | "pushups" | "push_ups" => "push_up",
        "situp" | "situps" | "sit_ups" => "sit_up",
        "lunges" => "lunge",
        "jump" | "countermovement_jump" => "vertical_jump",
        "medicine_ball" | "chest_pass" => "medicine_ball_throw",
        "sit_reach" | "flexibility" => "sit_and_reach",
        "curl" | "biceps_curl" => "bicep_curl",
        _ => return None,
    })
}

fn groups(features: &[Feature]) -> Vec<Vec<Joint>> {
    let mut all: Vec<Vec<Joint>> = features.iter().flat_map(|f| required_groups(*f)).collect();
    all.dedup();
    all
}

fn asymmetry_check(feature: Feature) -> IdealRange {
    IdealRange::new(
        feature,
        Extreme::Max,
        (0.0, 1.0),
        ViolationKind::Asymmetry,
        Severity::Medium,
        15.0,
    )
}

fn squat() -> ExerciseProfile {
    ExerciseProfile {
        id: "squat".into(),
        name: "Bodyweight Squat".into(),
        primary: Feature::KneeAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 100.0,
            up: 160.0,
        },
        required_joints: groups(&[Feature::KneeAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::KneeAngle,
                Extreme::Min,
                (0.0, 90.0),
                ViolationKind::InsufficientDepth,
                Severity::High,
                10.0,
            ),
            asymmetry_check(Feature::KneeAsymmetry),
            IdealRange::new(
                Feature::TrunkLean,
                Extreme::Max,
                (0.0, 45.0),
                ViolationKind::ExcessiveForwardLean,
                Severity::Medium,
                10.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 40.0,
            max_rep_duration_ms: Some(6_000),
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: None,
    }
}

fn push_up() -> ExerciseProfile {
    ExerciseProfile {
        id: "push_up".into(),
        name: "Push-Up".into(),
        primary: Feature::ElbowAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 90.0,
            up: 150.0,
        },
        required_joints: groups(&[Feature::ElbowAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::ElbowAngle,
                Extreme::Min,
                (0.0, 80.0),
                ViolationKind::InsufficientDepth,
                Severity::High,
                10.0,
            ),
            IdealRange::new(
                Feature::HipAngle,
                Extreme::Min,
                (160.0, 180.0),
                ViolationKind::BodyLineBreak,
                Severity::Medium,
                10.0,
            ),
            asymmetry_check(Feature::ElbowAsymmetry),
            IdealRange::new(
                Feature::ElbowAngle,
                Extreme::Max,
                (160.0, 180.0),
                ViolationKind::IncompleteExtension,
                Severity::Low,
                5.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 40.0,
            max_rep_duration_ms: Some(5_000),
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: None,
    }
}

fn sit_up() -> ExerciseProfile {
    ExerciseProfile {
        id: "sit_up".into(),
        name: "Sit-Up (30 s test)".into(),
        primary: Feature::HipAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 70.0,
            up: 160.0,
        },
        required_joints: groups(&[Feature::HipAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::HipAngle,
                Extreme::Min,
                (0.0, 60.0),
                ViolationKind::InsufficientDepth,
                Severity::Medium,
                10.0,
            ),
            IdealRange::new(
                Feature::HipAngle,
                Extreme::Max,
                (165.0, 180.0),
                ViolationKind::IncompleteExtension,
                Severity::Low,
                5.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 50.0,
            max_rep_duration_ms: Some(3_000),
        },
        exit: ExitCondition {
            time_limit_ms: Some(30_000),
            target_reps: None,
        },
        standards: Some(RepStandards {
            excellent: 60,
            good: 50,
            average: 40,
        }),
        adaptive: None,
    }
}

fn lunge() -> ExerciseProfile {
    ExerciseProfile {
        id: "lunge".into(),
        name: "Forward Lunge".into(),
        primary: Feature::KneeAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 110.0,
            up: 160.0,
        },
        required_joints: groups(&[Feature::KneeAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::KneeAngle,
                Extreme::Min,
                (0.0, 100.0),
                ViolationKind::InsufficientDepth,
                Severity::High,
                10.0,
            ),
            IdealRange::new(
                Feature::TrunkLean,
                Extreme::Max,
                (0.0, 30.0),
                ViolationKind::ExcessiveForwardLean,
                Severity::Medium,
                10.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 40.0,
            max_rep_duration_ms: Some(6_000),
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: None,
    }
}

fn vertical_jump() -> ExerciseProfile {
    ExerciseProfile {
        id: "vertical_jump".into(),
        name: "Countermovement Vertical Jump".into(),
        primary: Feature::KneeAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 130.0,
            up: 165.0,
        },
        required_joints: groups(&[Feature::KneeAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::KneeAngle,
                Extreme::Min,
                (70.0, 120.0),
                ViolationKind::InsufficientDepth,
                Severity::Medium,
                10.0,
            ),
            IdealRange::new(
                Feature::KneeAsymmetry,
                Extreme::Max,
                (0.0, 1.0),
                ViolationKind::Asymmetry,
                Severity::High,
                15.0,
            ),
            IdealRange::new(
                Feature::KneeAngle,
                Extreme::Max,
                (170.0, 180.0),
                ViolationKind::IncompleteExtension,
                Severity::Low,
                5.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 30.0,
            max_rep_duration_ms: Some(2_500),
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: None,
    }
}

fn medicine_ball_throw() -> ExerciseProfile {
    ExerciseProfile {
        id: "medicine_ball_throw".into(),
        name: "Seated Medicine Ball Throw".into(),
        primary: Feature::ElbowAngle,
        polarity: Polarity::HighIsDown,
        thresholds: PhaseThresholds {
            down: 150.0,
            up: 100.0,
        },
        required_joints: groups(&[Feature::ElbowAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::ElbowAngle,
                Extreme::Max,
                (160.0, 180.0),
                ViolationKind::LimitedReach,
                Severity::High,
                10.0,
            ),
            asymmetry_check(Feature::ElbowAsymmetry),
            IdealRange::new(
                Feature::TrunkLean,
                Extreme::Max,
                (0.0, 30.0),
                ViolationKind::ExcessiveForwardLean,
                Severity::Low,
                5.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 40.0,
            max_rep_duration_ms: Some(4_000),
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: None,
    }
}

fn sit_and_reach() -> ExerciseProfile {
    ExerciseProfile {
        id: "sit_and_reach".into(),
        name: "Sit and Reach".into(),
        primary: Feature::HipAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 65.0,
            up: 80.0,
        },
        required_joints: groups(&[Feature::HipAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::HipAngle,
                Extreme::Min,
                (0.0, 55.0),
                ViolationKind::LimitedReach,
                Severity::High,
                10.0,
            ),
            IdealRange::new(
                Feature::KneeAngle,
                Extreme::Min,
                (160.0, 180.0),
                ViolationKind::IncompleteExtension,
                Severity::Medium,
                10.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 15.0,
            max_rep_duration_ms: None,
        },
        exit: ExitCondition {
            time_limit_ms: None,
            target_reps: Some(3),
        },
        standards: None,
        adaptive: None,
    }
}

fn bicep_curl() -> ExerciseProfile {
    ExerciseProfile {
        id: "bicep_curl".into(),
        name: "Bicep Curl".into(),
        primary: Feature::ElbowAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 60.0,
            up: 150.0,
        },
        required_joints: groups(&[Feature::ElbowAngle]),
        ideal_ranges: vec![
            IdealRange::new(
                Feature::ElbowAngle,
                Extreme::Min,
                (0.0, 50.0),
                ViolationKind::InsufficientDepth,
                Severity::Medium,
                10.0,
            ),
            IdealRange::new(
                Feature::ElbowAngle,
                Extreme::Max,
                (160.0, 180.0),
                ViolationKind::IncompleteExtension,
                Severity::Low,
                5.0,
            ),
            IdealRange::new(
                Feature::TrunkLean,
                Extreme::Max,
                (0.0, 15.0),
                ViolationKind::ExcessiveForwardLean,
                Severity::Medium,
                10.0,
            ),
        ],
        validation: RepValidation {
            min_range_of_motion: 60.0,
            max_rep_duration_ms: Some(5_000),
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: None,
    }
}

fn adaptive() -> ExerciseProfile {
    let candidates = vec![
        Feature::KneeAngle,
        Feature::HipAngle,
        Feature::ElbowAngle,
        Feature::ShoulderAngle,
    ];
    ExerciseProfile {
        id: ADAPTIVE_EXERCISE_ID.into(),
        name: "Adaptive (dominant joint)".into(),
        primary: Feature::KneeAngle,
        polarity: Polarity::LowIsDown,
        thresholds: PhaseThresholds {
            down: 0.0,
            up: 180.0,
        },
        required_joints: groups(&candidates),
        ideal_ranges: Feature::ASYMMETRIES.into_iter().map(asymmetry_check).collect(),
        validation: RepValidation {
            min_range_of_motion: 40.0,
            max_rep_duration_ms: None,
        },
        exit: ExitCondition::default(),
        standards: None,
        adaptive: Some(AdaptiveSettings {
            candidates,
            min_activation_range: 40.0,
            hysteresis_fraction: 0.25,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_validate() {
        let catalog = ExerciseCatalog::builtin();
        for profile in catalog.profiles() {
            assert!(profile.validate().is_ok(), "{} failed validation", profile.id);
        }
        assert!(catalog.fallback().validate().is_ok());
    }

    #[test]
    fn test_aliases_resolve() {
        let catalog = ExerciseCatalog::builtin();
        assert_eq!(catalog.get("Sit-Ups").map(|p| p.id.as_str()), Some("sit_up"));
        assert_eq!(catalog.get("pushup").map(|p| p.id.as_str()), Some("push_up"));
        assert!(catalog.get("underwater basket weaving").is_none());
    }

    #[test]
    fn test_unknown_exercise_falls_back() {
        let resolved = ExerciseCatalog::builtin().resolve("kettlebell_swing");
        assert!(resolved.used_fallback);
        assert_eq!(resolved.profile.id, ADAPTIVE_EXERCISE_ID);
        assert_eq!(resolved.requested_id, "kettlebell_swing");
    }

    #[test]
    fn test_zones_respect_polarity() {
        let catalog = ExerciseCatalog::builtin();
        let squat = catalog.get("squat").unwrap();
        assert!(squat.in_down_zone(95.0));
        assert!(squat.in_up_zone(170.0));
        assert!(!squat.in_down_zone(130.0) && !squat.in_up_zone(130.0));

        let throw = catalog.get("medicine_ball_throw").unwrap();
        assert!(throw.in_down_zone(165.0));
        assert!(throw.in_up_zone(80.0));
    }

    #[test]
    fn test_register_rejects_flat_band() {
        let mut catalog = ExerciseCatalog::builtin();
        let mut profile = catalog.get("squat").unwrap().clone();
        profile.id = "wall_sit".into();
        profile.thresholds = PhaseThresholds {
            down: 120.0,
            up: 120.0,
        };
        assert!(matches!(
            catalog.register(profile),
            Err(ConfigError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_standards_rating() {
        let standards = RepStandards {
            excellent: 60,
            good: 50,
            average: 40,
        };
        assert_eq!(standards.rate(61), PerformanceRating::Excellent);
        assert_eq!(standards.rate(50), PerformanceRating::Good);
        assert_eq!(standards.rate(12), PerformanceRating::BelowAverage);
    }
}
