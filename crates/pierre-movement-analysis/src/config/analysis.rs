// ABOUTME: Analysis engine configuration with defaults, environment overrides, and validation
// ABOUTME: Covers normalization, fusion, features, phase debounce, history, scoring, and confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Analysis Configuration
//!
//! Every threshold the engine applies is policy rather than physics: the
//! defaults come from `pierre_movement_core::constants::defaults` and each can be
//! overridden through `PIERRE_MOVEMENT_*` environment variables.

use super::error::ConfigError;
use pierre_movement_core::constants::{defaults, env_config, sources};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Top-level analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Keypoint normalizer settings
    pub normalizer: NormalizerConfig,
    /// Ensemble fusion settings
    pub fusion: FusionConfig,
    /// Feature extraction settings
    pub features: FeatureConfig,
    /// Phase state machine settings
    pub phases: PhaseConfig,
    /// Feature history window settings
    pub history: HistoryConfig,
    /// Rep scoring and feedback settings
    pub scoring: ScoringConfig,
    /// Session confidence settings
    pub confidence: ConfidenceConfig,
}

/// Keypoint normalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Joints below this confidence are treated as missing
    pub min_joint_confidence: f64,
    /// Unit-space slack before an out-of-frame coordinate drops its joint
    pub coordinate_tolerance: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_joint_confidence: defaults::MIN_JOINT_CONFIDENCE,
            coordinate_tolerance: defaults::COORDINATE_TOLERANCE,
        }
    }
}

/// A pose source and the trust placed in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTrust {
    /// Source identifier
    pub name: String,
    /// Trust weight, strictly positive
    pub trust: f64,
}

impl SourceTrust {
    /// Construct a source trust entry
    #[must_use]
    pub fn new(name: impl Into<String>, trust: f64) -> Self {
        Self {
            name: name.into(),
            trust,
        }
    }
}

/// Ensemble fusion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Ordered pose sources; the first one sets the fused frame's timestamp
    pub sources: Vec<SourceTrust>,
    /// Joint positions closer than this are in full agreement
    pub agreement_epsilon: f64,
    /// Joint positions farther apart than this are low consensus
    pub disagreement_tolerance: f64,
    /// Confidence multiplier at the disagreement tolerance
    pub min_agreement_factor: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceTrust::new(sources::PRIMARY, defaults::PRIMARY_SOURCE_TRUST),
                SourceTrust::new(sources::SECONDARY, defaults::SECONDARY_SOURCE_TRUST),
            ],
            agreement_epsilon: defaults::AGREEMENT_EPSILON,
            disagreement_tolerance: defaults::DISAGREEMENT_TOLERANCE,
            min_agreement_factor: defaults::MIN_AGREEMENT_FACTOR,
        }
    }
}

impl FusionConfig {
    /// Parse an ordered `name:trust` list such as `primary:0.55,secondary:0.45`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for entries without a trust or with a
    /// non-numeric trust
    pub fn parse_sources(spec: &str) -> Result<Vec<SourceTrust>, ConfigError> {
        spec.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (name, trust) = entry
                    .split_once(':')
                    .ok_or_else(|| ConfigError::Parse(format!("source entry '{entry}' has no trust")))?;
                let trust = trust
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::Parse(format!("invalid trust in '{entry}'")))?;
                Ok(SourceTrust::new(name.trim(), trust))
            })
            .collect()
    }

    /// Trust of a named source, `None` if it is not configured
    #[must_use]
    pub fn trust_of(&self, name: &str) -> Option<f64> {
        self.sources
            .iter()
            .find(|source| source.name == name)
            .map(|source| source.trust)
    }
}

/// Feature extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Left/right angle difference mapped to an asymmetry value of 1.0
    pub asymmetry_threshold_degrees: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            asymmetry_threshold_degrees: defaults::ASYMMETRY_THRESHOLD_DEGREES,
        }
    }
}

/// Phase state machine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// A phase must last this long before it counts
    pub min_dwell_ms: u64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            min_dwell_ms: defaults::MIN_PHASE_DWELL_MS,
        }
    }
}

/// Feature history window settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Vectors older than this (relative to the newest) are evicted
    pub window_ms: u64,
    /// Hard cap on retained vectors
    pub max_vectors: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_ms: defaults::HISTORY_WINDOW_MS,
            max_vectors: defaults::HISTORY_MAX_VECTORS,
        }
    }
}

/// Rep scoring and feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score every rep starts from
    pub base_score: f64,
    /// Lowest possible rep score
    pub floor_score: f64,
    /// Multiplier applied to every profile penalty
    pub penalty_scale: f64,
    /// Improvement items surfaced at most
    pub max_improvements: usize,
    /// Positive items surfaced at most
    pub max_positives: usize,
    /// Drills recommended at most
    pub max_drills: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: defaults::BASE_REP_SCORE,
            floor_score: 0.0,
            penalty_scale: 1.0,
            max_improvements: defaults::MAX_IMPROVEMENT_ITEMS,
            max_positives: defaults::MAX_POSITIVE_ITEMS,
            max_drills: defaults::MAX_DRILLS,
        }
    }
}

/// Session confidence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Scores below this percentage come with likely causes and camera tips
    pub floor_percent: f64,
    /// Largest share of confidence that ensemble disagreement can remove
    pub consensus_weight: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            floor_percent: defaults::CONFIDENCE_FLOOR_PERCENT,
            consensus_weight: defaults::CONSENSUS_CONFIDENCE_WEIGHT,
        }
    }
}

impl AnalysisConfig {
    /// Load defaults, apply environment overrides, and validate
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparsable value or
    /// the resulting configuration fails validation
    pub fn from_environment() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        debug!(
            min_joint_confidence = config.normalizer.min_joint_confidence,
            min_dwell_ms = config.phases.min_dwell_ms,
            sources = config.fusion.sources.len(),
            "Loaded analysis configuration"
        );
        Ok(config)
    }

    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            env_config::MIN_JOINT_CONFIDENCE,
            &mut self.normalizer.min_joint_confidence,
        )?;
        Self::apply_env_var(
            env_config::ASYMMETRY_THRESHOLD,
            &mut self.features.asymmetry_threshold_degrees,
        )?;
        Self::apply_env_var(env_config::MIN_PHASE_DWELL_MS, &mut self.phases.min_dwell_ms)?;
        Self::apply_env_var(
            env_config::AGREEMENT_EPSILON,
            &mut self.fusion.agreement_epsilon,
        )?;
        Self::apply_env_var(
            env_config::DISAGREEMENT_TOLERANCE,
            &mut self.fusion.disagreement_tolerance,
        )?;
        Self::apply_env_var(
            env_config::CONFIDENCE_FLOOR,
            &mut self.confidence.floor_percent,
        )?;
        Self::apply_env_var(env_config::PENALTY_SCALE, &mut self.scoring.penalty_scale)?;
        Self::apply_env_var(env_config::HISTORY_WINDOW_MS, &mut self.history.window_ms)?;

        if let Ok(spec) = env::var(env_config::SOURCE_TRUST) {
            self.fusion.sources = FusionConfig::parse_sources(&spec)?;
        }

        Ok(self)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.normalizer.min_joint_confidence) {
            return Err(ConfigError::InvalidRange(
                "min_joint_confidence must be within 0.0..=1.0",
            ));
        }
        if self.normalizer.coordinate_tolerance < 0.0 {
            return Err(ConfigError::InvalidRange(
                "coordinate_tolerance must not be negative",
            ));
        }

        if self.fusion.sources.is_empty() {
            return Err(ConfigError::InvalidRange("at least one pose source is required"));
        }
        if self.fusion.sources.iter().any(|source| source.trust <= 0.0) {
            return Err(ConfigError::InvalidWeights("source trust must be positive"));
        }
        if self.fusion.agreement_epsilon < 0.0
            || self.fusion.agreement_epsilon >= self.fusion.disagreement_tolerance
        {
            return Err(ConfigError::InvalidRange(
                "agreement_epsilon must be >= 0 and < disagreement_tolerance",
            ));
        }
        if !(0.0..=1.0).contains(&self.fusion.min_agreement_factor) {
            return Err(ConfigError::InvalidRange(
                "min_agreement_factor must be within 0.0..=1.0",
            ));
        }

        if self.features.asymmetry_threshold_degrees <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "asymmetry_threshold_degrees must be positive",
            ));
        }

        if self.history.window_ms == 0 || self.history.max_vectors == 0 {
            return Err(ConfigError::InvalidRange("history window must not be empty"));
        }

        if self.scoring.floor_score < 0.0 || self.scoring.floor_score >= self.scoring.base_score {
            return Err(ConfigError::InvalidRange(
                "floor_score must be >= 0 and < base_score",
            ));
        }
        if self.scoring.penalty_scale < 0.0 {
            return Err(ConfigError::InvalidRange("penalty_scale must not be negative"));
        }

        if !(0.0..=100.0).contains(&self.confidence.floor_percent) {
            return Err(ConfigError::InvalidRange(
                "confidence floor must be within 0..=100 percent",
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence.consensus_weight) {
            return Err(ConfigError::InvalidWeights(
                "consensus weight must be within 0.0..=1.0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_sources_keeps_order() {
        let parsed = FusionConfig::parse_sources("fast:0.6, accurate:0.4,").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "fast");
        assert!((parsed[1].trust - 0.4).abs() < f64::EPSILON);
        assert!(FusionConfig::parse_sources("fast").is_err());
        assert!(FusionConfig::parse_sources("fast:high").is_err());
    }

    #[test]
    fn test_epsilon_must_be_below_tolerance() {
        let mut config = AnalysisConfig::default();
        config.fusion.agreement_epsilon = 0.1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));
    }

    #[test]
    fn test_consensus_weight_is_a_fraction() {
        let mut config = AnalysisConfig::default();
        config.confidence.consensus_weight = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWeights(_))));
    }
}
