// ABOUTME: Configuration module for the pierre-movement-analysis crate
// ABOUTME: Re-exports analysis settings, the exercise catalog, and configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Engine thresholds with environment overrides
pub mod analysis;
/// Configuration error types
pub mod error;
/// Exercise identifier to profile table
pub mod exercises;

pub use analysis::{
    AnalysisConfig, ConfidenceConfig, FeatureConfig, FusionConfig, HistoryConfig,
    NormalizerConfig, PhaseConfig, ScoringConfig, SourceTrust,
};
pub use error::ConfigError;
pub use exercises::{
    AdaptiveSettings, ExerciseCatalog, ExerciseProfile, ExitCondition, Extreme, IdealRange,
    Polarity, PhaseThresholds, RepStandards, RepValidation, ResolvedExercise,
    ADAPTIVE_EXERCISE_ID,
};
