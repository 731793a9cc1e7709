// ABOUTME: Movement analysis engine: normalizer, fuser, features, phase machine, scoring, aggregation
// ABOUTME: Pure single-threaded pipeline driven one skeleton frame at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Movement Analysis
//!
//! Leaf-to-root, one frame at a time:
//!
//! 1. [`normalizer::KeypointNormalizer`] rescales raw pose-source output into
//!    unit-space skeleton frames, or reports why a frame was skipped.
//! 2. [`fusion::EnsembleFuser`] combines frames from several pose sources.
//! 3. [`features::FeatureExtractor`] derives angles, asymmetry, trunk lean,
//!    center-of-mass height, and motion energy.
//! 4. [`state_machine::PhaseMachine`] segments the feature stream into phases
//!    and counts validated reps.
//! 5. [`scoring::RepScorer`] and [`scoring::FeedbackGenerator`] grade reps.
//! 6. [`aggregator::SessionAggregator`] reduces the event history into the
//!    final report.
//!
//! Nothing here performs I/O or keeps global state; every component is owned
//! by exactly one session.

/// Analysis settings, exercise catalog, and configuration errors
pub mod config;

/// Raw keypoints to canonical skeleton frames
pub mod normalizer;

/// Multi-source skeleton fusion
pub mod fusion;

/// Per-frame feature extraction
pub mod features;

/// Sliding feature window
pub mod history;

/// Phase and rep state machine
pub mod state_machine;

/// Rep scoring and feedback
pub mod scoring;

/// End-of-session report
pub mod aggregator;

pub use aggregator::{SessionAggregator, SessionContext};
pub use config::{AnalysisConfig, ConfigError, ExerciseCatalog, ExerciseProfile, ResolvedExercise};
pub use features::FeatureExtractor;
pub use fusion::EnsembleFuser;
pub use history::FeatureHistory;
pub use normalizer::{KeypointNormalizer, NormalizeOutcome};
pub use scoring::{session_score, Feedback, FeedbackGenerator, RepScorer};
pub use state_machine::{Calibration, ExerciseState, PhaseMachine, StepOutcome};
