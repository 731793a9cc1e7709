// ABOUTME: Default thresholds for normalization, fusion, phase detection, and scoring
// ABOUTME: Values are policy defaults, every one of them can be overridden by configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Keypoint normalization

/// Minimum per-joint confidence for a joint to be used
pub const MIN_JOINT_CONFIDENCE: f64 = 0.3;

/// How far outside the unit square a coordinate may fall before the joint is dropped
pub const COORDINATE_TOLERANCE: f64 = 0.05;

// Ensemble fusion

/// Trust weight of the primary (real-time) pose source
pub const PRIMARY_SOURCE_TRUST: f64 = 0.55;

/// Trust weight of the secondary (higher fidelity) pose source
pub const SECONDARY_SOURCE_TRUST: f64 = 0.45;

/// Sources closer than this (unit space) are in full agreement
pub const AGREEMENT_EPSILON: f64 = 0.02;

/// Sources farther apart than this (unit space) are flagged as low consensus
pub const DISAGREEMENT_TOLERANCE: f64 = 0.08;

/// Confidence multiplier applied at (and beyond) the disagreement tolerance
pub const MIN_AGREEMENT_FACTOR: f64 = 0.5;

// Feature extraction

/// Left/right angle difference (degrees) that raises the asymmetry flag
pub const ASYMMETRY_THRESHOLD_DEGREES: f64 = 15.0;

// Phase state machine

/// Minimum dwell time in a phase before a transition out of it is accepted
pub const MIN_PHASE_DWELL_MS: u64 = 150;

// Feature history

/// Duration of the sliding feature window
pub const HISTORY_WINDOW_MS: u64 = 10_000;

/// Hard cap on the number of feature vectors kept in the window
pub const HISTORY_MAX_VECTORS: usize = 600;

// Scoring

/// Score a rep starts from before penalties
pub const BASE_REP_SCORE: f64 = 100.0;

/// Maximum number of improvement items surfaced to the athlete
pub const MAX_IMPROVEMENT_ITEMS: usize = 3;

/// Maximum number of positive items surfaced to the athlete
pub const MAX_POSITIVE_ITEMS: usize = 2;

/// Maximum number of recommended drills in a report
pub const MAX_DRILLS: usize = 3;

// Session confidence

/// Session confidence (percent) below which an explanation is required
pub const CONFIDENCE_FLOOR_PERCENT: f64 = 60.0;

/// Share of session confidence that full ensemble disagreement removes
pub const CONSENSUS_CONFIDENCE_WEIGHT: f64 = 0.3;

// Session runtime

/// Frames buffered between acquisition and processing
pub const FRAME_QUEUE_DEPTH: usize = 1;

/// Time without a frame after which the session is considered interrupted
pub const FRAME_TIMEOUT_MS: u64 = 2_000;

/// Maximum timestamp distance between paired ensemble frames
pub const ENSEMBLE_PAIRING_WINDOW_MS: u64 = 100;
