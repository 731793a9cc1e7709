// ABOUTME: Environment variable names for analysis and session configuration overrides
// ABOUTME: Centralized so the config loaders and their tests agree on spelling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Minimum per-joint confidence (0.0 - 1.0)
pub const MIN_JOINT_CONFIDENCE: &str = "PIERRE_MOVEMENT_MIN_JOINT_CONFIDENCE";
/// Asymmetry flag threshold in degrees
pub const ASYMMETRY_THRESHOLD: &str = "PIERRE_MOVEMENT_ASYMMETRY_DEGREES";
/// Minimum phase dwell in milliseconds
pub const MIN_PHASE_DWELL_MS: &str = "PIERRE_MOVEMENT_MIN_DWELL_MS";
/// Fusion agreement epsilon (unit space)
pub const AGREEMENT_EPSILON: &str = "PIERRE_MOVEMENT_AGREEMENT_EPSILON";
/// Fusion disagreement tolerance (unit space)
pub const DISAGREEMENT_TOLERANCE: &str = "PIERRE_MOVEMENT_DISAGREEMENT_TOLERANCE";
/// Session confidence floor in percent
pub const CONFIDENCE_FLOOR: &str = "PIERRE_MOVEMENT_CONFIDENCE_FLOOR";
/// Multiplier applied to every scoring penalty
pub const PENALTY_SCALE: &str = "PIERRE_MOVEMENT_PENALTY_SCALE";
/// Feature history window in milliseconds
pub const HISTORY_WINDOW_MS: &str = "PIERRE_MOVEMENT_HISTORY_WINDOW_MS";

/// Frame queue depth between acquisition and processing (1 or 2)
pub const FRAME_QUEUE_DEPTH: &str = "PIERRE_MOVEMENT_FRAME_QUEUE_DEPTH";
/// Frame timeout in milliseconds
pub const FRAME_TIMEOUT_MS: &str = "PIERRE_MOVEMENT_FRAME_TIMEOUT_MS";
/// Ensemble pairing window in milliseconds
pub const PAIRING_WINDOW_MS: &str = "PIERRE_MOVEMENT_PAIRING_WINDOW_MS";
/// Ordered `name:trust` list of pose sources, comma separated
pub const SOURCE_TRUST: &str = "PIERRE_MOVEMENT_SOURCES";
