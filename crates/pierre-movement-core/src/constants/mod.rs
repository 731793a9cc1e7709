// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Engine defaults, environment variable names, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Default thresholds and limits for the analysis engine
pub mod defaults;

/// Environment variable names read by the configuration layer
pub mod env_config;

/// Service names for structured logging
pub mod service_names {
    /// Service name used by the movement engine and CLI
    pub const PIERRE_MOVEMENT: &str = "pierre-movement";
}

/// Well-known pose source identifiers
pub mod sources {
    /// Name of the first (real-time) pose source in an ensemble
    pub const PRIMARY: &str = "primary";
    /// Name of the second (higher fidelity) pose source in an ensemble
    pub const SECONDARY: &str = "secondary";
    /// Source name stamped on fused skeleton frames
    pub const ENSEMBLE: &str = "ensemble";
}
