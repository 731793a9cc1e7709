// ABOUTME: Configuration module for the movement engine runtime
// ABOUTME: Combines analysis thresholds with session runtime settings, both environment driven
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for Pierre Movement
//!
//! - **Analysis**: thresholds of the normalizer, fuser, state machine, and scorer
//!   (defined in the analysis crate)
//! - **Session**: producer/consumer runtime settings

/// Session runtime configuration
pub mod session;

pub use pierre_movement_analysis::config::{AnalysisConfig, ConfigError};
pub use session::SessionConfig;

use pierre_movement_core::errors::AppResult;
use tracing::info;

/// Everything a session needs, loaded together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementConfig {
    /// Analysis thresholds
    pub analysis: AnalysisConfig,
    /// Runtime settings
    pub session: SessionConfig,
}

impl MovementConfig {
    /// Load both halves from the environment
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found, as `InvalidInput` for an
    /// unparsable variable or `ValueOutOfRange` for an unusable value
    pub fn from_environment() -> AppResult<Self> {
        let config = Self {
            analysis: AnalysisConfig::from_environment()?,
            session: SessionConfig::from_environment()?,
        };
        info!(
            sources = config.analysis.fusion.sources.len(),
            min_dwell_ms = config.analysis.phases.min_dwell_ms,
            frame_timeout_ms = config.session.frame_timeout_ms,
            "Movement configuration loaded"
        );
        Ok(config)
    }
}
