// ABOUTME: Session runtime configuration: frame queue depth, frame timeout, ensemble pairing window
// ABOUTME: Loaded from defaults with PIERRE_MOVEMENT_* environment overrides, then validated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_movement_analysis::ConfigError;
use pierre_movement_core::constants::{defaults, env_config};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Largest frame queue between acquisition and processing
pub const MAX_FRAME_QUEUE_DEPTH: usize = 2;

/// Producer/consumer settings of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Frames buffered per source before the oldest is dropped (1 or 2)
    pub frame_queue_depth: usize,
    /// Time without any frame after which the session is interrupted
    pub frame_timeout_ms: u64,
    /// Largest timestamp distance between frames fused together
    pub pairing_window_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_queue_depth: defaults::FRAME_QUEUE_DEPTH,
            frame_timeout_ms: defaults::FRAME_TIMEOUT_MS,
            pairing_window_ms: defaults::ENSEMBLE_PAIRING_WINDOW_MS,
        }
    }
}

impl SessionConfig {
    /// Load defaults, apply environment overrides, and validate
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed or is out of range
    pub fn from_environment() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        Self::apply_env_var(env_config::FRAME_QUEUE_DEPTH, &mut config.frame_queue_depth)?;
        Self::apply_env_var(env_config::FRAME_TIMEOUT_MS, &mut config.frame_timeout_ms)?;
        Self::apply_env_var(env_config::PAIRING_WINDOW_MS, &mut config.pairing_window_ms)?;
        config.validate()?;
        debug!(
            frame_queue_depth = config.frame_queue_depth,
            frame_timeout_ms = config.frame_timeout_ms,
            pairing_window_ms = config.pairing_window_ms,
            "Loaded session configuration"
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

    /// Check every setting is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` naming the offending setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FRAME_QUEUE_DEPTH).contains(&self.frame_queue_depth) {
            return Err(ConfigError::InvalidRange(
                "frame_queue_depth must be 1 or 2",
            ));
        }
        if self.frame_timeout_ms == 0 {
            return Err(ConfigError::InvalidRange("frame_timeout_ms must be positive"));
        }
        Ok(())
    }

    /// Frame timeout as a duration
    #[must_use]
    pub const fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }
}
