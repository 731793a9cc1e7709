// ABOUTME: Configuration error types for analysis engine validation
// ABOUTME: Defines error variants for invalid ranges, parse failures, and inconsistent profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for analysis engine validation.

use pierre_movement_core::errors::{AppError, ErrorCode};
use std::env;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., a confidence not between 0 and 1)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Environment variable access error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Weights don't sum to the required total
    #[error("Invalid weights: {0}")]
    InvalidWeights(&'static str),

    /// An exercise profile is internally inconsistent
    #[error("Invalid exercise profile '{id}': {reason}")]
    InvalidProfile {
        /// Exercise identifier
        id: String,
        /// What is wrong with it
        reason: &'static str,
    },
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let code = match &error {
            ConfigError::InvalidRange(_) | ConfigError::InvalidWeights(_) => {
                ErrorCode::ValueOutOfRange
            }
            ConfigError::EnvVar(_) | ConfigError::Parse(_) => ErrorCode::InvalidInput,
            ConfigError::InvalidProfile { .. } => ErrorCode::ConfigInvalid,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
