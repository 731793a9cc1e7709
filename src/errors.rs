// ABOUTME: Pose-source error type for the session runtime and its conversion into AppError
// ABOUTME: Re-exports the unified error types from the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Analysis itself never fails: bad frames are skipped and explained in the
//! report. Errors only come from the edges, reading pose sources and loading
//! configuration.

use std::io;
use thiserror::Error;

pub use pierre_movement_core::errors::{AppError, AppResult, ErrorCode};

/// Failure reading frames from a pose source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying stream could not be read
    #[error("failed to read pose source '{source_name}'")]
    Io {
        /// Source that failed
        source_name: String,
        /// I/O failure
        #[source]
        error: io::Error,
    },

    /// A record could not be parsed as a pose frame
    #[error("malformed record on line {line} of pose source '{source_name}'")]
    Malformed {
        /// Source that produced the record
        source_name: String,
        /// 1-based line number
        line: usize,
        /// Parse failure
        #[source]
        error: serde_json::Error,
    },
}

impl SourceError {
    /// Name of the source the error came from
    #[must_use]
    pub fn source_name(&self) -> &str {
        match self {
            Self::Io { source_name, .. } | Self::Malformed { source_name, .. } => source_name,
        }
    }
}

impl From<SourceError> for AppError {
    fn from(error: SourceError) -> Self {
        let code = match &error {
            SourceError::Malformed { .. } => ErrorCode::SourceMalformed,
            SourceError::Io { .. } => ErrorCode::SourceUnavailable,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
