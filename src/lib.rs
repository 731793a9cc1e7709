// ABOUTME: Library entry point for the Pierre movement analysis engine
// ABOUTME: Wires pose sources, session runtime, configuration, and logging around the analysis crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Movement
//!
//! Real-time movement analysis for camera-based fitness assessments. Pose
//! keypoints from one or more estimation models are normalized, fused, turned
//! into joint-angle features, and run through a per-exercise phase machine
//! that counts and scores repetitions. Ending a session yields a
//! [`SessionReport`] with rep quality, phase timing, feedback, and a
//! confidence explanation.
//!
//! ## Architecture
//!
//! - **`pierre_movement_core`**: models, constants, and error codes
//! - **`pierre_movement_analysis`**: the pure per-frame pipeline and aggregation
//! - **Sources**: where frames come from (recordings, in-process channels)
//! - **Session**: the single-owner engine and its async runner
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_movement::config::MovementConfig;
//! use pierre_movement::errors::AppResult;
//! use pierre_movement::session::SessionRunner;
//! use pierre_movement::sources::{JsonLinesSource, PoseSource};
//! use pierre_movement_analysis::ExerciseCatalog;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = MovementConfig::from_environment()?;
//!     let source = JsonLinesSource::open("squat.jsonl", "primary").await?.realtime(true);
//!     let sources: Vec<Box<dyn PoseSource>> = vec![Box::new(source)];
//!
//!     let runner = SessionRunner::new(
//!         config.session,
//!         config.analysis,
//!         Arc::new(ExerciseCatalog::builtin()),
//!     );
//!     let report = runner.run("squat", sources).await;
//!     println!("{} reps, confidence {:.0}%", report.rep_count, report.confidence.score);
//!     Ok(())
//! }
//! ```

/// Session and analysis configuration
pub mod config;
/// Error types for the pose-source edge
pub mod errors;
/// Structured logging setup
pub mod logging;
/// Session engine and async runtime
pub mod session;
/// Pose source implementations
pub mod sources;

pub use pierre_movement_core::models::{SessionEvent, SessionReport, TelemetrySnapshot};
pub use session::{FrameInput, FrameOutcome, MovementSession, SessionRunner, StopHandle};
