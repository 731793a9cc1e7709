// ABOUTME: Session layer running the analysis pipeline over frames from pose sources
// ABOUTME: Synchronous engine, ensemble frame pairing, and the async producer/consumer runner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Per-session engine processing one input at a time
pub mod engine;
/// Timestamp pairing of frames from several pose sources
pub mod pairing;
/// Async runtime driving a session from live sources
pub mod runner;

pub use engine::{FrameInput, FrameOutcome, MovementSession};
pub use pairing::{pair_frames, LivePairer};
pub use runner::{run_session, SessionRunner, StopHandle};
