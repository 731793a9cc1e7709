// ABOUTME: Pose source abstraction feeding raw keypoint frames into a session
// ABOUTME: JSON-lines replay and in-process channel implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pose Sources
//!
//! A pose source wraps an external pose-estimation model. The engine only sees
//! its output: timestamped lists of named joints with confidences.

use crate::errors::SourceError;
use async_trait::async_trait;
use pierre_movement_core::models::RawPoseFrame;

/// In-process source fed through a tokio channel
pub mod channel;
/// Replay of a recorded JSON-lines keypoint file
pub mod jsonl;

pub use channel::ChannelSource;
pub use jsonl::JsonLinesSource;

/// Producer of raw pose frames
#[async_trait]
pub trait PoseSource: Send {
    /// Name used to look up the source's trust weight
    fn name(&self) -> &str;

    /// Wait for the next frame
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or yields an unreadable record
    async fn next_frame(&mut self) -> Result<Option<RawPoseFrame>, SourceError>;
}
