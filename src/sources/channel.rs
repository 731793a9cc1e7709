// ABOUTME: Pose source backed by a tokio mpsc channel for embedding the engine in-process
// ABOUTME: Frames are stamped with the source name; a closed channel ends the stream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::PoseSource;
use crate::errors::SourceError;
use async_trait::async_trait;
use pierre_movement_core::models::RawPoseFrame;
use tokio::sync::mpsc;

/// Receives frames pushed by a camera pipeline running in the same process
#[derive(Debug)]
pub struct ChannelSource {
    name: String,
    receiver: mpsc::Receiver<RawPoseFrame>,
}

impl ChannelSource {
    /// Source reading from `receiver`
    #[must_use]
    pub fn new(name: impl Into<String>, receiver: mpsc::Receiver<RawPoseFrame>) -> Self {
        Self {
            name: name.into(),
            receiver,
        }
    }

    /// Bounded channel plus the source reading from it
    #[must_use]
    pub fn channel(name: impl Into<String>, capacity: usize) -> (mpsc::Sender<RawPoseFrame>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (sender, Self::new(name, receiver))
    }
}

#[async_trait]
impl PoseSource for ChannelSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_frame(&mut self) -> Result<Option<RawPoseFrame>, SourceError> {
        Ok(self.receiver.recv().await.map(|mut frame| {
            frame.source.clone_from(&self.name);
            frame
        }))
    }
}
