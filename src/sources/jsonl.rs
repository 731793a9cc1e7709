// ABOUTME: Pose source replaying recorded keypoint frames from a JSON-lines file
// ABOUTME: One RawPoseFrame per line, optionally paced in real time by frame timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::PoseSource;
use crate::errors::{AppResult, SourceError};
use async_trait::async_trait;
use pierre_movement_core::models::RawPoseFrame;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Replays one recorded pose stream
///
/// Blank lines and lines starting with `#` are ignored. Every frame is stamped
/// with the source's name, whatever the record says.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    name: String,
    lines: Lines<R>,
    line: usize,
    realtime: bool,
    clock: Option<(Instant, u64)>,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a recording on disk
    ///
    /// # Errors
    ///
    /// Returns a `SourceUnavailable` error if the file cannot be opened
    pub async fn open(path: impl AsRef<Path>, name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        let file = File::open(path.as_ref())
            .await
            .map_err(|error| SourceError::Io {
                source_name: name.clone(),
                error,
            })?;
        debug!(source = %name, path = %path.as_ref().display(), "Opened pose recording");
        Ok(Self::from_reader(name, BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    /// Source over any buffered reader
    #[must_use]
    pub fn from_reader(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            lines: reader.lines(),
            line: 0,
            realtime: false,
            clock: None,
        }
    }

    /// Release frames no faster than their timestamps advance
    #[must_use]
    pub const fn realtime(mut self, enabled: bool) -> Self {
        self.realtime = enabled;
        self
    }

    /// Read the whole recording
    ///
    /// # Errors
    ///
    /// Returns the first read or parse error, `SourceMalformed` for a bad record
    pub async fn read_all(mut self) -> AppResult<Vec<RawPoseFrame>> {
        let mut frames = Vec::new();
        while let Some(frame) = self.read_frame().await? {
            frames.push(frame);
        }
        Ok(frames)
    }

    async fn read_frame(&mut self) -> Result<Option<RawPoseFrame>, SourceError> {
        loop {
            let next = self
                .lines
                .next_line()
                .await
                .map_err(|error| SourceError::Io {
                    source_name: self.name.clone(),
                    error,
                })?;
            let Some(text) = next else {
                return Ok(None);
            };
            self.line += 1;

            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut frame: RawPoseFrame =
                serde_json::from_str(trimmed).map_err(|error| SourceError::Malformed {
                    source_name: self.name.clone(),
                    line: self.line,
                    error,
                })?;
            frame.source.clone_from(&self.name);
            return Ok(Some(frame));
        }
    }

    async fn pace(&mut self, timestamp_ms: u64) {
        let (started, first_ms) = *self
            .clock
            .get_or_insert_with(|| (Instant::now(), timestamp_ms));
        let offset = Duration::from_millis(timestamp_ms.saturating_sub(first_ms));
        sleep_until(started + offset).await;
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> PoseSource for JsonLinesSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_frame(&mut self) -> Result<Option<RawPoseFrame>, SourceError> {
        let frame = self.read_frame().await?;
        if self.realtime {
            if let Some(frame) = &frame {
                self.pace(frame.timestamp_ms).await;
            }
        }
        Ok(frame)
    }
}
