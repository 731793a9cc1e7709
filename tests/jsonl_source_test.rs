// ABOUTME: Integration tests for replaying JSON-lines pose recordings from disk
// ABOUTME: Offline replay, live replay through the runner, real-time pacing, and unreadable files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{squat_angles, squat_trace};
use pierre_movement::config::{AnalysisConfig, SessionConfig};
use pierre_movement::errors::ErrorCode;
use pierre_movement::session::{pair_frames, run_session, MovementSession};
use pierre_movement::sources::{JsonLinesSource, PoseSource};
use pierre_movement_analysis::ExerciseCatalog;
use pierre_movement_core::models::{CompletionReason, RawPoseFrame, SessionStatus};
use std::io::Write;
use std::time::Instant;
use tempfile::NamedTempFile;

fn write_recording(frames: &[RawPoseFrame]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# synthetic squat recording").unwrap();
    for frame in frames {
        writeln!(file, "{}", serde_json::to_string(frame).unwrap()).unwrap();
    }
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_recording_replays_offline() {
    common::init_test_logging();
    let recording = write_recording(&squat_trace(&squat_angles(2, 90.0), 500));

    let frames = JsonLinesSource::open(recording.path(), "primary")
        .await
        .unwrap()
        .read_all()
        .await
        .unwrap();
    assert_eq!(frames.len(), 5);

    let catalog = ExerciseCatalog::builtin();
    let mut session = MovementSession::new("squat", &AnalysisConfig::default(), &catalog);
    for input in pair_frames(vec![frames], 100) {
        session.process(input);
    }
    let at_ms = session.last_timestamp_ms();
    let report = session.stop(at_ms, CompletionReason::Stopped);

    assert_eq!(report.rep_count, 2);
    assert_eq!(report.status, SessionStatus::Stopped);
}

#[tokio::test]
async fn test_recording_drives_live_runner() {
    let recording = write_recording(&squat_trace(&squat_angles(2, 90.0), 500));
    let source = JsonLinesSource::open(recording.path(), "primary").await.unwrap();

    let report = run_session(
        SessionConfig {
            frame_queue_depth: 2,
            ..SessionConfig::default()
        },
        AnalysisConfig::default(),
        "squat",
        vec![Box::new(source)],
    )
    .await;

    assert_eq!(report.completion, CompletionReason::Stopped);
    assert_eq!(report.frames.received + report.frames.dropped, 5);
}

#[tokio::test]
async fn test_realtime_replay_is_paced_by_timestamps() {
    let recording = write_recording(&squat_trace(&[170.0, 160.0, 150.0], 40));
    let mut source = JsonLinesSource::open(recording.path(), "primary")
        .await
        .unwrap()
        .realtime(true);

    let started = Instant::now();
    let mut timestamps = Vec::new();
    while let Some(frame) = source.next_frame().await.unwrap() {
        timestamps.push(frame.timestamp_ms);
    }

    assert_eq!(timestamps, [0, 40, 80]);
    assert!(started.elapsed().as_millis() >= 80);
}

#[tokio::test]
async fn test_missing_recording_is_source_unavailable() {
    let directory = tempfile::tempdir().unwrap();
    let result = JsonLinesSource::open(directory.path().join("absent.jsonl"), "secondary").await;

    let error = result.unwrap_err();
    assert_eq!(error.code, ErrorCode::SourceUnavailable);
    assert!(error.message.contains("'secondary'"));
    assert!(std::error::Error::source(&error).is_some());
}

#[tokio::test]
async fn test_malformed_recording_fails_the_whole_read() {
    let mut recording = write_recording(&squat_trace(&[170.0, 120.0], 500));
    writeln!(recording, "{{\"timestamp_ms\": \"late\"}}").unwrap();
    recording.flush().unwrap();

    let error = JsonLinesSource::open(recording.path(), "primary")
        .await
        .unwrap()
        .read_all()
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::SourceMalformed);
    assert!(error.message.contains("line 4"));
}
