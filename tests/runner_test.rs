// ABOUTME: Async tests of the producer/consumer session runner over in-process pose sources
// ABOUTME: Source exhaustion, frame timeout, stop handle, telemetry, latest-frame-wins, failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{relabel, squat_angles, squat_frame, squat_trace};
use pierre_movement::config::SessionConfig;
use pierre_movement::session::SessionRunner;
use pierre_movement::sources::{ChannelSource, JsonLinesSource, PoseSource};
use pierre_movement_analysis::{AnalysisConfig, ExerciseCatalog};
use pierre_movement_core::models::{CompletionReason, SessionStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

const PACE: Duration = Duration::from_millis(10);

fn runner(frame_timeout_ms: u64) -> SessionRunner {
    let config = SessionConfig {
        frame_timeout_ms,
        ..SessionConfig::default()
    };
    SessionRunner::new(
        config,
        AnalysisConfig::default(),
        Arc::new(ExerciseCatalog::builtin()),
    )
}

#[tokio::test]
async fn test_exhausted_source_yields_stopped_report() {
    common::init_test_logging();
    let (sender, source) = ChannelSource::channel("primary", 4);
    let session = tokio::spawn(runner(2_000).run("squat", vec![Box::new(source)]));

    for frame in squat_trace(&squat_angles(2, 95.0), 500) {
        sender.send(frame).await.unwrap();
        sleep(PACE).await;
    }
    drop(sender);

    let report = timeout(Duration::from_secs(5), session).await.unwrap().unwrap();
    assert_eq!(report.status, SessionStatus::Stopped);
    assert_eq!(report.rep_count, 2);
    assert_eq!(report.frames.received, 5);
    assert_eq!(report.frames.dropped, 0);
}

#[tokio::test]
async fn test_silent_source_interrupts_session() {
    let (sender, source) = ChannelSource::channel("primary", 4);
    let session = tokio::spawn(runner(50).run("squat", vec![Box::new(source)]));

    for frame in squat_trace(&[170.0, 95.0, 170.0, 95.0], 500) {
        sender.send(frame).await.unwrap();
        sleep(PACE).await;
    }

    let report = timeout(Duration::from_secs(5), session).await.unwrap().unwrap();
    assert_eq!(report.status, SessionStatus::Interrupted);
    assert_eq!(report.completion, CompletionReason::Interrupted);
    assert!(report.interruption.is_some());
    // The finished rep survives, the half-done descent does not count
    assert_eq!(report.rep_count, 1);
    drop(sender);
}

#[tokio::test]
async fn test_stop_handle_ends_session() {
    let (sender, source) = ChannelSource::channel("primary", 4);
    let runner = runner(10_000);
    let stop = runner.stop_handle();
    let session = tokio::spawn(runner.run("squat", vec![Box::new(source)]));

    sender.send(squat_frame(0, 170.0)).await.unwrap();
    sleep(PACE).await;
    stop.stop();
    assert!(stop.is_stopped());

    let report = timeout(Duration::from_secs(5), session).await.unwrap().unwrap();
    assert_eq!(report.status, SessionStatus::Stopped);
    assert_eq!(report.frames.received, 1);
    drop(sender);
}

#[tokio::test]
async fn test_telemetry_is_published_per_frame() {
    let (sender, source) = ChannelSource::channel("primary", 4);
    let (telemetry_tx, mut telemetry_rx) = mpsc::channel(16);
    let session = tokio::spawn(
        runner(2_000)
            .with_telemetry(telemetry_tx)
            .run("squat", vec![Box::new(source)]),
    );

    for frame in squat_trace(&[170.0, 95.0, 170.0], 500) {
        sender.send(frame).await.unwrap();
        sleep(PACE).await;
    }
    drop(sender);
    timeout(Duration::from_secs(5), session).await.unwrap().unwrap();

    let mut snapshots = Vec::new();
    while let Ok(snapshot) = telemetry_rx.try_recv() {
        snapshots.push(snapshot);
    }
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[2].timestamp_ms, 1_000);
}

#[tokio::test]
async fn test_backlog_is_dropped_latest_frame_wins() {
    let (sender, source) = ChannelSource::channel("primary", 16);
    for frame in squat_trace(&[170.0; 10], 33) {
        sender.send(frame).await.unwrap();
    }
    drop(sender);

    let report = runner(2_000).run("squat", vec![Box::new(source)]).await;
    assert_eq!(report.frames.received + report.frames.dropped, 10);
    assert!(report.frames.dropped > 0);
}

#[tokio::test]
async fn test_ensemble_sources_are_fused() {
    let (primary_tx, primary) = ChannelSource::channel("primary", 4);
    let (secondary_tx, secondary) = ChannelSource::channel("secondary", 4);
    let sources: Vec<Box<dyn PoseSource>> = vec![Box::new(primary), Box::new(secondary)];
    let session = tokio::spawn(runner(2_000).run("squat", sources));

    let frames = squat_trace(&squat_angles(1, 95.0), 500);
    for (first, second) in frames.iter().zip(relabel(&frames, "secondary")) {
        secondary_tx.send(second).await.unwrap();
        primary_tx.send(first.clone()).await.unwrap();
        sleep(PACE).await;
    }
    drop(primary_tx);
    drop(secondary_tx);

    let report = timeout(Duration::from_secs(5), session).await.unwrap().unwrap();
    assert_eq!(report.rep_count, 1);
    assert!(report.frames.fused > 0);
}

#[tokio::test]
async fn test_unreadable_source_interrupts_session() {
    let data = "{\"timestamp_ms\":0,\"keypoints\":[]}\n{broken\n";
    let source = JsonLinesSource::from_reader("primary", data.as_bytes());
    let report = timeout(
        Duration::from_secs(5),
        runner(2_000).run("squat", vec![Box::new(source)]),
    )
    .await
    .unwrap();
    assert_eq!(report.status, SessionStatus::Interrupted);
}
