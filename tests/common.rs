// ABOUTME: Shared test utilities for movement engine integration tests
// ABOUTME: Logging setup plus builders for synthetic pose frames and squat traces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `pierre_movement`
//!
//! Frames are synthesized from a knee angle: hips and shoulders stay put while
//! the shins swing, so the hip-knee-ankle angle equals the requested value on
//! both sides.

use pierre_movement_core::constants::sources;
use pierre_movement_core::models::{CoordinateSpace, RawKeypoint, RawPoseFrame};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Raw keypoint in unit space
pub fn keypoint(name: &str, x: f64, y: f64, confidence: f64) -> RawKeypoint {
    RawKeypoint {
        name: name.to_owned(),
        x,
        y,
        z: None,
        confidence,
    }
}

/// Standing figure facing the camera with both knees bent to `knee_angle` degrees
pub fn squat_keypoints(knee_angle: f64, confidence: f64) -> Vec<RawKeypoint> {
    let radians = knee_angle.to_radians();
    let shin = 0.2;
    let (dx, dy) = (radians.sin() * shin, -radians.cos() * shin);

    vec![
        keypoint("NOSE", 0.5, 0.15, confidence),
        keypoint("LEFT_SHOULDER", 0.45, 0.3, confidence),
        keypoint("RIGHT_SHOULDER", 0.55, 0.3, confidence),
        keypoint("LEFT_ELBOW", 0.43, 0.4, confidence),
        keypoint("RIGHT_ELBOW", 0.57, 0.4, confidence),
        keypoint("LEFT_WRIST", 0.43, 0.5, confidence),
        keypoint("RIGHT_WRIST", 0.57, 0.5, confidence),
        keypoint("LEFT_HIP", 0.45, 0.5, confidence),
        keypoint("RIGHT_HIP", 0.55, 0.5, confidence),
        keypoint("LEFT_KNEE", 0.45, 0.7, confidence),
        keypoint("RIGHT_KNEE", 0.55, 0.7, confidence),
        keypoint("LEFT_ANKLE", 0.45 - dx, 0.7 + dy, confidence),
        keypoint("RIGHT_ANKLE", 0.55 + dx, 0.7 + dy, confidence),
    ]
}

/// Squat frame from the primary source
pub fn squat_frame(timestamp_ms: u64, knee_angle: f64) -> RawPoseFrame {
    squat_frame_from(sources::PRIMARY, timestamp_ms, knee_angle, 0.9)
}

/// Squat frame from any source with a uniform joint confidence
pub fn squat_frame_from(
    source: &str,
    timestamp_ms: u64,
    knee_angle: f64,
    confidence: f64,
) -> RawPoseFrame {
    RawPoseFrame {
        source: source.to_owned(),
        timestamp_ms,
        keypoints: squat_keypoints(knee_angle, confidence),
        coordinates: CoordinateSpace::Unit,
    }
}

/// Frames at `spacing_ms` intervals following `angles`
pub fn squat_trace(angles: &[f64], spacing_ms: u64) -> Vec<RawPoseFrame> {
    angles
        .iter()
        .zip(0_u64..)
        .map(|(angle, index)| squat_frame(index * spacing_ms, *angle))
        .collect()
}

/// Knee angles for `reps` full squats to `depth`, starting and ending standing
pub fn squat_angles(reps: usize, depth: f64) -> Vec<f64> {
    let mut angles = vec![170.0];
    for _ in 0..reps {
        angles.push(depth);
        angles.push(170.0);
    }
    angles
}

/// The same frames re-labelled as another source
pub fn relabel(frames: &[RawPoseFrame], source: &str) -> Vec<RawPoseFrame> {
    frames
        .iter()
        .cloned()
        .map(|mut frame| {
            frame.source = source.to_owned();
            frame
        })
        .collect()
}
