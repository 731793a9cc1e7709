// ABOUTME: Benchmark fixtures generating synthetic squat recordings at camera frame rates
// ABOUTME: Deterministic jitter per frame so repeated runs measure the same work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for synthetic pose streams.

use pierre_movement_core::constants::sources;
use pierre_movement_core::models::{CoordinateSpace, RawKeypoint, RawPoseFrame};

/// Frame spacing of a 30 fps camera
pub const FRAME_SPACING_MS: u64 = 33;

/// Predefined recording lengths
#[derive(Debug, Clone, Copy)]
pub enum RecordingLength {
    /// One squat (about 2 seconds)
    Single,
    /// Ten squats, a typical set
    Set,
}

impl RecordingLength {
    #[must_use]
    pub const fn reps(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Set => 10,
        }
    }
}

fn keypoint(name: &str, x: f64, y: f64) -> RawKeypoint {
    RawKeypoint {
        name: name.to_owned(),
        x,
        y,
        z: None,
        confidence: 0.9,
    }
}

/// One frame of a squat with both knees at `knee_angle`
#[must_use]
pub fn squat_frame(source: &str, timestamp_ms: u64, knee_angle: f64, jitter: f64) -> RawPoseFrame {
    let radians = knee_angle.to_radians();
    let (dx, dy) = (radians.sin() * 0.2, -radians.cos() * 0.2);
    RawPoseFrame {
        source: source.to_owned(),
        timestamp_ms,
        keypoints: vec![
            keypoint("NOSE", 0.5 + jitter, 0.15),
            keypoint("LEFT_SHOULDER", 0.45 + jitter, 0.3),
            keypoint("RIGHT_SHOULDER", 0.55 + jitter, 0.3),
            keypoint("LEFT_ELBOW", 0.43, 0.4 + jitter),
            keypoint("RIGHT_ELBOW", 0.57, 0.4 - jitter),
            keypoint("LEFT_WRIST", 0.43, 0.5),
            keypoint("RIGHT_WRIST", 0.57, 0.5),
            keypoint("LEFT_HIP", 0.45, 0.5 + jitter),
            keypoint("RIGHT_HIP", 0.55, 0.5 + jitter),
            keypoint("LEFT_KNEE", 0.45, 0.7),
            keypoint("RIGHT_KNEE", 0.55, 0.7),
            keypoint("LEFT_ANKLE", 0.45 - dx, 0.7 + dy),
            keypoint("RIGHT_ANKLE", 0.55 + dx, 0.7 + dy),
        ],
        coordinates: CoordinateSpace::Unit,
    }
}

/// Squat recording at 30 fps: each rep descends from 170 to 90 degrees and back
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn squat_recording(source: &str, length: RecordingLength) -> Vec<RawPoseFrame> {
    const FRAMES_PER_REP: usize = 60;
    let total = length.reps() * FRAMES_PER_REP + 10;
    (0..total)
        .map(|index| {
            let within = index % FRAMES_PER_REP;
            let progress = (within as f64 / FRAMES_PER_REP as f64 * std::f64::consts::TAU).cos();
            let knee_angle = 130.0 + 40.0 * progress;
            let jitter = ((index * 7) % 5) as f64 / 1000.0;
            squat_frame(source, index as u64 * FRAME_SPACING_MS, knee_angle, jitter)
        })
        .collect()
}

/// Primary recording plus the same capture as seen by a second model
#[must_use]
pub fn ensemble_recording(length: RecordingLength) -> Vec<Vec<RawPoseFrame>> {
    vec![
        squat_recording(sources::PRIMARY, length),
        squat_recording(sources::SECONDARY, length),
    ]
}
