// ABOUTME: Integration tests for keypoint normalization of raw pose frames
// ABOUTME: Covers pixel rescaling, coordinate tolerance, required joints, and joint aliases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{keypoint, squat_frame, squat_keypoints};
use pierre_movement_analysis::{AnalysisConfig, ExerciseCatalog, KeypointNormalizer, NormalizeOutcome};
use pierre_movement_core::models::{CoordinateSpace, Joint, RawPoseFrame, SkipReason};

fn squat_normalizer() -> KeypointNormalizer {
    let exercise = ExerciseCatalog::builtin().resolve("squat");
    KeypointNormalizer::new(&AnalysisConfig::default(), &exercise.profile)
}

#[test]
fn test_unit_frame_passes_through() {
    common::init_test_logging();
    let frame = squat_normalizer().normalize(&squat_frame(40, 170.0)).frame().unwrap();
    assert_eq!(frame.timestamp_ms, 40);
    assert_eq!(frame.source, "primary");
    let knee = frame.joint(Joint::LeftKnee).unwrap();
    assert!((knee.position.x - 0.45).abs() < 1e-9);
    assert!((knee.position.y - 0.7).abs() < 1e-9);
}

#[test]
fn test_pixel_coordinates_are_rescaled() {
    let keypoints = squat_keypoints(170.0, 0.9)
        .into_iter()
        .map(|mut raw| {
            raw.x *= 640.0;
            raw.y *= 480.0;
            raw
        })
        .collect();
    let raw = RawPoseFrame {
        source: "primary".to_owned(),
        timestamp_ms: 0,
        keypoints,
        coordinates: CoordinateSpace::Pixel {
            width: 640.0,
            height: 480.0,
        },
    };
    let frame = squat_normalizer().normalize(&raw).frame().unwrap();
    let hip = frame.joint(Joint::RightHip).unwrap();
    assert!((hip.position.x - 0.55).abs() < 1e-9);
    assert!((hip.position.y - 0.5).abs() < 1e-9);
}

#[test]
fn test_zero_image_size_is_skipped() {
    let mut raw = squat_frame(0, 170.0);
    raw.coordinates = CoordinateSpace::Pixel {
        width: 0.0,
        height: 480.0,
    };
    assert_eq!(
        squat_normalizer().normalize(&raw),
        NormalizeOutcome::Skipped(SkipReason::InvalidDimensions)
    );
}

#[test]
fn test_slightly_out_of_frame_joint_is_clamped() {
    let mut raw = squat_frame(0, 170.0);
    raw.keypoints.push(keypoint("LEFT_HEEL", 1.03, 0.95, 0.9));
    raw.keypoints.push(keypoint("RIGHT_HEEL", 1.4, 0.95, 0.9));
    let frame = squat_normalizer().normalize(&raw).frame().unwrap();
    let heel = frame.joint(Joint::LeftHeel).unwrap();
    assert!((heel.position.x - 1.0).abs() < f64::EPSILON);
    assert!(frame.joint(Joint::RightHeel).is_none());
}

#[test]
fn test_one_visible_leg_is_enough_for_squat() {
    let mut raw = squat_frame(0, 170.0);
    raw.keypoints.retain(|raw| raw.name != "RIGHT_ANKLE");
    assert!(squat_normalizer().normalize(&raw).frame().is_some());
}

#[test]
fn test_missing_legs_report_closest_group() {
    let mut raw = squat_frame(0, 170.0);
    raw.keypoints
        .retain(|raw| raw.name != "RIGHT_ANKLE" && raw.name != "LEFT_ANKLE");
    let outcome = squat_normalizer().normalize(&raw);
    assert!(matches!(
        outcome,
        NormalizeOutcome::Skipped(SkipReason::MissingRequiredJoints { ref missing }) if missing.len() == 1
    ));
}

#[test]
fn test_low_confidence_required_joint_counts_as_missing() {
    let mut raw = squat_frame(0, 170.0);
    for keypoint in &mut raw.keypoints {
        if keypoint.name.ends_with("KNEE") {
            keypoint.confidence = 0.1;
        }
    }
    assert!(matches!(
        squat_normalizer().normalize(&raw),
        NormalizeOutcome::Skipped(SkipReason::MissingRequiredJoints { .. })
    ));
}

#[test]
fn test_joint_name_spellings_are_accepted() {
    let raw = RawPoseFrame {
        source: "primary".to_owned(),
        timestamp_ms: 0,
        keypoints: vec![
            keypoint("left_hip", 0.45, 0.5, 0.9),
            keypoint("Left-Knee", 0.45, 0.7, 0.9),
            keypoint("left ankle", 0.45, 0.9, 0.9),
            keypoint("tail", 0.5, 0.5, 0.9),
        ],
        coordinates: CoordinateSpace::Unit,
    };
    let frame = squat_normalizer().normalize(&raw).frame().unwrap();
    assert_eq!(frame.joints.len(), 3);
}

#[test]
fn test_frame_without_keypoints_is_skipped() {
    let raw = RawPoseFrame {
        source: "primary".to_owned(),
        timestamp_ms: 0,
        keypoints: Vec::new(),
        coordinates: CoordinateSpace::Unit,
    };
    assert_eq!(
        squat_normalizer().normalize(&raw),
        NormalizeOutcome::Skipped(SkipReason::NoKeypoints)
    );
}
