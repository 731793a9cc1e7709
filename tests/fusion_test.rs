// ABOUTME: Integration tests for trust-weighted fusion of ensemble pose sources
// ABOUTME: Identical sources are neutral, disagreeing joints are down-weighted and flagged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::squat_frame_from;
use pierre_movement_analysis::{
    AnalysisConfig, EnsembleFuser, ExerciseCatalog, FeatureExtractor, KeypointNormalizer,
};
use pierre_movement_core::models::{Joint, RawPoseFrame, SkeletonFrame};

fn rescale(raw: &RawPoseFrame) -> SkeletonFrame {
    let exercise = ExerciseCatalog::builtin().resolve("squat");
    KeypointNormalizer::new(&AnalysisConfig::default(), &exercise.profile)
        .rescale(raw)
        .frame()
        .unwrap()
}

#[test]
fn test_identical_sources_are_neutral() {
    common::init_test_logging();
    let config = AnalysisConfig::default();
    let primary = rescale(&squat_frame_from("primary", 100, 120.0, 0.9));
    let secondary = rescale(&squat_frame_from("secondary", 100, 120.0, 0.9));

    let fused = EnsembleFuser::new(&config)
        .fuse(&[primary.clone(), secondary])
        .unwrap();
    assert_eq!(fused.source, "ensemble");
    assert_eq!(fused.source_count, 2);
    assert!(fused.low_consensus.is_empty());
    assert_eq!(fused.joints, primary.joints);
    assert_eq!(fused.consensus_rate(), Some(1.0));

    let extractor = FeatureExtractor::new(&config);
    let single_features = extractor.extract(&primary, None);
    let fused_features = extractor.extract(&fused, None);
    assert_eq!(fused_features.values, single_features.values);
    assert!(
        (fused_features.coverage_confidence - single_features.coverage_confidence).abs() < 1e-12
    );
}

#[test]
fn test_disagreeing_joint_is_down_weighted_and_flagged() {
    let config = AnalysisConfig::default();
    let primary = rescale(&squat_frame_from("primary", 100, 170.0, 0.9));
    let mut raw_secondary = squat_frame_from("secondary", 100, 170.0, 0.9);
    for keypoint in &mut raw_secondary.keypoints {
        if keypoint.name == "LEFT_KNEE" {
            keypoint.x += 0.2;
        }
    }
    let secondary = rescale(&raw_secondary);

    let fused = EnsembleFuser::new(&config)
        .fuse(&[secondary, primary])
        .unwrap();
    assert_eq!(fused.low_consensus, vec![Joint::LeftKnee]);

    let knee = fused.joint(Joint::LeftKnee).unwrap();
    let expected = 0.9 * config.fusion.min_agreement_factor;
    assert!((knee.confidence - expected).abs() < 1e-9);
    // Fused position lies between the sources, closer to the more trusted primary
    assert!(knee.position.x > 0.45 && knee.position.x < 0.55);

    let rate = fused.consensus_rate().unwrap();
    assert!(rate < 1.0);
}

#[test]
fn test_joint_from_one_source_is_kept_as_is() {
    let config = AnalysisConfig::default();
    let mut raw_primary = squat_frame_from("primary", 100, 170.0, 0.9);
    raw_primary.keypoints.retain(|keypoint| keypoint.name != "NOSE");
    let primary = rescale(&raw_primary);
    let secondary = rescale(&squat_frame_from("secondary", 100, 170.0, 0.8));

    let fused = EnsembleFuser::new(&config).fuse(&[primary, secondary]).unwrap();
    let nose = fused.joint(Joint::Nose).unwrap();
    assert!((nose.confidence - 0.8).abs() < 1e-9);
    assert_eq!(fused.shared_joints, 12);
}

#[test]
fn test_zero_confidence_placeholder_does_not_contribute() {
    let config = AnalysisConfig::default();
    let primary = rescale(&squat_frame_from("primary", 100, 120.0, 0.9));
    let mut raw_secondary = squat_frame_from("secondary", 100, 120.0, 0.9);
    for keypoint in &mut raw_secondary.keypoints {
        if keypoint.name == "LEFT_KNEE" {
            keypoint.x = 0.0;
            keypoint.y = 0.0;
            keypoint.confidence = 0.0;
        }
    }
    let secondary = rescale(&raw_secondary);

    let fused = EnsembleFuser::new(&config)
        .fuse(&[primary.clone(), secondary])
        .unwrap();
    assert!(fused.low_consensus.is_empty());
    assert_eq!(fused.joint(Joint::LeftKnee), primary.joint(Joint::LeftKnee));
    assert_eq!(fused.shared_joints, 12);
    assert_eq!(fused.consensus_rate(), Some(1.0));
}

#[test]
fn test_weak_joints_from_every_source_are_still_fused() {
    let config = AnalysisConfig::default();
    let primary = rescale(&squat_frame_from("primary", 100, 120.0, 0.1));
    let secondary = rescale(&squat_frame_from("secondary", 100, 120.0, 0.1));

    let fused = EnsembleFuser::new(&config).fuse(&[primary, secondary]).unwrap();
    let knee = fused.joint(Joint::LeftKnee).unwrap();
    assert!((knee.confidence - 0.1).abs() < 1e-9);
    assert_eq!(fused.shared_joints, 13);
}

#[test]
fn test_frames_from_unconfigured_sources_are_ignored() {
    let config = AnalysisConfig::default();
    let unknown = rescale(&squat_frame_from("tertiary", 100, 170.0, 0.9));
    assert!(EnsembleFuser::new(&config).fuse(&[unknown]).is_none());
}

#[test]
fn test_agreement_factor_is_monotonic() {
    let fuser = EnsembleFuser::new(&AnalysisConfig::default());
    let mut previous = fuser.agreement_factor(0.0);
    assert!((previous - 1.0).abs() < f64::EPSILON);
    for step in 1..=20 {
        let factor = fuser.agreement_factor(f64::from(step) * 0.005);
        assert!(factor <= previous);
        previous = factor;
    }
    assert!((previous - 0.5).abs() < f64::EPSILON);
}
