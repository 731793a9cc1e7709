// ABOUTME: Integration tests for rep scoring policy and session feedback generation
// ABOUTME: Penalty scaling, score bounds, confidence weighting, feedback caps, and drills
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_movement_analysis::{
    session_score, AnalysisConfig, ExerciseCatalog, ExerciseProfile, FeedbackGenerator, RepScorer,
};
use pierre_movement_core::models::{
    Feature, FeatureStatsTable, FeedbackKind, RejectionReason, RepRecord, RepScore, ViolationKind,
};

fn squat() -> ExerciseProfile {
    ExerciseCatalog::builtin().resolve("squat").profile
}

fn squat_rep(index: u32, bottom: f64, lean: f64, asymmetry: f64) -> RepRecord {
    let mut stats = FeatureStatsTable::default();
    for value in [170.0, bottom, 170.0] {
        stats.observe_value(Feature::KneeAngle, value);
    }
    stats.observe_value(Feature::TrunkLean, lean);
    stats.observe_value(Feature::KneeAsymmetry, asymmetry);
    RepRecord {
        index,
        started_ms: 0,
        turnaround_ms: 900,
        completed_ms: 1_100,
        range_of_motion: 170.0 - bottom,
        stats,
        mean_confidence: 0.9,
    }
}

#[test]
fn test_clean_rep_keeps_base_score() {
    common::init_test_logging();
    let scorer = RepScorer::new(&AnalysisConfig::default(), &squat());
    let score = scorer.score(&squat_rep(1, 85.0, 10.0, 0.2));
    assert!((score.score - 100.0).abs() < f64::EPSILON);
    assert!(score.violations.is_empty());
    assert!((score.confidence - 0.9).abs() < f64::EPSILON);
}

#[test]
fn test_every_violation_is_deducted() {
    let scorer = RepScorer::new(&AnalysisConfig::default(), &squat());
    let score = scorer.score(&squat_rep(1, 120.0, 60.0, 2.0));
    let kinds: Vec<ViolationKind> = score.violations.iter().map(|violation| violation.kind).collect();
    assert!(kinds.contains(&ViolationKind::InsufficientDepth));
    assert!(kinds.contains(&ViolationKind::ExcessiveForwardLean));
    assert!(kinds.contains(&ViolationKind::Asymmetry));
    let penalty: f64 = score.violations.iter().map(|violation| violation.penalty).sum();
    assert!((score.score - (100.0 - penalty)).abs() < 1e-9);
}

#[test]
fn test_penalty_scale_is_configuration() {
    let mut config = AnalysisConfig::default();
    let shallow = squat_rep(1, 120.0, 10.0, 0.2);
    let standard = RepScorer::new(&config, &squat()).score(&shallow).score;

    config.scoring.penalty_scale = 2.0;
    let strict = RepScorer::new(&config, &squat()).score(&shallow).score;
    assert!((100.0 - strict - 2.0 * (100.0 - standard)).abs() < 1e-9);
}

#[test]
fn test_score_never_leaves_bounds() {
    let mut config = AnalysisConfig::default();
    config.scoring.penalty_scale = 50.0;
    let score = RepScorer::new(&config, &squat())
        .score(&squat_rep(1, 150.0, 80.0, 3.0))
        .score;
    assert!((score - config.scoring.floor_score).abs() < f64::EPSILON);
}

#[test]
fn test_instantaneous_score_ignores_unsettled_checks() {
    let scorer = RepScorer::new(&AnalysisConfig::default(), &squat());
    let mut stats = FeatureStatsTable::default();
    assert!(scorer.instantaneous(&stats).is_none());

    // Mid-descent: depth not reached yet, but it still can be
    stats.observe_value(Feature::KneeAngle, 130.0);
    assert!((scorer.instantaneous(&stats).unwrap() - 100.0).abs() < f64::EPSILON);

    // Excessive lean already happened and cannot be undone
    stats.observe_value(Feature::TrunkLean, 60.0);
    assert!(scorer.instantaneous(&stats).unwrap() < 100.0);
}

#[test]
fn test_session_score_weights_by_confidence() {
    let scores = vec![
        RepScore {
            rep_index: 1,
            score: 100.0,
            confidence: 0.9,
            violations: Vec::new(),
        },
        RepScore {
            rep_index: 2,
            score: 50.0,
            confidence: 0.1,
            violations: Vec::new(),
        },
    ];
    assert!((session_score(&scores).unwrap() - 95.0).abs() < 1e-9);
    assert!(session_score(&[]).is_none());
}

#[test]
fn test_feedback_ranks_and_recommends_drills() {
    let config = AnalysisConfig::default();
    let profile = squat();
    let scorer = RepScorer::new(&config, &profile);
    let scores: Vec<RepScore> = [
        squat_rep(1, 120.0, 10.0, 2.0),
        squat_rep(2, 120.0, 10.0, 0.2),
        squat_rep(3, 118.0, 10.0, 0.2),
    ]
    .iter()
    .map(|rep| scorer.score(rep))
    .collect();

    let feedback = FeedbackGenerator::new(&config, &profile).generate(&scores, &[]);
    let improvements: Vec<&str> = feedback
        .items
        .iter()
        .filter(|item| item.kind == FeedbackKind::Improvement)
        .map(|item| item.code.as_str())
        .collect();
    assert_eq!(improvements, vec!["insufficient_depth", "asymmetry"]);

    let depth = feedback
        .items
        .iter()
        .find(|item| item.code == "insufficient_depth")
        .unwrap();
    assert_eq!(depth.occurrences, 3);

    // Positives come first
    assert_eq!(feedback.items[0].kind, FeedbackKind::Positive);
    assert!(feedback.items.iter().any(|item| item.code == "stable_trunk"));
    assert!(feedback.items.len() <= config.scoring.max_improvements + config.scoring.max_positives);

    let drills: Vec<&str> = feedback.drills.iter().map(|drill| drill.name.as_str()).collect();
    assert_eq!(drills, vec!["Goblet Squats", "Banded Lateral Walks"]);
}

#[test]
fn test_rejections_feed_feedback() {
    let config = AnalysisConfig::default();
    let profile = squat();
    let scorer = RepScorer::new(&config, &profile);
    let scores = vec![scorer.score(&squat_rep(1, 85.0, 10.0, 0.2))];
    let rejections = [RejectionReason::LimitedRange {
        range: 20.0,
        required: 40.0,
    }];

    let feedback = FeedbackGenerator::new(&config, &profile).generate(&scores, &rejections);
    assert!(feedback.items.iter().any(|item| item.code == "limited_range"));
    assert!(feedback.items.iter().all(|item| item.code != "steady_tempo"));
    assert_eq!(feedback.drills[0].name, "Single-Leg Balance");
}

#[test]
fn test_clean_session_gets_default_drill() {
    let config = AnalysisConfig::default();
    let profile = squat();
    let scorer = RepScorer::new(&config, &profile);
    let scores = vec![scorer.score(&squat_rep(1, 85.0, 10.0, 0.2))];
    let feedback = FeedbackGenerator::new(&config, &profile).generate(&scores, &[]);
    assert!(feedback
        .items
        .iter()
        .all(|item| item.kind == FeedbackKind::Positive));
    assert_eq!(feedback.drills.len(), 1);
    assert_eq!(feedback.drills[0].name, "Jump Squats");
}
