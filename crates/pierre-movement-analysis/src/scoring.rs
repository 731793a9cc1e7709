// ABOUTME: Rep scorer and feedback generator interpreting a profile's ideal ranges
// ABOUTME: Penalty-based form scores, confidence-weighted session score, ranked feedback and drills
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Scoring
//!
//! A rep starts at the base score and loses the profile's penalty (times the
//! configured penalty scale) for every ideal range its statistics fall
//! outside of, floored at the configured minimum. The penalty table is policy:
//! profiles and configuration own it, nothing here hardcodes a deduction.

use crate::config::{AnalysisConfig, ExerciseProfile, Extreme, IdealRange};
use pierre_movement_core::models::{
    Drill, FeatureStatsTable, FeedbackItem, FeedbackKind, PositiveKind, RejectionReason,
    RepRecord, RepScore, Severity, Violation, ViolationKind,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Lowest rep score that still counts as consistent form
const CONSISTENT_FORM_SCORE: f64 = 90.0;

/// Maps rep statistics to a bounded form score
#[derive(Debug, Clone)]
pub struct RepScorer {
    base_score: f64,
    floor_score: f64,
    penalty_scale: f64,
    ideal_ranges: Vec<IdealRange>,
}

impl RepScorer {
    /// Scorer for `profile` under the configured policy
    #[must_use]
    pub fn new(config: &AnalysisConfig, profile: &ExerciseProfile) -> Self {
        Self {
            base_score: config.scoring.base_score,
            floor_score: config.scoring.floor_score,
            penalty_scale: config.scoring.penalty_scale,
            ideal_ranges: profile.ideal_ranges.clone(),
        }
    }

    /// Ideal ranges the statistics fall outside of
    ///
    /// Features never observed are not judged.
    #[must_use]
    pub fn violations(&self, stats: &FeatureStatsTable) -> Vec<Violation> {
        self.ideal_ranges
            .iter()
            .filter_map(|range| {
                let observed = observed(range, stats)?;
                (!range.contains(observed)).then(|| self.violation(range, observed))
            })
            .collect()
    }

    /// Score a counted rep
    #[must_use]
    pub fn score(&self, rep: &RepRecord) -> RepScore {
        let violations = self.violations(&rep.stats);
        let score = self.apply(&violations);
        debug!(
            rep = rep.index,
            score,
            violations = violations.len(),
            "Rep scored"
        );
        RepScore {
            rep_index: rep.index,
            score,
            confidence: rep.mean_confidence,
            violations,
        }
    }

    /// Score of a cycle still in progress
    ///
    /// Only violations that can no longer be undone count: a minimum already
    /// below its range or a maximum already above it. `None` before any
    /// checked feature has been observed.
    #[must_use]
    pub fn instantaneous(&self, stats: &FeatureStatsTable) -> Option<f64> {
        let mut judged = false;
        let mut settled = Vec::new();
        for range in &self.ideal_ranges {
            let Some(observed) = observed(range, stats) else {
                continue;
            };
            judged = true;
            let final_already = match range.extreme {
                Extreme::Min => observed < range.min,
                Extreme::Max => observed > range.max,
                Extreme::Mean => false,
            };
            if final_already {
                settled.push(self.violation(range, observed));
            }
        }
        judged.then(|| self.apply(&settled))
    }

    fn violation(&self, range: &IdealRange, observed: f64) -> Violation {
        Violation {
            kind: range.violation,
            feature: range.feature,
            observed,
            ideal_min: range.min,
            ideal_max: range.max,
            penalty: range.penalty * self.penalty_scale,
        }
    }

    fn apply(&self, violations: &[Violation]) -> f64 {
        let penalty: f64 = violations.iter().map(|violation| violation.penalty).sum();
        (self.base_score - penalty).clamp(self.floor_score, self.base_score)
    }
}

fn observed(range: &IdealRange, stats: &FeatureStatsTable) -> Option<f64> {
    let stat = stats.get(range.feature)?;
    Some(match range.extreme {
        Extreme::Min => stat.min,
        Extreme::Max => stat.max,
        Extreme::Mean => stat.mean(),
    })
}

/// Mean rep score weighted by each rep's confidence
///
/// Falls back to the plain mean when every rep has zero confidence.
#[must_use]
pub fn session_score(scores: &[RepScore]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let weight: f64 = scores.iter().map(|score| score.confidence.max(0.0)).sum();
    if weight <= 0.0 {
        return Some(average_score(scores));
    }
    let weighted: f64 = scores
        .iter()
        .map(|score| score.score * score.confidence.max(0.0))
        .sum();
    Some(weighted / weight)
}

fn average_score(scores: &[RepScore]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let count = scores.len() as f64;
    scores.iter().map(|score| score.score).sum::<f64>() / count
}

/// Ranked feedback plus the drills recommended for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    /// Positives first, then improvements by severity and frequency
    pub items: Vec<FeedbackItem>,
    /// Corrective drills
    pub drills: Vec<Drill>,
}

/// Turns rep scores and rejections into capped, ranked feedback
#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    severities: BTreeMap<ViolationKind, Severity>,
    max_improvements: usize,
    max_positives: usize,
    max_drills: usize,
}

impl FeedbackGenerator {
    /// Generator for `profile` under the configured caps
    #[must_use]
    pub fn new(config: &AnalysisConfig, profile: &ExerciseProfile) -> Self {
        let mut severities = BTreeMap::new();
        for range in &profile.ideal_ranges {
            let entry = severities.entry(range.violation).or_insert(range.severity);
            *entry = (*entry).max(range.severity);
        }
        Self {
            severities,
            max_improvements: config.scoring.max_improvements,
            max_positives: config.scoring.max_positives,
            max_drills: config.scoring.max_drills,
        }
    }

    /// Build the feedback list and drills for a session
    #[must_use]
    pub fn generate(&self, scores: &[RepScore], rejections: &[RejectionReason]) -> Feedback {
        let mut occurrences: BTreeMap<ViolationKind, u32> = BTreeMap::new();
        for score in scores {
            let mut seen: Vec<ViolationKind> =
                score.violations.iter().map(|violation| violation.kind).collect();
            seen.sort_unstable();
            seen.dedup();
            for kind in seen {
                *occurrences.entry(kind).or_default() += 1;
            }
        }
        for rejection in rejections {
            *occurrences.entry(rejection.violation_kind()).or_default() += 1;
        }

        let mut ranked: Vec<(ViolationKind, Severity, u32)> = occurrences
            .into_iter()
            .map(|(kind, count)| (kind, self.severity(kind), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));

        let mut items: Vec<FeedbackItem> = self
            .positives(scores, rejections)
            .into_iter()
            .take(self.max_positives)
            .collect();
        let improvements = ranked.iter().take(self.max_improvements);
        items.extend(improvements.clone().map(|(kind, severity, count)| FeedbackItem {
            kind: FeedbackKind::Improvement,
            code: kind.code().into(),
            severity: Some(*severity),
            message: improvement_message(*kind).into(),
            occurrences: *count,
        }));

        let drills = self.drills(improvements.map(|(kind, _, _)| *kind));
        Feedback { items, drills }
    }

    fn severity(&self, kind: ViolationKind) -> Severity {
        self.severities.get(&kind).copied().unwrap_or(match kind {
            ViolationKind::LimitedRange => Severity::Medium,
            _ => Severity::Low,
        })
    }

    fn positives(&self, scores: &[RepScore], rejections: &[RejectionReason]) -> Vec<FeedbackItem> {
        if scores.is_empty() {
            return Vec::new();
        }
        let clean = |kinds: &[ViolationKind]| {
            kinds.iter().any(|kind| self.severities.contains_key(kind))
                && scores.iter().all(|score| {
                    score
                        .violations
                        .iter()
                        .all(|violation| !kinds.contains(&violation.kind))
                })
        };

        let mut earned = Vec::new();
        if clean(&[ViolationKind::InsufficientDepth]) {
            earned.push(PositiveKind::ConsistentDepth);
        }
        if clean(&[ViolationKind::Asymmetry]) {
            earned.push(PositiveKind::GoodSymmetry);
        }
        if clean(&[ViolationKind::ExcessiveForwardLean, ViolationKind::BodyLineBreak]) {
            earned.push(PositiveKind::StableTrunk);
        }
        if scores.len() >= 2 && scores.iter().all(|score| score.score >= CONSISTENT_FORM_SCORE) {
            earned.push(PositiveKind::ConsistentForm);
        }
        if rejections.is_empty() {
            earned.push(PositiveKind::SteadyTempo);
        }

        let reps = u32::try_from(scores.len()).unwrap_or(u32::MAX);
        earned
            .into_iter()
            .map(|kind| FeedbackItem {
                kind: FeedbackKind::Positive,
                code: kind.code().into(),
                severity: None,
                message: positive_message(kind).into(),
                occurrences: reps,
            })
            .collect()
    }

    fn drills(&self, ranked: impl Iterator<Item = ViolationKind>) -> Vec<Drill> {
        let mut drills: Vec<Drill> = Vec::new();
        for drill in ranked.filter_map(drill_for) {
            if drills.iter().all(|existing| existing.name != drill.name) {
                drills.push(drill);
            }
        }
        if drills.is_empty() {
            drills.push(drill(
                "Jump Squats",
                "Explosive squat jumps focusing on full extension",
                "3 x 8",
            ));
        }
        drills.truncate(self.max_drills);
        drills
    }
}

fn drill(name: &str, description: &str, prescription: &str) -> Drill {
    Drill {
        name: name.into(),
        description: description.into(),
        prescription: prescription.into(),
    }
}

fn drill_for(kind: ViolationKind) -> Option<Drill> {
    match kind {
        ViolationKind::InsufficientDepth => Some(drill(
            "Goblet Squats",
            "Hold weight at chest, squat to full depth, focusing on knee bend",
            "3 x 10",
        )),
        ViolationKind::Asymmetry => Some(drill(
            "Banded Lateral Walks",
            "Walk sideways with resistance band around knees to strengthen hip abductors",
            "3 x 12 steps each way",
        )),
        ViolationKind::ExcessiveForwardLean => Some(drill(
            "Box Squats",
            "Squat down to a box with the chest up, pause, then drive up",
            "3 x 8",
        )),
        ViolationKind::BodyLineBreak => Some(drill(
            "Plank Hold",
            "Hold a straight line from shoulders to ankles with glutes and core braced",
            "3 x 30 s",
        )),
        ViolationKind::IncompleteExtension => Some(drill(
            "Jump Squats",
            "Explosive squat jumps focusing on full extension",
            "3 x 8",
        )),
        ViolationKind::LimitedReach => Some(drill(
            "Medicine Ball Slams",
            "Reach overhead to full extension, then slam the ball down explosively",
            "3 x 10",
        )),
        ViolationKind::LimitedRange => Some(drill(
            "Single-Leg Balance",
            "Stand on one leg and move through the full range with control",
            "3 x 30 s each side",
        )),
        ViolationKind::SlowRep => None,
    }
}

fn improvement_message(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::InsufficientDepth => "Go deeper: bend the knees until the thighs are at least parallel",
        ViolationKind::IncompleteExtension => "Finish each rep by fully extending at the top",
        ViolationKind::Asymmetry => "Keep both sides moving evenly; one side is working harder than the other",
        ViolationKind::ExcessiveForwardLean => "Keep the chest up; the torso is tipping too far forward",
        ViolationKind::BodyLineBreak => "Hold a straight line from shoulders to ankles; avoid sagging or piking the hips",
        ViolationKind::LimitedReach => "Reach further and extend the arms completely",
        ViolationKind::LimitedRange => "Use the full range of motion; some reps were too short to count",
        ViolationKind::SlowRep => "Keep a steady pace; some reps took too long to count",
    }
}

fn positive_message(kind: PositiveKind) -> &'static str {
    match kind {
        PositiveKind::ConsistentDepth => "Great depth on every rep",
        PositiveKind::GoodSymmetry => "Left and right sides moved evenly",
        PositiveKind::StableTrunk => "Torso stayed stable and well aligned",
        PositiveKind::ConsistentForm => "Form held up across the whole set",
        PositiveKind::SteadyTempo => "Steady, controlled tempo",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ExerciseCatalog;
    use pierre_movement_core::models::Feature;

    fn squat() -> ExerciseProfile {
        ExerciseCatalog::builtin().resolve("squat").profile
    }

    fn rep(index: u32, knee_min: f64, asymmetry_max: f64, confidence: f64) -> RepRecord {
        let mut stats = FeatureStatsTable::default();
        stats.observe_value(Feature::KneeAngle, 170.0);
        stats.observe_value(Feature::KneeAngle, knee_min);
        stats.observe_value(Feature::KneeAsymmetry, asymmetry_max);
        stats.observe_value(Feature::TrunkLean, 20.0);
        RepRecord {
            index,
            started_ms: 0,
            turnaround_ms: 800,
            completed_ms: 1_000,
            range_of_motion: 170.0 - knee_min,
            stats,
            mean_confidence: confidence,
        }
    }

    #[test]
    fn test_clean_rep_keeps_base_score() {
        let scorer = RepScorer::new(&AnalysisConfig::default(), &squat());
        let score = scorer.score(&rep(1, 85.0, 0.3, 0.9));
        assert!((score.score - 100.0).abs() < f64::EPSILON);
        assert!(score.violations.is_empty());
    }

    #[test]
    fn test_penalties_accumulate_and_scale() {
        let scorer = RepScorer::new(&AnalysisConfig::default(), &squat());
        let score = scorer.score(&rep(1, 95.0, 1.5, 0.9));
        assert!((score.score - 75.0).abs() < f64::EPSILON);
        assert_eq!(score.violations.len(), 2);

        let mut config = AnalysisConfig::default();
        config.scoring.penalty_scale = 10.0;
        let harsh = RepScorer::new(&config, &squat()).score(&rep(1, 95.0, 1.5, 0.9));
        assert!(harsh.score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_session_score_weights_by_confidence() {
        let scores = [
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
        assert_eq!(session_score(&[]), None);
    }

    #[test]
    fn test_instantaneous_counts_only_settled_violations() {
        let scorer = RepScorer::new(&AnalysisConfig::default(), &squat());
        let mut stats = FeatureStatsTable::default();
        assert_eq!(scorer.instantaneous(&stats), None);
        // Still descending: depth not yet judged
        stats.observe_value(Feature::KneeAngle, 140.0);
        assert!((scorer.instantaneous(&stats).unwrap() - 100.0).abs() < f64::EPSILON);
        stats.observe_value(Feature::TrunkLean, 60.0);
        assert!((scorer.instantaneous(&stats).unwrap() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_feedback_ranking_and_caps() {
        let config = AnalysisConfig::default();
        let profile = squat();
        let scorer = RepScorer::new(&config, &profile);
        let scores: Vec<RepScore> = [
            rep(1, 95.0, 0.2, 0.9),
            rep(2, 95.0, 1.4, 0.9),
            rep(3, 80.0, 1.6, 0.9),
            rep(4, 80.0, 1.2, 0.9),
        ]
        .iter()
        .map(|rep| scorer.score(rep))
        .collect();
        let rejections = [RejectionReason::TooSlow {
            duration_ms: 7_000,
            limit_ms: 6_000,
        }];

        let feedback = FeedbackGenerator::new(&config, &profile).generate(&scores, &rejections);
        let codes: Vec<&str> = feedback.items.iter().map(|item| item.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["stable_trunk", "insufficient_depth", "asymmetry", "slow_rep"]
        );
        assert_eq!(feedback.items[2].occurrences, 3);
        let drills: Vec<&str> = feedback.drills.iter().map(|drill| drill.name.as_str()).collect();
        assert_eq!(drills, vec!["Goblet Squats", "Banded Lateral Walks"]);
    }

    #[test]
    fn test_default_drill_without_violations() {
        let config = AnalysisConfig::default();
        let profile = squat();
        let scorer = RepScorer::new(&config, &profile);
        let scores = vec![scorer.score(&rep(1, 85.0, 0.1, 0.9))];
        let feedback = FeedbackGenerator::new(&config, &profile).generate(&scores, &[]);
        assert_eq!(feedback.items.len(), 2);
        assert!(feedback
            .items
            .iter()
            .all(|item| item.kind == FeedbackKind::Positive));
        assert_eq!(feedback.drills.len(), 1);
        assert_eq!(feedback.drills[0].name, "Jump Squats");
    }
}
