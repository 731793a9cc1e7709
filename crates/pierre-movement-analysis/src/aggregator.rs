// ABOUTME: Session aggregator reducing the event history into the final session report
// ABOUTME: Phase timing, rep and score summaries, symmetry, and the explained confidence score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Aggregator
//!
//! A pure reduction: the same events, feature statistics, and frame counts
//! always produce the same report. The phase timeline is rebuilt from
//! `PhaseChanged` and `PhaseRolledBack` events alone.

#![allow(clippy::cast_precision_loss)] // frame counters stay far below 2^52

use crate::config::{AnalysisConfig, ConfidenceConfig, ResolvedExercise};
use crate::scoring::{session_score, FeedbackGenerator};
use chrono::{DateTime, Utc};
use pierre_movement_core::models::{
    CompletionReason, ConfidenceSummary, Feature, FeatureStatsTable, FeatureSummary, FrameStats,
    Phase, PhaseDuration, PhaseInterval, RejectionReason, Reliability, RepRecord, RepScore,
    RepSummary, SessionEvent, SessionReport, SessionStatus,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Asymmetry ratio mapped to a symmetry score of zero
const MAX_ASYMMETRY_RATIO: f64 = 2.0;

/// Fraction of skipped frames that points at partial framing
const PARTIAL_FRAMING_SKIP_FRACTION: f64 = 0.2;

/// Fraction of analyzed frames with good confidence below which lighting is suspected
const POOR_LIGHTING_GOOD_FRACTION: f64 = 0.7;

/// Ensemble consensus rate below which the camera angle is suspected
const CAMERA_ANGLE_CONSENSUS_RATE: f64 = 0.8;

/// Identity and timing of the session being reported
#[derive(Debug, Clone)]
pub struct SessionContext<'a> {
    /// Session identifier
    pub session_id: Uuid,
    /// Catalog lookup the session ran with
    pub exercise: &'a ResolvedExercise,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
}

/// Builds the immutable end-of-session report
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    feedback: FeedbackGenerator,
    confidence: ConfidenceConfig,
}

#[derive(Default)]
struct Reduction {
    started_ms: Option<u64>,
    ended_ms: Option<u64>,
    completion: Option<CompletionReason>,
    timeline: Vec<PhaseInterval>,
    current: Option<(Phase, u64)>,
    reps: Vec<RepRecord>,
    scores: Vec<RepScore>,
    rejections: Vec<RejectionReason>,
}

impl Reduction {
    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::PhaseChanged { from, to, at_ms } => {
                if *from == Phase::Idle {
                    self.started_ms.get_or_insert(*at_ms);
                }
                if let Some((phase, start_ms)) = self.current.take() {
                    self.timeline.push(PhaseInterval {
                        phase,
                        start_ms,
                        end_ms: *at_ms,
                    });
                }
                if *to != Phase::Complete {
                    self.current = Some((*to, *at_ms));
                }
            }
            SessionEvent::PhaseRolledBack { restored, .. } => {
                if let Some(previous) = self.timeline.pop() {
                    self.current = Some((*restored, previous.start_ms));
                }
            }
            SessionEvent::RepCompleted(rep) => self.reps.push(RepRecord::clone(rep)),
            SessionEvent::RepRejected { reason, .. } => self.rejections.push(*reason),
            SessionEvent::RepScored(score) => self.scores.push(score.clone()),
            SessionEvent::SessionCompleted { at_ms, reason } => {
                self.ended_ms = Some(*at_ms);
                self.completion = Some(*reason);
            }
        }
    }
}

impl SessionAggregator {
    /// Aggregator for the resolved exercise
    #[must_use]
    pub fn new(config: &AnalysisConfig, exercise: &ResolvedExercise) -> Self {
        Self {
            feedback: FeedbackGenerator::new(config, &exercise.profile),
            confidence: config.confidence.clone(),
        }
    }

    /// Reduce a session's history into its report
    #[must_use]
    pub fn aggregate(
        &self,
        context: &SessionContext<'_>,
        events: &[SessionEvent],
        feature_stats: &FeatureStatsTable,
        frames: FrameStats,
    ) -> SessionReport {
        let mut reduction = Reduction::default();
        for event in events {
            reduction.apply(event);
        }

        let completion = reduction.completion.unwrap_or_else(|| {
            warn!("Aggregating a session that never completed");
            CompletionReason::Stopped
        });
        let duration_ms = match (reduction.started_ms, reduction.ended_ms) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        };

        let reps: Vec<RepSummary> = reduction
            .reps
            .iter()
            .map(|rep| RepSummary {
                index: rep.index,
                started_ms: rep.started_ms,
                duration_ms: rep.duration_ms(),
                range_of_motion: rep.range_of_motion,
                score: reduction
                    .scores
                    .iter()
                    .find(|score| score.rep_index == rep.index)
                    .map(|score| score.score),
                confidence: rep.mean_confidence,
            })
            .collect();

        let feedback = self.feedback.generate(&reduction.scores, &reduction.rejections);
        let confidence = self.confidence(&frames);
        let profile = &context.exercise.profile;
        let rep_count = u32::try_from(reduction.reps.len()).unwrap_or(u32::MAX);

        let report = SessionReport {
            session_id: context.session_id,
            exercise_id: context.exercise.requested_id.clone(),
            exercise_name: profile.name.clone(),
            used_fallback: context.exercise.used_fallback,
            started_at: context.started_at,
            status: SessionStatus::from(completion),
            completion,
            duration_ms,
            rep_count,
            rejected_reps: u32::try_from(reduction.rejections.len()).unwrap_or(u32::MAX),
            reps,
            phase_durations: phase_durations(&reduction.timeline),
            features: feature_summaries(feature_stats),
            session_score: session_score(&reduction.scores),
            best_rep_score: reduction
                .scores
                .iter()
                .map(|score| score.score)
                .max_by(f64::total_cmp),
            average_rep_score: average(reduction.scores.iter().map(|score| score.score)),
            symmetry_score: symmetry_score(feature_stats),
            confidence,
            frames,
            feedback: feedback.items,
            drills: feedback.drills,
            rating: profile.standards.map(|standards| standards.rate(rep_count)),
            interruption: (completion == CompletionReason::Interrupted)
                .then(|| interruption_message(duration_ms, rep_count)),
            phase_timeline: reduction.timeline,
        };

        info!(
            session_id = %report.session_id,
            exercise = %report.exercise_id,
            reps = report.rep_count,
            status = ?report.status,
            confidence = report.confidence.score,
            "Session report ready"
        );
        report
    }

    /// Session confidence with tiered explanation
    ///
    /// The score is the good-frame fraction. With an ensemble it is lowered
    /// by the mean disagreement; sources in full agreement leave it unchanged.
    #[must_use]
    pub fn confidence(&self, frames: &FrameStats) -> ConfidenceSummary {
        let good = frames.good_fraction();
        let fraction = frames.consensus_rate().map_or(good, |consensus| {
            let disagreement = (1.0 - consensus).clamp(0.0, 1.0);
            good * self.confidence.consensus_weight.mul_add(-disagreement, 1.0)
        });
        let score = (fraction * 100.0).clamp(0.0, 100.0);

        let below_floor = score < self.confidence.floor_percent;
        ConfidenceSummary {
            score,
            reliability: Reliability::from_score(score),
            explanation: confidence_explanation(score).into(),
            likely_causes: if below_floor {
                likely_causes(frames)
            } else {
                Vec::new()
            },
            camera_tips: if below_floor {
                CAMERA_TIPS.iter().map(|tip| (*tip).into()).collect()
            } else {
                Vec::new()
            },
        }
    }
}

fn phase_durations(timeline: &[PhaseInterval]) -> Vec<PhaseDuration> {
    Phase::ALL
        .into_iter()
        .filter(|phase| *phase != Phase::Complete)
        .map(|phase| {
            let stays = timeline.iter().filter(|interval| interval.phase == phase);
            PhaseDuration {
                phase,
                total_ms: stays.clone().map(PhaseInterval::duration_ms).sum(),
                intervals: u32::try_from(stays.count()).unwrap_or(u32::MAX),
            }
        })
        .collect()
}

fn feature_summaries(stats: &FeatureStatsTable) -> Vec<FeatureSummary> {
    stats
        .iter()
        .map(|(feature, stat)| FeatureSummary {
            feature,
            min: stat.min,
            max: stat.max,
            avg: stat.mean(),
        })
        .collect()
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

/// 100 for mirrored movement, falling linearly to 0 at twice the asymmetry threshold
fn symmetry_score(stats: &FeatureStatsTable) -> Option<f64> {
    let ratio = average(
        Feature::ASYMMETRIES
            .into_iter()
            .filter_map(|feature| stats.get(feature).map(|stat| stat.mean())),
    )?;
    Some(100.0 * (1.0 - ratio.clamp(0.0, MAX_ASYMMETRY_RATIO) / MAX_ASYMMETRY_RATIO))
}

fn confidence_explanation(score: f64) -> &'static str {
    if score >= 95.0 {
        "Excellent confidence: optimal detection quality throughout the session."
    } else if score >= 90.0 {
        "Very high confidence: clear video and precise pose detection throughout."
    } else if score >= 85.0 {
        "High confidence: reliable measurements with consistent pose tracking."
    } else if score >= 75.0 {
        "Good confidence: the body was detected clearly in most frames."
    } else if score >= 60.0 {
        "Moderate confidence: acceptable detection quality, consider improving lighting or camera angle."
    } else {
        "Lower confidence: video quality or lighting affected the analysis. Follow the camera tips for better results."
    }
}

const CAMERA_TIPS: [&str; 4] = [
    "Position the camera 3-5 meters away from the exercise area",
    "Ensure good lighting and avoid backlighting",
    "Keep the entire body in frame throughout the exercise",
    "Use a side view (90 degrees) for best results",
];

fn likely_causes(frames: &FrameStats) -> Vec<String> {
    if frames.received == 0 {
        return vec!["No frames were received from the camera".into()];
    }

    let mut causes = Vec::new();
    let skipped = frames.skipped as f64 / frames.received as f64;
    if skipped > PARTIAL_FRAMING_SKIP_FRACTION {
        causes.push(format!(
            "Partial framing: required joints were out of view in {:.0}% of frames",
            skipped * 100.0
        ));
    }
    if frames.analyzed > 0
        && (frames.good as f64 / frames.analyzed as f64) < POOR_LIGHTING_GOOD_FRACTION
    {
        causes.push("Poor lighting: joints were detected with low confidence".into());
    }
    if frames
        .consensus_rate()
        .is_some_and(|rate| rate < CAMERA_ANGLE_CONSENSUS_RATE)
    {
        causes.push("Camera angle: pose sources disagreed on joint positions".into());
    }
    if frames.dropped > frames.received / 4 {
        causes.push("Processing fell behind and frames were dropped".into());
    }
    if causes.is_empty() {
        causes.push("Too few frames were analyzed with good detection quality".into());
    }
    causes
}

fn interruption_message(duration_ms: u64, rep_count: u32) -> String {
    format!(
        "The camera stopped sending frames. This report covers the first {:.1} s of the session ({rep_count} reps counted).",
        duration_ms as f64 / 1000.0
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ExerciseCatalog;

    fn aggregator() -> (SessionAggregator, ResolvedExercise) {
        let exercise = ExerciseCatalog::builtin().resolve("squat");
        (
            SessionAggregator::new(&AnalysisConfig::default(), &exercise),
            exercise,
        )
    }

    fn changed(from: Phase, to: Phase, at_ms: u64) -> SessionEvent {
        SessionEvent::PhaseChanged { from, to, at_ms }
    }

    #[test]
    fn test_timeline_is_rebuilt_with_rollbacks() {
        let (aggregator, exercise) = aggregator();
        let events = vec![
            changed(Phase::Idle, Phase::Setup, 0),
            changed(Phase::Setup, Phase::ActiveDown, 500),
            changed(Phase::ActiveDown, Phase::ActiveUp, 1_000),
            SessionEvent::PhaseRolledBack {
                discarded: Phase::ActiveUp,
                restored: Phase::ActiveDown,
                at_ms: 1_050,
            },
            changed(Phase::ActiveDown, Phase::Complete, 1_500),
            SessionEvent::SessionCompleted {
                at_ms: 1_500,
                reason: CompletionReason::Stopped,
            },
        ];
        let context = SessionContext {
            session_id: Uuid::new_v4(),
            exercise: &exercise,
            started_at: Utc::now(),
        };
        let report = aggregator.aggregate(
            &context,
            &events,
            &FeatureStatsTable::default(),
            FrameStats::default(),
        );

        assert_eq!(report.duration_ms, 1_500);
        assert_eq!(report.status, SessionStatus::Stopped);
        assert_eq!(
            report.phase_timeline,
            vec![
                PhaseInterval {
                    phase: Phase::Setup,
                    start_ms: 0,
                    end_ms: 500
                },
                PhaseInterval {
                    phase: Phase::ActiveDown,
                    start_ms: 500,
                    end_ms: 1_500
                },
            ]
        );
        let down = report
            .phase_durations
            .iter()
            .find(|duration| duration.phase == Phase::ActiveDown)
            .unwrap();
        assert_eq!((down.total_ms, down.intervals), (1_000, 1));
    }

    #[test]
    fn test_confidence_discounts_disagreement() {
        let (aggregator, _) = aggregator();
        let single = FrameStats {
            received: 10,
            analyzed: 10,
            good: 9,
            ..FrameStats::default()
        };
        assert!((aggregator.confidence(&single).score - 90.0).abs() < 1e-9);

        let fused = FrameStats {
            fused: 10,
            consensus_sum: 5.0,
            ..single
        };
        // 0.9 * (1 - 0.3 * 0.5) = 0.765
        let summary = aggregator.confidence(&fused);
        assert!((summary.score - 76.5).abs() < 1e-9);
        assert!(summary.likely_causes.is_empty());
    }

    #[test]
    fn test_low_confidence_is_explained() {
        let (aggregator, _) = aggregator();
        let frames = FrameStats {
            received: 10,
            analyzed: 5,
            skipped: 5,
            good: 2,
            ..FrameStats::default()
        };
        let summary = aggregator.confidence(&frames);
        assert_eq!(summary.reliability, Reliability::Low);
        assert_eq!(summary.likely_causes.len(), 2);
        assert!(summary.likely_causes[0].starts_with("Partial framing"));
        assert_eq!(summary.camera_tips.len(), 4);
    }

    #[test]
    fn test_symmetry_score_scale() {
        let mut stats = FeatureStatsTable::default();
        assert_eq!(symmetry_score(&stats), None);
        stats.observe_value(Feature::KneeAsymmetry, 0.0);
        assert!((symmetry_score(&stats).unwrap() - 100.0).abs() < f64::EPSILON);
        stats.observe_value(Feature::KneeAsymmetry, 2.0);
        assert!((symmetry_score(&stats).unwrap() - 50.0).abs() < f64::EPSILON);
    }
}
