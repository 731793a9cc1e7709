// ABOUTME: Final session report handed to the UI layer, plus the per-frame telemetry snapshot
// ABOUTME: Reports are produced once at session end and never mutated afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::events::CompletionReason;
use super::feature::Feature;
use super::feedback::{Drill, FeedbackItem};
use super::phase::{Phase, PhaseInterval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// An exit condition of the exercise was met
    Completed,
    /// The caller stopped the session
    Stopped,
    /// The pose source went away; the report covers the partial history
    Interrupted,
}

impl From<CompletionReason> for SessionStatus {
    fn from(reason: CompletionReason) -> Self {
        match reason {
            CompletionReason::TimeLimit | CompletionReason::TargetReps => Self::Completed,
            CompletionReason::Stopped => Self::Stopped,
            CompletionReason::Interrupted => Self::Interrupted,
        }
    }
}

/// Reliability label derived from the confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    /// Score above 80
    High,
    /// Score above 60
    Medium,
    /// Anything lower
    Low,
}

impl Reliability {
    /// Label for a 0-100 confidence score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Self::High
        } else if score > 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Rep-count rating against the exercise's standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    /// At or above the excellent standard
    Excellent,
    /// At or above the good standard
    Good,
    /// At or above the average standard
    Average,
    /// Below the average standard
    BelowAverage,
}

/// Frame accounting for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Frames handed to the engine (fused pairs count once)
    pub received: u64,
    /// Frames that produced a feature vector
    pub analyzed: u64,
    /// Frames rejected by the normalizer
    pub skipped: u64,
    /// Frames dropped by the runtime because processing fell behind
    pub dropped: u64,
    /// Analyzed frames whose coverage confidence reached the joint threshold
    pub good: u64,
    /// Analyzed frames that came from more than one source
    pub fused: u64,
    /// Sum of the per-frame consensus rates of fused frames
    pub consensus_sum: f64,
    /// Analyzed frames with one or more low-consensus joints
    pub low_consensus: u64,
}

impl FrameStats {
    /// Fraction of received frames that were analyzed with good confidence
    #[must_use]
    pub fn good_fraction(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.good as f64 / self.received as f64;
        fraction
    }

    /// Mean consensus rate across fused frames, `None` without an ensemble
    #[must_use]
    pub fn consensus_rate(&self) -> Option<f64> {
        if self.fused == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.consensus_sum / self.fused as f64;
        Some(rate)
    }
}

/// Time spent in one phase across the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDuration {
    /// Phase
    pub phase: Phase,
    /// Total time in the phase
    pub total_ms: u64,
    /// Number of separate stays in the phase
    pub intervals: u32,
}

/// Session-wide statistics of one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// Feature
    pub feature: Feature,
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
    /// Mean
    pub avg: f64,
}

/// One rep as listed in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepSummary {
    /// 1-based rep number
    pub index: u32,
    /// Descent start
    pub started_ms: u64,
    /// Descent start to turnaround
    pub duration_ms: u64,
    /// Range of the primary feature
    pub range_of_motion: f64,
    /// Form score, `None` if the rep was not scored
    pub score: Option<f64>,
    /// Mean coverage confidence
    pub confidence: f64,
}

/// Session confidence with its plain-language explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    /// Confidence in percent
    pub score: f64,
    /// Reliability label
    pub reliability: Reliability,
    /// Explanation of what the score means
    pub explanation: String,
    /// Likely causes when the score is below the floor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub likely_causes: Vec<String>,
    /// Camera positioning tips when the score is below the floor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub camera_tips: Vec<String>,
}

/// Final, immutable session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier
    pub session_id: Uuid,
    /// Requested exercise identifier
    pub exercise_id: String,
    /// Display name of the profile actually used
    pub exercise_name: String,
    /// True when the identifier was unknown and the adaptive profile ran
    pub used_fallback: bool,
    /// Wall-clock session start
    pub started_at: DateTime<Utc>,
    /// How the session ended
    pub status: SessionStatus,
    /// Completion trigger
    pub completion: CompletionReason,
    /// First frame to stop timestamp
    pub duration_ms: u64,
    /// Counted reps
    pub rep_count: u32,
    /// Cycles rejected by validation
    pub rejected_reps: u32,
    /// Counted reps in order
    pub reps: Vec<RepSummary>,
    /// Time per phase
    pub phase_durations: Vec<PhaseDuration>,
    /// Every phase stay in order
    pub phase_timeline: Vec<PhaseInterval>,
    /// Session-wide feature statistics
    pub features: Vec<FeatureSummary>,
    /// Confidence-weighted mean rep score
    pub session_score: Option<f64>,
    /// Best rep score
    pub best_rep_score: Option<f64>,
    /// Unweighted mean rep score
    pub average_rep_score: Option<f64>,
    /// 100 for perfectly mirrored movement, 0 at twice the asymmetry threshold
    pub symmetry_score: Option<f64>,
    /// Confidence score and explanation
    pub confidence: ConfidenceSummary,
    /// Frame accounting
    pub frames: FrameStats,
    /// Ranked feedback, positives first
    pub feedback: Vec<FeedbackItem>,
    /// Recommended corrective drills
    pub drills: Vec<Drill>,
    /// Rep-count rating when the exercise has standards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<PerformanceRating>,
    /// Plain-language note when the session was interrupted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption: Option<String>,
}

/// Per-frame overlay data, purely informational
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Frame timestamp
    pub timestamp_ms: u64,
    /// Current phase
    pub phase: Phase,
    /// Running rep count
    pub rep_count: u32,
    /// Feature driving the phase machine
    pub primary_feature: Feature,
    /// Its current value
    pub primary_value: Option<f64>,
    /// Range of motion of the primary feature across the recent history window
    pub recent_range: Option<f64>,
    /// Score of the in-progress cycle so far
    pub instantaneous_score: Option<f64>,
    /// Coverage confidence of the frame
    pub frame_confidence: f64,
}
