// ABOUTME: Events emitted while a session runs: phase transitions, reps, rejections, scores
// ABOUTME: The session report is a pure reduction over this event history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::feature::{Feature, FeatureStatsTable};
use super::feedback::ViolationKind;
use super::phase::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A counted repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRecord {
    /// 1-based rep number
    pub index: u32,
    /// Entry into `ACTIVE_DOWN` for this cycle
    pub started_ms: u64,
    /// Entry into `ACTIVE_UP` (the rep's turnaround point)
    pub turnaround_ms: u64,
    /// Timestamp at which the rep was confirmed
    pub completed_ms: u64,
    /// Range covered by the primary feature during the cycle
    pub range_of_motion: f64,
    /// Feature extremes observed during the cycle
    pub stats: FeatureStatsTable,
    /// Mean coverage confidence of the cycle's frames
    pub mean_confidence: f64,
}

impl RepRecord {
    /// Descent start to turnaround
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.turnaround_ms.saturating_sub(self.started_ms)
    }
}

/// Why a DOWN -> UP cycle was not counted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The primary feature did not travel far enough
    LimitedRange {
        /// Observed range
        range: f64,
        /// Required range
        required: f64,
    },
    /// The cycle took longer than the exercise allows
    TooSlow {
        /// Observed duration
        duration_ms: u64,
        /// Allowed duration
        limit_ms: u64,
    },
}

impl RejectionReason {
    /// Feedback catalog key for this rejection
    #[must_use]
    pub const fn violation_kind(&self) -> ViolationKind {
        match self {
            Self::LimitedRange { .. } => ViolationKind::LimitedRange,
            Self::TooSlow { .. } => ViolationKind::SlowRep,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitedRange { range, required } => {
                write!(f, "range of motion {range:.1} below required {required:.1}")
            }
            Self::TooSlow {
                duration_ms,
                limit_ms,
            } => write!(f, "rep took {duration_ms} ms, limit is {limit_ms} ms"),
        }
    }
}

/// One ideal-range violation found in a rep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Catalog key
    pub kind: ViolationKind,
    /// Feature that fell outside its range
    pub feature: Feature,
    /// Observed extreme
    pub observed: f64,
    /// Lower bound of the ideal range
    pub ideal_min: f64,
    /// Upper bound of the ideal range
    pub ideal_max: f64,
    /// Points deducted
    pub penalty: f64,
}

/// Form score of one counted rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepScore {
    /// Rep this score belongs to
    pub rep_index: u32,
    /// Score in [0, 100]
    pub score: f64,
    /// Weight of this rep in the session score
    pub confidence: f64,
    /// Violations behind the deductions
    pub violations: Vec<Violation>,
}

/// Why a session reached `COMPLETE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The exercise's time limit elapsed
    TimeLimit,
    /// The exercise's target rep count was reached
    TargetReps,
    /// The caller stopped the session
    Stopped,
    /// The pose source stopped producing frames
    Interrupted,
}

/// Everything that happened during a session, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A phase was entered
    PhaseChanged {
        /// Phase left
        from: Phase,
        /// Phase entered
        to: Phase,
        /// Transition timestamp
        at_ms: u64,
    },
    /// A provisional phase shorter than the minimum dwell was undone
    PhaseRolledBack {
        /// Discarded phase
        discarded: Phase,
        /// Phase restored
        restored: Phase,
        /// Timestamp of the frame that triggered the rollback
        at_ms: u64,
    },
    /// A rep was counted
    RepCompleted(Box<RepRecord>),
    /// A cycle finished but was not counted
    RepRejected {
        /// Descent start of the rejected cycle
        started_ms: u64,
        /// Rejection timestamp
        at_ms: u64,
        /// Why it was rejected
        reason: RejectionReason,
    },
    /// A counted rep was scored
    RepScored(RepScore),
    /// The session reached `COMPLETE`
    SessionCompleted {
        /// Completion timestamp
        at_ms: u64,
        /// What ended the session
        reason: CompletionReason,
    },
}
