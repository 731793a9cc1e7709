// ABOUTME: Form violation kinds, positive observations, severities, feedback items, and drills
// ABOUTME: The message catalog keyed by these kinds lives with the scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold that a rep (or a rejected rep) violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Bottom of the rep not deep enough
    InsufficientDepth,
    /// Top of the rep not fully extended
    IncompleteExtension,
    /// Left and right sides moved differently
    Asymmetry,
    /// Torso tipped too far forward
    ExcessiveForwardLean,
    /// Hips sagged or piked out of a straight body line
    BodyLineBreak,
    /// Not enough arm extension on a throw or a reach
    LimitedReach,
    /// Rep rejected for too small a range of motion
    LimitedRange,
    /// Rep rejected for taking too long
    SlowRep,
}

impl ViolationKind {
    /// Stable `snake_case` identifier
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InsufficientDepth => "insufficient_depth",
            Self::IncompleteExtension => "incomplete_extension",
            Self::Asymmetry => "asymmetry",
            Self::ExcessiveForwardLean => "excessive_forward_lean",
            Self::BodyLineBreak => "body_line_break",
            Self::LimitedReach => "limited_reach",
            Self::LimitedRange => "limited_range",
            Self::SlowRep => "slow_rep",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Things the athlete did well across the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositiveKind {
    /// Every rep met the depth target
    ConsistentDepth,
    /// Left and right sides stayed within the asymmetry threshold
    GoodSymmetry,
    /// Torso stayed upright or aligned
    StableTrunk,
    /// Rep scores stayed high throughout
    ConsistentForm,
    /// No rep was rejected for pace or range
    SteadyTempo,
}

impl PositiveKind {
    /// Stable `snake_case` identifier
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConsistentDepth => "consistent_depth",
            Self::GoodSymmetry => "good_symmetry",
            Self::StableTrunk => "stable_trunk",
            Self::ConsistentForm => "consistent_form",
            Self::SteadyTempo => "steady_tempo",
        }
    }
}

/// Severity of an improvement item, used for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor polish
    Low,
    /// Noticeable form issue
    Medium,
    /// Form issue that undermines the movement
    High,
}

/// Positive items are always listed before improvements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    /// Something done well
    Positive,
    /// Something to correct
    Improvement,
}

/// One message surfaced to the athlete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    /// Positive or improvement
    pub kind: FeedbackKind,
    /// Catalog key (`insufficient_depth`, `good_symmetry`, ...)
    pub code: String,
    /// Severity, `None` for positives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Plain-language message
    pub message: String,
    /// Number of reps the item applies to
    pub occurrences: u32,
}

/// Corrective exercise recommended for a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drill {
    /// Drill name
    pub name: String,
    /// Why it helps
    pub description: String,
    /// Prescription (sets and reps)
    pub prescription: String,
}
