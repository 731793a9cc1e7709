// ABOUTME: Core data models shared by the analysis engine and the session runtime
// ABOUTME: Joints, skeleton frames, feature vectors, phases, session events, and reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Core data models
//!
//! Data flows leaf to root, one frame at a time:
//! `RawPoseFrame` → `SkeletonFrame` → `FeatureVector` → `SessionEvent` → `SessionReport`.
//! Everything except the exercise state (owned by the analysis crate) is
//! immutable once produced.

/// Anatomical landmarks reported by pose sources
pub mod joint;

/// Raw pose input and canonical skeleton frames
pub mod skeleton;

/// Per-frame feature identifiers, values, and running statistics
pub mod feature;

/// Movement phases and phase intervals
pub mod phase;

/// Session events emitted by the state machine and scorer
pub mod events;

/// Feedback catalog types (violations, severities, drills)
pub mod feedback;

/// Final session report and live telemetry snapshots
pub mod report;

pub use events::{CompletionReason, RejectionReason, RepRecord, RepScore, SessionEvent, Violation};
pub use feature::{Feature, FeatureStatsTable, FeatureValue, FeatureVector, RunningStat};
pub use feedback::{Drill, FeedbackItem, FeedbackKind, PositiveKind, Severity, ViolationKind};
pub use joint::Joint;
pub use phase::{Phase, PhaseInterval};
pub use report::{
    ConfidenceSummary, FeatureSummary, FrameStats, PerformanceRating, PhaseDuration, Reliability,
    RepSummary, SessionReport, SessionStatus, TelemetrySnapshot,
};
pub use skeleton::{
    CoordinateSpace, Keypoint, Position, RawKeypoint, RawPoseFrame, SkeletonFrame, SkipReason,
};
