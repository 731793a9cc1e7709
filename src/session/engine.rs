// ABOUTME: Synchronous per-session engine wiring normalizer, fuser, extractor, machine, and scorer
// ABOUTME: Processes one frame (or one paired ensemble) at a time and builds the final report on stop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Movement Session
//!
//! Owns every piece of per-session state. Frames must be fed in arrival order
//! from a single task; nothing here is shared between sessions.

use chrono::{DateTime, Utc};
use pierre_movement_analysis::{
    AnalysisConfig, EnsembleFuser, ExerciseCatalog, ExerciseState, FeatureExtractor,
    FeatureHistory, KeypointNormalizer, NormalizeOutcome, PhaseMachine, RepScorer,
    ResolvedExercise, SessionAggregator, SessionContext,
};
use pierre_movement_core::models::{
    CompletionReason, FeatureVector, FrameStats, RawPoseFrame, SessionEvent, SessionReport,
    SkeletonFrame, SkipReason, TelemetrySnapshot,
};
use std::mem;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

/// One unit of input for the engine
#[derive(Debug, Clone, PartialEq)]
pub enum FrameInput {
    /// A frame from a single pose source
    Single(RawPoseFrame),
    /// Same-instant frames from several pose sources, fused before analysis
    Ensemble(Vec<RawPoseFrame>),
}

impl FrameInput {
    /// Timestamp the input will be analyzed at
    #[must_use]
    pub fn timestamp_ms(&self) -> Option<u64> {
        match self {
            Self::Single(frame) => Some(frame.timestamp_ms),
            Self::Ensemble(frames) => frames.first().map(|frame| frame.timestamp_ms),
        }
    }
}

/// What happened to one input
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame was analyzed
    Analyzed {
        /// Overlay data for the frame
        telemetry: TelemetrySnapshot,
        /// Events the frame produced
        events: Vec<SessionEvent>,
    },
    /// The frame could not be analyzed; the session carries on
    Skipped(SkipReason),
    /// The exercise already reached `COMPLETE`; the frame was ignored
    Finished,
}

/// Live analysis session for one athlete and one exercise
#[derive(Debug)]
pub struct MovementSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    exercise: ResolvedExercise,
    min_joint_confidence: f64,
    normalizer: KeypointNormalizer,
    fuser: EnsembleFuser,
    extractor: FeatureExtractor,
    machine: PhaseMachine,
    scorer: RepScorer,
    aggregator: SessionAggregator,
    state: ExerciseState,
    history: FeatureHistory,
    previous: Option<SkeletonFrame>,
    events: Vec<SessionEvent>,
    frames: FrameStats,
}

impl MovementSession {
    /// Start a session for `exercise_id`
    ///
    /// Unknown identifiers run the adaptive profile.
    #[must_use]
    #[instrument(skip(config, catalog))]
    pub fn new(exercise_id: &str, config: &AnalysisConfig, catalog: &ExerciseCatalog) -> Self {
        let exercise = catalog.resolve(exercise_id);
        let profile = &exercise.profile;
        let machine = PhaseMachine::new(profile.clone(), config);
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            min_joint_confidence: config.normalizer.min_joint_confidence,
            normalizer: KeypointNormalizer::new(config, profile),
            fuser: EnsembleFuser::new(config),
            extractor: FeatureExtractor::new(config),
            scorer: RepScorer::new(config, profile),
            aggregator: SessionAggregator::new(config, &exercise),
            state: machine.initial_state(),
            machine,
            history: FeatureHistory::new(&config.history),
            previous: None,
            events: Vec::new(),
            frames: FrameStats::default(),
            exercise,
        };
        info!(
            session_id = %session.id,
            profile = %session.exercise.profile.id,
            used_fallback = session.exercise.used_fallback,
            "Movement session started"
        );
        session
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Catalog lookup the session runs with
    #[must_use]
    pub const fn exercise(&self) -> &ResolvedExercise {
        &self.exercise
    }

    /// Current exercise state
    #[must_use]
    pub const fn state(&self) -> &ExerciseState {
        &self.state
    }

    /// Frame accounting so far
    #[must_use]
    pub const fn frames(&self) -> &FrameStats {
        &self.frames
    }

    /// Event history so far
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Sliding feature window
    #[must_use]
    pub const fn history(&self) -> &FeatureHistory {
        &self.history
    }

    /// True once an exit condition ended the exercise
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Count frames the runtime dropped before they reached the engine
    pub fn record_dropped(&mut self, dropped: u64) {
        self.frames.dropped += dropped;
    }

    /// Analyze one input
    pub fn process(&mut self, input: FrameInput) -> FrameOutcome {
        if self.is_complete() {
            return FrameOutcome::Finished;
        }
        self.frames.received += 1;

        let frame = match self.skeleton(&input) {
            Ok(frame) => frame,
            Err(reason) => {
                self.frames.skipped += 1;
                debug!(%reason, timestamp_ms = ?input.timestamp_ms(), "Frame skipped");
                return FrameOutcome::Skipped(reason);
            }
        };

        let vector = self.extractor.extract(&frame, self.previous.as_ref());
        self.account(&frame, &vector);
        self.previous = Some(frame);
        self.history.push(vector.clone());

        let outcome = self.machine.step(mem::take(&mut self.state), &vector);
        self.state = outcome.state;
        let events = self.record(outcome.events);

        let primary_feature = self.machine.primary_feature(&self.state);
        let telemetry = TelemetrySnapshot {
            timestamp_ms: vector.timestamp_ms,
            phase: self.state.phase(),
            rep_count: self.state.rep_count(),
            primary_feature,
            primary_value: vector.value(primary_feature),
            recent_range: self.history.window_range(primary_feature),
            instantaneous_score: self.scorer.instantaneous(self.state.cycle_stats()),
            frame_confidence: vector.coverage_confidence,
        };
        trace!(?telemetry, "Frame analyzed");
        FrameOutcome::Analyzed { telemetry, events }
    }

    /// Timestamp of the newest analyzed frame
    #[must_use]
    pub const fn last_timestamp_ms(&self) -> u64 {
        self.state.last_timestamp_ms()
    }

    /// End the session and build its report
    ///
    /// `at_ms` earlier than the newest frame is raised to it. A session whose
    /// exercise already completed keeps its original completion.
    #[must_use]
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn stop(mut self, at_ms: u64, reason: CompletionReason) -> SessionReport {
        let outcome = self.machine.stop(mem::take(&mut self.state), at_ms, reason);
        self.state = outcome.state;
        self.record(outcome.events);

        let context = SessionContext {
            session_id: self.id,
            exercise: &self.exercise,
            started_at: self.started_at,
        };
        self.aggregator.aggregate(
            &context,
            &self.events,
            self.history.session_stats(),
            self.frames,
        )
    }

    fn skeleton(&self, input: &FrameInput) -> Result<SkeletonFrame, SkipReason> {
        match input {
            FrameInput::Single(raw) => match self.normalizer.normalize(raw) {
                NormalizeOutcome::Frame(frame) => Ok(frame),
                NormalizeOutcome::Skipped(reason) => Err(reason),
            },
            FrameInput::Ensemble(raws) => {
                let mut first_skip = None;
                let mut rescaled = Vec::with_capacity(raws.len());
                for raw in raws {
                    match self.normalizer.rescale(raw) {
                        NormalizeOutcome::Frame(frame) => rescaled.push(frame),
                        NormalizeOutcome::Skipped(reason) => {
                            first_skip.get_or_insert(reason);
                        }
                    }
                }
                let fused = self
                    .fuser
                    .fuse(&rescaled)
                    .ok_or_else(|| first_skip.unwrap_or(SkipReason::NoKeypoints))?;
                self.normalizer
                    .check_required(&fused)
                    .map_or(Ok(fused), Err)
            }
        }
    }

    fn account(&mut self, frame: &SkeletonFrame, vector: &FeatureVector) {
        self.frames.analyzed += 1;
        if vector.coverage_confidence >= self.min_joint_confidence {
            self.frames.good += 1;
        }
        if let Some(rate) = frame.consensus_rate() {
            self.frames.fused += 1;
            self.frames.consensus_sum += rate;
        }
        if !frame.low_consensus.is_empty() {
            self.frames.low_consensus += 1;
        }
    }

    /// Append events to the history, scoring every completed rep
    fn record(&mut self, events: Vec<SessionEvent>) -> Vec<SessionEvent> {
        let mut recorded = Vec::with_capacity(events.len());
        for event in events {
            let score = match &event {
                SessionEvent::RepCompleted(rep) => Some(self.scorer.score(rep)),
                _ => None,
            };
            recorded.push(event);
            if let Some(score) = score {
                recorded.push(SessionEvent::RepScored(score));
            }
        }
        self.events.extend(recorded.iter().cloned());
        recorded
    }
}
