// ABOUTME: Generic phase/rep state machine interpreting an exercise profile over feature vectors
// ABOUTME: Hysteresis thresholds, dwell-time debounce with rollback, rep validation, exit conditions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Phase State Machine
//!
//! `IDLE → SETUP → ACTIVE_DOWN ⇄ ACTIVE_UP → COMPLETE`
//!
//! - **Hysteresis**: `ACTIVE_DOWN` is entered past the profile's `down`
//!   threshold and `ACTIVE_UP` past its `up` threshold. Values inside the band
//!   never move the machine.
//! - **Debounce**: a newly entered phase is provisional until it has lasted the
//!   minimum dwell. Leaving a provisional phase undoes it: its interval is
//!   merged back into the previous phase and nothing is counted.
//! - **Reps**: entering `ACTIVE_UP` from `ACTIVE_DOWN` creates a pending rep.
//!   It is validated and counted once the `ACTIVE_UP` phase is confirmed
//!   (dwell elapsed, or the session stops).
//!
//! The machine owns no state: `ExerciseState` is passed in and handed back
//! with the events the step produced.

use crate::config::exercises::{in_down_zone, in_up_zone};
use crate::config::{AnalysisConfig, ExerciseProfile, PhaseThresholds, Polarity};
use pierre_movement_core::models::{
    CompletionReason, Feature, FeatureStatsTable, FeatureVector, Phase, PhaseInterval,
    RejectionReason, RepRecord, SessionEvent,
};
use tracing::{debug, info};

/// Primary feature and band locked in by the adaptive profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Dominant feature
    pub primary: Feature,
    /// Band derived from the observed range
    pub thresholds: PhaseThresholds,
}

/// Frames accumulated since the last rep was settled
#[derive(Debug, Clone, Default, PartialEq)]
struct Cycle {
    stats: FeatureStatsTable,
    confidence_sum: f64,
    frames: u32,
}

impl Cycle {
    fn observe(&mut self, vector: &FeatureVector) {
        self.stats.observe(vector);
        self.confidence_sum += vector.coverage_confidence;
        self.frames += 1;
    }

    fn mean_confidence(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.confidence_sum / f64::from(self.frames)
    }
}

/// Rep awaiting confirmation of its `ACTIVE_UP` phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRep {
    started_ms: u64,
    turnaround_ms: u64,
}

/// Mutable per-session exercise state, threaded through every step
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseState {
    phase: Phase,
    entered_ms: u64,
    provisional: bool,
    ready: bool,
    rep_count: u32,
    rejected_count: u32,
    started_ms: Option<u64>,
    last_timestamp_ms: u64,
    intervals: Vec<PhaseInterval>,
    pending: Option<PendingRep>,
    cycle: Cycle,
    calibration: Option<Calibration>,
    calibration_stats: FeatureStatsTable,
    completion: Option<CompletionReason>,
}

impl Default for ExerciseState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            entered_ms: 0,
            provisional: false,
            ready: false,
            rep_count: 0,
            rejected_count: 0,
            started_ms: None,
            last_timestamp_ms: 0,
            intervals: Vec::new(),
            pending: None,
            cycle: Cycle::default(),
            calibration: None,
            calibration_stats: FeatureStatsTable::default(),
            completion: None,
        }
    }
}

impl ExerciseState {
    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Counted reps
    #[must_use]
    pub const fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Cycles rejected by validation
    #[must_use]
    pub const fn rejected_count(&self) -> u32 {
        self.rejected_count
    }

    /// Entry timestamp of the current phase
    #[must_use]
    pub const fn phase_entered_ms(&self) -> u64 {
        self.entered_ms
    }

    /// True while the current phase has not yet lasted the minimum dwell
    #[must_use]
    pub const fn is_provisional(&self) -> bool {
        self.provisional
    }

    /// Timestamp of the first analyzed frame
    #[must_use]
    pub const fn started_ms(&self) -> Option<u64> {
        self.started_ms
    }

    /// Timestamp of the newest frame or stop
    #[must_use]
    pub const fn last_timestamp_ms(&self) -> u64 {
        self.last_timestamp_ms
    }

    /// Closed phase intervals, oldest first
    #[must_use]
    pub fn intervals(&self) -> &[PhaseInterval] {
        &self.intervals
    }

    /// Feature statistics of the cycle in progress
    #[must_use]
    pub const fn cycle_stats(&self) -> &FeatureStatsTable {
        &self.cycle.stats
    }

    /// Adaptive calibration, once locked
    #[must_use]
    pub const fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    /// Why the session completed, `None` while it runs
    #[must_use]
    pub const fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    /// True once `COMPLETE` has been reached
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completion.is_some()
    }
}

/// State and events produced by one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Updated state
    pub state: ExerciseState,
    /// Events emitted by the step, in order
    pub events: Vec<SessionEvent>,
}

/// Interpreter of one exercise profile
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    profile: ExerciseProfile,
    min_dwell_ms: u64,
}

impl PhaseMachine {
    /// Machine for `profile` using the configured dwell time
    #[must_use]
    pub fn new(profile: ExerciseProfile, config: &AnalysisConfig) -> Self {
        Self {
            profile,
            min_dwell_ms: config.phases.min_dwell_ms,
        }
    }

    /// Profile being interpreted
    #[must_use]
    pub const fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    /// Feature currently driving the machine
    #[must_use]
    pub fn primary_feature(&self, state: &ExerciseState) -> Feature {
        state
            .calibration
            .map_or(self.profile.primary, |calibration| calibration.primary)
    }

    /// Fresh state for a new session
    #[must_use]
    pub fn initial_state(&self) -> ExerciseState {
        ExerciseState::default()
    }

    /// Advance the machine by one feature vector
    #[must_use]
    pub fn step(&self, state: ExerciseState, vector: &FeatureVector) -> StepOutcome {
        let mut state = state;
        let mut events = Vec::new();
        if state.is_complete() {
            return StepOutcome { state, events };
        }

        let now = vector.timestamp_ms.max(state.last_timestamp_ms);
        state.last_timestamp_ms = now;

        if self.time_limit_reached(&state, now) {
            let limit_end = self.time_limit_end(&state).unwrap_or(now);
            self.finish(&mut state, &mut events, limit_end, CompletionReason::TimeLimit);
            return StepOutcome { state, events };
        }

        if state.phase == Phase::Idle {
            state.started_ms = Some(now);
            Self::enter(&mut state, &mut events, Phase::Setup, now, false);
        }

        self.confirm_if_dwelled(&mut state, &mut events, now);
        state.cycle.observe(vector);

        if self.profile.adaptive.is_some() && state.calibration.is_none() {
            self.calibrate(&mut state, vector);
        }

        if let Some(value) = vector.value(self.primary_feature(&state)) {
            self.transition(&mut state, &mut events, value, now);
        }

        if let Some(target) = self.profile.exit.target_reps {
            if state.rep_count >= target {
                self.finish(&mut state, &mut events, now, CompletionReason::TargetReps);
            }
        }

        StepOutcome { state, events }
    }

    /// End the session at `at_ms`
    ///
    /// A rep waiting for its `ACTIVE_UP` confirmation is settled; a descent
    /// without a return is not counted, but its time is recorded up to `at_ms`.
    /// Stopping a completed session changes nothing.
    #[must_use]
    pub fn stop(&self, state: ExerciseState, at_ms: u64, reason: CompletionReason) -> StepOutcome {
        let mut state = state;
        let mut events = Vec::new();
        if !state.is_complete() {
            let at_ms = at_ms.max(state.last_timestamp_ms);
            state.last_timestamp_ms = at_ms;
            self.finish(&mut state, &mut events, at_ms, reason);
        }
        StepOutcome { state, events }
    }

    fn thresholds(&self, state: &ExerciseState) -> PhaseThresholds {
        state
            .calibration
            .map_or(self.profile.thresholds, |calibration| calibration.thresholds)
    }

    fn polarity(&self, state: &ExerciseState) -> Polarity {
        if state.calibration.is_some() {
            Polarity::LowIsDown
        } else {
            self.profile.polarity
        }
    }

    fn time_limit_end(&self, state: &ExerciseState) -> Option<u64> {
        let started = state.started_ms?;
        self.profile
            .exit
            .time_limit_ms
            .map(|limit| started.saturating_add(limit))
    }

    fn time_limit_reached(&self, state: &ExerciseState, now: u64) -> bool {
        self.time_limit_end(state).is_some_and(|end| now >= end)
    }

    fn transition(&self, state: &mut ExerciseState, events: &mut Vec<SessionEvent>, value: f64, now: u64) {
        if self.profile.adaptive.is_some() && state.calibration.is_none() {
            return;
        }
        let polarity = self.polarity(state);
        let thresholds = self.thresholds(state);
        let down = in_down_zone(polarity, thresholds, value);
        let up = in_up_zone(polarity, thresholds, value);

        match state.phase {
            Phase::Setup if up => state.ready = true,
            Phase::Setup if down && state.ready => {
                Self::enter(state, events, Phase::ActiveDown, now, true);
            }
            Phase::ActiveDown if up => {
                if state.provisional {
                    Self::roll_back(state, events, now);
                } else {
                    let started_ms = state.entered_ms;
                    Self::enter(state, events, Phase::ActiveUp, now, true);
                    state.pending = Some(PendingRep {
                        started_ms,
                        turnaround_ms: now,
                    });
                }
            }
            Phase::ActiveUp if down => {
                if state.provisional {
                    Self::roll_back(state, events, now);
                } else {
                    Self::enter(state, events, Phase::ActiveDown, now, true);
                }
            }
            _ => {}
        }
    }

    fn enter(
        state: &mut ExerciseState,
        events: &mut Vec<SessionEvent>,
        phase: Phase,
        now: u64,
        provisional: bool,
    ) {
        let from = state.phase;
        if from != Phase::Idle {
            state.intervals.push(PhaseInterval {
                phase: from,
                start_ms: state.entered_ms,
                end_ms: now,
            });
        }
        state.phase = phase;
        state.entered_ms = now;
        state.provisional = provisional;
        debug!(%from, to = %phase, at_ms = now, "Phase transition");
        events.push(SessionEvent::PhaseChanged {
            from,
            to: phase,
            at_ms: now,
        });
    }

    /// Undo a provisional phase: restore the previous phase and its entry time
    fn roll_back(state: &mut ExerciseState, events: &mut Vec<SessionEvent>, now: u64) {
        let Some(previous) = state.intervals.pop() else {
            return;
        };
        let discarded = state.phase;
        if discarded == Phase::ActiveUp {
            state.pending = None;
        }
        state.phase = previous.phase;
        state.entered_ms = previous.start_ms;
        state.provisional = false;
        debug!(%discarded, restored = %previous.phase, at_ms = now, "Phase rolled back");
        events.push(SessionEvent::PhaseRolledBack {
            discarded,
            restored: previous.phase,
            at_ms: now,
        });
    }

    fn confirm_if_dwelled(&self, state: &mut ExerciseState, events: &mut Vec<SessionEvent>, now: u64) {
        if state.provisional && now.saturating_sub(state.entered_ms) >= self.min_dwell_ms {
            state.provisional = false;
            self.settle_pending(state, events, now);
        }
    }

    /// Validate and count (or reject) the pending rep
    fn settle_pending(&self, state: &mut ExerciseState, events: &mut Vec<SessionEvent>, now: u64) {
        let Some(pending) = state.pending.take() else {
            return;
        };
        let cycle = std::mem::take(&mut state.cycle);
        let primary = self.primary_feature(state);
        let range_of_motion = cycle.stats.get(primary).map_or(0.0, |stat| stat.range());
        let duration_ms = pending.turnaround_ms.saturating_sub(pending.started_ms);

        let rejection = if range_of_motion < self.profile.validation.min_range_of_motion {
            Some(RejectionReason::LimitedRange {
                range: range_of_motion,
                required: self.profile.validation.min_range_of_motion,
            })
        } else {
            self.profile
                .validation
                .max_rep_duration_ms
                .filter(|limit| duration_ms > *limit)
                .map(|limit_ms| RejectionReason::TooSlow {
                    duration_ms,
                    limit_ms,
                })
        };

        if let Some(reason) = rejection {
            state.rejected_count += 1;
            info!(%reason, started_ms = pending.started_ms, "Rep rejected");
            events.push(SessionEvent::RepRejected {
                started_ms: pending.started_ms,
                at_ms: now,
                reason,
            });
            return;
        }

        state.rep_count += 1;
        info!(
            rep = state.rep_count,
            range_of_motion,
            duration_ms,
            "Rep completed"
        );
        events.push(SessionEvent::RepCompleted(Box::new(RepRecord {
            index: state.rep_count,
            started_ms: pending.started_ms,
            turnaround_ms: pending.turnaround_ms,
            completed_ms: now,
            range_of_motion,
            mean_confidence: cycle.mean_confidence(),
            stats: cycle.stats,
        })));
    }

    fn finish(
        &self,
        state: &mut ExerciseState,
        events: &mut Vec<SessionEvent>,
        at_ms: u64,
        reason: CompletionReason,
    ) {
        if state.phase == Phase::ActiveUp {
            self.settle_pending(state, events, at_ms);
        }
        state.pending = None;
        if state.phase != Phase::Idle {
            let from = state.phase;
            state.intervals.push(PhaseInterval {
                phase: from,
                start_ms: state.entered_ms,
                end_ms: at_ms,
            });
            events.push(SessionEvent::PhaseChanged {
                from,
                to: Phase::Complete,
                at_ms,
            });
        }
        state.phase = Phase::Complete;
        state.entered_ms = at_ms;
        state.provisional = false;
        state.completion = Some(reason);
        info!(?reason, reps = state.rep_count, at_ms, "Exercise complete");
        events.push(SessionEvent::SessionCompleted { at_ms, reason });
    }

    /// Lock the adaptive profile onto the candidate with the widest range
    fn calibrate(&self, state: &mut ExerciseState, vector: &FeatureVector) {
        let Some(settings) = &self.profile.adaptive else {
            return;
        };
        for feature in &settings.candidates {
            if let Some(value) = vector.value(*feature) {
                state.calibration_stats.observe_value(*feature, value);
            }
        }

        let dominant = settings
            .candidates
            .iter()
            .filter_map(|feature| state.calibration_stats.get(*feature).map(|stat| (*feature, *stat)))
            .max_by(|a, b| a.1.range().total_cmp(&b.1.range()));
        let Some((primary, stat)) = dominant else {
            return;
        };
        if stat.range() < settings.min_activation_range {
            return;
        }

        let midpoint = f64::midpoint(stat.min, stat.max);
        let half_band = stat.range() * settings.hysteresis_fraction;
        let thresholds = PhaseThresholds {
            down: midpoint - half_band,
            up: midpoint + half_band,
        };
        state.calibration = Some(Calibration {
            primary,
            thresholds,
        });
        state.ready = stat.max >= thresholds.up;
        info!(
            %primary,
            down = thresholds.down,
            up = thresholds.up,
            "Adaptive profile calibrated"
        );
    }
}
