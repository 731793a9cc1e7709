// ABOUTME: Async producer/consumer runtime driving a movement session from live pose sources
// ABOUTME: Latest-frame-wins slots per source, ensemble pairing, stop handle, and frame timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Runner
//!
//! Each pose source runs in its own producer task and publishes into a small
//! slot. When analysis falls behind, the oldest queued frame is dropped so the
//! engine always works on the freshest capture. A single consumer loop owns
//! the [`MovementSession`] and processes inputs strictly in arrival order.

use super::engine::{FrameOutcome, MovementSession};
use super::pairing::LivePairer;
use crate::config::SessionConfig;
use crate::errors::SourceError;
use crate::sources::PoseSource;
use pierre_movement_analysis::{AnalysisConfig, ExerciseCatalog};
use pierre_movement_core::models::{CompletionReason, RawPoseFrame, SessionReport, TelemetrySnapshot};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Requests that a running session stop
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Stop the session; the runner returns its report promptly
    pub fn stop(&self) {
        self.sender.send_replace(true);
    }

    /// True once a stop was requested
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Bounded per-source frame buffer
#[derive(Debug)]
struct FrameSlot {
    depth: usize,
    frames: Mutex<VecDeque<RawPoseFrame>>,
    dropped: AtomicU64,
    closed: AtomicBool,
    failure: Mutex<Option<SourceError>>,
    notify: Arc<Notify>,
}

impl FrameSlot {
    fn new(depth: usize, notify: Arc<Notify>) -> Self {
        Self {
            depth: depth.max(1),
            frames: Mutex::new(VecDeque::with_capacity(depth.max(1))),
            dropped: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            failure: Mutex::new(None),
            notify,
        }
    }

    fn push(&self, frame: RawPoseFrame) {
        {
            let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
            while frames.len() >= self.depth {
                frames.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            frames.push_back(frame);
        }
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<RawPoseFrame> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn close(&self, failure: Option<SourceError>) {
        if let Some(error) = failure {
            *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
        }
        self.closed.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    /// Closed and drained
    fn is_finished(&self) -> bool {
        self.closed.load(Ordering::Acquire)
            && self
                .frames
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
    }

    fn take_failure(&self) -> Option<SourceError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn produce(mut source: Box<dyn PoseSource>, slot: Arc<FrameSlot>) {
    loop {
        match source.next_frame().await {
            Ok(Some(frame)) => slot.push(frame),
            Ok(None) => {
                debug!(source = source.name(), "Pose source exhausted");
                slot.close(None);
                return;
            }
            Err(error) => {
                warn!(source = source.name(), %error, "Pose source failed");
                slot.close(Some(error));
                return;
            }
        }
    }
}

/// Why the consumer loop ended
#[derive(Debug)]
enum Ending {
    Completed,
    StopRequested,
    Exhausted,
    TimedOut,
    Failed(SourceError),
}

/// Drives one session from one or more pose sources
#[derive(Debug)]
pub struct SessionRunner {
    config: SessionConfig,
    analysis: AnalysisConfig,
    catalog: Arc<ExerciseCatalog>,
    telemetry: Option<mpsc::Sender<TelemetrySnapshot>>,
    stop: Arc<watch::Sender<bool>>,
}

impl SessionRunner {
    /// Runner using `config` for the runtime and `analysis` for the engine
    #[must_use]
    pub fn new(config: SessionConfig, analysis: AnalysisConfig, catalog: Arc<ExerciseCatalog>) -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            config,
            analysis,
            catalog,
            telemetry: None,
            stop: Arc::new(stop),
        }
    }

    /// Publish a snapshot per analyzed frame; a full channel drops snapshots
    #[must_use]
    pub fn with_telemetry(mut self, sender: mpsc::Sender<TelemetrySnapshot>) -> Self {
        self.telemetry = Some(sender);
        self
    }

    /// Handle that stops the session from another task
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            sender: Arc::clone(&self.stop),
        }
    }

    /// Run a session until the exercise completes, a stop is requested, the
    /// sources end, or no frame arrives within the frame timeout
    ///
    /// The first source anchors ensemble pairing; later ones contribute
    /// frames within the pairing window. A failing or silent source yields
    /// an `Interrupted` report holding everything analyzed so far.
    #[instrument(skip(self, sources), fields(sources = sources.len()))]
    pub async fn run(self, exercise_id: &str, sources: Vec<Box<dyn PoseSource>>) -> SessionReport {
        let mut session = MovementSession::new(exercise_id, &self.analysis, &self.catalog);
        let notify = Arc::new(Notify::new());
        let slots: Vec<Arc<FrameSlot>> = sources
            .iter()
            .map(|_| Arc::new(FrameSlot::new(self.config.frame_queue_depth, Arc::clone(&notify))))
            .collect();
        let producers: Vec<JoinHandle<()>> = sources
            .into_iter()
            .zip(&slots)
            .map(|(source, slot)| tokio::spawn(produce(source, Arc::clone(slot))))
            .collect();

        let mut pairer = LivePairer::new(slots.len(), self.config.pairing_window_ms);
        let ending = self
            .consume(&mut session, &slots, &mut pairer, &notify)
            .await;

        for producer in &producers {
            producer.abort();
        }
        let dropped = slots.iter().map(|slot| slot.dropped()).sum::<u64>() + pairer.dropped();
        session.record_dropped(dropped);

        let reason = match &ending {
            Ending::Completed | Ending::StopRequested | Ending::Exhausted => CompletionReason::Stopped,
            Ending::TimedOut | Ending::Failed(_) => CompletionReason::Interrupted,
        };
        if let Ending::Failed(error) = &ending {
            warn!(%error, source = error.source_name(), "Session interrupted by pose source");
        }
        info!(?ending, dropped, "Session loop ended");
        let at_ms = session.last_timestamp_ms();
        session.stop(at_ms, reason)
    }

    async fn consume(
        &self,
        session: &mut MovementSession,
        slots: &[Arc<FrameSlot>],
        pairer: &mut LivePairer,
        notify: &Notify,
    ) -> Ending {
        let mut stop = self.stop.subscribe();
        loop {
            if *stop.borrow_and_update() {
                return Ending::StopRequested;
            }
            if let Some(failure) = slots.iter().find_map(|slot| slot.take_failure()) {
                return Ending::Failed(failure);
            }

            let mut progressed = false;
            for (index, slot) in slots.iter().enumerate() {
                if !pairer.has_pending(index) {
                    if let Some(frame) = slot.pop() {
                        pairer.offer(index, frame);
                    }
                }
            }
            let open: Vec<bool> = slots.iter().map(|slot| !slot.is_finished()).collect();
            while let Some(input) = pairer.take_ready(&open) {
                progressed = true;
                if let FrameOutcome::Analyzed { telemetry, .. } = session.process(input) {
                    self.publish(telemetry);
                }
                if session.is_complete() {
                    return Ending::Completed;
                }
            }
            if progressed {
                continue;
            }
            if open.iter().all(|still_open| !still_open) && pairer.is_empty() {
                return Ending::Exhausted;
            }

            tokio::select! {
                () = notify.notified() => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        return Ending::StopRequested;
                    }
                }
                () = sleep(self.config.frame_timeout()) => {
                    warn!(timeout_ms = self.config.frame_timeout_ms, "No frames within timeout");
                    return Ending::TimedOut;
                }
            }
        }
    }

    fn publish(&self, telemetry: TelemetrySnapshot) {
        if let Some(sender) = &self.telemetry {
            if sender.try_send(telemetry).is_err() {
                debug!(timestamp_ms = telemetry.timestamp_ms, "Telemetry snapshot dropped");
            }
        }
    }
}

/// Run one session from `sources` against the built-in exercise catalog
pub async fn run_session(
    config: SessionConfig,
    analysis: AnalysisConfig,
    exercise_id: &str,
    sources: Vec<Box<dyn PoseSource>>,
) -> SessionReport {
    SessionRunner::new(config, analysis, Arc::new(ExerciseCatalog::builtin()))
        .run(exercise_id, sources)
        .await
}
