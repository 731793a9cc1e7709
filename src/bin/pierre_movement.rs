// ABOUTME: Pierre Movement CLI - analyzes recorded pose keypoint streams and prints session reports
// ABOUTME: Offline or real-time replay of JSON-lines recordings, with optional ensemble second source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Count and score squats in a recording
//! pierre-movement analyze --exercise squat --input squat_primary.jsonl
//!
//! # Fuse a second pose model's output for the same recording
//! pierre-movement analyze --exercise squat --input squat_primary.jsonl --ensemble squat_secondary.jsonl
//!
//! # Replay at capture speed through the live runtime (Ctrl-C stops the session)
//! pierre-movement analyze --exercise push_up --input push_up.jsonl --realtime --format pretty
//!
//! # List the exercise catalog
//! pierre-movement exercises
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pierre_movement::config::MovementConfig;
use pierre_movement::logging;
use pierre_movement::session::{pair_frames, FrameInput, MovementSession, SessionRunner};
use pierre_movement::sources::{JsonLinesSource, PoseSource};
use pierre_movement_analysis::ExerciseCatalog;
use pierre_movement_core::constants::sources;
use pierre_movement_core::models::{
    CompletionReason, FeedbackKind, RawPoseFrame, SessionReport, TelemetrySnapshot,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "pierre-movement",
    about = "Pierre Movement Analysis CLI",
    long_about = "Counts, times, and scores exercise repetitions from recorded pose keypoint streams."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a recorded session
    Analyze {
        /// Exercise identifier (unknown identifiers use the adaptive profile)
        #[arg(long)]
        exercise: String,

        /// JSON-lines recording from the primary pose model
        #[arg(long)]
        input: PathBuf,

        /// JSON-lines recording from a second pose model, fused with the primary
        #[arg(long)]
        ensemble: Option<PathBuf>,

        /// Replay at capture speed through the live runtime
        #[arg(long)]
        realtime: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// List the exercise catalog
    Exercises {
        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env()?;

    let config = MovementConfig::from_environment().context("invalid configuration")?;
    let catalog = Arc::new(ExerciseCatalog::builtin());

    match cli.command {
        Command::Analyze {
            exercise,
            input,
            ensemble,
            realtime,
            format,
        } => {
            let report = if realtime {
                analyze_realtime(config, catalog, &exercise, input, ensemble).await?
            } else {
                analyze_offline(&config, &catalog, &exercise, input, ensemble).await?
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Pretty => print!("{}", render_report(&report)),
            }
        }
        Command::Exercises { format } => match format {
            OutputFormat::Json => {
                let profiles: Vec<_> = catalog.profiles().collect();
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            }
            OutputFormat::Pretty => {
                for profile in catalog.profiles() {
                    println!(
                        "{:<18} {:<24} primary: {}",
                        profile.id, profile.name, profile.primary
                    );
                }
            }
        },
    }
    Ok(())
}

/// Process the recordings as fast as they can be read
async fn analyze_offline(
    config: &MovementConfig,
    catalog: &ExerciseCatalog,
    exercise: &str,
    input: PathBuf,
    ensemble: Option<PathBuf>,
) -> Result<SessionReport> {
    let mut streams = vec![read_recording(input, sources::PRIMARY).await?];
    if let Some(path) = ensemble {
        streams.push(read_recording(path, sources::SECONDARY).await?);
    }

    let inputs: Vec<FrameInput> = pair_frames(streams, config.session.pairing_window_ms);
    info!(inputs = inputs.len(), "Replaying recording");

    let mut session = MovementSession::new(exercise, &config.analysis, catalog);
    for input in inputs {
        session.process(input);
        if session.is_complete() {
            break;
        }
    }
    let at_ms = session.last_timestamp_ms();
    Ok(session.stop(at_ms, CompletionReason::Stopped))
}

async fn read_recording(path: PathBuf, name: &str) -> Result<Vec<RawPoseFrame>> {
    let frames = JsonLinesSource::open(&path, name)
        .await?
        .read_all()
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(source = name, frames = frames.len(), "Recording loaded");
    Ok(frames)
}

/// Replay through the live runtime, paced by frame timestamps
async fn analyze_realtime(
    config: MovementConfig,
    catalog: Arc<ExerciseCatalog>,
    exercise: &str,
    input: PathBuf,
    ensemble: Option<PathBuf>,
) -> Result<SessionReport> {
    let mut pose_sources: Vec<Box<dyn PoseSource>> = vec![Box::new(
        JsonLinesSource::open(&input, sources::PRIMARY)
            .await?
            .realtime(true),
    )];
    if let Some(path) = ensemble {
        pose_sources.push(Box::new(
            JsonLinesSource::open(&path, sources::SECONDARY)
                .await?
                .realtime(true),
        ));
    }

    let (telemetry_tx, telemetry_rx) = mpsc::channel(64);
    let runner = SessionRunner::new(config.session, config.analysis, catalog)
        .with_telemetry(telemetry_tx);

    let stop = runner.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping session");
            stop.stop();
        }
    });
    let overlay = tokio::spawn(log_telemetry(telemetry_rx));

    let report = runner.run(exercise, pose_sources).await;
    overlay.abort();
    Ok(report)
}

async fn log_telemetry(mut receiver: mpsc::Receiver<TelemetrySnapshot>) {
    while let Some(snapshot) = receiver.recv().await {
        info!(
            timestamp_ms = snapshot.timestamp_ms,
            phase = %snapshot.phase,
            reps = snapshot.rep_count,
            value = ?snapshot.primary_value,
            range = ?snapshot.recent_range,
            score = ?snapshot.instantaneous_score,
            "Telemetry"
        );
    }
}

fn render_report(report: &SessionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Exercise:    {} ({})", report.exercise_name, report.exercise_id);
    if report.used_fallback {
        let _ = writeln!(out, "             unknown exercise, adaptive analysis used");
    }
    let _ = writeln!(
        out,
        "Status:      {:?} ({:?}) after {:.1}s",
        report.status,
        report.completion,
        report.duration_ms as f64 / 1000.0
    );
    let _ = writeln!(
        out,
        "Reps:        {} counted, {} rejected",
        report.rep_count, report.rejected_reps
    );
    if let Some(rating) = report.rating {
        let _ = writeln!(out, "Rating:      {rating:?}");
    }
    if let Some(score) = report.session_score {
        let _ = writeln!(out, "Score:       {score:.0}/100");
    }
    if let Some(symmetry) = report.symmetry_score {
        let _ = writeln!(out, "Symmetry:    {symmetry:.0}/100");
    }
    let _ = writeln!(
        out,
        "Confidence:  {:.0}% ({:?}) {}",
        report.confidence.score, report.confidence.reliability, report.confidence.explanation
    );
    if let Some(interruption) = &report.interruption {
        let _ = writeln!(out, "Interrupted: {interruption}");
    }

    for rep in &report.reps {
        let score = rep
            .score
            .map_or_else(|| "-".to_owned(), |score| format!("{score:.0}"));
        let _ = writeln!(
            out,
            "  rep {:>2}  {:>5} ms  range {:>5.1}  score {score}",
            rep.index, rep.duration_ms, rep.range_of_motion
        );
    }
    for phase in &report.phase_durations {
        if phase.intervals > 0 {
            let _ = writeln!(
                out,
                "  {:<12} {:>6} ms over {} interval(s)",
                phase.phase.to_string(),
                phase.total_ms,
                phase.intervals
            );
        }
    }

    for item in &report.feedback {
        let marker = match item.kind {
            FeedbackKind::Positive => '+',
            FeedbackKind::Improvement => '-',
        };
        let _ = writeln!(out, "{marker} {}", item.message);
    }
    for drill in &report.drills {
        let _ = writeln!(out, "Drill: {} ({}) {}", drill.name, drill.prescription, drill.description);
    }
    for cause in &report.confidence.likely_causes {
        let _ = writeln!(out, "Cause: {cause}");
    }
    for tip in &report.confidence.camera_tips {
        let _ = writeln!(out, "Tip:   {tip}");
    }
    out
}
