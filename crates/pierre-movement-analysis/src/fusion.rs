// ABOUTME: Ensemble fuser combining skeleton frames from several pose sources into one
// ABOUTME: Confidence-weighted joint averaging with agreement scaling and low-consensus flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ensemble Fusion
//!
//! For every joint, `fused = Σ(wᵢ · posᵢ) / Σwᵢ` with `wᵢ = trustᵢ × confidenceᵢ`.
//! The sum is taken as an offset from the first contributor so identical
//! inputs come back bit-for-bit. Fused confidence is the best input
//! confidence scaled by how well the sources agree. A joint only one source
//! reports with usable confidence passes through untouched; placeholder
//! detections below the joint confidence threshold are ignored.

use crate::config::{AnalysisConfig, SourceTrust};
use pierre_movement_core::constants::sources;
use pierre_movement_core::models::{Joint, Keypoint, Position, SkeletonFrame};
use std::collections::BTreeSet;
use tracing::{trace, warn};

/// Stateless multi-source skeleton fuser
#[derive(Debug, Clone)]
pub struct EnsembleFuser {
    sources: Vec<SourceTrust>,
    min_joint_confidence: f64,
    agreement_epsilon: f64,
    disagreement_tolerance: f64,
    min_agreement_factor: f64,
}

struct Contribution<'a> {
    keypoint: &'a Keypoint,
    trust: f64,
}

impl EnsembleFuser {
    /// Fuser over the configured, ordered source list
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            sources: config.fusion.sources.clone(),
            min_joint_confidence: config.normalizer.min_joint_confidence,
            agreement_epsilon: config.fusion.agreement_epsilon,
            disagreement_tolerance: config.fusion.disagreement_tolerance,
            min_agreement_factor: config.fusion.min_agreement_factor,
        }
    }

    /// Configured sources in priority order
    #[must_use]
    pub fn sources(&self) -> &[SourceTrust] {
        &self.sources
    }

    /// Fuse same-timestamp frames from different sources
    ///
    /// Frames are taken in configured source order; frames from unknown
    /// sources are ignored. The first known source's timestamp is kept.
    /// Returns `None` when no frame comes from a configured source.
    #[must_use]
    pub fn fuse(&self, frames: &[SkeletonFrame]) -> Option<SkeletonFrame> {
        let mut ordered: Vec<(&SkeletonFrame, f64)> = Vec::with_capacity(frames.len());
        for source in &self.sources {
            if let Some(frame) = frames.iter().find(|frame| frame.source == source.name) {
                ordered.push((frame, source.trust));
            }
        }
        for frame in frames {
            if self.sources.iter().all(|source| source.name != frame.source) {
                warn!(source = %frame.source, "Ignoring frame from unconfigured pose source");
            }
        }

        let (anchor, _) = *ordered.first()?;
        if ordered.len() == 1 {
            return Some(anchor.clone());
        }

        let mut fused = SkeletonFrame::new(sources::ENSEMBLE, anchor.timestamp_ms);
        fused.source_count = ordered.len();

        let joints: BTreeSet<Joint> = ordered
            .iter()
            .flat_map(|(frame, _)| frame.joints.keys().copied())
            .collect();

        for joint in joints {
            let contributions: Vec<Contribution<'_>> = ordered
                .iter()
                .filter_map(|(frame, trust)| {
                    frame.joint(joint).map(|keypoint| Contribution {
                        keypoint,
                        trust: *trust,
                    })
                })
                .collect();
            let (confident, weak): (Vec<_>, Vec<_>) = contributions
                .into_iter()
                .partition(|contribution| {
                    contribution.keypoint.confidence >= self.min_joint_confidence
                });
            let contributions = if confident.is_empty() { weak } else { confident };

            if let [single] = contributions.as_slice() {
                fused.joints.insert(joint, *single.keypoint);
                continue;
            }

            fused.shared_joints += 1;
            let spread = Self::spread(&contributions);
            let factor = self.agreement_factor(spread);
            if spread > self.disagreement_tolerance {
                trace!(%joint, spread, "Pose sources disagree beyond tolerance");
                fused.low_consensus.push(joint);
            }

            let best_confidence = contributions
                .iter()
                .map(|contribution| contribution.keypoint.confidence)
                .fold(0.0, f64::max);

            fused.joints.insert(
                joint,
                Keypoint {
                    position: Self::weighted_position(&contributions),
                    confidence: best_confidence * factor,
                },
            );
        }

        Some(fused)
    }

    /// Confidence multiplier for a given positional spread
    #[must_use]
    pub fn agreement_factor(&self, spread: f64) -> f64 {
        if spread <= self.agreement_epsilon {
            return 1.0;
        }
        if spread >= self.disagreement_tolerance {
            return self.min_agreement_factor;
        }
        let progress = (spread - self.agreement_epsilon)
            / (self.disagreement_tolerance - self.agreement_epsilon);
        (1.0 - self.min_agreement_factor).mul_add(-progress, 1.0)
    }

    /// Largest pairwise distance between contributions
    fn spread(contributions: &[Contribution<'_>]) -> f64 {
        let mut spread = 0.0_f64;
        for (i, a) in contributions.iter().enumerate() {
            for b in &contributions[i + 1..] {
                spread = spread.max(a.keypoint.position.distance(&b.keypoint.position));
            }
        }
        spread
    }

    fn weighted_position(contributions: &[Contribution<'_>]) -> Position {
        let anchor = contributions[0].keypoint.position;

        let mut weights: Vec<f64> = contributions
            .iter()
            .map(|c| c.trust * c.keypoint.confidence)
            .collect();
        if weights.iter().sum::<f64>() <= 0.0 {
            weights = contributions.iter().map(|c| c.trust).collect();
        }
        let total: f64 = weights.iter().sum();

        let mut dx = 0.0;
        let mut dy = 0.0;
        for (contribution, weight) in contributions.iter().zip(&weights) {
            dx += weight * (contribution.keypoint.position.x - anchor.x);
            dy += weight * (contribution.keypoint.position.y - anchor.y);
        }

        let z = anchor.z.map(|anchor_z| {
            let mut dz = 0.0;
            let mut depth_total = 0.0;
            for (contribution, weight) in contributions.iter().zip(&weights) {
                if let Some(z) = contribution.keypoint.position.z {
                    dz += weight * (z - anchor_z);
                    depth_total += weight;
                }
            }
            if depth_total > 0.0 {
                anchor_z + dz / depth_total
            } else {
                anchor_z
            }
        });

        Position {
            x: anchor.x + dx / total,
            y: anchor.y + dy / total,
            z,
        }
    }
}
