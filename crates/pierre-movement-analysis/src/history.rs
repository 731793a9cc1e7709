// ABOUTME: Bounded sliding window of feature vectors plus session-long running statistics
// ABOUTME: Evicts by age relative to the newest vector and by a hard count cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::HistoryConfig;
use pierre_movement_core::models::{Feature, FeatureStatsTable, FeatureVector};
use std::collections::VecDeque;

/// Sliding feature window owned by one session
#[derive(Debug, Clone)]
pub struct FeatureHistory {
    window_ms: u64,
    max_vectors: usize,
    window: VecDeque<FeatureVector>,
    session_stats: FeatureStatsTable,
}

impl FeatureHistory {
    /// Empty history with the configured bounds
    #[must_use]
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            window_ms: config.window_ms,
            max_vectors: config.max_vectors,
            window: VecDeque::with_capacity(config.max_vectors.min(1024)),
            session_stats: FeatureStatsTable::default(),
        }
    }

    /// Append a vector and evict whatever falls out of the window
    pub fn push(&mut self, vector: FeatureVector) {
        self.session_stats.observe(&vector);

        let newest = vector.timestamp_ms;
        self.window.push_back(vector);

        while self.window.len() > self.max_vectors {
            self.window.pop_front();
        }
        while self
            .window
            .front()
            .is_some_and(|oldest| newest.saturating_sub(oldest.timestamp_ms) > self.window_ms)
        {
            self.window.pop_front();
        }
    }

    /// Vectors currently in the window
    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True when the window holds no vectors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Min / max / mean of every feature since the session started
    #[must_use]
    pub const fn session_stats(&self) -> &FeatureStatsTable {
        &self.session_stats
    }

    /// Spread between the smallest and largest value of `feature` in the window
    ///
    /// `None` until the feature has been observed inside the window.
    #[must_use]
    pub fn window_range(&self, feature: Feature) -> Option<f64> {
        let mut values = self.window.iter().filter_map(|vector| vector.value(feature));
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        Some(max - min)
    }
}
