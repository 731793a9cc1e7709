// ABOUTME: Movement phases of the generic exercise cycle and timestamped phase intervals
// ABOUTME: IDLE -> SETUP -> ACTIVE_DOWN <-> ACTIVE_UP -> COMPLETE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the generic exercise cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// No valid frame seen yet
    #[default]
    Idle,
    /// Athlete visible, waiting for the first descent
    Setup,
    /// Eccentric half of the movement (descent, load, flexion)
    ActiveDown,
    /// Concentric half of the movement (ascent, drive, extension)
    ActiveUp,
    /// Session finished, terminal
    Complete,
}

impl Phase {
    /// Every phase, in cycle order
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Setup,
        Self::ActiveDown,
        Self::ActiveUp,
        Self::Complete,
    ];

    /// Canonical upper-case label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Setup => "SETUP",
            Self::ActiveDown => "ACTIVE_DOWN",
            Self::ActiveUp => "ACTIVE_UP",
            Self::Complete => "COMPLETE",
        }
    }

    /// True for the two phases of the repetition cycle
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::ActiveDown | Self::ActiveUp)
    }

    /// True once no further transition is possible
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A closed stay in one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseInterval {
    /// Phase occupied
    pub phase: Phase,
    /// Entry timestamp (ms)
    pub start_ms: u64,
    /// Exit timestamp (ms)
    pub end_ms: u64,
}

impl PhaseInterval {
    /// Time spent in the phase
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}
