// ABOUTME: Common benchmark utilities and pose fixtures for performance testing
// ABOUTME: Provides deterministic synthetic pose streams shared by Criterion benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Common benchmark utilities and pose fixtures.

pub mod fixtures;
