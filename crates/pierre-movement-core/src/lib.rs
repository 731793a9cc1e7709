// ABOUTME: Core types and constants for the Pierre movement assessment engine
// ABOUTME: Foundation crate with error handling, skeleton/feature models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Movement Core
//!
//! Foundation crate providing shared types and constants for the Pierre
//! movement assessment engine. The analysis crate and the session runtime both
//! build on these types, so this crate is designed to change infrequently.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Engine defaults, environment variable names, service names
//! - **models**: Joints, skeleton frames, feature vectors, phases, events, reports

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;

/// Core data models (joints, skeleton frames, features, phases, reports)
pub mod models;
