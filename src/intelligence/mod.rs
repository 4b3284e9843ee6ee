// ABOUTME: Training analysis engines for volume, personal records, and statistics
// ABOUTME: Pure computation over logged set data, no storage access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Training Intelligence
//!
//! Pure computation over workout log data. Everything in this module is a
//! function of its inputs: the volume engine aggregates set records, the
//! record engine decides whether a session beats a stored best, and the
//! stats aggregator derives streaks and summaries from historical dates.
//! Persistence and orchestration live in [`crate::services`].

/// Personal-record detection and comparison rules
pub mod records;

/// Streak and summary statistics over historical logs
pub mod stats;

/// Set-level volume and weight aggregation
pub mod volume;

pub use records::{candidates, improves, PrCandidate, PrEvent};
pub use stats::{current_streak, iso_week_start, month_start, FavoriteExercise, WorkoutStats};
pub use volume::{completed_count, max_weight, total_workout_volume, volume};
