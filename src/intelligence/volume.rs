// ABOUTME: Set-level aggregation for workout volume, completed counts, and max weight
// ABOUTME: Only completed sets contribute; incomplete sets are arithmetic zeroes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Volume computation over logged sets
//!
//! All functions here are pure. Inputs are taken as-is: reps and weight are
//! expected to be non-negative, but nothing here re-validates them — boundary
//! validation belongs to the request layer, and keeping the engine total over
//! all numeric inputs keeps it trivially testable.

use crate::models::{ExerciseLog, SetEntry};

/// Total volume (`reps x weight`) over completed sets. Incomplete sets
/// contribute zero.
#[must_use]
pub fn volume(sets: &[SetEntry]) -> f64 {
    sets.iter()
        .filter(|set| set.completed)
        .map(|set| f64::from(set.reps) * set.weight)
        .sum()
}

/// Number of sets actually completed
#[must_use]
pub fn completed_count(sets: &[SetEntry]) -> u32 {
    u32::try_from(sets.iter().filter(|set| set.completed).count()).unwrap_or(u32::MAX)
}

/// Heaviest weight among completed sets. No completed sets yields an
/// explicit 0.0, not an optional, so record comparisons can treat the
/// result as an ordinary number.
#[must_use]
pub fn max_weight(sets: &[SetEntry]) -> f64 {
    sets.iter()
        .filter(|set| set.completed)
        .map(|set| set.weight)
        .fold(0.0, f64::max)
}

/// Total volume across every exercise in a workout
#[must_use]
pub fn total_workout_volume(exercise_logs: &[ExerciseLog]) -> f64 {
    exercise_logs.iter().map(|log| volume(&log.sets)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn set(reps: u32, weight: f64, completed: bool) -> SetEntry {
        SetEntry {
            reps,
            weight,
            rpe: None,
            completed,
        }
    }

    fn exercise_log(sets: Vec<SetEntry>) -> ExerciseLog {
        ExerciseLog {
            id: Uuid::new_v4(),
            workout_log_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            order: 0,
            sets,
            target_sets: None,
            target_reps: None,
            target_weight: None,
            notes: None,
            rest_seconds: 90,
        }
    }

    #[test]
    fn test_volume_excludes_incomplete_sets() {
        assert_eq!(volume(&[set(10, 100.0, false)]), 0.0);
    }

    #[test]
    fn test_volume_and_max_weight_worked_example() {
        // Two completed sets (10x100, 8x110) and one incomplete (5x120)
        let sets = vec![
            set(10, 100.0, true),
            set(8, 110.0, true),
            set(5, 120.0, false),
        ];
        assert_eq!(volume(&sets), 1880.0);
        assert_eq!(max_weight(&sets), 110.0);
        assert_eq!(completed_count(&sets), 2);
    }

    #[test]
    fn test_max_weight_empty_is_zero() {
        assert_eq!(max_weight(&[]), 0.0);
        assert_eq!(max_weight(&[set(5, 225.0, false)]), 0.0);
    }

    #[test]
    fn test_total_workout_volume_sums_children() {
        let workout = vec![
            exercise_log(vec![set(10, 100.0, true)]),
            exercise_log(vec![set(5, 200.0, true), set(5, 200.0, false)]),
        ];
        assert_eq!(total_workout_volume(&workout), 2000.0);
    }

    #[test]
    fn test_negative_inputs_pass_through() {
        // Boundary validation is an upstream concern; the engine stays total
        let sets = vec![set(10, -50.0, true)];
        assert_eq!(volume(&sets), -500.0);
    }
}
