// ABOUTME: Personal-record detection rules over per-exercise workout aggregates
// ABOUTME: Strictly-greater comparison; equal values never count as a new record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Personal-record detection
//!
//! The record engine runs once per workout-log creation. For each exercise
//! log it derives the candidate values (max weight, session volume) and
//! compares them against the stored best per (user, exercise, type). The
//! comparison rule is strictly-greater-than: matching a record exactly is
//! not a new record. Zero and negative candidates never create records.
//!
//! This module holds the pure half of the engine; the transactional
//! get-or-update lives in [`crate::database`] and is orchestrated by
//! [`crate::services::workouts`].

use crate::intelligence::volume::{max_weight, volume};
use crate::models::{ExerciseLog, PersonalRecord, PrType};
use serde::Serialize;
use uuid::Uuid;

/// A value from a workout that may beat a stored record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrCandidate {
    pub pr_type: PrType,
    pub value: f64,
}

/// A record that was created or beaten by a workout, reported back to the
/// caller for display
#[derive(Debug, Clone, Serialize)]
pub struct PrEvent {
    pub exercise_id: Uuid,
    pub pr_type: PrType,
    /// The newly achieved value
    pub value: f64,
    /// The value it replaced, if any
    pub previous: Option<f64>,
    /// The stored record after the update
    pub record: PersonalRecord,
}

/// Candidate record values for one exercise log. Only strictly positive
/// values qualify; a session with no completed sets produces none.
#[must_use]
pub fn candidates(log: &ExerciseLog) -> Vec<PrCandidate> {
    let mut out = Vec::with_capacity(2);

    let weight = max_weight(&log.sets);
    if weight > 0.0 {
        out.push(PrCandidate {
            pr_type: PrType::MaxWeight,
            value: weight,
        });
    }

    let session_volume = volume(&log.sets);
    if session_volume > 0.0 {
        out.push(PrCandidate {
            pr_type: PrType::MaxVolume,
            value: session_volume,
        });
    }

    out
}

/// Whether a candidate value beats the stored best. No stored value means
/// any qualifying candidate wins; otherwise strictly greater only.
#[must_use]
pub fn improves(existing: Option<f64>, candidate: f64) -> bool {
    match existing {
        Some(best) => candidate > best,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SetEntry;

    fn log_with_sets(sets: Vec<SetEntry>) -> ExerciseLog {
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

    fn set(reps: u32, weight: f64, completed: bool) -> SetEntry {
        SetEntry {
            reps,
            weight,
            rpe: None,
            completed,
        }
    }

    #[test]
    fn test_candidates_both_types() {
        let log = log_with_sets(vec![set(10, 100.0, true), set(8, 110.0, true)]);
        let found = candidates(&log);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&PrCandidate {
            pr_type: PrType::MaxWeight,
            value: 110.0
        }));
        assert!(found.contains(&PrCandidate {
            pr_type: PrType::MaxVolume,
            value: 1880.0
        }));
    }

    #[test]
    fn test_no_completed_sets_no_candidates() {
        let log = log_with_sets(vec![set(10, 100.0, false)]);
        assert!(candidates(&log).is_empty());
    }

    #[test]
    fn test_improves_strictly_greater_only() {
        assert!(improves(None, 200.0));
        assert!(improves(Some(200.0), 210.0));
        assert!(!improves(Some(200.0), 200.0));
        assert!(!improves(Some(200.0), 180.0));
    }
}
