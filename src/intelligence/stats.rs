// ABOUTME: Streak and summary statistics derived from historical workout dates
// ABOUTME: Calendar-day streak walk with a 365-day scan cap, week/month boundary helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Streak and workout statistics
//!
//! Read-only aggregates over a user's workout history. The streak walks
//! backward one calendar day at a time; the remaining aggregates are
//! ordinary grouped counts assembled by the workout service from database
//! queries.

use crate::models::PersonalRecord;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// How many days back the streak scan will look before giving up
const STREAK_SCAN_CAP_DAYS: i64 = 365;

/// Comprehensive workout statistics for one user
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: u64,
    /// All-time volume across every logged workout
    pub total_volume: f64,
    /// Workouts since Monday of the current ISO week
    pub workouts_this_week: u64,
    /// Workouts since the 1st of the current month
    pub workouts_this_month: u64,
    pub current_streak_days: u32,
    /// Top five exercises by log count, descending
    pub favorite_exercises: Vec<FavoriteExercise>,
    /// Five most recent personal records by date achieved
    pub recent_prs: Vec<PersonalRecord>,
}

/// An exercise ranked by how often it has been logged
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteExercise {
    pub exercise_name: String,
    pub count: u64,
}

/// Current consecutive-day workout streak ending at `today`.
///
/// Walks backward from `today` while a workout exists dated exactly that
/// day and stops at the first gap. The scan looks at most
/// [`STREAK_SCAN_CAP_DAYS`] days back: it is the enumeration that is
/// capped, not the value, so the returned count is whatever had accumulated
/// when the scan stopped.
#[must_use]
pub fn current_streak(workout_dates: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    for offset in 0..=STREAK_SCAN_CAP_DAYS {
        let day = today - Duration::days(offset);
        if workout_dates.contains(&day) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Monday of the ISO week containing `today`
#[must_use]
pub fn iso_week_start(today: NaiveDate) -> NaiveDate {
    let days_from_monday = i64::from(today.weekday().num_days_from_monday());
    today - Duration::days(days_from_monday)
}

/// First day of the month containing `today`
#[must_use]
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}
