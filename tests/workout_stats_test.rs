// ABOUTME: Integration tests for the streak and statistics aggregator
// ABOUTME: Covers streaks, weekly/monthly counts, favorites, and total volume
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, NaiveDate};
use fithub_server::models::{Equipment, ExerciseDifficulty, SetEntry};
use fithub_server::services::workouts::{NewExercise, NewExerciseLog, NewWorkout};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn simple_workout(name: &str, exercise_id: Uuid, workout_date: NaiveDate) -> NewWorkout {
    NewWorkout {
        name: name.into(),
        notes: None,
        workout_date,
        duration_minutes: None,
        energy_rating: None,
        difficulty_rating: None,
        is_favorite: false,
        is_template: false,
        template_name: None,
        exercises: vec![NewExerciseLog {
            exercise_id,
            order: 1,
            sets: vec![SetEntry {
                reps: 10,
                weight: 100.0,
                rpe: None,
                completed: true,
            }],
            target_sets: None,
            target_reps: None,
            target_weight: None,
            notes: None,
            rest_seconds: 90,
        }],
    }
}

#[tokio::test]
async fn test_streak_counts_consecutive_days_until_gap() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "streaker@example.com").await;
    let principal = common::principal(&client);

    let exercise = service
        .create_exercise(
            &principal,
            NewExercise {
                name: "Row".into(),
                description: None,
                video_url: None,
                muscle_groups: vec!["back".into()],
                equipment: Equipment::Machine,
                difficulty: ExerciseDifficulty::Beginner,
            },
        )
        .await
        .unwrap();

    // Logs on D, D-1, D-2; gap at D-3; another log at D-4
    let today = date(2025, 6, 20);
    for offset in [0, 1, 2, 4] {
        service
            .create_workout(
                &principal,
                simple_workout("Session", exercise.id, today - Duration::days(offset)),
            )
            .await
            .unwrap();
    }

    let stats = service.stats(&principal, today).await.unwrap();
    assert_eq!(stats.current_streak_days, 3);
    assert_eq!(stats.total_workouts, 4);
}

#[tokio::test]
async fn test_weekly_monthly_counts_and_volume() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "counter@example.com").await;
    let principal = common::principal(&client);

    let exercise = service
        .create_exercise(
            &principal,
            NewExercise {
                name: "Deadlift".into(),
                description: None,
                video_url: None,
                muscle_groups: vec!["back".into()],
                equipment: Equipment::Barbell,
                difficulty: ExerciseDifficulty::Advanced,
            },
        )
        .await
        .unwrap();

    // 2025-06-18 is a Wednesday; its ISO week starts Monday 2025-06-16
    let today = date(2025, 6, 18);
    let dates = [
        date(2025, 6, 17), // this week, this month
        date(2025, 6, 16), // Monday, this week
        date(2025, 6, 14), // last week, this month
        date(2025, 5, 30), // last month
    ];
    for workout_date in dates {
        service
            .create_workout(&principal, simple_workout("Pull", exercise.id, workout_date))
            .await
            .unwrap();
    }

    let stats = service.stats(&principal, today).await.unwrap();
    assert_eq!(stats.total_workouts, 4);
    assert_eq!(stats.workouts_this_week, 2);
    assert_eq!(stats.workouts_this_month, 3);
    // Each workout contributed 10 x 100
    assert_eq!(stats.total_volume, 4000.0);
}

#[tokio::test]
async fn test_favorite_exercises_ranked_by_log_count() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "ranker@example.com").await;
    let principal = common::principal(&client);

    let mut ids = Vec::new();
    for name in ["Squat", "Press", "Curl"] {
        let exercise = service
            .create_exercise(
                &principal,
                NewExercise {
                    name: name.into(),
                    description: None,
                    video_url: None,
                    muscle_groups: Vec::new(),
                    equipment: Equipment::Barbell,
                    difficulty: ExerciseDifficulty::Beginner,
                },
            )
            .await
            .unwrap();
        ids.push(exercise.id);
    }

    // Squat logged 3 times, Press 2, Curl 1
    let today = date(2025, 7, 1);
    for (index, &exercise_id) in ids.iter().enumerate() {
        for day in 0..(3 - index) {
            service
                .create_workout(
                    &principal,
                    simple_workout(
                        "Session",
                        exercise_id,
                        today - Duration::days(i64::try_from(day).unwrap()),
                    ),
                )
                .await
                .unwrap();
        }
    }

    let stats = service.stats(&principal, today).await.unwrap();
    let names: Vec<&str> = stats
        .favorite_exercises
        .iter()
        .map(|f| f.exercise_name.as_str())
        .collect();
    assert_eq!(names, vec!["Squat", "Press", "Curl"]);
    assert_eq!(stats.favorite_exercises[0].count, 3);
}

#[tokio::test]
async fn test_recent_prs_capped_at_five() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "prs@example.com").await;
    let principal = common::principal(&client);

    // Seven exercises, one record-producing workout each
    let today = date(2025, 7, 10);
    for index in 0..7 {
        let exercise = service
            .create_exercise(
                &principal,
                NewExercise {
                    name: format!("Movement {index}"),
                    description: None,
                    video_url: None,
                    muscle_groups: Vec::new(),
                    equipment: Equipment::Dumbbell,
                    difficulty: ExerciseDifficulty::Beginner,
                },
            )
            .await
            .unwrap();
        service
            .create_workout(&principal, simple_workout("Session", exercise.id, today))
            .await
            .unwrap();
    }

    let stats = service.stats(&principal, today).await.unwrap();
    assert_eq!(stats.recent_prs.len(), 5);
}

#[tokio::test]
async fn test_empty_history_yields_zeroes() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "fresh@example.com").await;
    let principal = common::principal(&client);

    let stats = service.stats(&principal, date(2025, 7, 1)).await.unwrap();
    assert_eq!(stats.total_workouts, 0);
    assert_eq!(stats.total_volume, 0.0);
    assert_eq!(stats.current_streak_days, 0);
    assert!(stats.favorite_exercises.is_empty());
    assert!(stats.recent_prs.is_empty());
}
