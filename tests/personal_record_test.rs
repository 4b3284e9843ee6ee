// ABOUTME: Integration tests for personal-record detection on workout creation
// ABOUTME: Covers creation, strictly-greater updates, and the no-trigger paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use fithub_server::database::Database;
use fithub_server::models::{Equipment, ExerciseDifficulty, PrType, SetEntry, User};
use fithub_server::services::workouts::{CopyWorkout, NewExercise, NewExerciseLog, NewWorkout};
use fithub_server::services::WorkoutService;
use uuid::Uuid;

fn set(reps: u32, weight: f64, completed: bool) -> SetEntry {
    SetEntry {
        reps,
        weight,
        rpe: None,
        completed,
    }
}

fn workout_with_sets(exercise_id: Uuid, date: NaiveDate, sets: Vec<SetEntry>) -> NewWorkout {
    NewWorkout {
        name: "Bench Day".into(),
        notes: None,
        workout_date: date,
        duration_minutes: Some(60),
        energy_rating: None,
        difficulty_rating: None,
        is_favorite: false,
        is_template: false,
        template_name: None,
        exercises: vec![NewExerciseLog {
            exercise_id,
            order: 1,
            sets,
            target_sets: None,
            target_reps: None,
            target_weight: None,
            notes: None,
            rest_seconds: 120,
        }],
    }
}

async fn setup() -> (Database, WorkoutService, User, Uuid) {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "lifter@example.com").await;

    let exercise = service
        .create_exercise(
            &common::principal(&client),
            NewExercise {
                name: "Bench Press".into(),
                description: None,
                video_url: None,
                muscle_groups: vec!["chest".into()],
                equipment: Equipment::Barbell,
                difficulty: ExerciseDifficulty::Intermediate,
            },
        )
        .await
        .unwrap();

    (database, service, client, exercise.id)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_first_log_creates_both_record_types() {
    let (database, service, client, exercise_id) = setup().await;

    let (_, _, events) = service
        .create_workout(
            &common::principal(&client),
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    let weight_event = events
        .iter()
        .find(|e| e.pr_type == PrType::MaxWeight)
        .unwrap();
    assert_eq!(weight_event.value, 200.0);
    assert!(weight_event.previous.is_none());

    let volume_event = events
        .iter()
        .find(|e| e.pr_type == PrType::MaxVolume)
        .unwrap();
    assert_eq!(volume_event.value, 1000.0);

    let stored = database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, 200.0);
    assert_eq!(stored.date_achieved, date(2025, 5, 1));
}

#[tokio::test]
async fn test_lower_value_never_overwrites() {
    let (database, service, client, exercise_id) = setup().await;
    let principal = common::principal(&client);

    service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    let (_, _, events) = service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 8), vec![set(5, 180.0, true)]),
        )
        .await
        .unwrap();

    // 180 < 200 for weight; 900 < 1000 for volume: nothing reported
    assert!(events.is_empty());
    let stored = database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, 200.0);
    assert_eq!(stored.date_achieved, date(2025, 5, 1));
}

#[tokio::test]
async fn test_higher_value_updates_in_place_and_reports() {
    let (database, service, client, exercise_id) = setup().await;
    let principal = common::principal(&client);

    service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    let (workout, _, events) = service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 15), vec![set(5, 210.0, true)]),
        )
        .await
        .unwrap();

    let weight_event = events
        .iter()
        .find(|e| e.pr_type == PrType::MaxWeight)
        .unwrap();
    assert_eq!(weight_event.value, 210.0);
    assert_eq!(weight_event.previous, Some(200.0));

    // Updated in place: still one row, now pointing at the new workout
    let all = database
        .list_personal_records(client.id, Some(exercise_id))
        .await
        .unwrap();
    assert_eq!(all.iter().filter(|r| r.pr_type == PrType::MaxWeight).count(), 1);
    let stored = database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, 210.0);
    assert_eq!(stored.workout_log_id, Some(workout.id));
    assert_eq!(stored.date_achieved, date(2025, 5, 15));
}

#[tokio::test]
async fn test_equal_value_is_not_a_new_record() {
    let (database, service, client, exercise_id) = setup().await;
    let principal = common::principal(&client);

    service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    let (_, _, events) = service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 8), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    // Matching a record exactly reports nothing and changes nothing
    assert!(events.is_empty());
    let stored = database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.date_achieved, date(2025, 5, 1));
}

#[tokio::test]
async fn test_incomplete_sets_produce_no_records() {
    let (database, service, client, exercise_id) = setup().await;

    let (_, _, events) = service
        .create_workout(
            &common::principal(&client),
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(10, 100.0, false)]),
        )
        .await
        .unwrap();

    assert!(events.is_empty());
    assert!(database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_copy_does_not_run_the_record_engine() {
    let (database, service, client, exercise_id) = setup().await;
    let principal = common::principal(&client);

    let (source, _, _) = service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    // Wipe records so any engine run during copy would recreate them
    sqlx::query("DELETE FROM personal_records")
        .execute(database.pool())
        .await
        .unwrap();

    service
        .copy_workout(
            &principal,
            CopyWorkout {
                source_workout_id: source.id,
                new_workout_date: date(2025, 5, 2),
                copy_as_template: false,
                new_name: None,
            },
        )
        .await
        .unwrap();

    assert!(database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_does_not_run_the_record_engine() {
    let (database, service, client, exercise_id) = setup().await;
    let principal = common::principal(&client);

    let (workout, _, _) = service
        .create_workout(
            &principal,
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 200.0, true)]),
        )
        .await
        .unwrap();

    // An update with a heavier set must not mint a record
    service
        .update_workout(
            &principal,
            workout.id,
            workout_with_sets(exercise_id, date(2025, 5, 1), vec![set(5, 500.0, true)]),
        )
        .await
        .unwrap();

    let stored = database
        .get_personal_record(client.id, exercise_id, PrType::MaxWeight)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, 200.0);
}
