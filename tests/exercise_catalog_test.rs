// ABOUTME: Integration tests for the shared exercise catalog
// ABOUTME: Official vs custom ownership rules and restrict-on-delete protection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use fithub_server::database::ExerciseFilter;
use fithub_server::errors::ErrorCode;
use fithub_server::models::{Equipment, ExerciseDifficulty, SetEntry};
use fithub_server::permissions::UserRole;
use fithub_server::services::workouts::{ExerciseUpdate, NewExercise, NewExerciseLog, NewWorkout};

fn new_exercise(name: &str) -> NewExercise {
    NewExercise {
        name: name.into(),
        description: None,
        video_url: None,
        muscle_groups: vec!["legs".into()],
        equipment: Equipment::Barbell,
        difficulty: ExerciseDifficulty::Beginner,
    }
}

#[tokio::test]
async fn test_admin_exercises_are_official_user_exercises_are_not() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let admin = common::create_test_user(&database, UserRole::Admin, "admin@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let official = service
        .create_exercise(&common::principal(&admin), new_exercise("Back Squat"))
        .await
        .unwrap();
    assert!(official.is_official);

    let custom = service
        .create_exercise(&common::principal(&client), new_exercise("Garage Squat"))
        .await
        .unwrap();
    assert!(!custom.is_official);
    assert_eq!(custom.created_by, Some(client.id));
}

#[tokio::test]
async fn test_listing_shows_official_plus_own_custom_only() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let admin = common::create_test_user(&database, UserRole::Admin, "admin@example.com").await;
    let alice = common::create_test_client(&database, "alice@example.com").await;
    let bob = common::create_test_client(&database, "bob@example.com").await;

    service
        .create_exercise(&common::principal(&admin), new_exercise("Back Squat"))
        .await
        .unwrap();
    let alices = service
        .create_exercise(&common::principal(&alice), new_exercise("Alice Special"))
        .await
        .unwrap();

    let seen_by_bob = service
        .list_exercises(&common::principal(&bob), &ExerciseFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = seen_by_bob.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"Back Squat"));
    assert!(!names.contains(&"Alice Special"));

    // Another user's custom exercise is invisible, so the lookup is NotFound
    let error = service
        .get_exercise(&common::principal(&bob), alices.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_official_exercises_immutable_by_non_admins() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let admin = common::create_test_user(&database, UserRole::Admin, "admin@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let official = service
        .create_exercise(&common::principal(&admin), new_exercise("Back Squat"))
        .await
        .unwrap();

    let error = service
        .update_exercise(
            &common::principal(&client),
            official.id,
            ExerciseUpdate {
                name: Some("Renamed".into()),
                ..ExerciseUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    let error = service
        .delete_exercise(&common::principal(&client), official.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    // Admins may curate official entries
    let renamed = service
        .update_exercise(
            &common::principal(&admin),
            official.id,
            ExerciseUpdate {
                name: Some("High-Bar Back Squat".into()),
                ..ExerciseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "High-Bar Back Squat");
}

#[tokio::test]
async fn test_custom_exercise_editable_by_creator_only() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let alice = common::create_test_client(&database, "alice@example.com").await;

    let custom = service
        .create_exercise(&common::principal(&alice), new_exercise("Alice Special"))
        .await
        .unwrap();

    let updated = service
        .update_exercise(
            &common::principal(&alice),
            custom.id,
            ExerciseUpdate {
                difficulty: Some(ExerciseDifficulty::Advanced),
                ..ExerciseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.difficulty, ExerciseDifficulty::Advanced);

    service
        .delete_exercise(&common::principal(&alice), custom.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logged_exercise_cannot_be_deleted() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "client@example.com").await;
    let principal = common::principal(&client);

    let exercise = service
        .create_exercise(&principal, new_exercise("Front Squat"))
        .await
        .unwrap();

    service
        .create_workout(
            &principal,
            NewWorkout {
                name: "Leg Day".into(),
                notes: None,
                workout_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                duration_minutes: None,
                energy_rating: None,
                difficulty_rating: None,
                is_favorite: false,
                is_template: false,
                template_name: None,
                exercises: vec![NewExerciseLog {
                    exercise_id: exercise.id,
                    order: 1,
                    sets: vec![SetEntry {
                        reps: 5,
                        weight: 135.0,
                        rpe: Some(7.0),
                        completed: true,
                    }],
                    target_sets: None,
                    target_reps: None,
                    target_weight: None,
                    notes: None,
                    rest_seconds: 120,
                }],
            },
        )
        .await
        .unwrap();

    // The exercise now has history; deletion is rejected, never cascaded
    let error = service
        .delete_exercise(&principal, exercise.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StateConflict);
    assert!(database.get_exercise(exercise.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_search_filters_by_name_and_equipment() {
    let database = common::create_test_database().await;
    let service = common::workout_service(&database);
    let client = common::create_test_client(&database, "client@example.com").await;
    let principal = common::principal(&client);

    service
        .create_exercise(&principal, new_exercise("Barbell Row"))
        .await
        .unwrap();
    let mut dumbbell = new_exercise("Dumbbell Row");
    dumbbell.equipment = Equipment::Dumbbell;
    service.create_exercise(&principal, dumbbell).await.unwrap();

    let rows = service
        .list_exercises(
            &principal,
            &ExerciseFilter {
                search: Some("Row".into()),
                equipment: Some(Equipment::Dumbbell),
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Dumbbell Row");
}
