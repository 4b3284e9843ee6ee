// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, user, and service construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared test utilities for `fithub_server`
//!
//! Common setup functions to reduce duplication across integration tests.

use async_trait::async_trait;
use fithub_server::{
    auth::AuthPrincipal,
    database::Database,
    errors::AppResult,
    llm::{CatalogEntry, SuggestedExercise, SuggestedPlan, SuggestionPreferences, WorkoutSuggester},
    models::{FitnessLevel, Profile, User},
    notifications::{LogMailer, Notifier},
    permissions::UserRole,
    services::{ConnectionService, WorkoutService},
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("failed to open in-memory database")
}

/// A notifier backed by the logging mailer
pub fn test_notifier() -> Notifier {
    Notifier::spawn(Box::new(LogMailer))
}

/// Create a verified user with a default profile directly in the database
pub async fn create_test_user(database: &Database, role: UserRole, email: &str) -> User {
    let mut user = User::new(
        email.to_owned(),
        "not-a-real-hash".to_owned(),
        format!("Test {role}"),
        None,
        role,
    );
    user.is_verified = true;

    let profile = Profile::new_default("/media/avatars/default_avatar.jpg");
    database
        .create_user_with_profile(&user, &profile)
        .await
        .expect("failed to create test user");
    database.mark_user_verified(user.id).await.unwrap();
    user
}

/// Create a trainer who passes the capability model: accepting clients,
/// active subscription, complete marketplace profile
pub async fn create_eligible_trainer(database: &Database, email: &str) -> User {
    let trainer = create_test_user(database, UserRole::Trainer, email).await;

    let mut profile = database.get_profile(trainer.id).await.unwrap().unwrap();
    profile.bio = Some("Certified strength coach".into());
    profile.city = Some("Portland".into());
    profile.state = Some("OR".into());
    profile.specializations = vec!["Strength Training".into()];
    profile.hourly_rate = Some(75.0);
    profile.is_accepting_clients = true;
    profile.subscription_active = true;
    profile.max_clients = Some(20);
    database.update_profile(trainer.id, &profile).await.unwrap();

    trainer
}

/// Create a client with a complete profile
pub async fn create_test_client(database: &Database, email: &str) -> User {
    let client = create_test_user(database, UserRole::Client, email).await;

    let mut profile = database.get_profile(client.id).await.unwrap().unwrap();
    profile.city = Some("Seattle".into());
    profile.fitness_level = Some(FitnessLevel::Intermediate);
    database.update_profile(client.id, &profile).await.unwrap();

    client
}

/// Build the auth principal a validated token would yield for this user
pub fn principal(user: &User) -> AuthPrincipal {
    AuthPrincipal {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

/// Connection service over a test database
pub fn connection_service(database: &Database) -> ConnectionService {
    ConnectionService::new(database.clone(), test_notifier())
}

/// Workout service over a test database with a stub suggester
pub fn workout_service(database: &Database) -> WorkoutService {
    WorkoutService::new(database.clone(), Arc::new(StubSuggester::default()))
}

/// Workout service with a specific canned plan
pub fn workout_service_with_plan(database: &Database, plan: SuggestedPlan) -> WorkoutService {
    WorkoutService::new(
        database.clone(),
        Arc::new(StubSuggester {
            plan: Some(plan),
        }),
    )
}

/// Suggestion provider that returns a canned plan, or echoes the first
/// catalog entry when none was configured
#[derive(Default)]
pub struct StubSuggester {
    pub plan: Option<SuggestedPlan>,
}

#[async_trait]
impl WorkoutSuggester for StubSuggester {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn suggest(
        &self,
        _preferences: &SuggestionPreferences,
        catalog: &[CatalogEntry],
    ) -> AppResult<SuggestedPlan> {
        if let Some(plan) = &self.plan {
            return Ok(plan.clone());
        }

        let exercises = catalog
            .first()
            .map(|entry| {
                vec![SuggestedExercise {
                    exercise_id: entry.id,
                    exercise_name: Some(entry.name.clone()),
                    order: 1,
                    target_sets: Some(3),
                    target_reps: Some("8-12".into()),
                    rest_seconds: Some(90),
                    notes: None,
                }]
            })
            .unwrap_or_default();

        Ok(SuggestedPlan {
            workout_name: "Stub Workout".into(),
            description: Some("Generated by the stub provider".into()),
            estimated_duration: Some(45),
            warm_up_notes: None,
            cool_down_notes: None,
            exercises,
        })
    }
}

/// A plan referencing an arbitrary exercise id, for shape-validation tests
pub fn plan_for_exercise(exercise_id: Uuid) -> SuggestedPlan {
    SuggestedPlan {
        workout_name: "Canned Plan".into(),
        description: None,
        estimated_duration: Some(60),
        warm_up_notes: None,
        cool_down_notes: None,
        exercises: vec![SuggestedExercise {
            exercise_id,
            exercise_name: None,
            order: 1,
            target_sets: Some(3),
            target_reps: Some("10".into()),
            rest_seconds: Some(60),
            notes: None,
        }],
    }
}
