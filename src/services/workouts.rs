// ABOUTME: Workout logging service: catalog, logs, record detection, stats, AI plans
// ABOUTME: The record engine runs once per workout creation, never on update or copy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Workout service
//!
//! Orchestrates the pure engines in [`crate::intelligence`] against storage:
//! creating a workout runs the personal-record engine over each exercise
//! log; updates and copies do not. Statistics are assembled here from
//! grouped queries plus the streak walk.

use crate::auth::AuthPrincipal;
use crate::database::{Database, ExerciseFilter, WorkoutFilter};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{self, FavoriteExercise, PrEvent, WorkoutStats};
use crate::llm::{self, CatalogEntry, SuggestedPlan, SuggestionPreferences, WorkoutSuggester};
use crate::models::{
    Equipment, Exercise, ExerciseDifficulty, ExerciseLog, SetEntry, WorkoutLog,
};
use crate::permissions::UserRole;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// How many favorite exercises and recent records the stats endpoint reports
const STATS_TOP_N: u32 = 5;

/// Request to add a catalog exercise
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub muscle_groups: Vec<String>,
    pub equipment: Equipment,
    pub difficulty: ExerciseDifficulty,
}

/// Partial update to a catalog exercise
#[derive(Debug, Clone, Default)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub muscle_groups: Option<Vec<String>>,
    pub equipment: Option<Equipment>,
    pub difficulty: Option<ExerciseDifficulty>,
}

/// One exercise within a new workout
#[derive(Debug, Clone)]
pub struct NewExerciseLog {
    pub exercise_id: Uuid,
    pub order: u32,
    pub sets: Vec<SetEntry>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
    pub target_weight: Option<f64>,
    pub notes: Option<String>,
    pub rest_seconds: u32,
}

/// Request to log a workout
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub name: String,
    pub notes: Option<String>,
    pub workout_date: NaiveDate,
    pub duration_minutes: Option<u32>,
    pub energy_rating: Option<u8>,
    pub difficulty_rating: Option<u8>,
    pub is_favorite: bool,
    pub is_template: bool,
    pub template_name: Option<String>,
    pub exercises: Vec<NewExerciseLog>,
}

/// Request to copy an existing workout
#[derive(Debug, Clone)]
pub struct CopyWorkout {
    pub source_workout_id: Uuid,
    pub new_workout_date: NaiveDate,
    pub copy_as_template: bool,
    pub new_name: Option<String>,
}

/// Workout logging and analysis operations
pub struct WorkoutService {
    database: Database,
    suggester: Arc<dyn WorkoutSuggester>,
}

impl WorkoutService {
    #[must_use]
    pub fn new(database: Database, suggester: Arc<dyn WorkoutSuggester>) -> Self {
        Self {
            database,
            suggester,
        }
    }

    // ------------------------------------------------------------------
    // Exercise catalog
    // ------------------------------------------------------------------

    /// Create a catalog exercise. Admin-created exercises are official;
    /// everyone else gets a custom exercise owned by them.
    pub async fn create_exercise(
        &self,
        principal: &AuthPrincipal,
        request: NewExercise,
    ) -> AppResult<Exercise> {
        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise name is required"));
        }

        let now = Utc::now();
        let exercise = Exercise {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            video_url: request.video_url,
            muscle_groups: request.muscle_groups,
            equipment: request.equipment,
            difficulty: request.difficulty,
            created_by: Some(principal.user_id),
            is_official: principal.role == UserRole::Admin,
            created_at: now,
            updated_at: now,
        };
        self.database.create_exercise(&exercise).await?;
        Ok(exercise)
    }

    /// List official exercises plus the caller's custom ones
    pub async fn list_exercises(
        &self,
        principal: &AuthPrincipal,
        filter: &ExerciseFilter,
    ) -> AppResult<Vec<Exercise>> {
        self.database.list_exercises(principal.user_id, filter).await
    }

    /// Fetch an exercise visible to the caller (official or their own)
    pub async fn get_exercise(
        &self,
        principal: &AuthPrincipal,
        exercise_id: Uuid,
    ) -> AppResult<Exercise> {
        self.database
            .get_exercise(exercise_id)
            .await?
            .filter(|e| e.is_official || e.created_by == Some(principal.user_id))
            .ok_or_else(|| AppError::not_found("Exercise"))
    }

    /// Update a catalog exercise. Custom exercises are editable only by
    /// their creator; official ones only by admins.
    pub async fn update_exercise(
        &self,
        principal: &AuthPrincipal,
        exercise_id: Uuid,
        update: ExerciseUpdate,
    ) -> AppResult<Exercise> {
        let mut exercise = self.get_exercise(principal, exercise_id).await?;
        self.require_catalog_write(principal, &exercise)?;

        if let Some(name) = update.name {
            exercise.name = name;
        }
        if let Some(description) = update.description {
            exercise.description = Some(description);
        }
        if let Some(video_url) = update.video_url {
            exercise.video_url = Some(video_url);
        }
        if let Some(muscle_groups) = update.muscle_groups {
            exercise.muscle_groups = muscle_groups;
        }
        if let Some(equipment) = update.equipment {
            exercise.equipment = equipment;
        }
        if let Some(difficulty) = update.difficulty {
            exercise.difficulty = difficulty;
        }

        self.database.update_exercise(&exercise).await?;
        Ok(exercise)
    }

    /// Delete a catalog exercise. Exercises with logged history are
    /// protected and the delete is rejected.
    pub async fn delete_exercise(
        &self,
        principal: &AuthPrincipal,
        exercise_id: Uuid,
    ) -> AppResult<()> {
        let exercise = self.get_exercise(principal, exercise_id).await?;
        self.require_catalog_write(principal, &exercise)?;

        if self.database.exercise_has_logs(exercise_id).await? {
            return Err(AppError::state_conflict(
                "Cannot delete an exercise that has logged workouts",
                "referenced",
            ));
        }
        self.database.delete_exercise(exercise_id).await
    }

    fn require_catalog_write(
        &self,
        principal: &AuthPrincipal,
        exercise: &Exercise,
    ) -> AppResult<()> {
        if exercise.is_official {
            if principal.role != UserRole::Admin {
                return Err(AppError::permission_denied(
                    "Official exercises cannot be modified",
                ));
            }
        } else if exercise.created_by != Some(principal.user_id) {
            return Err(AppError::permission_denied(
                "Only the creator can modify a custom exercise",
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Workout logs
    // ------------------------------------------------------------------

    /// Log a workout. This is the one entry point that runs the
    /// personal-record engine; the events it returns are for caller
    /// display.
    pub async fn create_workout(
        &self,
        principal: &AuthPrincipal,
        request: NewWorkout,
    ) -> AppResult<(WorkoutLog, Vec<ExerciseLog>, Vec<PrEvent>)> {
        validate_ratings(request.energy_rating, request.difficulty_rating)?;
        let (workout, exercise_logs) = self.build_workout(principal, &request).await?;

        self.database
            .create_workout_log(&workout, &exercise_logs)
            .await?;

        let events = self.detect_records(principal.user_id, &workout, &exercise_logs).await?;
        if !events.is_empty() {
            info!(
                user_id = %principal.user_id,
                workout_id = %workout.id,
                count = events.len(),
                "Personal records achieved"
            );
        }

        Ok((workout, exercise_logs, events))
    }

    /// Fetch a workout the caller owns, with its exercise logs
    pub async fn get_workout(
        &self,
        principal: &AuthPrincipal,
        workout_id: Uuid,
    ) -> AppResult<(WorkoutLog, Vec<ExerciseLog>)> {
        let workout = self.owned_workout(principal, workout_id).await?;
        let exercise_logs = self.database.get_exercise_logs(workout_id).await?;
        Ok((workout, exercise_logs))
    }

    /// List the caller's workouts
    pub async fn list_workouts(
        &self,
        principal: &AuthPrincipal,
        filter: &WorkoutFilter,
    ) -> AppResult<Vec<WorkoutLog>> {
        self.database.list_workout_logs(principal.user_id, filter).await
    }

    /// Update a workout the caller owns. The record engine does not run on
    /// updates.
    pub async fn update_workout(
        &self,
        principal: &AuthPrincipal,
        workout_id: Uuid,
        request: NewWorkout,
    ) -> AppResult<(WorkoutLog, Vec<ExerciseLog>)> {
        validate_ratings(request.energy_rating, request.difficulty_rating)?;
        let existing = self.owned_workout(principal, workout_id).await?;

        let (mut workout, mut exercise_logs) = self.build_workout(principal, &request).await?;
        workout.id = existing.id;
        workout.created_at = existing.created_at;
        workout.is_shared_with_trainer = existing.is_shared_with_trainer;
        for log in &mut exercise_logs {
            log.workout_log_id = existing.id;
        }

        self.database.update_workout_log(&workout).await?;
        self.database
            .replace_exercise_logs(existing.id, &exercise_logs)
            .await?;
        Ok((workout, exercise_logs))
    }

    /// Delete a workout the caller owns; exercise logs cascade
    pub async fn delete_workout(
        &self,
        principal: &AuthPrincipal,
        workout_id: Uuid,
    ) -> AppResult<()> {
        self.owned_workout(principal, workout_id).await?;
        self.database.delete_workout_log(workout_id).await
    }

    /// Flip the favorite flag, returning the new value
    pub async fn toggle_favorite(
        &self,
        principal: &AuthPrincipal,
        workout_id: Uuid,
    ) -> AppResult<bool> {
        let workout = self.owned_workout(principal, workout_id).await?;
        let next = !workout.is_favorite;
        self.database.set_workout_favorite(workout_id, next).await?;
        Ok(next)
    }

    /// Copy a previous workout into a fresh one. Sets are copied verbatim;
    /// the record engine does not run.
    pub async fn copy_workout(
        &self,
        principal: &AuthPrincipal,
        request: CopyWorkout,
    ) -> AppResult<(WorkoutLog, Vec<ExerciseLog>)> {
        let source = self
            .owned_workout(principal, request.source_workout_id)
            .await?;
        let source_logs = self
            .database
            .get_exercise_logs(request.source_workout_id)
            .await?;

        let now = Utc::now();
        let workout = WorkoutLog {
            id: Uuid::new_v4(),
            user_id: principal.user_id,
            name: request.new_name.unwrap_or_else(|| source.name.clone()),
            notes: source.notes.clone(),
            workout_date: request.new_workout_date,
            duration_minutes: None,
            energy_rating: None,
            difficulty_rating: None,
            is_favorite: false,
            is_template: request.copy_as_template,
            template_name: if request.copy_as_template {
                source.template_name.clone()
            } else {
                None
            },
            is_shared_with_trainer: false,
            created_at: now,
            updated_at: now,
        };

        let exercise_logs: Vec<ExerciseLog> = source_logs
            .into_iter()
            .map(|log| ExerciseLog {
                id: Uuid::new_v4(),
                workout_log_id: workout.id,
                ..log
            })
            .collect();

        self.database
            .create_workout_log(&workout, &exercise_logs)
            .await?;
        Ok((workout, exercise_logs))
    }

    // ------------------------------------------------------------------
    // Records and statistics
    // ------------------------------------------------------------------

    /// The caller's personal records, optionally for one exercise
    pub async fn list_records(
        &self,
        principal: &AuthPrincipal,
        exercise_id: Option<Uuid>,
    ) -> AppResult<Vec<crate::models::PersonalRecord>> {
        self.database
            .list_personal_records(principal.user_id, exercise_id)
            .await
    }

    /// Assemble workout statistics as of `today`
    pub async fn stats(
        &self,
        principal: &AuthPrincipal,
        today: NaiveDate,
    ) -> AppResult<WorkoutStats> {
        let user_id = principal.user_id;

        let total_workouts = self.database.count_workouts(user_id).await?;
        let total_volume: f64 = self
            .database
            .all_logged_sets(user_id)
            .await?
            .iter()
            .map(|sets| intelligence::volume(sets))
            .sum();

        let workouts_this_week = self
            .database
            .count_workouts_since(user_id, intelligence::iso_week_start(today))
            .await?;
        let workouts_this_month = self
            .database
            .count_workouts_since(user_id, intelligence::month_start(today))
            .await?;

        let dates: HashSet<NaiveDate> =
            self.database.workout_dates(user_id).await?.into_iter().collect();
        let current_streak_days = intelligence::current_streak(&dates, today);

        let favorite_exercises = self
            .database
            .favorite_exercises(user_id, STATS_TOP_N)
            .await?
            .into_iter()
            .map(|(exercise_name, count)| FavoriteExercise {
                exercise_name,
                count,
            })
            .collect();
        let recent_prs = self
            .database
            .recent_personal_records(user_id, STATS_TOP_N)
            .await?;

        Ok(WorkoutStats {
            total_workouts,
            total_volume,
            workouts_this_week,
            workouts_this_month,
            current_streak_days,
            favorite_exercises,
            recent_prs,
        })
    }

    // ------------------------------------------------------------------
    // AI workout suggestion
    // ------------------------------------------------------------------

    /// Ask the suggestion provider for a plan. The returned plan is
    /// validated for shape against the catalog it was built from, but
    /// nothing is persisted here.
    pub async fn generate_suggestion(
        &self,
        principal: &AuthPrincipal,
        preferences: SuggestionPreferences,
    ) -> AppResult<SuggestedPlan> {
        let catalog: Vec<CatalogEntry> = self
            .database
            .list_exercises(principal.user_id, &ExerciseFilter::default())
            .await?
            .iter()
            .map(CatalogEntry::from)
            .collect();

        let plan = self.suggester.suggest(&preferences, &catalog).await?;

        let known: HashSet<Uuid> = catalog.iter().map(|entry| entry.id).collect();
        llm::validate_plan(&plan, &known)?;
        Ok(plan)
    }

    /// Persist a suggested plan as a workout log with no performed sets.
    /// Every referenced exercise must resolve; nothing is partially saved.
    pub async fn save_suggested_plan(
        &self,
        principal: &AuthPrincipal,
        plan: SuggestedPlan,
        today: NaiveDate,
    ) -> AppResult<(WorkoutLog, Vec<ExerciseLog>)> {
        if plan.exercises.is_empty() {
            return Err(AppError::invalid_input("No exercises provided"));
        }
        for suggested in &plan.exercises {
            self.get_exercise(principal, suggested.exercise_id).await?;
        }

        let now = Utc::now();
        let workout = WorkoutLog {
            id: Uuid::new_v4(),
            user_id: principal.user_id,
            name: plan.workout_name.clone(),
            notes: plan.description.clone(),
            workout_date: today,
            duration_minutes: plan.estimated_duration,
            energy_rating: None,
            difficulty_rating: None,
            is_favorite: false,
            is_template: false,
            template_name: None,
            is_shared_with_trainer: false,
            created_at: now,
            updated_at: now,
        };

        let exercise_logs: Vec<ExerciseLog> = plan
            .exercises
            .iter()
            .map(|suggested| ExerciseLog {
                id: Uuid::new_v4(),
                workout_log_id: workout.id,
                exercise_id: suggested.exercise_id,
                order: suggested.order,
                sets: Vec::new(),
                target_sets: suggested.target_sets,
                target_reps: suggested.target_reps.clone(),
                target_weight: None,
                notes: suggested.notes.clone(),
                rest_seconds: suggested.rest_seconds.unwrap_or(90),
            })
            .collect();

        self.database
            .create_workout_log(&workout, &exercise_logs)
            .await?;
        Ok((workout, exercise_logs))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn owned_workout(
        &self,
        principal: &AuthPrincipal,
        workout_id: Uuid,
    ) -> AppResult<WorkoutLog> {
        self.database
            .get_workout_log(workout_id)
            .await?
            .filter(|w| w.user_id == principal.user_id)
            .ok_or_else(|| AppError::not_found("Workout"))
    }

    /// Materialize request structs into model rows, resolving every
    /// referenced exercise against the caller's visible catalog.
    async fn build_workout(
        &self,
        principal: &AuthPrincipal,
        request: &NewWorkout,
    ) -> AppResult<(WorkoutLog, Vec<ExerciseLog>)> {
        let now = Utc::now();
        let workout = WorkoutLog {
            id: Uuid::new_v4(),
            user_id: principal.user_id,
            name: request.name.clone(),
            notes: request.notes.clone(),
            workout_date: request.workout_date,
            duration_minutes: request.duration_minutes,
            energy_rating: request.energy_rating,
            difficulty_rating: request.difficulty_rating,
            is_favorite: request.is_favorite,
            is_template: request.is_template,
            template_name: request.template_name.clone(),
            is_shared_with_trainer: false,
            created_at: now,
            updated_at: now,
        };

        let mut exercise_logs = Vec::with_capacity(request.exercises.len());
        for entry in &request.exercises {
            self.get_exercise(principal, entry.exercise_id).await?;
            exercise_logs.push(ExerciseLog {
                id: Uuid::new_v4(),
                workout_log_id: workout.id,
                exercise_id: entry.exercise_id,
                order: entry.order,
                sets: entry.sets.clone(),
                target_sets: entry.target_sets,
                target_reps: entry.target_reps.clone(),
                target_weight: entry.target_weight,
                notes: entry.notes.clone(),
                rest_seconds: entry.rest_seconds,
            });
        }

        Ok((workout, exercise_logs))
    }

    /// Run the record engine over a freshly created workout. Both record
    /// types are checked independently per exercise log; a single workout
    /// can yield zero, one, or two events per exercise.
    async fn detect_records(
        &self,
        user_id: Uuid,
        workout: &WorkoutLog,
        exercise_logs: &[ExerciseLog],
    ) -> AppResult<Vec<PrEvent>> {
        let mut events = Vec::new();

        for log in exercise_logs {
            for candidate in intelligence::candidates(log) {
                let previous = self
                    .database
                    .get_personal_record(user_id, log.exercise_id, candidate.pr_type)
                    .await?
                    .map(|record| record.value);
                if !intelligence::improves(previous, candidate.value) {
                    continue;
                }

                // The upsert re-checks the comparison atomically; `previous`
                // is only used for reporting and the early skip above.
                let stored = self
                    .database
                    .record_if_better(
                        user_id,
                        log.exercise_id,
                        candidate.pr_type,
                        candidate.value,
                        workout.id,
                        workout.workout_date,
                    )
                    .await?;

                if let Some(record) = stored {
                    events.push(PrEvent {
                        exercise_id: log.exercise_id,
                        pr_type: candidate.pr_type,
                        value: candidate.value,
                        previous,
                        record,
                    });
                }
            }
        }

        Ok(events)
    }
}

/// Subjective session ratings are 1-5 when present
fn validate_ratings(energy: Option<u8>, difficulty: Option<u8>) -> AppResult<()> {
    for (label, rating) in [("energy_rating", energy), ("difficulty_rating", difficulty)] {
        if let Some(value) = rating {
            if !(1..=5).contains(&value) {
                return Err(AppError::new(
                    crate::errors::ErrorCode::ValueOutOfRange,
                    format!("{label} must be between 1 and 5"),
                ));
            }
        }
    }
    Ok(())
}
