// ABOUTME: Route handlers for the exercise catalog, workout logs, and AI workouts
// ABOUTME: Detail responses carry computed volume, completed counts, and max weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Workout routes
//!
//! Exercise catalog CRUD, workout logging (which reports any personal
//! records the session achieved), copy/favorite helpers, record listing,
//! and AI workout generation and saving.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::intelligence::{self, PrEvent};
use crate::llm::{SuggestedPlan, SuggestionPreferences};
use crate::models::{
    Equipment, Exercise, ExerciseDifficulty, ExerciseLog, PersonalRecord, SetEntry, WorkoutLog,
};
use crate::services::workouts::{
    CopyWorkout, ExerciseUpdate, NewExercise, NewExerciseLog, NewWorkout,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Catalog exercise representation
#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub muscle_groups: Vec<String>,
    pub equipment: String,
    pub difficulty: String,
    pub is_official: bool,
}

impl From<Exercise> for ExerciseResponse {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id.to_string(),
            name: exercise.name,
            description: exercise.description,
            video_url: exercise.video_url,
            muscle_groups: exercise.muscle_groups,
            equipment: exercise.equipment.as_str().to_owned(),
            difficulty: exercise.difficulty.as_str().to_owned(),
            is_official: exercise.is_official,
        }
    }
}

/// Request body for creating a catalog exercise
#[derive(Debug, Deserialize)]
pub struct CreateExerciseBody {
    pub name: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
}

/// Request body for updating a catalog exercise
#[derive(Debug, Deserialize, Default)]
pub struct UpdateExerciseBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub muscle_groups: Option<Vec<String>>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
}

/// Query parameters for catalog listing
#[derive(Debug, Deserialize, Default)]
pub struct ExerciseListQuery {
    pub search: Option<String>,
    pub equipment: Option<String>,
}

/// One exercise within a workout submission
#[derive(Debug, Deserialize)]
pub struct ExerciseLogBody {
    pub exercise_id: Uuid,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
    pub target_weight: Option<f64>,
    pub notes: Option<String>,
    pub rest_seconds: Option<u32>,
}

/// Request body for logging or updating a workout
#[derive(Debug, Deserialize)]
pub struct WorkoutBody {
    pub name: String,
    pub notes: Option<String>,
    /// Defaults to today
    pub workout_date: Option<NaiveDate>,
    pub duration_minutes: Option<u32>,
    pub energy_rating: Option<u8>,
    pub difficulty_rating: Option<u8>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_template: bool,
    pub template_name: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseLogBody>,
}

impl WorkoutBody {
    fn into_request(self) -> NewWorkout {
        NewWorkout {
            name: self.name,
            notes: self.notes,
            workout_date: self
                .workout_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            duration_minutes: self.duration_minutes,
            energy_rating: self.energy_rating,
            difficulty_rating: self.difficulty_rating,
            is_favorite: self.is_favorite,
            is_template: self.is_template,
            template_name: self.template_name,
            exercises: self
                .exercises
                .into_iter()
                .map(|entry| NewExerciseLog {
                    exercise_id: entry.exercise_id,
                    order: entry.order,
                    sets: entry.sets,
                    target_sets: entry.target_sets,
                    target_reps: entry.target_reps,
                    target_weight: entry.target_weight,
                    notes: entry.notes,
                    rest_seconds: entry.rest_seconds.unwrap_or(90),
                })
                .collect(),
        }
    }
}

/// Query parameters for workout listing
#[derive(Debug, Deserialize, Default)]
pub struct WorkoutListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_favorite: Option<bool>,
    pub is_template: Option<bool>,
}

/// Workout list entry
#[derive(Debug, Serialize)]
pub struct WorkoutSummaryResponse {
    pub id: String,
    pub name: String,
    pub workout_date: NaiveDate,
    pub duration_minutes: Option<u32>,
    pub is_favorite: bool,
    pub is_template: bool,
}

impl From<WorkoutLog> for WorkoutSummaryResponse {
    fn from(workout: WorkoutLog) -> Self {
        Self {
            id: workout.id.to_string(),
            name: workout.name,
            workout_date: workout.workout_date,
            duration_minutes: workout.duration_minutes,
            is_favorite: workout.is_favorite,
            is_template: workout.is_template,
        }
    }
}

/// One exercise log with computed aggregates
#[derive(Debug, Serialize)]
pub struct ExerciseLogResponse {
    pub id: String,
    pub exercise_id: String,
    pub exercise_name: Option<String>,
    pub order: u32,
    pub sets: Vec<SetEntry>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
    pub target_weight: Option<f64>,
    pub notes: Option<String>,
    pub rest_seconds: u32,
    /// Volume over completed sets
    pub volume: f64,
    pub completed_sets: u32,
    pub max_weight: f64,
}

/// Full workout detail with per-exercise aggregates
#[derive(Debug, Serialize)]
pub struct WorkoutDetailResponse {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub workout_date: NaiveDate,
    pub duration_minutes: Option<u32>,
    pub energy_rating: Option<u8>,
    pub difficulty_rating: Option<u8>,
    pub is_favorite: bool,
    pub is_template: bool,
    pub template_name: Option<String>,
    pub total_volume: f64,
    pub exercises: Vec<ExerciseLogResponse>,
}

/// Response for workout creation, reporting any records achieved
#[derive(Debug, Serialize)]
pub struct CreateWorkoutResponse {
    pub workout: WorkoutDetailResponse,
    pub prs_achieved: Vec<PrEvent>,
    pub message: String,
}

/// Request body for copying a workout
#[derive(Debug, Deserialize)]
pub struct CopyWorkoutBody {
    pub source_workout_id: Uuid,
    pub new_workout_date: Option<NaiveDate>,
    #[serde(default)]
    pub copy_as_template: bool,
    pub new_name: Option<String>,
}

/// Response for the favorite toggle
#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub is_favorite: bool,
}

/// Query parameters for record listing
#[derive(Debug, Deserialize, Default)]
pub struct RecordListQuery {
    pub exercise_id: Option<Uuid>,
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/exercises", get(Self::handle_list_exercises))
            .route("/api/exercises", post(Self::handle_create_exercise))
            .route("/api/exercises/:id", get(Self::handle_get_exercise))
            .route("/api/exercises/:id", put(Self::handle_update_exercise))
            .route("/api/exercises/:id", delete(Self::handle_delete_exercise))
            .route("/api/workouts", get(Self::handle_list_workouts))
            .route("/api/workouts", post(Self::handle_create_workout))
            .route("/api/workouts/copy", post(Self::handle_copy_workout))
            .route("/api/workouts/:id", get(Self::handle_get_workout))
            .route("/api/workouts/:id", put(Self::handle_update_workout))
            .route("/api/workouts/:id", delete(Self::handle_delete_workout))
            .route(
                "/api/workouts/:id/favorite",
                post(Self::handle_toggle_favorite),
            )
            .route("/api/personal-records", get(Self::handle_list_records))
            .route("/api/workouts/ai/generate", post(Self::handle_generate_ai))
            .route("/api/workouts/ai/save", post(Self::handle_save_ai))
            .with_state(resources)
    }

    /// Build the detail projection for a workout and its logs
    async fn detail_response(
        resources: &Arc<ServerResources>,
        workout: WorkoutLog,
        exercise_logs: Vec<ExerciseLog>,
    ) -> Result<WorkoutDetailResponse, AppError> {
        let total_volume = intelligence::total_workout_volume(&exercise_logs);

        let mut exercises = Vec::with_capacity(exercise_logs.len());
        for log in exercise_logs {
            let exercise_name = resources
                .database
                .get_exercise(log.exercise_id)
                .await?
                .map(|e| e.name);
            exercises.push(ExerciseLogResponse {
                id: log.id.to_string(),
                exercise_id: log.exercise_id.to_string(),
                exercise_name,
                order: log.order,
                volume: intelligence::volume(&log.sets),
                completed_sets: intelligence::completed_count(&log.sets),
                max_weight: intelligence::max_weight(&log.sets),
                sets: log.sets,
                target_sets: log.target_sets,
                target_reps: log.target_reps,
                target_weight: log.target_weight,
                notes: log.notes,
                rest_seconds: log.rest_seconds,
            });
        }

        Ok(WorkoutDetailResponse {
            id: workout.id.to_string(),
            name: workout.name,
            notes: workout.notes,
            workout_date: workout.workout_date,
            duration_minutes: workout.duration_minutes,
            energy_rating: workout.energy_rating,
            difficulty_rating: workout.difficulty_rating,
            is_favorite: workout.is_favorite,
            is_template: workout.is_template,
            template_name: workout.template_name,
            total_volume,
            exercises,
        })
    }

    /// Handle GET /api/exercises
    async fn handle_list_exercises(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ExerciseListQuery>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let filter = crate::database::ExerciseFilter {
            search: query.search,
            equipment: query
                .equipment
                .as_deref()
                .map(Equipment::from_str)
                .transpose()?,
        };
        let exercises = resources
            .workouts()
            .list_exercises(&principal, &filter)
            .await?;
        let response: Vec<ExerciseResponse> = exercises.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/exercises
    async fn handle_create_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateExerciseBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let request = NewExercise {
            name: body.name,
            description: body.description,
            video_url: body.video_url,
            muscle_groups: body.muscle_groups,
            equipment: body
                .equipment
                .as_deref()
                .map(Equipment::from_str)
                .transpose()?
                .unwrap_or_default(),
            difficulty: body
                .difficulty
                .as_deref()
                .map(ExerciseDifficulty::from_str)
                .transpose()?
                .unwrap_or_default(),
        };
        let exercise = resources
            .workouts()
            .create_exercise(&principal, request)
            .await?;
        let response: ExerciseResponse = exercise.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/exercises/:id
    async fn handle_get_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let exercise = resources.workouts().get_exercise(&principal, id).await?;
        let response: ExerciseResponse = exercise.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/exercises/:id
    async fn handle_update_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<UpdateExerciseBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let update = ExerciseUpdate {
            name: body.name,
            description: body.description,
            video_url: body.video_url,
            muscle_groups: body.muscle_groups,
            equipment: body
                .equipment
                .as_deref()
                .map(Equipment::from_str)
                .transpose()?,
            difficulty: body
                .difficulty
                .as_deref()
                .map(ExerciseDifficulty::from_str)
                .transpose()?,
        };
        let exercise = resources
            .workouts()
            .update_exercise(&principal, id, update)
            .await?;
        let response: ExerciseResponse = exercise.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/exercises/:id
    async fn handle_delete_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        resources.workouts().delete_exercise(&principal, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/workouts
    async fn handle_list_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WorkoutListQuery>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let filter = crate::database::WorkoutFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            favorites_only: query.is_favorite.unwrap_or(false),
            templates_only: query.is_template.unwrap_or(false),
        };
        let workouts = resources.workouts().list_workouts(&principal, &filter).await?;
        let response: Vec<WorkoutSummaryResponse> =
            workouts.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/workouts - log a workout and report records
    async fn handle_create_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<WorkoutBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let (workout, exercise_logs, events) = resources
            .workouts()
            .create_workout(&principal, body.into_request())
            .await?;

        let message = if events.is_empty() {
            "Workout logged successfully!".to_owned()
        } else {
            format!("Workout logged successfully! {} PR(s) achieved.", events.len())
        };

        let response = CreateWorkoutResponse {
            workout: Self::detail_response(&resources, workout, exercise_logs).await?,
            prs_achieved: events,
            message,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/workouts/:id
    async fn handle_get_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let (workout, exercise_logs) = resources.workouts().get_workout(&principal, id).await?;
        let response = Self::detail_response(&resources, workout, exercise_logs).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/workouts/:id
    async fn handle_update_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<WorkoutBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let (workout, exercise_logs) = resources
            .workouts()
            .update_workout(&principal, id, body.into_request())
            .await?;
        let response = Self::detail_response(&resources, workout, exercise_logs).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/workouts/:id
    async fn handle_delete_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        resources.workouts().delete_workout(&principal, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/workouts/:id/favorite
    async fn handle_toggle_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let is_favorite = resources.workouts().toggle_favorite(&principal, id).await?;
        Ok((StatusCode::OK, Json(ToggleFavoriteResponse { is_favorite })).into_response())
    }

    /// Handle POST /api/workouts/copy
    async fn handle_copy_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CopyWorkoutBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let request = CopyWorkout {
            source_workout_id: body.source_workout_id,
            new_workout_date: body
                .new_workout_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            copy_as_template: body.copy_as_template,
            new_name: body.new_name,
        };
        let (workout, exercise_logs) =
            resources.workouts().copy_workout(&principal, request).await?;
        let response = Self::detail_response(&resources, workout, exercise_logs).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/personal-records
    async fn handle_list_records(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecordListQuery>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let records: Vec<PersonalRecord> = resources
            .workouts()
            .list_records(&principal, query.exercise_id)
            .await?;
        Ok((StatusCode::OK, Json(records)).into_response())
    }

    /// Handle POST /api/workouts/ai/generate
    async fn handle_generate_ai(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(preferences): Json<SuggestionPreferences>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let plan = resources
            .workouts()
            .generate_suggestion(&principal, preferences)
            .await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    /// Handle POST /api/workouts/ai/save
    async fn handle_save_ai(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(plan): Json<SuggestedPlan>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let (workout, exercise_logs) = resources
            .workouts()
            .save_suggested_plan(&principal, plan, Utc::now().date_naive())
            .await?;
        let response = Self::detail_response(&resources, workout, exercise_logs).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }
}
