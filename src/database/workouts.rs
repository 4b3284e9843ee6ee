// ABOUTME: Exercise catalog and workout log database operations
// ABOUTME: Workout logs own their exercise logs; exercises are restrict-on-delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Equipment, Exercise, ExerciseDifficulty, ExerciseLog, SetEntry, WorkoutLog,
};
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

/// Filters for catalog listing
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    /// Case-insensitive substring match on the exercise name
    pub search: Option<String>,
    pub equipment: Option<Equipment>,
}

/// Filters for workout log listing
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub favorites_only: bool,
    pub templates_only: bool,
}

impl Database {
    /// Create exercise and workout tables
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                video_url TEXT,
                muscle_groups TEXT NOT NULL DEFAULT '[]',
                equipment TEXT NOT NULL DEFAULT 'bodyweight',
                difficulty TEXT NOT NULL DEFAULT 'beginner',
                created_by TEXT REFERENCES users(id) ON DELETE SET NULL,
                is_official BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_name ON exercises(name)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_equipment ON exercises(equipment)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                notes TEXT,
                workout_date DATE NOT NULL,
                duration_minutes INTEGER,
                energy_rating INTEGER,
                difficulty_rating INTEGER,
                is_favorite BOOLEAN NOT NULL DEFAULT 0,
                is_template BOOLEAN NOT NULL DEFAULT 0,
                template_name TEXT,
                is_shared_with_trainer BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_logs_user_date
             ON workout_logs(user_id, workout_date DESC)",
        )
        .execute(&self.pool)
        .await?;

        // Exercise logs cascade with their workout but protect the catalog:
        // an exercise with history cannot be deleted.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercise_logs (
                id TEXT PRIMARY KEY,
                workout_log_id TEXT NOT NULL REFERENCES workout_logs(id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
                exercise_order INTEGER NOT NULL DEFAULT 0,
                sets_data TEXT NOT NULL DEFAULT '[]',
                target_sets INTEGER,
                target_reps TEXT,
                target_weight REAL,
                notes TEXT,
                rest_seconds INTEGER NOT NULL DEFAULT 90
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercise_logs_workout
             ON exercise_logs(workout_log_id, exercise_order)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercise_logs_exercise
             ON exercise_logs(exercise_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Exercise catalog
    // ------------------------------------------------------------------

    /// Insert a catalog exercise
    pub async fn create_exercise(&self, exercise: &Exercise) -> AppResult<()> {
        let muscle_groups = serde_json::to_string(&exercise.muscle_groups)
            .map_err(|e| AppError::internal(format!("Failed to serialize muscle groups: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO exercises (
                id, name, description, video_url, muscle_groups, equipment,
                difficulty, created_by, is_official, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(exercise.id.to_string())
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.video_url)
        .bind(muscle_groups)
        .bind(exercise.equipment.as_str())
        .bind(exercise.difficulty.as_str())
        .bind(exercise.created_by.map(|id| id.to_string()))
        .bind(exercise.is_official)
        .bind(exercise.created_at)
        .bind(exercise.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a catalog exercise by ID
    pub async fn get_exercise(&self, id: Uuid) -> AppResult<Option<Exercise>> {
        let row = sqlx::query("SELECT * FROM exercises WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_exercise(&r)).transpose()
    }

    /// List official exercises plus the caller's custom ones
    pub async fn list_exercises(
        &self,
        user_id: Uuid,
        filter: &ExerciseFilter,
    ) -> AppResult<Vec<Exercise>> {
        let mut sql = String::from(
            "SELECT * FROM exercises WHERE (is_official = 1 OR created_by = ?)",
        );
        if filter.search.is_some() {
            sql.push_str(" AND name LIKE ?");
        }
        if filter.equipment.is_some() {
            sql.push_str(" AND equipment = ?");
        }
        sql.push_str(" ORDER BY name");

        let mut query = sqlx::query(&sql).bind(user_id.to_string());
        if let Some(search) = &filter.search {
            query = query.bind(format!("%{search}%"));
        }
        if let Some(equipment) = filter.equipment {
            query = query.bind(equipment.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_exercise).collect()
    }

    /// Update a catalog exercise in place
    pub async fn update_exercise(&self, exercise: &Exercise) -> AppResult<()> {
        let muscle_groups = serde_json::to_string(&exercise.muscle_groups)
            .map_err(|e| AppError::internal(format!("Failed to serialize muscle groups: {e}")))?;

        sqlx::query(
            r"
            UPDATE exercises SET
                name = $2, description = $3, video_url = $4, muscle_groups = $5,
                equipment = $6, difficulty = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(exercise.id.to_string())
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.video_url)
        .bind(muscle_groups)
        .bind(exercise.equipment.as_str())
        .bind(exercise.difficulty.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Whether any exercise log references this exercise
    pub async fn exercise_has_logs(&self, exercise_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM exercise_logs WHERE exercise_id = $1",
        )
        .bind(exercise_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    /// Delete a catalog exercise. The RESTRICT foreign key rejects the
    /// delete if the exercise has ever been logged against.
    pub async fn delete_exercise(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.message().contains("FOREIGN KEY") => {
                    AppError::state_conflict(
                        "Cannot delete an exercise that has logged workouts",
                        "referenced",
                    )
                }
                _ => e.into(),
            })?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Workout logs
    // ------------------------------------------------------------------

    /// Insert a workout log and its exercise logs in one transaction
    pub async fn create_workout_log(
        &self,
        workout: &WorkoutLog,
        exercise_logs: &[ExerciseLog],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO workout_logs (
                id, user_id, name, notes, workout_date, duration_minutes,
                energy_rating, difficulty_rating, is_favorite, is_template,
                template_name, is_shared_with_trainer, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(&workout.name)
        .bind(&workout.notes)
        .bind(workout.workout_date)
        .bind(workout.duration_minutes)
        .bind(workout.energy_rating)
        .bind(workout.difficulty_rating)
        .bind(workout.is_favorite)
        .bind(workout.is_template)
        .bind(&workout.template_name)
        .bind(workout.is_shared_with_trainer)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&mut *tx)
        .await?;

        for log in exercise_logs {
            let sets_data = serde_json::to_string(&log.sets)
                .map_err(|e| AppError::internal(format!("Failed to serialize sets: {e}")))?;
            sqlx::query(
                r"
                INSERT INTO exercise_logs (
                    id, workout_log_id, exercise_id, exercise_order, sets_data,
                    target_sets, target_reps, target_weight, notes, rest_seconds
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(log.id.to_string())
            .bind(log.workout_log_id.to_string())
            .bind(log.exercise_id.to_string())
            .bind(log.order)
            .bind(sets_data)
            .bind(log.target_sets)
            .bind(&log.target_reps)
            .bind(log.target_weight)
            .bind(&log.notes)
            .bind(log.rest_seconds)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get a workout log by ID
    pub async fn get_workout_log(&self, id: Uuid) -> AppResult<Option<WorkoutLog>> {
        let row = sqlx::query("SELECT * FROM workout_logs WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_workout(&r)).transpose()
    }

    /// Get the ordered exercise logs belonging to a workout
    pub async fn get_exercise_logs(&self, workout_log_id: Uuid) -> AppResult<Vec<ExerciseLog>> {
        let rows = sqlx::query(
            "SELECT * FROM exercise_logs WHERE workout_log_id = $1 ORDER BY exercise_order",
        )
        .bind(workout_log_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_exercise_log).collect()
    }

    /// List a user's workout logs, newest first
    pub async fn list_workout_logs(
        &self,
        user_id: Uuid,
        filter: &WorkoutFilter,
    ) -> AppResult<Vec<WorkoutLog>> {
        let mut sql = String::from("SELECT * FROM workout_logs WHERE user_id = ?");
        if filter.start_date.is_some() {
            sql.push_str(" AND workout_date >= ?");
        }
        if filter.end_date.is_some() {
            sql.push_str(" AND workout_date <= ?");
        }
        if filter.favorites_only {
            sql.push_str(" AND is_favorite = 1");
        }
        if filter.templates_only {
            sql.push_str(" AND is_template = 1");
        }
        sql.push_str(" ORDER BY workout_date DESC, created_at DESC");

        let mut query = sqlx::query(&sql).bind(user_id.to_string());
        if let Some(date) = filter.start_date {
            query = query.bind(date);
        }
        if let Some(date) = filter.end_date {
            query = query.bind(date);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_workout).collect()
    }

    /// Update a workout log's scalar fields
    pub async fn update_workout_log(&self, workout: &WorkoutLog) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE workout_logs SET
                name = $2, notes = $3, workout_date = $4, duration_minutes = $5,
                energy_rating = $6, difficulty_rating = $7, is_favorite = $8,
                is_template = $9, template_name = $10, is_shared_with_trainer = $11,
                updated_at = $12
            WHERE id = $1
            ",
        )
        .bind(workout.id.to_string())
        .bind(&workout.name)
        .bind(&workout.notes)
        .bind(workout.workout_date)
        .bind(workout.duration_minutes)
        .bind(workout.energy_rating)
        .bind(workout.difficulty_rating)
        .bind(workout.is_favorite)
        .bind(workout.is_template)
        .bind(&workout.template_name)
        .bind(workout.is_shared_with_trainer)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace the exercise logs of a workout in one transaction
    pub async fn replace_exercise_logs(
        &self,
        workout_log_id: Uuid,
        exercise_logs: &[ExerciseLog],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM exercise_logs WHERE workout_log_id = $1")
            .bind(workout_log_id.to_string())
            .execute(&mut *tx)
            .await?;

        for log in exercise_logs {
            let sets_data = serde_json::to_string(&log.sets)
                .map_err(|e| AppError::internal(format!("Failed to serialize sets: {e}")))?;
            sqlx::query(
                r"
                INSERT INTO exercise_logs (
                    id, workout_log_id, exercise_id, exercise_order, sets_data,
                    target_sets, target_reps, target_weight, notes, rest_seconds
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(log.id.to_string())
            .bind(workout_log_id.to_string())
            .bind(log.exercise_id.to_string())
            .bind(log.order)
            .bind(sets_data)
            .bind(log.target_sets)
            .bind(&log.target_reps)
            .bind(log.target_weight)
            .bind(&log.notes)
            .bind(log.rest_seconds)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a workout log; exercise logs cascade
    pub async fn delete_workout_log(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM workout_logs WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Set the favorite flag on a workout log
    pub async fn set_workout_favorite(&self, id: Uuid, is_favorite: bool) -> AppResult<()> {
        sqlx::query("UPDATE workout_logs SET is_favorite = $2, updated_at = $3 WHERE id = $1")
            .bind(id.to_string())
            .bind(is_favorite)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Aggregation inputs for the stats engine
    // ------------------------------------------------------------------

    /// Distinct calendar days on which the user logged a workout
    pub async fn workout_dates(&self, user_id: Uuid) -> AppResult<Vec<NaiveDate>> {
        let rows = sqlx::query(
            "SELECT DISTINCT workout_date FROM workout_logs WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| Ok(row.try_get("workout_date")?))
            .collect()
    }

    /// Total number of workouts logged by the user
    pub async fn count_workouts(&self, user_id: Uuid) -> AppResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM workout_logs WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Number of workouts logged on or after `since`
    pub async fn count_workouts_since(&self, user_id: Uuid, since: NaiveDate) -> AppResult<u64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM workout_logs
             WHERE user_id = $1 AND workout_date >= $2",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = row.try_get("count")?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Top exercises by log count, descending
    pub async fn favorite_exercises(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> AppResult<Vec<(String, u64)>> {
        let rows = sqlx::query(
            r"
            SELECT e.name AS name, COUNT(el.id) AS count
            FROM exercise_logs el
            JOIN exercises e ON e.id = el.exercise_id
            JOIN workout_logs w ON w.id = el.workout_log_id
            WHERE w.user_id = $1
            GROUP BY e.id
            ORDER BY count DESC, e.name
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let name: String = row.try_get("name")?;
                let count: i64 = row.try_get("count")?;
                Ok((name, u64::try_from(count).unwrap_or(0)))
            })
            .collect()
    }

    /// Every set list the user has ever logged, for all-time volume
    pub async fn all_logged_sets(&self, user_id: Uuid) -> AppResult<Vec<Vec<SetEntry>>> {
        let rows = sqlx::query(
            r"
            SELECT el.sets_data
            FROM exercise_logs el
            JOIN workout_logs w ON w.id = el.workout_log_id
            WHERE w.user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let data: String = row.try_get("sets_data")?;
                serde_json::from_str(&data)
                    .map_err(|e| AppError::internal(format!("Corrupt sets data: {e}")))
            })
            .collect()
    }
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let id: String = row.try_get("id")?;
    let muscle_groups: String = row.try_get("muscle_groups")?;
    let equipment: String = row.try_get("equipment")?;
    let difficulty: String = row.try_get("difficulty")?;
    let created_by: Option<String> = row.try_get("created_by")?;

    Ok(Exercise {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        video_url: row.try_get("video_url")?,
        muscle_groups: serde_json::from_str(&muscle_groups)
            .map_err(|e| AppError::internal(format!("Corrupt muscle groups: {e}")))?,
        equipment: Equipment::from_str(&equipment)?,
        difficulty: ExerciseDifficulty::from_str(&difficulty)?,
        created_by: created_by.as_deref().map(parse_uuid).transpose()?,
        is_official: row.try_get("is_official")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_workout(row: &SqliteRow) -> AppResult<WorkoutLog> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;

    Ok(WorkoutLog {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        name: row.try_get("name")?,
        notes: row.try_get("notes")?,
        workout_date: row.try_get("workout_date")?,
        duration_minutes: row.try_get("duration_minutes")?,
        energy_rating: row.try_get("energy_rating")?,
        difficulty_rating: row.try_get("difficulty_rating")?,
        is_favorite: row.try_get("is_favorite")?,
        is_template: row.try_get("is_template")?,
        template_name: row.try_get("template_name")?,
        is_shared_with_trainer: row.try_get("is_shared_with_trainer")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_exercise_log(row: &SqliteRow) -> AppResult<ExerciseLog> {
    let id: String = row.try_get("id")?;
    let workout_log_id: String = row.try_get("workout_log_id")?;
    let exercise_id: String = row.try_get("exercise_id")?;
    let sets_data: String = row.try_get("sets_data")?;

    Ok(ExerciseLog {
        id: parse_uuid(&id)?,
        workout_log_id: parse_uuid(&workout_log_id)?,
        exercise_id: parse_uuid(&exercise_id)?,
        order: row.try_get("exercise_order")?,
        sets: serde_json::from_str(&sets_data)
            .map_err(|e| AppError::internal(format!("Corrupt sets data: {e}")))?,
        target_sets: row.try_get("target_sets")?,
        target_reps: row.try_get("target_reps")?,
        target_weight: row.try_get("target_weight")?,
        notes: row.try_get("notes")?,
        rest_seconds: row.try_get("rest_seconds")?,
    })
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Corrupt UUID in database: {e}")))
}
