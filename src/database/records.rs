// ABOUTME: Personal record storage with an atomic compare-and-update upsert
// ABOUTME: One row per (user, exercise, pr_type); only higher values ever win
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{PersonalRecord, PrType};
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

impl Database {
    /// Create the personal records table
    pub(super) async fn migrate_records(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS personal_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                pr_type TEXT NOT NULL CHECK (pr_type IN ('max_weight', 'max_volume')),
                value REAL NOT NULL,
                workout_log_id TEXT REFERENCES workout_logs(id) ON DELETE SET NULL,
                date_achieved DATE NOT NULL,
                created_at DATETIME NOT NULL,
                UNIQUE (user_id, exercise_id, pr_type)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_personal_records_user
             ON personal_records(user_id, date_achieved DESC)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the stored record for a (user, exercise, type) key
    pub async fn get_personal_record(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        pr_type: PrType,
    ) -> AppResult<Option<PersonalRecord>> {
        let row = sqlx::query(
            "SELECT * FROM personal_records
             WHERE user_id = $1 AND exercise_id = $2 AND pr_type = $3",
        )
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .bind(pr_type.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_record(&r)).transpose()
    }

    /// Record a value iff it beats the stored best for its key.
    ///
    /// The compare-and-update runs as a single conditional upsert, so
    /// concurrent workout submissions for the same key cannot lose an
    /// update: the `WHERE excluded.value > value` guard makes lower or
    /// equal candidates a no-op. Returns the stored record when the
    /// candidate won (created or replaced the best), `None` otherwise.
    pub async fn record_if_better(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        pr_type: PrType,
        value: f64,
        workout_log_id: Uuid,
        date_achieved: NaiveDate,
    ) -> AppResult<Option<PersonalRecord>> {
        let row = sqlx::query(
            r"
            INSERT INTO personal_records (
                id, user_id, exercise_id, pr_type, value,
                workout_log_id, date_achieved, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, exercise_id, pr_type) DO UPDATE SET
                value = excluded.value,
                workout_log_id = excluded.workout_log_id,
                date_achieved = excluded.date_achieved
            WHERE excluded.value > personal_records.value
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .bind(pr_type.as_str())
        .bind(value)
        .bind(workout_log_id.to_string())
        .bind(date_achieved)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_record(&r)).transpose()
    }

    /// List a user's records, optionally for one exercise
    pub async fn list_personal_records(
        &self,
        user_id: Uuid,
        exercise_id: Option<Uuid>,
    ) -> AppResult<Vec<PersonalRecord>> {
        let rows = match exercise_id {
            Some(exercise_id) => {
                sqlx::query(
                    "SELECT * FROM personal_records
                     WHERE user_id = $1 AND exercise_id = $2
                     ORDER BY date_achieved DESC",
                )
                .bind(user_id.to_string())
                .bind(exercise_id.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM personal_records
                     WHERE user_id = $1
                     ORDER BY date_achieved DESC",
                )
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(row_to_record).collect()
    }

    /// Most recent records by date achieved
    pub async fn recent_personal_records(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> AppResult<Vec<PersonalRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM personal_records
             WHERE user_id = $1
             ORDER BY date_achieved DESC, created_at DESC
             LIMIT $2",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &SqliteRow) -> AppResult<PersonalRecord> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let exercise_id: String = row.try_get("exercise_id")?;
    let pr_type: String = row.try_get("pr_type")?;
    let workout_log_id: Option<String> = row.try_get("workout_log_id")?;

    Ok(PersonalRecord {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        exercise_id: parse_uuid(&exercise_id)?,
        pr_type: PrType::from_str(&pr_type)?,
        value: row.try_get("value")?,
        workout_log_id: workout_log_id.as_deref().map(parse_uuid).transpose()?,
        date_achieved: row.try_get("date_achieved")?,
        created_at: row.try_get("created_at")?,
    })
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Corrupt UUID in database: {e}")))
}
