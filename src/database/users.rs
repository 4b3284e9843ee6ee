// ABOUTME: User and profile database operations
// ABOUTME: Handles registration, lookups, profile updates, and trainer browse queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{EmailVerificationToken, Profile, User};
use crate::permissions::UserRole;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

impl Database {
    /// Create users and profiles tables
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                full_name TEXT NOT NULL,
                phone_number TEXT,
                role TEXT NOT NULL CHECK (role IN ('client', 'trainer', 'admin')),
                is_verified BOOLEAN NOT NULL DEFAULT 0,
                password_hash TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Profiles carry ~25 mostly-optional fields, so the row is a JSON
        // document keyed by the owning user.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                profile_data TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a user, their profile, and an email verification token in one
    /// transaction. Registration either fully succeeds or leaves nothing
    /// behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username is already taken, or the
    /// transaction fails.
    pub async fn create_user_with_profile(
        &self,
        user: &User,
        profile: &Profile,
    ) -> AppResult<EmailVerificationToken> {
        let profile_data = serde_json::to_string(profile)
            .map_err(|e| AppError::internal(format!("Failed to serialize profile: {e}")))?;

        let verification = EmailVerificationToken {
            user_id: user.id,
            token: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO users (
                id, email, username, full_name, phone_number, role,
                is_verified, password_hash, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(&user.phone_number)
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::new(
                    crate::errors::ErrorCode::ResourceAlreadyExists,
                    "An account with this email or username already exists",
                )
            } else {
                e.into()
            }
        })?;

        sqlx::query(
            r"
            INSERT INTO profiles (user_id, profile_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user.id.to_string())
        .bind(&profile_data)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO email_verification_tokens (user_id, token, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(verification.user_id.to_string())
        .bind(verification.token.to_string())
        .bind(verification.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(verification)
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Mark a user's email as verified
    pub async fn mark_user_verified(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET is_verified = 1, updated_at = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replace a user's password hash
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get a user's profile
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query("SELECT profile_data FROM profiles WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            let data: String = r.try_get("profile_data")?;
            serde_json::from_str(&data)
                .map_err(|e| AppError::internal(format!("Corrupt profile data: {e}")))
        })
        .transpose()
    }

    /// Persist a full profile document
    pub async fn update_profile(&self, user_id: Uuid, profile: &Profile) -> AppResult<()> {
        let profile_data = serde_json::to_string(profile)
            .map_err(|e| AppError::internal(format!("Failed to serialize profile: {e}")))?;
        let result = sqlx::query(
            "UPDATE profiles SET profile_data = $2, updated_at = $3 WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .bind(profile_data)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Profile for user {user_id}")));
        }
        Ok(())
    }

    /// List verified trainers together with their profiles, for marketplace
    /// browse. Visibility and accepting-clients filtering happens in the
    /// service layer where the capability model lives.
    pub async fn list_trainers(&self) -> AppResult<Vec<(User, Profile)>> {
        let rows = sqlx::query(
            r"
            SELECT u.*, p.profile_data
            FROM users u
            JOIN profiles p ON p.user_id = u.id
            WHERE u.role = 'trainer' AND u.is_verified = 1
            ORDER BY u.created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let user = row_to_user(row)?;
                let data: String = row.try_get("profile_data")?;
                let profile = serde_json::from_str(&data)
                    .map_err(|e| AppError::internal(format!("Corrupt profile data: {e}")))?;
                Ok((user, profile))
            })
            .collect()
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation
pub(super) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed"))
}

/// Map a users row to the domain model
fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::internal(format!("Corrupt user id: {e}")))?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        full_name: row.try_get("full_name")?,
        phone_number: row.try_get("phone_number")?,
        role: UserRole::from_str(&role)?,
        is_verified: row.try_get("is_verified")?,
        password_hash: row.try_get("password_hash")?,
        created_at,
        updated_at,
    })
}
