// ABOUTME: One-shot token storage for email verification and password reset
// ABOUTME: Tokens are deleted on use; expiry is checked by the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{EmailVerificationToken, PasswordResetToken};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create token tables
    pub(super) async fn migrate_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS email_verification_tokens (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                token TEXT UNIQUE NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS password_reset_tokens (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a verification token by its value
    pub async fn get_verification_token(
        &self,
        token: Uuid,
    ) -> AppResult<Option<EmailVerificationToken>> {
        let row = sqlx::query(
            "SELECT user_id, token, created_at FROM email_verification_tokens WHERE token = $1",
        )
        .bind(token.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let user_id: String = r.try_get("user_id")?;
            let token: String = r.try_get("token")?;
            let created_at: DateTime<Utc> = r.try_get("created_at")?;
            Ok(EmailVerificationToken {
                user_id: parse_uuid(&user_id)?,
                token: parse_uuid(&token)?,
                created_at,
            })
        })
        .transpose()
    }

    /// Get the verification token for a user, if one exists
    pub async fn get_verification_token_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<EmailVerificationToken>> {
        let row = sqlx::query(
            "SELECT user_id, token, created_at FROM email_verification_tokens WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let user_id: String = r.try_get("user_id")?;
            let token: String = r.try_get("token")?;
            let created_at: DateTime<Utc> = r.try_get("created_at")?;
            Ok(EmailVerificationToken {
                user_id: parse_uuid(&user_id)?,
                token: parse_uuid(&token)?,
                created_at,
            })
        })
        .transpose()
    }

    /// Replace any existing verification token for a user with a fresh one
    pub async fn rotate_verification_token(
        &self,
        user_id: Uuid,
    ) -> AppResult<EmailVerificationToken> {
        let fresh = EmailVerificationToken {
            user_id,
            token: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO email_verification_tokens (user_id, token, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                token = excluded.token,
                created_at = excluded.created_at
            ",
        )
        .bind(fresh.user_id.to_string())
        .bind(fresh.token.to_string())
        .bind(fresh.created_at)
        .execute(&self.pool)
        .await?;

        Ok(fresh)
    }

    /// Delete a verification token after use
    pub async fn delete_verification_token(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM email_verification_tokens WHERE user_id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Create a password reset token
    pub async fn create_reset_token(&self, user_id: Uuid) -> AppResult<PasswordResetToken> {
        let token = PasswordResetToken {
            user_id,
            token: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO password_reset_tokens (token, user_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(token.token.to_string())
        .bind(token.user_id.to_string())
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    /// Look up a reset token by its value
    pub async fn get_reset_token(&self, token: Uuid) -> AppResult<Option<PasswordResetToken>> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at FROM password_reset_tokens WHERE token = $1",
        )
        .bind(token.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let token: String = r.try_get("token")?;
            let user_id: String = r.try_get("user_id")?;
            let created_at: DateTime<Utc> = r.try_get("created_at")?;
            Ok(PasswordResetToken {
                user_id: parse_uuid(&user_id)?,
                token: parse_uuid(&token)?,
                created_at,
            })
        })
        .transpose()
    }

    /// Delete a reset token after use or expiry
    pub async fn delete_reset_token(&self, token: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE token = $1")
            .bind(token.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Corrupt UUID in database: {e}")))
}
