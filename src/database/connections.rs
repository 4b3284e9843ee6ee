// ABOUTME: Trainer-client connection and invitation database operations
// ABOUTME: Versioned lifecycle rows with a partial unique index on live pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

use super::users::is_unique_violation;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ConnectionInvitation, ConnectionPermissions, ConnectionStatus, InvitationStatus,
    TrainerClientConnection,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

impl Database {
    /// Create connection and invitation tables
    pub(super) async fn migrate_connections(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS trainer_client_connections (
                id TEXT PRIMARY KEY,
                trainer_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                client_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status TEXT NOT NULL CHECK (status IN ('pending', 'active', 'paused', 'ended', 'rejected')),
                can_view_workouts BOOLEAN NOT NULL DEFAULT 1,
                can_assign_workouts BOOLEAN NOT NULL DEFAULT 1,
                can_view_nutrition BOOLEAN NOT NULL DEFAULT 0,
                can_view_progress_photos BOOLEAN NOT NULL DEFAULT 0,
                can_view_body_metrics BOOLEAN NOT NULL DEFAULT 0,
                can_comment_workouts BOOLEAN NOT NULL DEFAULT 1,
                request_message TEXT,
                rejection_reason TEXT,
                trainer_notes TEXT,
                requested_at DATETIME NOT NULL,
                connected_at DATETIME,
                ended_at DATETIME
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Connection rows are versioned: terminal rows stay as history, so
        // uniqueness only applies to the live lifecycle states.
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_connections_live_pair
            ON trainer_client_connections(trainer_id, client_id)
            WHERE status IN ('pending', 'active', 'paused')
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_connections_trainer_status
             ON trainer_client_connections(trainer_id, status)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_connections_client_status
             ON trainer_client_connections(client_id, status)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS connection_invitations (
                id TEXT PRIMARY KEY,
                trainer_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                email TEXT NOT NULL,
                full_name TEXT,
                message TEXT,
                status TEXT NOT NULL CHECK (status IN ('pending', 'accepted', 'declined', 'expired')),
                accepted_by TEXT REFERENCES users(id) ON DELETE SET NULL,
                created_at DATETIME NOT NULL,
                expires_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a fresh connection lifecycle row.
    ///
    /// # Errors
    ///
    /// Returns `StateConflict` if a live row for the pair already exists
    /// (the partial unique index backstops concurrent double-submission).
    pub async fn create_connection(&self, connection: &TrainerClientConnection) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO trainer_client_connections (
                id, trainer_id, client_id, status,
                can_view_workouts, can_assign_workouts, can_view_nutrition,
                can_view_progress_photos, can_view_body_metrics, can_comment_workouts,
                request_message, rejection_reason, trainer_notes,
                requested_at, connected_at, ended_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ",
        )
        .bind(connection.id.to_string())
        .bind(connection.trainer_id.to_string())
        .bind(connection.client_id.to_string())
        .bind(connection.status.as_str())
        .bind(connection.permissions.can_view_workouts)
        .bind(connection.permissions.can_assign_workouts)
        .bind(connection.permissions.can_view_nutrition)
        .bind(connection.permissions.can_view_progress_photos)
        .bind(connection.permissions.can_view_body_metrics)
        .bind(connection.permissions.can_comment_workouts)
        .bind(&connection.request_message)
        .bind(&connection.rejection_reason)
        .bind(&connection.trainer_notes)
        .bind(connection.requested_at)
        .bind(connection.connected_at)
        .bind(connection.ended_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::state_conflict(
                    "A connection between this trainer and client already exists",
                    "live",
                )
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    /// Get a connection by ID
    pub async fn get_connection(&self, id: Uuid) -> AppResult<Option<TrainerClientConnection>> {
        let row = sqlx::query("SELECT * FROM trainer_client_connections WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_connection(&r)).transpose()
    }

    /// Find the live (pending/active/paused) connection for a pair, if any
    pub async fn find_live_connection(
        &self,
        trainer_id: Uuid,
        client_id: Uuid,
    ) -> AppResult<Option<TrainerClientConnection>> {
        let row = sqlx::query(
            r"
            SELECT * FROM trainer_client_connections
            WHERE trainer_id = $1 AND client_id = $2
              AND status IN ('pending', 'active', 'paused')
            ",
        )
        .bind(trainer_id.to_string())
        .bind(client_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_connection(&r)).transpose()
    }

    /// Transition a pending connection to active. Returns false when the row
    /// was not pending anymore (or never existed); the WHERE guard keeps the
    /// transition atomic under concurrent accept attempts.
    pub async fn mark_connection_accepted(
        &self,
        id: Uuid,
        connected_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE trainer_client_connections
            SET status = 'active', connected_at = $2
            WHERE id = $1 AND status = 'pending'
            ",
        )
        .bind(id.to_string())
        .bind(connected_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition a pending connection to rejected with a reason
    pub async fn mark_connection_rejected(&self, id: Uuid, reason: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE trainer_client_connections
            SET status = 'rejected', rejection_reason = $2
            WHERE id = $1 AND status = 'pending'
            ",
        )
        .bind(id.to_string())
        .bind(reason)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Pause an active connection
    pub async fn mark_connection_paused(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE trainer_client_connections SET status = 'paused'
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resume a paused connection
    pub async fn mark_connection_resumed(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE trainer_client_connections SET status = 'active'
             WHERE id = $1 AND status = 'paused'",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// End an active or paused connection
    pub async fn mark_connection_ended(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE trainer_client_connections
            SET status = 'ended', ended_at = $2
            WHERE id = $1 AND status IN ('active', 'paused')
            ",
        )
        .bind(id.to_string())
        .bind(ended_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the permission flags on a connection
    pub async fn update_connection_permissions(
        &self,
        id: Uuid,
        permissions: ConnectionPermissions,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE trainer_client_connections SET
                can_view_workouts = $2,
                can_assign_workouts = $3,
                can_view_nutrition = $4,
                can_view_progress_photos = $5,
                can_view_body_metrics = $6,
                can_comment_workouts = $7
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(permissions.can_view_workouts)
        .bind(permissions.can_assign_workouts)
        .bind(permissions.can_view_nutrition)
        .bind(permissions.can_view_progress_photos)
        .bind(permissions.can_view_body_metrics)
        .bind(permissions.can_comment_workouts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List connections where the user is the trainer
    pub async fn list_connections_for_trainer(
        &self,
        trainer_id: Uuid,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<TrainerClientConnection>> {
        self.list_connections("trainer_id", trainer_id, status).await
    }

    /// List connections where the user is the client
    pub async fn list_connections_for_client(
        &self,
        client_id: Uuid,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<TrainerClientConnection>> {
        self.list_connections("client_id", client_id, status).await
    }

    async fn list_connections(
        &self,
        column: &str,
        user_id: Uuid,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<TrainerClientConnection>> {
        // `column` is one of two compile-time literals, never user input
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT * FROM trainer_client_connections
                     WHERE {column} = $1 AND status = $2
                     ORDER BY requested_at DESC"
                ))
                .bind(user_id.to_string())
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT * FROM trainer_client_connections
                     WHERE {column} = $1
                     ORDER BY requested_at DESC"
                ))
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_connection).collect()
    }

    /// Count a trainer's currently active clients
    pub async fn count_active_clients(&self, trainer_id: Uuid) -> AppResult<u32> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM trainer_client_connections
             WHERE trainer_id = $1 AND status = 'active'",
        )
        .bind(trainer_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = row.try_get("count")?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Create a trainer-initiated invitation
    pub async fn create_invitation(&self, invitation: &ConnectionInvitation) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO connection_invitations (
                id, trainer_id, email, full_name, message, status,
                accepted_by, created_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(invitation.id.to_string())
        .bind(invitation.trainer_id.to_string())
        .bind(&invitation.email)
        .bind(&invitation.full_name)
        .bind(&invitation.message)
        .bind(invitation.status.as_str())
        .bind(invitation.accepted_by.map(|id| id.to_string()))
        .bind(invitation.created_at)
        .bind(invitation.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get an invitation by ID
    pub async fn get_invitation(&self, id: Uuid) -> AppResult<Option<ConnectionInvitation>> {
        let row = sqlx::query("SELECT * FROM connection_invitations WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_invitation(&r)).transpose()
    }

    /// List invitations sent by a trainer
    pub async fn list_invitations_for_trainer(
        &self,
        trainer_id: Uuid,
    ) -> AppResult<Vec<ConnectionInvitation>> {
        let rows = sqlx::query(
            "SELECT * FROM connection_invitations WHERE trainer_id = $1 ORDER BY created_at DESC",
        )
        .bind(trainer_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_invitation).collect()
    }

    /// Record the outcome of an invitation
    pub async fn update_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
        accepted_by: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE connection_invitations SET status = $2, accepted_by = $3 WHERE id = $1",
        )
        .bind(id.to_string())
        .bind(status.as_str())
        .bind(accepted_by.map(|u| u.to_string()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_connection(row: &SqliteRow) -> AppResult<TrainerClientConnection> {
    let id: String = row.try_get("id")?;
    let trainer_id: String = row.try_get("trainer_id")?;
    let client_id: String = row.try_get("client_id")?;
    let status: String = row.try_get("status")?;

    Ok(TrainerClientConnection {
        id: parse_uuid(&id)?,
        trainer_id: parse_uuid(&trainer_id)?,
        client_id: parse_uuid(&client_id)?,
        status: ConnectionStatus::from_str(&status)?,
        permissions: ConnectionPermissions {
            can_view_workouts: row.try_get("can_view_workouts")?,
            can_assign_workouts: row.try_get("can_assign_workouts")?,
            can_view_nutrition: row.try_get("can_view_nutrition")?,
            can_view_progress_photos: row.try_get("can_view_progress_photos")?,
            can_view_body_metrics: row.try_get("can_view_body_metrics")?,
            can_comment_workouts: row.try_get("can_comment_workouts")?,
        },
        request_message: row.try_get("request_message")?,
        rejection_reason: row.try_get("rejection_reason")?,
        trainer_notes: row.try_get("trainer_notes")?,
        requested_at: row.try_get("requested_at")?,
        connected_at: row.try_get("connected_at")?,
        ended_at: row.try_get("ended_at")?,
    })
}

fn row_to_invitation(row: &SqliteRow) -> AppResult<ConnectionInvitation> {
    let id: String = row.try_get("id")?;
    let trainer_id: String = row.try_get("trainer_id")?;
    let status: String = row.try_get("status")?;
    let accepted_by: Option<String> = row.try_get("accepted_by")?;

    Ok(ConnectionInvitation {
        id: parse_uuid(&id)?,
        trainer_id: parse_uuid(&trainer_id)?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        message: row.try_get("message")?,
        status: InvitationStatus::from_str(&status)?,
        accepted_by: accepted_by.as_deref().map(parse_uuid).transpose()?,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Corrupt UUID in database: {e}")))
}
