// ABOUTME: Database management for user, connection, workout, and record storage
// ABOUTME: Owns the SQLite pool and runs schema migrations on startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Database Management
//!
//! This module provides persistence for the Fitness Hub server. The
//! [`Database`] struct owns a SQLite pool; per-domain operations live in the
//! submodules as `impl Database` blocks, and every table is created by an
//! idempotent migration run from [`Database::new`].
//!
//! Referential integrity is enforced in the schema: deleting a user cascades
//! to their profile, tokens, connections, and logs; deleting a workout log
//! cascades to its exercise logs; deleting an exercise that has been logged
//! against is rejected by a `RESTRICT` foreign key.

mod connections;
mod records;
mod tokens;
mod users;
mod workouts;

pub use workouts::{ExerciseFilter, WorkoutFilter};

use crate::errors::AppResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Database manager for all persistent state
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open a database connection pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or a migration
    /// fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // In-memory databases live per-connection; a larger pool would hand
        // each checkout its own empty schema.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the underlying pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_tokens().await?;
        self.migrate_connections().await?;
        self.migrate_workouts().await?;
        self.migrate_records().await?;
        Ok(())
    }
}
