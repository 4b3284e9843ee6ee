// ABOUTME: Shared server resources handed to route handlers via axum state
// ABOUTME: Bundles the database, auth manager, config, notifier, and suggester
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Dependency injection context
//!
//! A single [`ServerResources`] value is built at startup and shared across
//! every route via `Arc`. Services are constructed per request from these
//! handles; all of them are cheap clones over pooled or channel-backed
//! internals.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::WorkoutSuggester;
use crate::notifications::Notifier;
use crate::services::{AccountService, ConnectionService, WorkoutService};
use std::sync::Arc;

/// Everything route handlers need, wired once at startup
pub struct ServerResources {
    /// Persistent storage
    pub database: Database,
    /// JWT signing and validation
    pub auth: Arc<AuthManager>,
    /// Runtime configuration
    pub config: ServerConfig,
    /// Fire-and-forget notification queue
    pub notifier: Notifier,
    /// AI workout suggestion backend
    pub suggester: Arc<dyn WorkoutSuggester>,
}

impl ServerResources {
    /// Bundle resources for route state
    #[must_use]
    pub fn new(
        database: Database,
        auth: AuthManager,
        config: ServerConfig,
        notifier: Notifier,
        suggester: Arc<dyn WorkoutSuggester>,
    ) -> Self {
        Self {
            database,
            auth: Arc::new(auth),
            config,
            notifier,
            suggester,
        }
    }

    /// Account service bound to these resources
    #[must_use]
    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            self.database.clone(),
            Arc::clone(&self.auth),
            self.notifier.clone(),
            self.config.frontend_url.clone(),
            self.config.default_avatar_url.clone(),
        )
    }

    /// Connection service bound to these resources
    #[must_use]
    pub fn connections(&self) -> ConnectionService {
        ConnectionService::new(self.database.clone(), self.notifier.clone())
    }

    /// Workout service bound to these resources
    #[must_use]
    pub fn workouts(&self) -> WorkoutService {
        WorkoutService::new(self.database.clone(), Arc::clone(&self.suggester))
    }
}
