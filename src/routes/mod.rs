// ABOUTME: Route module organization for the Fitness Hub HTTP API
// ABOUTME: Per-domain route structs merged into one router with shared state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Route module for the Fitness Hub server
//!
//! Routes are organized by domain; each module contains request/response
//! types and thin handlers that delegate to the service layer.

/// Authentication and account lifecycle routes
pub mod auth;
/// Trainer-client connection and invitation routes
pub mod connections;
/// Health check and system status routes
pub mod health;
/// Profile and trainer marketplace routes
pub mod profiles;
/// Workout statistics routes
pub mod stats;
/// Exercise catalog, workout log, and AI suggestion routes
pub mod workouts;

pub use auth::AuthRoutes;
pub use connections::ConnectionRoutes;
pub use health::HealthRoutes;
pub use profiles::ProfileRoutes;
pub use stats::StatsRoutes;
pub use workouts::WorkoutRoutes;

use crate::context::ServerResources;
use axum::Router;
use std::sync::Arc;

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(ConnectionRoutes::routes(Arc::clone(&resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(&resources)))
        .merge(StatsRoutes::routes(resources))
}
