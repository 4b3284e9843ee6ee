// ABOUTME: Route handler for aggregate workout statistics
// ABOUTME: Streak, weekly/monthly counts, favorites, and recent records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Workout statistics routes

use crate::context::ServerResources;
use crate::errors::AppError;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;

/// Statistics routes handler
pub struct StatsRoutes;

impl StatsRoutes {
    /// Create all statistics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/stats", get(Self::handle_stats))
            .with_state(resources)
    }

    /// Handle GET /api/stats
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let stats = resources
            .workouts()
            .stats(&principal, Utc::now().date_naive())
            .await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }
}
