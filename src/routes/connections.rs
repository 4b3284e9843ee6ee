// ABOUTME: Route handlers for trainer-client connections and invitations
// ABOUTME: Thin wrappers over ConnectionService state machine operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Connection routes
//!
//! Request/accept/reject/pause/resume/end a trainer-client connection,
//! update the client-owned sharing permissions, and manage trainer
//! invitations. All endpoints require JWT authentication.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::{
    ConnectionInvitation, ConnectionStatus, PermissionUpdate, TrainerClientConnection,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Connection representation returned by every connection endpoint
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub id: String,
    pub trainer_id: String,
    pub client_id: String,
    pub status: ConnectionStatus,
    pub can_view_workouts: bool,
    pub can_assign_workouts: bool,
    pub can_view_nutrition: bool,
    pub can_view_progress_photos: bool,
    pub can_view_body_metrics: bool,
    pub can_comment_workouts: bool,
    pub request_message: Option<String>,
    pub rejection_reason: Option<String>,
    pub requested_at: String,
    pub connected_at: Option<String>,
    pub ended_at: Option<String>,
}

impl From<TrainerClientConnection> for ConnectionResponse {
    fn from(connection: TrainerClientConnection) -> Self {
        Self {
            id: connection.id.to_string(),
            trainer_id: connection.trainer_id.to_string(),
            client_id: connection.client_id.to_string(),
            status: connection.status,
            can_view_workouts: connection.permissions.can_view_workouts,
            can_assign_workouts: connection.permissions.can_assign_workouts,
            can_view_nutrition: connection.permissions.can_view_nutrition,
            can_view_progress_photos: connection.permissions.can_view_progress_photos,
            can_view_body_metrics: connection.permissions.can_view_body_metrics,
            can_comment_workouts: connection.permissions.can_comment_workouts,
            request_message: connection.request_message,
            rejection_reason: connection.rejection_reason,
            requested_at: connection.requested_at.to_rfc3339(),
            connected_at: connection.connected_at.map(|dt| dt.to_rfc3339()),
            ended_at: connection.ended_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Invitation representation
#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
    pub expires_at: String,
}

impl From<ConnectionInvitation> for InvitationResponse {
    fn from(invitation: ConnectionInvitation) -> Self {
        Self {
            id: invitation.id.to_string(),
            email: invitation.email,
            full_name: invitation.full_name,
            message: invitation.message,
            status: invitation.status.as_str().to_owned(),
            created_at: invitation.created_at.to_rfc3339(),
            expires_at: invitation.expires_at.to_rfc3339(),
        }
    }
}

/// Request body for a client connection request
#[derive(Debug, Deserialize)]
pub struct ConnectionRequestBody {
    pub trainer_id: Uuid,
    pub request_message: Option<String>,
}

/// Request body for a trainer rejection
#[derive(Debug, Deserialize, Default)]
pub struct RejectBody {
    pub reason: Option<String>,
}

/// Query parameters for listing connections
#[derive(Debug, Deserialize, Default)]
pub struct ConnectionListQuery {
    pub status: Option<String>,
}

/// Request body for a trainer invitation
#[derive(Debug, Deserialize)]
pub struct InvitationBody {
    pub email: String,
    pub full_name: Option<String>,
    pub message: Option<String>,
}

/// Request body for answering an invitation
#[derive(Debug, Deserialize)]
pub struct InvitationResponseBody {
    pub accept: bool,
}

/// Connection routes handler
pub struct ConnectionRoutes;

impl ConnectionRoutes {
    /// Create all connection routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/connections/request", post(Self::handle_request))
            .route("/api/connections", get(Self::handle_list))
            .route("/api/connections/:id/accept", post(Self::handle_accept))
            .route("/api/connections/:id/reject", post(Self::handle_reject))
            .route("/api/connections/:id/pause", post(Self::handle_pause))
            .route("/api/connections/:id/resume", post(Self::handle_resume))
            .route(
                "/api/connections/:id/permissions",
                put(Self::handle_update_permissions),
            )
            .route("/api/connections/:id", delete(Self::handle_end))
            .route("/api/invitations", post(Self::handle_create_invitation))
            .route("/api/invitations", get(Self::handle_list_invitations))
            .route(
                "/api/invitations/:id/respond",
                post(Self::handle_respond_invitation),
            )
            .with_state(resources)
    }

    /// Handle POST /api/connections/request - client requests a trainer
    async fn handle_request(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<ConnectionRequestBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources
            .connections()
            .request_connection(&principal, body.trainer_id, body.request_message)
            .await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/connections - the caller's connections
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ConnectionListQuery>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let status = query
            .status
            .as_deref()
            .map(ConnectionStatus::from_str)
            .transpose()?;

        let connections = resources
            .connections()
            .list_connections(&principal, status)
            .await?;
        let response: Vec<ConnectionResponse> =
            connections.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/connections/:id/accept
    async fn handle_accept(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources.connections().accept_request(&principal, id).await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/connections/:id/reject
    async fn handle_reject(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<RejectBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources
            .connections()
            .reject_request(&principal, id, body.reason)
            .await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/connections/:id/pause
    async fn handle_pause(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources
            .connections()
            .pause_connection(&principal, id)
            .await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/connections/:id/resume
    async fn handle_resume(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources
            .connections()
            .resume_connection(&principal, id)
            .await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/connections/:id/permissions - client-only
    async fn handle_update_permissions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<PermissionUpdate>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources
            .connections()
            .update_permissions(&principal, id, body)
            .await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/connections/:id - either party ends
    async fn handle_end(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let connection = resources.connections().end_connection(&principal, id).await?;
        let response: ConnectionResponse = connection.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/invitations - trainer invites by email
    async fn handle_create_invitation(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<InvitationBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let invitation = resources
            .connections()
            .create_invitation(&principal, body.email, body.full_name, body.message)
            .await?;
        let response: InvitationResponse = invitation.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/invitations
    async fn handle_list_invitations(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let invitations = resources.connections().list_invitations(&principal).await?;
        let response: Vec<InvitationResponse> =
            invitations.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/invitations/:id/respond
    async fn handle_respond_invitation(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<InvitationResponseBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let invitation = resources
            .connections()
            .respond_to_invitation(&principal, id, body.accept)
            .await?;
        let response: InvitationResponse = invitation.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
