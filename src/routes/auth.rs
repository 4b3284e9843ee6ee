// ABOUTME: Account route handlers for registration, login, verification, and resets
// ABOUTME: Thin wrappers delegating to AccountService
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Authentication routes for account management
//!
//! Registration, login, email verification, and password reset. Handlers
//! stay thin; the rules live in [`crate::services::accounts`].

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::User;
use crate::permissions::UserRole;
use crate::services::accounts::Registration;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// User registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub username: Option<String>,
    /// "client" (default) or "trainer"
    pub role: Option<String>,
}

/// User registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserInfo,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User info included in auth responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_verified: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            is_verified: user.is_verified,
        }
    }
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub user: UserInfo,
    pub detail: String,
}

/// Request carrying only an email address
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Password reset submission
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Simple message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/verify-email/:token", get(Self::handle_verify_email))
            .route(
                "/api/auth/resend-verification",
                post(Self::handle_resend_verification),
            )
            .route(
                "/api/auth/request-password-reset",
                post(Self::handle_request_password_reset),
            )
            .route(
                "/api/auth/reset-password/:token",
                post(Self::handle_reset_password),
            )
            .with_state(resources)
    }

    /// Handle POST /api/auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let role = match body.role.as_deref() {
            Some(role) => UserRole::from_str(role)?,
            None => UserRole::Client,
        };

        let user = resources
            .accounts()
            .register(Registration {
                email: body.email,
                password: body.password,
                full_name: body.full_name,
                username: body.username,
                role,
            })
            .await?;

        let response = RegisterResponse {
            message:
                "Registration successful! Please check your email to verify your account."
                    .into(),
            user: user.into(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let (access, user) = resources.accounts().login(&body.email, &body.password).await?;

        let response = LoginResponse {
            access,
            user: user.into(),
            detail: "Login successful.".into(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/auth/verify-email/:token
    async fn handle_verify_email(
        State(resources): State<Arc<ServerResources>>,
        Path(token): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let message = resources.accounts().verify_email(token).await?;
        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: message.into(),
            }),
        )
            .into_response())
    }

    /// Handle POST /api/auth/resend-verification
    async fn handle_resend_verification(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<EmailRequest>,
    ) -> Result<Response, AppError> {
        resources.accounts().resend_verification(&body.email).await?;
        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "If this email is registered, a verification link will be sent.".into(),
            }),
        )
            .into_response())
    }

    /// Handle POST /api/auth/request-password-reset
    async fn handle_request_password_reset(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<EmailRequest>,
    ) -> Result<Response, AppError> {
        resources
            .accounts()
            .request_password_reset(&body.email)
            .await?;
        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "If the email is registered, a reset link has been sent.".into(),
            }),
        )
            .into_response())
    }

    /// Handle POST /api/auth/reset-password/:token
    async fn handle_reset_password(
        State(resources): State<Arc<ServerResources>>,
        Path(token): Path<Uuid>,
        Json(body): Json<ResetPasswordRequest>,
    ) -> Result<Response, AppError> {
        resources
            .accounts()
            .reset_password(token, &body.password)
            .await?;
        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "Password has been reset successfully. You can now log in.".into(),
            }),
        )
            .into_response())
    }
}
