// ABOUTME: Account lifecycle service: registration, login, verification, password reset
// ABOUTME: User and profile are created atomically; verification email is enqueued, not sent inline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Account service
//!
//! Registration creates the user, their profile, and a verification token in
//! one transaction, then enqueues the verification email on the
//! notification channel. Reset and resend endpoints answer identically
//! whether or not the address exists, so they never leak account presence.

use crate::auth::{hash_password, verify_password, AuthManager, AuthPrincipal};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Profile, User};
use crate::notifications::{EmailNotification, Notifier};
use crate::permissions::{self, UserRole};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// New account request
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub username: Option<String>,
    pub role: UserRole,
}

/// Account lifecycle operations
pub struct AccountService {
    database: Database,
    auth: Arc<AuthManager>,
    notifier: Notifier,
    frontend_url: String,
    default_avatar_url: String,
}

impl AccountService {
    #[must_use]
    pub const fn new(
        database: Database,
        auth: Arc<AuthManager>,
        notifier: Notifier,
        frontend_url: String,
        default_avatar_url: String,
    ) -> Self {
        Self {
            database,
            auth,
            notifier,
            frontend_url,
            default_avatar_url,
        }
    }

    /// Register a new client or trainer account
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        if !is_valid_email(&registration.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if !is_valid_password(&registration.password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        if registration.role == UserRole::Admin {
            return Err(AppError::permission_denied(
                "Admin accounts cannot be self-registered",
            ));
        }

        let password_hash = hash_password(&registration.password)?;
        let user = User::new(
            registration.email,
            password_hash,
            registration.full_name,
            registration.username,
            registration.role,
        );
        let profile = Profile::new_default(&self.default_avatar_url);

        let verification = self
            .database
            .create_user_with_profile(&user, &profile)
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        self.notifier.enqueue(EmailNotification {
            to: user.email.clone(),
            subject: "Verify Your Email - Fitness Hub".into(),
            body: format!(
                "Click the link to verify your email: {}/verify-email/{}",
                self.frontend_url, verification.token
            ),
        });

        Ok(user)
    }

    /// Authenticate and issue a JWT. Unverified accounts cannot log in.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .database
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }
        if !user.is_verified {
            return Err(AppError::auth_invalid(
                "Your account is not verified. Please check your email.",
            ));
        }

        let token = self.auth.generate_token(&user)?;
        Ok((token, user))
    }

    /// Verify an email address from a one-shot token
    pub async fn verify_email(&self, token: Uuid) -> AppResult<&'static str> {
        let verification = self
            .database
            .get_verification_token(token)
            .await?
            .ok_or_else(|| AppError::invalid_input("Invalid or expired verification link"))?;

        let user = self
            .database
            .get_user(verification.user_id)
            .await?
            .ok_or_else(|| AppError::invalid_input("Invalid or expired verification link"))?;

        if user.is_verified {
            return Ok("Email already verified.");
        }
        if verification.is_expired(Utc::now()) {
            return Err(AppError::invalid_input(
                "Verification link has expired. Please request a new one.",
            ));
        }

        self.database.mark_user_verified(user.id).await?;
        self.database.delete_verification_token(user.id).await?;

        self.notifier.enqueue(EmailNotification {
            to: user.email,
            subject: "Welcome to Fitness Hub!".into(),
            body: "Thank you for verifying your email. Your account is now active!".into(),
        });

        Ok("Email successfully verified! You can now log in.")
    }

    /// Resend the verification email. Responds the same whether or not the
    /// address is registered.
    pub async fn resend_verification(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.database.get_user_by_email(email).await? else {
            return Ok(());
        };
        if user.is_verified {
            return Ok(());
        }

        let token = match self
            .database
            .get_verification_token_for_user(user.id)
            .await?
        {
            Some(existing) if !existing.is_expired(Utc::now()) => existing,
            _ => self.database.rotate_verification_token(user.id).await?,
        };

        self.notifier.enqueue(EmailNotification {
            to: user.email,
            subject: "Verify Your Email - Fitness Hub".into(),
            body: format!(
                "Click the link to verify your email: {}/verify-email/{}",
                self.frontend_url, token.token
            ),
        });
        Ok(())
    }

    /// Send a password-reset link. Responds the same whether or not the
    /// address is registered.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.database.get_user_by_email(email).await? else {
            return Ok(());
        };

        let token = self.database.create_reset_token(user.id).await?;
        self.notifier.enqueue(EmailNotification {
            to: user.email,
            subject: "Password Reset Request - Fitness Hub".into(),
            body: format!(
                "Click the link to reset your password: {}/reset-password/{}",
                self.frontend_url, token.token
            ),
        });
        Ok(())
    }

    /// Reset a password from a one-shot token
    pub async fn reset_password(&self, token: Uuid, new_password: &str) -> AppResult<()> {
        let reset = self
            .database
            .get_reset_token(token)
            .await?
            .ok_or_else(|| AppError::invalid_input("Invalid or expired token"))?;

        if reset.is_expired(Utc::now()) {
            self.database.delete_reset_token(token).await?;
            return Err(AppError::invalid_input(
                "Token has expired. Please request a new password reset link.",
            ));
        }
        if !is_valid_password(new_password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = hash_password(new_password)?;
        self.database
            .update_password(reset.user_id, &password_hash)
            .await?;
        self.database.delete_reset_token(token).await?;
        Ok(())
    }

    /// The caller's own account and profile
    pub async fn get_own_profile(&self, principal: &AuthPrincipal) -> AppResult<(User, Profile)> {
        let user = self
            .database
            .get_user(principal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        let profile = self
            .database
            .get_profile(principal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile"))?;
        Ok((user, profile))
    }

    /// Persist the caller's profile after role-specific validation
    pub async fn update_own_profile(
        &self,
        principal: &AuthPrincipal,
        profile: Profile,
    ) -> AppResult<Profile> {
        permissions::validate_profile(principal.role, &profile)?;
        self.database
            .update_profile(principal.user_id, &profile)
            .await?;
        Ok(profile)
    }
}

/// Minimal structural email check; deliverability is the mailer's problem
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Password strength floor
fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
}
