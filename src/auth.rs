// ABOUTME: JWT-based user authentication and password hashing
// ABOUTME: Handles token generation, validation, and principal extraction from requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Authentication
//!
//! JWT-based authentication for the REST API. The [`AuthManager`] signs and
//! validates HS256 tokens carrying the user's id, email, and role; downstream
//! authorization trusts the role claim unconditionally. Password storage uses
//! bcrypt.

use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::permissions::UserRole;
use chrono::{Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated principal extracted from a validated token
#[derive(Debug, Clone)]
pub struct AuthPrincipal {
    /// Authenticated user ID
    pub user_id: Uuid,
    /// Email from the token
    pub email: String,
    /// Role from the token; trusted for authorization checks
    pub role: UserRole,
}

/// Manages JWT token generation and validation
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from the configured secret
    #[must_use]
    pub fn new(jwt_secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            expiry_hours,
        }
    }

    /// Generate a signed token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for expired tokens and `AuthInvalid` for any
    /// other validation failure.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::default();
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::auth_expired(),
                _ => AppError::auth_invalid(format!("Invalid token: {e}")),
            })
    }

    /// Extract and authenticate the principal from request headers
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no bearer token is present, otherwise the
    /// validation error for the token itself.
    pub fn principal_from_headers(&self, headers: &HeaderMap) -> AppResult<AuthPrincipal> {
        let header = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer scheme"))?;

        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|e| AppError::auth_invalid(format!("Invalid subject claim: {e}")))?;

        Ok(AuthPrincipal {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Token lifetime in hours
    #[must_use]
    pub const fn expiry_hours(&self) -> i64 {
        self.expiry_hours
    }
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails.
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "casey@example.com".into(),
            "hash".into(),
            "Casey Park".into(),
            None,
            UserRole::Trainer,
        )
    }

    #[test]
    fn test_token_round_trip() {
        let manager = AuthManager::new(b"test-secret-at-least-32-bytes-long!", 24);
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Trainer);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = AuthManager::new(b"test-secret-at-least-32-bytes-long!", 24);
        let other = AuthManager::new(b"another-secret-also-32-bytes-long!!", 24);
        let token = manager.generate_token(&test_user()).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_principal_from_headers() {
        let manager = AuthManager::new(b"test-secret-at-least-32-bytes-long!", 24);
        let user = test_user();
        let token = manager.generate_token(&user).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );

        let principal = manager.principal_from_headers(&headers).unwrap();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.role, UserRole::Trainer);

        let empty = HeaderMap::new();
        assert!(manager.principal_from_headers(&empty).is_err());
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
