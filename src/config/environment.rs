// ABOUTME: Environment-based server configuration loading and validation
// ABOUTME: Defines ServerConfig and its nested sections with from_env construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Environment-driven server configuration

use anyhow::{Context, Result};
use std::env;
use tracing::info;

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default SQLite database URL
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/fithub.db";

/// Default JWT expiry in hours
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default frontend base URL used when building email links
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Default avatar assigned to new profiles
const DEFAULT_AVATAR_URL: &str = "/media/avatars/default_avatar.jpg";

/// Default OpenAI-compatible endpoint for workout suggestions
const DEFAULT_SUGGESTION_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for workout suggestions
const DEFAULT_SUGGESTION_MODEL: &str = "gpt-4o-mini";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the REST API
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Frontend base URL, used in verification and reset links
    pub frontend_url: String,
    /// Avatar URL seeded onto new profiles
    pub default_avatar_url: String,
    /// AI workout suggestion settings
    pub suggestions: SuggestionConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (SQLite)
    pub url: String,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign JWTs
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

/// AI workout suggestion provider configuration
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// API key; empty for local servers
    pub api_key: String,
    /// Model name
    pub model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but unparseable, or if the
    /// JWT secret is missing.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())?
                .parse()
                .context("Invalid HTTP_PORT value")?,
            database: DatabaseConfig {
                url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .context("JWT_SECRET environment variable is required")?,
                jwt_expiry_hours: env_var_or(
                    "JWT_EXPIRY_HOURS",
                    &DEFAULT_JWT_EXPIRY_HOURS.to_string(),
                )?
                .parse()
                .context("Invalid JWT_EXPIRY_HOURS value")?,
            },
            frontend_url: env_var_or("FRONTEND_URL", DEFAULT_FRONTEND_URL)?,
            default_avatar_url: env_var_or("DEFAULT_AVATAR_URL", DEFAULT_AVATAR_URL)?,
            suggestions: SuggestionConfig {
                base_url: env_var_or("SUGGESTION_BASE_URL", DEFAULT_SUGGESTION_BASE_URL)?,
                api_key: env_var_or("SUGGESTION_API_KEY", "")?,
                model: env_var_or("SUGGESTION_MODEL", DEFAULT_SUGGESTION_MODEL)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error if the JWT secret is too short to be credible.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.auth.jwt_secret.len() >= 32,
            "JWT_SECRET must be at least 32 bytes"
        );
        Ok(())
    }
}

/// Read an environment variable with a fallback default
fn env_var_or(key: &str, default: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_owned()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {key}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_or_falls_back() {
        let value = env_var_or("FITHUB_TEST_UNSET_VARIABLE", "fallback").unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let config = ServerConfig {
            http_port: DEFAULT_HTTP_PORT,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.into(),
            },
            auth: AuthConfig {
                jwt_secret: "short".into(),
                jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            },
            frontend_url: DEFAULT_FRONTEND_URL.into(),
            default_avatar_url: DEFAULT_AVATAR_URL.into(),
            suggestions: SuggestionConfig {
                base_url: DEFAULT_SUGGESTION_BASE_URL.into(),
                api_key: String::new(),
                model: DEFAULT_SUGGESTION_MODEL.into(),
            },
        };
        assert!(config.validate().is_err());
    }
}
