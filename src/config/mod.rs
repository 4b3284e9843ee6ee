// ABOUTME: Configuration module for the Fitness Hub server
// ABOUTME: Environment-driven settings for HTTP, database, auth, and AI suggestions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Configuration management
//!
//! All runtime configuration is loaded from environment variables through
//! [`environment::ServerConfig::from_env`]. Values that the rest of the code
//! would otherwise be tempted to hard-code (the default avatar URL, token
//! lifetimes, the frontend base URL used in email links) live here so they
//! are injected rather than hidden module-level defaults.

pub mod environment;

pub use environment::{AuthConfig, DatabaseConfig, ServerConfig, SuggestionConfig};
