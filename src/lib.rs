// ABOUTME: Main library entry point for the Fitness Hub marketplace backend
// ABOUTME: Trainer-client connections, workout logging, records, and AI workouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

#![deny(unsafe_code)]

//! # Fitness Hub Server
//!
//! A fitness marketplace backend: clients find trainers, request
//! connections with granular data-sharing permissions, log workouts, and
//! track personal records. Trainers manage their client roster and
//! marketplace listing. An AI suggestion provider drafts workout plans
//! against the shared exercise catalog.
//!
//! ## Architecture
//!
//! - **Models**: domain structs and closed enums ([`models`], [`permissions`])
//! - **Database**: SQLite persistence with per-domain operations ([`database`])
//! - **Intelligence**: pure volume, record, and streak computation ([`intelligence`])
//! - **Services**: the state machines and orchestration ([`services`])
//! - **Routes**: axum REST handlers ([`routes`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fithub_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Fitness Hub configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication and JWT session management
pub mod auth;

/// Configuration management and environment loading
pub mod config;

/// Shared server resources for dependency injection
pub mod context;

/// Database management and persistence
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Training analysis engines: volume, personal records, streak statistics
pub mod intelligence;

/// LLM-backed workout suggestion provider abstraction
pub mod llm;

/// Structured logging configuration
pub mod logging;

/// Common data models for users, connections, and workouts
pub mod models;

/// Fire-and-forget notification dispatch
pub mod notifications;

/// Role and capability model
pub mod permissions;

/// HTTP routes for the REST API
pub mod routes;

/// Domain service layer for protocol-agnostic business logic
pub mod services;
