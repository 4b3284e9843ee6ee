// ABOUTME: Domain service layer for business logic shared by route handlers
// ABOUTME: State machines, capability checks, and record orchestration live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Domain service layer
//!
//! Route handlers stay thin; the rules live here. Services own clones of
//! the database handle and the notification queue and are cheap to
//! construct per request.

/// Account lifecycle: registration, login, verification, password reset
pub mod accounts;

/// Trainer-client connection state machine and invitations
pub mod connections;

/// Workout logging, record detection, statistics, and AI plan persistence
pub mod workouts;

pub use accounts::AccountService;
pub use connections::{ConnectionService, TrainerListing};
pub use workouts::WorkoutService;
