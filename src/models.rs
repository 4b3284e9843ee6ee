// ABOUTME: Core data models for the Fitness Hub marketplace
// ABOUTME: Defines User, Profile, connections, workout logs, and personal records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Data Models
//!
//! This module contains the core data structures used throughout the Fitness
//! Hub server.
//!
//! ## Design Principles
//!
//! - **Closed enums**: roles, statuses, and tiers are tagged variants, not
//!   free-form strings, so authorization and state checks are exhaustive
//!   matches
//! - **Serializable**: all models support JSON serialization for the REST API
//! - **Derived values stay derived**: capability answers and workout
//!   aggregates are computed on read (see [`crate::permissions`] and
//!   [`crate::intelligence`]), never persisted
//!
//! ## Core Models
//!
//! - [`User`] / [`Profile`]: account identity and marketplace profile
//! - [`TrainerClientConnection`]: trainer-client relationship lifecycle
//! - [`Exercise`] / [`WorkoutLog`] / [`ExerciseLog`]: the workout log tree
//! - [`PersonalRecord`]: best-ever performance markers

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::AppError;
use crate::permissions::UserRole;

// ============================================================================
// Users and profiles
// ============================================================================

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Unique email address, used for login
    pub email: String,
    /// Unique handle, derived from the email local part when not supplied
    pub username: String,
    /// Display name
    pub full_name: String,
    /// Optional contact number
    pub phone_number: Option<String>,
    /// Role, immutable after creation
    pub role: UserRole,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Bcrypt password hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified user. The username falls back to the email
    /// local part when none is given.
    #[must_use]
    pub fn new(
        email: String,
        password_hash: String,
        full_name: String,
        username: Option<String>,
        role: UserRole,
    ) -> Self {
        let username = username.unwrap_or_else(|| {
            email
                .split_once('@')
                .map_or_else(|| email.clone(), |(local, _)| local.to_owned())
        });
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            full_name,
            phone_number: None,
            role,
            is_verified: false,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Self-reported gender on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NonBinary => "non_binary",
            Self::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "non_binary" => Ok(Self::NonBinary),
            "prefer_not_to_say" => Ok(Self::PreferNotToSay),
            _ => Err(AppError::invalid_input(format!("Invalid gender: {s}"))),
        }
    }
}

/// Client self-assessed training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for FitnessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(AppError::invalid_input(format!(
                "Invalid fitness level: {s}"
            ))),
        }
    }
}

/// Trainer marketplace subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// 30-day trial for new trainers
    #[default]
    FreeTrial,
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FreeTrial => "free_trial",
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_trial" => Ok(Self::FreeTrial),
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(AppError::invalid_input(format!(
                "Invalid subscription tier: {s}"
            ))),
        }
    }
}

/// Marketplace listing visibility for trainer profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVisibility {
    /// Listed in marketplace search
    #[default]
    Public,
    /// Accessible via direct link only
    Unlisted,
    /// Not accessible
    Private,
}

impl ProfileVisibility {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }
}

impl FromStr for ProfileVisibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            _ => Err(AppError::invalid_input(format!(
                "Invalid profile visibility: {s}"
            ))),
        }
    }
}

/// A professional certification held by a trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    /// Certification name, e.g. "NASM-CPT"
    pub name: String,
    /// Issuing organization
    pub issuer: Option<String>,
    /// Year obtained
    pub year: Option<u16>,
}

/// Universal profile for all users. Created atomically with its owning
/// [`User`] and cascade-deleted with it. Fields are partitioned into
/// universal, trainer-only, and client-only groups; the unused group for a
/// given role simply stays at its defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    // Universal
    /// Avatar image URL; seeded from the configured default
    pub avatar_url: String,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub instagram_handle: Option<String>,
    pub website_url: Option<String>,

    // Trainer-only
    /// e.g. `["Strength Training", "HIIT", "Weight Loss"]`
    pub specializations: Vec<String>,
    pub certifications: Vec<Certification>,
    pub years_experience: Option<u32>,
    /// Standard hourly rate in USD
    pub hourly_rate: Option<f64>,
    /// Currently accepting new clients
    pub is_accepting_clients: bool,
    /// Maximum number of active clients; `None` means uncapped
    pub max_clients: Option<u32>,
    pub subscription_tier: SubscriptionTier,
    /// Has an active paid subscription
    pub subscription_active: bool,
    pub profile_visibility: ProfileVisibility,

    // Client-only
    /// e.g. `["Build Muscle", "Lose Weight"]`
    pub fitness_goals: Vec<String>,
    pub fitness_level: Option<FitnessLevel>,
    /// Injuries, medical conditions, or physical limitations
    pub injuries_limitations: Option<String>,

    // Privacy
    /// Allow trainers to send connection invitations (clients only)
    pub allow_trainer_requests: bool,
    pub show_workout_stats_publicly: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile with every optional field unset and the configured
    /// default avatar.
    #[must_use]
    pub fn new_default(avatar_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            avatar_url: avatar_url.into(),
            bio: None,
            city: None,
            state: None,
            country: "USA".into(),
            gender: None,
            date_of_birth: None,
            instagram_handle: None,
            website_url: None,
            specializations: Vec::new(),
            certifications: Vec::new(),
            years_experience: None,
            hourly_rate: None,
            is_accepting_clients: true,
            max_clients: Some(20),
            subscription_tier: SubscriptionTier::FreeTrial,
            subscription_active: false,
            profile_visibility: ProfileVisibility::Public,
            fitness_goals: Vec::new(),
            fitness_level: None,
            injuries_limitations: None,
            allow_trainer_requests: true,
            show_workout_stats_publicly: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Human-readable location string
    #[must_use]
    pub fn display_location(&self) -> String {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.to_owned(),
            (None, Some(state)) => state.to_owned(),
            (None, None) => "Location not specified".to_owned(),
        }
    }

    /// Age in whole years as of `today`, if a birth date is set
    #[must_use]
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        let mut years = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

// ============================================================================
// Trainer-client connections
// ============================================================================

/// Lifecycle state of a trainer-client connection.
///
/// Transitions: `Pending -> {Active, Rejected}`, `Active -> {Paused, Ended}`,
/// `Paused -> {Active, Ended}`. `Ended` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Active,
    Paused,
    Ended,
    Rejected,
}

impl ConnectionStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Ended => "ended",
            Self::Rejected => "rejected",
        }
    }

    /// Terminal states admit no further transitions
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Rejected)
    }

    /// Live states count against the one-live-connection-per-pair rule
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Active | Self::Paused)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "ended" => Ok(Self::Ended),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::invalid_input(format!(
                "Invalid connection status: {s}"
            ))),
        }
    }
}

/// Data-sharing permission flags on a connection. Owned and mutable
/// exclusively by the client side of the relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPermissions {
    /// Trainer can view workout logs
    pub can_view_workouts: bool,
    /// Trainer can create and assign workouts
    pub can_assign_workouts: bool,
    /// Trainer can view nutrition logs
    pub can_view_nutrition: bool,
    /// Trainer can view progress photos
    pub can_view_progress_photos: bool,
    /// Trainer can view weight and measurements
    pub can_view_body_metrics: bool,
    /// Trainer can comment on workouts
    pub can_comment_workouts: bool,
}

impl Default for ConnectionPermissions {
    fn default() -> Self {
        Self {
            can_view_workouts: true,
            can_assign_workouts: true,
            can_view_nutrition: false,
            can_view_progress_photos: false,
            can_view_body_metrics: false,
            can_comment_workouts: true,
        }
    }
}

/// Partial permission update. Unset flags keep their prior value.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct PermissionUpdate {
    pub can_view_workouts: Option<bool>,
    pub can_assign_workouts: Option<bool>,
    pub can_view_nutrition: Option<bool>,
    pub can_view_progress_photos: Option<bool>,
    pub can_view_body_metrics: Option<bool>,
    pub can_comment_workouts: Option<bool>,
}

impl PermissionUpdate {
    /// Apply this partial update over existing flags
    #[must_use]
    pub fn apply(&self, current: ConnectionPermissions) -> ConnectionPermissions {
        ConnectionPermissions {
            can_view_workouts: self.can_view_workouts.unwrap_or(current.can_view_workouts),
            can_assign_workouts: self
                .can_assign_workouts
                .unwrap_or(current.can_assign_workouts),
            can_view_nutrition: self
                .can_view_nutrition
                .unwrap_or(current.can_view_nutrition),
            can_view_progress_photos: self
                .can_view_progress_photos
                .unwrap_or(current.can_view_progress_photos),
            can_view_body_metrics: self
                .can_view_body_metrics
                .unwrap_or(current.can_view_body_metrics),
            can_comment_workouts: self
                .can_comment_workouts
                .unwrap_or(current.can_comment_workouts),
        }
    }
}

/// One lifecycle of a trainer-client relationship.
///
/// Connection rows are versioned: at most one live (pending/active/paused)
/// row exists per (trainer, client) pair, while ended and rejected rows are
/// kept as history. A fresh request after termination opens a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerClientConnection {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub status: ConnectionStatus,
    pub permissions: ConnectionPermissions,
    /// Message from the client when requesting the connection
    pub request_message: Option<String>,
    /// Reason supplied by the trainer on rejection
    pub rejection_reason: Option<String>,
    /// Private trainer notes about this client
    pub trainer_notes: Option<String>,
    /// Set at creation, immutable
    pub requested_at: DateTime<Utc>,
    /// Set exactly once, at acceptance
    pub connected_at: Option<DateTime<Utc>>,
    /// Set at termination
    pub ended_at: Option<DateTime<Utc>>,
}

/// Status of a trainer-initiated invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl InvitationStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for InvitationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            _ => Err(AppError::invalid_input(format!(
                "Invalid invitation status: {s}"
            ))),
        }
    }
}

/// Trainer outreach to a prospective client by email. The recipient may not
/// hold an account yet, so this is an independent entity rather than a
/// connection row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInvitation {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub message: Option<String>,
    pub status: InvitationStatus,
    /// Linked once a user accepts
    pub accepted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ConnectionInvitation {
    /// Whether the invitation has passed its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// ============================================================================
// Exercise catalog
// ============================================================================

/// Equipment required for an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Machine,
    #[default]
    Bodyweight,
    Cable,
    Kettlebell,
    ResistanceBand,
    Other,
}

impl Equipment {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Barbell => "barbell",
            Self::Dumbbell => "dumbbell",
            Self::Machine => "machine",
            Self::Bodyweight => "bodyweight",
            Self::Cable => "cable",
            Self::Kettlebell => "kettlebell",
            Self::ResistanceBand => "resistance_band",
            Self::Other => "other",
        }
    }
}

impl FromStr for Equipment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "barbell" => Ok(Self::Barbell),
            "dumbbell" => Ok(Self::Dumbbell),
            "machine" => Ok(Self::Machine),
            "bodyweight" => Ok(Self::Bodyweight),
            "cable" => Ok(Self::Cable),
            "kettlebell" => Ok(Self::Kettlebell),
            "resistance_band" => Ok(Self::ResistanceBand),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_input(format!("Invalid equipment: {s}"))),
        }
    }
}

/// Difficulty rating for catalog exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseDifficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExerciseDifficulty {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for ExerciseDifficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(AppError::invalid_input(format!(
                "Invalid exercise difficulty: {s}"
            ))),
        }
    }
}

/// A catalog exercise, shared across all users.
///
/// Official exercises are admin-curated and immutable by everyone else.
/// Custom exercises belong to `created_by` and are editable and deletable
/// only by their creator, and only while not official. Deleting an exercise
/// that has been logged against is rejected (restrict-on-delete).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Demo video link
    pub video_url: Option<String>,
    /// e.g. `["chest", "triceps", "shoulders"]`
    pub muscle_groups: Vec<String>,
    pub equipment: Equipment,
    pub difficulty: ExerciseDifficulty,
    /// Creator for custom exercises; `None` for seeded official entries
    pub created_by: Option<Uuid>,
    pub is_official: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Workout logs
// ============================================================================

/// One performed (or skipped) set within an exercise log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub reps: u32,
    /// Weight in pounds
    pub weight: f64,
    /// Rate of perceived exertion, 1-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    /// Only completed sets count toward volume and records
    pub completed: bool,
}

/// One exercise within a workout log, holding its ordered set records and
/// optional target prescription from an assigning trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: Uuid,
    pub workout_log_id: Uuid,
    pub exercise_id: Uuid,
    /// Position within the workout
    pub order: u32,
    pub sets: Vec<SetEntry>,
    pub target_sets: Option<u32>,
    /// e.g. "8-12", "AMRAP"
    pub target_reps: Option<String>,
    pub target_weight: Option<f64>,
    pub notes: Option<String>,
    /// Rest between sets, in seconds
    pub rest_seconds: u32,
}

/// A single workout session, owned by exactly one user. Deleting a workout
/// cascades to its exercise logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    /// e.g. "Push Day", "Leg Day"
    pub name: String,
    pub notes: Option<String>,
    pub workout_date: NaiveDate,
    pub duration_minutes: Option<u32>,
    /// How energetic the session felt, 1-5
    pub energy_rating: Option<u8>,
    /// How hard the session felt, 1-5
    pub difficulty_rating: Option<u8>,
    pub is_favorite: bool,
    /// Saved as a reusable template
    pub is_template: bool,
    pub template_name: Option<String>,
    pub is_shared_with_trainer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Personal records
// ============================================================================

/// The metric a personal record tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrType {
    /// Heaviest completed-set weight for an exercise
    MaxWeight,
    /// Highest single-session volume for an exercise
    MaxVolume,
}

impl PrType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaxWeight => "max_weight",
            Self::MaxVolume => "max_volume",
        }
    }
}

impl fmt::Display for PrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max_weight" => Ok(Self::MaxWeight),
            "max_volume" => Ok(Self::MaxVolume),
            _ => Err(AppError::invalid_input(format!("Invalid PR type: {s}"))),
        }
    }
}

/// Best-ever value of a metric for a (user, exercise) pair. At most one row
/// exists per (user, exercise, `pr_type`); only the record engine mutates
/// these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    pub pr_type: PrType,
    /// Weight in pounds for `MaxWeight`, pound-reps for `MaxVolume`
    pub value: f64,
    /// Workout in which the record was achieved
    pub workout_log_id: Option<Uuid>,
    pub date_achieved: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// One-shot account tokens
// ============================================================================

/// One-time token for email verification (24 hour expiry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailVerificationToken {
    pub user_id: Uuid,
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
}

impl EmailVerificationToken {
    /// Hours a verification token stays valid
    pub const TTL_HOURS: i64 = 24;

    /// Whether the token has passed its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.created_at + chrono::Duration::hours(Self::TTL_HOURS)
    }
}

/// One-time token for password reset (30 minute expiry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub user_id: Uuid,
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Minutes a reset token stays valid
    pub const TTL_MINUTES: i64 = 30;

    /// Whether the token has passed its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.created_at + chrono::Duration::minutes(Self::TTL_MINUTES)
    }
}
