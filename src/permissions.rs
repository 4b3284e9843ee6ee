// ABOUTME: Role-based capability checks for clients, trainers, and admins
// ABOUTME: Pure eligibility rules computed from profile state, never cached
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Role and Capability Model
//!
//! User roles are a closed enum so authorization checks are exhaustive
//! matches rather than string comparisons scattered across operations.
//! Capabilities (`can_accept_clients`, `is_profile_complete`) are derived
//! on read from profile state plus a live active-client count; nothing here
//! is stored, which keeps the answers from going stale against the
//! underlying mutable fields.

use crate::errors::{AppError, AppResult};
use crate::models::Profile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role within the marketplace. Immutable after account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A client logging workouts and hiring trainers
    Client,
    /// A trainer listed in the marketplace
    Trainer,
    /// Platform administrator (curates the official exercise catalog)
    Admin,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "trainer" => Ok(Self::Trainer),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::invalid_input(format!("Invalid user role: {s}"))),
        }
    }
}

/// Check whether a trainer can take on another client right now.
///
/// True iff the user is a trainer who is accepting clients, holds an active
/// subscription, and is under their client cap (an unset `max_clients`
/// means uncapped). `active_client_count` is the caller-supplied live count
/// of active connections for this trainer.
#[must_use]
pub fn can_accept_clients(role: UserRole, profile: &Profile, active_client_count: u32) -> bool {
    if role != UserRole::Trainer {
        return false;
    }
    if !profile.is_accepting_clients || !profile.subscription_active {
        return false;
    }
    match profile.max_clients {
        Some(max) => active_client_count < max,
        None => true,
    }
}

/// Check whether a profile carries the minimum information for its role.
///
/// Trainers need bio, city, state, at least one specialization, and an
/// hourly rate before their marketplace listing is considered complete.
/// Clients need a city and a fitness level.
#[must_use]
pub fn is_profile_complete(role: UserRole, profile: &Profile) -> bool {
    match role {
        UserRole::Trainer => {
            profile.bio.as_deref().is_some_and(|b| !b.is_empty())
                && profile.city.as_deref().is_some_and(|c| !c.is_empty())
                && profile.state.as_deref().is_some_and(|s| !s.is_empty())
                && !profile.specializations.is_empty()
                && profile.hourly_rate.is_some()
        }
        UserRole::Client => {
            profile.city.as_deref().is_some_and(|c| !c.is_empty())
                && profile.fitness_level.is_some()
        }
        UserRole::Admin => true,
    }
}

/// Validate a profile update against role-specific requirements.
///
/// Trainers who are accepting clients must carry an hourly rate; this is
/// enforced here at validation time rather than left advisory.
pub fn validate_profile(role: UserRole, profile: &Profile) -> AppResult<()> {
    if role == UserRole::Trainer && profile.is_accepting_clients && profile.hourly_rate.is_none() {
        return Err(AppError::invalid_input(
            "Trainers accepting clients must set an hourly rate",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FitnessLevel, Profile};

    fn trainer_profile() -> Profile {
        let mut profile = Profile::new_default("https://cdn.fithub.test/default.jpg");
        profile.bio = Some("Strength coach".into());
        profile.city = Some("Austin".into());
        profile.state = Some("TX".into());
        profile.specializations = vec!["Strength Training".into()];
        profile.hourly_rate = Some(85.0);
        profile.is_accepting_clients = true;
        profile.subscription_active = true;
        profile.max_clients = Some(20);
        profile
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Client, UserRole::Trainer, UserRole::Admin] {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("coach".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_can_accept_clients_requires_trainer_role() {
        let profile = trainer_profile();
        assert!(can_accept_clients(UserRole::Trainer, &profile, 0));
        assert!(!can_accept_clients(UserRole::Client, &profile, 0));
    }

    #[test]
    fn test_can_accept_clients_respects_subscription_and_flag() {
        let mut profile = trainer_profile();
        profile.subscription_active = false;
        assert!(!can_accept_clients(UserRole::Trainer, &profile, 0));

        let mut profile = trainer_profile();
        profile.is_accepting_clients = false;
        assert!(!can_accept_clients(UserRole::Trainer, &profile, 0));
    }

    #[test]
    fn test_can_accept_clients_cap() {
        let profile = trainer_profile();
        assert!(can_accept_clients(UserRole::Trainer, &profile, 19));
        assert!(!can_accept_clients(UserRole::Trainer, &profile, 20));

        let mut uncapped = trainer_profile();
        uncapped.max_clients = None;
        assert!(can_accept_clients(UserRole::Trainer, &uncapped, 500));
    }

    #[test]
    fn test_trainer_profile_completeness() {
        let profile = trainer_profile();
        assert!(is_profile_complete(UserRole::Trainer, &profile));

        let mut missing_specs = trainer_profile();
        missing_specs.specializations.clear();
        assert!(!is_profile_complete(UserRole::Trainer, &missing_specs));

        let mut missing_rate = trainer_profile();
        missing_rate.hourly_rate = None;
        assert!(!is_profile_complete(UserRole::Trainer, &missing_rate));
    }

    #[test]
    fn test_client_profile_completeness() {
        let mut profile = Profile::new_default("https://cdn.fithub.test/default.jpg");
        assert!(!is_profile_complete(UserRole::Client, &profile));

        profile.city = Some("Denver".into());
        profile.fitness_level = Some(FitnessLevel::Intermediate);
        assert!(is_profile_complete(UserRole::Client, &profile));
    }

    #[test]
    fn test_accepting_trainer_must_price() {
        let mut profile = trainer_profile();
        profile.hourly_rate = None;
        assert!(validate_profile(UserRole::Trainer, &profile).is_err());

        profile.is_accepting_clients = false;
        assert!(validate_profile(UserRole::Trainer, &profile).is_ok());
    }
}
