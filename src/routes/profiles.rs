// ABOUTME: Profile routes and trainer marketplace browse endpoints
// ABOUTME: Explicit view-model projections per viewer relationship, no dynamic field filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Profile and marketplace routes
//!
//! The own-profile endpoints return the full document; the public trainer
//! endpoints project an explicit marketplace view. Each projection is its
//! own response struct rather than conditional field deletion on a shared
//! object.

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::{
    Certification, FitnessLevel, Gender, Profile, ProfileVisibility,
};
use crate::permissions;
use crate::services::TrainerListing;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// The caller's own profile
#[derive(Debug, Serialize)]
pub struct OwnProfileResponse {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub profile: Profile,
    /// Whether the profile meets the minimum for its role
    pub is_complete: bool,
}

/// Partial profile update; unset fields keep their prior value
#[derive(Debug, Deserialize, Default)]
pub struct ProfileUpdateBody {
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub instagram_handle: Option<String>,
    pub website_url: Option<String>,
    pub specializations: Option<Vec<String>>,
    pub certifications: Option<Vec<Certification>>,
    pub years_experience: Option<u32>,
    pub hourly_rate: Option<f64>,
    pub is_accepting_clients: Option<bool>,
    pub max_clients: Option<u32>,
    pub profile_visibility: Option<String>,
    pub fitness_goals: Option<Vec<String>>,
    pub fitness_level: Option<String>,
    pub injuries_limitations: Option<String>,
    pub allow_trainer_requests: Option<bool>,
    pub show_workout_stats_publicly: Option<bool>,
}

impl ProfileUpdateBody {
    /// Merge this partial update over an existing profile
    fn apply(self, mut profile: Profile) -> Result<Profile, AppError> {
        if let Some(avatar_url) = self.avatar_url {
            profile.avatar_url = avatar_url;
        }
        if let Some(bio) = self.bio {
            profile.bio = Some(bio);
        }
        if let Some(city) = self.city {
            profile.city = Some(city);
        }
        if let Some(state) = self.state {
            profile.state = Some(state);
        }
        if let Some(country) = self.country {
            profile.country = country;
        }
        if let Some(gender) = self.gender {
            profile.gender = Some(Gender::from_str(&gender)?);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            profile.date_of_birth = Some(date_of_birth);
        }
        if let Some(instagram_handle) = self.instagram_handle {
            profile.instagram_handle = Some(instagram_handle);
        }
        if let Some(website_url) = self.website_url {
            profile.website_url = Some(website_url);
        }
        if let Some(specializations) = self.specializations {
            profile.specializations = specializations;
        }
        if let Some(certifications) = self.certifications {
            profile.certifications = certifications;
        }
        if let Some(years_experience) = self.years_experience {
            profile.years_experience = Some(years_experience);
        }
        if let Some(hourly_rate) = self.hourly_rate {
            profile.hourly_rate = Some(hourly_rate);
        }
        if let Some(is_accepting_clients) = self.is_accepting_clients {
            profile.is_accepting_clients = is_accepting_clients;
        }
        if let Some(max_clients) = self.max_clients {
            profile.max_clients = Some(max_clients);
        }
        if let Some(profile_visibility) = self.profile_visibility {
            profile.profile_visibility = ProfileVisibility::from_str(&profile_visibility)?;
        }
        if let Some(fitness_goals) = self.fitness_goals {
            profile.fitness_goals = fitness_goals;
        }
        if let Some(fitness_level) = self.fitness_level {
            profile.fitness_level = Some(FitnessLevel::from_str(&fitness_level)?);
        }
        if let Some(injuries_limitations) = self.injuries_limitations {
            profile.injuries_limitations = Some(injuries_limitations);
        }
        if let Some(allow_trainer_requests) = self.allow_trainer_requests {
            profile.allow_trainer_requests = allow_trainer_requests;
        }
        if let Some(show_workout_stats_publicly) = self.show_workout_stats_publicly {
            profile.show_workout_stats_publicly = show_workout_stats_publicly;
        }
        Ok(profile)
    }
}

/// Public trainer projection for marketplace browse
#[derive(Debug, Serialize)]
pub struct TrainerPublicResponse {
    pub id: String,
    pub full_name: String,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub display_location: String,
    pub specializations: Vec<String>,
    pub certifications: Vec<Certification>,
    pub years_experience: Option<u32>,
    pub hourly_rate: Option<f64>,
    pub instagram_handle: Option<String>,
    pub current_client_count: u32,
    pub can_accept_clients: bool,
}

impl From<TrainerListing> for TrainerPublicResponse {
    fn from(listing: TrainerListing) -> Self {
        Self {
            id: listing.user.id.to_string(),
            full_name: listing.user.full_name,
            avatar_url: listing.profile.avatar_url.clone(),
            bio: listing.profile.bio.clone(),
            display_location: listing.profile.display_location(),
            specializations: listing.profile.specializations.clone(),
            certifications: listing.profile.certifications.clone(),
            years_experience: listing.profile.years_experience,
            hourly_rate: listing.profile.hourly_rate,
            instagram_handle: listing.profile.instagram_handle.clone(),
            current_client_count: listing.active_clients,
            can_accept_clients: listing.can_accept_clients,
        }
    }
}

/// Query parameters for trainer browse
#[derive(Debug, Deserialize, Default)]
pub struct TrainerSearchQuery {
    pub search: Option<String>,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile and marketplace routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::handle_get_profile))
            .route("/api/profile", put(Self::handle_update_profile))
            .route("/api/trainers", get(Self::handle_list_trainers))
            .route("/api/trainers/:id", get(Self::handle_trainer_detail))
            .with_state(resources)
    }

    /// Handle GET /api/profile
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let (user, profile) = resources.accounts().get_own_profile(&principal).await?;

        let response = OwnProfileResponse {
            user_id: user.id.to_string(),
            email: user.email,
            full_name: user.full_name,
            role: user.role.to_string(),
            is_complete: permissions::is_profile_complete(principal.role, &profile),
            profile,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/profile
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<ProfileUpdateBody>,
    ) -> Result<Response, AppError> {
        let principal = resources.auth.principal_from_headers(&headers)?;
        let accounts = resources.accounts();

        let (user, current) = accounts.get_own_profile(&principal).await?;
        let updated = body.apply(current)?;
        let profile = accounts.update_own_profile(&principal, updated).await?;

        let response = OwnProfileResponse {
            user_id: user.id.to_string(),
            email: user.email,
            full_name: user.full_name,
            role: user.role.to_string(),
            is_complete: permissions::is_profile_complete(principal.role, &profile),
            profile,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/trainers - public marketplace browse
    async fn handle_list_trainers(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<TrainerSearchQuery>,
    ) -> Result<Response, AppError> {
        let listings = resources
            .connections()
            .list_trainers(query.search.as_deref())
            .await?;
        let trainers: Vec<TrainerPublicResponse> =
            listings.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(trainers)).into_response())
    }

    /// Handle GET /api/trainers/:id
    async fn handle_trainer_detail(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let listing = resources.connections().trainer_detail(id).await?;
        let response: TrainerPublicResponse = listing.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
