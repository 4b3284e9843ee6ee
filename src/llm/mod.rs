// ABOUTME: LLM-backed workout suggestion provider abstraction
// ABOUTME: Defines the WorkoutSuggester trait, plan shape types, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Workout Suggestion Providers
//!
//! The suggestion service is an opaque collaborator: it receives the user's
//! preferences and a slice of the exercise catalog, and returns a structured
//! plan. The core only validates the returned shape (a non-empty exercise
//! list where every referenced exercise id resolves against the catalog)
//! before persisting; provider failures surface as a single
//! `ExternalServiceError`, are never retried automatically, and never leave
//! a partially persisted workout behind.

pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleSuggester;

use crate::errors::{AppError, AppResult};
use crate::models::Exercise;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Workout preferences supplied by the requesting user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionPreferences {
    /// e.g. "beginner", "intermediate", "advanced"
    pub fitness_level: Option<String>,
    /// e.g. "build muscle"
    pub goals: Option<String>,
    /// Free-form injuries or limitations
    pub injuries: Option<String>,
    /// Target session length
    pub duration_minutes: Option<u32>,
    /// e.g. `["upper body"]`
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Equipment available to the user
    #[serde(default)]
    pub equipment: Vec<String>,
    /// strength, hypertrophy, endurance
    pub workout_type: Option<String>,
}

/// A catalog entry summarized for the provider prompt
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub equipment: String,
    pub muscle_groups: Vec<String>,
    pub difficulty: String,
}

impl From<&Exercise> for CatalogEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name.clone(),
            equipment: exercise.equipment.as_str().to_owned(),
            muscle_groups: exercise.muscle_groups.clone(),
            difficulty: exercise.difficulty.as_str().to_owned(),
        }
    }
}

/// One prescribed exercise within a suggested plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedExercise {
    pub exercise_id: Uuid,
    /// Echoed name, informational only
    pub exercise_name: Option<String>,
    #[serde(default = "default_order")]
    pub order: u32,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
    pub rest_seconds: Option<u32>,
    /// Form cues and coaching tips
    pub notes: Option<String>,
}

const fn default_order() -> u32 {
    1
}

/// A structured workout plan returned by a suggestion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedPlan {
    pub workout_name: String,
    pub description: Option<String>,
    pub estimated_duration: Option<u32>,
    pub warm_up_notes: Option<String>,
    pub cool_down_notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<SuggestedExercise>,
}

/// Provider trait for AI workout suggestion backends
#[async_trait]
pub trait WorkoutSuggester: Send + Sync {
    /// Unique provider identifier (e.g. "openai_compatible")
    fn name(&self) -> &'static str;

    /// Generate a workout plan from preferences and the available catalog
    async fn suggest(
        &self,
        preferences: &SuggestionPreferences,
        catalog: &[CatalogEntry],
    ) -> AppResult<SuggestedPlan>;
}

/// Validate the shape of a returned plan against the catalog it was built
/// from. Checks only what the core depends on: at least one exercise, each
/// referencing a resolvable exercise id.
pub fn validate_plan(plan: &SuggestedPlan, catalog_ids: &HashSet<Uuid>) -> AppResult<()> {
    if plan.exercises.is_empty() {
        return Err(AppError::external_service(
            "workout suggestions",
            "Plan contains no exercises",
        ));
    }
    for exercise in &plan.exercises {
        if !catalog_ids.contains(&exercise.exercise_id) {
            return Err(AppError::external_service(
                "workout suggestions",
                format!(
                    "Plan references unknown exercise {}",
                    exercise.exercise_id
                ),
            ));
        }
    }
    Ok(())
}

/// Parse a provider response body into a plan, tolerating markdown code
/// fences around the JSON.
pub fn parse_plan_json(raw: &str) -> AppResult<SuggestedPlan> {
    let mut text = raw.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }

    serde_json::from_str(text.trim()).map_err(|e| {
        AppError::external_service(
            "workout suggestions",
            format!("Failed to parse plan response: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_exercise(id: Uuid) -> SuggestedPlan {
        SuggestedPlan {
            workout_name: "Upper Body Strength".into(),
            description: None,
            estimated_duration: Some(60),
            warm_up_notes: None,
            cool_down_notes: None,
            exercises: vec![SuggestedExercise {
                exercise_id: id,
                exercise_name: Some("Bench Press".into()),
                order: 1,
                target_sets: Some(3),
                target_reps: Some("8-12".into()),
                rest_seconds: Some(90),
                notes: None,
            }],
        }
    }

    #[test]
    fn test_validate_plan_rejects_empty() {
        let mut plan = plan_with_exercise(Uuid::new_v4());
        plan.exercises.clear();
        assert!(validate_plan(&plan, &HashSet::new()).is_err());
    }

    #[test]
    fn test_validate_plan_rejects_unknown_exercise() {
        let plan = plan_with_exercise(Uuid::new_v4());
        let known: HashSet<Uuid> = [Uuid::new_v4()].into_iter().collect();
        assert!(validate_plan(&plan, &known).is_err());
    }

    #[test]
    fn test_validate_plan_accepts_resolvable() {
        let id = Uuid::new_v4();
        let plan = plan_with_exercise(id);
        let known: HashSet<Uuid> = [id].into_iter().collect();
        assert!(validate_plan(&plan, &known).is_ok());
    }

    #[test]
    fn test_parse_plan_strips_code_fences() {
        let id = Uuid::new_v4();
        let body = format!(
            "```json\n{{\"workout_name\": \"Push Day\", \"exercises\": [{{\"exercise_id\": \"{id}\"}}]}}\n```"
        );
        let plan = parse_plan_json(&body).unwrap();
        assert_eq!(plan.workout_name, "Push Day");
        assert_eq!(plan.exercises.len(), 1);
        assert_eq!(plan.exercises[0].exercise_id, id);
        assert_eq!(plan.exercises[0].order, 1);
    }

    #[test]
    fn test_parse_plan_rejects_garbage() {
        assert!(parse_plan_json("not json at all").is_err());
    }
}
