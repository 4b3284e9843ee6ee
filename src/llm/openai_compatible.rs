// ABOUTME: Generic OpenAI-compatible workout suggestion provider
// ABOUTME: Works against OpenAI, Ollama, vLLM, or any chat-completions endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # `OpenAI`-Compatible Suggestion Provider
//!
//! Calls a chat-completions endpoint with the user's preferences and a
//! summary of the exercise catalog, asking for a JSON workout plan. Any
//! failure (transport, non-success status, malformed body) surfaces as a
//! single external-service error; nothing is retried here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info};

use super::{parse_plan_json, CatalogEntry, SuggestedPlan, SuggestionPreferences, WorkoutSuggester};
use crate::config::SuggestionConfig;
use crate::errors::{AppError, AppResult};

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local inference can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Cap on catalog entries included in the prompt, to bound token usage
const CATALOG_PROMPT_LIMIT: usize = 50;

/// Chat request body in `OpenAI`-compatible format
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat response body, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Suggestion provider backed by any `OpenAI`-compatible endpoint
pub struct OpenAiCompatibleSuggester {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleSuggester {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SuggestionConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn build_prompt(preferences: &SuggestionPreferences, catalog: &[CatalogEntry]) -> String {
        let fitness_level = preferences.fitness_level.as_deref().unwrap_or("beginner");
        let goals = preferences.goals.as_deref().unwrap_or("general fitness");
        let injuries = preferences.injuries.as_deref().unwrap_or("none");
        let duration = preferences.duration_minutes.unwrap_or(60);
        let workout_type = preferences.workout_type.as_deref().unwrap_or("strength");
        let focus_areas = if preferences.focus_areas.is_empty() {
            "full body".to_owned()
        } else {
            preferences.focus_areas.join(", ")
        };
        let equipment = if preferences.equipment.is_empty() {
            "all available".to_owned()
        } else {
            preferences.equipment.join(", ")
        };

        let mut library = String::new();
        for entry in catalog.iter().take(CATALOG_PROMPT_LIMIT) {
            let _ = writeln!(
                library,
                "ID: {} | Name: {} | Equipment: {} | Muscles: {} | Difficulty: {}",
                entry.id,
                entry.name,
                entry.equipment,
                entry.muscle_groups.join(", "),
                entry.difficulty
            );
        }

        format!(
            r#"You are an expert fitness coach. Create a personalized workout plan based on the following:

USER PROFILE:
- Fitness Level: {fitness_level}
- Goals: {goals}
- Injuries/Limitations: {injuries}

WORKOUT PREFERENCES:
- Duration: {duration} minutes
- Focus Areas: {focus_areas}
- Available Equipment: {equipment}
- Workout Type: {workout_type}

AVAILABLE EXERCISES:
{library}
INSTRUCTIONS:
1. Select 5-8 exercises from the AVAILABLE EXERCISES list only
2. Create a balanced workout targeting the requested focus areas
3. Consider the user's fitness level when prescribing sets, reps, and rest
4. Add coaching notes for proper form and safety

RESPONSE FORMAT (JSON):
{{
    "workout_name": "Descriptive workout name",
    "description": "Brief overview of the workout",
    "estimated_duration": {duration},
    "warm_up_notes": "Warm-up recommendations",
    "exercises": [
        {{
            "exercise_id": "uuid from the available list",
            "exercise_name": "Exercise name from the available list",
            "order": 1,
            "target_sets": 3,
            "target_reps": "8-12",
            "rest_seconds": 90,
            "notes": "Form cues and coaching tips"
        }}
    ],
    "cool_down_notes": "Cool-down and stretching recommendations"
}}

Respond ONLY with valid JSON, no additional text."#
        )
    }
}

#[async_trait]
impl WorkoutSuggester for OpenAiCompatibleSuggester {
    fn name(&self) -> &'static str {
        "openai_compatible"
    }

    async fn suggest(
        &self,
        preferences: &SuggestionPreferences,
        catalog: &[CatalogEntry],
    ) -> AppResult<SuggestedPlan> {
        let prompt = Self::build_prompt(preferences, catalog);
        debug!("Requesting workout suggestion from {}", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are an expert fitness coach and personal trainer. \
                              You create safe, effective, personalized workout plans."
                        .into(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
            max_tokens: 2000,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::external_service("workout suggestions", format!("Request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(
                "workout suggestions",
                format!("Provider returned {status}: {body}"),
            ));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            AppError::external_service(
                "workout suggestions",
                format!("Malformed provider response: {e}"),
            )
        })?;

        let content = chat
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| {
                AppError::external_service("workout suggestions", "Provider returned no choices")
            })?;

        let plan = parse_plan_json(content)?;
        info!(
            "Received suggested plan '{}' with {} exercises",
            plan.workout_name,
            plan.exercises.len()
        );
        Ok(plan)
    }
}
