//! Personalised weekly meal plan generation through an LLM provider.

mod gemini;
mod openai;
mod prompt;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use prompt::{meal_plan_prompt, SYSTEM_PROMPT};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::credentials::Credential;
use crate::quiz::{QuizState, UserProfile};
use crate::storage::{AiConfig, AiProvider};

/// Days a generated plan must contain.
pub const PLAN_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMealPlan {
    pub day: String,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    #[serde(default)]
    pub snacks: Vec<Meal>,
}

impl DayMealPlan {
    pub fn meals(&self) -> impl Iterator<Item = &Meal> {
        [&self.breakfast, &self.lunch, &self.dinner]
            .into_iter()
            .chain(self.snacks.iter())
    }

    pub fn total_calories(&self) -> f64 {
        self.meals().map(|m| m.calories).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMealPlan {
    pub days: Vec<DayMealPlan>,
}

#[derive(Error, Debug)]
pub enum MealPlanError {
    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Provider response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Invalid meal plan structure: {0}")]
    InvalidStructure(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Request to provider failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Meal plan provider is not configured: {0}")]
    NotConfigured(String),

    #[error("Provider did not answer in time")]
    Timeout,

    #[error("A profile needs age, height and current weight before a plan can be generated")]
    IncompleteProfile,
}

impl From<reqwest::Error> for MealPlanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MealPlanError::Timeout
        } else {
            MealPlanError::Http(err)
        }
    }
}

/// An LLM backend that can write a meal plan.
#[async_trait]
pub trait MealPlanProvider: Send + Sync {
    /// Provider and model, for logging.
    fn name(&self) -> String;

    async fn generate(&self, profile: &UserProfile) -> Result<WeeklyMealPlan, MealPlanError>;
}

/// Pick the provider named by `ai.provider`, with its key from the
/// environment or keyring.
pub fn provider_from_config(config: &AiConfig) -> Result<Box<dyn MealPlanProvider>, MealPlanError> {
    let (credential, name) = match config.provider {
        AiProvider::OpenAi => (Credential::OpenAiApiKey, "OpenAI"),
        AiProvider::Gemini => (Credential::GoogleAiApiKey, "Gemini"),
    };
    let api_key = credential.resolve().ok_or_else(|| {
        MealPlanError::NotConfigured(format!(
            "{} is required for the {name} provider",
            credential.env_var()
        ))
    })?;
    Ok(match config.provider {
        AiProvider::OpenAi => Box::new(OpenAiProvider::new(config, api_key)?),
        AiProvider::Gemini => Box::new(GeminiProvider::new(config, api_key)?),
    })
}

/// Generate a plan for the answers in `state`.
///
/// # Errors
/// `IncompleteProfile` until age, height and current weight are answered.
pub async fn generate_for_state(
    provider: &dyn MealPlanProvider,
    state: &QuizState,
) -> Result<WeeklyMealPlan, MealPlanError> {
    let profile = UserProfile::from_state(state).ok_or(MealPlanError::IncompleteProfile)?;
    tracing::info!(provider = %provider.name(), session_id = %state.session_id, "generating meal plan");
    let plan = provider.generate(&profile).await;
    if let Err(e) = &plan {
        tracing::warn!(provider = %provider.name(), error = %e, "meal plan generation failed");
    }
    plan
}

/// Turn raw model output into a validated plan.
///
/// Surrounding markdown code fences are stripped first. The result must be
/// an object whose `days` array holds exactly seven days.
pub fn parse_meal_plan_response(raw: &str) -> Result<WeeklyMealPlan, MealPlanError> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(MealPlanError::EmptyResponse);
    }

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| MealPlanError::MalformedJson(e.to_string()))?;
    let days = value
        .get("days")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| MealPlanError::InvalidStructure("missing 'days' array".into()))?;
    if days.len() != PLAN_DAYS {
        return Err(MealPlanError::InvalidStructure(format!(
            "expected {PLAN_DAYS} days, got {}",
            days.len()
        )));
    }

    serde_json::from_value(value).map_err(|e| MealPlanError::InvalidStructure(e.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Error message from a provider's JSON error body, or the raw body.
pub(crate) fn provider_error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body)
}
