use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{
    meal_plan_prompt, parse_meal_plan_response, provider_error_message, MealPlanError,
    MealPlanProvider, WeeklyMealPlan, SYSTEM_PROMPT,
};
use crate::integrations::http_client;
use crate::quiz::UserProfile;
use crate::storage::AiConfig;

/// `generateContent` with `responseMimeType: application/json`.
pub struct GeminiProvider {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, MealPlanError> {
        Ok(Self {
            http: http_client(config.timeout())?,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }
}

#[async_trait]
impl MealPlanProvider for GeminiProvider {
    fn name(&self) -> String {
        format!("Google Gemini ({})", self.model)
    }

    async fn generate(&self, profile: &UserProfile) -> Result<WeeklyMealPlan, MealPlanError> {
        // Gemini takes the system instructions inline with the prompt.
        let text = format!("{SYSTEM_PROMPT}\n\n{}", meal_plan_prompt(profile));
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": text }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
                "responseMimeType": "application/json",
            },
        });

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = provider_error_message(resp.text().await.unwrap_or_default());
            return Err(MealPlanError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| MealPlanError::MalformedJson(e.to_string()))?;
        let content: String = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(MealPlanError::EmptyResponse);
        }

        parse_meal_plan_response(&content)
    }
}
