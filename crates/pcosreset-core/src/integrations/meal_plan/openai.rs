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

/// Chat completions with `response_format: json_object`.
pub struct OpenAiProvider {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, MealPlanError> {
        Ok(Self {
            http: http_client(config.timeout())?,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        })
    }
}

#[async_trait]
impl MealPlanProvider for OpenAiProvider {
    fn name(&self) -> String {
        format!("OpenAI ({})", self.model)
    }

    async fn generate(&self, profile: &UserProfile) -> Result<WeeklyMealPlan, MealPlanError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": meal_plan_prompt(profile) },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" },
        });

        let resp = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
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

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| MealPlanError::MalformedJson(e.to_string()))?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(MealPlanError::EmptyResponse)?;

        parse_meal_plan_response(&content)
    }
}
