//! Fire-and-forget lead submission to a Supabase REST table.
//!
//! Submission never blocks the funnel: `spawn_submission` runs the sink on
//! a snapshot of the answers with a timeout, and every failure ends up as
//! an unsuccessful `SubmissionOutcome` instead of an error.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;

use super::credentials::Credential;
use super::http_client;
use crate::metrics::calculate_bmi;
use crate::quiz::{Answer, QuizState, WEIGHT_QUESTION_IDS};
use crate::storage::SubmissionConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionOutcome {
    pub fn ok(id: Option<String>) -> Self {
        Self {
            success: true,
            id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

/// Row sent for one funnel session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub session_id: String,
    /// Responses in the dual-unit layout downstream consumers expect, plus
    /// the catalog variant under `gender`.
    pub responses: BTreeMap<String, Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
}

impl SubmissionPayload {
    pub fn from_state(state: &QuizState) -> Self {
        let bmi = match (state.number("current-weight"), state.number("height")) {
            (Some(weight), Some(height)) => calculate_bmi(weight, height)
                .ok()
                .map(|b| (b * 10.0).round() / 10.0),
            _ => None,
        };
        let mut responses = state.legacy_responses(WEIGHT_QUESTION_IDS);
        responses.insert("gender".to_string(), Answer::Choice(state.gender.to_string()));
        Self {
            session_id: state.session_id.clone(),
            responses,
            bmi,
            target_weight: state.number("target-weight"),
        }
    }
}

/// Somewhere a finished funnel can be recorded.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome;
}

/// Inserts rows through PostgREST (`POST /rest/v1/<table>`).
pub struct SupabaseSink {
    http: Client,
    base_url: String,
    table: String,
    service_key: String,
}

impl SupabaseSink {
    pub fn new(
        base_url: &str,
        table: &str,
        service_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            service_key,
        })
    }

    /// `None` when no URL is configured or the service key is missing.
    pub fn from_config(config: &SubmissionConfig) -> Option<Self> {
        let url = config.url.as_deref().filter(|u| !u.trim().is_empty())?;
        let key = Credential::SupabaseServiceRoleKey.resolve()?;
        match Self::new(url, &config.table, key, config.timeout()) {
            Ok(sink) => Some(sink),
            Err(e) => {
                tracing::warn!(error = %e, "could not build submission client");
                None
            }
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, urlencoding::encode(&self.table))
    }
}

#[derive(Deserialize)]
struct InsertedRow {
    id: Option<serde_json::Value>,
}

#[async_trait]
impl SubmissionSink for SupabaseSink {
    async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        let resp = self
            .http
            .post(self.endpoint())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(&json!([payload]))
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => return SubmissionOutcome::failed(e.to_string()),
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return SubmissionOutcome::failed(format!("HTTP {}: {body}", status.as_u16()));
        }

        let id = resp
            .json::<Vec<InsertedRow>>()
            .await
            .ok()
            .and_then(|rows| rows.into_iter().next())
            .and_then(|row| row.id)
            .map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
        SubmissionOutcome::ok(id)
    }
}

/// Submit `state` in the background.
///
/// The task works on a snapshot taken now, so later answers never leak into
/// an in-flight request. A sink slower than `timeout` yields a failed
/// outcome.
pub fn spawn_submission(
    sink: Arc<dyn SubmissionSink>,
    state: &QuizState,
    timeout: Duration,
) -> JoinHandle<SubmissionOutcome> {
    let payload = SubmissionPayload::from_state(state);
    tokio::spawn(async move {
        let outcome = match tokio::time::timeout(timeout, sink.submit(&payload)).await {
            Ok(outcome) => outcome,
            Err(_) => SubmissionOutcome::failed(format!(
                "submission timed out after {}s",
                timeout.as_secs_f64()
            )),
        };
        if outcome.success {
            tracing::info!(session_id = %payload.session_id, id = ?outcome.id, "funnel submitted");
        } else {
            tracing::warn!(
                session_id = %payload.session_id,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "funnel submission failed"
            );
        }
        outcome
    })
}
