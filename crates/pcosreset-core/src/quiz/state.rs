//! Per-session quiz state.
//!
//! This is the only thing that gets persisted. Everything else (profile,
//! BMI, projections, lbs values) is recomputed from `responses` on demand.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answer::Answer;
use super::catalog::Gender;
use crate::metrics::kg_to_lbs;

/// Unique identifier for a funnel session.
pub type SessionId = String;

/// Stored layout: `{currentStep, responses, sessionId, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub session_id: SessionId,
    /// 1-based step pointer, always inside the active catalog.
    pub current_step: u32,
    #[serde(default)]
    pub responses: BTreeMap<String, Answer>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
    /// Set once the funnel is advanced past its last step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizState {
    pub fn new(gender: Gender) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            current_step: 1,
            responses: BTreeMap::new(),
            gender,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn response(&self, question_id: &str) -> Option<&Answer> {
        self.responses.get(question_id)
    }

    /// Upsert. Last write wins.
    pub fn set_response(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.responses.insert(question_id.into(), answer);
    }

    pub fn number(&self, question_id: &str) -> Option<f64> {
        self.response(question_id).and_then(Answer::as_number)
    }

    pub fn choice(&self, question_id: &str) -> Option<&str> {
        self.response(question_id).and_then(Answer::as_choice)
    }

    pub fn choices(&self, question_id: &str) -> Option<&[String]> {
        self.response(question_id).and_then(Answer::as_choices)
    }

    /// Pounds for a weight answer, derived from the canonical kg value.
    pub fn weight_lbs(&self, question_id: &str) -> Option<f64> {
        self.number(question_id).map(kg_to_lbs)
    }

    /// Responses plus rounded `<id>-lbs` shadows for every weight answer,
    /// for consumers that still read the old dual-unit layout.
    ///
    /// `weight_question_ids` names the questions whose answers are kg.
    pub fn legacy_responses<'a>(
        &self,
        weight_question_ids: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, Answer> {
        let mut out = self.responses.clone();
        for id in weight_question_ids {
            if let Some(lbs) = self.weight_lbs(id) {
                out.insert(format!("{id}-lbs"), Answer::Number(lbs.round()));
            }
        }
        out
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new(Gender::default())
    }
}
