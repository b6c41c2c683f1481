use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::{Answer, Gender, QuestionType};

/// Every state change in the funnel produces an Event.
/// Front ends render from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    AnswerRecorded {
        session_id: String,
        step: u32,
        question_id: String,
        answer: Answer,
        at: DateTime<Utc>,
    },
    StepAdvanced {
        from_step: u32,
        to_step: u32,
        at: DateTime<Utc>,
    },
    StepRetreated {
        from_step: u32,
        to_step: u32,
        at: DateTime<Utc>,
    },
    /// "Continue" pressed on a required question without a usable answer.
    AdvanceBlocked {
        step: u32,
        question_id: String,
        at: DateTime<Utc>,
    },
    /// Navigation to a step outside the catalog was sent back to the start.
    Redirected {
        requested: i64,
        to_step: u32,
        at: DateTime<Utc>,
    },
    /// Emitted once, when the last step is continued past.
    FunnelCompleted {
        session_id: String,
        total_steps: u32,
        at: DateTime<Utc>,
    },
    /// Back pressed at the first step with exit-on-back enabled.
    FunnelExited {
        session_id: String,
        at: DateTime<Utc>,
    },
    GenderChanged {
        gender: Gender,
        at: DateTime<Utc>,
    },
    QuizReset {
        /// The freshly issued session id.
        session_id: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_id: String,
        gender: Gender,
        step: u32,
        total_steps: u32,
        question_id: String,
        question_type: QuestionType,
        answered: usize,
        progress_pct: f64,
        completed: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The `type` tag, for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::AnswerRecorded { .. } => "AnswerRecorded",
            Event::StepAdvanced { .. } => "StepAdvanced",
            Event::StepRetreated { .. } => "StepRetreated",
            Event::AdvanceBlocked { .. } => "AdvanceBlocked",
            Event::Redirected { .. } => "Redirected",
            Event::FunnelCompleted { .. } => "FunnelCompleted",
            Event::FunnelExited { .. } => "FunnelExited",
            Event::GenderChanged { .. } => "GenderChanged",
            Event::QuizReset { .. } => "QuizReset",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
