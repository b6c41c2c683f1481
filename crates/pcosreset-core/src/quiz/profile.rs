use serde::{Deserialize, Serialize};

use super::state::QuizState;

/// Question ids that must all be answered for the quiz to count as complete.
pub const PROFILE_FIELDS: [&str; 15] = [
    "symptoms",
    "period-regularity",
    "mood-issues",
    "weight-loss-history",
    "energy-levels",
    "goals",
    "body-type",
    "height",
    "current-weight",
    "target-weight",
    "age",
    "activity-level",
    "exercise-preference",
    "hydration",
    "bad-habits",
];

/// Fixed-shape summary of the answers, used for meal plan generation.
///
/// Always recomputed from the responses; never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: f64,
    /// Centimetres.
    pub height: f64,
    /// Kilograms.
    pub current_weight: f64,
    /// Kilograms. Falls back to the current weight when unanswered.
    pub target_weight: f64,
    pub body_type: String,
    pub goals: Vec<String>,
    pub symptoms: Vec<String>,
    pub activity_level: String,
    pub exercise_preference: String,
    pub hydration: String,
    pub bad_habits: Vec<String>,
    pub period_regularity: String,
    pub mood_issues: String,
    pub weight_loss_history: String,
    pub energy_levels: String,
}

impl UserProfile {
    /// `None` unless age, height and current weight are all answered.
    pub fn from_state(state: &QuizState) -> Option<Self> {
        let age = state.number("age")?;
        let height = state.number("height")?;
        let current_weight = state.number("current-weight")?;

        let text = |id: &str| state.choice(id).unwrap_or_default().to_string();
        let list = |id: &str| state.choices(id).map(<[String]>::to_vec).unwrap_or_default();

        Some(Self {
            age,
            height,
            current_weight,
            target_weight: state.number("target-weight").unwrap_or(current_weight),
            body_type: text("body-type"),
            goals: list("goals"),
            symptoms: list("symptoms"),
            activity_level: text("activity-level"),
            exercise_preference: text("exercise-preference"),
            hydration: text("hydration"),
            bad_habits: list("bad-habits"),
            period_regularity: text("period-regularity"),
            mood_issues: text("mood-issues"),
            weight_loss_history: text("weight-loss-history"),
            energy_levels: text("energy-levels"),
        })
    }
}

/// All profile source fields have an answer.
pub fn is_complete(state: &QuizState) -> bool {
    PROFILE_FIELDS
        .iter()
        .all(|field| state.responses.contains_key(*field))
}
