use serde::Serialize;

use super::BmiGauge;
use crate::metrics::{calculate_bmi, health_risks};
use crate::quiz::{QuizState, UserProfile};

/// BMI shown when the profile is not filled in yet.
pub const DEFAULT_SUMMARY_BMI: f64 = 22.0;

pub fn exercise_label(exercise_preference: &str) -> &'static str {
    match exercise_preference {
        "regularly" => "Moderate activity",
        "occasionally" | "try-to-stay-active" => "Light activity",
        _ => "Low activity",
    }
}

pub fn activity_label(activity_level: &str) -> &'static str {
    match activity_level {
        "always-working-out" => "High",
        "moving-a-lot" => "Above average",
        _ => "Average",
    }
}

/// Final "your personal summary" screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalSummaryView {
    pub gauge: BmiGauge,
    pub health_risks: Vec<&'static str>,
    pub exercise_label: &'static str,
    pub activity_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_kg: Option<f64>,
}

impl PersonalSummaryView {
    pub fn build(state: &QuizState) -> Self {
        let profile = UserProfile::from_state(state);
        let bmi = profile
            .as_ref()
            .and_then(|p| calculate_bmi(p.current_weight, p.height).ok())
            .unwrap_or(DEFAULT_SUMMARY_BMI);
        let gauge = BmiGauge::new(bmi);

        let (exercise, activity) = match &profile {
            Some(p) => (
                exercise_label(&p.exercise_preference),
                activity_label(&p.activity_level),
            ),
            None => ("Moderate activity", "Average"),
        };

        Self {
            gauge,
            health_risks: health_risks(gauge.result.category).to_vec(),
            exercise_label: exercise,
            activity_label: activity,
            current_kg: profile.as_ref().map(|p| p.current_weight),
            target_kg: profile.as_ref().map(|p| p.target_weight),
        }
    }
}
