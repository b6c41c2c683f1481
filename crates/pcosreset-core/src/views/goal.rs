use chrono::NaiveDate;
use serde::Serialize;

use super::BmiGauge;
use crate::error::MetricsError;
use crate::metrics::{calculate_bmi, estimate_weeks_to_goal, goal_date};
use crate::quiz::QuizState;

pub const DEFAULT_CURRENT_KG: f64 = 68.0;
pub const DEFAULT_TARGET_KG: f64 = 55.0;
pub const DEFAULT_HEIGHT_CM: f64 = 165.0;

/// "You could reach X kg by <date>" screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProjectionView {
    pub current_kg: f64,
    pub target_kg: f64,
    pub goal_date: NaiveDate,
    pub weeks_to_goal: u32,
    /// Gauge for the current weight.
    pub gauge: BmiGauge,
}

impl GoalProjectionView {
    /// Missing answers fall back to 68 kg now, 55 kg goal and 165 cm.
    pub fn build(
        state: &QuizState,
        today: NaiveDate,
        weekly_rate_kg: f64,
    ) -> Result<Self, MetricsError> {
        let current_kg = state.number("current-weight").unwrap_or(DEFAULT_CURRENT_KG);
        let target_kg = state.number("target-weight").unwrap_or(DEFAULT_TARGET_KG);
        let height_cm = state.number("height").unwrap_or(DEFAULT_HEIGHT_CM);

        let bmi = calculate_bmi(current_kg, height_cm)?;
        Ok(Self {
            current_kg,
            target_kg,
            goal_date: goal_date(today),
            weeks_to_goal: estimate_weeks_to_goal(current_kg, target_kg, weekly_rate_kg)?,
            gauge: BmiGauge::new(bmi),
        })
    }

    /// "55 kg by March 30, 2026"
    pub fn headline(&self) -> String {
        format!(
            "{} kg by {}",
            self.target_kg.round(),
            self.goal_date.format("%B %-d, %Y")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DEFAULT_WEEKLY_RATE_KG;
    use crate::quiz::Answer;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn empty_state_uses_defaults() {
        let view =
            GoalProjectionView::build(&QuizState::default(), today(), DEFAULT_WEEKLY_RATE_KG)
                .unwrap();
        assert_eq!(view.current_kg, 68.0);
        assert_eq!(view.target_kg, 55.0);
        assert_eq!(view.goal_date, NaiveDate::from_ymd_opt(2026, 3, 30).unwrap());
        assert_eq!(view.weeks_to_goal, 18);
        assert!((view.gauge.bmi - 24.977).abs() < 0.01);
    }

    #[test]
    fn answers_override_defaults() {
        let mut state = QuizState::default();
        state.set_response("current-weight", Answer::Number(80.0));
        state.set_response("target-weight", Answer::Number(68.0));
        state.set_response("height", Answer::Number(165.0));

        let view = GoalProjectionView::build(&state, today(), 0.75).unwrap();
        assert_eq!(view.weeks_to_goal, 16);
        assert_eq!(view.headline(), "68 kg by March 30, 2026");
    }

    #[test]
    fn same_inputs_same_view() {
        let state = QuizState::default();
        assert_eq!(
            GoalProjectionView::build(&state, today(), 0.75).unwrap(),
            GoalProjectionView::build(&state, today(), 0.75).unwrap()
        );
    }
}
