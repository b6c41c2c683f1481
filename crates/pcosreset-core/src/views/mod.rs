//! Derived presentational views.
//!
//! Pure functions of the stored responses and the metrics module. Same
//! inputs always give the same values; nothing here is persisted.

mod goal;
mod interstitial;
mod summary;

use serde::Serialize;

use crate::metrics::{bmi_gauge_percent, bmi_gauge_rotation, BmiResult};

pub use goal::{GoalProjectionView, DEFAULT_CURRENT_KG, DEFAULT_HEIGHT_CM, DEFAULT_TARGET_KG};
pub use interstitial::{age_decade_label, interstitial_description};
pub use summary::{activity_label, exercise_label, PersonalSummaryView, DEFAULT_SUMMARY_BMI};

/// Needle position and classification for a BMI value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiGauge {
    pub bmi: f64,
    pub result: BmiResult,
    /// Position on the 15..40 scale, 0 ..= 100.
    pub percent: f64,
    pub rotation_deg: f64,
}

impl BmiGauge {
    pub fn new(bmi: f64) -> Self {
        Self {
            bmi,
            result: BmiResult::from_bmi(bmi),
            percent: bmi_gauge_percent(bmi),
            rotation_deg: bmi_gauge_rotation(bmi),
        }
    }
}

/// Derived content for the computed steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepDetail {
    GoalProjection(GoalProjectionView),
    PersonalSummary(PersonalSummaryView),
}
