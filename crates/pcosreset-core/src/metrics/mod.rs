//! Health metrics: unit conversion, BMI classification and goal projection.
//!
//! Everything here is a pure function. Inputs that would make a metric
//! meaningless (zero height, negative weight) are rejected with
//! [`MetricsError`](crate::error::MetricsError) instead of leaking `NaN`.

mod bmi;
mod projection;
mod units;

pub use bmi::{
    bmi_gauge_percent, bmi_gauge_rotation, calculate_bmi, health_risks, BmiCategory, BmiResult,
    GAUGE_MAX_BMI, GAUGE_MIN_BMI,
};
pub use projection::{estimate_weeks_to_goal, goal_date, DEFAULT_WEEKLY_RATE_KG, GOAL_HORIZON_DAYS};
pub use units::{cm_to_feet, feet_to_cm, kg_to_lbs, lbs_to_kg, FeetInches, LBS_TO_KG};
