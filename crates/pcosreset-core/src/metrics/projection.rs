use chrono::{Duration, NaiveDate};

use crate::error::MetricsError;

/// Healthy weekly loss assumed when no rate is configured (kg/week).
pub const DEFAULT_WEEKLY_RATE_KG: f64 = 0.75;

/// Days from "today" to the goal date shown on the projection screen.
pub const GOAL_HORIZON_DAYS: i64 = 88;

/// Whole weeks needed to move from `current` to `target` at `weekly_rate`.
///
/// Works in either direction and is zero only when the weights are equal.
pub fn estimate_weeks_to_goal(
    current: f64,
    target: f64,
    weekly_rate: f64,
) -> Result<u32, MetricsError> {
    if !weekly_rate.is_finite() || weekly_rate <= 0.0 {
        return Err(MetricsError::NonPositiveRate(weekly_rate));
    }
    for weight in [current, target] {
        if !weight.is_finite() {
            return Err(MetricsError::NonPositiveWeight(weight));
        }
    }
    let weeks = ((current - target).abs() / weekly_rate).ceil();
    Ok(weeks as u32)
}

pub fn goal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(GOAL_HORIZON_DAYS)
}
