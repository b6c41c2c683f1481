use crate::quiz::{QuizQuestion, QuizState, HABITS_INTERSTITIAL_ID};

const DEFAULT_RANGE_LOW_KG: f64 = 64.0;
const DEFAULT_RANGE_HIGH_KG: f64 = 72.0;

/// "20s" / "30s" / ... for an `age-range` option id. Unknown ids read as "30s".
pub fn age_decade_label(age_range: Option<&str>) -> &'static str {
    match age_range {
        Some("18-27") => "20s",
        Some("41-50") => "40s",
        Some("50+") => "50s",
        _ => "30s",
    }
}

/// Body copy for an interstitial screen.
///
/// The healthy-habits screen is personalised with the age decade and a
/// weight range running from the target to the current weight. Every other
/// screen returns its static description.
pub fn interstitial_description(question: &QuizQuestion, state: &QuizState) -> Option<String> {
    let content = question.content.as_ref()?;
    if question.id != HABITS_INTERSTITIAL_ID {
        return Some(content.description.clone());
    }
    let decade = age_decade_label(state.choice("age-range"));
    let low = state.number("target-weight").unwrap_or(DEFAULT_RANGE_LOW_KG).round();
    let high = state.number("current-weight").unwrap_or(DEFAULT_RANGE_HIGH_KG).round();
    Some(format!(
        "Women in their {decade}, a gentle reminder: building consistent daily habits that \
         help you reach and maintain a weight range of {low}kg to {high}kg can accelerate \
         your progress toward a stronger, healthier body."
    ))
}
