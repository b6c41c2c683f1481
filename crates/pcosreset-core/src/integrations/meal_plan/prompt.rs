use indoc::{formatdoc, indoc};

use crate::quiz::UserProfile;

pub const SYSTEM_PROMPT: &str = "You are an expert nutritionist specializing in PCOS management. \
    You provide detailed, practical meal plans tailored to individual needs. \
    Always respond with valid JSON only.";

const GUIDELINES: &str = indoc! {"
    ## Guidelines for the Meal Plan
    1. Focus on low glycemic index (GI) foods to manage insulin resistance
    2. Include anti-inflammatory ingredients (fatty fish, leafy greens, berries)
    3. Emphasize hormone-balancing nutrients (zinc, magnesium, B vitamins, vitamin D)
    4. Include adequate protein to support metabolism and satiety
    5. Limit processed foods, refined carbs, and added sugars
    6. Include healthy fats from avocados, nuts, seeds, and olive oil
    7. Ensure each meal is practical and easy to prepare
"};

const RESPONSE_FORMAT: &str = indoc! {r#"
    ## Response Format
    Return the meal plan as a valid JSON object with this exact structure:
    {
      "days": [
        {
          "day": "Monday",
          "breakfast": {
            "name": "Meal name",
            "description": "Brief description",
            "calories": 400,
            "protein": 25,
            "carbs": 30,
            "fat": 15,
            "ingredients": ["ingredient1", "ingredient2"],
            "instructions": ["step1", "step2"]
          },
          "lunch": { ...same structure... },
          "dinner": { ...same structure... },
          "snacks": [{ ...same structure... }]
        }
      ]
    }
    The "days" array must contain exactly 7 entries, Monday through Sunday.

    IMPORTANT: Return ONLY the JSON object, no additional text or markdown formatting.
"#};

fn bullets(items: &[String]) -> String {
    if items.is_empty() {
        return "- none reported".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// User prompt for a seven-day plan built from `profile`.
pub fn meal_plan_prompt(profile: &UserProfile) -> String {
    let bad_habits = if profile.bad_habits.is_empty() {
        "none".to_string()
    } else {
        profile.bad_habits.join(", ")
    };

    formatdoc! {"
        You are a certified nutritionist specializing in PCOS (Polycystic Ovary Syndrome) management. Generate a detailed 7-day PCOS-friendly meal plan for a user with the following profile:

        ## User Profile
        - Age: {age} years old
        - Current Weight: {current} kg
        - Target Weight: {target} kg
        - Height: {height} cm
        - Body Type: {body_type}
        - Activity Level: {activity}
        - Exercise Preference: {exercise}

        ## Health Goals
        {goals}

        ## Current Symptoms
        {symptoms}

        ## Lifestyle Factors
        - Period Regularity: {period}
        - Mood Issues: {mood}
        - Energy Levels: {energy}
        - Hydration: {hydration}
        - Bad Habits to Address: {bad_habits}

        {GUIDELINES}
        {RESPONSE_FORMAT}",
        age = profile.age,
        current = profile.current_weight,
        target = profile.target_weight,
        height = profile.height,
        body_type = profile.body_type,
        activity = profile.activity_level,
        exercise = profile.exercise_preference,
        goals = bullets(&profile.goals),
        symptoms = bullets(&profile.symptoms),
        period = profile.period_regularity,
        mood = profile.mood_issues,
        energy = profile.energy_levels,
        hydration = profile.hydration,
        bad_habits = bad_habits,
    }
}
