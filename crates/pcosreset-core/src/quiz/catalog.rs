//! The static question catalog that defines the funnel.
//!
//! The catalog is configuration data: built once, never mutated. Steps are
//! unique and contiguous from 1, which `QuestionCatalog::new` enforces.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::question::{
    InterstitialContent, OptionCategory, QuestionOption, QuestionType, QuizQuestion, Validation,
};
use crate::metrics::lbs_to_kg;

/// Selects which catalog/copy variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            other => Err(format!("unknown gender '{other}' (expected female or male)")),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => f.write_str("female"),
            Gender::Male => f.write_str("male"),
        }
    }
}

/// Ordered, immutable list of funnel steps.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<QuizQuestion>,
}

static FEMALE_CATALOG: LazyLock<QuestionCatalog> =
    LazyLock::new(|| QuestionCatalog::new(female_questions()));

impl QuestionCatalog {
    /// Build a catalog, sorting by step.
    ///
    /// # Panics
    /// Panics when steps are not unique and contiguous from 1. Catalogs are
    /// authored in code, so a gap is a programming error.
    pub fn new(mut questions: Vec<QuizQuestion>) -> Self {
        questions.sort_by_key(|q| q.step);
        for (index, question) in questions.iter().enumerate() {
            assert_eq!(
                question.step as usize,
                index + 1,
                "catalog steps must be contiguous from 1 (question '{}')",
                question.id
            );
        }
        Self { questions }
    }

    /// The catalog for a gender variant.
    ///
    /// The male variant currently reuses the female list.
    pub fn for_gender(gender: Gender) -> &'static QuestionCatalog {
        match gender {
            Gender::Female | Gender::Male => &FEMALE_CATALOG,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn total_steps(&self) -> u32 {
        self.questions.len() as u32
    }

    /// `None` for any step outside `1..=total_steps()`.
    pub fn question_by_step(&self, step: u32) -> Option<&QuizQuestion> {
        let index = (step as usize).checked_sub(1)?;
        self.questions.get(index)
    }

    pub fn question_by_id(&self, id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn next_step(&self, step: u32) -> Option<u32> {
        let next = step.checked_add(1)?;
        (next <= self.total_steps()).then_some(next)
    }

    pub fn previous_step(&self, step: u32) -> Option<u32> {
        let prev = step.checked_sub(1)?;
        (prev >= 1 && prev <= self.total_steps()).then_some(prev)
    }
}

// ── Catalog content ─────────────────────────────────────────────────

fn opt(id: &str, label: &str, icon: &str) -> QuestionOption {
    QuestionOption {
        id: id.into(),
        label: label.into(),
        icon: (!icon.is_empty()).then(|| icon.into()),
        image: None,
    }
}

fn visual(id: &str, label: &str, image: &str) -> QuestionOption {
    QuestionOption {
        id: id.into(),
        label: label.into(),
        icon: None,
        image: Some(image.into()),
    }
}

fn category(id: &str, title: &str, options: &[(&str, &str)]) -> OptionCategory {
    OptionCategory {
        id: id.into(),
        title: title.into(),
        options: options.iter().map(|(id, label)| opt(id, label, "")).collect(),
    }
}

fn base(id: &str, step: u32, question_type: QuestionType) -> QuizQuestion {
    QuizQuestion {
        id: id.into(),
        step,
        question_type,
        question: None,
        subtitle: None,
        options: Vec::new(),
        categories: Vec::new(),
        validation: None,
        required: false,
        content: None,
        benefits: Vec::new(),
        unit: None,
    }
}

fn ask(
    id: &str,
    step: u32,
    question_type: QuestionType,
    question: &str,
    options: Vec<QuestionOption>,
) -> QuizQuestion {
    QuizQuestion {
        question: Some(question.into()),
        options,
        required: true,
        ..base(id, step, question_type)
    }
}

fn interstitial(
    id: &str,
    step: u32,
    content: InterstitialContent,
    benefits: &[&str],
) -> QuizQuestion {
    QuizQuestion {
        content: Some(content),
        benefits: benefits.iter().map(|b| b.to_string()).collect(),
        ..base(id, step, QuestionType::Interstitial)
    }
}

fn screen(id: &str, step: u32, question_type: QuestionType, question: &str) -> QuizQuestion {
    QuizQuestion {
        question: Some(question.into()),
        ..base(id, step, question_type)
    }
}

fn with_subtitle(mut question: QuizQuestion, subtitle: &str) -> QuizQuestion {
    question.subtitle = Some(subtitle.into());
    question
}

fn female_questions() -> Vec<QuizQuestion> {
    use QuestionType::*;

    let weight_bounds = Validation {
        min: lbs_to_kg(100.0),
        max: lbs_to_kg(440.0),
    };

    vec![
        // Symptoms & cycle (steps 1-6)
        with_subtitle(
            ask(
                "age-range",
                1,
                SingleSelect,
                "PCOS RESET METHOD",
                vec![
                    opt("18-27", "18-27", ""),
                    opt("27-40", "27-40", ""),
                    opt("41-50", "41-50", ""),
                    opt("50+", "50+", ""),
                ],
            ),
            "Let's personalize this for your body and life stage.",
        ),
        ask(
            "symptoms",
            2,
            MultiSelect,
            "Many women with PCOS experience some of the following. Which feel familiar to you?",
            vec![
                opt("irregular-periods", "Missed or irregular menstrual cycles", "🔴"),
                opt("weight-gain", "Unexplained weight gain", "📈"),
                opt("acne", "Oily skin or acne breakouts", "🫧"),
                opt("hair-thinning", "Hair thinning or increased hair shedding", "💇‍♀️"),
                opt("fatigue", "Ongoing tiredness or low energy", "💤"),
                opt("mood-swings", "Emotional ups and downs", "🌪️"),
                opt("difficulty-losing-weight", "Trouble losing weight", "🧱"),
                opt("sugar-cravings", "Frequent cravings for sweets", "🧁"),
            ],
        ),
        ask(
            "period-regularity",
            3,
            SingleSelect,
            "How predictable does your cycle feel to you?",
            vec![
                opt("rarely", "I rarely experience a period", "😰"),
                opt("irregular", "My cycle is highly irregular", "🌧️"),
                opt("somewhat-regular", "Fairly regular, but not always predictable", "⛅"),
                opt("very-regular", "Very consistent", "☀️"),
            ],
        ),
        ask(
            "mood-issues",
            4,
            SingleSelect,
            "Do you often feel stressed, anxious, or emotionally overwhelmed?",
            vec![
                opt("yes-often", "Yes, quite often", "🌪️"),
                opt("sometimes", "Sometimes, but I usually cope well", "🍃"),
                opt("no", "Rarely", "✨"),
            ],
        ),
        ask(
            "weight-loss-history",
            5,
            SingleSelect,
            "Have you tried to lose weight, only to feel like your body won't respond?",
            vec![
                opt("yes-nothing-works", "Yes, results never seem to come", "🧱"),
                opt("comes-back", "I lose some weight, but it doesn't last", "🔄"),
                opt("havent-tried", "I haven't seriously attempted yet", "🌿"),
            ],
        ),
        ask(
            "energy-levels",
            6,
            SingleSelect,
            "How would you rate your typical daily energy?",
            vec![
                opt("always-exhausted", "Frequently drained, even after rest", "🥱"),
                opt("afternoon-crashes", "I experience noticeable afternoon fatigue", "📉"),
                opt("inconsistent", "My energy varies depending on the day", "🌊"),
                opt("fine", "My energy is generally steady", "☀️"),
            ],
        ),
        // Goals & biometrics (steps 7-14)
        interstitial(
            "motivation-1",
            7,
            InterstitialContent {
                title: "Take Back Control of Your PCOS Health".into(),
                description: "Based on your answers, your symptoms may not be a willpower issue. \
                    They often reflect how PCOS affects metabolism, appetite signals, and energy regulation."
                    .into(),
                highlight: Some(
                    "Most women begin noticing measurable symptom improvements within weeks.".into(),
                ),
                image: Some("/images/interstitial-motivation-1.png".into()),
            },
            &[
                "Support hormone-driven appetite balance",
                "Reduce biological resistance to weight loss",
                "Stabilize energy fluctuations",
                "Create sustainable progress without extreme restriction",
            ],
        ),
        ask(
            "goals",
            8,
            MultiSelect,
            "What would you like to achieve?",
            vec![
                opt("lose-weight", "Lose excess weight", "📉"),
                opt("get-fit", "Improve overall fitness", "👟"),
                opt("boost-metabolism", "Support a faster metabolism", "⚡"),
                opt("improve-energy", "Increase daily energy", "🌟"),
                opt("stabilize-mood", "Maintain a more stable mood", "🧘‍♀️"),
                opt("hormonal-balance", "Support hormonal harmony", "⚖️"),
                opt("reduce-cravings", "Reduce sugar and snack cravings", "🍎"),
            ],
        ),
        ask(
            "body-type",
            9,
            VisualSelect,
            "Which silhouette feels closest to your current shape?",
            vec![
                visual("regular", "STANDARD", "/images/body-type-regular.png"),
                visual("plump", "CURVY", "/images/body-type-plump.png"),
                visual("extra", "PLUS", "/images/body-type-extra.png"),
            ],
        ),
        interstitial(
            "motivation-pcos-pattern",
            10,
            InterstitialContent {
                title: "Understanding Your PCOS Pattern".into(),
                description: "PCOS doesn't just affect cycles. It can influence how your body \
                    responds to food, stress, sleep, and activity."
                    .into(),
                highlight: Some(
                    "PCOS Reset Method is powered by AI technology trained on evidence-based \
                     lifestyle frameworks and clinical PCOS guidance, allowing your plan to adapt \
                     to your specific symptom pattern and preferences."
                        .into(),
                ),
                image: Some("/images/interstitial-transformation.png".into()),
            },
            &[
                "Cravings feel stronger",
                "Energy fluctuates more",
                "Weight responds differently than expected",
                "That's why personalization matters.",
            ],
        ),
        QuizQuestion {
            validation: Some(Validation { min: 100.0, max: 250.0 }),
            unit: Some("cm".into()),
            ..with_subtitle(
                ask("height", 11, HeightInput, "What is your height?", Vec::new()),
                "This helps us estimate a realistic and safe progress range for you.",
            )
        },
        QuizQuestion {
            validation: Some(weight_bounds),
            unit: Some("kg".into()),
            ..with_subtitle(
                ask("current-weight", 12, WeightInput, "What is your current weight?", Vec::new()),
                "Weight helps us calculate your BMI.",
            )
        },
        QuizQuestion {
            validation: Some(weight_bounds),
            unit: Some("kg".into()),
            ..ask("target-weight", 13, WeightInput, "What is your desired weight?", Vec::new())
        },
        QuizQuestion {
            validation: Some(Validation { min: 18.0, max: 100.0 }),
            unit: Some("years".into()),
            ..ask("age", 14, NumericInput, "What is your age?", Vec::new())
        },
        // Lifestyle & habits (steps 15-19)
        interstitial(
            HABITS_INTERSTITIAL_ID,
            15,
            InterstitialContent {
                title: "Stay on Track with Healthy Habits".into(),
                description: "Women in their 30s, a gentle reminder: building consistent daily \
                    habits that help you reach and maintain a weight range of 64kg to 72kg can \
                    accelerate your progress toward a stronger, healthier body."
                    .into(),
                highlight: None,
                image: Some("/images/motivation-2.png".into()),
            },
            &[],
        ),
        with_subtitle(
            ask(
                "activity-level",
                16,
                SingleSelect,
                "What does your typical day look like?",
                vec![
                    opt("desk-job", "Mostly seated work", "💻"),
                    opt("moving-a-lot", "Frequently on the move", "👟"),
                    opt("always-working-out", "Regularly exercising or training", "💪"),
                    opt("home", "Mostly at home or low-activity routine", "🏠"),
                ],
            ),
            "Choose the option that best matches your daily routine",
        ),
        with_subtitle(
            ask(
                "exercise-preference",
                17,
                SingleSelect,
                "Do you enjoy physical activity?",
                vec![
                    opt("no", "Not really", "🛋️"),
                    opt("try-to-stay-active", "Not much, but I try to stay somewhat active", "👟"),
                    opt("occasionally", "Yes, from time to time", "🚶‍♀️"),
                    opt("regularly", "Yes, I exercise consistently", "💪"),
                ],
            ),
            "Regular movement can help accelerate your progress.",
        ),
        with_subtitle(
            ask(
                "hydration",
                18,
                SingleSelect,
                "How much water do you usually drink per day?",
                vec![
                    opt("only-coffee-tea", "Mostly coffee or tea", "☕"),
                    opt("less-than-2", "Under 500ml (fewer than 2 glasses)", "💧"),
                    opt("2-6-glasses", "0.5L to 1.5L (about 2 to 6 glasses)", "🥤"),
                    opt("7-10-glasses", "1.7L to 2.5L (around 7 to 10 glasses)", "🚰"),
                    opt("dont-count", "I don't track it, it varies daily", "🌊"),
                ],
            ),
            "We mean plain water, not including coffee, tea, or other beverages.",
        ),
        ask(
            "bad-habits",
            19,
            MultiSelect,
            "Which of the following habits apply to you? (Select all that fit)",
            vec![
                opt("eat-late", "I tend to eat late in the evening", "🌃"),
                opt("sweets", "I often crave sugary snacks or desserts", "🧁"),
                opt("soft-drinks", "I frequently drink soda or sweetened beverages", "🥤"),
                opt("alcohol", "I occasionally drink alcoholic beverages", "🍷"),
                opt("fatty-salty", "I often choose high-fat or salty foods", "🥨"),
                opt("none", "None of these apply", "✅"),
            ],
        ),
        // Trust, processing & results (steps 20-23)
        QuizQuestion {
            categories: focus_area_categories(),
            ..ask(
                "focus-areas",
                20,
                IngredientSelect,
                "Which areas should your personalized plan focus on most?",
                Vec::new(),
            )
        },
        screen(
            "science-trust",
            21,
            ScienceList,
            "The research behind your personalized health plan",
        ),
        screen(
            "goal-projection",
            22,
            GoalProjection,
            "With PCOS Reset Method, you could reach your target weight of",
        ),
        screen("personal-summary", 23, PersonalSummary, "Your personal summary"),
    ]
}

/// Id of the interstitial whose copy is personalised with age and weights.
pub const HABITS_INTERSTITIAL_ID: &str = "motivation-2";

fn focus_area_categories() -> Vec<OptionCategory> {
    vec![
        category(
            "symptoms",
            "Symptoms & Body Signals",
            &[
                ("weight-resistance", "Weight loss resistance"),
                ("fatigue", "Constant fatigue / low energy"),
                ("sugar-cravings", "Strong sugar cravings"),
                ("brain-fog", "Brain fog"),
                ("bloating", "Bloating after meals"),
                ("irregular-cycles", "Irregular cycles"),
                ("breakouts", "Skin breakouts / acne"),
                ("hair-issues", "Hair thinning or excess hair"),
                ("mood-swings", "Mood swings"),
                ("poor-sleep", "Poor sleep"),
            ],
        ),
        category(
            "metabolism",
            "Energy & Metabolism Support",
            &[
                ("afternoon-crashes", "Reduce afternoon energy crashes"),
                ("blood-sugar", "Stabilize blood sugar"),
                ("morning-energy", "Improve morning energy"),
                ("carb-cravings", "Reduce carb cravings"),
                ("sleep-quality", "Improve sleep quality"),
                ("digestion", "Improve digestion"),
                ("inflammation", "Reduce inflammation"),
                ("sustainable-habits", "Build sustainable habits"),
            ],
        ),
        category(
            "nutrition",
            "Nutrition Coaching Style",
            &[
                ("meal-structure", "Simple meal structure guidance"),
                ("portion-guidance", "Portion guidance (no calorie counting)"),
                ("grocery-planning", "Grocery planning support"),
                ("eating-out", "Eating out guidance"),
                ("snack-strategies", "Snack & craving strategies"),
                ("pcos-recipes", "PCOS-friendly recipes"),
                ("meal-timing", "Meal timing guidance"),
            ],
        ),
        category(
            "movement",
            "Movement & Activity Coaching",
            &[
                ("gentle-movement", "Gentle movement routines"),
                ("strength-training", "Strength training guidance"),
                ("walking", "Walking & daily activity"),
                ("low-energy-workouts", "Low-energy workout options"),
                ("gym-confidence", "Gym confidence guidance"),
                ("exercise-consistency", "Building consistency with exercise"),
            ],
        ),
        category(
            "habits",
            "Habit & Mindset Coaching",
            &[
                ("accountability", "Accountability & reminders"),
                ("motivation", "Motivation & consistency"),
                ("stress-management", "Stress management"),
                ("emotional-eating", "Emotional eating support"),
                ("routines", "Building routines"),
                ("overwhelm", "Reducing overwhelm"),
                ("long-term-consistency", "Staying consistent long-term"),
            ],
        ),
        category(
            "lifestyle",
            "Personalization & Lifestyle",
            &[
                ("busy-schedule", "Busy schedule / limited time"),
                ("family-meals", "Family-friendly meals"),
                ("budget-options", "Budget-friendly options"),
                ("quick-recipes", "Quick & simple recipes"),
                ("flexible-approach", "Flexible (not restrictive) approach"),
                ("step-by-step", "Step-by-step daily guidance"),
            ],
        ),
    ]
}
