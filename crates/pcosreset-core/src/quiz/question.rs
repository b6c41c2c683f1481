use serde::{Deserialize, Serialize};

/// Closed set of step kinds. Each kind implies the widget a front end
/// renders and the answer shape it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleSelect,
    MultiSelect,
    NumericInput,
    HeightInput,
    WeightInput,
    VisualSelect,
    Interstitial,
    IngredientSelect,
    ScienceList,
    GoalProjection,
    PersonalSummary,
}

impl QuestionType {
    /// Selecting an option moves straight to the next step.
    pub fn auto_advances(self) -> bool {
        matches!(self, QuestionType::SingleSelect | QuestionType::VisualSelect)
    }

    /// Screens that show content but take no answer.
    pub fn is_informational(self) -> bool {
        matches!(
            self,
            QuestionType::Interstitial
                | QuestionType::ScienceList
                | QuestionType::GoalProjection
                | QuestionType::PersonalSummary
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            QuestionType::NumericInput | QuestionType::HeightInput | QuestionType::WeightInput
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::SingleSelect => "single-select",
            QuestionType::MultiSelect => "multi-select",
            QuestionType::NumericInput => "numeric-input",
            QuestionType::HeightInput => "height-input",
            QuestionType::WeightInput => "weight-input",
            QuestionType::VisualSelect => "visual-select",
            QuestionType::Interstitial => "interstitial",
            QuestionType::IngredientSelect => "ingredient-select",
            QuestionType::ScienceList => "science-list",
            QuestionType::GoalProjection => "goal-projection",
            QuestionType::PersonalSummary => "personal-summary",
        }
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A titled group of options (ingredient-select screens).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionCategory {
    pub id: String,
    pub title: String,
    pub options: Vec<QuestionOption>,
}

/// Inclusive numeric bounds in the answer's canonical unit
/// (kg for weight, cm for height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub min: f64,
    pub max: f64,
}

impl Validation {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Static copy for interstitial screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterstitialContent {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One step of the funnel. Author-defined and immutable at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Stable answer-map key.
    pub id: String,
    /// 1-based position in the funnel.
    pub step: u32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<OptionCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<InterstitialContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    /// Display unit for numeric inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl QuizQuestion {
    /// Whether `option_id` is offered, directly or inside a category.
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
            || self
                .categories
                .iter()
                .flat_map(|c| c.options.iter())
                .any(|o| o.id == option_id)
    }

    pub fn option_label(&self, option_id: &str) -> Option<&str> {
        self.options
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.options.iter()))
            .find(|o| o.id == option_id)
            .map(|o| o.label.as_str())
    }
}
