mod answer;
mod catalog;
mod engine;
mod profile;
mod question;
mod state;

pub use answer::Answer;
pub use catalog::{Gender, QuestionCatalog, HABITS_INTERSTITIAL_ID};
pub use engine::{can_continue, EngineSettings, Progress, QuizEngine, StepResolution};
pub use profile::{is_complete, UserProfile, PROFILE_FIELDS};
pub use question::{
    InterstitialContent, OptionCategory, QuestionOption, QuestionType, QuizQuestion, Validation,
};
pub use state::{QuizState, SessionId};

/// Questions whose answers are kilograms.
pub const WEIGHT_QUESTION_IDS: [&str; 2] = ["current-weight", "target-weight"];
