//! # PCOS Reset Core Library
//!
//! This library provides the core logic for the PCOS Reset onboarding funnel.
//! Every operation is available through the standalone CLI binary; any web or
//! desktop front end is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Quiz Engine**: A state machine over a static question catalog that
//!   records answers, gates navigation and reports progress
//! - **Metrics**: Pure unit conversion, BMI classification and goal projection
//! - **Views**: Derived content for the computed screens (goal projection,
//!   personal summary, personalised interstitials)
//! - **Storage**: SQLite-backed session persistence and TOML configuration
//! - **Integrations**: Stripe checkout, LLM meal plans and lead submission
//!
//! ## Key Components
//!
//! - [`QuizEngine`]: Core funnel state machine
//! - [`FunnelController`]: Load, apply, save and render in one call
//! - [`Database`]: Session and artefact persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod funnel;
pub mod integrations;
pub mod metrics;
pub mod quiz;
pub mod storage;
pub mod views;

pub use error::{ConfigError, CoreError, DatabaseError, MetricsError, ValidationError};
pub use events::Event;
pub use funnel::{FunnelController, FunnelResponse, FunnelSettings, PageView};
pub use metrics::{calculate_bmi, BmiCategory, BmiResult};
pub use quiz::{Answer, Gender, QuestionCatalog, QuestionType, QuizEngine, QuizQuestion, QuizState, UserProfile};
pub use storage::{Config, Database, QuizRepository};
