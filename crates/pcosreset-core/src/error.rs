//! Core error types for pcosreset-core.
//!
//! This module defines the error hierarchy shared by the quiz engine,
//! storage layer and integrations. Errors from the external collaborators
//! live next to their clients ([`CheckoutError`], [`MealPlanError`]) and are
//! wrapped here so callers can use a single `Result` type.

use std::path::PathBuf;
use thiserror::Error;

use crate::integrations::checkout::CheckoutError;
use crate::integrations::meal_plan::MealPlanError;

/// Core error type for pcosreset-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Answer or navigation input rejected at the boundary
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Numeric input outside the domain of a health metric
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// Checkout session creation failed
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Meal plan generation failed
    #[error("Meal plan error: {0}")]
    MealPlan(#[from] MealPlanError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored value could not be decoded
    #[error("Corrupt value stored under '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors raised when an answer does not fit its question.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No question with this id exists in the active catalog
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    /// The question does not take an answer (interstitial and result screens)
    #[error("Question '{0}' does not accept an answer")]
    NotAnswerable(String),

    /// Answer shape does not match the question type
    #[error("Question '{question_id}' expects {expected}")]
    WrongKind {
        question_id: String,
        expected: &'static str,
    },

    /// Option id not declared by the question
    #[error("Invalid option '{option}' for question '{question_id}'")]
    InvalidOption { question_id: String, option: String },

    /// Numeric answer outside the declared bounds
    #[error("Value {value} for '{question_id}' is outside {min}..={max}")]
    OutOfRange {
        question_id: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Numeric answer is NaN, infinite, zero or negative
    #[error("Value for '{question_id}' must be a positive number")]
    NotPositive { question_id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors from the health metric functions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MetricsError {
    /// Height must be a positive, finite number of centimetres
    #[error("Height must be positive, got {0} cm")]
    NonPositiveHeight(f64),

    /// Weight must be a positive, finite number of kilograms
    #[error("Weight must be positive, got {0} kg")]
    NonPositiveWeight(f64),

    /// Weekly loss rate must be positive
    #[error("Weekly rate must be positive, got {0} kg/week")]
    NonPositiveRate(f64),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
