mod config;
pub mod database;
pub mod migrations;
mod repository;

pub use config::{AiConfig, AiProvider, CheckoutConfig, Config, FunnelConfig, SubmissionConfig};
pub use database::{Database, MealPlanRecord, SubmissionRecord};
pub use repository::{MemoryRepository, QuizRepository, QUIZ_STORAGE_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pcosreset[-dev]/` based on PCOSRESET_ENV.
///
/// Set PCOSRESET_ENV=dev to use the development data directory, or
/// PCOSRESET_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PCOSRESET_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PCOSRESET_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pcosreset-dev")
            } else {
                base_dir.join("pcosreset")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
