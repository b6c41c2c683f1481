//! TOML-based application configuration.
//!
//! Stores:
//! - Funnel navigation switches and the default catalog variant
//! - Checkout endpoint and site URLs
//! - Meal plan provider selection and generation parameters
//! - Lead submission endpoint
//!
//! Secrets never live here; see `integrations::credentials`.
//! Configuration is stored at `~/.config/pcosreset/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;
use crate::quiz::{EngineSettings, Gender};

/// Quiz navigation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelConfig {
    #[serde(default)]
    pub default_gender: Gender,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default)]
    pub exit_on_back_at_start: bool,
    /// Assumed healthy loss rate for the goal projection.
    #[serde(default = "default_weekly_loss_rate")]
    pub weekly_loss_rate_kg: f64,
}

/// Stripe checkout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
    /// Origin used to build the success/cancel redirect URLs.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default = "default_checkout_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Gemini,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::OpenAi => f.write_str("openai"),
            AiProvider::Gemini => f.write_str("gemini"),
        }
    }
}

/// Meal plan generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: AiProvider,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_openai_base")]
    pub openai_base_url: String,
    #[serde(default = "default_gemini_base")]
    pub gemini_base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

/// Lead submission (Supabase REST) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. Submission is skipped
    /// when unset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_submission_table")]
    pub table: String,
    #[serde(default = "default_submission_timeout")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pcosreset/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub funnel: FunnelConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_weekly_loss_rate() -> f64 {
    crate::metrics::DEFAULT_WEEKLY_RATE_KG
}
fn default_stripe_api_base() -> String {
    "https://api.stripe.com".into()
}
fn default_site_url() -> String {
    "http://localhost:3000".into()
}
fn default_checkout_timeout() -> u64 {
    30
}
fn default_openai_model() -> String {
    "gpt-4o".into()
}
fn default_gemini_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_openai_base() -> String {
    "https://api.openai.com".into()
}
fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    8000
}
fn default_ai_timeout() -> u64 {
    120
}
fn default_submission_table() -> String {
    "funnel_submissions".into()
}
fn default_submission_timeout() -> u64 {
    10
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            default_gender: Gender::default(),
            auto_advance: true,
            exit_on_back_at_start: false,
            weekly_loss_rate_kg: default_weekly_loss_rate(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_base: default_stripe_api_base(),
            site_url: default_site_url(),
            timeout_secs: default_checkout_timeout(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_model: default_openai_model(),
            gemini_model: default_gemini_model(),
            openai_base_url: default_openai_base(),
            gemini_base_url: default_gemini_base(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            url: None,
            table: default_submission_table(),
            timeout_secs: default_submission_timeout(),
        }
    }
}

impl FunnelConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            auto_advance: self.auto_advance,
            exit_on_back_at_start: self.exit_on_back_at_start,
        }
    }
}

impl CheckoutConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Model name for the selected provider.
    pub fn model(&self) -> &str {
        match self.provider {
            AiProvider::OpenAi => &self.openai_model,
            AiProvider::Gemini => &self.gemini_model,
        }
    }
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optional fields take the raw string.
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// `config.toml` inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. The new value must have
    /// the same type as the one it replaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.funnel.weekly_loss_rate_kg;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "funnel.weekly_loss_rate_kg".into(),
                message: "must be a positive number".into(),
            });
        }
        for (key, value) in [
            ("checkout.api_base", &self.checkout.api_base),
            ("checkout.site_url", &self.checkout.site_url),
            ("ai.openai_base_url", &self.ai.openai_base_url),
            ("ai.gemini_base_url", &self.ai.gemini_base_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Every leaf key with its current value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
