//! One module per subcommand group. Each exposes `run(action)`.

pub mod auth;
pub mod checkout;
pub mod config;
pub mod metrics;
pub mod plan;
pub mod quiz;
pub mod submit;

use pcosreset_core::funnel::{FunnelController, FunnelSettings};
use pcosreset_core::storage::Database;
use pcosreset_core::Config;
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Current-thread runtime for commands that call external services.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Funnel controller over the on-disk database, with `[funnel]` settings.
pub fn open_funnel(config: &Config) -> Result<FunnelController<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    tracing::debug!(auto_advance = config.funnel.auto_advance, "funnel opened");
    Ok(FunnelController::new(db, FunnelSettings::from(&config.funnel)))
}
