use std::sync::Arc;

use pcosreset_core::integrations::submission::spawn_submission;
use pcosreset_core::integrations::SupabaseSink;
use pcosreset_core::storage::Database;
use pcosreset_core::Config;

use super::{open_funnel, print_json, runtime, CliResult};

pub fn run() -> CliResult {
    let config = Config::load_or_default();
    let state = open_funnel(&config)?.state()?;
    let sink = SupabaseSink::from_config(&config.submission)
        .ok_or("submission is not configured: set submission.url and SUPABASE_SERVICE_ROLE_KEY")?;

    let timeout = config.submission.timeout();
    let outcome = runtime()?.block_on(async {
        spawn_submission(Arc::new(sink), &state, timeout).await
    })?;

    Database::open()?.record_submission(&state.session_id, &outcome)?;
    print_json(&outcome)
}
