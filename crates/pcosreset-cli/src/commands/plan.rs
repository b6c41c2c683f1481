use clap::Subcommand;
use pcosreset_core::integrations::generate_for_state;
use pcosreset_core::integrations::meal_plan::provider_from_config;
use pcosreset_core::storage::Database;
use pcosreset_core::Config;

use super::{open_funnel, print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a 7-day meal plan from the current answers and store it
    Generate,
    /// Print the latest stored plan for the current session
    Show,
}

pub fn run(action: PlanAction) -> CliResult {
    let config = Config::load_or_default();
    let state = open_funnel(&config)?.state()?;

    match action {
        PlanAction::Generate => {
            let provider = provider_from_config(&config.ai)?;
            let plan = runtime()?.block_on(generate_for_state(provider.as_ref(), &state))?;
            let db = Database::open()?;
            db.save_meal_plan(
                &state.session_id,
                &config.ai.provider.to_string(),
                config.ai.model(),
                &plan,
            )?;
            print_json(&plan)?;
        }
        PlanAction::Show => {
            let db = Database::open()?;
            match db.latest_meal_plan(&state.session_id)? {
                Some(record) => print_json(&record)?,
                None => return Err("no meal plan generated for this session yet".into()),
            }
        }
    }
    Ok(())
}
