use std::sync::Arc;

use clap::Subcommand;
use pcosreset_core::funnel::{FunnelController, FunnelResponse};
use pcosreset_core::integrations::SupabaseSink;
use pcosreset_core::quiz::{Gender, PROFILE_FIELDS};
use pcosreset_core::storage::Database;
use pcosreset_core::Config;
use serde::Serialize;

use super::{open_funnel, print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum QuizAction {
    /// Resume the stored session or begin a new one
    Start {
        /// Catalog variant (female, male)
        #[arg(long)]
        gender: Option<Gender>,
    },
    /// Print the current page without changing anything
    Show,
    /// Answer the current question
    Answer {
        /// A number, an option id, or several option ids (space or comma separated)
        #[arg(required = true, num_args = 1..)]
        values: Vec<String>,
    },
    /// Continue to the next step
    Next,
    /// Go back one step
    Back,
    /// Jump to a step
    Goto {
        #[arg(allow_negative_numbers = true)]
        step: i64,
    },
    /// Print the full stored state as JSON
    Status,
    /// Discard all answers and start a new session
    Reset,
    /// Print the profile derived from the answers
    Profile,
    /// Report which profile answers are still missing
    Complete,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Completeness {
    session_id: String,
    complete: bool,
    finished: bool,
    missing: Vec<&'static str>,
}

fn print_response(response: &FunnelResponse) -> CliResult {
    for event in &response.events {
        print_json(event)?;
    }
    print_json(&response.page)
}

pub fn run(action: QuizAction) -> CliResult {
    let config = Config::load_or_default();
    let funnel = open_funnel(&config)?;

    let Some(sink) = SupabaseSink::from_config(&config.submission) else {
        return execute(&funnel, action);
    };
    let funnel = funnel.with_submission(Arc::new(sink), config.submission.timeout());
    runtime()?.block_on(async {
        let result = execute(&funnel, action);
        record_submissions(&funnel).await;
        result
    })
}

/// Log the outcome of every submission the command triggered.
async fn record_submissions(funnel: &FunnelController<Database>) {
    for (session_id, outcome) in funnel.drain_submissions().await {
        if let Err(e) = funnel.repository().record_submission(&session_id, &outcome) {
            tracing::warn!(%session_id, error = %e, "could not record funnel submission");
        }
    }
}

fn execute(funnel: &FunnelController<Database>, action: QuizAction) -> CliResult {
    match action {
        QuizAction::Start { gender } => print_response(&funnel.start(gender)?)?,
        QuizAction::Show => print_json(&funnel.view()?)?,
        QuizAction::Answer { values } => print_response(&funnel.answer_raw(&values)?)?,
        QuizAction::Next => print_response(&funnel.next()?)?,
        QuizAction::Back => print_response(&funnel.back()?)?,
        QuizAction::Goto { step } => print_response(&funnel.go_to(step)?)?,
        QuizAction::Status => print_json(&funnel.state()?)?,
        QuizAction::Reset => print_response(&funnel.reset()?)?,
        QuizAction::Profile => match funnel.user_profile()? {
            Some(profile) => print_json(&profile)?,
            None => return Err("profile needs age, height and current weight answered".into()),
        },
        QuizAction::Complete => {
            let state = funnel.state()?;
            let missing: Vec<&'static str> = PROFILE_FIELDS
                .into_iter()
                .filter(|field| !state.responses.contains_key(*field))
                .collect();
            print_json(&Completeness {
                session_id: state.session_id.clone(),
                complete: missing.is_empty(),
                finished: state.is_completed(),
                missing,
            })?;
        }
    }
    Ok(())
}
