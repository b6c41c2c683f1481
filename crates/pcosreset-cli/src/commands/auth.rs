use clap::Subcommand;
use pcosreset_core::integrations::{Credential, CredentialSource};
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a secret in the OS keyring
    Set {
        /// stripe, openai, gemini or supabase
        credential: Credential,
        /// Secret value
        value: String,
    },
    /// Show where each secret is resolved from
    Status,
    /// Remove a secret from the OS keyring
    Remove {
        /// stripe, openai, gemini or supabase
        credential: Credential,
    },
}

pub fn run(action: AuthAction) -> CliResult {
    match action {
        AuthAction::Set { credential, value } => {
            if value.trim().is_empty() {
                return Err(format!("refusing to store an empty {credential} key").into());
            }
            credential.store(value.trim())?;
            println!("{credential} key stored");
        }
        AuthAction::Status => {
            let status: Vec<_> = Credential::ALL
                .into_iter()
                .map(|c| {
                    let source = c.source();
                    json!({
                        "credential": c.short_name(),
                        "envVar": c.env_var(),
                        "source": source,
                        "configured": source != CredentialSource::Missing,
                    })
                })
                .collect();
            print_json(&status)?;
        }
        AuthAction::Remove { credential } => {
            credential.remove()?;
            println!("{credential} key removed");
        }
    }
    Ok(())
}
