use clap::Subcommand;
use pcosreset_core::integrations::{CheckoutClient, CheckoutRequest, PLANS};
use pcosreset_core::Config;
use serde_json::json;

use super::{open_funnel, print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum CheckoutAction {
    /// List purchasable plans
    Plans,
    /// Create a Stripe checkout session for the current funnel session
    Create {
        /// Plan id (see `checkout plans`)
        plan: String,
        /// Pre-fill the customer email
        #[arg(long)]
        email: Option<String>,
        /// Open the checkout page in the browser
        #[arg(long)]
        open: bool,
    },
}

pub fn run(action: CheckoutAction) -> CliResult {
    match action {
        CheckoutAction::Plans => {
            let plans: Vec<_> = PLANS
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "name": p.name,
                        "price": p.display_price(),
                        "amount": p.amount,
                        "currency": p.currency,
                        "interval": p.interval.as_str(),
                        "intervalCount": p.interval_count,
                    })
                })
                .collect();
            print_json(&plans)?;
        }
        CheckoutAction::Create { plan, email, open } => {
            let config = Config::load_or_default();
            let session_id = open_funnel(&config)?.state()?.session_id;
            let request = CheckoutRequest {
                plan_id: plan,
                session_id: Some(session_id),
                email,
            };
            let client = CheckoutClient::from_config(&config.checkout)?;
            let session = runtime()?.block_on(client.create_session(&request))?;
            print_json(&session)?;

            if open {
                if let Some(url) = &session.url {
                    open::that(url)?;
                }
            }
        }
    }
    Ok(())
}
