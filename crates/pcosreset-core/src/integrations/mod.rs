//! Clients for the external services the funnel talks to.
//!
//! Every client is async (`reqwest`) and turns failures into a typed error
//! or an unsuccessful outcome. None of them touch `QuizState`.

pub mod checkout;
pub mod credentials;
pub mod meal_plan;
pub mod submission;

pub use checkout::{CheckoutClient, CheckoutError, CheckoutRequest, CheckoutSession, Plan, PLANS};
pub use credentials::{Credential, CredentialSource};
pub use meal_plan::{generate_for_state, MealPlanError, MealPlanProvider, WeeklyMealPlan};
pub use submission::{SubmissionOutcome, SubmissionSink, SupabaseSink};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "pcosreset";

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Build a reqwest client with the given request timeout.
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pcosreset/", env!("CARGO_PKG_VERSION")))
        .build()
}
