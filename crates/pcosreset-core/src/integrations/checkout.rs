//! Stripe checkout session creation.
//!
//! A plan id is looked up in the fixed plan table and turned into a
//! form-encoded `POST /v1/checkout/sessions` request. The funnel session id
//! travels in the Stripe metadata so the payment can be joined back to the
//! quiz answers.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::credentials::Credential;
use super::http_client;
use crate::storage::CheckoutConfig;

const PRODUCT_DESCRIPTION: &str =
    "PCOS Reset Method - Personalized weight loss and wellness program";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Month,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Month => "month",
        }
    }
}

/// A purchasable subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in cents.
    pub amount: u32,
    pub currency: &'static str,
    pub interval: Interval,
    pub interval_count: u32,
}

impl Plan {
    const fn new(
        id: &'static str,
        name: &'static str,
        amount: u32,
        interval: Interval,
        interval_count: u32,
    ) -> Self {
        Self {
            id,
            name,
            amount,
            currency: "usd",
            interval,
            interval_count,
        }
    }

    /// "$15.19"
    pub fn display_price(&self) -> String {
        format!("${}.{:02}", self.amount / 100, self.amount % 100)
    }
}

pub const PLANS: [Plan; 9] = [
    Plan::new("7day", "7-Day Plan", 693, Interval::Day, 7),
    Plan::new("1month", "1-Month Plan", 1519, Interval::Month, 1),
    Plan::new("3month", "3-Month Plan", 2599, Interval::Month, 3),
    Plan::new("7day_74", "7-Day Plan (74% Off)", 577, Interval::Day, 7),
    Plan::new("1month_74", "1-Month Plan (74% Off)", 1154, Interval::Month, 1),
    Plan::new("3month_74", "3-Month Plan (74% Off)", 1963, Interval::Month, 3),
    Plan::new("7day_81", "7-Day Plan (81% Off)", 422, Interval::Day, 7),
    Plan::new("1month_81", "1-Month Plan (81% Off)", 844, Interval::Month, 1),
    Plan::new("3month_81", "3-Month Plan (81% Off)", 1434, Interval::Month, 3),
];

pub fn find_plan(plan_id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == plan_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub plan_id: String,
    /// Funnel session id, stored in the Stripe metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub success: bool,
    /// Stripe checkout session id.
    pub session_id: String,
    pub url: Option<String>,
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Stripe is not configured. Please set STRIPE_SECRET_KEY.")]
    NotConfigured,

    #[error("Stripe returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Request to Stripe failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CheckoutError {
    /// HTTP status a front end should surface for this failure.
    pub fn status(&self) -> u16 {
        match self {
            CheckoutError::UnknownPlan(_) | CheckoutError::InvalidEmail(_) => 400,
            CheckoutError::NotConfigured => 503,
            CheckoutError::Provider { status, .. } => *status,
            CheckoutError::Http(_) => 502,
        }
    }
}

impl CheckoutRequest {
    /// Resolve the plan and check the email shape.
    pub fn validate(&self) -> Result<&'static Plan, CheckoutError> {
        let plan =
            find_plan(&self.plan_id).ok_or_else(|| CheckoutError::UnknownPlan(self.plan_id.clone()))?;
        if let Some(email) = &self.email {
            if !is_plausible_email(email) {
                return Err(CheckoutError::InvalidEmail(email.clone()));
            }
        }
        Ok(plan)
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Stable key for one (plan, funnel session) pair, so a retried request
/// returns the same Stripe session.
pub fn idempotency_key(plan_id: &str, session_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plan_id.as_bytes());
    hasher.update(b":");
    hasher.update(session_id.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

pub struct CheckoutClient {
    http: Client,
    api_base: String,
    site_url: String,
    secret_key: Option<String>,
}

impl CheckoutClient {
    pub fn new(config: &CheckoutConfig, secret_key: Option<String>) -> Result<Self, CheckoutError> {
        Ok(Self {
            http: http_client(config.timeout())?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            site_url: config.site_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Client with the secret key taken from the environment or keyring.
    pub fn from_config(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        Self::new(config, Credential::StripeSecretKey.resolve())
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Form fields for the Stripe request, in Stripe's bracket notation.
    pub fn form_params(&self, plan: &Plan, request: &CheckoutRequest) -> Vec<(String, String)> {
        let funnel_session = request.session_id.clone().unwrap_or_default();
        let price = "line_items[0][price_data]";
        let mut params: Vec<(String, String)> = vec![
            ("mode".into(), "subscription".into()),
            ("payment_method_types[0]".into(), "card".into()),
            (format!("{price}[currency]"), plan.currency.into()),
            (format!("{price}[product_data][name]"), plan.name.into()),
            (
                format!("{price}[product_data][description]"),
                PRODUCT_DESCRIPTION.into(),
            ),
            (
                format!("{price}[product_data][images][0]"),
                format!("{}/images/product-image.png", self.site_url),
            ),
            (format!("{price}[unit_amount]"), plan.amount.to_string()),
            (format!("{price}[recurring][interval]"), plan.interval.as_str().into()),
            (
                format!("{price}[recurring][interval_count]"),
                plan.interval_count.to_string(),
            ),
            ("line_items[0][quantity]".into(), "1".into()),
            (
                "success_url".into(),
                format!(
                    "{}/dashboard?session_id={{CHECKOUT_SESSION_ID}}&success=true",
                    self.site_url
                ),
            ),
            (
                "cancel_url".into(),
                format!("{}/result-offer?canceled=true", self.site_url),
            ),
            ("metadata[planId]".into(), plan.id.into()),
            ("metadata[funnelSessionId]".into(), funnel_session.clone()),
            ("allow_promotion_codes".into(), "true".into()),
            ("billing_address_collection".into(), "auto".into()),
            ("subscription_data[metadata][planId]".into(), plan.id.into()),
            (
                "subscription_data[metadata][funnelSessionId]".into(),
                funnel_session,
            ),
        ];
        if let Some(email) = &request.email {
            params.push(("customer_email".into(), email.clone()));
        }
        params
    }

    pub async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        let secret_key = self.secret_key.as_deref().ok_or(CheckoutError::NotConfigured)?;
        let plan = request.validate()?;

        let mut builder = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(secret_key)
            .form(&self.form_params(plan, request));
        if let Some(session_id) = &request.session_id {
            builder = builder.header("Idempotency-Key", idempotency_key(plan.id, session_id));
        }

        tracing::debug!(plan = plan.id, "creating checkout session");
        let resp = builder.send().await.map_err(|e| {
            tracing::error!(plan = plan.id, error = %e, "checkout request failed");
            CheckoutError::Http(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            tracing::error!(plan = plan.id, status = status.as_u16(), %message, "stripe rejected checkout");
            return Err(CheckoutError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let session: StripeSession = resp.json().await?;
        tracing::info!(plan = plan.id, checkout_session = %session.id, "checkout session created");
        Ok(CheckoutSession {
            success: true,
            session_id: session.id,
            url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(plan_id: &str) -> CheckoutRequest {
        CheckoutRequest {
            plan_id: plan_id.into(),
            session_id: Some("funnel-1".into()),
            email: None,
        }
    }

    #[test]
    fn plan_table() {
        assert_eq!(find_plan("1month").unwrap().amount, 1519);
        assert_eq!(find_plan("3month_81").unwrap().interval_count, 3);
        assert_eq!(find_plan("7day_74").unwrap().interval, Interval::Day);
        assert!(find_plan("lifetime").is_none());
        assert_eq!(find_plan("7day").unwrap().display_price(), "$6.93");
    }

    #[test]
    fn validation_statuses() {
        let err = request("lifetime").validate().unwrap_err();
        assert_eq!(err.status(), 400);

        let mut bad_email = request("7day");
        bad_email.email = Some("not-an-email".into());
        assert_eq!(bad_email.validate().unwrap_err().status(), 400);

        let mut good_email = request("7day");
        good_email.email = Some("jane@example.com".into());
        assert!(good_email.validate().is_ok());

        assert_eq!(CheckoutError::NotConfigured.status(), 503);
        assert_eq!(
            CheckoutError::Provider {
                status: 402,
                message: "card declined".into()
            }
            .status(),
            402
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.co"));
        assert!(!is_plausible_email("a b@c.co"));
        assert!(!is_plausible_email("a@b@c.co"));
    }

    #[test]
    fn idempotency_key_is_stable_per_pair() {
        let a = idempotency_key("7day", "s1");
        assert_eq!(a, idempotency_key("7day", "s1"));
        assert_ne!(a, idempotency_key("1month", "s1"));
        assert_ne!(a, idempotency_key("7day", "s2"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn form_params_carry_redirects_and_metadata() {
        let config = CheckoutConfig {
            site_url: "https://pcosreset.com/".into(),
            ..CheckoutConfig::default()
        };
        let client = CheckoutClient::new(&config, Some("sk_test".into())).unwrap();
        let plan = find_plan("1month").unwrap();
        let params = client.form_params(plan, &request("1month"));
        let get = |k: &str| {
            params
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(
            get("success_url"),
            Some("https://pcosreset.com/dashboard?session_id={CHECKOUT_SESSION_ID}&success=true")
        );
        assert_eq!(get("cancel_url"), Some("https://pcosreset.com/result-offer?canceled=true"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("1519"));
        assert_eq!(get("line_items[0][price_data][recurring][interval]"), Some("month"));
        assert_eq!(get("metadata[funnelSessionId]"), Some("funnel-1"));
        assert_eq!(get("customer_email"), None);
    }

    #[test]
    fn blank_key_is_not_configured() {
        let client = CheckoutClient::new(&CheckoutConfig::default(), Some("  ".into())).unwrap();
        assert!(!client.is_configured());
    }
}
