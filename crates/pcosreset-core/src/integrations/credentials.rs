//! Secret lookup: environment first, then the OS keyring.

use serde::Serialize;

use super::keyring_store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credential {
    StripeSecretKey,
    OpenAiApiKey,
    GoogleAiApiKey,
    SupabaseServiceRoleKey,
}

/// Where a credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    Environment,
    Keyring,
    Missing,
}

impl Credential {
    pub const ALL: [Credential; 4] = [
        Credential::StripeSecretKey,
        Credential::OpenAiApiKey,
        Credential::GoogleAiApiKey,
        Credential::SupabaseServiceRoleKey,
    ];

    /// Environment variable name, also used as the keyring entry name.
    pub fn env_var(self) -> &'static str {
        match self {
            Credential::StripeSecretKey => "STRIPE_SECRET_KEY",
            Credential::OpenAiApiKey => "OPENAI_API_KEY",
            Credential::GoogleAiApiKey => "GOOGLE_AI_API_KEY",
            Credential::SupabaseServiceRoleKey => "SUPABASE_SERVICE_ROLE_KEY",
        }
    }

    /// Short name used on the command line.
    pub fn short_name(self) -> &'static str {
        match self {
            Credential::StripeSecretKey => "stripe",
            Credential::OpenAiApiKey => "openai",
            Credential::GoogleAiApiKey => "gemini",
            Credential::SupabaseServiceRoleKey => "supabase",
        }
    }

    /// Resolve the secret. Empty values count as missing.
    pub fn resolve(self) -> Option<String> {
        self.lookup().map(|(value, _)| value)
    }

    pub fn source(self) -> CredentialSource {
        self.lookup()
            .map_or(CredentialSource::Missing, |(_, source)| source)
    }

    pub fn store(self, value: &str) -> Result<(), keyring::Error> {
        keyring_store::set(self.env_var(), value)
    }

    pub fn remove(self) -> Result<(), keyring::Error> {
        keyring_store::delete(self.env_var())
    }

    fn lookup(self) -> Option<(String, CredentialSource)> {
        if let Ok(value) = std::env::var(self.env_var()) {
            if !value.trim().is_empty() {
                return Some((value, CredentialSource::Environment));
            }
        }
        match keyring_store::get(self.env_var()) {
            Ok(Some(value)) if !value.trim().is_empty() => Some((value, CredentialSource::Keyring)),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(credential = self.env_var(), error = %e, "keyring lookup failed");
                None
            }
        }
    }
}

impl std::str::FromStr for Credential {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Credential::ALL
            .into_iter()
            .find(|c| c.short_name().eq_ignore_ascii_case(s) || c.env_var().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown credential '{s}' (expected stripe, openai, gemini or supabase)")
            })
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_env_names() {
        assert_eq!("stripe".parse::<Credential>(), Ok(Credential::StripeSecretKey));
        assert_eq!("GEMINI".parse::<Credential>(), Ok(Credential::GoogleAiApiKey));
        assert_eq!(
            "supabase_service_role_key".parse::<Credential>(),
            Ok(Credential::SupabaseServiceRoleKey)
        );
        assert!("github".parse::<Credential>().is_err());
    }

    #[test]
    fn short_names_round_trip() {
        for credential in Credential::ALL {
            assert_eq!(credential.to_string().parse::<Credential>(), Ok(credential));
        }
    }
}
