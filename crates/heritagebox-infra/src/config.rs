//! Environment configuration.
//!
//! Every upstream credential is optional: a missing value logs a warning
//! and the owning subsystem degrades (handoff skipped, pricing falls back,
//! payments rejected as misconfigured) rather than failing startup.

use secrecy::SecretString;
use tracing::warn;

/// Runtime configuration read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Reply-generation credential (`OPENAI_API_KEY`).
    pub openai_api_key: Option<SecretString>,
    /// Model identifier (`OPENAI_MODEL`).
    pub openai_model: String,
    /// Messaging credential (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: Option<SecretString>,
    /// Handoff target channel (`SLACK_CHANNEL_ID`).
    pub slack_channel: String,
    /// Payment credential (`STRIPE_SECRET_KEY`).
    pub stripe_secret_key: Option<SecretString>,
    /// Live vs. test charging (`STRIPE_LIVE_MODE`).
    pub stripe_live_mode: bool,
    /// Product database credential (`AIRTABLE_API_KEY`).
    pub airtable_api_key: Option<SecretString>,
    /// Product database base (`AIRTABLE_BASE_ID`).
    pub airtable_base_id: Option<String>,
    /// Public site URL (`SITE_BASE_URL`), used in outbound copy.
    pub site_base_url: String,
}

impl AppConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let secret = |name: &str| -> Option<SecretString> {
            match nonempty_var(name) {
                Some(value) => Some(SecretString::from(value)),
                None => {
                    warn!("{name} not set; the dependent subsystem is disabled");
                    None
                }
            }
        };

        Self {
            openai_api_key: secret("OPENAI_API_KEY"),
            openai_model: nonempty_var("OPENAI_MODEL")
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            slack_bot_token: secret("SLACK_BOT_TOKEN"),
            slack_channel: nonempty_var("SLACK_CHANNEL_ID")
                .unwrap_or_else(|| "#customer-chat".to_string()),
            stripe_secret_key: secret("STRIPE_SECRET_KEY"),
            stripe_live_mode: nonempty_var("STRIPE_LIVE_MODE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "live"))
                .unwrap_or(false),
            airtable_api_key: secret("AIRTABLE_API_KEY"),
            airtable_base_id: nonempty_var("AIRTABLE_BASE_ID"),
            site_base_url: nonempty_var("SITE_BASE_URL")
                .unwrap_or_else(|| "https://heritagebox.com".to_string()),
        }
    }
}

fn nonempty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
