//! SlackNotifier -- posts handoff summaries via `chat.postMessage`.
//!
//! The returned message `ts` doubles as the thread id Slack uses for
//! replies, so it becomes the reverse-mapping key. An unset token yields
//! [`NotifyError::NotConfigured`] without a network call; the handoff
//! coordinator turns that into a logged skip.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use heritagebox_core::notify::HandoffNotifier;
use heritagebox_types::error::NotifyError;

/// Slack messaging adapter.
pub struct SlackNotifier {
    client: reqwest::Client,
    token: Option<SecretString>,
    channel: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
}

impl SlackNotifier {
    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(token: Option<SecretString>, channel: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            channel,
            base_url: "https://slack.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }
}

impl HandoffNotifier for SlackNotifier {
    async fn post_handoff(&self, summary: &str) -> Result<Option<String>, NotifyError> {
        let Some(token) = &self.token else {
            return Err(NotifyError::NotConfigured);
        };

        let response = self
            .client
            .post(format!("{}/api/chat.postMessage", self.base_url))
            .bearer_auth(token.expose_secret())
            .json(&serde_json::json!({
                "channel": self.channel,
                "text": summary,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Http(format!("malformed postMessage response: {e}")))?;

        if !parsed.ok {
            return Err(NotifyError::Api(
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        debug!(channel = %self.channel, ts = ?parsed.ts, "handoff summary posted");
        Ok(parsed.ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unset_token_is_not_configured() {
        let notifier = SlackNotifier::new(None, "#customer-chat".to_string());
        assert!(!notifier.is_configured());

        let err = notifier.post_handoff("summary").await.unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured));
    }

    #[test]
    fn test_post_message_response_parses() {
        let ok: PostMessageResponse =
            serde_json::from_str(r#"{"ok":true,"ts":"1700000000.000100","channel":"C042"}"#)
                .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.ts.as_deref(), Some("1700000000.000100"));

        let rejected: PostMessageResponse =
            serde_json::from_str(r#"{"ok":false,"error":"channel_not_found"}"#).unwrap();
        assert!(!rejected.ok);
        assert_eq!(rejected.error.as_deref(), Some("channel_not_found"));
    }
}
