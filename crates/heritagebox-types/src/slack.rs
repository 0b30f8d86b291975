//! Slack Events API envelope and the inbound-event classification types.
//!
//! The webhook endpoint deserializes deliveries into [`SlackEnvelope`];
//! the inbound router classifies message events into an explicit tagged
//! disposition so every ignore path carries a stable, loggable reason code.

use serde::Deserialize;
use std::fmt;

/// Top-level Slack Events API delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEnvelope {
    /// One-time endpoint handshake; answered with the challenge verbatim.
    UrlVerification { challenge: String },
    /// Wrapper around a workspace event.
    EventCallback { event: SlackEvent },
    /// Anything else is acknowledged without action.
    #[serde(other)]
    Other,
}

/// A single event inside an `event_callback` delivery.
///
/// All fields are optional on the wire; classification decides which
/// combinations are actionable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    pub subtype: Option<String>,
    /// Authoring user id. `USLACKBOT` is the platform's own system user.
    pub user: Option<String>,
    /// Present when the message was authored by a bot integration.
    pub bot_id: Option<String>,
    pub text: Option<String>,
    pub ts: Option<String>,
    /// Thread root timestamp; absent for channel-level chatter.
    pub thread_ts: Option<String>,
    pub channel: Option<String>,
}

/// Why an inbound event was ignored. Each terminal ignore branch logs one
/// of these codes; operators grep for them when debugging routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event type is not `message`.
    NotAMessage,
    /// Channel-level chatter with no thread reference.
    NotThreaded,
    /// Authored by the platform's own system user.
    SystemUser,
    /// Carries a `bot_message` subtype (our own posts echoing back).
    BotSubtype,
    /// Carries a bot-origin marker.
    BotAuthored,
    /// No text to append.
    EmptyText,
    /// Thread does not resolve to any tracked session.
    UnknownThread,
    /// Thread resolved, but the session is gone.
    SessionGone,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            IgnoreReason::NotAMessage => "not_a_message",
            IgnoreReason::NotThreaded => "not_threaded",
            IgnoreReason::SystemUser => "system_user",
            IgnoreReason::BotSubtype => "bot_subtype",
            IgnoreReason::BotAuthored => "bot_authored",
            IgnoreReason::EmptyText => "empty_text",
            IgnoreReason::UnknownThread => "unknown_thread",
            IgnoreReason::SessionGone => "session_gone",
        };
        write!(f, "{code}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_verification_parses() {
        let json = r#"{"type":"url_verification","challenge":"abc123","token":"t"}"#;
        let envelope: SlackEnvelope = serde_json::from_str(json).unwrap();
        match envelope {
            SlackEnvelope::UrlVerification { challenge } => assert_eq!(challenge, "abc123"),
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_event_callback_parses_threaded_message() {
        let json = r#"{
            "type": "event_callback",
            "event": {
                "type": "message",
                "user": "U123",
                "text": "On my way",
                "ts": "1700000001.000100",
                "thread_ts": "1700000000.000100",
                "channel": "C042"
            }
        }"#;
        let envelope: SlackEnvelope = serde_json::from_str(json).unwrap();
        match envelope {
            SlackEnvelope::EventCallback { event } => {
                assert_eq!(event.event_type, "message");
                assert_eq!(event.thread_ts.as_deref(), Some("1700000000.000100"));
                assert!(event.bot_id.is_none());
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_envelope_type_is_other() {
        let json = r#"{"type":"app_rate_limited","minute_rate_limited":1}"#;
        let envelope: SlackEnvelope = serde_json::from_str(json).unwrap();
        assert!(matches!(envelope, SlackEnvelope::Other));
    }

    #[test]
    fn test_ignore_reason_codes_are_stable() {
        assert_eq!(IgnoreReason::NotThreaded.to_string(), "not_threaded");
        assert_eq!(IgnoreReason::BotSubtype.to_string(), "bot_subtype");
        assert_eq!(IgnoreReason::UnknownThread.to_string(), "unknown_thread");
    }
}
