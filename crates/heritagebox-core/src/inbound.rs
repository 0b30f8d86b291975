//! Inbound Slack event router.
//!
//! Turns webhook deliveries into session messages. Classification is a
//! pure function over the raw event producing a tagged disposition, so
//! every ignore path is enumerable, independently testable, and logged
//! with a stable reason code.

use std::sync::Arc;

use tracing::info;

use heritagebox_types::chat::{ChatMessage, Sender};
use heritagebox_types::slack::{IgnoreReason, SlackEnvelope, SlackEvent};

use crate::session::store::SessionStore;
use crate::session::{MAX_STORED_MESSAGES, PRUNE_KEEP};

/// Slack's own system user; its posts are never agent replies.
pub const SYSTEM_USER_ID: &str = "USLACKBOT";

/// Transcript labels the handoff coordinator prefixes messages with; an
/// agent quoting the summary back into the thread gets them stripped.
const TRANSCRIPT_MARKERS: [&str; 6] = [
    "**Customer:**",
    "**Bot:**",
    "**Agent:**",
    "*Customer:*",
    "*Bot:*",
    "*Agent:*",
];

/// Pure classification of a message event, before thread resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDisposition {
    /// A threaded, human-authored message worth routing.
    Candidate { thread: String, text: String },
    Ignore(IgnoreReason),
}

/// What the router did with a delivery. The webhook handler acknowledges
/// promptly regardless of the variant; only `Challenge` changes the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundAction {
    /// `url_verification` handshake; respond with the challenge verbatim.
    Challenge(String),
    /// An agent reply was appended to the session.
    Appended { session_id: String },
    /// The event was classified away; reason already logged.
    Ignored(IgnoreReason),
    /// Unrecognized envelope; acknowledged without action.
    Acked,
}

/// Classify a message event. Pure: no store access, no logging.
pub fn classify(event: &SlackEvent) -> MessageDisposition {
    use MessageDisposition::Ignore;

    if event.event_type != "message" {
        return Ignore(IgnoreReason::NotAMessage);
    }
    let Some(thread) = event.thread_ts.as_deref() else {
        return Ignore(IgnoreReason::NotThreaded);
    };
    if event.user.as_deref() == Some(SYSTEM_USER_ID) {
        return Ignore(IgnoreReason::SystemUser);
    }
    if event.subtype.as_deref() == Some("bot_message") {
        return Ignore(IgnoreReason::BotSubtype);
    }
    if event.bot_id.is_some() {
        return Ignore(IgnoreReason::BotAuthored);
    }
    let text = event.text.as_deref().map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Ignore(IgnoreReason::EmptyText);
    }

    MessageDisposition::Candidate {
        thread: thread.to_string(),
        text: text.to_string(),
    }
}

/// Strip a leading transcript marker from agent text.
pub fn strip_transcript_markers(text: &str) -> &str {
    for marker in TRANSCRIPT_MARKERS {
        if let Some(rest) = text.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    text
}

/// Routes qualifying inbound events into sessions via the reverse thread map.
pub struct InboundRouter<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> InboundRouter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handle one webhook delivery.
    pub async fn handle(&self, envelope: SlackEnvelope) -> InboundAction {
        match envelope {
            SlackEnvelope::UrlVerification { challenge } => {
                info!("answering url_verification handshake");
                InboundAction::Challenge(challenge)
            }
            SlackEnvelope::EventCallback { event } => self.route_event(event).await,
            SlackEnvelope::Other => InboundAction::Acked,
        }
    }

    async fn route_event(&self, event: SlackEvent) -> InboundAction {
        let (thread, text) = match classify(&event) {
            MessageDisposition::Candidate { thread, text } => (thread, text),
            MessageDisposition::Ignore(reason) => {
                info!(reason = %reason, ts = ?event.ts, "inbound event ignored");
                return InboundAction::Ignored(reason);
            }
        };

        let Some(session_id) = self.store.session_for_thread(&thread).await else {
            info!(
                reason = %IgnoreReason::UnknownThread,
                thread = %thread,
                "inbound event ignored"
            );
            return InboundAction::Ignored(IgnoreReason::UnknownThread);
        };

        let content = strip_transcript_markers(&text).to_string();
        let appended = self
            .store
            .append_message(&session_id, ChatMessage::new(Sender::Agent, content))
            .await;
        if !appended {
            info!(
                reason = %IgnoreReason::SessionGone,
                session_id = %session_id,
                "inbound event ignored"
            );
            return InboundAction::Ignored(IgnoreReason::SessionGone);
        }

        // Agent appends are bounded the same way chat turns are; a busy
        // thread must not grow the session without limit.
        self.store
            .truncate_history(&session_id, MAX_STORED_MESSAGES, PRUNE_KEEP)
            .await;

        info!(session_id = %session_id, thread = %thread, "agent reply appended");
        InboundAction::Appended { session_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::session::memory::InMemorySessionStore;

    fn threaded_message(text: &str) -> SlackEvent {
        SlackEvent {
            event_type: "message".to_string(),
            user: Some("U123".to_string()),
            text: Some(text.to_string()),
            ts: Some("1700.2".to_string()),
            thread_ts: Some("1700.1".to_string()),
            channel: Some("C042".to_string()),
            ..SlackEvent::default()
        }
    }

    #[test]
    fn test_classify_candidate() {
        let disposition = classify(&threaded_message("On my way"));
        assert_eq!(
            disposition,
            MessageDisposition::Candidate {
                thread: "1700.1".to_string(),
                text: "On my way".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_non_message_event() {
        let event = SlackEvent {
            event_type: "reaction_added".to_string(),
            ..SlackEvent::default()
        };
        assert_eq!(
            classify(&event),
            MessageDisposition::Ignore(IgnoreReason::NotAMessage)
        );
    }

    #[test]
    fn test_classify_unthreaded_chatter() {
        let mut event = threaded_message("hello channel");
        event.thread_ts = None;
        assert_eq!(
            classify(&event),
            MessageDisposition::Ignore(IgnoreReason::NotThreaded)
        );
    }

    #[test]
    fn test_classify_system_user() {
        let mut event = threaded_message("reminder");
        event.user = Some(SYSTEM_USER_ID.to_string());
        assert_eq!(
            classify(&event),
            MessageDisposition::Ignore(IgnoreReason::SystemUser)
        );
    }

    #[test]
    fn test_classify_bot_subtype() {
        let mut event = threaded_message("echo of our own post");
        event.subtype = Some("bot_message".to_string());
        assert_eq!(
            classify(&event),
            MessageDisposition::Ignore(IgnoreReason::BotSubtype)
        );
    }

    #[test]
    fn test_classify_bot_authored() {
        let mut event = threaded_message("integration noise");
        event.bot_id = Some("B99".to_string());
        assert_eq!(
            classify(&event),
            MessageDisposition::Ignore(IgnoreReason::BotAuthored)
        );
    }

    #[test]
    fn test_classify_empty_text() {
        let mut event = threaded_message("   ");
        event.text = Some("   ".to_string());
        assert_eq!(
            classify(&event),
            MessageDisposition::Ignore(IgnoreReason::EmptyText)
        );
    }

    #[test]
    fn test_strip_transcript_markers() {
        assert_eq!(
            strip_transcript_markers("**Customer:** where is my order?"),
            "where is my order?"
        );
        assert_eq!(strip_transcript_markers("**Bot:** hi"), "hi");
        assert_eq!(strip_transcript_markers("plain reply"), "plain reply");
    }

    #[tokio::test]
    async fn test_round_trip_appends_one_agent_message() {
        let store = Arc::new(InMemorySessionStore::new());
        store.get_or_create("s1").await;
        store.attach_thread("s1", "1700.1").await;
        let router = InboundRouter::new(store.clone());

        let action = router
            .handle(SlackEnvelope::EventCallback {
                event: threaded_message("**Agent:** I'll take it from here"),
            })
            .await;

        assert_eq!(
            action,
            InboundAction::Appended {
                session_id: "s1".to_string()
            }
        );
        let session = store.get("s1").await.unwrap();
        assert_eq!(session.messages.len(), 1);
        let message = &session.messages[0];
        assert_eq!(message.sender, Sender::Agent);
        assert_eq!(message.content, "I'll take it from here");
    }

    #[tokio::test]
    async fn test_agent_appends_keep_history_bounded() {
        let store = Arc::new(InMemorySessionStore::new());
        store.get_or_create("s1").await;
        store.attach_thread("s1", "1700.1").await;
        let router = InboundRouter::new(store.clone());

        for i in 0..30 {
            let action = router
                .handle(SlackEnvelope::EventCallback {
                    event: threaded_message(&format!("agent reply {i}")),
                })
                .await;
            assert_eq!(
                action,
                InboundAction::Appended {
                    session_id: "s1".to_string()
                }
            );
        }

        let session = store.get("s1").await.unwrap();
        // The bound holds after every append; the exact count depends on
        // where the last prune landed, but it never exceeds the maximum.
        assert!(session.messages.len() <= MAX_STORED_MESSAGES);
        assert!(session.messages.len() >= PRUNE_KEEP);
        assert_eq!(session.messages.last().unwrap().content, "agent reply 29");
    }

    #[tokio::test]
    async fn test_unknown_thread_ignored() {
        let store = Arc::new(InMemorySessionStore::new());
        let router = InboundRouter::new(store);

        let action = router
            .handle(SlackEnvelope::EventCallback {
                event: threaded_message("reply to untracked thread"),
            })
            .await;
        assert_eq!(action, InboundAction::Ignored(IgnoreReason::UnknownThread));
    }

    #[tokio::test]
    async fn test_challenge_returned_verbatim() {
        let store = Arc::new(InMemorySessionStore::new());
        let router = InboundRouter::new(store);

        let action = router
            .handle(SlackEnvelope::UrlVerification {
                challenge: "abc123".to_string(),
            })
            .await;
        assert_eq!(action, InboundAction::Challenge("abc123".to_string()));
    }

    #[tokio::test]
    async fn test_unrecognized_envelope_acked() {
        let store = Arc::new(InMemorySessionStore::new());
        let router = InboundRouter::new(store);
        assert_eq!(router.handle(SlackEnvelope::Other).await, InboundAction::Acked);
    }
}
