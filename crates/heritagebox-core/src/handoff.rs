//! Human handoff coordinator.
//!
//! Escalates a session to the team channel with a transcript summary and,
//! when the notifier returns a thread id, registers the reverse mapping so
//! agent replies in that thread route back to the session. Escalation is
//! idempotent per session. Delivery failures never surface to the end
//! user; they are captured in the typed [`HandoffOutcome`] and logged for
//! operators.

use std::sync::Arc;

use tracing::{error, info, warn};

use heritagebox_types::chat::{ChatMessage, CustomerInfo, Sender};
use heritagebox_types::error::{ChatError, NotifyError};

use crate::notify::HandoffNotifier;
use crate::session::store::{SessionStore, ThreadAttachment};

/// How many trailing messages the transcript summary carries.
pub const TRANSCRIPT_MESSAGES: usize = 5;

/// Per-message snippet bound in the summary.
pub const TRANSCRIPT_SNIPPET_CHARS: usize = 160;

/// What actually happened during an escalation. Every variant is a
/// user-facing success; the distinction exists for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffOutcome {
    /// The summary was posted; `thread` is the Slack thread when one was
    /// created (and the reverse mapping registered).
    Delivered { thread: Option<String> },
    /// The session already has a thread; no second post was made.
    AlreadyEscalated,
    /// No messaging credential configured; the post was skipped.
    Skipped,
    /// The post failed; the user still sees success.
    Failed(String),
}

/// Coordinates escalation of a session to a human.
pub struct HandoffCoordinator<S, N>
where
    S: SessionStore,
    N: HandoffNotifier,
{
    store: Arc<S>,
    notifier: N,
}

impl<S, N> HandoffCoordinator<S, N>
where
    S: SessionStore,
    N: HandoffNotifier,
{
    pub fn new(store: Arc<S>, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Escalate a session to a human, idempotently with respect to thread
    /// creation. Only validation failures propagate as errors.
    pub async fn escalate(
        &self,
        session_id: &str,
        customer: &CustomerInfo,
    ) -> Result<HandoffOutcome, ChatError> {
        if session_id.trim().is_empty() {
            return Err(ChatError::InvalidInput("sessionId is required".to_string()));
        }

        let session = self.store.get(session_id).await;
        if let Some(thread) = session.as_ref().and_then(|s| s.slack_thread.as_deref()) {
            info!(session_id = %session_id, thread = %thread, "session already escalated");
            return Ok(HandoffOutcome::AlreadyEscalated);
        }

        let messages = session.as_ref().map(|s| s.messages.as_slice()).unwrap_or(&[]);
        let summary = render_transcript(customer, messages);

        match self.notifier.post_handoff(&summary).await {
            Ok(thread) => {
                if let Some(ts) = &thread {
                    match self.store.attach_thread(session_id, ts).await {
                        ThreadAttachment::Attached => {}
                        ThreadAttachment::AlreadyAttached(existing) => {
                            // Concurrent escalation won the race; its thread stands.
                            warn!(
                                session_id = %session_id,
                                kept = %existing,
                                dropped = %ts,
                                "thread already attached, keeping first"
                            );
                        }
                        ThreadAttachment::SessionMissing => {
                            warn!(session_id = %session_id, "session gone before thread attach");
                        }
                    }
                }
                info!(session_id = %session_id, thread = ?thread, "handoff delivered");
                Ok(HandoffOutcome::Delivered { thread })
            }
            Err(NotifyError::NotConfigured) => {
                warn!(
                    session_id = %session_id,
                    "handoff notification skipped: messaging credential not configured"
                );
                Ok(HandoffOutcome::Skipped)
            }
            Err(err) => {
                error!(session_id = %session_id, error = %err, "handoff notification failed");
                Ok(HandoffOutcome::Failed(err.to_string()))
            }
        }
    }
}

/// Render the transcript summary posted to the team channel: contact
/// fields first, then the trailing messages with sender labels.
pub fn render_transcript(customer: &CustomerInfo, messages: &[ChatMessage]) -> String {
    let field = |value: &Option<String>| -> String {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => "Not provided".to_string(),
        }
    };

    let mut summary = String::from(":raising_hand: *Customer requested a human*\n");
    summary.push_str(&format!("Name: {}\n", field(&customer.name)));
    summary.push_str(&format!("Email: {}\n", field(&customer.email)));
    summary.push_str(&format!("Phone: {}\n", field(&customer.phone)));

    summary.push_str("\n*Recent conversation:*\n");
    if messages.is_empty() {
        summary.push_str("(no transcript available)\n");
        return summary;
    }

    let start = messages.len().saturating_sub(TRANSCRIPT_MESSAGES);
    for message in &messages[start..] {
        let label = match message.sender {
            Sender::User => "**Customer:**",
            Sender::Bot => "**Bot:**",
            Sender::Agent => "**Agent:**",
        };
        summary.push_str(&format!("{label} {}\n", snippet(&message.content)));
    }
    summary
}

/// Bound one message to the snippet length, on a char boundary.
fn snippet(content: &str) -> String {
    if content.chars().count() <= TRANSCRIPT_SNIPPET_CHARS {
        return content.to_string();
    }
    let mut out: String = content.chars().take(TRANSCRIPT_SNIPPET_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::session::memory::InMemorySessionStore;

    struct MockNotifier {
        posts: Mutex<Vec<String>>,
        result: fn() -> Result<Option<String>, NotifyError>,
    }

    impl MockNotifier {
        fn new(result: fn() -> Result<Option<String>, NotifyError>) -> Self {
            Self {
                posts: Mutex::new(Vec::new()),
                result,
            }
        }

        fn post_count(&self) -> usize {
            self.posts.lock().unwrap().len()
        }
    }

    impl HandoffNotifier for &MockNotifier {
        async fn post_handoff(&self, summary: &str) -> Result<Option<String>, NotifyError> {
            self.posts.lock().unwrap().push(summary.to_string());
            (self.result)()
        }
    }

    async fn seeded_store() -> Arc<InMemorySessionStore> {
        let store = Arc::new(InMemorySessionStore::new());
        store.get_or_create("s1").await;
        store
            .append_message("s1", ChatMessage::new(Sender::User, "I need help"))
            .await;
        store
            .append_message("s1", ChatMessage::new(Sender::Bot, "Happy to help!"))
            .await;
        store
    }

    #[tokio::test]
    async fn test_escalation_attaches_thread() {
        let store = seeded_store().await;
        let notifier = MockNotifier::new(|| Ok(Some("1700.42".to_string())));
        let coordinator = HandoffCoordinator::new(store.clone(), &notifier);

        let outcome = coordinator
            .escalate("s1", &CustomerInfo::default())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            HandoffOutcome::Delivered {
                thread: Some("1700.42".to_string())
            }
        );
        assert_eq!(store.session_for_thread("1700.42").await.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_second_escalation_is_idempotent() {
        let store = seeded_store().await;
        let notifier = MockNotifier::new(|| Ok(Some("1700.42".to_string())));
        let coordinator = HandoffCoordinator::new(store.clone(), &notifier);

        coordinator.escalate("s1", &CustomerInfo::default()).await.unwrap();
        let second = coordinator
            .escalate("s1", &CustomerInfo::default())
            .await
            .unwrap();

        assert_eq!(second, HandoffOutcome::AlreadyEscalated);
        assert_eq!(notifier.post_count(), 1);
        assert_eq!(store.session_for_thread("1700.42").await.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_is_skipped_success() {
        let store = seeded_store().await;
        let notifier = MockNotifier::new(|| Err(NotifyError::NotConfigured));
        let coordinator = HandoffCoordinator::new(store, &notifier);

        let outcome = coordinator
            .escalate("s1", &CustomerInfo::default())
            .await
            .unwrap();
        assert_eq!(outcome, HandoffOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let store = seeded_store().await;
        let notifier = MockNotifier::new(|| {
            Err(NotifyError::Status {
                status: 500,
                body: "slack down".to_string(),
            })
        });
        let coordinator = HandoffCoordinator::new(store.clone(), &notifier);

        let outcome = coordinator
            .escalate("s1", &CustomerInfo::default())
            .await
            .unwrap();
        assert!(matches!(outcome, HandoffOutcome::Failed(_)));
        // No mapping was registered.
        let session = store.get("s1").await.unwrap();
        assert!(session.slack_thread.is_none());
    }

    #[tokio::test]
    async fn test_missing_session_still_escalates() {
        let store = Arc::new(InMemorySessionStore::new());
        let notifier = MockNotifier::new(|| Ok(None));
        let coordinator = HandoffCoordinator::new(store, &notifier);

        let outcome = coordinator
            .escalate("brand-new", &CustomerInfo::default())
            .await
            .unwrap();
        assert_eq!(outcome, HandoffOutcome::Delivered { thread: None });

        let posts = notifier.posts.lock().unwrap();
        assert!(posts[0].contains("(no transcript available)"));
    }

    #[tokio::test]
    async fn test_empty_session_id_is_invalid() {
        let store = Arc::new(InMemorySessionStore::new());
        let notifier = MockNotifier::new(|| Ok(None));
        let coordinator = HandoffCoordinator::new(store, &notifier);

        let err = coordinator
            .escalate("", &CustomerInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
        assert_eq!(notifier.post_count(), 0);
    }

    #[test]
    fn test_transcript_renders_contact_fields() {
        let customer = CustomerInfo {
            name: Some("Ada".to_string()),
            email: None,
            phone: Some("  ".to_string()),
        };
        let messages = vec![
            ChatMessage::new(Sender::User, "hello"),
            ChatMessage::new(Sender::Bot, "hi there"),
        ];
        let summary = render_transcript(&customer, &messages);
        assert!(summary.contains("Name: Ada"));
        assert!(summary.contains("Email: Not provided"));
        assert!(summary.contains("Phone: Not provided"));
        assert!(summary.contains("**Customer:** hello"));
        assert!(summary.contains("**Bot:** hi there"));
    }

    #[test]
    fn test_transcript_bounds_message_count_and_length() {
        let mut messages = Vec::new();
        for i in 0..8 {
            messages.push(ChatMessage::new(Sender::User, format!("message {i}")));
        }
        messages.push(ChatMessage::new(Sender::User, "y".repeat(500)));

        let summary = render_transcript(&CustomerInfo::default(), &messages);
        // Only the last 5 messages appear.
        assert!(!summary.contains("message 3"));
        assert!(summary.contains("message 5"));
        // Long content is truncated.
        assert!(summary.contains('…'));
        assert!(!summary.contains(&"y".repeat(200)));
    }
}
