//! Polling responder: "give me messages after X" for browser clients.
//!
//! The browser polls instead of holding a connection. An absent session is
//! a valid state (it may poll before the first turn), an unrecognized
//! checkpoint falls back to the full list, and the caller's own messages
//! are filtered out so it never re-renders what it already has.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use heritagebox_types::chat::{ChatMessage, Sender};

use crate::session::store::SessionStore;

/// Result of one poll.
#[derive(Debug, Clone)]
pub struct PollResult {
    /// False when the session does not exist (yet); not an error.
    pub session_exists: bool,
    /// Messages after the checkpoint, `sender=user` excluded.
    pub messages: Vec<ChatMessage>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Serves incremental message reads against the session store.
pub struct PollingResponder<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> PollingResponder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Messages strictly after `last_message_id`. An id that does not
    /// parse or is not in the list is treated as "no checkpoint".
    pub async fn messages_after(
        &self,
        session_id: &str,
        last_message_id: Option<&str>,
    ) -> PollResult {
        let Some(session) = self.store.get(session_id).await else {
            return PollResult {
                session_exists: false,
                messages: Vec::new(),
                last_activity: None,
            };
        };

        let start = last_message_id
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .and_then(|id| session.messages.iter().position(|m| m.id == id))
            .map(|index| index + 1)
            .unwrap_or(0);

        let messages = session.messages[start..]
            .iter()
            .filter(|m| m.sender != Sender::User)
            .cloned()
            .collect();

        PollResult {
            session_exists: true,
            messages,
            last_activity: Some(session.last_activity),
        }
    }
}
