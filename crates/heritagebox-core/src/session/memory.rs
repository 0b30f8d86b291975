//! In-memory session store over concurrent maps.
//!
//! The reference backing: process-wide, nothing survives a restart. Each
//! mutation is a closed read-modify-write under the dashmap shard lock, so
//! concurrent requests against the same session cannot lose appends (the
//! per-mutation serialization recommended for correctness).

use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use heritagebox_types::chat::{ChatMessage, Session};

use super::store::{SessionStore, ThreadAttachment};

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
    /// Reverse map: Slack thread id -> session id. Populated only by
    /// thread attachment, cleaned only by whole-session expiry.
    threads: DashMap<String, String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions (test and diagnostics helper).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    async fn get_or_create(&self, session_id: &str) -> Session {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %session_id, "session created");
                Session::new(session_id)
            })
            .clone()
    }

    async fn append_message(&self, session_id: &str, message: ChatMessage) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.messages.push(message);
                session.last_activity = Utc::now();
                true
            }
            None => {
                warn!(session_id = %session_id, "append to unknown session ignored");
                false
            }
        }
    }

    async fn truncate_history(&self, session_id: &str, max_len: usize, keep: usize) -> bool {
        let Some(mut session) = self.sessions.get_mut(session_id) else {
            return false;
        };
        let len = session.messages.len();
        if len <= max_len || keep >= len {
            return false;
        }
        session.messages.drain(..len - keep);
        debug!(session_id = %session_id, dropped = len - keep, "session history trimmed");
        true
    }

    async fn attach_thread(&self, session_id: &str, thread: &str) -> ThreadAttachment {
        let Some(mut session) = self.sessions.get_mut(session_id) else {
            warn!(session_id = %session_id, "thread attach to unknown session ignored");
            return ThreadAttachment::SessionMissing;
        };
        if let Some(existing) = &session.slack_thread {
            return ThreadAttachment::AlreadyAttached(existing.clone());
        }
        session.slack_thread = Some(thread.to_string());
        session.last_activity = Utc::now();
        self.threads
            .insert(thread.to_string(), session_id.to_string());
        ThreadAttachment::Attached
    }

    async fn session_for_thread(&self, thread: &str) -> Option<String> {
        self.threads.get(thread).map(|id| id.clone())
    }

    async fn expire_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::hours(24));

        let candidates: Vec<(String, Option<String>)> = self
            .sessions
            .iter()
            .filter(|entry| entry.last_activity < cutoff)
            .map(|entry| (entry.id.clone(), entry.slack_thread.clone()))
            .collect();

        let mut removed = 0;
        for (session_id, thread) in candidates {
            // Re-check under the shard lock; the session may have been
            // touched between the scan and the removal.
            let gone = self
                .sessions
                .remove_if(&session_id, |_, s| s.last_activity < cutoff)
                .is_some();
            if gone {
                if let Some(thread) = thread {
                    self.threads.remove(&thread);
                }
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "expired idle sessions");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritagebox_types::chat::Sender;

    #[tokio::test]
    async fn test_get_or_create_then_get() {
        let store = InMemorySessionStore::new();
        assert!(store.get("s1").await.is_none());

        let created = store.get_or_create("s1").await;
        assert_eq!(created.id, "s1");
        assert!(created.messages.is_empty());

        let fetched = store.get("s1").await.unwrap();
        assert_eq!(fetched.id, "s1");
    }

    #[tokio::test]
    async fn test_append_grows_by_one_and_preserves_order() {
        let store = InMemorySessionStore::new();
        store.get_or_create("s1").await;

        let msg = ChatMessage::new(Sender::User, "hello");
        let expected_id = msg.id;
        assert!(store.append_message("s1", msg).await);

        let session = store.get("s1").await.unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages.last().unwrap().id, expected_id);
    }

    #[tokio::test]
    async fn test_append_to_unknown_session_is_noop() {
        let store = InMemorySessionStore::new();
        assert!(
            !store
                .append_message("ghost", ChatMessage::new(Sender::User, "hi"))
                .await
        );
        assert!(store.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_truncate_keeps_most_recent_in_order() {
        let store = InMemorySessionStore::new();
        store.get_or_create("s1").await;
        for i in 0..22 {
            store
                .append_message("s1", ChatMessage::new(Sender::User, format!("m{i}")))
                .await;
        }

        assert!(store.truncate_history("s1", 20, 15).await);
        let session = store.get("s1").await.unwrap();
        assert_eq!(session.messages.len(), 15);
        assert_eq!(session.messages.first().unwrap().content, "m7");
        assert_eq!(session.messages.last().unwrap().content, "m21");
    }

    #[tokio::test]
    async fn test_truncate_below_threshold_is_noop() {
        let store = InMemorySessionStore::new();
        store.get_or_create("s1").await;
        for i in 0..5 {
            store
                .append_message("s1", ChatMessage::new(Sender::User, format!("m{i}")))
                .await;
        }
        assert!(!store.truncate_history("s1", 20, 15).await);
        assert_eq!(store.get("s1").await.unwrap().messages.len(), 5);
    }

    #[tokio::test]
    async fn test_attach_thread_first_writer_wins() {
        let store = InMemorySessionStore::new();
        store.get_or_create("s1").await;

        assert_eq!(
            store.attach_thread("s1", "1700.1").await,
            ThreadAttachment::Attached
        );
        assert_eq!(
            store.attach_thread("s1", "1700.2").await,
            ThreadAttachment::AlreadyAttached("1700.1".to_string())
        );

        // The reverse map holds exactly the first thread.
        assert_eq!(store.session_for_thread("1700.1").await.as_deref(), Some("s1"));
        assert!(store.session_for_thread("1700.2").await.is_none());
    }

    #[tokio::test]
    async fn test_attach_thread_to_unknown_session() {
        let store = InMemorySessionStore::new();
        assert_eq!(
            store.attach_thread("ghost", "1700.1").await,
            ThreadAttachment::SessionMissing
        );
        assert!(store.session_for_thread("1700.1").await.is_none());
    }

    #[tokio::test]
    async fn test_expiry_removes_session_and_thread_mapping() {
        let store = InMemorySessionStore::new();
        store.get_or_create("old").await;
        store.attach_thread("old", "1700.1").await;
        store.get_or_create("fresh").await;

        // Backdate the idle session past the cutoff.
        store
            .sessions
            .get_mut("old")
            .unwrap()
            .last_activity = Utc::now() - chrono::Duration::hours(48);

        let removed = store.expire_older_than(Duration::from_secs(24 * 60 * 60)).await;
        assert_eq!(removed, 1);
        assert!(store.get("old").await.is_none());
        // No dangling reverse mapping.
        assert!(store.session_for_thread("1700.1").await.is_none());
        assert!(store.get("fresh").await.is_some());
    }

    #[tokio::test]
    async fn test_expiry_spares_recently_active() {
        let store = InMemorySessionStore::new();
        store.get_or_create("s1").await;
        let removed = store.expire_older_than(Duration::from_secs(60)).await;
        assert_eq!(removed, 0);
        assert!(store.get("s1").await.is_some());
    }
}
