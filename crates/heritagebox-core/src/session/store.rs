//! SessionStore trait definition.
//!
//! Keyed access to ephemeral chat sessions plus the reverse thread map
//! (Slack thread id back to session id). Uses native async fn in traits
//! (RPITIT, Rust 2024 edition). The reference backing is
//! [`InMemorySessionStore`](super::memory::InMemorySessionStore); a durable
//! implementation can be substituted without touching callers.
//!
//! The store never raises: absence is a value, failed mutations degrade to
//! a logged no-op.

use std::time::Duration;

use heritagebox_types::chat::{ChatMessage, Session};

/// Result of registering a Slack thread against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadAttachment {
    /// The thread was registered and the reverse mapping created.
    Attached,
    /// The session already carries a thread; the existing one is kept.
    /// First writer wins, keeping the thread-to-session map a bijection.
    AlreadyAttached(String),
    /// No such session; nothing was registered.
    SessionMissing,
}

/// Store for chat sessions and the reverse thread map.
pub trait SessionStore: Send + Sync {
    /// Snapshot a session by id. Absence is a normal, handled state.
    fn get(&self, session_id: &str) -> impl Future<Output = Option<Session>> + Send;

    /// Fetch the session, creating an empty one if the id is unseen.
    fn get_or_create(&self, session_id: &str) -> impl Future<Output = Session> + Send;

    /// Append a message and bump `last_activity`. Returns false (after
    /// logging) if the session does not exist; never an error.
    fn append_message(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> impl Future<Output = bool> + Send;

    /// If the session holds more than `max_len` messages, keep only the
    /// most recent `keep`. Returns whether anything was trimmed.
    fn truncate_history(
        &self,
        session_id: &str,
        max_len: usize,
        keep: usize,
    ) -> impl Future<Output = bool> + Send;

    /// Register the Slack thread for a session and add the reverse mapping.
    fn attach_thread(
        &self,
        session_id: &str,
        thread: &str,
    ) -> impl Future<Output = ThreadAttachment> + Send;

    /// Resolve a Slack thread id back to its owning session id.
    fn session_for_thread(&self, thread: &str) -> impl Future<Output = Option<String>> + Send;

    /// Remove every session whose `last_activity` predates `now - max_age`,
    /// together with its reverse-mapping entry. Returns the count removed.
    fn expire_older_than(&self, max_age: Duration) -> impl Future<Output = usize> + Send;
}
