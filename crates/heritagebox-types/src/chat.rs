//! Chat session and message types.
//!
//! A `Session` is the ephemeral server-side record of one browser
//! conversation, keyed by a client-supplied identifier. Messages are
//! ordered by insertion; ids are UUIDv7 so creation order and id order
//! agree, which the "messages after X" polling query relies on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The browser visitor.
    User,
    /// The automated assistant.
    Bot,
    /// A human agent replying from the Slack thread.
    Agent,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
            Sender::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            "agent" => Ok(Sender::Agent),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single message within a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// UUIDv7: unique within the session and orderable by creation time.
    pub id: Uuid,
    /// Free text; may carry lightweight display markup.
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// Ephemeral server-side record of one browser conversation.
///
/// Lives only in process memory; a restart loses all sessions. Created on
/// the first inbound chat message for an unseen id, reaped by age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque client-generated identifier, unique per browser tab/visit.
    pub id: String,
    /// Insertion order is chronological order. Append-only, except that
    /// old entries may be trimmed to bound per-session memory.
    pub messages: Vec<ChatMessage>,
    /// Slack thread this session was escalated to, set at most once.
    /// Unique across all live sessions (the reverse map is a bijection).
    pub slack_thread: Option<String>,
    /// Updated on every mutation; drives expiry.
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            slack_thread: None,
            last_activity: Utc::now(),
        }
    }
}

/// Contact fields a customer may supply when requesting a human.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
