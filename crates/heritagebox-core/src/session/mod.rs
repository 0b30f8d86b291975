//! Session storage: the store trait and the in-memory reference backing.

pub mod memory;
pub mod store;

pub use memory::InMemorySessionStore;
pub use store::{SessionStore, ThreadAttachment};

use std::time::Duration;

/// Stored-history bound: once a session exceeds this many messages...
pub const MAX_STORED_MESSAGES: usize = 20;

/// ...it is truncated to this many most-recent messages. Every append
/// path (chat turns and inbound agent replies alike) applies the bound.
pub const PRUNE_KEEP: usize = 15;

/// Sessions idle longer than this are reaped. One policy for every entry
/// point; kept long enough that an escalated thread stays routable for a
/// working day.
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// How often the background sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);
