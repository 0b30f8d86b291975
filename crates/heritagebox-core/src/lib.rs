//! Business logic for the HeritageBox chat backend.
//!
//! Everything here is generic over the boundary traits ([`SessionStore`],
//! [`LlmProvider`], [`HandoffNotifier`], [`ProductStore`]) so the concrete
//! adapters in `heritagebox-infra` can be swapped without touching callers.
//!
//! [`SessionStore`]: session::store::SessionStore
//! [`LlmProvider`]: llm::provider::LlmProvider
//! [`HandoffNotifier`]: notify::HandoffNotifier
//! [`ProductStore`]: pricing::ProductStore

pub mod chat;
pub mod handoff;
pub mod inbound;
pub mod llm;
pub mod notify;
pub mod poll;
pub mod pricing;
pub mod session;
