//! Shared domain types for the HeritageBox chat backend.
//!
//! Pure data: chat sessions and messages, LLM request/response shapes,
//! Slack inbound event envelopes, payment shapes, pricing data, and the
//! error taxonomy. No I/O lives here.

pub mod chat;
pub mod error;
pub mod llm;
pub mod payment;
pub mod pricing;
pub mod slack;
