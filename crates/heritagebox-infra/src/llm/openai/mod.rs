//! OpenAI chat-completions provider.
//!
//! Implements the [`LlmProvider`](heritagebox_core::llm::provider::LlmProvider)
//! trait against `POST /v1/chat/completions`.

pub mod client;
pub mod types;

pub use client::OpenAiProvider;
