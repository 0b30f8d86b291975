//! LlmProvider trait definition.
//!
//! The reply-generation capability, treated as an opaque function of
//! (system instructions, conversation window) -> text. Uses native async
//! fn in traits (RPITIT, Rust 2024 edition). The concrete implementation
//! lives in heritagebox-infra (`OpenAiProvider`).

use heritagebox_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for the LLM completion backend.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// Implementations classify HTTP failures into [`LlmError`] variants;
    /// the deadline is imposed by the caller, not the provider.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
