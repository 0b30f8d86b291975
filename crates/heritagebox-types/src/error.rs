//! Error taxonomy for the chat backend.
//!
//! `ChatError` is the caller-facing classification: validation problems
//! surface precisely, upstream failures are translated into a small set of
//! user-safe messages, and raw upstream bodies stay in the logs. An absent
//! session is never an error anywhere in the system.

use crate::llm::LlmError;

/// Classified failure of a chat turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Missing, empty, or oversized input. Reported synchronously, never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream credential rejected. A configuration problem, not a caller problem.
    #[error("upstream authentication failed")]
    UpstreamAuthFailure,

    /// Reply-generation capability is throttling us.
    #[error("upstream rate limited")]
    UpstreamRateLimited,

    /// 5xx or connection failure from an upstream capability.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The reply-generation call exceeded its deadline.
    #[error("reply generation timed out after {0}s")]
    Timeout(u64),

    /// Upstream returned a shape without the expected text payload.
    /// Callers see this as "unavailable"; the detail is for operators.
    #[error("malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    /// Caller-safe message. Raw upstream error text never reaches the caller.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::InvalidInput(reason) => reason.clone(),
            ChatError::UpstreamAuthFailure => {
                "The chat service is misconfigured. Please contact support.".to_string()
            }
            ChatError::UpstreamRateLimited => {
                "The assistant is temporarily busy. Please try again in a moment.".to_string()
            }
            ChatError::UpstreamUnavailable(_) | ChatError::MalformedUpstreamResponse(_) => {
                "The assistant is temporarily unavailable. Please try again shortly.".to_string()
            }
            ChatError::Timeout(_) => {
                "The assistant took too long to respond. Please try again.".to_string()
            }
            ChatError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::AuthenticationFailed => ChatError::UpstreamAuthFailure,
            LlmError::RateLimited => ChatError::UpstreamRateLimited,
            LlmError::Overloaded(detail) | LlmError::Provider { message: detail } => {
                ChatError::UpstreamUnavailable(detail)
            }
            LlmError::Deserialization(detail) => ChatError::MalformedUpstreamResponse(detail),
            LlmError::InvalidRequest(detail) => ChatError::Internal(detail),
        }
    }
}

/// Failure delivering a human-handoff notification.
///
/// These never propagate to the end user; the handoff coordinator records
/// them in a typed outcome and logs for operators.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// No messaging credential configured; the post was skipped entirely.
    #[error("messaging credential not configured")]
    NotConfigured,

    #[error("notification request failed: {0}")]
    Http(String),

    #[error("notification rejected: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The messaging API answered 200 but reported an application error.
    #[error("notification rejected by API: {0}")]
    Api(String),
}

/// Failure reading the product/pricing store.
#[derive(Debug, thiserror::Error)]
pub enum ProductStoreError {
    #[error("product store credential not configured")]
    NotConfigured,

    #[error("product store request failed: {0}")]
    Http(String),

    #[error("product store rejected: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed product store response: {0}")]
    Malformed(String),
}

/// Classified failure of a payment attempt.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("payment credential rejected")]
    AuthFailure,

    /// The processor declined the card; the message is safe to show.
    #[error("card declined: {0}")]
    CardDeclined(String),

    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}
