//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Every error body is `{"success": false, "error": <message>}` with a
//! caller-safe message; raw upstream detail is logged here and goes no
//! further. Chat-turn failures additionally echo the `sessionId` when it
//! is known, so the widget can keep its correlation without parsing the
//! request it sent.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use heritagebox_types::error::{ChatError, PaymentError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    session_id: Option<String>,
}

#[derive(Debug)]
enum ErrorKind {
    /// Chat-turn and handoff errors.
    Chat(ChatError),
    /// Payment errors.
    Payment(PaymentError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError {
            kind: ErrorKind::Chat(e),
            session_id: None,
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        AppError {
            kind: ErrorKind::Payment(e),
            session_id: None,
        }
    }
}

impl AppError {
    /// Echo the session id in the error body.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    fn status(&self) -> StatusCode {
        match &self.kind {
            ErrorKind::Chat(ChatError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ErrorKind::Chat(ChatError::UpstreamAuthFailure) => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Chat(ChatError::UpstreamRateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Chat(ChatError::UpstreamUnavailable(_))
            | ErrorKind::Chat(ChatError::MalformedUpstreamResponse(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ErrorKind::Chat(ChatError::Timeout(_)) => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::Chat(ChatError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Payment(PaymentError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ErrorKind::Payment(PaymentError::AuthFailure) => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Payment(PaymentError::CardDeclined(_)) => StatusCode::PAYMENT_REQUIRED,
            ErrorKind::Payment(PaymentError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Caller-safe message for the response body.
    fn message(&self) -> String {
        match &self.kind {
            ErrorKind::Chat(e) => e.user_message(),
            ErrorKind::Payment(PaymentError::InvalidInput(reason)) => reason.clone(),
            // The processor's decline message is written for cardholders.
            ErrorKind::Payment(PaymentError::CardDeclined(message)) => message.clone(),
            ErrorKind::Payment(PaymentError::AuthFailure) => {
                "Payment processing is misconfigured. Please contact support.".to_string()
            }
            ErrorKind::Payment(PaymentError::Unavailable(_)) => {
                "Payment processing is temporarily unavailable. Please try again.".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Full detail for operators; the body carries only the safe message.
        match &self.kind {
            ErrorKind::Chat(ChatError::InvalidInput(_))
            | ErrorKind::Payment(PaymentError::InvalidInput(_)) => {
                warn!(status = %status, error = ?self.kind, "request rejected");
            }
            ErrorKind::Payment(PaymentError::CardDeclined(_)) => {
                warn!(status = %status, error = ?self.kind, "charge declined");
            }
            _ => {
                error!(status = %status, error = ?self.kind, "request failed");
            }
        }

        let mut body = json!({
            "success": false,
            "error": self.message(),
        });
        if let Some(session_id) = &self.session_id {
            body["sessionId"] = json!(session_id);
        }

        (status, Json(body)).into_response()
    }
}
