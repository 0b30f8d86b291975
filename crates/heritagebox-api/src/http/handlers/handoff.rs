//! Human-handoff request handler.
//!
//! The response is a success whenever the request validates: delivery
//! problems are an operator concern, and the widget's confirmation copy
//! must not depend on them.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use heritagebox_types::chat::CustomerInfo;
use heritagebox_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Confirmation copy shown in the widget. Mentions a direct contact path
/// in case the escalation never reaches a human.
const CONFIRMATION: &str = "Your request has been received. A member of our team \
    will follow up shortly. If you need immediate help, email support@heritagebox.com.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHumanBody {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Legacy clients sent the transcript inline; the server-side session
    /// is authoritative now, so this is accepted and ignored.
    #[serde(default)]
    pub messages: Option<serde_json::Value>,
    #[serde(default)]
    pub customer_info: Option<CustomerInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHumanResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// POST /request-human - Escalate a session to the team channel.
pub async fn request_human(
    State(state): State<AppState>,
    Json(body): Json<RequestHumanBody>,
) -> Result<Json<RequestHumanResponse>, AppError> {
    let session_id = body
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ChatError::InvalidInput("sessionId is required".to_string()))?;

    if body.messages.is_some() {
        debug!(session_id = %session_id, "ignoring legacy inline transcript");
    }

    let customer = body.customer_info.unwrap_or_default();
    let outcome = state.handoff.escalate(session_id, &customer).await?;
    debug!(session_id = %session_id, outcome = ?outcome, "handoff processed");

    Ok(Json(RequestHumanResponse {
        success: true,
        message: CONFIRMATION.to_string(),
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_offers_direct_contact() {
        // The widget copy must give the customer a path that works even
        // when delivery to the team channel silently failed.
        assert!(CONFIRMATION.contains("support"));
    }

    #[test]
    fn test_body_accepts_legacy_inline_transcript() {
        let body: RequestHumanBody = serde_json::from_str(
            r#"{"sessionId":"s1","messages":[{"content":"hi","sender":"user"}]}"#,
        )
        .unwrap();
        assert_eq!(body.session_id.as_deref(), Some("s1"));
        assert!(body.messages.is_some());
        assert!(body.customer_info.is_none());
    }
}
