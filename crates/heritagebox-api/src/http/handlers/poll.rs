//! Incremental message polling for the widget.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use heritagebox_types::chat::ChatMessage;
use heritagebox_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollParams {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Checkpoint: the id of the last message the widget has rendered.
    #[serde(default)]
    pub last_message_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub success: bool,
    pub messages: Vec<ChatMessage>,
    pub session_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

/// GET /chat-messages - Messages after the checkpoint, caller's own excluded.
///
/// An unknown session answers `sessionExists: false` with an empty list;
/// the widget may poll before its first turn.
pub async fn chat_messages(
    State(state): State<AppState>,
    Query(params): Query<PollParams>,
) -> Result<Json<PollResponse>, AppError> {
    let session_id = params
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ChatError::InvalidInput("sessionId is required".to_string()))?;

    let result = state
        .poller
        .messages_after(session_id, params.last_message_id.as_deref())
        .await;

    Ok(Json(PollResponse {
        success: true,
        messages: result.messages,
        session_exists: result.session_exists,
        last_activity: result.last_activity,
    }))
}
