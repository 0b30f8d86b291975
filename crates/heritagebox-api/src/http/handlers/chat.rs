//! Chat turn handler for the embedded widget.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for `POST /chat`.
///
/// Fields are defaulted so absence surfaces as a validation error from the
/// assembler (precise 400) rather than a parse rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnResponse {
    pub success: bool,
    pub response: String,
    pub session_id: String,
}

/// POST /chat - Run one chat turn and return the assistant's reply.
pub async fn chat_turn(
    State(state): State<AppState>,
    Json(body): Json<ChatTurnRequest>,
) -> Result<Json<ChatTurnResponse>, AppError> {
    let reply = state
        .assembler
        .handle_turn(&body.session_id, &body.message)
        .await
        .map_err(|err| {
            let err = AppError::from(err);
            // Echo the session id so the widget keeps its correlation,
            // unless its absence is what failed validation.
            if body.session_id.trim().is_empty() {
                err
            } else {
                err.with_session_id(body.session_id.trim())
            }
        })?;

    Ok(Json(ChatTurnResponse {
        success: true,
        response: reply,
        session_id: body.session_id,
    }))
}
