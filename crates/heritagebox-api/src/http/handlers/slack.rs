//! Slack webhook receiver and the retired direct-post endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use heritagebox_core::inbound::InboundAction;
use heritagebox_types::slack::SlackEnvelope;

use crate::state::AppState;

/// POST /slack-webhook - Receive a Slack event delivery.
///
/// Always acknowledges promptly: Slack retries on anything but a fast 200,
/// and a retried delivery would re-append agent replies. A body that does
/// not parse as an envelope is logged and acknowledged anyway.
pub async fn slack_webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let envelope: SlackEnvelope = match serde_json::from_value(payload) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "unparseable webhook payload acknowledged");
            return Json(json!({ "ok": true })).into_response();
        }
    };

    match state.inbound.handle(envelope).await {
        // The handshake wants the challenge string back verbatim.
        InboundAction::Challenge(challenge) => challenge.into_response(),
        _ => Json(json!({ "ok": true })).into_response(),
    }
}

/// POST /send-to-slack - Retired.
///
/// Old widget builds posted transcripts here directly. The handoff flow
/// replaced it; answering 410 keeps stale embeds from failing silently.
pub async fn send_to_slack_retired() -> Response {
    (
        StatusCode::GONE,
        Json(json!({
            "success": false,
            "error": "This endpoint is no longer available. Use /request-human instead.",
        })),
    )
        .into_response()
}
