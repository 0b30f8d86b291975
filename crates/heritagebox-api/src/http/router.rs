//! Axum router configuration with middleware.
//!
//! Routes sit at the root because the embedded widget and the Slack app
//! configuration both address them there. Middleware: permissive CORS (the
//! widget is embedded on the marketing site) and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handlers::chat::chat_turn))
        .route("/chat-messages", get(handlers::poll::chat_messages))
        .route("/request-human", post(handlers::handoff::request_human))
        .route("/slack-webhook", post(handlers::slack::slack_webhook))
        .route("/send-to-slack", post(handlers::slack::send_to_slack_retired))
        .route("/process-payment", post(handlers::payment::process_payment))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
