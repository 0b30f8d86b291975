//! HTTP layer for the HeritageBox chat backend.
//!
//! Axum-based JSON API with CORS and request tracing. The widget-facing
//! endpoints use camelCase field names and the `{"success": ...}` envelope
//! the embedded chat widget expects.

pub mod error;
pub mod handlers;
pub mod router;
