//! Payment handler for the checkout page.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use heritagebox_types::payment::{Charge, ChargeRequest};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    pub payment: Charge,
}

/// POST /process-payment - Charge a tokenized card.
pub async fn process_payment(
    State(state): State<AppState>,
    Json(body): Json<ChargeRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let charge = state.payments.charge(&body).await?;

    Ok(Json(PaymentResponse {
        success: true,
        payment: charge,
    }))
}
