//! StripeClient -- charges tokenized cards.
//!
//! Form-encoded `POST /v1/charges` with the amount converted from
//! currency major units to cents. Card declines carry Stripe's own
//! message (safe to show); everything else maps to the payment error
//! taxonomy.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use heritagebox_types::error::PaymentError;
use heritagebox_types::payment::{Charge, ChargeRequest};

/// Stripe charge adapter.
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: Option<SecretString>,
    live_mode: bool,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeCharge {
    id: String,
    amount: i64,
    status: String,
    #[serde(default)]
    livemode: bool,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl StripeClient {
    const TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(secret_key: Option<SecretString>, live_mode: bool) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            secret_key,
            live_mode,
            base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn live_mode(&self) -> bool {
        self.live_mode
    }

    fn validate(request: &ChargeRequest) -> Result<(), PaymentError> {
        if request.token.trim().is_empty() {
            return Err(PaymentError::InvalidInput("token is required".to_string()));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(PaymentError::InvalidInput(
                "amount must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    fn description(request: &ChargeRequest) -> String {
        request
            .order_details
            .as_ref()
            .map(|details| format!("HeritageBox order: {details}"))
            .unwrap_or_else(|| "HeritageBox order".to_string())
    }

    /// Charge a tokenized card.
    pub async fn charge(&self, request: &ChargeRequest) -> Result<Charge, PaymentError> {
        Self::validate(request)?;

        let Some(secret_key) = &self.secret_key else {
            warn!("payment requested but STRIPE_SECRET_KEY is not set");
            return Err(PaymentError::AuthFailure);
        };

        let amount_minor = request.amount_minor();
        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", "usd".to_string()),
            ("source", request.token.clone()),
            ("description", Self::description(request)),
        ];

        info!(amount_minor, live_mode = self.live_mode, "creating charge");

        let response = self
            .client
            .post(format!("{}/v1/charges", self.base_url))
            .basic_auth(secret_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let charge: StripeCharge = response
                .json()
                .await
                .map_err(|e| PaymentError::Unavailable(format!("malformed charge response: {e}")))?;
            return Ok(Charge {
                id: charge.id,
                amount_minor: charge.amount,
                status: charge.status,
                live_mode: charge.livemode,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => PaymentError::AuthFailure,
            402 => {
                let message = serde_json::from_str::<StripeErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.error.message)
                    .unwrap_or_else(|| "Your card was declined.".to_string());
                PaymentError::CardDeclined(message)
            }
            _ => PaymentError::Unavailable(format!("HTTP {status}: {body}")),
        })
    }
}
