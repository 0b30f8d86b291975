//! Payment shapes for the checkout flow.

use serde::{Deserialize, Serialize};

/// A charge request as received from the checkout page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    /// Tokenized card reference produced by the processor's JS library.
    /// Defaulted so absence surfaces as a validation error, not a parse error.
    #[serde(default)]
    pub token: String,
    /// Currency major units (dollars); converted to cents before charging.
    #[serde(default)]
    pub amount: f64,
    /// Opaque order context forwarded as the charge description.
    #[serde(default)]
    pub order_details: Option<serde_json::Value>,
}

impl ChargeRequest {
    /// Amount in currency minor units (cents), rounded.
    pub fn amount_minor(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }
}

/// A completed charge as reported back to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub id: String,
    pub amount_minor: i64,
    pub status: String,
    pub live_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_minor_conversion() {
        let req: ChargeRequest =
            serde_json::from_str(r#"{"token":"tok_visa","amount":59.99}"#).unwrap();
        assert_eq!(req.amount_minor(), 5999);
    }

    #[test]
    fn test_amount_minor_rounds() {
        let req: ChargeRequest =
            serde_json::from_str(r#"{"token":"tok_visa","amount":33.333}"#).unwrap();
        assert_eq!(req.amount_minor(), 3333);
    }

    #[test]
    fn test_order_details_optional() {
        let req: ChargeRequest =
            serde_json::from_str(r#"{"token":"tok_visa","amount":10.0}"#).unwrap();
        assert!(req.order_details.is_none());
    }
}
