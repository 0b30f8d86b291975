//! AirtableProductStore -- reads current service prices.
//!
//! Implements [`ProductStore`] against the Airtable records API. The
//! pricing cache in front of this adapter absorbs every failure mode, so
//! errors here only ever cost prompt freshness.

use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use heritagebox_core::pricing::ProductStore;
use heritagebox_types::error::ProductStoreError;
use heritagebox_types::pricing::{PriceItem, PriceList};

const PRODUCTS_TABLE: &str = "Products";

/// Airtable pricing adapter.
pub struct AirtableProductStore {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_id: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    fields: RecordFields,
}

#[derive(Debug, Deserialize)]
struct RecordFields {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Price")]
    price: Option<f64>,
    #[serde(rename = "Unit")]
    unit: Option<String>,
}

impl AirtableProductStore {
    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(api_key: Option<SecretString>, base_id: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_id,
            base_url: "https://api.airtable.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Records with both a name and a price become price items; anything
    /// else is skipped. An entirely empty result is malformed; the caller
    /// should keep whatever it had.
    fn to_price_list(response: RecordsResponse) -> Result<PriceList, ProductStoreError> {
        let items: Vec<PriceItem> = response
            .records
            .into_iter()
            .filter_map(|record| {
                let fields = record.fields;
                Some(PriceItem {
                    name: fields.name?,
                    price: fields.price?,
                    unit: fields.unit,
                })
            })
            .collect();

        if items.is_empty() {
            return Err(ProductStoreError::Malformed(
                "no priced records in response".to_string(),
            ));
        }

        Ok(PriceList {
            items,
            fetched_at: Utc::now(),
        })
    }
}

impl ProductStore for AirtableProductStore {
    async fn fetch_prices(&self) -> Result<PriceList, ProductStoreError> {
        let (Some(api_key), Some(base_id)) = (&self.api_key, &self.base_id) else {
            return Err(ProductStoreError::NotConfigured);
        };

        let response = self
            .client
            .get(format!("{}/v0/{base_id}/{PRODUCTS_TABLE}", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .send()
            .await
            .map_err(|e| ProductStoreError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProductStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let records: RecordsResponse = response
            .json()
            .await
            .map_err(|e| ProductStoreError::Malformed(e.to_string()))?;

        Self::to_price_list(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_not_configured() {
        let store = AirtableProductStore::new(None, None);
        let err = store.fetch_prices().await.unwrap_err();
        assert!(matches!(err, ProductStoreError::NotConfigured));
    }

    #[test]
    fn test_records_become_price_items() {
        let json = r#"{
            "records": [
                {"id": "rec1", "fields": {"Name": "Photo scanning", "Price": 0.49, "Unit": "per photo"}},
                {"id": "rec2", "fields": {"Name": "Unpriced extra"}},
                {"id": "rec3", "fields": {"Name": "VHS transfer", "Price": 24.99}}
            ]
        }"#;
        let response: RecordsResponse = serde_json::from_str(json).unwrap();
        let prices = AirtableProductStore::to_price_list(response).unwrap();

        assert_eq!(prices.items.len(), 2);
        assert_eq!(prices.items[0].name, "Photo scanning");
        assert_eq!(prices.items[0].unit.as_deref(), Some("per photo"));
        assert!(prices.items[1].unit.is_none());
    }

    #[test]
    fn test_empty_records_are_malformed() {
        let response: RecordsResponse = serde_json::from_str(r#"{"records": []}"#).unwrap();
        let err = AirtableProductStore::to_price_list(response).unwrap_err();
        assert!(matches!(err, ProductStoreError::Malformed(_)));
    }
}
