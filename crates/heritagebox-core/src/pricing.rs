//! Product store boundary and the cached pricing lookup.
//!
//! Prices enrich the assistant's system prompt. The cache refreshes at
//! most every five minutes; a failed refresh serves the stale copy, and
//! the hardcoded fallback list covers the case where nothing was ever
//! fetched. A pricing outage must never fail a chat turn.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use heritagebox_types::error::ProductStoreError;
use heritagebox_types::pricing::PriceList;

/// Default refresh interval for the pricing block.
pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Trait for the product/pricing database.
///
/// The concrete implementation lives in heritagebox-infra
/// (`AirtableProductStore`).
pub trait ProductStore: Send + Sync {
    fn fetch_prices(
        &self,
    ) -> impl Future<Output = Result<PriceList, ProductStoreError>> + Send;
}

/// TTL cache in front of a [`ProductStore`].
pub struct PricingCache<P: ProductStore> {
    store: P,
    ttl: chrono::Duration,
    cached: RwLock<Option<PriceList>>,
}

impl<P: ProductStore> PricingCache<P> {
    pub fn new(store: P) -> Self {
        Self::with_ttl(store, PRICE_CACHE_TTL)
    }

    pub fn with_ttl(store: P, ttl: Duration) -> Self {
        Self {
            store,
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::minutes(5)),
            cached: RwLock::new(None),
        }
    }

    /// Current prices: fresh cache, else refresh, else stale cache, else
    /// the hardcoded fallback. Never fails.
    pub async fn current(&self) -> PriceList {
        {
            let cached = self.cached.read().await;
            if let Some(prices) = cached.as_ref() {
                if Utc::now() - prices.fetched_at < self.ttl {
                    return prices.clone();
                }
            }
        }

        match self.store.fetch_prices().await {
            Ok(mut prices) => {
                prices.fetched_at = Utc::now();
                debug!(items = prices.items.len(), "pricing refreshed");
                *self.cached.write().await = Some(prices.clone());
                prices
            }
            Err(err) => {
                let stale = self.cached.read().await.clone();
                match stale {
                    Some(prices) => {
                        warn!(error = %err, "pricing refresh failed, serving stale data");
                        prices
                    }
                    None => {
                        warn!(error = %err, "pricing refresh failed with empty cache, using fallback");
                        PriceList::fallback()
                    }
                }
            }
        }
    }
}
