//! Pricing data used to enrich the assistant's system prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One priced digitization service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    pub name: String,
    /// US dollars, major units.
    pub price: f64,
    /// e.g. "per photo", "per tape".
    pub unit: Option<String>,
}

/// Current service prices, with the fetch time for staleness decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceList {
    pub items: Vec<PriceItem>,
    pub fetched_at: DateTime<Utc>,
}

impl PriceList {
    /// Hardcoded prices used when the product store has never answered.
    pub fn fallback() -> Self {
        let item = |name: &str, price: f64, unit: &str| PriceItem {
            name: name.to_string(),
            price,
            unit: Some(unit.to_string()),
        };
        Self {
            items: vec![
                item("Photo scanning", 0.49, "per photo"),
                item("Slide & negative scanning", 0.69, "per slide"),
                item("VHS / camcorder tape transfer", 24.99, "per tape"),
                item("Film reel transfer (8mm/16mm)", 29.99, "per 50ft reel"),
                item("Audio cassette transfer", 19.99, "per cassette"),
                item("Rush service", 49.99, "per order"),
            ],
            fetched_at: Utc::now(),
        }
    }

    /// Render the pricing block appended to the system prompt.
    pub fn render_prompt_block(&self) -> String {
        let mut block = String::from("Current HeritageBox pricing:\n");
        for item in &self.items {
            let unit = item.unit.as_deref().unwrap_or("each");
            block.push_str(&format!("- {}: ${:.2} {}\n", item.name, item.price, unit));
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_nonempty() {
        let prices = PriceList::fallback();
        assert!(!prices.items.is_empty());
    }

    #[test]
    fn test_render_prompt_block() {
        let prices = PriceList {
            items: vec![PriceItem {
                name: "Photo scanning".to_string(),
                price: 0.5,
                unit: Some("per photo".to_string()),
            }],
            fetched_at: Utc::now(),
        };
        let block = prices.render_prompt_block();
        assert!(block.contains("Photo scanning: $0.50 per photo"));
    }
}
