use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchasable color/size combination of a product, as scraped from a
/// brand's product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Colorway label, e.g. `"White/Black"`. `"N/A"` when the page lists sizes
    /// but no color.
    pub color: String,
    /// Size label as shown by the brand, e.g. `"10"` or `"42 2/3"`.
    ///
    /// Serialized as `shoe_size`; the persistence service keys on that name.
    #[serde(rename = "shoe_size")]
    pub size: String,
    /// Brand-composed identifier, unique within one [`ScrapeResult`],
    /// e.g. `"IM6674-101-10"`.
    pub unique_identifier: String,
}

/// A single point-in-time price and stock reading for a product page.
///
/// Product pages expose only the current price; building a time series out of
/// successive observations is the persistence service's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Non-negative price in the page's currency. Serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub is_in_stock: bool,
}

/// Everything extracted from one product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// Never empty once produced by the extraction pipeline.
    pub variants: Vec<Variant>,
    /// Usually zero or one entry; catalog-only pages carry none.
    pub price_history: Vec<PriceObservation>,
    /// Absolute image URLs, deduplicated, in first-seen order.
    pub images: Vec<String>,
}

impl ScrapeResult {
    /// Returns the total number of variants.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Returns the first (current) price observation, if any.
    #[must_use]
    pub fn current_price(&self) -> Option<&PriceObservation> {
        self.price_history.first()
    }

    /// Returns `true` if any observation reports the product as in stock.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.price_history.iter().any(|p| p.is_in_stock)
    }
}
