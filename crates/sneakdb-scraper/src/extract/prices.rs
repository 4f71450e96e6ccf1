use scraper::Html;
use serde_json::Value;

use super::{BrandVocabulary, FieldExtractor, Page};
use crate::parse_helpers::{attr_or_text, element_text, first_attr, first_price_token, select_all};
use crate::structured::{first_non_empty, locate_blocks, lookup_path, product_scopes};

/// A price as printed on the page, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCandidate {
    pub raw_price: String,
    pub stock: StockSignal,
}

/// What the page says about availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSignal {
    InStock,
    OutOfStock,
    /// No availability marker; a listed price counts as purchasable.
    Unknown,
}

impl StockSignal {
    #[must_use]
    pub fn is_in_stock(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }
}

/// Reads an availability value: booleans directly, strings such as
/// `https://schema.org/InStock` or `"SOLD_OUT"` by keyword.
#[must_use]
pub fn interpret_availability(value: &Value) -> StockSignal {
    match value {
        Value::Bool(true) => StockSignal::InStock,
        Value::Bool(false) => StockSignal::OutOfStock,
        Value::String(s) => availability_from_text(s),
        _ => StockSignal::Unknown,
    }
}

fn availability_from_text(s: &str) -> StockSignal {
    // "unavailable" contains "available", so negatives are checked first.
    const OUT: &[&str] = &["outofstock", "soldout", "unavailable", "discontinued", "notavailable"];
    const IN: &[&str] = &["instock", "available", "limitedavailability", "preorder", "onlineonly"];

    let squashed: String = s
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if OUT.iter().any(|k| squashed.contains(k)) {
        StockSignal::OutOfStock
    } else if IN.iter().any(|k| squashed.contains(k)) {
        StockSignal::InStock
    } else {
        StockSignal::Unknown
    }
}

/// The current price and availability.
#[derive(Debug, Clone, Copy)]
pub struct PriceExtractor {
    vocab: &'static BrandVocabulary,
}

impl PriceExtractor {
    #[must_use]
    pub const fn new(vocab: &'static BrandVocabulary) -> Self {
        Self { vocab }
    }

    fn read_node(&self, node: &Value) -> Vec<PriceCandidate> {
        let scopes = product_scopes(node);

        let raw_price = scopes.iter().find_map(|scope| {
            self.vocab.price_keys.iter().find_map(|key| match lookup_path(scope, key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        });
        let Some(raw_price) = raw_price else {
            return vec![];
        };

        let stock = scopes
            .iter()
            .flat_map(|scope| {
                self.vocab
                    .availability_keys
                    .iter()
                    .filter_map(move |key| lookup_path(scope, key))
            })
            .map(interpret_availability)
            .find(|signal| *signal != StockSignal::Unknown)
            .unwrap_or(StockSignal::Unknown);

        vec![PriceCandidate { raw_price, stock }]
    }

    fn markup_stock(&self, doc: &Html) -> StockSignal {
        for element in select_all(doc, self.vocab.stock_selectors) {
            if let Some(marker) = first_attr(&element, self.vocab.stock_attrs) {
                let signal = availability_from_text(&marker);
                if signal != StockSignal::Unknown {
                    return signal;
                }
            }
            let text = element_text(&element).to_lowercase();
            if self.vocab.out_of_stock_phrases.iter().any(|p| text.contains(p)) {
                return StockSignal::OutOfStock;
            }
        }
        StockSignal::Unknown
    }
}

impl FieldExtractor for PriceExtractor {
    type Candidate = PriceCandidate;

    fn from_structured(&self, page: &Page<'_>) -> Vec<PriceCandidate> {
        let nodes = locate_blocks(page.html, &self.vocab.structured);
        first_non_empty(&nodes, |node| self.read_node(node))
    }

    fn from_markup(&self, page: &Page<'_>) -> Vec<PriceCandidate> {
        let doc = Html::parse_document(page.html);

        let raw_price = select_all(&doc, self.vocab.price_selectors)
            .iter()
            .filter_map(|element| attr_or_text(element, self.vocab.price_attrs))
            .find_map(|text| first_price_token(&text));

        match raw_price {
            Some(raw_price) => vec![PriceCandidate {
                raw_price,
                stock: self.markup_stock(&doc),
            }],
            None => vec![],
        }
    }
}
