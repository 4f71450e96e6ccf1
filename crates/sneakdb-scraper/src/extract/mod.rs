//! Field extractors.
//!
//! Each field (variants, prices, images) is located in two tiers: the
//! brand's structured data blocks first, then a direct markup scan. The
//! markup tier runs only when the structured tier yields nothing, so a page
//! never mixes candidates from both tiers for the same field.

mod images;
mod prices;
mod variants;

pub use images::ImageExtractor;
pub use prices::{interpret_availability, PriceCandidate, PriceExtractor, StockSignal};
pub use variants::{is_product_code, IdentifierScheme, SizeFormat, VariantCandidate, VariantExtractor};

use serde::Serialize;

use crate::structured::StructuredSource;

/// The page handed to every extractor.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub html: &'a str,
    /// Full page URL (or origin) the content was fetched from.
    pub page_url: &'a str,
}

/// Which tier produced a field's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Structured,
    Markup,
    /// Neither tier found anything.
    Missing,
}

/// Raw candidates for one field plus the tier they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    pub tier: Tier,
    pub candidates: Vec<T>,
}

/// Locates one field of a product page.
///
/// Implementors supply the two tiers; [`FieldExtractor::locate`] applies the
/// precedence rule. Both tiers must be pure functions of the page so that
/// extraction is idempotent and safe to run on several threads at once.
pub trait FieldExtractor: Send + Sync {
    type Candidate: Send;

    /// Candidates from structured data blocks (JSON-LD, state assignments).
    fn from_structured(&self, page: &Page<'_>) -> Vec<Self::Candidate>;

    /// Candidates from a direct markup scan.
    fn from_markup(&self, page: &Page<'_>) -> Vec<Self::Candidate>;

    fn locate(&self, page: &Page<'_>) -> Located<Self::Candidate> {
        let structured = self.from_structured(page);
        if !structured.is_empty() {
            return Located {
                tier: Tier::Structured,
                candidates: structured,
            };
        }

        let markup = self.from_markup(page);
        let tier = if markup.is_empty() {
            Tier::Missing
        } else {
            Tier::Markup
        };
        Located {
            tier,
            candidates: markup,
        }
    }
}

/// A brand's key names, selectors and wording.
///
/// Everything that differs between brand templates lives here; the
/// extractors themselves are shared.
#[derive(Debug)]
pub struct BrandVocabulary {
    pub structured: StructuredSource,

    // Structured tier. Keys may be dotted paths (`offers.price`).
    pub identifier_keys: &'static [&'static str],
    pub color_keys: &'static [&'static str],
    pub size_keys: &'static [&'static str],
    /// Keys read from object entries of a size list.
    pub size_object_keys: &'static [&'static str],
    /// Arrays of per-colorway objects.
    pub variant_list_keys: &'static [&'static str],
    pub variant_color_keys: &'static [&'static str],
    pub price_keys: &'static [&'static str],
    pub availability_keys: &'static [&'static str],
    pub image_keys: &'static [&'static str],
    /// Keys read from object entries of an image list.
    pub image_object_keys: &'static [&'static str],

    // Markup tier.
    pub color_labels: &'static [&'static str],
    pub style_labels: &'static [&'static str],
    pub color_selectors: &'static [&'static str],
    pub color_attrs: &'static [&'static str],
    pub size_selectors: &'static [&'static str],
    pub size_attrs: &'static [&'static str],
    pub price_selectors: &'static [&'static str],
    pub price_attrs: &'static [&'static str],
    pub stock_selectors: &'static [&'static str],
    pub stock_attrs: &'static [&'static str],
    /// Lowercase phrases that mark a product as unavailable.
    pub out_of_stock_phrases: &'static [&'static str],
    pub image_selectors: &'static [&'static str],
    pub image_attrs: &'static [&'static str],

    pub size_format: SizeFormat,
    pub identifiers: IdentifierScheme,
    /// Identifier root encoded in the brand's product URLs.
    pub url_identifier: fn(&str) -> Option<String>,
}

/// Flattens strings and numbers (or arrays of them) into text values.
pub(crate) fn text_values(value: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                vec![]
            } else {
                vec![s.to_string()]
            }
        }
        Value::Number(n) => vec![n.to_string()],
        Value::Array(items) => items.iter().flat_map(text_values).collect(),
        _ => vec![],
    }
}

/// Appends `value` unless an equal entry is already present.
pub(crate) fn push_unique(into: &mut Vec<String>, value: String) {
    if !into.contains(&value) {
        into.push(value);
    }
}
