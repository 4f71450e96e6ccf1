//! Turns located candidates into a validated [`ScrapeResult`].
//!
//! Every function here absorbs bad candidates (logging them at `debug`)
//! instead of failing; only [`validate`] can reject a result, and only for
//! invariants the earlier stages are supposed to guarantee.

use std::collections::HashSet;

use reqwest::Url;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use sneakdb_core::{PriceObservation, ScrapeResult, Variant};

use crate::brands::BrandParser;
use crate::extract::{PriceCandidate, VariantCandidate};
use crate::normalize::{absolutize, parse_price};
use crate::parse_helpers::collapse_whitespace;

/// Value used when a variant has a color but no size, or the reverse.
pub const NOT_APPLICABLE: &str = "N/A";

/// Color and size of the placeholder variant.
pub const UNKNOWN: &str = "unknown";

/// Hex digits of the page URL hash used in fallback identifiers.
const FALLBACK_HASH_LEN: usize = 12;

/// Cleans variant candidates and drops duplicate identifiers (first wins).
#[must_use]
pub fn normalize_variants(candidates: Vec<VariantCandidate>) -> Vec<Variant> {
    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let unique_identifier = collapse_whitespace(&candidate.unique_identifier);
        if unique_identifier.is_empty() {
            tracing::debug!("dropping variant candidate without identifier");
            continue;
        }
        if !seen.insert(unique_identifier.clone()) {
            tracing::debug!(%unique_identifier, "dropping duplicate variant");
            continue;
        }
        variants.push(Variant {
            color: clean_or_not_applicable(candidate.color.as_deref()),
            size: clean_or_not_applicable(candidate.size.as_deref()),
            unique_identifier,
        });
    }

    variants
}

fn clean_or_not_applicable(value: Option<&str>) -> String {
    let cleaned = value.map(collapse_whitespace).unwrap_or_default();
    if cleaned.is_empty() {
        NOT_APPLICABLE.to_string()
    } else {
        cleaned
    }
}

/// The placeholder variant for a page where no variant could be located.
///
/// Its identifier is the product code in the page URL when the brand's URL
/// pattern yields one, otherwise [`url_fallback_identifier`].
#[must_use]
pub fn fallback_variant(parser: &dyn BrandParser, page_url: &str) -> Variant {
    let unique_identifier = parser
        .url_identifier(page_url)
        .unwrap_or_else(|| url_fallback_identifier(page_url));
    Variant {
        color: UNKNOWN.to_string(),
        size: UNKNOWN.to_string(),
        unique_identifier,
    }
}

/// `url-` followed by the first 12 hex digits of SHA-256(page URL).
#[must_use]
pub fn url_fallback_identifier(page_url: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(page_url.trim().as_bytes()));
    format!("url-{}", &digest[..FALLBACK_HASH_LEN])
}

/// Parses price candidates and keeps the first one inside `[0, max_price]`.
///
/// A page carries one current price, so the history holds at most one
/// observation. Candidates without a parsable or plausible price are dropped;
/// an empty history is a valid outcome.
#[must_use]
pub fn normalize_prices(candidates: Vec<PriceCandidate>, max_price: Decimal) -> Vec<PriceObservation> {
    for candidate in candidates {
        let price = match parse_price(&candidate.raw_price) {
            Ok(price) => price,
            Err(e) => {
                tracing::debug!(error = %e, "dropping price candidate");
                continue;
            }
        };
        if price.is_sign_negative() || price > max_price {
            tracing::debug!(%price, %max_price, "dropping out-of-bounds price");
            continue;
        }
        return vec![PriceObservation {
            price,
            is_in_stock: candidate.stock.is_in_stock(),
        }];
    }
    vec![]
}

/// Absolutizes image candidates against `base_origin`, keeps `http(s)` URLs
/// only, drops duplicates and caps the list at `max_images`.
#[must_use]
pub fn normalize_images(candidates: Vec<String>, base_origin: &str, max_images: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for candidate in candidates {
        if images.len() >= max_images {
            tracing::debug!(max_images, "image cap reached");
            break;
        }
        let absolute = match absolutize(&candidate, base_origin) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, "dropping image candidate");
                continue;
            }
        };
        if !is_web_url(&absolute) {
            tracing::debug!(%candidate, "dropping non-http image");
            continue;
        }
        if seen.insert(absolute.clone()) {
            images.push(absolute);
        }
    }

    images
}

fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}

/// Checks the invariants of a finished result.
///
/// # Errors
///
/// Returns `Err` with a human-readable reason when the result has no
/// variants, repeats an identifier, carries an out-of-bounds price, or holds
/// an image that is not a unique absolute `http(s)` URL.
pub fn validate(result: &ScrapeResult, max_price: Decimal) -> Result<(), String> {
    if result.variants.is_empty() {
        return Err("result has no variants".to_string());
    }

    let mut ids = HashSet::new();
    for variant in &result.variants {
        if variant.unique_identifier.is_empty() {
            return Err("variant with empty identifier".to_string());
        }
        if !ids.insert(variant.unique_identifier.as_str()) {
            return Err(format!("duplicate variant identifier {}", variant.unique_identifier));
        }
    }

    for observation in &result.price_history {
        if observation.price.is_sign_negative() || observation.price > max_price {
            return Err(format!("price {} outside [0, {max_price}]", observation.price));
        }
    }

    let mut urls = HashSet::new();
    for image in &result.images {
        if !is_web_url(image) {
            return Err(format!("image {image} is not an absolute http(s) url"));
        }
        if !urls.insert(image.as_str()) {
            return Err(format!("duplicate image {image}"));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
