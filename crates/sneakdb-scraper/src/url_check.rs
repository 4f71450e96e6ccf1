//! Product URL checks run before a page is fetched.

use reqwest::Url;
use sneakdb_core::Brand;

use crate::error::UrlCheckError;

/// Parses `url` and requires an `http(s)` scheme and a host.
///
/// # Errors
///
/// Returns [`UrlCheckError::Invalid`] otherwise.
pub fn validate_url(url: &str) -> Result<Url, UrlCheckError> {
    let invalid = |reason: &str| UrlCheckError::Invalid {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if !parsed.host_str().is_some_and(|h| !h.is_empty()) {
        return Err(invalid("missing host"));
    }
    Ok(parsed)
}

/// The brand whose product-page pattern `url` follows.
///
/// Nike pages live under `nike.com/t/...`; Adidas pages end in `.html` on
/// `adidas.com`. Subdomains and country domains under the brand domain match.
#[must_use]
pub fn detect_brand(url: &Url) -> Option<Brand> {
    Brand::ALL.into_iter().find(|brand| is_product_page(url, *brand))
}

/// Validates `url` and checks that it is a product page of `brand`.
///
/// # Errors
///
/// Returns [`UrlCheckError::Invalid`] for malformed URLs and
/// [`UrlCheckError::BrandMismatch`] when the URL is not a `brand` product page.
pub fn check_product_url(url: &str, brand: Brand) -> Result<Url, UrlCheckError> {
    let parsed = validate_url(url)?;
    if is_product_page(&parsed, brand) {
        Ok(parsed)
    } else {
        Err(UrlCheckError::BrandMismatch {
            url: url.to_string(),
            brand: brand.to_string(),
        })
    }
}

/// Validates `url` and detects its brand.
///
/// # Errors
///
/// Returns [`UrlCheckError::Invalid`] for malformed URLs and
/// [`UrlCheckError::UnknownBrand`] when no supported brand matches.
pub fn resolve_brand(url: &str) -> Result<(Url, Brand), UrlCheckError> {
    let parsed = validate_url(url)?;
    match detect_brand(&parsed) {
        Some(brand) => Ok((parsed, brand)),
        None => Err(UrlCheckError::UnknownBrand {
            url: url.to_string(),
        }),
    }
}

fn is_product_page(url: &Url, brand: Brand) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let domain = brand.domain();
    let on_domain = host == domain || host.ends_with(&format!(".{domain}"));
    if !on_domain {
        return false;
    }

    let path = url.path();
    match brand {
        Brand::Nike => path.contains("/t/"),
        Brand::Adidas => path.to_ascii_lowercase().ends_with(".html"),
    }
}
