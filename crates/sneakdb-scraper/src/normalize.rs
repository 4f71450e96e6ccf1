//! Pure normalization helpers: URL absolutization and price parsing.
//!
//! Nothing here logs or allocates beyond the returned value; the aggregator
//! decides what to do with failures (they are always field-local).

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use rust_decimal::Decimal;

use crate::error::NormalizeError;

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid scheme regex"));

/// Resolves a possibly relative image or link URL against `base_origin`.
///
/// - a candidate that already carries a scheme is returned as-is (trimmed);
/// - `//host/path` gets the base origin's scheme prefixed;
/// - anything else is resolved against the base origin's root, so `a.jpg`
///   and `/a.jpg` both become `{origin}/a.jpg`.
///
/// Tabs and newlines inside the candidate are stripped first, matching how
/// browsers read attribute values that were wrapped by a templating engine.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedUrl`] when the candidate is empty, is
/// only a fragment or query, is protocol-relative without a host, or when the
/// base origin itself cannot be parsed.
pub fn absolutize(candidate: &str, base_origin: &str) -> Result<String, NormalizeError> {
    let malformed = |reason: &str| NormalizeError::MalformedUrl {
        candidate: candidate.to_string(),
        reason: reason.to_string(),
    };

    let cleaned: String = candidate
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();

    if cleaned.is_empty() {
        return Err(malformed("empty after trimming"));
    }
    if cleaned.starts_with('#') || cleaned.starts_with('?') {
        return Err(malformed("no resolvable path"));
    }
    if SCHEME_RE.is_match(&cleaned) {
        return Ok(cleaned);
    }

    let base = Url::parse(base_origin.trim()).map_err(|e| malformed(&format!("base origin: {e}")))?;

    if let Some(rest) = cleaned.strip_prefix("//") {
        if rest.is_empty() || rest.starts_with('/') {
            return Err(malformed("protocol-relative url without host"));
        }
        return Ok(format!("{}:{cleaned}", base.scheme()));
    }

    let origin = base.origin();
    if !origin.is_tuple() {
        return Err(malformed("base has no origin"));
    }
    let root = Url::parse(&origin.ascii_serialization())
        .map_err(|e| malformed(&format!("base origin: {e}")))?;
    root.join(&cleaned)
        .map(|u| u.to_string())
        .map_err(|e| malformed(&e.to_string()))
}

/// Parses a currency-decorated price string into a non-negative decimal.
///
/// Everything except ASCII digits, `.` and `,` is discarded (currency
/// symbols, ISO codes, whitespace, minus signs). The remaining separators are
/// read with this locale rule:
///
/// - both `.` and `,` present: the right-most one is the decimal separator,
///   the other groups thousands (`"1.299,00 €"` → `1299.00`,
///   `"$1,299.00"` → `1299.00`);
/// - only one kind of separator: a decimal separator when it occurs once and
///   is followed by one or two digits (`"89,95"` → `89.95`, `"145.00"` →
///   `145.00`), otherwise thousands (`"1,299"` and `"1.299"` → `1299`,
///   `"1.299.000"` → `1299000`).
///
/// # Errors
///
/// Returns [`NormalizeError::UnparsablePrice`] when no digit remains or the
/// digits do not fit a decimal.
pub fn parse_price(raw: &str) -> Result<Decimal, NormalizeError> {
    let unparsable = || NormalizeError::UnparsablePrice {
        raw: raw.to_string(),
    };

    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
        .collect();
    let kept = kept.trim_matches(|c| matches!(c, '.' | ','));

    if !kept.bytes().any(|b| b.is_ascii_digit()) {
        return Err(unparsable());
    }

    Decimal::from_str(&canonical_decimal(kept)).map_err(|_| unparsable())
}

/// Derives the `scheme://host[:port]` origin from a page URL or origin string.
///
/// Returns `None` for unparsable input and for URLs without a tuple origin
/// (`data:`, `file:`).
#[must_use]
pub fn extract_origin(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url.trim()).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Rewrites `s` (digits and separators only, no leading/trailing separator)
/// into a `.`-decimal string without grouping.
fn canonical_decimal(s: &str) -> String {
    let digits_only = |part: &str| -> String { part.chars().filter(char::is_ascii_digit).collect() };

    match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let decimal_pos = dot.max(comma);
            let int_part = digits_only(&s[..decimal_pos]);
            let frac_part = digits_only(&s[decimal_pos + 1..]);
            format!("{int_part}.{frac_part}")
        }
        (None, Some(pos)) => single_separator(s, ',', pos),
        (Some(pos), None) => single_separator(s, '.', pos),
        (None, None) => s.to_string(),
    }
}

fn single_separator(s: &str, sep: char, last_pos: usize) -> String {
    let occurrences = s.matches(sep).count();
    let frac_len = s.len() - last_pos - 1;
    if occurrences == 1 && (1..=2).contains(&frac_len) {
        s.replacen(sep, ".", 1)
    } else {
        s.chars().filter(|&c| c != sep).collect()
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
