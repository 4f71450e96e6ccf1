//! Markup-scanning primitives shared by the fallback extraction tier.
//!
//! Brand vocabularies are plain selector and attribute lists; these helpers
//! turn them into element, attribute and text lookups. Selectors that fail to
//! parse are skipped so a bad vocabulary entry degrades a single lookup
//! instead of the whole page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// First price-looking token: either space-grouped thousands (`1 299,00`) or
/// a run of digits and separators.
static PRICE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:[ \u{a0}\u{202f}]\d{3})+(?:[.,]\d{1,2})?|\d[\d.,]*").expect("valid regex")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// Sizes with optional fractions: `8.5`, `42 2/3`, `42⅔`.
static FRACTIONAL_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)?(?:\s*(?:\d/\d|[½⅓⅔¼¾]))?").expect("valid regex")
});

static SRCSET_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s+").expect("valid regex"));

/// Elements whose text is never shown to a shopper.
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Selects every element matching any of `selectors`, in selector order,
/// without duplicates.
pub(crate) fn select_all<'a>(doc: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    let mut found: Vec<ElementRef<'a>> = Vec::new();

    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            tracing::debug!(selector = raw, "skipping unparsable selector");
            continue;
        };
        for element in doc.select(&selector) {
            if !found.iter().any(|seen| seen.id() == element.id()) {
                found.push(element);
            }
        }
    }

    found
}

/// Visible text of an element with whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// First non-empty value among `attrs` on `element`.
pub(crate) fn first_attr(element: &ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    attrs.iter().find_map(|name| {
        element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

/// Attribute value if present, otherwise the element's text.
pub(crate) fn attr_or_text(element: &ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    first_attr(element, attrs).or_else(|| {
        let text = element_text(element);
        (!text.is_empty()).then_some(text)
    })
}

/// Finds the value shown next to a label such as `Shown:` or `Product code`.
///
/// Matches `"Label: value"` inside one text node, or a text node that is
/// exactly the label followed by the value in the next node (`<dt>`/`<dd>`
/// pairs). Labels are tried in order and compared ASCII case-insensitively.
pub(crate) fn labelled_value(doc: &Html, labels: &[&str]) -> Option<String> {
    let texts = visible_text_nodes(doc);

    for label in labels {
        for (i, text) in texts.iter().enumerate() {
            match strip_label(text, label) {
                Some(value) if !value.is_empty() => return Some(value.to_string()),
                Some(_) => {
                    if let Some(next) = texts.get(i + 1) {
                        return Some(next.clone());
                    }
                }
                None => {}
            }
        }
    }

    None
}

/// `Some(rest)` when `text` starts with `label` followed by a colon or by
/// nothing at all.
fn strip_label<'t>(text: &'t str, label: &str) -> Option<&'t str> {
    let head = text.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = text[label.len()..].trim_start();
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix(':').map(str::trim)
}

fn visible_text_nodes(doc: &Html) -> Vec<String> {
    doc.root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent_hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name().to_ascii_lowercase()))
                .is_some_and(|name| HIDDEN_TEXT_PARENTS.contains(&name.as_str()));
            if parent_hidden {
                return None;
            }
            let collapsed = collapse_whitespace(text);
            (!collapsed.is_empty()).then_some(collapsed)
        })
        .collect()
}

/// First price-looking token in `text` (`"$145.00 $120.00"` → `"145.00"`).
pub(crate) fn first_price_token(text: &str) -> Option<String> {
    PRICE_TOKEN_RE.find(text).map(|m| m.as_str().to_string())
}

/// First plain number in `text` (`"M 9 / W 10.5"` → `"9"`).
pub(crate) fn first_number(text: &str) -> Option<String> {
    NUMBER_RE.find(text).map(|m| m.as_str().to_string())
}

/// First size with an optional fraction (`"UK 8 2/3"` → `"8 2/3"`).
pub(crate) fn first_fractional_size(text: &str) -> Option<String> {
    FRACTIONAL_SIZE_RE.find(text).map(|m| m.as_str().to_string())
}

/// Splits a `srcset`-style value into its URLs, dropping width and density
/// descriptors. A value without whitespace is a single URL, so commas inside
/// CDN transform segments (`f_auto,q_auto`) survive.
pub(crate) fn srcset_urls(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return vec![];
    }
    if !value.contains(char::is_whitespace) {
        return vec![value.to_string()];
    }

    SRCSET_SPLIT_RE
        .split(value)
        .filter_map(|part| part.split_whitespace().next())
        .map(|url| url.trim_end_matches(',').to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
