//! Discovery of machine-readable product blocks embedded in a page.
//!
//! Brand templates ship product data in several shapes: schema.org JSON-LD,
//! `window.__STATE__ = {...}` assignments, `<script type="application/json">`
//! payloads, `data-product='{...}'` attributes and bare `"product": {...}`
//! objects inside inline scripts. Each brand declares which
//! of these it uses ([`BlockMarker`]) and which keys identify a product node
//! inside a larger state tree ([`StructuredSource::anchor_keys`]).

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSONLD_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

static STATE_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*").expect("valid regex")
});

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").expect("valid regex"));

/// `id` attribute inside a tag's attribute list; `data-id` does not match.
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*["']([^"']*)["']"#).expect("valid regex")
});

static DATA_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bdata-([a-z0-9_-]+)\s*=\s*(?:'([^']*)'|"([^"]*)")"#).expect("valid regex")
});

/// Deepest level searched for a product node inside a state tree.
const MAX_ANCHOR_DEPTH: usize = 12;

/// Where a brand embeds structured product data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMarker {
    /// `<script type="application/ld+json">` items whose `@type` is
    /// `Product` or `ProductGroup`.
    JsonLdProduct,
    /// `window.NAME = {...};` inside an inline script.
    StateAssignment(&'static str),
    /// `<script id="NAME" type="application/json">{...}</script>`.
    JsonScript(&'static str),
    /// `data-NAME='{...}'` on any element.
    DataAttribute(&'static str),
    /// `"NAME": {...}` anywhere inside an inline script. The object is taken
    /// as a product node as-is.
    InlineObject(&'static str),
}

/// A brand's structured-data location rules.
#[derive(Debug, Clone, Copy)]
pub struct StructuredSource {
    pub markers: &'static [BlockMarker],
    /// Keys whose presence marks an object as a product node.
    pub anchor_keys: &'static [&'static str],
}

/// Returns every product node found in `html`, in document/marker order.
///
/// Malformed JSON is skipped silently: a template may carry a truncated or
/// templated-out block next to a valid one.
pub(crate) fn locate_blocks(html: &str, source: &StructuredSource) -> Vec<Value> {
    let mut nodes = Vec::new();

    for marker in source.markers {
        match marker {
            BlockMarker::JsonLdProduct => nodes.extend(jsonld_products(html)),
            BlockMarker::StateAssignment(name) => {
                for value in state_assignments(html, name) {
                    nodes.extend(anchored_nodes(&value, source.anchor_keys));
                }
            }
            BlockMarker::JsonScript(id) => {
                for value in json_scripts(html, id) {
                    nodes.extend(anchored_nodes(&value, source.anchor_keys));
                }
            }
            BlockMarker::DataAttribute(name) => {
                for value in data_attributes(html, name) {
                    nodes.extend(anchored_nodes(&value, source.anchor_keys));
                }
            }
            BlockMarker::InlineObject(key) => nodes.extend(inline_objects(html, key)),
        }
    }

    tracing::trace!(count = nodes.len(), "located structured product nodes");
    nodes
}

/// Applies `read` to each node in order and returns the first non-empty
/// result.
pub(crate) fn first_non_empty<T>(nodes: &[Value], read: impl Fn(&Value) -> Vec<T>) -> Vec<T> {
    nodes
        .iter()
        .map(read)
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Resolves a dotted key path (`"offers.price"`). Arrays met along the way
/// resolve to their first element, which is how schema.org `offers` lists
/// are read.
pub(crate) fn lookup_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = value;
    for segment in path.split('.') {
        if let Value::Array(items) = current {
            current = items.first()?;
        }
        current = current.get(segment)?;
    }
    Some(current)
}

/// The node itself plus its nested `product` object, which several templates
/// use to split page chrome from product fields.
pub(crate) fn product_scopes(node: &Value) -> Vec<&Value> {
    let mut scopes = vec![node];
    if let Some(product) = node.get("product").filter(|p| p.is_object()) {
        scopes.push(product);
    }
    scopes
}

fn jsonld_products(html: &str) -> Vec<Value> {
    let mut results = Vec::new();

    for cap in JSONLD_SCRIPT_RE.captures_iter(html) {
        let Some(json_text) = cap.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(json_text) else {
            continue;
        };

        let mut candidates: Vec<Value> = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        // Many sites wrap structured data inside {"@graph": [...]}.
        let expanded: Vec<Value> = candidates
            .iter()
            .filter_map(|item| item.get("@graph").and_then(Value::as_array))
            .flatten()
            .cloned()
            .collect();
        candidates.extend(expanded);

        results.extend(candidates.into_iter().filter(is_product_type));
    }

    results
}

/// `@type` may be a plain string or an array of strings.
fn is_product_type(item: &Value) -> bool {
    let accepted = |s: &str| s.eq_ignore_ascii_case("Product") || s.eq_ignore_ascii_case("ProductGroup");
    match item.get("@type") {
        Some(Value::String(s)) => accepted(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(accepted),
        _ => false,
    }
}

fn state_assignments(html: &str, name: &str) -> Vec<Value> {
    STATE_ASSIGNMENT_RE
        .captures_iter(html)
        .filter(|cap| cap.get(1).is_some_and(|m| m.as_str() == name))
        .filter_map(|cap| cap.get(0))
        .filter_map(|m| extract_balanced_json(&html[m.end()..]))
        .filter_map(|raw| serde_json::from_str(raw).ok())
        .collect()
}

fn json_scripts(html: &str, id: &str) -> Vec<Value> {
    SCRIPT_RE
        .captures_iter(html)
        .filter(|cap| {
            cap.get(1)
                .and_then(|attrs| ID_ATTR_RE.captures(attrs.as_str()))
                .and_then(|id_cap| id_cap.get(1))
                .is_some_and(|m| m.as_str() == id)
        })
        .filter_map(|cap| cap.get(2))
        .filter_map(|m| serde_json::from_str(m.as_str().trim()).ok())
        .collect()
}

fn data_attributes(html: &str, name: &str) -> Vec<Value> {
    DATA_ATTR_RE
        .captures_iter(html)
        .filter(|cap| cap.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case(name)))
        .filter_map(|cap| cap.get(2).or_else(|| cap.get(3)))
        .map(|m| decode_attr_entities(m.as_str()))
        .filter_map(|raw| serde_json::from_str(raw.trim()).ok())
        .collect()
}

fn inline_objects(html: &str, key: &str) -> Vec<Value> {
    let quoted = format!("\"{key}\"");
    let mut found = Vec::new();

    for body in SCRIPT_RE.captures_iter(html).filter_map(|cap| cap.get(2)) {
        let body = body.as_str();
        for (pos, _) in body.match_indices(&quoted) {
            let Some(rest) = body[pos + quoted.len()..].trim_start().strip_prefix(':') else {
                continue;
            };
            if !rest.trim_start().starts_with('{') {
                continue;
            }
            let parsed = extract_balanced_json(rest).and_then(|raw| serde_json::from_str::<Value>(raw).ok());
            if let Some(value) = parsed {
                found.push(value);
            }
        }
    }

    found
}

/// Attribute-embedded JSON is usually entity-escaped (`&quot;`).
fn decode_attr_entities(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Breadth-first search for objects carrying any anchor key. A matching
/// object is returned whole and not descended into.
fn anchored_nodes(root: &Value, anchor_keys: &[&str]) -> Vec<Value> {
    let mut found = Vec::new();
    let mut queue: VecDeque<(&Value, usize)> = VecDeque::from([(root, 0)]);

    while let Some((value, depth)) = queue.pop_front() {
        match value {
            Value::Object(map) => {
                if anchor_keys.iter().any(|k| map.contains_key(*k)) {
                    found.push(value.clone());
                    continue;
                }
                if depth < MAX_ANCHOR_DEPTH {
                    queue.extend(map.values().map(|v| (v, depth + 1)));
                }
            }
            Value::Array(items) if depth < MAX_ANCHOR_DEPTH => {
                queue.extend(items.iter().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }

    found
}

/// Extracts a balanced JSON object or array from the start of `s`
/// (leading whitespace allowed).
///
/// Tracks bracket nesting with a stack, respecting string literals and escape
/// sequences, so `{"a": "}"}` is delimited correctly. Mismatched closers such
/// as `[42}` yield `None`.
pub(crate) fn extract_balanced_json(s: &str) -> Option<&str> {
    let s = s.trim_start();
    if !(s.starts_with('{') || s.starts_with('[')) {
        return None;
    }

    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
