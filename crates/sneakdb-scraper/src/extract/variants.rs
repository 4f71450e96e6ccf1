use scraper::Html;
use serde_json::Value;

use super::{push_unique, text_values, BrandVocabulary, FieldExtractor, Page};
use crate::parse_helpers::{
    attr_or_text, collapse_whitespace, first_fractional_size, first_number, labelled_value,
    select_all,
};
use crate::structured::{first_non_empty, locate_blocks, lookup_path, product_scopes};

/// Longest text accepted as a size label.
const MAX_SIZE_LEN: usize = 24;

/// A variant as found on the page, before whitespace cleanup and dedupe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCandidate {
    pub color: Option<String>,
    pub size: Option<String>,
    pub unique_identifier: String,
}

/// How a brand prints sizes on its size chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFormat {
    /// First plain number (`"M 9 / W 10.5"` → `"9"`).
    LeadingNumber,
    /// Number with an optional fraction (`"UK 8 2/3"` → `"8 2/3"`).
    Fractional,
}

impl SizeFormat {
    fn normalize(self, raw: &str) -> Option<String> {
        let raw = collapse_whitespace(raw);
        if raw.is_empty() || raw.len() > MAX_SIZE_LEN {
            return None;
        }
        let token = match self {
            Self::LeadingNumber => first_number(&raw),
            Self::Fractional => first_fractional_size(&raw),
        };
        Some(token.unwrap_or(raw))
    }
}

/// How a brand joins identifier root, colorway and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierScheme {
    /// Placed between the root (or colorway) and the size.
    pub size_separator: &'static str,
}

impl IdentifierScheme {
    /// Joins the available parts; whitespace inside a size becomes `-`.
    #[must_use]
    pub fn compose(&self, root: Option<&str>, color_slug: Option<&str>, size: Option<&str>) -> String {
        let mut id = root.unwrap_or_default().to_string();
        if let Some(color) = color_slug.filter(|c| !c.is_empty()) {
            if !id.is_empty() {
                id.push('-');
            }
            id.push_str(color);
        }
        if let Some(size) = size {
            let size = size.split_whitespace().collect::<Vec<_>>().join("-");
            if !id.is_empty() {
                id.push_str(self.size_separator);
            }
            id.push_str(&size);
        }
        id
    }
}

/// `true` for style/article codes such as `IM6674-101` or `KJ1363`.
#[must_use]
pub fn is_product_code(s: &str) -> bool {
    !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

/// Variants from a brand's color and size data.
#[derive(Debug, Clone, Copy)]
pub struct VariantExtractor {
    vocab: &'static BrandVocabulary,
}

impl VariantExtractor {
    #[must_use]
    pub const fn new(vocab: &'static BrandVocabulary) -> Self {
        Self { vocab }
    }

    fn read_node(&self, node: &Value, page_url: &str) -> Vec<VariantCandidate> {
        let vocab = self.vocab;
        let scopes = product_scopes(node);

        let root = scopes
            .iter()
            .flat_map(|scope| vocab.identifier_keys.iter().filter_map(move |k| lookup_path(scope, k)))
            .flat_map(text_values)
            .map(|v| v.to_ascii_uppercase())
            .find(|v| is_product_code(v))
            .or_else(|| (vocab.url_identifier)(page_url));

        let mut colors = Vec::new();
        for scope in &scopes {
            for key in vocab.color_keys {
                if let Some(value) = lookup_path(scope, key) {
                    for color in text_values(value) {
                        push_unique(&mut colors, collapse_whitespace(&color));
                    }
                }
            }
            for key in vocab.variant_list_keys {
                let Some(Value::Array(entries)) = lookup_path(scope, key) else {
                    continue;
                };
                for entry in entries {
                    for color_key in vocab.variant_color_keys {
                        for color in entry.get(*color_key).map(text_values).unwrap_or_default() {
                            push_unique(&mut colors, collapse_whitespace(&color));
                        }
                    }
                }
            }
        }

        let mut sizes = Vec::new();
        for scope in &scopes {
            for key in vocab.size_keys {
                let Some(value) = lookup_path(scope, key) else {
                    continue;
                };
                for raw in self.size_labels(value) {
                    if let Some(size) = vocab.size_format.normalize(&raw) {
                        push_unique(&mut sizes, size);
                    }
                }
            }
        }

        compose_variants(vocab.identifiers, root.as_deref(), &colors, &sizes)
    }

    fn size_labels(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Array(entries) => entries
                .iter()
                .flat_map(|entry| match entry {
                    Value::Object(_) => self
                        .vocab
                        .size_object_keys
                        .iter()
                        .find_map(|k| entry.get(*k).map(text_values).filter(|v| !v.is_empty()))
                        .unwrap_or_default(),
                    other => text_values(other),
                })
                .collect(),
            other => text_values(other),
        }
    }
}

impl FieldExtractor for VariantExtractor {
    type Candidate = VariantCandidate;

    fn from_structured(&self, page: &Page<'_>) -> Vec<VariantCandidate> {
        let nodes = locate_blocks(page.html, &self.vocab.structured);
        first_non_empty(&nodes, |node| self.read_node(node, page.page_url))
    }

    fn from_markup(&self, page: &Page<'_>) -> Vec<VariantCandidate> {
        let vocab = self.vocab;
        let doc = Html::parse_document(page.html);

        let root = labelled_value(&doc, vocab.style_labels)
            .and_then(|v| v.split_whitespace().next().map(str::to_ascii_uppercase))
            .filter(|v| is_product_code(v))
            .or_else(|| (vocab.url_identifier)(page.page_url));

        let mut colors = Vec::new();
        if let Some(shown) = labelled_value(&doc, vocab.color_labels) {
            push_unique(&mut colors, shown);
        }
        for chip in select_all(&doc, vocab.color_selectors) {
            if let Some(color) = attr_or_text(&chip, vocab.color_attrs).filter(|c| c.chars().count() > 1) {
                push_unique(&mut colors, color);
            }
        }

        let mut sizes = Vec::new();
        for chip in select_all(&doc, vocab.size_selectors) {
            if let Some(size) = attr_or_text(&chip, vocab.size_attrs).and_then(|raw| vocab.size_format.normalize(&raw)) {
                push_unique(&mut sizes, size);
            }
        }

        compose_variants(vocab.identifiers, root.as_deref(), &colors, &sizes)
    }
}

/// Builds one candidate per (color, size) pair.
///
/// A page with colors but no sizes yields one candidate per color, and the
/// reverse. The colorway slug enters the identifier when more than one color
/// is present or when there is no root to anchor on.
pub(crate) fn compose_variants(
    scheme: IdentifierScheme,
    root: Option<&str>,
    colors: &[String],
    sizes: &[String],
) -> Vec<VariantCandidate> {
    let slug_in_id = colors.len() > 1 || root.is_none();
    let color_slug = |color: &str| slug_in_id.then(|| slugify(color));

    let mut out = Vec::new();
    match (colors.is_empty(), sizes.is_empty()) {
        (true, true) => {}
        (false, true) => {
            for color in colors {
                out.push(VariantCandidate {
                    color: Some(color.clone()),
                    size: None,
                    unique_identifier: scheme.compose(root, color_slug(color).as_deref(), None),
                });
            }
        }
        (true, false) => {
            for size in sizes {
                out.push(VariantCandidate {
                    color: None,
                    size: Some(size.clone()),
                    unique_identifier: scheme.compose(root, None, Some(size)),
                });
            }
        }
        (false, false) => {
            for color in colors {
                for size in sizes {
                    out.push(VariantCandidate {
                        color: Some(color.clone()),
                        size: Some(size.clone()),
                        unique_identifier: scheme.compose(root, color_slug(color).as_deref(), Some(size)),
                    });
                }
            }
        }
    }
    out
}

/// Lowercase ASCII slug: `"White/Black"` → `"white-black"`.
pub(crate) fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
