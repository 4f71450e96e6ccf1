use scraper::Html;
use serde_json::Value;

use super::{push_unique, BrandVocabulary, FieldExtractor, Page};
use crate::parse_helpers::{select_all, srcset_urls};
use crate::structured::{first_non_empty, locate_blocks, lookup_path, product_scopes};

/// Product gallery image URLs, as written on the page (possibly relative).
#[derive(Debug, Clone, Copy)]
pub struct ImageExtractor {
    vocab: &'static BrandVocabulary,
}

impl ImageExtractor {
    #[must_use]
    pub const fn new(vocab: &'static BrandVocabulary) -> Self {
        Self { vocab }
    }

    fn read_node(&self, node: &Value) -> Vec<String> {
        let mut urls = Vec::new();
        for scope in product_scopes(node) {
            for key in self.vocab.image_keys {
                if let Some(value) = lookup_path(scope, key) {
                    self.collect_urls(value, &mut urls, 0);
                }
            }
        }
        urls
    }

    /// Strings are URLs; objects contribute their first URL-bearing key;
    /// arrays are walked one level deep (plus the object level).
    fn collect_urls(&self, value: &Value, urls: &mut Vec<String>, depth: usize) {
        match value {
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    push_unique(urls, s.to_string());
                }
            }
            Value::Object(map) => {
                let url = self
                    .vocab
                    .image_object_keys
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str))
                    .map(str::trim)
                    .filter(|u| !u.is_empty());
                if let Some(url) = url {
                    push_unique(urls, url.to_string());
                }
            }
            Value::Array(items) if depth == 0 => {
                for item in items {
                    self.collect_urls(item, urls, depth + 1);
                }
            }
            _ => {}
        }
    }
}

impl FieldExtractor for ImageExtractor {
    type Candidate = String;

    fn from_structured(&self, page: &Page<'_>) -> Vec<String> {
        let nodes = locate_blocks(page.html, &self.vocab.structured);
        first_non_empty(&nodes, |node| self.read_node(node))
    }

    fn from_markup(&self, page: &Page<'_>) -> Vec<String> {
        let doc = Html::parse_document(page.html);
        let mut urls = Vec::new();

        for element in select_all(&doc, self.vocab.image_selectors) {
            for attr in self.vocab.image_attrs {
                let Some(value) = element.value().attr(attr) else {
                    continue;
                };
                for url in srcset_urls(value) {
                    push_unique(&mut urls, url);
                }
            }
        }

        urls
    }
}
