use reqwest::Url;
use sneakdb_core::Brand;

use super::BrandParser;
use crate::extract::{
    is_product_code, BrandVocabulary, FieldExtractor, IdentifierScheme, ImageExtractor,
    PriceCandidate, PriceExtractor, SizeFormat, VariantCandidate, VariantExtractor,
};
use crate::structured::{BlockMarker, StructuredSource};

static VOCABULARY: BrandVocabulary = BrandVocabulary {
    structured: StructuredSource {
        markers: &[
            BlockMarker::JsonScript("__NEXT_DATA__"),
            BlockMarker::StateAssignment("__NEXT_DATA__"),
            BlockMarker::StateAssignment("__INITIAL_STATE__"),
            BlockMarker::JsonLdProduct,
            BlockMarker::InlineObject("product"),
        ],
        anchor_keys: &["styleColor", "style", "colorway", "colorDescription", "sizes", "skus"],
    },

    identifier_keys: &["styleColor", "style", "sku", "productID", "mpn"],
    color_keys: &["colorway", "colorDescription", "color", "colors", "itemListElement.item.color"],
    size_keys: &["sizes", "availableSizes", "skus"],
    size_object_keys: &["nikeSize", "localizedSize", "label", "size", "value"],
    variant_list_keys: &["variants", "colorways"],
    variant_color_keys: &["colorDescription", "colorway", "color", "colorName"],
    price_keys: &[
        "currentPrice",
        "price",
        "prices.currentPrice",
        "offers.price",
        "offers.lowPrice",
        "fullPrice",
    ],
    availability_keys: &["availability", "offers.availability", "inStock", "available"],
    image_keys: &["images", "image", "imageUrls"],
    image_object_keys: &["url", "src", "image", "href", "squarishURL", "portraitURL"],

    color_labels: &["Shown"],
    style_labels: &["Style"],
    color_selectors: &[
        r#"button[data-testid*="color"]"#,
        r#"[data-testid*="colorway"] a"#,
        ".color-selector button",
        r#"[aria-label*="color"]"#,
        "[data-color]",
        ".color-swatch",
    ],
    color_attrs: &["data-color", "title", "aria-label"],
    size_selectors: &[
        r#"button[data-testid*="size"]"#,
        r#"[data-testid*="size"] label"#,
        ".size-selector button",
        r#"button[aria-label*="size"]"#,
        r#"input[name="skuAndSize"] + label"#,
        "[data-size]",
        ".size-option",
    ],
    size_attrs: &["data-size", "data-value"],
    price_selectors: &[
        r#"[data-testid="currentPrice-container"]"#,
        r#"[data-test="product-price"]"#,
        r#"[data-testid*="price"]"#,
        ".product-price",
        ".price",
        r#"[itemprop="price"]"#,
        r#"[class*="price"]"#,
    ],
    price_attrs: &["content", "data-price"],
    stock_selectors: &[
        r#"[itemprop="availability"]"#,
        r#"[data-testid*="availability"]"#,
        r#"[data-testid*="stock"]"#,
        ".stock-status",
        r#"[aria-label*="stock"]"#,
        r#"button[data-testid*="add-to-cart"]"#,
        r#"[class*="availability"]"#,
    ],
    stock_attrs: &["content", "href"],
    out_of_stock_phrases: &["out of stock", "unavailable", "sold out"],
    image_selectors: &[
        r#"img[data-testid*="image"]"#,
        r#"img[data-testid*="product"]"#,
        ".product-image img",
        ".gallery img",
        "[data-image]",
        r#"img[src*="static.nike.com"]"#,
        "picture source",
        "picture img",
        r#"meta[property="og:image"]"#,
    ],
    image_attrs: &["src", "srcset", "data-src", "data-image", "data-lazy-src", "content"],

    size_format: SizeFormat::LeadingNumber,
    identifiers: IdentifierScheme { size_separator: "-" },
    url_identifier: style_code_from_url,
};

static VARIANTS: VariantExtractor = VariantExtractor::new(&VOCABULARY);
static PRICES: PriceExtractor = PriceExtractor::new(&VOCABULARY);
static IMAGES: ImageExtractor = ImageExtractor::new(&VOCABULARY);

/// Nike product pages (`nike.com/t/{slug}/{STYLE-COLOR}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NikeParser;

impl BrandParser for NikeParser {
    fn brand(&self) -> Brand {
        Brand::Nike
    }

    fn variant_extractor(&self) -> &dyn FieldExtractor<Candidate = VariantCandidate> {
        &VARIANTS
    }

    fn price_extractor(&self) -> &dyn FieldExtractor<Candidate = PriceCandidate> {
        &PRICES
    }

    fn image_extractor(&self) -> &dyn FieldExtractor<Candidate = String> {
        &IMAGES
    }

    fn url_identifier(&self, page_url: &str) -> Option<String> {
        style_code_from_url(page_url)
    }
}

/// `https://www.nike.com/t/pegasus-41/IM6674-101` → `IM6674-101`.
fn style_code_from_url(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url.trim()).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let t_pos = segments.iter().position(|s| *s == "t")?;
    let after = &segments[t_pos + 1..];
    if after.len() < 2 {
        return None;
    }
    let code = after.last()?.to_ascii_uppercase();
    is_product_code(&code).then_some(code)
}
