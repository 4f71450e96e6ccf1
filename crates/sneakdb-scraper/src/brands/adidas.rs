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
            BlockMarker::StateAssignment("__PRELOADED_STATE__"),
            BlockMarker::StateAssignment("__INITIAL_STATE__"),
            BlockMarker::DataAttribute("product"),
            BlockMarker::JsonLdProduct,
            BlockMarker::InlineObject("product"),
        ],
        anchor_keys: &[
            "product_id",
            "productId",
            "model_number",
            "variation_list",
            "view_list",
            "sku",
            "sizes",
        ],
    },

    identifier_keys: &["product_id", "productId", "articleNumber", "sku", "productID", "model_number"],
    color_keys: &[
        "color",
        "colorName",
        "color_name",
        "colors",
        "availableColors",
        "attribute_list.color",
    ],
    size_keys: &["sizes", "variation_list", "availableSizes", "sizeOptions"],
    size_object_keys: &["size", "label", "localizedSize", "value"],
    variant_list_keys: &["variants", "colorVariations", "product_link_list"],
    variant_color_keys: &["color", "colorName", "colorway", "search_color"],
    price_keys: &[
        "pricing_information.currentPrice",
        "price",
        "salePrice",
        "offers.price",
        "offers.lowPrice",
        "pricing_information.standard_price",
    ],
    availability_keys: &[
        "availability",
        "offers.availability",
        "availability_status",
        "inStock",
        "available",
    ],
    image_keys: &["view_list", "images", "imageUrls", "image"],
    image_object_keys: &["image_url", "url", "src", "image", "href"],

    color_labels: &["Colour", "Color"],
    style_labels: &["Product code", "Article"],
    color_selectors: &[
        r#"[data-auto-id*="color-chooser"] a"#,
        r#"[data-testid*="color"] button"#,
        r#"button[aria-label*="color"]"#,
        ".color-selector button",
        ".color-picker button",
        r#"[class*="color-chooser"] button"#,
        "[data-color]",
        ".color-swatch",
        r#"[class*="color"] button"#,
    ],
    color_attrs: &["data-color", "data-colorway", "title", "aria-label"],
    size_selectors: &[
        r#"[data-auto-id*="size-selector"] button"#,
        r#"[data-testid*="size"] button"#,
        r#"button[aria-label*="size"]"#,
        ".size-selector button",
        ".size-picker button",
        "[data-size]",
        ".size-option",
        r#"button[class*="size"]"#,
        r#"[class*="size"] button"#,
    ],
    size_attrs: &["data-size", "data-value"],
    price_selectors: &[
        r#"[data-auto-id="product-price"]"#,
        ".gl-price-item",
        r#"[data-testid*="price"]"#,
        ".product-price",
        ".price",
        ".gl-price",
        r#"[itemprop="price"]"#,
        r#"[class*="price"]"#,
    ],
    price_attrs: &["content", "data-price"],
    stock_selectors: &[
        r#"[itemprop="availability"]"#,
        r#"[data-auto-id*="availability"]"#,
        r#"[data-auto-id*="add-to-bag"]"#,
        r#"[data-testid*="stock"]"#,
        ".stock-status",
        r#"[aria-label*="stock"]"#,
        r#"[class*="stock"]"#,
        r#"[class*="availability"]"#,
        r#"[class*="sold-out"]"#,
    ],
    stock_attrs: &["content", "href"],
    out_of_stock_phrases: &["sold out", "out of stock", "unavailable", "not available"],
    image_selectors: &[
        r#"[data-auto-id*="image"] img"#,
        r#"img[data-testid*="product"]"#,
        r#"[class*="gallery"] img"#,
        ".product-image img",
        ".image-carousel img",
        ".gl-image img",
        "[data-image]",
        "[data-src]",
        "[data-image-url]",
        "[data-img-url]",
        "picture source",
        "picture img",
        r#"meta[property="og:image"]"#,
    ],
    image_attrs: &[
        "src",
        "srcset",
        "data-src",
        "data-image",
        "data-lazy-src",
        "data-srcset",
        "data-image-url",
        "data-img-url",
        "content",
    ],

    size_format: SizeFormat::Fractional,
    identifiers: IdentifierScheme { size_separator: "_" },
    url_identifier: article_code_from_url,
};

static VARIANTS: VariantExtractor = VariantExtractor::new(&VOCABULARY);
static PRICES: PriceExtractor = PriceExtractor::new(&VOCABULARY);
static IMAGES: ImageExtractor = ImageExtractor::new(&VOCABULARY);

/// Adidas product pages (`adidas.com/{locale}/{slug}/{ARTICLE}.html`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AdidasParser;

impl BrandParser for AdidasParser {
    fn brand(&self) -> Brand {
        Brand::Adidas
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
        article_code_from_url(page_url)
    }
}

/// `https://www.adidas.com/us/samba-og-shoes/KJ1363.html` → `KJ1363`.
fn article_code_from_url(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url.trim()).ok()?;
    let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let stem = last
        .strip_suffix(".html")
        .or_else(|| last.strip_suffix(".HTML"))?;
    let code = stem.to_ascii_uppercase();
    is_product_code(&code).then_some(code)
}
