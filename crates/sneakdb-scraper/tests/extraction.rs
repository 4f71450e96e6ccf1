//! End-to-end extraction tests over hand-written product page fixtures.

use rust_decimal::Decimal;
use serde_json::json;

use sneakdb_core::Brand;
use sneakdb_scraper::{
    extract, extract_with_config, DegradedReason, ExtractionError, ExtractorConfig, Tier,
};

const NIKE_ORIGIN: &str = "https://www.nike.com";
const NIKE_PAGE_URL: &str = "https://www.nike.com/t/pegasus-41-road-running-shoes/IM6674-101";
const ADIDAS_PAGE_URL: &str = "https://www.adidas.com/us/samba-og-shoes/KJ1363.html";

const NIKE_STATE_PAGE: &str = r#"<html><head><title>Nike Pegasus 41</title></head><body>
<script>window.__INITIAL_STATE__ = {"product": {"colorway":"White/Black","sizes":["9","10"],"style":"IM6674-101"}};</script>
</body></html>"#;

const NIKE_NEXT_DATA_PAGE: &str = r#"<html><body>
<script id="__NEXT_DATA__" type="application/json">
{"props": {"pageProps": {"selectedProduct": {
  "styleColor": "IM6674-101",
  "colorDescription": "White/Black",
  "sizes": [{"label": "M 9 / W 10.5"}, {"label": "M 10 / W 11.5"}, {"label": "M 11 / W 12.5"}],
  "prices": {"currentPrice": 145, "fullPrice": 145},
  "availability": "IN_STOCK",
  "images": [
    {"url": "https://static.nike.com/a/images/t_PDP_1728_v1/f_auto,q_auto:eco/pegasus-1.png"},
    {"url": "https://static.nike.com/a/images/t_PDP_1728_v1/f_auto,q_auto:eco/pegasus-2.png"}
  ]
}}}}
</script>
<div class="size-selector"><button>M 12 / W 13.5</button></div>
</body></html>"#;

const ADIDAS_MARKUP_PAGE: &str = r#"<html><body>
<h1>Samba OG Shoes</h1>
<div data-auto-id="product-price"><span class="gl-price-item">1.299,00 €</span></div>
<dl><dt>Colour</dt><dd>Cloud White / Core Black</dd></dl>
<p>Product code: KJ1363</p>
<div data-auto-id="size-selector">
  <button>UK 8</button>
  <button>UK 8 2/3</button>
  <button>UK 8</button>
</div>
<div class="image-gallery">
  <img src="//assets.adidas.com/images/KJ1363_01.jpg">
  <img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=" data-src="/images/KJ1363_02.jpg">
</div>
</body></html>"#;

// ---------------------------------------------------------------------------
// Nike
// ---------------------------------------------------------------------------

#[test]
fn nike_state_block_yields_variants_sharing_style_root() {
    let outcome = extract(NIKE_STATE_PAGE, NIKE_ORIGIN, Brand::Nike).expect("extraction should succeed");

    assert_eq!(outcome.tiers.variants, Tier::Structured);
    assert!(outcome.degraded.is_none());

    let variants = &outcome.result.variants;
    assert_eq!(variants.len(), 2);
    assert!(variants.iter().all(|v| v.color == "White/Black"));
    assert!(variants.iter().all(|v| v.unique_identifier.starts_with("IM6674-101")));
    let sizes: Vec<_> = variants.iter().map(|v| v.size.as_str()).collect();
    assert_eq!(sizes, vec!["9", "10"]);
    assert_ne!(variants[0].unique_identifier, variants[1].unique_identifier);
}

#[test]
fn nike_next_data_yields_all_fields_from_structured_tier() {
    let outcome = extract(NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike).expect("extraction should succeed");

    assert_eq!(outcome.tiers.variants, Tier::Structured);
    assert_eq!(outcome.tiers.prices, Tier::Structured);
    assert_eq!(outcome.tiers.images, Tier::Structured);

    let ids: Vec<_> = outcome
        .result
        .variants
        .iter()
        .map(|v| v.unique_identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["IM6674-101-9", "IM6674-101-10", "IM6674-101-11"]);
    assert_eq!(outcome.result.current_price().map(|p| p.price), Some(Decimal::new(145, 0)));
    assert!(outcome.result.is_in_stock());
    assert_eq!(outcome.result.images.len(), 2);
    assert!(outcome.result.images[0].contains("f_auto,q_auto:eco"));
}

#[test]
fn structured_tier_suppresses_markup_candidates() {
    let outcome = extract(NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike).expect("extraction should succeed");
    assert!(
        outcome.result.variants.iter().all(|v| v.size != "12"),
        "markup size chip leaked into a structured-tier result"
    );
}

#[test]
fn nike_markup_tier_used_without_structured_blocks() {
    let html = r#"<html><body>
        <div data-testid="currentPrice-container">$120.00</div>
        <ul><li>Shown: Black/Anthracite</li><li>Style: FD2596-001</li></ul>
        <div class="size-selector"><button>M 8 / W 9.5</button><button>M 9 / W 10.5</button></div>
        <div class="product-image"><img src="/images/a.jpg"><img src=" /images/a.jpg "></div>
    </body></html>"#;
    let outcome = extract(html, NIKE_ORIGIN, Brand::Nike).expect("extraction should succeed");

    assert_eq!(outcome.tiers.variants, Tier::Markup);
    let ids: Vec<_> = outcome
        .result
        .variants
        .iter()
        .map(|v| v.unique_identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["FD2596-001-8", "FD2596-001-9"]);
    assert_eq!(outcome.result.current_price().map(|p| p.price), Some(Decimal::new(12000, 2)));
    assert_eq!(outcome.result.images, vec!["https://www.nike.com/images/a.jpg".to_string()]);
}

#[test]
fn nike_markup_page_with_itemprop_price_swatches_and_gallery() {
    let html = r#"<html><body>
        <h1>Nike Pegasus 41</h1>
        <span itemprop="price">145.00</span>
        <div class="colors"><a class="color-swatch" data-color="White/Black"></a></div>
        <div class="sizes"><span data-size="9">9</span><span data-size="10.5">10.5</span></div>
        <div class="gallery">
          <img src="/images/pegasus-1.jpg">
          <img data-src="https://static.nike.com/a/images/pegasus-2.jpg">
        </div>
    </body></html>"#;
    let outcome = extract(html, NIKE_PAGE_URL, Brand::Nike).expect("extraction should succeed");

    assert_eq!(outcome.tiers.variants, Tier::Markup);
    assert_eq!(outcome.tiers.prices, Tier::Markup);
    assert_eq!(outcome.tiers.images, Tier::Markup);
    assert!(outcome.degraded.is_none());

    let ids: Vec<_> = outcome
        .result
        .variants
        .iter()
        .map(|v| v.unique_identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["IM6674-101-9", "IM6674-101-10.5"]);
    assert!(outcome.result.variants.iter().all(|v| v.color == "White/Black"));
    assert_eq!(outcome.result.current_price().map(|p| p.price), Some(Decimal::new(14500, 2)));
    assert!(outcome.result.is_in_stock());
    assert_eq!(
        outcome.result.images,
        vec![
            "https://www.nike.com/images/pegasus-1.jpg".to_string(),
            "https://static.nike.com/a/images/pegasus-2.jpg".to_string(),
        ]
    );
}

// ---------------------------------------------------------------------------
// Adidas
// ---------------------------------------------------------------------------

#[test]
fn adidas_markup_page_with_size_options_and_carousel() {
    let html = r#"<html><body>
        <h1>Samba OG Shoes</h1>
        <span class="gl-price">1.299 €</span>
        <div class="stock-status">Out of stock</div>
        <div class="color-picker"><button data-colorway="Core Black / Cloud White"></button></div>
        <ul>
          <li class="size-option" data-size="9">9</li>
          <li class="size-option">9 1/2</li>
        </ul>
        <div class="image-carousel"><img data-src="/images/KJ1363_02.jpg"></div>
        <div class="gl-image"><img src="https://assets.adidas.com/images/KJ1363_01.jpg"></div>
    </body></html>"#;
    let outcome = extract(html, ADIDAS_PAGE_URL, Brand::Adidas).expect("extraction should succeed");

    assert_eq!(outcome.tiers.variants, Tier::Markup);
    assert_eq!(outcome.tiers.prices, Tier::Markup);
    assert_eq!(outcome.tiers.images, Tier::Markup);

    let ids: Vec<_> = outcome
        .result
        .variants
        .iter()
        .map(|v| v.unique_identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["KJ1363_9", "KJ1363_9-1/2"]);
    assert!(outcome
        .result
        .variants
        .iter()
        .all(|v| v.color == "Core Black / Cloud White"));
    assert_eq!(outcome.result.current_price().map(|p| p.price), Some(Decimal::new(1299, 0)));
    assert!(!outcome.result.is_in_stock());
    assert_eq!(
        outcome.result.images,
        vec![
            "https://www.adidas.com/images/KJ1363_02.jpg".to_string(),
            "https://assets.adidas.com/images/KJ1363_01.jpg".to_string(),
        ]
    );
}

#[test]
fn adidas_markup_page() {
    let outcome = extract(ADIDAS_MARKUP_PAGE, ADIDAS_PAGE_URL, Brand::Adidas).expect("extraction should succeed");

    assert_eq!(outcome.tiers.variants, Tier::Markup);
    let result = &outcome.result;
    let ids: Vec<_> = result.variants.iter().map(|v| v.unique_identifier.as_str()).collect();
    assert_eq!(ids, vec!["KJ1363_8", "KJ1363_8-2/3"]);
    assert!(result.variants.iter().all(|v| v.color == "Cloud White / Core Black"));

    assert_eq!(result.current_price().map(|p| p.price), Some(Decimal::new(129_900, 2)));
    assert!(result.is_in_stock());
    assert_eq!(
        result.images,
        vec![
            "https://assets.adidas.com/images/KJ1363_01.jpg".to_string(),
            "https://www.adidas.com/images/KJ1363_02.jpg".to_string(),
        ]
    );
}

#[test]
fn adidas_data_product_attribute() {
    let html = r#"<html><body>
        <div id="pdp" data-product='{"sku": "IE3437", "color": ["Core Black", "Cloud White"], "sizes": ["9"], "price": 100, "availability": "OUT_OF_STOCK"}'></div>
    </body></html>"#;
    let outcome = extract(html, "https://www.adidas.com", Brand::Adidas).expect("extraction should succeed");

    let ids: Vec<_> = outcome
        .result
        .variants
        .iter()
        .map(|v| v.unique_identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["IE3437-core-black_9", "IE3437-cloud-white_9"]);
    assert!(!outcome.result.is_in_stock());
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn extraction_is_idempotent() {
    for (html, url, brand) in [
        (NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike),
        (ADIDAS_MARKUP_PAGE, ADIDAS_PAGE_URL, Brand::Adidas),
    ] {
        let first = extract(html, url, brand).expect("first run");
        let second = extract(html, url, brand).expect("second run");
        assert_eq!(first, second);
    }
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let sequential = ExtractorConfig::default();
    let parallel = ExtractorConfig {
        parallel_fields: true,
        ..ExtractorConfig::default()
    };
    for (html, url, brand) in [
        (NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike),
        (ADIDAS_MARKUP_PAGE, ADIDAS_PAGE_URL, Brand::Adidas),
    ] {
        let a = extract_with_config(html, url, brand, &sequential).expect("sequential run");
        let b = extract_with_config(html, url, brand, &parallel).expect("parallel run");
        assert_eq!(a, b);
    }
}

#[test]
fn page_without_variants_gets_placeholder_from_url() {
    let html = "<html><body><h1>Pegasus 41</h1></body></html>";
    let outcome = extract(html, NIKE_PAGE_URL, Brand::Nike).expect("extraction should succeed");

    assert_eq!(outcome.degraded, Some(DegradedReason::NoVariants));
    assert_eq!(outcome.result.variants.len(), 1);
    let placeholder = &outcome.result.variants[0];
    assert_eq!(placeholder.color, "unknown");
    assert_eq!(placeholder.size, "unknown");
    assert_eq!(placeholder.unique_identifier, "IM6674-101");
}

#[test]
fn placeholder_identifier_falls_back_to_url_hash() {
    let html = "<html><body></body></html>";
    let outcome = extract(html, "https://www.adidas.com", Brand::Adidas).expect("extraction should succeed");
    assert!(outcome.result.variants[0].unique_identifier.starts_with("url-"));
}

#[test]
fn out_of_bounds_price_is_dropped_without_degrading() {
    let config = ExtractorConfig {
        max_price: Decimal::new(100, 0),
        ..ExtractorConfig::default()
    };
    let outcome =
        extract_with_config(NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike, &config).expect("extraction should succeed");
    assert!(outcome.result.price_history.is_empty());
    assert!(outcome.degraded.is_none());
}

#[test]
fn image_cap_applies() {
    let config = ExtractorConfig {
        max_images: 1,
        ..ExtractorConfig::default()
    };
    let outcome =
        extract_with_config(NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike, &config).expect("extraction should succeed");
    assert_eq!(outcome.result.images.len(), 1);
}

#[test]
fn unparsable_page_url_uses_brand_origin() {
    let html = r#"<html><body><div class="product-image"><img src="/images/a.jpg"></div></body></html>"#;
    let outcome = extract(html, "nike dot com", Brand::Nike).expect("extraction should succeed");
    assert_eq!(outcome.result.images, vec!["https://www.nike.com/images/a.jpg".to_string()]);
}

#[test]
fn unusable_content_is_the_only_hard_failure() {
    for raw in ["", "   ", "plain text without tags", "<html>\0\0</html>"] {
        let err = extract(raw, NIKE_ORIGIN, Brand::Nike).unwrap_err();
        assert!(
            matches!(err, ExtractionError::UnusableContent { .. }),
            "expected UnusableContent for {raw:?}, got: {err:?}"
        );
    }
}

#[test]
fn result_serializes_with_shoe_size_and_numeric_price() {
    let outcome = extract(NIKE_NEXT_DATA_PAGE, NIKE_PAGE_URL, Brand::Nike).expect("extraction should succeed");
    let value = serde_json::to_value(&outcome.result).expect("serialize");

    assert_eq!(
        value["variants"][0],
        json!({"color": "White/Black", "shoe_size": "9", "unique_identifier": "IM6674-101-9"})
    );
    assert_eq!(value["price_history"][0], json!({"price": 145.0, "is_in_stock": true}));
    assert!(value["images"].is_array());
}
