//! Extraction pipeline: one page in, one validated [`ScrapeResult`] out.
//!
//! Stages run in a fixed order and are recorded in the outcome:
//!
//! `Fetched → VariantsExtracted → PricesExtracted → ImagesExtracted →
//! Normalized → Validated → Done`
//!
//! `Failed` is reached only from `Fetched` (unusable content) or from
//! `Validated` (an invariant the earlier stages should have guaranteed).
//! Missing fields never stop the pipeline.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use sneakdb_core::{AppConfig, Brand, ScrapeResult};

use crate::aggregate::{fallback_variant, normalize_images, normalize_prices, normalize_variants, validate};
use crate::brands::{parser_for, BrandParser};
use crate::error::ExtractionError;
use crate::extract::{Located, Page, PriceCandidate, Tier, VariantCandidate};
use crate::normalize::extract_origin;

static MARKUP_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z!/?][^>]*>").expect("valid regex"));

/// Share of U+FFFD replacement characters above which content is treated as
/// binary that was decoded lossily.
const MAX_REPLACEMENT_RATIO: f64 = 0.1;

/// Engine settings. Derived from [`AppConfig`] by the binary; tests use
/// [`Default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Upper bound for a plausible price; larger observations are dropped.
    pub max_price: Decimal,
    pub max_images: usize,
    /// Run the three field extractions on scoped threads.
    pub parallel_fields: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_price: Decimal::new(100_000, 0),
            max_images: 64,
            parallel_fields: false,
        }
    }
}

impl From<&AppConfig> for ExtractorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_price: config.max_price,
            max_images: config.max_images,
            parallel_fields: config.parallel_fields,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Fetched,
    VariantsExtracted,
    PricesExtracted,
    ImagesExtracted,
    Normalized,
    Validated,
    Done,
    Failed,
}

/// Why a successful result is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    /// No variant was found; the result carries the placeholder variant.
    NoVariants,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVariants => write!(f, "no_variants"),
        }
    }
}

/// The tier each field was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldTiers {
    pub variants: Tier,
    pub prices: Tier,
    pub images: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub result: ScrapeResult,
    pub degraded: Option<DegradedReason>,
    pub tiers: FieldTiers,
    /// Stages visited, in order.
    pub stages: Vec<PipelineStage>,
}

impl ExtractionOutcome {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

type LocatedFields = (Located<VariantCandidate>, Located<PriceCandidate>, Located<String>);

/// Runs a [`BrandParser`] over single pages.
#[derive(Clone, Copy)]
pub struct ExtractionPipeline<'p> {
    parser: &'p dyn BrandParser,
    config: &'p ExtractorConfig,
}

impl<'p> ExtractionPipeline<'p> {
    #[must_use]
    pub fn new(parser: &'p dyn BrandParser, config: &'p ExtractorConfig) -> Self {
        Self { parser, config }
    }

    /// Pipeline over the built-in parser for `brand`.
    #[must_use]
    pub fn for_brand(brand: Brand, config: &'p ExtractorConfig) -> Self {
        Self::new(parser_for(brand), config)
    }

    /// Extracts a [`ScrapeResult`] from `raw_content`.
    ///
    /// `page_url` may be the full product URL or just its origin. Relative
    /// image URLs resolve against its origin; the full URL also supplies the
    /// product code for identifiers. An unparsable `page_url` falls back to
    /// the brand's default origin.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnusableContent`] when the content is empty,
    /// binary, or carries no markup, and
    /// [`ExtractionError::InvariantViolation`] if the assembled result fails
    /// validation.
    pub fn run(&self, raw_content: &str, page_url: &str) -> Result<ExtractionOutcome, ExtractionError> {
        let brand = self.parser.brand();
        let mut stages = vec![PipelineStage::Fetched];

        if let Err(reason) = check_content(raw_content) {
            tracing::warn!(brand = %brand, %reason, stage = ?PipelineStage::Failed, "unusable page content");
            return Err(ExtractionError::UnusableContent {
                brand: brand.to_string(),
                reason,
            });
        }

        let base_origin = extract_origin(page_url).unwrap_or_else(|| {
            tracing::warn!(brand = %brand, page_url, "unparsable page url, using brand origin");
            brand.default_origin().to_string()
        });

        let page = Page {
            html: raw_content,
            page_url,
        };
        let (variants, prices, images) = if self.config.parallel_fields {
            self.locate_parallel(&page)
        } else {
            (
                self.parser.locate_variants(&page),
                self.parser.locate_prices(&page),
                self.parser.locate_images(&page),
            )
        };
        stages.extend([
            PipelineStage::VariantsExtracted,
            PipelineStage::PricesExtracted,
            PipelineStage::ImagesExtracted,
        ]);

        let tiers = FieldTiers {
            variants: variants.tier,
            prices: prices.tier,
            images: images.tier,
        };
        tracing::debug!(
            brand = %brand,
            variants = ?tiers.variants,
            prices = ?tiers.prices,
            images = ?tiers.images,
            "located field candidates"
        );

        let mut result = ScrapeResult {
            variants: normalize_variants(variants.candidates),
            price_history: normalize_prices(prices.candidates, self.config.max_price),
            images: normalize_images(images.candidates, &base_origin, self.config.max_images),
        };
        stages.push(PipelineStage::Normalized);

        let mut degraded = None;
        if result.variants.is_empty() {
            let fallback = fallback_variant(self.parser, page_url);
            tracing::warn!(
                brand = %brand,
                unique_identifier = %fallback.unique_identifier,
                "no variants found, using placeholder variant"
            );
            result.variants.push(fallback);
            degraded = Some(DegradedReason::NoVariants);
        }

        stages.push(PipelineStage::Validated);
        if let Err(reason) = validate(&result, self.config.max_price) {
            tracing::error!(brand = %brand, %reason, stage = ?PipelineStage::Failed, "extraction result failed validation");
            return Err(ExtractionError::InvariantViolation {
                brand: brand.to_string(),
                reason,
            });
        }
        stages.push(PipelineStage::Done);

        tracing::debug!(
            brand = %brand,
            variants = result.variants.len(),
            prices = result.price_history.len(),
            images = result.images.len(),
            "extraction complete"
        );

        Ok(ExtractionOutcome {
            result,
            degraded,
            tiers,
            stages,
        })
    }

    fn locate_parallel(&self, page: &Page<'_>) -> LocatedFields {
        std::thread::scope(|scope| {
            let prices = scope.spawn(|| self.parser.locate_prices(page));
            let images = scope.spawn(|| self.parser.locate_images(page));
            let variants = self.parser.locate_variants(page);
            (
                variants,
                prices.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
                images.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
            )
        })
    }
}

/// Extracts a product page for `brand` with default settings.
///
/// # Errors
///
/// See [`ExtractionPipeline::run`].
pub fn extract(raw_content: &str, page_url: &str, brand: Brand) -> Result<ExtractionOutcome, ExtractionError> {
    extract_with_config(raw_content, page_url, brand, &ExtractorConfig::default())
}

/// Extracts a product page for `brand` with explicit settings.
///
/// # Errors
///
/// See [`ExtractionPipeline::run`].
pub fn extract_with_config(
    raw_content: &str,
    page_url: &str,
    brand: Brand,
    config: &ExtractorConfig,
) -> Result<ExtractionOutcome, ExtractionError> {
    ExtractionPipeline::for_brand(brand, config).run(raw_content, page_url)
}

fn check_content(raw_content: &str) -> Result<(), String> {
    if raw_content.trim().is_empty() {
        return Err("empty content".to_string());
    }
    if raw_content.contains('\0') {
        return Err("binary content".to_string());
    }

    let total = raw_content.chars().count();
    let replaced = raw_content.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count();
    // Counts are far below 2^52, so the conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    let ratio = replaced as f64 / total as f64;
    if ratio > MAX_REPLACEMENT_RATIO {
        return Err("binary content".to_string());
    }

    if !MARKUP_TAG_RE.is_match(raw_content) {
        return Err("no markup found".to_string());
    }
    Ok(())
}
