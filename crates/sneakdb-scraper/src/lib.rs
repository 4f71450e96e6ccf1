pub mod aggregate;
pub mod brands;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
mod parse_helpers;
pub mod pipeline;
pub mod structured;
pub mod url_check;

pub use brands::{parser_for, AdidasParser, BrandParser, NikeParser};
pub use error::{ExtractionError, FetchError, NormalizeError, UrlCheckError};
pub use extract::{FieldExtractor, Located, Page, Tier};
pub use fetch::{FetchedPage, PageFetcher};
pub use normalize::{absolutize, extract_origin, parse_price};
pub use pipeline::{
    extract, extract_with_config, DegradedReason, ExtractionOutcome, ExtractionPipeline,
    ExtractorConfig, FieldTiers, PipelineStage,
};
pub use url_check::{check_product_url, detect_brand, resolve_brand, validate_url};
