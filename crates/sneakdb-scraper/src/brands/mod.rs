//! Brand parsers.
//!
//! A [`BrandParser`] binds one brand's three field extractors and knows how
//! the brand encodes a product code in its URLs. Adding a brand means adding
//! a module here with its vocabulary and wiring it into [`parser_for`].

mod adidas;
mod nike;

pub use adidas::AdidasParser;
pub use nike::NikeParser;

use sneakdb_core::Brand;

use crate::extract::{FieldExtractor, Located, Page, PriceCandidate, VariantCandidate};

/// One brand's extraction capabilities.
///
/// Implementors are stateless; a single shared instance serves any number of
/// concurrent extractions.
pub trait BrandParser: Send + Sync {
    fn brand(&self) -> Brand;

    fn variant_extractor(&self) -> &dyn FieldExtractor<Candidate = VariantCandidate>;

    fn price_extractor(&self) -> &dyn FieldExtractor<Candidate = PriceCandidate>;

    fn image_extractor(&self) -> &dyn FieldExtractor<Candidate = String>;

    /// Product code encoded in a product page URL, if the URL follows the
    /// brand's pattern.
    fn url_identifier(&self, page_url: &str) -> Option<String>;

    fn locate_variants(&self, page: &Page<'_>) -> Located<VariantCandidate> {
        self.variant_extractor().locate(page)
    }

    fn locate_prices(&self, page: &Page<'_>) -> Located<PriceCandidate> {
        self.price_extractor().locate(page)
    }

    fn locate_images(&self, page: &Page<'_>) -> Located<String> {
        self.image_extractor().locate(page)
    }
}

/// The built-in parser for `brand`.
#[must_use]
pub fn parser_for(brand: Brand) -> &'static dyn BrandParser {
    match brand {
        Brand::Nike => &NikeParser,
        Brand::Adidas => &AdidasParser,
    }
}
