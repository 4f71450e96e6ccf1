use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Retail brands the extraction engine knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Nike,
    Adidas,
}

impl Brand {
    /// All supported brands, in dispatch order.
    pub const ALL: [Brand; 2] = [Brand::Nike, Brand::Adidas];

    /// Lowercase slug used on the command line and in logs.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Brand::Nike => "nike",
            Brand::Adidas => "adidas",
        }
    }

    /// Registrable domain the brand serves product pages from.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Brand::Nike => "nike.com",
            Brand::Adidas => "adidas.com",
        }
    }

    /// Storefront origin used when a caller supplies no page URL.
    #[must_use]
    pub fn default_origin(self) -> &'static str {
        match self {
            Brand::Nike => "https://www.nike.com",
            Brand::Adidas => "https://www.adidas.com",
        }
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when a string names no supported brand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown brand '{0}'; expected one of: nike, adidas")]
pub struct UnknownBrand(pub String);

impl FromStr for Brand {
    type Err = UnknownBrand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Brand::ALL
            .into_iter()
            .find(|b| b.slug().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownBrand(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slug_case_insensitively() {
        assert_eq!("nike".parse::<Brand>(), Ok(Brand::Nike));
        assert_eq!(" Adidas ".parse::<Brand>(), Ok(Brand::Adidas));
    }

    #[test]
    fn rejects_unknown_brand() {
        let err = "puma".parse::<Brand>().unwrap_err();
        assert_eq!(err, UnknownBrand("puma".to_string()));
        assert!(err.to_string().contains("nike, adidas"));
    }

    #[test]
    fn display_matches_slug() {
        for brand in Brand::ALL {
            assert_eq!(brand.to_string(), brand.slug());
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Brand::Adidas).expect("serialization failed");
        assert_eq!(json, "\"adidas\"");
        let decoded: Brand = serde_json::from_str("\"nike\"").expect("deserialization failed");
        assert_eq!(decoded, Brand::Nike);
    }

    #[test]
    fn default_origin_lives_on_brand_domain() {
        for brand in Brand::ALL {
            assert!(brand.default_origin().ends_with(brand.domain()));
        }
    }
}
