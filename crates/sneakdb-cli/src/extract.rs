//! `extract` command: one saved page in, one `ScrapeResult` JSON document out.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use sneakdb_core::{AppConfig, Brand};
use sneakdb_scraper::{extract_with_config, ExtractorConfig};

/// Reads markup from `file` (or stdin), extracts it and prints the result.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the content is unusable, or
/// the result cannot be serialized.
pub(crate) fn run_extract(
    config: &AppConfig,
    brand: Brand,
    page_url: &str,
    file: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let raw = read_input(file)?;
    let outcome = extract_with_config(&raw, page_url, brand, &ExtractorConfig::from(config))?;

    if let Some(reason) = outcome.degraded {
        tracing::warn!(brand = %brand, page_url, %reason, "degraded extraction result");
    }
    tracing::info!(
        brand = %brand,
        variants = outcome.result.variant_count(),
        price = ?outcome.result.current_price().map(|p| p.price),
        in_stock = outcome.result.is_in_stock(),
        images = outcome.result.images.len(),
        "extracted page"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&outcome.result)?
    } else {
        serde_json::to_string(&outcome.result)?
    };
    println!("{json}");
    Ok(())
}

/// Page bytes as text; invalid UTF-8 is replaced so the engine can judge
/// whether the content is usable.
pub(crate) fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    let bytes = match file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read page from stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
