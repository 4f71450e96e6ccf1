//! `scrape` command: fetch product pages with bounded concurrency and print
//! one JSON line per URL.
//!
//! Per-URL failures are reported in the output and logged rather than
//! propagated, so one bad page does not abort the run.

use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use sneakdb_core::{AppConfig, Brand};
use sneakdb_scraper::{
    check_product_url, extract_with_config, resolve_brand, ExtractionOutcome, ExtractorConfig,
    PageFetcher,
};

/// # Errors
///
/// Returns an error if the HTTP client cannot be built or every URL failed.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    urls: &[String],
    brand_override: Option<Brand>,
    concurrency: Option<usize>,
) -> anyhow::Result<()> {
    let fetcher = PageFetcher::from_config(config)?;
    let extractor_config = ExtractorConfig::from(config);
    let max_concurrent = concurrency.unwrap_or(config.max_concurrent_pages).max(1);

    let mut results: Vec<(usize, &String, anyhow::Result<ExtractionOutcome>)> =
        stream::iter(urls.iter().enumerate())
            .map(|(index, url)| {
                let fetcher = &fetcher;
                let extractor_config = &extractor_config;
                async move {
                    let result = scrape_one(fetcher, extractor_config, url, brand_override).await;
                    (index, url, result)
                }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
    results.sort_by_key(|(index, _, _)| *index);

    let mut failed = 0usize;
    for (_, url, result) in &results {
        match result {
            Ok(outcome) => {
                if let Some(reason) = outcome.degraded {
                    tracing::warn!(url = %url, %reason, "degraded extraction result");
                }
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(url = %url, error = %format!("{e:#}"), "page failed");
            }
        }
        println!("{}", serde_json::to_string(&page_report(url, result))?);
    }

    tracing::info!(pages = results.len(), failed, "scrape complete");
    if !results.is_empty() && failed == results.len() {
        anyhow::bail!("all {failed} pages failed");
    }
    Ok(())
}

async fn scrape_one(
    fetcher: &PageFetcher,
    config: &ExtractorConfig,
    url: &str,
    brand_override: Option<Brand>,
) -> anyhow::Result<ExtractionOutcome> {
    let brand = match brand_override {
        Some(brand) => {
            check_product_url(url, brand)?;
            brand
        }
        None => resolve_brand(url)?.1,
    };

    let page = fetcher.fetch(url).await?;
    let config = config.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        extract_with_config(&page.body, &page.final_url, brand, &config)
    })
    .await??;
    Ok(outcome)
}

/// `{"url", "degraded", "result"}` on success, `{"url", "error"}` otherwise.
pub(crate) fn page_report(url: &str, result: &anyhow::Result<ExtractionOutcome>) -> Value {
    match result {
        Ok(outcome) => json!({
            "url": url,
            "degraded": outcome.degraded,
            "result": outcome.result,
        }),
        Err(e) => json!({
            "url": url,
            "error": format!("{e:#}"),
        }),
    }
}
