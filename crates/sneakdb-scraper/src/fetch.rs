//! HTTP fetcher for product pages.
//!
//! Retrieval only: the fetcher hands raw markup to the extraction pipeline and
//! never retries. Retry policy belongs to the caller.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect, Client};
use sneakdb_core::AppConfig;

use crate::error::FetchError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";
const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;

/// A fetched page: where the request ended up and what it returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects; image URLs resolve against its origin.
    pub final_url: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher with a browser-like `User-Agent` and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`PageFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(config.fetch_timeout_secs, &config.fetch_user_agent)
    }

    /// Fetches `url`, following redirects.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network or body-decoding failures.
    /// - [`FetchError::UnexpectedStatus`] on any non-2xx final response.
    /// - [`FetchError::EmptyBody`] when the response body is blank.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        tracing::debug!(url, "fetching product page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_EN)
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody { url: final_url });
        }

        tracing::debug!(url, %final_url, bytes = body.len(), "fetched product page");
        Ok(FetchedPage { final_url, body })
    }
}
