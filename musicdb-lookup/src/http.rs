//! Shared HTTP fetcher for catalog search pages.
//!
//! Provides a configured [`reqwest::Client`] that sends the same browser-like
//! identity and Japanese locale preference on every request. One fetcher is
//! built at startup and shared by all adapters.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};

use crate::config::LookupConfig;
use crate::error::LookupError;

/// Performs single HTML retrievals with fixed identity headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from the lookup configuration.
    ///
    /// The client has:
    /// - `User-Agent` and `Accept-Language` from config on every request
    /// - Total request timeout of `timeout_seconds`
    /// - Brotli and gzip decompression
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Config`] if a header value is invalid or the
    /// client cannot be constructed.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| LookupError::Config(format!("invalid accept_language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| LookupError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::SourceUnavailable`] on transport failure,
    /// timeout, a status outside `2xx`, or an unreadable body. No retries.
    /// The message never includes the URL, whose query string carries the
    /// search terms.
    pub async fn fetch_html(&self, url: &str) -> Result<String, LookupError> {
        tracing::trace!(url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::SourceUnavailable(format!("request failed: {}", e.without_url())))?
            .error_for_status()
            .map_err(|e| LookupError::SourceUnavailable(format!("HTTP error: {}", e.without_url())))?;

        let html = response
            .text()
            .await
            .map_err(|e| LookupError::SourceUnavailable(format!("response read failed: {}", e.without_url())))?;

        tracing::trace!(bytes = html.len(), "response received");
        Ok(html)
    }
}
