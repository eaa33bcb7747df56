//! HTTP client for the Family Services Directory.

mod search;
mod urls;

use std::sync::Arc;
use std::time::Duration;

use lincsfsd_core::{AppConfig, DetailRecord};
use reqwest::{Client, Url};

use crate::detail::parse_detail;
use crate::diagnostics::{DiagnosticSink, NoopSink, RawHtmlFileSink};
use crate::error::ScraperError;

pub use urls::{listing_url, resolve_detail_url};

/// User agent presented on the listing request. The directory serves a
/// reduced page to unknown agents.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537";

/// Fetches search result and detail pages and turns them into records.
///
/// The listing request is all-or-nothing; detail pages are best effort (see
/// [`DirectoryClient::search`]).
pub struct DirectoryClient {
    client: Client,
    detail_base: Url,
    detail_concurrency: usize,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl DirectoryClient {
    /// Creates a client with a request timeout, default `User-Agent`, and the
    /// base that relative detail links are resolved against.
    ///
    /// Detail pages are fetched one at a time and listing HTML goes to a
    /// [`NoopSink`] until configured otherwise.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `detail_base_url` is not an absolute URL.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        detail_base_url: &str,
    ) -> Result<Self, ScraperError> {
        let detail_base = Url::parse(detail_base_url).map_err(|e| ScraperError::InvalidUrl {
            url: detail_base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            detail_base,
            detail_concurrency: 1,
            diagnostics: Arc::new(NoopSink),
        })
    }

    /// Builds a client from application config, installing a
    /// [`RawHtmlFileSink`] when `raw_html_log_path` is set.
    ///
    /// # Errors
    ///
    /// See [`DirectoryClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            &config.detail_base_url,
        )?
        .with_detail_concurrency(config.detail_concurrency);

        Ok(match &config.raw_html_log_path {
            Some(path) => client.with_diagnostics(Arc::new(RawHtmlFileSink::new(path.clone()))),
            None => client,
        })
    }

    /// Number of detail pages fetched at once. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_detail_concurrency(mut self, detail_concurrency: usize) -> Self {
        self.detail_concurrency = detail_concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Fetches the raw search results page for `search_url`.
    ///
    /// Appends the directory's "all results on one page" query and sends a
    /// browser user agent.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `search_url` is not an absolute http(s) URL.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Http`] on network or TLS failure.
    pub async fn fetch_listing_html(&self, search_url: &str) -> Result<String, ScraperError> {
        let url = listing_url(search_url)?;
        tracing::info!(url = %url, "fetching search results");

        let body = self.fetch_html(url.as_str(), Some(BROWSER_USER_AGENT)).await?;
        self.diagnostics.listing_fetched(url.as_str(), &body);
        Ok(body)
    }

    /// Fetches and parses one detail page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Http`] on network or TLS failure.
    pub async fn fetch_detail(&self, detail_url: &str) -> Result<DetailRecord, ScraperError> {
        let body = self.fetch_html(detail_url, None).await?;
        Ok(parse_detail(&body))
    }

    async fn fetch_html(
        &self,
        url: &str,
        user_agent_override: Option<&str>,
    ) -> Result<String, ScraperError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml");

        if let Some(ua) = user_agent_override {
            request = request.header(reqwest::header::USER_AGENT, ua);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
