//! Listing-plus-details search flow for `DirectoryClient`.

use futures::stream::{self, StreamExt};
use lincsfsd_core::{DetailRecord, SearchResultRecord};

use crate::error::ScraperError;
use crate::listing::{parse_listing, ListingHit};

use super::{resolve_detail_url, DirectoryClient};

impl DirectoryClient {
    /// Runs one directory search: fetches the results page, then each hit's
    /// detail page, and returns one record per hit in page order.
    ///
    /// Detail pages are fetched with up to `detail_concurrency` requests in
    /// flight; output order never depends on completion order.
    ///
    /// **Degraded details**: a detail page that cannot be resolved, fetched,
    /// or returns a non-2xx status is logged and replaced by an empty
    /// [`DetailRecord`]. Only a failure on the results page fails the search.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_listing_html`].
    pub async fn search(&self, search_url: &str) -> Result<Vec<SearchResultRecord>, ScraperError> {
        let html = self.fetch_listing_html(search_url).await?;
        let hits = parse_listing(&html);
        tracing::info!(hits = hits.len(), "parsed search results");

        let records = stream::iter(hits)
            .map(|hit| self.complete_hit(hit))
            .buffered(self.detail_concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(records)
    }

    async fn complete_hit(&self, hit: ListingHit) -> SearchResultRecord {
        let details = self.details_or_empty(&hit.link).await;
        tracing::debug!(service = %hit.service_name, "parsed result entry");
        hit.into_record(details)
    }

    async fn details_or_empty(&self, link: &str) -> DetailRecord {
        let url = match resolve_detail_url(&self.detail_base, link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(link, error = %e, "could not resolve detail link; leaving details empty");
                return DetailRecord::default();
            }
        };

        match self.fetch_detail(url.as_str()).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "detail page fetch failed; leaving details empty");
                DetailRecord::default()
            }
        }
    }
}
