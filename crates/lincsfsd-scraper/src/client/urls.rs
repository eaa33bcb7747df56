//! URL construction for listing and detail requests.

use reqwest::Url;

use crate::error::ScraperError;

/// Asks the directory for every hit on a single page.
const LISTING_QUERY_PAIRS: [(&str, &str); 2] = [("sr", "0"), ("nh", "10000")];

/// Builds the listing request URL from the caller's search URL.
///
/// The page-size pairs are appended to the query; any fragment is dropped
/// since it is never sent upstream.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `search_url` does not parse or is
/// not an http(s) URL.
pub fn listing_url(search_url: &str) -> Result<Url, ScraperError> {
    let mut url = Url::parse(search_url.trim()).map_err(|e| ScraperError::InvalidUrl {
        url: search_url.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            url: search_url.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }

    url.set_fragment(None);
    url.query_pairs_mut().extend_pairs(LISTING_QUERY_PAIRS);
    Ok(url)
}

/// Resolves a result link against the detail base. Absolute links are kept.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `link` cannot be joined onto `base`.
pub fn resolve_detail_url(base: &Url, link: &str) -> Result<Url, ScraperError> {
    base.join(link).map_err(|e| ScraperError::InvalidUrl {
        url: link.to_owned(),
        reason: e.to_string(),
    })
}
