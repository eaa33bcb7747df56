//! Parser for the directory's search results page.
//!
//! Each `div.result_hit` becomes one [`ListingHit`], in document order. The
//! hit keeps the raw relative link to its detail page; resolving and fetching
//! that page is the client's job.

use std::sync::LazyLock;

use lincsfsd_core::{DetailRecord, SearchResultRecord};
use scraper::{ElementRef, Html, Selector};

use crate::dom::{attr, element_text, first, first_text, selector, ANCHOR, ANCHOR_WITH_HREF};

static RESULT_HIT: LazyLock<Selector> = LazyLock::new(|| selector("div.result_hit"));
static HEADER: LazyLock<Selector> = LazyLock::new(|| selector("header"));
static HIT_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("div.hit-content"));
static TELEPHONE: LazyLock<Selector> = LazyLock::new(|| selector("span.comma_split_line"));
static EMAIL_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.contact_link[href]"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));

const WEBSITE_LABEL: &str = "Website:";

/// One entry of the search results page, before its detail page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingHit {
    pub service_name: String,
    /// Detail page link exactly as it appears in the markup (usually relative).
    pub link: String,
    pub main_description: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl ListingHit {
    #[must_use]
    pub fn into_record(self, details: DetailRecord) -> SearchResultRecord {
        SearchResultRecord {
            service_name: self.service_name,
            main_description: self.main_description,
            telephone: self.telephone,
            email: self.email,
            website: self.website,
            details,
        }
    }
}

/// Extracts every result entry from a search results page.
///
/// A page with no result containers yields an empty `Vec`. Entries without a
/// linked header are skipped with a warning since there is no detail page to
/// follow.
#[must_use]
pub fn parse_listing(html: &str) -> Vec<ListingHit> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_HIT)
        .enumerate()
        .filter_map(|(position, hit)| {
            let parsed = parse_hit(hit);
            if parsed.is_none() {
                tracing::warn!(position, "result entry has no header link; skipping");
            }
            parsed
        })
        .collect()
}

fn parse_hit(hit: ElementRef<'_>) -> Option<ListingHit> {
    let anchor = first(hit, &HEADER).and_then(|header| first(header, &ANCHOR))?;
    let link = attr(anchor, "href").filter(|href| !href.is_empty())?;

    Some(ListingHit {
        service_name: element_text(anchor),
        link,
        main_description: first_text(hit, &HIT_CONTENT),
        telephone: first_text(hit, &TELEPHONE),
        email: email(hit),
        website: website(hit),
    })
}

fn email(hit: ElementRef<'_>) -> Option<String> {
    let href = attr(first(hit, &EMAIL_LINK)?, "href")?;
    Some(strip_mailto(&href).to_owned())
}

fn strip_mailto(href: &str) -> &str {
    href.strip_prefix("mailto:").unwrap_or(href)
}

/// `href` of the first anchor inside the first paragraph labelled `Website:`
/// that actually carries a link.
fn website(hit: ElementRef<'_>) -> Option<String> {
    hit.select(&PARAGRAPH)
        .filter(|p| element_text(*p).contains(WEBSITE_LABEL))
        .find_map(|p| first(p, &ANCHOR_WITH_HREF).and_then(|a| attr(a, "href")))
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
