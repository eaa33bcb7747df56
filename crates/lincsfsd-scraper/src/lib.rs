pub mod client;
pub mod detail;
pub mod diagnostics;
mod dom;
pub mod error;
pub mod listing;

pub use client::{DirectoryClient, BROWSER_USER_AGENT};
pub use detail::parse_detail;
pub use diagnostics::{DiagnosticSink, NoopSink, RawHtmlFileSink};
pub use error::ScraperError;
pub use listing::{parse_listing, ListingHit};
