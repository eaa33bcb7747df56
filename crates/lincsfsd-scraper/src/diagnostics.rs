//! Optional hooks for inspecting raw upstream HTML.
//!
//! The client hands every fetched listing page to its [`DiagnosticSink`].
//! The default [`NoopSink`] discards it; [`RawHtmlFileSink`] keeps the most
//! recent page on disk for debugging selector drift.

use std::path::{Path, PathBuf};

/// Receives raw listing HTML after a successful fetch.
///
/// Called inline on the async fetch path. Implementations must not fail the
/// request and must not block: errors are theirs to log, and file or network
/// I/O belongs on a blocking thread.
pub trait DiagnosticSink: Send + Sync {
    fn listing_fetched(&self, url: &str, body: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn listing_fetched(&self, _url: &str, _body: &str) {}
}

/// Overwrites a single file with the latest listing page body.
///
/// Inside a tokio runtime the write runs on the blocking pool and is not
/// awaited, so two listings fetched back to back may land in either order.
#[derive(Debug, Clone)]
pub struct RawHtmlFileSink {
    path: PathBuf,
}

impl RawHtmlFileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiagnosticSink for RawHtmlFileSink {
    fn listing_fetched(&self, url: &str, body: &str) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            write_raw_html(&self.path, url, body);
            return;
        };

        let path = self.path.clone();
        let url = url.to_owned();
        let body = body.to_owned();
        drop(runtime.spawn_blocking(move || write_raw_html(&path, &url, &body)));
    }
}

fn write_raw_html(path: &Path, url: &str, body: &str) {
    match std::fs::write(path, body) {
        Ok(()) => tracing::debug!(url, path = %path.display(), "wrote raw listing HTML"),
        Err(e) => tracing::warn!(
            url,
            path = %path.display(),
            error = %e,
            "could not write raw listing HTML"
        ),
    }
}
