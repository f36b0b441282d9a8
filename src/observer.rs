//! Run observers: callbacks for page-level progress and failures.
//!
//! The driver reports through a [`RunObserver`] instead of logging directly,
//! so callers decide how progress is surfaced (log lines, a spinner, a test
//! recorder). [`TracingObserver`] is the default.

use std::time::Duration;

use tracing::{info, warn};

use crate::fetch::FetchError;
use crate::record::PageFailure;

/// Receives page-level events from a run. All methods default to no-ops.
pub trait RunObserver: Send + Sync {
    /// A page is about to be fetched.
    fn on_page_start(&self, _page: u32, _url: &str) {}

    /// An attempt failed and another one will follow after `delay`.
    fn on_retry(
        &self,
        _page: u32,
        _url: &str,
        _next_attempt: u32,
        _delay: Duration,
        _error: &FetchError,
    ) {
    }

    /// A page was fetched and `records` records were extracted from it.
    fn on_page_success(&self, _page: u32, _url: &str, _records: usize) {}

    /// A page exhausted its attempts; the run continues with the next page.
    fn on_page_failure(&self, _failure: &PageFailure) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_page_start(&self, page: u32, url: &str) {
        info!(page, url, "scraping page");
    }

    fn on_retry(
        &self,
        page: u32,
        url: &str,
        next_attempt: u32,
        delay: Duration,
        error: &FetchError,
    ) {
        info!(
            page,
            url,
            attempt = next_attempt,
            delay_ms = delay.as_millis(),
            error = %error,
            "retrying page"
        );
    }

    fn on_page_success(&self, page: u32, url: &str, records: usize) {
        info!(page, url, records, "page scraped");
    }

    fn on_page_failure(&self, failure: &PageFailure) {
        warn!(
            page = failure.page,
            url = %failure.url,
            attempts = failure.attempts,
            reason = %failure.reason,
            "skipping page after failed attempts"
        );
    }
}
