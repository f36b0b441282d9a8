//! Progress UI (spinner) for scrape runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use jobscraper_core::fetch::FetchError;
use jobscraper_core::{PageFailure, RunObserver, TracingObserver};
use url::Url;

/// Observer that logs through [`TracingObserver`] and, when enabled, keeps a
/// spinner on stderr showing which page is being scraped.
pub(crate) struct ProgressObserver {
    spinner: Option<ProgressBar>,
    total: u32,
    log: TracingObserver,
}

impl ProgressObserver {
    /// Starts the spinner when `use_spinner` is true.
    pub(crate) fn new(use_spinner: bool, total: u32) -> Self {
        let spinner = use_spinner.then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message("Opening session...");
            spinner
        });
        Self {
            spinner,
            total: total.max(1),
            log: TracingObserver,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.spinner.is_some()
    }

    /// Clears the spinner; safe to call when it was never started.
    pub(crate) fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    fn set_message(&self, message: String) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(message);
        }
    }
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(std::string::ToString::to_string))
        .unwrap_or_else(|| "listing".to_string())
}

impl RunObserver for ProgressObserver {
    fn on_page_start(&self, page: u32, url: &str) {
        self.log.on_page_start(page, url);
        self.set_message(format!(
            "[{}/{}] Scraping {}...",
            page.min(self.total),
            self.total,
            host_of(url)
        ));
    }

    fn on_retry(
        &self,
        page: u32,
        url: &str,
        next_attempt: u32,
        delay: Duration,
        error: &FetchError,
    ) {
        self.log.on_retry(page, url, next_attempt, delay, error);
        self.set_message(format!(
            "[{}/{}] Retrying {} (attempt {next_attempt}) in {:.1}s...",
            page.min(self.total),
            self.total,
            host_of(url),
            delay.as_secs_f64()
        ));
    }

    fn on_page_success(&self, page: u32, url: &str, records: usize) {
        self.log.on_page_success(page, url, records);
    }

    fn on_page_failure(&self, failure: &PageFailure) {
        self.log.on_page_failure(failure);
    }
}
