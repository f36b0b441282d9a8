//! Sequential page-by-page run over one site.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::extract::{ExtractError, JobExtractor};
use crate::fetch::{PageFetcher, PageResult, SessionProvider, SetupError};
use crate::observer::{RunObserver, TracingObserver};
use crate::record::{PageFailure, RecordSink, RunResult};
use crate::site::SiteProfile;

/// Drives a [`PageFetcher`] and a [`JobExtractor`] over consecutive pages.
///
/// Pages are fetched one at a time in ascending order through a single
/// session opened from the [`SessionProvider`]. A page that fails is recorded
/// and skipped; only failing to open the session aborts a run.
///
/// The driver is cheap to clone; clones share the extractor, provider,
/// observer and cancel flag.
#[derive(Clone)]
pub struct PaginationDriver {
    site: Arc<SiteProfile>,
    extractor: Arc<JobExtractor>,
    provider: Arc<dyn SessionProvider>,
    fetcher: PageFetcher,
    observer: Arc<dyn RunObserver>,
    cancel: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for PaginationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationDriver")
            .field("site", &self.site.name)
            .field("fetcher", &self.fetcher)
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl PaginationDriver {
    /// Creates a driver for `site`, compiling its selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the profile's selectors or base URL are
    /// invalid.
    pub fn new(
        site: SiteProfile,
        provider: Arc<dyn SessionProvider>,
        fetcher: PageFetcher,
    ) -> Result<Self, ExtractError> {
        let extractor = JobExtractor::new(&site)?;
        debug!(
            site = %site.name,
            max_attempts = fetcher.policy().max_attempts(),
            timeout_ms = fetcher.timeout().as_millis(),
            "creating pagination driver"
        );
        Ok(Self {
            site: Arc::new(site),
            extractor: Arc::new(extractor),
            provider,
            fetcher,
            observer: Arc::new(TracingObserver),
            cancel: None,
        })
    }

    /// Replaces the default [`TracingObserver`].
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Stops runs at the next page boundary once `flag` is set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    #[must_use]
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Scrapes pages `1..=page_count` of a role/area search.
    ///
    /// A site whose URL has no page slot serves the same listing for every
    /// page, so `page_count` is capped at 1 for it.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the page URLs cannot be built or the session
    /// cannot be opened. Page failures are reported in the [`RunResult`].
    #[instrument(skip(self), fields(site = %self.site.name))]
    pub async fn run(
        &self,
        role: &str,
        area: &str,
        page_count: u32,
    ) -> Result<RunResult, SetupError> {
        let page_count = if self.site.is_paginated() || page_count <= 1 {
            page_count
        } else {
            warn!(requested = page_count, "site has no page slot, fetching one page");
            1
        };
        let urls = (1..=page_count)
            .map(|page| self.site.page_url(role, area, page))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SetupError::Site { source })?;
        self.run_pages(&urls).await
    }

    /// Scrapes a single listing page at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the session cannot be opened.
    #[instrument(skip(self), fields(site = %self.site.name))]
    pub async fn run_listing(&self, url: &str) -> Result<RunResult, SetupError> {
        self.run_pages(&[url.to_string()]).await
    }

    /// Runs [`PaginationDriver::run`] on a tokio task.
    pub fn spawn_run(
        &self,
        role: impl Into<String>,
        area: impl Into<String>,
        page_count: u32,
    ) -> JoinHandle<Result<RunResult, SetupError>> {
        let driver = self.clone();
        let role = role.into();
        let area = area.into();
        tokio::spawn(async move { driver.run(&role, &area, page_count).await })
    }

    /// Runs [`PaginationDriver::run_listing`] on a tokio task.
    pub fn spawn_listing(&self, url: impl Into<String>) -> JoinHandle<Result<RunResult, SetupError>> {
        let driver = self.clone();
        let url = url.into();
        tokio::spawn(async move { driver.run_listing(&url).await })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    async fn run_pages(&self, urls: &[String]) -> Result<RunResult, SetupError> {
        let pages_requested = u32::try_from(urls.len()).unwrap_or(u32::MAX);
        let mut session = self.provider.open().await?;
        info!(
            pages = pages_requested,
            worst_case_per_page = ?self.fetcher.max_page_duration(),
            "run started"
        );

        let mut sink = RecordSink::new(pages_requested);
        for (page, url) in (1u32..).zip(urls) {
            if self.is_cancelled() {
                info!(page, "cancellation requested, stopping run");
                sink.mark_cancelled();
                break;
            }

            self.observer.on_page_start(page, url);
            let outcome = self
                .fetcher
                .fetch(session.as_mut(), page, url, self.observer.as_ref())
                .await;

            match outcome {
                PageResult::Markup(markup) => {
                    let records = self.extractor.extract(&markup);
                    self.observer.on_page_success(page, url, records.len());
                    sink.append_page(records);
                }
                PageResult::Failure { error, attempts } => {
                    let failure = PageFailure {
                        page,
                        url: url.clone(),
                        reason: error.to_string(),
                        attempts,
                    };
                    self.observer.on_page_failure(&failure);
                    sink.record_failure(failure);
                }
            }
            debug!(page, collected = sink.len(), "page done");
        }

        session.close().await;
        let result = sink.finish();
        info!(summary = %result.summary(), "run finished");
        Ok(result)
    }
}
