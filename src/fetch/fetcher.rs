//! Page fetcher: bounded attempts, jittered backoff, settle pause.
//!
//! [`PageFetcher::fetch`] drives a [`PageSession`] through up to
//! `max_attempts` loads of one URL. Each attempt is bounded by the
//! per-attempt timeout. Between failed attempts it pauses for a duration drawn
//! from the policy's backoff range; after a successful load it pauses once
//! more (the settle range) before handing the markup on. All pauses go through
//! a [`Sleeper`] so tests can observe them without waiting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::constants::ATTEMPT_TIMEOUT_SECS;
use super::error::FetchError;
use super::retry::{RetryDecision, RetryPolicy, classify_error};
use super::session::PageSession;
use crate::observer::RunObserver;

/// Outcome of fetching one page.
#[derive(Debug)]
pub enum PageResult {
    /// The page's full markup.
    Markup(String),
    /// Every permitted attempt failed, or the policy gave up on a permanent
    /// failure.
    Failure {
        /// The error from the last attempt.
        error: FetchError,
        /// Number of attempts made.
        attempts: u32,
    },
}

impl PageResult {
    #[must_use]
    pub fn is_markup(&self) -> bool {
        matches!(self, Self::Markup(_))
    }
}

/// Why the fetcher is pausing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseKind {
    /// Waiting before the next attempt after a failure.
    Backoff,
    /// Waiting after a successful load before the markup is read.
    Settle,
}

/// Performs the fetcher's pauses.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn pause(&self, kind: PauseKind, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn pause(&self, kind: PauseKind, duration: Duration) {
        debug!(?kind, delay_ms = duration.as_millis(), "pausing");
        tokio::time::sleep(duration).await;
    }
}

/// Fetches single pages according to a [`RetryPolicy`].
#[derive(Clone)]
pub struct PageFetcher {
    policy: RetryPolicy,
    timeout: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new(
            RetryPolicy::default(),
            Duration::from_secs(ATTEMPT_TIMEOUT_SECS),
        )
    }
}

impl PageFetcher {
    /// Creates a fetcher that pauses on the tokio timer.
    #[must_use]
    pub fn new(policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            policy,
            timeout,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces the sleeper used for backoff and settle pauses.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Worst-case wall time for one page: every attempt timing out, plus
    /// every pause at its maximum. Saturates at [`Duration::MAX`].
    #[must_use]
    pub fn max_page_duration(&self) -> Duration {
        self.timeout
            .checked_mul(self.policy.max_attempts())
            .unwrap_or(Duration::MAX)
            .saturating_add(self.policy.max_pause_per_page())
    }

    /// Loads `url` through `session`, retrying transient failures.
    ///
    /// Never returns an error: exhausted or permanent failures are reported as
    /// [`PageResult::Failure`].
    #[instrument(skip(self, session, observer))]
    pub async fn fetch(
        &self,
        session: &mut dyn PageSession,
        page: u32,
        url: &str,
        observer: &dyn RunObserver,
    ) -> PageResult {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(attempt, "attempting page load");

            let outcome = match tokio::time::timeout(self.timeout, session.load(url)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::timeout(url)),
            };

            match outcome {
                Ok(markup) => {
                    self.sleeper
                        .pause(PauseKind::Settle, self.policy.settle_delay())
                        .await;
                    return PageResult::Markup(markup);
                }
                Err(error) => match self.policy.should_retry(classify_error(&error), attempt) {
                    RetryDecision::Retry {
                        delay,
                        attempt: next_attempt,
                    } => {
                        observer.on_retry(page, url, next_attempt, delay, &error);
                        self.sleeper.pause(PauseKind::Backoff, delay).await;
                    }
                    RetryDecision::DoNotRetry { reason } => {
                        debug!(%reason, attempts = attempt, "giving up on page");
                        return PageResult::Failure {
                            error,
                            attempts: attempt,
                        };
                    }
                },
            }
        }
    }
}
