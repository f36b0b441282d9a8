//! Bounded retry with jitter for page acquisition.
//!
//! This module provides the [`RetryPolicy`] and [`FailureType`] types for
//! classifying fetch errors and deciding whether another attempt is made.
//!
//! # Overview
//!
//! When an attempt fails, the error is classified into a [`FailureType`]:
//! - [`FailureType::Transient`] - Temporary failures that may succeed on retry
//! - [`FailureType::Permanent`] - Failures that won't succeed regardless of retries
//!
//! The [`RetryPolicy`] then decides whether to retry based on attempt count.
//! By default every failure is retried until the attempts run out; a policy
//! built with [`RetryPolicy::fail_fast_on_permanent`] gives up on permanent
//! failures after the first attempt. Unlike exponential backoff, every pause is drawn uniformly
//! from a fixed [`JitterRange`], so retries against the same site never line
//! up into a regular pattern.
//!
//! # Example
//!
//! ```
//! use jobscraper_core::fetch::{FetchError, RetryDecision, RetryPolicy, classify_error};
//!
//! let policy = RetryPolicy::default();
//! let error = FetchError::http_status("https://example.com/jobs?page=1", 503);
//!
//! match policy.should_retry(classify_error(&error), 1) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         println!("Retrying in {:?} (attempt {})", delay, attempt);
//!     }
//!     RetryDecision::DoNotRetry { reason } => {
//!         println!("Not retrying: {}", reason);
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use super::FetchError;

/// Default maximum attempts per page (including the first).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause range before a retry (3-6 seconds).
pub const DEFAULT_BACKOFF: JitterRange = JitterRange::from_millis(3_000, 6_000);

/// Default pause range after a successful load (2-4 seconds).
pub const DEFAULT_SETTLE: JitterRange = JitterRange::from_millis(2_000, 4_000);

/// Classification of fetch failure types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Temporary failure that may succeed on retry.
    ///
    /// Examples: network timeout, 5xx server errors, connection refused.
    Transient,

    /// Permanent failure that won't succeed regardless of retries.
    ///
    /// Examples: 404 Not Found, invalid URL, certificate errors.
    Permanent,
}

/// Decision on whether to retry a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// Which attempt number this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Do not retry.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// An inclusive range from which pause durations are drawn uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterRange {
    min: Duration,
    max: Duration,
}

impl JitterRange {
    /// Creates a range; the bounds are swapped if given in the wrong order.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Creates a range from millisecond bounds.
    #[must_use]
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    /// A range that always yields zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self::from_millis(0, 0)
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws a duration uniformly from `[min, max]` at millisecond resolution.
    #[must_use]
    pub fn sample(&self) -> Duration {
        let min_ms = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        if min_ms >= max_ms {
            return Duration::from_millis(min_ms);
        }
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(min_ms..=max_ms))
    }
}

/// Configuration for retry behavior with jittered pauses.
///
/// # Default Values
///
/// - `max_attempts`: 3
/// - `backoff`: 3-6 seconds before each retry
/// - `settle`: 2-4 seconds after each successful load
/// - `fail_fast`: off, so permanent failures are retried like transient ones
///
/// `max_attempts = 1` gives single-shot behavior: one attempt, no backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Pause range between a failed attempt and the next one.
    backoff: JitterRange,

    /// Pause range after a successful load, before the markup is handed on.
    settle: JitterRange,

    /// Stop after the first attempt when the failure is permanent.
    fail_fast: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            settle: DEFAULT_SETTLE,
            fail_fast: false,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with custom settings.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Maximum attempts including initial (clamped to >= 1)
    /// * `backoff` - Pause range before each retry
    /// * `settle` - Pause range after each successful load
    #[must_use]
    pub fn new(max_attempts: u32, backoff: JitterRange, settle: JitterRange) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            settle,
            fail_fast: false,
        }
    }

    /// Creates a policy with a custom max_attempts, using defaults for other settings.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Gives up on [`FailureType::Permanent`] failures (most 4xx, TLS errors,
    /// invalid URLs) without using the remaining attempts.
    #[must_use]
    pub fn fail_fast_on_permanent(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether permanent failures end the page after one attempt.
    #[must_use]
    pub fn fails_fast(&self) -> bool {
        self.fail_fast
    }

    /// A policy that never pauses; used by tests and local fixtures.
    #[must_use]
    pub fn without_pauses(max_attempts: u32) -> Self {
        Self::new(max_attempts, JitterRange::zero(), JitterRange::zero())
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn backoff(&self) -> JitterRange {
        self.backoff
    }

    #[must_use]
    pub fn settle(&self) -> JitterRange {
        self.settle
    }

    /// Draws the pause applied after a successful load.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle.sample()
    }

    /// Upper bound on the time spent pausing for one page, excluding the
    /// attempts themselves: every backoff at its maximum plus one settle.
    /// Saturates at [`Duration::MAX`].
    #[must_use]
    pub fn max_pause_per_page(&self) -> Duration {
        self.backoff
            .max()
            .checked_mul(self.max_attempts.saturating_sub(1))
            .unwrap_or(Duration::MAX)
            .saturating_add(self.settle.max())
    }

    /// Determines whether to retry a failed attempt.
    ///
    /// # Arguments
    ///
    /// * `failure_type` - Classification of the failure
    /// * `attempt` - The attempt number that just failed (1-indexed)
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if self.fail_fast && failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.backoff.sample();

        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }
}

/// Classifies a fetch error into a failure type for retry decisions.
///
/// | Error | Type |
/// |-------|------|
/// | Timeout | Transient |
/// | Network (most) / page source error | Transient |
/// | Network (TLS) | Permanent |
/// | HTTP 408, 429, 5xx | Transient |
/// | Other HTTP 4xx and unexpected codes | Permanent |
/// | InvalidUrl | Permanent |
#[instrument(level = "trace")]
pub fn classify_error(error: &FetchError) -> FailureType {
    match error {
        FetchError::HttpStatus { status, .. } => classify_http_status(*status),
        FetchError::Timeout { .. } | FetchError::Source { .. } => FailureType::Transient,
        FetchError::Network { source, .. } => {
            if is_tls_error(source) {
                FailureType::Permanent
            } else {
                FailureType::Transient
            }
        }
        FetchError::InvalidUrl { .. } => FailureType::Permanent,
    }
}

#[allow(clippy::match_same_arms)]
fn classify_http_status(status: u16) -> FailureType {
    match status {
        408 => FailureType::Transient, // Request Timeout
        429 => FailureType::Transient, // Too Many Requests
        status if (400..500).contains(&status) => FailureType::Permanent,
        status if (500..600).contains(&status) => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}

/// Checks if a reqwest error is a TLS/certificate error.
fn is_tls_error(error: &reqwest::Error) -> bool {
    let error_string = error.to_string().to_lowercase();
    error_string.contains("certificate")
        || error_string.contains("tls")
        || error_string.contains("ssl")
        || error_string.contains("handshake")
}
