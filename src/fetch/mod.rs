//! Page acquisition with bounded retry and jitter.
//!
//! # Features
//!
//! - [`PageFetcher`] - bounded attempts per page, each under a timeout
//! - [`RetryPolicy`] - attempt limit plus backoff and settle [`JitterRange`]s
//! - [`PageSession`] / [`SessionProvider`] - the per-run loading resource
//! - [`HttpSessionProvider`] - default `reqwest`-backed sessions
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use jobscraper_core::fetch::{HttpSessionProvider, PageFetcher, PageResult, RetryPolicy, SessionProvider};
//! use jobscraper_core::observer::TracingObserver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = HttpSessionProvider::new().open().await?;
//! let fetcher = PageFetcher::new(RetryPolicy::default(), Duration::from_secs(30));
//! match fetcher.fetch(session.as_mut(), 1, "https://example.com/jobs", &TracingObserver).await {
//!     PageResult::Markup(html) => println!("{} bytes", html.len()),
//!     PageResult::Failure { error, attempts } => println!("gave up after {attempts}: {error}"),
//! }
//! session.close().await;
//! # Ok(())
//! # }
//! ```

mod constants;
mod error;
mod fetcher;
mod retry;
mod session;

#[cfg(test)]
pub(crate) use fetcher::test_support;

pub use constants::{ATTEMPT_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS};
pub use error::{FetchError, SetupError};
pub use fetcher::{PageFetcher, PageResult, PauseKind, Sleeper, TokioSleeper};
pub use retry::{
    DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_SETTLE, FailureType, JitterRange,
    RetryDecision, RetryPolicy, classify_error,
};
pub use session::{HttpSession, HttpSessionProvider, PageSession, SessionProvider};
