//! Jobscraper Core Library
//!
//! Collects job listings from paginated job-board search results and turns
//! each listing block into a fixed-shape [`JobRecord`].
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`site`] - Site profiles: URL templates and selector mappings
//! - [`fetch`] - Page sessions and the retrying, jittered page fetcher
//! - [`extract`] - Item-block discovery and field extraction
//! - [`driver`] - Sequential pagination over a site
//! - [`record`] - Job records and run results
//! - [`observer`] - Page-level progress callbacks
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use jobscraper_core::{HttpSessionProvider, PageFetcher, PaginationDriver, SiteProfile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = PaginationDriver::new(
//!     SiteProfile::cwjobs(),
//!     Arc::new(HttpSessionProvider::new()),
//!     PageFetcher::default(),
//! )?;
//! let result = driver.run("Python Developer", "London", 2).await?;
//! for (idx, job) in result.records().iter().enumerate() {
//!     println!("{}. {} | {} | {}", idx + 1, job.title(), job.company(), job.link());
//! }
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod driver;
pub mod extract;
pub mod fetch;
pub mod observer;
pub mod record;
pub mod site;
mod user_agent;

// Re-export commonly used types
pub use driver::PaginationDriver;
pub use extract::{ExtractError, JobExtractor, resolve_link};
pub use fetch::{
    DEFAULT_MAX_ATTEMPTS, FailureType, FetchError, HttpSessionProvider, JitterRange, PageFetcher,
    PageResult, PageSession, RetryDecision, RetryPolicy, SessionProvider, SetupError,
    classify_error,
};
pub use observer::{NoopObserver, RunObserver, TracingObserver};
pub use record::{Field, JobRecord, PageFailure, RunResult, SENTINEL};
pub use site::{FieldRule, FieldSpec, SiteError, SiteProfile};
