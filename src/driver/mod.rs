//! Run orchestration.
//!
//! [`PaginationDriver`] ties a [`SiteProfile`](crate::site::SiteProfile), a
//! [`SessionProvider`](crate::fetch::SessionProvider) and a
//! [`PageFetcher`](crate::fetch::PageFetcher) together and produces a
//! [`RunResult`](crate::record::RunResult).

mod pagination;

pub use pagination::PaginationDriver;
