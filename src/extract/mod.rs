//! Markup to records.
//!
//! [`JobExtractor`] selects item blocks from a listing page and fills each
//! [`JobRecord`](crate::record::JobRecord) field by either a direct selector
//! or a label/value pair lookup, as described by a
//! [`SiteProfile`](crate::site::SiteProfile).

mod error;
mod extractor;
mod link;
mod text;

pub use error::ExtractError;
pub use extractor::JobExtractor;
pub use link::resolve_link;
pub use text::normalize_ws;
