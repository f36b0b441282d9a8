//! Job board descriptions: page URL templates and selector mappings.
//!
//! A [`SiteProfile`] is plain data. Two profiles are built in
//! ([`BUILTIN_SITES`]); others can be loaded from JSON with
//! [`SiteProfile::from_json_file`].

mod error;
mod profile;
mod template;

pub use error::SiteError;
pub use profile::{BUILTIN_SITES, FieldRule, FieldSpec, LabelLayout, SiteProfile};
pub use template::{AREA_TOKEN, PAGE_TOKEN, ROLE_TOKEN, build_page_url, encode_search_term};
