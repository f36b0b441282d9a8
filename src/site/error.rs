//! Site profile errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`SiteProfile`](super::SiteProfile).
#[derive(Debug, Error)]
pub enum SiteError {
    /// No built-in profile has this name.
    #[error("unknown site '{name}' (available: {available})")]
    UnknownSite { name: String, available: String },

    /// The profile file could not be read.
    #[error("cannot read site profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile file is not valid profile JSON.
    #[error("invalid site profile {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The profile parsed but is internally inconsistent.
    #[error("site profile '{name}' is invalid: {message}")]
    Invalid { name: String, message: String },

    /// A search was requested without the terms the URL template needs.
    #[error("site '{name}' needs {missing} to build page URLs")]
    MissingSearchTerm { name: String, missing: &'static str },
}

impl SiteError {
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn unknown_site(name: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownSite {
            name: name.into(),
            available: available.join(", "),
        }
    }
}
