//! Error types for page acquisition.
//!
//! [`FetchError`] describes why a single attempt to load a page failed.
//! [`SetupError`] describes why a run could not start at all.

use thiserror::Error;

use crate::site::SiteError;

/// Errors that can occur while loading one listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed to load.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error from a non-HTTP page source.
    #[error("error fetching {url}: {message}")]
    Source {
        /// The URL that failed to load.
        url: String,
        /// Description supplied by the page source.
        message: String,
    },

    /// The attempt did not complete within the per-attempt timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-2xx HTTP response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The page URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a transient error reported by a custom page source.
    pub fn source(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// The page session for a run could not be acquired. Fatal to the run.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// A custom session provider refused to open a session.
    #[error("failed to open page session: {message}")]
    Session {
        /// Description supplied by the provider.
        message: String,
    },

    /// The page URLs for the run could not be built.
    #[error("cannot build page URLs: {source}")]
    Site {
        /// The profile error.
        #[source]
        source: SiteError,
    },

    /// The run task was cancelled or panicked before producing a result.
    #[error("run task did not complete: {message}")]
    Join {
        /// Description of the join failure.
        message: String,
    },
}

impl SetupError {
    /// Creates a session error from a provider message.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Creates a join error from a failed run task.
    pub fn join(error: &tokio::task::JoinError) -> Self {
        Self::Join {
            message: error.to_string(),
        }
    }
}

// No `From<reqwest::Error>`: callers go through the constructors, which carry the URL.
