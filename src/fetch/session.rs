//! Page sessions: the per-run resource that actually loads markup.
//!
//! A [`SessionProvider`] opens one [`PageSession`] per run. The session is
//! owned exclusively by the driver for the duration of the run and is closed
//! when the run ends. [`HttpSessionProvider`] is the default implementation,
//! backed by a pooled `reqwest` client; other providers (a headless browser,
//! a scripted fake in tests) plug in through the same traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{debug, instrument};
use url::Url;

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::{FetchError, SetupError};
use crate::user_agent;

/// A live, exclusively-owned context for loading pages during one run.
#[async_trait]
pub trait PageSession: Send {
    /// Loads `url` and returns its full markup.
    ///
    /// The caller bounds each call with its own timeout; implementations do
    /// not need to enforce one.
    async fn load(&mut self, url: &str) -> Result<String, FetchError>;

    /// Releases the session. Called exactly once, at the end of the run.
    async fn close(self: Box<Self>);
}

/// Opens page sessions. One session is opened per run.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the underlying resource cannot be acquired.
    async fn open(&self) -> Result<Box<dyn PageSession>, SetupError>;
}

/// Provides HTTP-backed sessions.
#[derive(Debug, Clone)]
pub struct HttpSessionProvider {
    user_agent: String,
    connect_timeout: Duration,
}

impl Default for HttpSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSessionProvider {
    /// Creates a provider with the default User-Agent and connect timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_agent: user_agent::default_user_agent(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    /// Overrides the User-Agent sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the TCP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    #[instrument(level = "debug", skip(self))]
    async fn open(&self) -> Result<Box<dyn PageSession>, SetupError> {
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .gzip(true)
            .build()
            .map_err(|source| SetupError::Client { source })?;
        debug!(user_agent = %self.user_agent, "HTTP session opened");
        Ok(Box::new(HttpSession {
            client,
            user_agent: self.user_agent.clone(),
            pages_loaded: 0,
        }))
    }
}

/// An HTTP session; connections are pooled across the pages of one run.
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    user_agent: String,
    pages_loaded: u32,
}

#[async_trait]
impl PageSession for HttpSession {
    async fn load(&mut self, url: &str) -> Result<String, FetchError> {
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;
        self.pages_loaded += 1;
        debug!(url, bytes = body.len(), "page loaded");
        Ok(body)
    }

    async fn close(self: Box<Self>) {
        debug!(pages_loaded = self.pages_loaded, "HTTP session closed");
    }
}

fn map_reqwest_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(url)
    } else {
        FetchError::network(url, error)
    }
}
