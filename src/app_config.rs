//! Application configuration loading for CLI defaults.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use jobscraper_core::fetch::{
    ATTEMPT_TIMEOUT_SECS, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_SETTLE, JitterRange,
    RetryPolicy,
};
use serde::Deserialize;

use crate::cli::Args;

const DEFAULT_PAGES: u32 = 1;
const MAX_PAUSE_MS: u64 = 60_000;

/// JSON-backed file configuration for scraper defaults.
///
/// Every key is optional; values given on the command line win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Attempts per page, including the first.
    pub max_attempts: Option<u32>,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Lower bound of the pause before a retry, in milliseconds.
    pub backoff_min_ms: Option<u64>,
    /// Upper bound of the pause before a retry, in milliseconds.
    pub backoff_max_ms: Option<u64>,
    /// Lower bound of the pause after a successful load, in milliseconds.
    pub settle_min_ms: Option<u64>,
    /// Upper bound of the pause after a successful load, in milliseconds.
    pub settle_max_ms: Option<u64>,
    /// Default number of result pages.
    pub pages: Option<u32>,
    /// User-Agent sent with every request.
    pub user_agent: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Give up on 4xx, TLS and invalid-URL failures after one attempt.
    pub fail_fast_on_permanent: Option<bool>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(max_attempts) = self.max_attempts
            && !(1..=10).contains(&max_attempts)
        {
            bail!("Invalid config value for `max_attempts`: {max_attempts}. Expected range: 1..=10");
        }
        if let Some(timeout_secs) = self.timeout_secs
            && !(1..=600).contains(&timeout_secs)
        {
            bail!("Invalid config value for `timeout_secs`: {timeout_secs}. Expected range: 1..=600");
        }
        if let Some(pages) = self.pages
            && pages > 50
        {
            bail!("Invalid config value for `pages`: {pages}. Expected range: 0..=50");
        }
        validate_pause_pair("backoff", self.backoff_min_ms, self.backoff_max_ms)?;
        validate_pause_pair("settle", self.settle_min_ms, self.settle_max_ms)?;
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }
        Ok(())
    }
}

fn validate_pause_pair(name: &str, min: Option<u64>, max: Option<u64>) -> Result<()> {
    for (suffix, value) in [("min_ms", min), ("max_ms", max)] {
        if let Some(value) = value
            && value > MAX_PAUSE_MS
        {
            bail!(
                "Invalid config value for `{name}_{suffix}`: {value}. Expected range: 0..={MAX_PAUSE_MS}"
            );
        }
    }
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        bail!("Invalid config values: `{name}_min_ms` ({min}) exceeds `{name}_max_ms` ({max})");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Path the config was read from, when one was.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/jobscraper/config.json`
/// 2. `$HOME/.config/jobscraper/config.json`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("jobscraper")
                .join("config.json"),
        );
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("jobscraper")
            .join("config.json"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` (which must exist) or from the default path
/// if a file is present there.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let Some(path) = resolve_default_config_path() else {
        return Ok(LoadedConfig::default());
    };
    if !path.exists() {
        return Ok(LoadedConfig::default());
    }
    let config = load_file_config(&path)?;
    Ok(LoadedConfig {
        path: Some(path),
        config: Some(config),
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

/// Effective run settings after merging CLI flags, file config and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff: JitterRange,
    pub settle: JitterRange,
    pub pages: u32,
    pub user_agent: Option<String>,
    pub fail_fast_on_permanent: bool,
}

impl RunSettings {
    /// Merges `args` over `file` over built-in defaults.
    #[must_use]
    pub fn resolve(args: &Args, file: Option<&FileConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();
        Self {
            max_attempts: args
                .max_attempts
                .or(file.max_attempts)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            timeout: Duration::from_secs(
                args.timeout_secs
                    .or(file.timeout_secs)
                    .unwrap_or(ATTEMPT_TIMEOUT_SECS),
            ),
            backoff: jitter_range(DEFAULT_BACKOFF, file.backoff_min_ms, file.backoff_max_ms),
            settle: jitter_range(DEFAULT_SETTLE, file.settle_min_ms, file.settle_max_ms),
            pages: args.pages.or(file.pages).unwrap_or(DEFAULT_PAGES),
            user_agent: file.user_agent,
            fail_fast_on_permanent: file.fail_fast_on_permanent.unwrap_or(false),
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff, self.settle)
            .fail_fast_on_permanent(self.fail_fast_on_permanent)
    }
}

fn jitter_range(default: JitterRange, min_ms: Option<u64>, max_ms: Option<u64>) -> JitterRange {
    let min = min_ms.map_or(default.min(), Duration::from_millis);
    let max = max_ms.map_or(default.max(), Duration::from_millis);
    JitterRange::new(min, max)
}

/// Default log level from CLI flags, falling back to the config verbosity.
///
/// Priority: `--quiet` > `-v`/`-vv` > config `verbosity` > info.
pub(crate) fn resolve_default_log_level(
    quiet: bool,
    verbose: u8,
    config: Option<VerbositySetting>,
) -> &'static str {
    if quiet {
        return "error";
    }
    match (verbose, config) {
        (1, _) => "debug",
        (2.., _) => "trace",
        (0, Some(VerbositySetting::Quiet)) => "error",
        (0, Some(VerbositySetting::Verbose)) => "debug",
        (0, Some(VerbositySetting::Debug)) => "trace",
        (0, Some(VerbositySetting::Default) | None) => "info",
    }
}
