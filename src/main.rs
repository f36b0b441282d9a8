//! CLI entry point for the jobscraper tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

mod app;
mod app_config;
mod cli;
mod output;

use app_config::{RunSettings, load_config, resolve_default_log_level};
use cli::Args;

/// Process outcome, mapped to the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every requested page succeeded, or none were requested.
    Success,
    /// Some pages failed but at least one succeeded.
    Partial,
    /// Every requested page failed.
    Failure,
}

impl ProcessExit {
    fn exit_code(self) -> ExitCode {
        match self {
            Self::Success | Self::Partial => ExitCode::SUCCESS,
            Self::Failure => ExitCode::from(2),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded = load_config(args.config.as_deref())?;

    // Priority: -q/-v flags > RUST_LOG env var > config verbosity > info
    let verbosity = loaded.config.as_ref().and_then(|config| config.verbosity);
    let default_level = resolve_default_log_level(args.quiet, args.verbose, verbosity);
    app::terminal::init_tracing(
        default_level,
        args.quiet || args.verbose > 0,
        app::terminal::no_color_env_requested() || app::terminal::is_dumb_terminal(),
    );

    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");
    info!("Jobscraper starting");

    let settings = RunSettings::resolve(&args, loaded.config.as_ref());
    let outcome = app::runtime::run(&args, &settings).await?;
    Ok(outcome.exit_code())
}
