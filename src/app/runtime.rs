//! Scrape run: site selection, driver setup, output and exit outcome.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use jobscraper_core::{
    HttpSessionProvider, PageFetcher, PaginationDriver, RunObserver, SetupError, SiteProfile,
};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::exit_handler::determine_exit_outcome;
use crate::app::progress_manager::ProgressObserver;
use crate::app::terminal;
use crate::app_config::RunSettings;
use crate::cli::{Args, OutputFormat};
use crate::output;

const DEFAULT_SITE: &str = "cwjobs";

/// What a run fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunTarget {
    /// Pages `1..=pages` of a templated search.
    Search {
        role: String,
        area: String,
        pages: u32,
    },
    /// One listing page.
    Listing(String),
}

impl RunTarget {
    fn page_count(&self) -> u32 {
        match self {
            Self::Search { pages, .. } => *pages,
            Self::Listing(_) => 1,
        }
    }
}

/// Picks the site profile from `--site-file`, `--site`, or the default.
pub(crate) fn load_site(args: &Args) -> Result<SiteProfile> {
    if let Some(path) = &args.site_file {
        return SiteProfile::from_json_file(path)
            .with_context(|| format!("Failed to load site profile '{}'", path.display()));
    }
    let name = args.site.as_deref().unwrap_or(DEFAULT_SITE);
    Ok(SiteProfile::builtin(name)?)
}

/// `--url` wins; templated sites run a search; fixed listing URLs run once.
pub(crate) fn plan_run(args: &Args, site: &SiteProfile, pages: u32) -> RunTarget {
    if let Some(url) = &args.url {
        return RunTarget::Listing(url.clone());
    }
    if site.is_search() || site.is_paginated() {
        return RunTarget::Search {
            role: args.role.clone().unwrap_or_default(),
            area: args.area.clone().unwrap_or_default(),
            pages,
        };
    }
    RunTarget::Listing(site.url_template.clone())
}

pub(crate) async fn run(args: &Args, settings: &RunSettings) -> Result<ProcessExit> {
    let site = load_site(args)?;
    let target = plan_run(args, &site, settings.pages);
    debug!(site = %site.name, ?target, ?settings, "run planned");

    let mut provider = HttpSessionProvider::new();
    if let Some(user_agent) = &settings.user_agent {
        provider = provider.with_user_agent(user_agent);
    }
    let fetcher = PageFetcher::new(settings.retry_policy(), settings.timeout);

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let use_spinner = terminal::should_use_spinner(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );
    let progress = Arc::new(ProgressObserver::new(use_spinner, target.page_count()));
    debug!(spinner = progress.is_active(), "progress reporting ready");

    let driver = PaginationDriver::new(site, Arc::new(provider), fetcher)?
        .with_observer(Arc::clone(&progress) as Arc<dyn RunObserver>)
        .with_cancel_flag(interrupted);

    let handle = match target {
        RunTarget::Search { role, area, pages } => driver.spawn_run(role, area, pages),
        RunTarget::Listing(url) => driver.spawn_listing(url),
    };
    let joined = handle.await.map_err(|e| SetupError::join(&e));
    progress.finish();
    let result = joined??;

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Lines => output::write_lines(&mut stdout, result.records())?,
        OutputFormat::Table => {
            output::write_table(&mut stdout, result.records(), output::terminal_width())?;
        }
        OutputFormat::Json => output::write_json(&mut stdout, &result)?,
    }

    if let Some(number) = args.show {
        match output::nth_record(&result, number) {
            Ok(job) => output::write_details(&mut stdout, number, job)?,
            Err(e) => warn!(error = %e, "Cannot show listing"),
        }
    }
    stdout.flush()?;

    if let Some(number) = args.open {
        let opened =
            output::nth_record(&result, number).and_then(|job| output::open_link(number, job));
        if let Err(e) = opened {
            let message = format!("{e:#}");
            warn!(error = %message, "Cannot open listing");
        }
    }

    for failure in result.failures() {
        warn!(page = failure.page, url = %failure.url, reason = %failure.reason, "Page skipped");
    }
    info!("{}", result.summary());

    let outcome = determine_exit_outcome(result.pages_succeeded(), result.failures().len());
    if outcome == ProcessExit::Failure {
        warn!("Every requested page failed");
    }
    Ok(outcome)
}
