//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Collect job listings from job-board search results.
///
/// Scrapes one or more result pages of a job board, retrying flaky pages with
/// jittered pauses, and prints one line per listing.
#[derive(Parser, Debug)]
#[command(name = "jobscraper")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Built-in site profile (cwjobs, northeastjobs) [default: cwjobs]
    #[arg(short = 's', long, conflicts_with = "site_file")]
    pub site: Option<String>,

    /// Load the site profile from a JSON file instead of a built-in one
    #[arg(long, value_name = "FILE")]
    pub site_file: Option<PathBuf>,

    /// Job role to search for, e.g. "Python Developer"
    #[arg(long)]
    pub role: Option<String>,

    /// Area to search in, e.g. "London"
    #[arg(long)]
    pub area: Option<String>,

    /// Number of result pages to scrape (0-50) [default: 1]
    #[arg(short = 'p', long, value_parser = clap::value_parser!(u32).range(0..=50))]
    pub pages: Option<u32>,

    /// Scrape this single listing URL instead of building search URLs
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Attempts per page, including the first (1-10) [default: 3]
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_attempts: Option<u32>,

    /// Per-attempt timeout in seconds (1-600) [default: 30]
    #[arg(long = "timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout_secs: Option<u64>,

    /// Output format for the collected listings
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Lines)]
    pub format: OutputFormat,

    /// Print the full details of listing N (1-indexed) after the list
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub show: Option<u64>,

    /// Open listing N's link (1-indexed) in the default browser
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub open: Option<u64>,

    /// Config file path [default: $XDG_CONFIG_HOME/jobscraper/config.json]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// How listings are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `N. title | company | location | link`
    Lines,
    /// Fixed-width columns with a job count footer
    Table,
    /// JSON array of records
    Json,
}
