//! CLI output formatting and display helpers.

use std::io::Write;

use anyhow::{Context, Result, bail};
use jobscraper_core::record::{DEFAULT_PREVIEW_CHARS, TABLE_COLUMNS};
use jobscraper_core::{Field, JobRecord, RunResult};
use tracing::info;

/// Column widths for `--format table`, in [`TABLE_COLUMNS`] order.
const TABLE_WIDTHS: [usize; 6] = [34, 18, 18, 18, 12, 14];

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// `1. title | company | location | link`, one line per record.
pub(crate) fn write_lines(out: &mut impl Write, records: &[JobRecord]) -> Result<()> {
    for (idx, job) in records.iter().enumerate() {
        writeln!(
            out,
            "{}. {} | {} | {} | {}",
            idx + 1,
            job.title(),
            job.company(),
            job.location(),
            job.link()
        )?;
    }
    Ok(())
}

/// Fixed-width table of [`TABLE_COLUMNS`] followed by a `Jobs: N` line.
///
/// Columns are shrunk proportionally when `width` is narrower than the
/// default layout.
pub(crate) fn write_table(out: &mut impl Write, records: &[JobRecord], width: usize) -> Result<()> {
    let widths = fit_widths(width);
    writeln!(out, "{}", table_line(TABLE_COLUMNS, &widths))?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    )?;
    for job in records {
        writeln!(out, "{}", table_line(job.table_row(), &widths))?;
    }
    writeln!(out, "Jobs: {}", records.len())?;
    Ok(())
}

fn fit_widths(width: usize) -> [usize; 6] {
    let separators = 3 * (TABLE_WIDTHS.len() - 1);
    let natural: usize = TABLE_WIDTHS.iter().sum::<usize>() + separators;
    if width >= natural {
        return TABLE_WIDTHS;
    }
    let available = width.saturating_sub(separators);
    let total: usize = TABLE_WIDTHS.iter().sum();
    TABLE_WIDTHS.map(|w| (w * available / total).max(4))
}

fn table_line(cells: [&str; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", truncate_to_width(cell, width)))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// JSON array of records.
pub(crate) fn write_json(out: &mut impl Write, result: &RunResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, result.records())
        .context("Failed to serialize records")?;
    writeln!(out)?;
    Ok(())
}

/// Every field of one record, with the full description.
pub(crate) fn write_details(out: &mut impl Write, number: u64, job: &JobRecord) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "#{number} {}", job.title())?;
    for field in Field::ALL {
        if matches!(field, Field::Title | Field::Description) {
            continue;
        }
        writeln!(out, "  {:<13} {}", format!("{field}:"), job.get(field))?;
    }
    writeln!(out, "  description:")?;
    writeln!(out, "    {}", job.description())?;
    Ok(())
}

/// Looks up a 1-indexed record.
pub(crate) fn nth_record(result: &RunResult, number: u64) -> Result<&JobRecord> {
    let index = usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .context("Listing numbers start at 1")?;
    match result.records().get(index) {
        Some(job) => Ok(job),
        None => bail!(
            "No listing #{number}: the run collected {} listing(s)",
            result.len()
        ),
    }
}

/// Opens a record's link in the default browser.
pub(crate) fn open_link(number: u64, job: &JobRecord) -> Result<()> {
    if job.is_missing(Field::Link) {
        bail!("Listing #{number} has no link to open");
    }
    info!(
        number,
        title = %job.title(),
        preview = %job.description_preview(DEFAULT_PREVIEW_CHARS),
        "opening listing"
    );
    open::that(job.link()).with_context(|| format!("Failed to open '{}'", job.link()))
}
