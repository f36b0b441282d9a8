//! Job records and the per-run result sink.
//!
//! A [`JobRecord`] is a fixed-shape value: every field is always present and
//! holds either real text or [`SENTINEL`]. Records are appended to a
//! [`RecordSink`] while a run is in progress and frozen into a read-only
//! [`RunResult`] once the run completes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder stored in a field whose value was not present in the markup.
pub const SENTINEL: &str = "N/A";

/// Default length of [`JobRecord::description_preview`].
pub const DEFAULT_PREVIEW_CHARS: usize = 150;

/// Column headers for tabular display, matching [`JobRecord::table_row`].
pub const TABLE_COLUMNS: [&str; 6] = [
    "Job Title",
    "Salary",
    "Location",
    "Category",
    "Closing Date",
    "Contract",
];

/// The named fields of a [`JobRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Company,
    Location,
    Salary,
    Category,
    Contract,
    ClosingDate,
    Description,
    Link,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 9] = [
        Field::Title,
        Field::Company,
        Field::Location,
        Field::Salary,
        Field::Category,
        Field::Contract,
        Field::ClosingDate,
        Field::Description,
        Field::Link,
    ];

    /// Returns the stable snake_case name used in config files and JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Company => "company",
            Self::Location => "location",
            Self::Salary => "salary",
            Self::Category => "category",
            Self::Contract => "contract",
            Self::ClosingDate => "closing_date",
            Self::Description => "description",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    title: String,
    company: String,
    location: String,
    salary: String,
    category: String,
    contract: String,
    closing_date: String,
    description: String,
    link: String,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::from_fn(|_| SENTINEL.to_string())
    }
}

impl JobRecord {
    /// Builds a record by asking `value` for every field.
    ///
    /// Empty values are stored as [`SENTINEL`].
    pub fn from_fn(mut value: impl FnMut(Field) -> String) -> Self {
        let mut take = |field| {
            let v = value(field);
            if v.is_empty() { SENTINEL.to_string() } else { v }
        };
        Self {
            title: take(Field::Title),
            company: take(Field::Company),
            location: take(Field::Location),
            salary: take(Field::Salary),
            category: take(Field::Category),
            contract: take(Field::Contract),
            closing_date: take(Field::ClosingDate),
            description: take(Field::Description),
            link: take(Field::Link),
        }
    }

    /// Returns the value of `field`.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Company => &self.company,
            Field::Location => &self.location,
            Field::Salary => &self.salary,
            Field::Category => &self.category,
            Field::Contract => &self.contract,
            Field::ClosingDate => &self.closing_date,
            Field::Description => &self.description,
            Field::Link => &self.link,
        }
    }

    /// Returns true when `field` holds the sentinel.
    #[must_use]
    pub fn is_missing(&self, field: Field) -> bool {
        self.get(field) == SENTINEL
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn salary(&self) -> &str {
        &self.salary
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn contract(&self) -> &str {
        &self.contract
    }

    #[must_use]
    pub fn closing_date(&self) -> &str {
        &self.closing_date
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Absolute URL of the listing, or [`SENTINEL`].
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Returns at most `max_chars` characters of the description, with `...`
    /// appended when it was cut. The stored description is unchanged.
    #[must_use]
    pub fn description_preview(&self, max_chars: usize) -> String {
        let mut chars = self.description.char_indices();
        match chars.nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.description[..cut]),
            None => self.description.clone(),
        }
    }

    /// Row values for tabular display, in [`TABLE_COLUMNS`] order.
    #[must_use]
    pub fn table_row(&self) -> [&str; 6] {
        [
            &self.title,
            &self.salary,
            &self.location,
            &self.category,
            &self.closing_date,
            &self.contract,
        ]
    }
}

/// A page that exhausted its attempts and contributed no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    /// 1-indexed page number.
    pub page: u32,
    /// URL that was requested.
    pub url: String,
    /// Display form of the last error.
    pub reason: String,
    /// Number of attempts made.
    pub attempts: u32,
}

/// Append-only accumulator used by the driver while a run is in progress.
#[derive(Debug, Default)]
pub(crate) struct RecordSink {
    records: Vec<JobRecord>,
    pages_requested: u32,
    pages_succeeded: u32,
    failures: Vec<PageFailure>,
    cancelled: bool,
}

impl RecordSink {
    pub(crate) fn new(pages_requested: u32) -> Self {
        Self {
            pages_requested,
            ..Self::default()
        }
    }

    pub(crate) fn append_page(&mut self, records: Vec<JobRecord>) {
        self.pages_succeeded += 1;
        self.records.extend(records);
    }

    pub(crate) fn record_failure(&mut self, failure: PageFailure) {
        self.failures.push(failure);
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn finish(self) -> RunResult {
        RunResult {
            records: self.records,
            pages_requested: self.pages_requested,
            pages_succeeded: self.pages_succeeded,
            failures: self.failures,
            cancelled: self.cancelled,
        }
    }
}

/// The frozen outcome of one run.
///
/// Records are in page order, then document order within each page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    records: Vec<JobRecord>,
    pages_requested: u32,
    pages_succeeded: u32,
    failures: Vec<PageFailure>,
    cancelled: bool,
}

impl RunResult {
    #[must_use]
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// Consumes the result, returning the records.
    #[must_use]
    pub fn into_records(self) -> Vec<JobRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of pages the caller asked for.
    #[must_use]
    pub fn pages_requested(&self) -> u32 {
        self.pages_requested
    }

    /// Number of pages whose markup was fetched and extracted.
    #[must_use]
    pub fn pages_succeeded(&self) -> u32 {
        self.pages_succeeded
    }

    /// Pages that failed after all attempts, in page order.
    #[must_use]
    pub fn failures(&self) -> &[PageFailure] {
        &self.failures
    }

    /// True when the run stopped early because cancellation was requested.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True when pages were requested and none of them succeeded.
    #[must_use]
    pub fn all_pages_failed(&self) -> bool {
        self.pages_requested > 0 && self.pages_succeeded == 0
    }

    /// One-line human summary, e.g. `requested 5 pages, 4 pages succeeded, 37 jobs`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "requested {} pages, {} pages succeeded, {} jobs",
            self.pages_requested,
            self.pages_succeeded,
            self.records.len()
        );
        if self.cancelled {
            line.push_str(" (cancelled)");
        }
        line
    }
}
