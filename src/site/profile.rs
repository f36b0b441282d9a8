//! Site profiles: the URL template and selector mapping for one job board.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::error::SiteError;
use super::template::{AREA_TOKEN, PAGE_TOKEN, ROLE_TOKEN, build_page_url};
use crate::record::Field;

/// Names of the profiles compiled into the binary.
pub const BUILTIN_SITES: [&str; 2] = ["cwjobs", "northeastjobs"];

fn default_separator() -> String {
    "-".to_string()
}

fn default_label_selector() -> String {
    "span.item_label".to_string()
}

fn default_label_terminator() -> char {
    ':'
}

/// How one field of a record is located inside an item block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    /// First element under the block matching `selector`; its normalized
    /// text, or the value of `attr` when set.
    Select {
        selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attr: Option<String>,
    },
    /// Value paired with the label text `label` by the site's
    /// [`LabelLayout`]; `default` (or the sentinel) when the label is absent.
    Label {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

/// One entry of a profile's field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: Field,
    #[serde(flatten)]
    pub rule: FieldRule,
}

impl FieldSpec {
    #[must_use]
    pub fn select(field: Field, selector: &str) -> Self {
        Self {
            field,
            rule: FieldRule::Select {
                selector: selector.to_string(),
                attr: None,
            },
        }
    }

    #[must_use]
    pub fn attr(field: Field, selector: &str, attr: &str) -> Self {
        Self {
            field,
            rule: FieldRule::Select {
                selector: selector.to_string(),
                attr: Some(attr.to_string()),
            },
        }
    }

    #[must_use]
    pub fn label(field: Field, label: &str) -> Self {
        Self {
            field,
            rule: FieldRule::Label {
                label: label.to_string(),
                default: None,
            },
        }
    }
}

/// Where label/value pairs live inside an item block.
///
/// Each element matching `label_selector` (searched within the first
/// `scope` match, or the whole block) is a label. Its text, minus a trailing
/// `terminator`, is the key; the value is the next sibling element, limited
/// to siblings matching `value_selector` when one is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default = "default_label_selector")]
    pub label_selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_selector: Option<String>,
    #[serde(default = "default_label_terminator")]
    pub terminator: char,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            scope: None,
            label_selector: default_label_selector(),
            value_selector: None,
            terminator: default_label_terminator(),
        }
    }
}

/// Everything needed to scrape one job board.
///
/// Profiles are plain data; [`JobExtractor`](crate::extract::JobExtractor)
/// compiles the selectors once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteProfile {
    /// Short identifier used in logs and on the command line.
    pub name: String,
    /// Origin that relative links are resolved against.
    pub base_url: String,
    /// Listing URL, optionally containing `{role}`, `{area}` and `{page}`.
    pub url_template: String,
    /// Replaces whitespace runs inside search terms.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Selector matching one item block per listing.
    pub block_selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelLayout>,
    pub fields: Vec<FieldSpec>,
}

impl SiteProfile {
    /// The cwjobs.co.uk search results, paginated by role and area.
    #[must_use]
    pub fn cwjobs() -> Self {
        Self {
            name: "cwjobs".to_string(),
            base_url: "https://www.cwjobs.co.uk".to_string(),
            url_template: "https://www.cwjobs.co.uk/jobs/{role}/in-{area}?page={page}".to_string(),
            separator: default_separator(),
            block_selector: r#"article[data-testid="job-card"]"#.to_string(),
            labels: None,
            fields: vec![
                FieldSpec::select(Field::Title, "h2"),
                FieldSpec::select(Field::Company, r#"[data-testid="company-name"]"#),
                FieldSpec::select(Field::Location, r#"[data-testid="job-location"]"#),
                FieldSpec::attr(Field::Link, "a", "href"),
            ],
        }
    }

    /// The northeastjobs.org.uk "all jobs" listing, a single page with
    /// labelled salary, location, category and contract fields.
    #[must_use]
    pub fn northeast_jobs() -> Self {
        Self {
            name: "northeastjobs".to_string(),
            base_url: "https://www.northeastjobs.org.uk".to_string(),
            url_template: "https://www.northeastjobs.org.uk/alljobs".to_string(),
            separator: default_separator(),
            block_selector: "div.job-card-sub".to_string(),
            labels: Some(LabelLayout {
                scope: Some("div.card-body".to_string()),
                label_selector: default_label_selector(),
                value_selector: Some("span".to_string()),
                terminator: ':',
            }),
            fields: vec![
                FieldSpec::select(Field::Title, "h5.card-title a"),
                FieldSpec::attr(Field::Link, "h5.card-title a", "href"),
                FieldSpec::select(Field::ClosingDate, "span.font-weight-bold"),
                FieldSpec::label(Field::Salary, "Salary"),
                FieldSpec::label(Field::Location, "Employment Location"),
                FieldSpec::label(Field::Category, "Job category"),
                FieldSpec::label(Field::Contract, "Contract Type"),
                FieldSpec::select(Field::Description, "[id*='lblShortDescription']"),
            ],
        }
    }

    /// Looks up a built-in profile by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::UnknownSite`] for names not in [`BUILTIN_SITES`].
    pub fn builtin(name: &str) -> Result<Self, SiteError> {
        match name.to_ascii_lowercase().as_str() {
            "cwjobs" => Ok(Self::cwjobs()),
            "northeastjobs" => Ok(Self::northeast_jobs()),
            _ => Err(SiteError::unknown_site(name, &BUILTIN_SITES)),
        }
    }

    /// Loads and validates a profile from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the file cannot be read, is not a profile,
    /// or fails [`SiteProfile::validate`].
    pub fn from_json_file(path: &Path) -> Result<Self, SiteError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Self = serde_json::from_str(&contents).map_err(|source| SiteError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        profile.validate()?;
        debug!(path = %path.display(), site = %profile.name, "loaded site profile");
        Ok(profile)
    }

    /// Checks the profile for inconsistencies that would only surface
    /// mid-run. Selector syntax is checked later, when the extractor
    /// compiles them.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), SiteError> {
        let invalid = |message: String| Err(SiteError::invalid(&self.name, message));

        if self.name.trim().is_empty() {
            return invalid("name is empty".to_string());
        }
        match Url::parse(&self.base_url) {
            Ok(url) if url.has_host() => {}
            _ => return invalid(format!("base_url '{}' is not an absolute URL", self.base_url)),
        }
        if self.url_template.trim().is_empty() {
            return invalid("url_template is empty".to_string());
        }
        if self.block_selector.trim().is_empty() {
            return invalid("block_selector is empty".to_string());
        }
        if self.fields.is_empty() {
            return invalid("fields is empty".to_string());
        }

        let mut seen = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.field) {
                return invalid(format!("field '{}' is mapped more than once", spec.field));
            }
            if matches!(spec.rule, FieldRule::Label { .. }) && self.labels.is_none() {
                return invalid(format!(
                    "field '{}' uses a label rule but the profile has no labels layout",
                    spec.field
                ));
            }
        }
        Ok(())
    }

    /// Whether page URLs depend on role and area.
    #[must_use]
    pub fn is_search(&self) -> bool {
        self.url_template.contains(ROLE_TOKEN) || self.url_template.contains(AREA_TOKEN)
    }

    /// Whether the template has a page number slot.
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.url_template.contains(PAGE_TOKEN)
    }

    /// Builds the URL of page `page` (1-indexed) for a search.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::MissingSearchTerm`] if the template uses
    /// `{role}` or `{area}` and the matching term is blank.
    pub fn page_url(&self, role: &str, area: &str, page: u32) -> Result<String, SiteError> {
        if self.url_template.contains(ROLE_TOKEN) && role.trim().is_empty() {
            return Err(SiteError::MissingSearchTerm {
                name: self.name.clone(),
                missing: "a role",
            });
        }
        if self.url_template.contains(AREA_TOKEN) && area.trim().is_empty() {
            return Err(SiteError::MissingSearchTerm {
                name: self.name.clone(),
                missing: "an area",
            });
        }
        Ok(build_page_url(
            &self.url_template,
            role,
            area,
            page,
            &self.separator,
        ))
    }
}
