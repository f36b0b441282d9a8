//! Record extraction from listing markup.

use std::collections::{BTreeMap, HashMap};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::error::ExtractError;
use super::link::resolve_link;
use super::text::{element_text, label_key};
use crate::record::{Field, JobRecord, SENTINEL};
use crate::site::{FieldRule, LabelLayout, SiteProfile};

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::invalid_selector(selector, e.to_string()))
}

#[derive(Debug)]
enum CompiledRule {
    Select {
        selector: Selector,
        attr: Option<String>,
    },
    Label {
        label: String,
        default: Option<String>,
    },
}

#[derive(Debug)]
struct CompiledLabels {
    scope: Option<Selector>,
    label: Selector,
    value: Option<Selector>,
    terminator: char,
}

impl CompiledLabels {
    fn compile(layout: &LabelLayout) -> Result<Self, ExtractError> {
        Ok(Self {
            scope: layout.scope.as_deref().map(compile).transpose()?,
            label: compile(&layout.label_selector)?,
            value: layout.value_selector.as_deref().map(compile).transpose()?,
            terminator: layout.terminator,
        })
    }

    /// Collects label/value pairs within `block`. A later duplicate label
    /// overwrites an earlier one.
    fn pairs(&self, block: ElementRef<'_>) -> HashMap<String, String> {
        let mut pairs = HashMap::new();
        let scope = match &self.scope {
            Some(scope) => match block.select(scope).next() {
                Some(element) => element,
                None => return pairs,
            },
            None => block,
        };

        for label in scope.select(&self.label) {
            let key = label_key(&element_text(label), self.terminator);
            if key.is_empty() {
                continue;
            }
            let value = self
                .value_for(label)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| SENTINEL.to_string());
            pairs.insert(key, value);
        }
        pairs
    }

    /// The first following sibling that matches the value selector. The
    /// search stops at the next label, so a label without a value of its own
    /// never borrows its neighbour's.
    fn value_for<'a>(&self, label: ElementRef<'a>) -> Option<ElementRef<'a>> {
        label
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|sibling| !self.label.matches(sibling))
            .find(|sibling| self.value.as_ref().is_none_or(|value| value.matches(sibling)))
    }
}

/// Turns listing markup into [`JobRecord`]s according to a [`SiteProfile`].
///
/// Selectors are compiled once in [`JobExtractor::new`]; extraction is a
/// pure function of the markup. Fields the profile does not map, or whose
/// element is absent or empty, hold [`SENTINEL`].
#[derive(Debug)]
pub struct JobExtractor {
    site: String,
    block: Selector,
    fields: Vec<(Field, CompiledRule)>,
    labels: Option<CompiledLabels>,
    base_url: Url,
}

impl JobExtractor {
    /// Compiles `profile`'s selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if a selector does not parse, the base URL is
    /// not absolute, or a label rule has no layout to read from.
    pub fn new(profile: &SiteProfile) -> Result<Self, ExtractError> {
        let base_url = Url::parse(&profile.base_url).map_err(|_| ExtractError::InvalidBaseUrl {
            url: profile.base_url.clone(),
        })?;
        let labels = profile
            .labels
            .as_ref()
            .map(CompiledLabels::compile)
            .transpose()?;

        let mut fields = Vec::with_capacity(profile.fields.len());
        for spec in &profile.fields {
            let rule = match &spec.rule {
                FieldRule::Select { selector, attr } => CompiledRule::Select {
                    selector: compile(selector)?,
                    attr: attr.clone(),
                },
                FieldRule::Label { label, default } => {
                    if labels.is_none() {
                        return Err(ExtractError::MissingLabelLayout {
                            field: spec.field.to_string(),
                        });
                    }
                    CompiledRule::Label {
                        label: label.clone(),
                        default: default.clone(),
                    }
                }
            };
            fields.push((spec.field, rule));
        }

        Ok(Self {
            site: profile.name.clone(),
            block: compile(&profile.block_selector)?,
            fields,
            labels,
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Extracts one record per item block, in document order.
    #[must_use]
    pub fn extract(&self, markup: &str) -> Vec<JobRecord> {
        self.extract_fields(markup)
            .into_iter()
            .map(|mut values| JobRecord::from_fn(|field| values.remove(&field).unwrap_or_default()))
            .collect()
    }

    /// Extracts every item block as a complete field map, in document order.
    ///
    /// Each map has an entry for every [`Field`].
    #[instrument(level = "debug", skip(self, markup), fields(site = %self.site, bytes = markup.len()))]
    #[must_use]
    pub fn extract_fields(&self, markup: &str) -> Vec<BTreeMap<Field, String>> {
        let document = Html::parse_document(markup);
        let blocks: Vec<_> = document
            .select(&self.block)
            .map(|block| self.extract_block(block))
            .collect();
        debug!(blocks = blocks.len(), "item blocks extracted");
        blocks
    }

    /// Extracts the fields of a single item block.
    #[must_use]
    pub fn extract_block(&self, block: ElementRef<'_>) -> BTreeMap<Field, String> {
        let pairs = match &self.labels {
            Some(labels) if self.uses_labels() => labels.pairs(block),
            _ => HashMap::new(),
        };

        let mut values: BTreeMap<Field, String> = Field::ALL
            .iter()
            .map(|&field| (field, SENTINEL.to_string()))
            .collect();

        for (field, rule) in &self.fields {
            let value = match rule {
                CompiledRule::Select { selector, attr } => {
                    let element = block.select(selector).next();
                    match attr {
                        Some(attr) => element
                            .and_then(|el| el.value().attr(attr))
                            .map(|v| v.trim().to_string()),
                        None => element.map(element_text),
                    }
                }
                CompiledRule::Label { label, default } => {
                    pairs.get(label).cloned().or_else(|| default.clone())
                }
            };
            // Links are absolute or missing, whichever rule produced them.
            let value = match field {
                Field::Link => value
                    .filter(|href| href != SENTINEL)
                    .and_then(|href| resolve_link(&href, &self.base_url)),
                _ => value,
            };
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                values.insert(*field, value);
            }
        }
        values
    }

    fn uses_labels(&self) -> bool {
        self.fields
            .iter()
            .any(|(_, rule)| matches!(rule, CompiledRule::Label { .. }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::site::FieldSpec;

    fn northeast() -> JobExtractor {
        JobExtractor::new(&SiteProfile::northeast_jobs()).unwrap()
    }

    fn cwjobs() -> JobExtractor {
        JobExtractor::new(&SiteProfile::cwjobs()).unwrap()
    }

    const NORTHEAST_CARD: &str = r#"
        <div class="job-card-sub">
          <h5 class="card-title"><a href="/job/4411/support-worker">  Support
              Worker </a></h5>
          <span class="font-weight-bold">31/10/2026</span>
          <div class="card-body">
            <span class="item_label">Salary:</span> <span>£30,000</span>
            <span class="item_label">Employment Location:</span><span>Durham</span>
          </div>
          <p id="ctl00_rptJobs_lblShortDescription_0">Supporting adults in the community.</p>
        </div>"#;

    #[test]
    fn test_label_pairs_fill_mapped_fields() {
        let records = northeast().extract(NORTHEAST_CARD);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title(), "Support Worker");
        assert_eq!(record.salary(), "£30,000");
        assert_eq!(record.location(), "Durham");
        assert_eq!(record.category(), SENTINEL);
        assert_eq!(record.contract(), SENTINEL);
        assert_eq!(record.closing_date(), "31/10/2026");
        assert_eq!(record.description(), "Supporting adults in the community.");
        assert_eq!(
            record.link(),
            "https://www.northeastjobs.org.uk/job/4411/support-worker"
        );
        assert_eq!(record.company(), SENTINEL);
    }

    #[test]
    fn test_block_without_labels_is_all_sentinel_for_label_fields() {
        let markup = r#"<div class="job-card-sub"><h5 class="card-title"><a href="/j/1">Cook</a></h5></div>"#;
        let values = northeast().extract_fields(markup);
        assert_eq!(values.len(), 1);
        for field in [Field::Salary, Field::Location, Field::Category, Field::Contract] {
            assert_eq!(values[0][&field], SENTINEL, "{field}");
        }
        assert_eq!(values[0].len(), Field::ALL.len());
    }

    #[test]
    fn test_label_without_value_sibling_is_sentinel() {
        let markup = r#"
            <div class="job-card-sub"><div class="card-body">
              <span class="item_label">Contract Type:</span>
            </div></div>"#;
        let record = &northeast().extract(markup)[0];
        assert_eq!(record.contract(), SENTINEL);
    }

    #[test]
    fn test_label_without_value_does_not_take_next_label() {
        let markup = r#"
            <div class="job-card-sub"><div class="card-body">
              <span class="item_label">Salary:</span>
              <span class="item_label">Employment Location:</span>
              <span>Durham</span>
            </div></div>"#;
        let record = &northeast().extract(markup)[0];
        assert_eq!(record.salary(), SENTINEL);
        assert_eq!(record.location(), "Durham");
    }

    #[test]
    fn test_label_sourced_link_is_resolved() {
        let mut profile = SiteProfile::northeast_jobs();
        profile.fields.retain(|spec| spec.field != Field::Link);
        profile.fields.push(FieldSpec::label(Field::Link, "Apply"));
        let extractor = JobExtractor::new(&profile).unwrap();

        let markup = r#"
            <div class="job-card-sub"><div class="card-body">
              <span class="item_label">Apply:</span><span>/job/77</span>
            </div></div>
            <div class="job-card-sub"><div class="card-body">
              <span class="item_label">Apply:</span>
            </div></div>"#;
        let records = extractor.extract(markup);
        assert_eq!(records[0].link(), "https://www.northeastjobs.org.uk/job/77");
        assert_eq!(records[1].link(), SENTINEL);
    }

    #[test]
    fn test_label_link_default_is_resolved() {
        let mut profile = SiteProfile::northeast_jobs();
        profile.fields.retain(|spec| spec.field != Field::Link);
        profile.fields.push(FieldSpec {
            field: Field::Link,
            rule: FieldRule::Label {
                label: "Apply".to_string(),
                default: Some("/alljobs".to_string()),
            },
        });
        let extractor = JobExtractor::new(&profile).unwrap();

        let markup = r#"<div class="job-card-sub"><div class="card-body"></div></div>"#;
        assert_eq!(
            extractor.extract(markup)[0].link(),
            "https://www.northeastjobs.org.uk/alljobs"
        );
    }

    #[test]
    fn test_value_sibling_skips_non_matching_elements() {
        let markup = r#"
            <div class="job-card-sub"><div class="card-body">
              <span class="item_label">Job category:</span><br><i>x</i><span>Care</span>
            </div></div>"#;
        let record = &northeast().extract(markup)[0];
        assert_eq!(record.category(), "Care");
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let markup = r#"
            <div class="job-card-sub"><div class="card-body">
              <span class="item_label">Salary:</span><span>£20,000</span>
              <span class="item_label">Salary:</span><span>£25,000</span>
            </div></div>"#;
        let record = &northeast().extract(markup)[0];
        assert_eq!(record.salary(), "£25,000");
    }

    #[test]
    fn test_labels_outside_scope_are_ignored() {
        let markup = r#"
            <div class="job-card-sub">
              <span class="item_label">Salary:</span><span>£99,000</span>
            </div>"#;
        let record = &northeast().extract(markup)[0];
        assert_eq!(record.salary(), SENTINEL);
    }

    #[test]
    fn test_label_default_used_when_absent() {
        let mut profile = SiteProfile::northeast_jobs();
        for spec in &mut profile.fields {
            if spec.field == Field::Contract {
                spec.rule = FieldRule::Label {
                    label: "Contract Type".to_string(),
                    default: Some("Permanent".to_string()),
                };
            }
        }
        let extractor = JobExtractor::new(&profile).unwrap();
        let record = &extractor.extract(NORTHEAST_CARD)[0];
        assert_eq!(record.contract(), "Permanent");
    }

    #[test]
    fn test_records_follow_document_order() {
        let markup = r#"
            <main>
              <article data-testid="job-card"><h2>First</h2><a href="/a">x</a></article>
              <section>
                <article data-testid="job-card"><h2>Second</h2><a href="/b">x</a></article>
              </section>
              <article data-testid="job-card"><h2>Third</h2><a href="/c">x</a></article>
            </main>"#;
        let titles: Vec<_> = cwjobs()
            .extract(markup)
            .iter()
            .map(|r| r.title().to_string())
            .collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_cwjobs_card() {
        let markup = r#"
            <article data-testid="job-card">
              <a href="/job/rust-developer/acme-job123"><h2>Rust Developer</h2></a>
              <span data-testid="company-name">Acme Ltd</span>
              <span data-testid="job-location">London</span>
            </article>"#;
        let record = &cwjobs().extract(markup)[0];
        assert_eq!(record.title(), "Rust Developer");
        assert_eq!(record.company(), "Acme Ltd");
        assert_eq!(record.location(), "London");
        assert_eq!(
            record.link(),
            "https://www.cwjobs.co.uk/job/rust-developer/acme-job123"
        );
        assert_eq!(record.salary(), SENTINEL);
    }

    #[test]
    fn test_missing_title_still_emits_record() {
        let markup = r#"<article data-testid="job-card"><span data-testid="company-name">Acme</span></article>"#;
        let records = cwjobs().extract(markup);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), SENTINEL);
        assert_eq!(records[0].link(), SENTINEL);
        assert_eq!(records[0].company(), "Acme");
    }

    #[test]
    fn test_empty_element_text_is_sentinel() {
        let markup = r#"<article data-testid="job-card"><h2>   </h2></article>"#;
        assert_eq!(cwjobs().extract(markup)[0].title(), SENTINEL);
    }

    #[test]
    fn test_unresolvable_link_is_sentinel() {
        let markup = r#"<article data-testid="job-card"><h2>X</h2><a href="javascript:void(0)">x</a></article>"#;
        assert_eq!(cwjobs().extract(markup)[0].link(), SENTINEL);
    }

    #[test]
    fn test_no_blocks_is_empty() {
        assert!(cwjobs().extract("<html><body><p>No jobs</p></body></html>").is_empty());
        assert!(cwjobs().extract("").is_empty());
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut profile = SiteProfile::cwjobs();
        profile.block_selector = "article[".to_string();
        let error = JobExtractor::new(&profile).unwrap_err();
        assert!(matches!(error, ExtractError::InvalidSelector { .. }));
    }

    #[test]
    fn test_label_rule_without_layout_rejected() {
        let mut profile = SiteProfile::cwjobs();
        profile.fields.push(FieldSpec::label(Field::Salary, "Salary"));
        let error = JobExtractor::new(&profile).unwrap_err();
        assert!(matches!(error, ExtractError::MissingLabelLayout { .. }));
    }
}
