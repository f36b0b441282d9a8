//! Listing-page markup and site profiles shared by integration tests.

use jobscraper_core::{Field, FieldSpec, SiteProfile};

/// One cwjobs-style result card.
pub fn cwjobs_card(title: &str, company: &str, location: &str, href: &str) -> String {
    format!(
        r#"<article data-testid="job-card">
  <h2>{title}</h2>
  <span data-testid="company-name">{company}</span>
  <span data-testid="job-location">{location}</span>
  <a href="{href}">View job</a>
</article>"#
    )
}

/// A results page wrapping `cards`.
pub fn results_page(cards: &[String]) -> String {
    format!(
        "<html><body><main>{}</main></body></html>",
        cards.join("\n")
    )
}

/// A page of `count` cards titled `"{prefix} 1"` .. `"{prefix} {count}"`.
pub fn numbered_page(prefix: &str, count: usize) -> String {
    let cards: Vec<String> = (1..=count)
        .map(|n| {
            cwjobs_card(
                &format!("{prefix} {n}"),
                "Acme Ltd",
                "London",
                &format!("/job/{}-{n}", prefix.to_lowercase().replace(' ', "-")),
            )
        })
        .collect();
    results_page(&cards)
}

/// A cwjobs-shaped search profile pointed at `base` (a mock server URI).
pub fn search_site(base: &str) -> SiteProfile {
    SiteProfile {
        name: "mock-search".to_string(),
        base_url: base.to_string(),
        url_template: format!("{base}/jobs/{{role}}/in-{{area}}?page={{page}}"),
        fields: vec![
            FieldSpec::select(Field::Title, "h2"),
            FieldSpec::select(Field::Company, r#"[data-testid="company-name"]"#),
            FieldSpec::select(Field::Location, r#"[data-testid="job-location"]"#),
            FieldSpec::attr(Field::Link, "a", "href"),
        ],
        ..SiteProfile::cwjobs()
    }
}

/// A northeastjobs-style card with a labelled body.
pub fn northeast_card(title: &str, href: &str, labels: &[(&str, &str)]) -> String {
    let pairs: String = labels
        .iter()
        .map(|(label, value)| {
            format!(r#"<p><span class="item_label">{label}:</span> <span>{value}</span></p>"#)
        })
        .collect();
    format!(
        r#"<div class="job-card-sub">
  <h5 class="card-title"><a href="{href}">{title}</a></h5>
  <span class="font-weight-bold">Closing 30/11/2026</span>
  <div class="card-body">{pairs}</div>
  <span id="ctl00_lblShortDescription">  Supporting adults   in the community.  </span>
</div>"#
    )
}
