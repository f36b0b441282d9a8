//! Shared User-Agent string for page requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/jobscraper";

/// Default User-Agent for listing page requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("jobscraper/{version} (job-listing-tool; +{PROJECT_UA_URL})")
}
