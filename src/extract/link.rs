//! Link resolution against a site's origin.

use url::Url;

/// Turns an `href` value into an absolute `http(s)` URL.
///
/// - absolute `http`/`https` URLs are returned unchanged
/// - protocol-relative `//host/path` gets an `https:` scheme
/// - anything else is joined onto `base`
///
/// Returns `None` for blank values, non-web schemes (`mailto:`,
/// `javascript:`) and references that cannot be joined. Resolving an
/// already-resolved link returns it unchanged.
///
/// ```
/// use jobscraper_core::extract::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.cwjobs.co.uk").unwrap();
/// assert_eq!(
///     resolve_link("/job/rust-dev/123", &base).as_deref(),
///     Some("https://www.cwjobs.co.uk/job/rust-dev/123")
/// );
/// ```
#[must_use]
pub fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if let Ok(absolute) = Url::parse(href) {
        return is_web(&absolute).then(|| href.to_string());
    }

    if let Some(rest) = href.strip_prefix("//") {
        let candidate = format!("https://{rest}");
        return Url::parse(&candidate).ok().map(|_| candidate);
    }

    base.join(href)
        .ok()
        .filter(is_web)
        .map(String::from)
}

fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.has_host()
}
