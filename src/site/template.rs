//! Page URL construction from a site's URL template.

/// Placeholder replaced by the search role.
pub const ROLE_TOKEN: &str = "{role}";
/// Placeholder replaced by the search area.
pub const AREA_TOKEN: &str = "{area}";
/// Placeholder replaced by the 1-indexed page number.
pub const PAGE_TOKEN: &str = "{page}";

/// Prepares a search term for substitution into a URL path or query.
///
/// Each whitespace-separated word is percent-encoded and the words are
/// joined with `separator`, which is inserted verbatim.
///
/// ```
/// use jobscraper_core::site::encode_search_term;
///
/// assert_eq!(encode_search_term("  Python Developer ", "-"), "Python-Developer");
/// assert_eq!(encode_search_term("C++ Dev", "-"), "C%2B%2B-Dev");
/// assert_eq!(encode_search_term("rust dev", "+"), "rust+dev");
/// ```
#[must_use]
pub fn encode_search_term(value: &str, separator: &str) -> String {
    value
        .split_whitespace()
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Substitutes role, area and page into `template`.
///
/// Tokens the template does not contain are ignored.
#[must_use]
pub fn build_page_url(
    template: &str,
    role: &str,
    area: &str,
    page: u32,
    separator: &str,
) -> String {
    template
        .replace(ROLE_TOKEN, &encode_search_term(role, separator))
        .replace(AREA_TOKEN, &encode_search_term(area, separator))
        .replace(PAGE_TOKEN, &page.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CWJOBS: &str = "https://www.cwjobs.co.uk/jobs/{role}/in-{area}?page={page}";

    #[test]
    fn test_build_page_url_substitutes_all_tokens() {
        let url = build_page_url(CWJOBS, "Python Developer", "London", 2, "-");
        assert_eq!(
            url,
            "https://www.cwjobs.co.uk/jobs/Python-Developer/in-London?page=2"
        );
    }

    #[test]
    fn test_build_page_url_collapses_whitespace_runs() {
        let url = build_page_url(CWJOBS, " data   engineer ", "Newcastle upon Tyne", 1, "-");
        assert_eq!(
            url,
            "https://www.cwjobs.co.uk/jobs/data-engineer/in-Newcastle-upon-Tyne?page=1"
        );
    }

    #[test]
    fn test_build_page_url_escapes_reserved_characters() {
        let url = build_page_url(CWJOBS, "C# / .NET", "St Albans", 1, "-");
        assert_eq!(
            url,
            "https://www.cwjobs.co.uk/jobs/C%23-%2F-.NET/in-St-Albans?page=1"
        );
    }

    #[test]
    fn test_build_page_url_custom_separator_is_not_escaped() {
        let url = build_page_url("https://x.test/s?q={role}&p={page}", "rust dev", "", 1, "+");
        assert_eq!(url, "https://x.test/s?q=rust+dev&p=1");
    }

    #[test]
    fn test_encode_search_term_escapes_words_but_not_separator() {
        assert_eq!(encode_search_term("C++  dev", "+"), "C%2B%2B+dev");
        assert_eq!(encode_search_term("a/b c", "%20"), "a%2Fb%20c");
        assert_eq!(encode_search_term("   ", "-"), "");
    }

    #[test]
    fn test_build_page_url_without_tokens_is_unchanged() {
        let url = build_page_url("https://www.northeastjobs.org.uk/alljobs", "a", "b", 4, "-");
        assert_eq!(url, "https://www.northeastjobs.org.uk/alljobs");
    }
}
