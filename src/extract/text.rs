//! Text normalization for extracted values.

use scraper::ElementRef;

/// Collapses every whitespace run to a single space and trims both ends.
#[must_use]
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of `element`, including all descendants.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

/// Strips one trailing `terminator` (and surrounding whitespace) from a
/// label, so `"Salary:"` and `"Salary :"` both key as `"Salary"`.
pub(crate) fn label_key(text: &str, terminator: char) -> String {
    let trimmed = text.trim();
    trimmed
        .strip_suffix(terminator)
        .unwrap_or(trimmed)
        .trim_end()
        .to_string()
}
