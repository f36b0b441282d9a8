use thiserror::Error;

/// Errors raised while compiling a site profile into a [`JobExtractor`](super::JobExtractor).
///
/// Extraction itself never fails; malformed markup yields fewer records or
/// sentinel fields.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl { url: String },

    #[error("field '{field}' uses a label rule but no labels layout is configured")]
    MissingLabelLayout { field: String },
}

impl ExtractError {
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
