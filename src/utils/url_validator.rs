//! Target URL validation.
//!
//! Targets are stored exactly as submitted (after trimming). Validation
//! checks that the string is an absolute HTTP or HTTPS URL that can be sent
//! back verbatim in a `Location` header.

use url::Url;

/// Errors that can occur while validating a target URL.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL")]
    InvalidFormat(String),

    #[error("Invalid URL")]
    UnsupportedProtocol,
}

/// Trims `input` and checks that it is an absolute `http`/`https` URL.
///
/// Returns the trimmed string on success.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for blank input
/// - [`UrlValidationError::InvalidFormat`] when the string doesn't parse as an absolute URL
///   or contains control characters (the URL parser would silently drop tabs and newlines)
/// - [`UrlValidationError::UnsupportedProtocol`] for schemes like `ftp:`, `javascript:`, `data:`
pub fn validate_target_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "contains control characters".to_string(),
        ));
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed),
        _ => Err(UrlValidationError::UnsupportedProtocol),
    }
}
