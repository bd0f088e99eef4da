//! Validation of submitted target URLs.
//!
//! The URL is checked, never rewritten: deduplication compares the exact
//! submitted string, so scheme case, trailing slashes and query order all
//! stay as the caller sent them.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL contains control characters or surrounding whitespace")]
    UnsafeCharacters,
}

/// Checks that `input` is an absolute `http` or `https` URL with a host.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for other schemes such as
/// `javascript:`, `data:` or `ftp:`.
/// Returns [`UrlValidationError::UnsafeCharacters`] for input the parser would
/// silently clean up (tabs, newlines, other control characters, leading or
/// trailing spaces). Such a string is stored verbatim and can never be sent
/// back as a `Location` header.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.trim() != input || input.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::UnsafeCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}
