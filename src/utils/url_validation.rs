//! Target URL validation.
//!
//! Targets are stored exactly as submitted; this module only decides whether a
//! string is an acceptable absolute `http(s)` URL.

use axum::http::HeaderValue;
use serde_json::json;
use url::Url;
use validator::ValidationError;

use crate::error::AppError;

/// Upper bound on accepted target URL length.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL contains control characters")]
    InvalidCharacters,
}

impl UrlValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            UrlValidationError::Empty => "empty",
            UrlValidationError::TooLong => "too_long",
            UrlValidationError::InvalidFormat(_) => "invalid_format",
            UrlValidationError::UnsupportedProtocol => "unsupported_protocol",
            UrlValidationError::MissingHost => "missing_host",
            UrlValidationError::InvalidCharacters => "invalid_characters",
        }
    }
}

impl From<UrlValidationError> for AppError {
    fn from(e: UrlValidationError) -> Self {
        AppError::bad_request(e.to_string(), json!({ "reason": e.code() }))
    }
}

/// Checks that `input` is an absolute `http` or `https` URL with a host.
///
/// The string is stored verbatim and later sent back as a `Location` header,
/// so it must be a valid header value. `Url::parse` silently drops tabs and
/// newlines, hence the explicit control character check.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }
    if input.chars().any(char::is_control) || HeaderValue::from_str(input).is_err() {
        return Err(UrlValidationError::InvalidCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

/// `validator` adapter for `#[validate(custom(function = ...))]` fields.
pub fn validate_target_url_field(input: &str) -> Result<(), ValidationError> {
    validate_target_url(input).map_err(|e| {
        let mut err = ValidationError::new("url");
        err.message = Some(e.to_string().into());
        err.add_param("reason".into(), &e.code());
        err
    })
}
