//! Short code and API key generation, plus custom code validation.
//!
//! Generated values are drawn from the thread-local CSPRNG over an alphabet of
//! ASCII letters and digits with the visually ambiguous `0`, `O`, `l` and `I`
//! removed.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// 58 symbols: `[A-Za-z0-9]` minus `0 O l I`.
pub const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of generated API keys.
pub const API_KEY_LENGTH: usize = 32;

pub const CUSTOM_CODE_MIN_LEN: usize = 3;
pub const CUSTOM_CODE_MAX_LEN: usize = 50;

/// Codes that would shadow service routes.
pub const RESERVED_CODES: &[&str] = &["api", "health", "docs", "openapi.json"];

static CUSTOM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid custom code regex"));

/// Draws a random code of `len` symbols from [`ALPHABET`].
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generates a fresh plaintext API key.
pub fn generate_api_key() -> String {
    generate_code(API_KEY_LENGTH)
}

/// Validates a client-chosen short code.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    let len = code.chars().count();
    if !(CUSTOM_CODE_MIN_LEN..=CUSTOM_CODE_MAX_LEN).contains(&len) {
        return Err(AppError::bad_request(
            format!(
                "Custom code must be {}-{} characters",
                CUSTOM_CODE_MIN_LEN, CUSTOM_CODE_MAX_LEN
            ),
            json!({ "provided_length": len }),
        ));
    }

    if !CUSTOM_CODE_RE.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, underscores and hyphens",
            json!({ "code": code }),
        ));
    }

    if code.starts_with('-') || code.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom code cannot start or end with a hyphen",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
