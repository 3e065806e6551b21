//! Static context functions
//!
//! These are available to every value expression regardless of configuration.

use base64::Engine as _;
use minijinja::{Error, ErrorKind};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Current time, RFC 3339
///
/// Usage: {{repl Now}}
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Current time in a strftime format
///
/// Usage: {{repl NowFmt "%Y-%m-%d"}}
pub fn now_fmt(format: String) -> Result<String, Error> {
    let mut out = String::new();
    write!(out, "{}", chrono::Utc::now().format(&format)).map_err(|_| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid time format `{}`", format),
        )
    })?;
    Ok(out)
}

/// Usage: {{repl TrimSpace "  padded  "}}
pub fn trim_space(value: String) -> String {
    value.trim().to_string()
}

/// Trim whitespace, or every character of `cutset` when given
///
/// Usage: {{repl Trim "--x--" "-"}}
pub fn trim(value: String, cutset: Option<String>) -> String {
    match cutset {
        Some(cutset) => value.trim_matches(|c: char| cutset.contains(c)).to_string(),
        None => value.trim().to_string(),
    }
}

pub fn lower(value: String) -> String {
    value.to_lowercase()
}

pub fn upper(value: String) -> String {
    value.to_uppercase()
}

/// Usage: {{repl Base64Encode "secret"}}
pub fn base64_encode(value: String) -> String {
    base64::engine::general_purpose::STANDARD.encode(value.as_bytes())
}

/// Usage: {{repl Base64Decode "c2VjcmV0"}}
pub fn base64_decode(value: String) -> Result<String, Error> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(value.trim())
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("invalid utf-8: {}", e)))
}

/// Hex encoded SHA256
pub fn sha256(value: String) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random string of `length` characters drawn from `charset`
///
/// Usage: {{repl RandomString 32}}
pub fn random_string(length: usize, charset: Option<String>) -> Result<String, Error> {
    let charset: Vec<char> = charset.as_deref().unwrap_or(DEFAULT_CHARSET).chars().collect();
    if charset.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            "RandomString requires a non-empty charset",
        ));
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect())
}
