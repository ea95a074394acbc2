//! # Text Input Validation Utilities
//!
//! Regex patterns for path and query parameters that end up inside store
//! filters. Request bodies are validated with `validator` derives next to
//! their handlers.

use std::sync::LazyLock;

use regex::Regex;
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::error::{AppError, AppResult};
use crate::utils::constant::{MAX_SEARCH_QUERY_LEN, MAX_TIMESTAMP_YEAR, MIN_TIMESTAMP_YEAR};

/// Identifier pattern for page, post, service and user ids
///
/// # Examples
///
/// - `about-us` ✓ Valid
/// - `3f2b8c1e-9a0d-4c55-8e43-1d2a5b6c7e80` ✓ Valid
/// - `../etc` ✗ Invalid
pub static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Failed to compile identifier regex")
});

/// Calendar date in `YYYY-MM-DD` form, as stored on booking slots.
pub static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$")
        .expect("Failed to compile date regex")
});

/// Checks a route identifier against [`IDENTIFIER_REGEX`].
pub fn validate_identifier(id: &str) -> AppResult<()> {
    if IDENTIFIER_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid identifier"))
    }
}

/// Checks a booking slot date against [`DATE_REGEX`].
pub fn validate_date(date: &str) -> AppResult<()> {
    if DATE_REGEX.is_match(date) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid date, expected YYYY-MM-DD"))
    }
}

/// Trims a search query and rejects blank or oversized input.
pub fn normalize_search_query(query: &str) -> AppResult<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("Search query must not be empty"));
    }
    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(AppError::BadRequest("Search query is too long"));
    }
    Ok(query)
}

/// Parses an RFC 3339 timestamp and re-formats it in UTC.
///
/// Stored timestamps are always `Z`-suffixed so every store backend can
/// compare them; years outside [`MIN_TIMESTAMP_YEAR`]..=[`MAX_TIMESTAMP_YEAR`]
/// are rejected.
///
/// # Examples
///
/// - `2099-01-01T00:00:00+23:00` → `2098-12-31T01:00:00Z`
/// - `0000-06-01T00:00:00Z` ✗ Invalid
pub fn normalize_timestamp(raw: &str) -> AppResult<String> {
    let invalid = || AppError::BadRequest("Invalid timestamp, expected RFC 3339");

    let parsed = OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| invalid())?;
    if !(MIN_TIMESTAMP_YEAR..=MAX_TIMESTAMP_YEAR).contains(&parsed.year()) {
        return Err(invalid());
    }

    let utc = parsed.to_offset(UtcOffset::UTC);
    if utc.year() < MIN_TIMESTAMP_YEAR {
        return Err(invalid());
    }
    utc.format(&Rfc3339).map_err(|_| invalid())
}
