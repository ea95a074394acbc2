//! # Application Constants
//!
//! This module defines configuration constants used throughout the application.
//! These constants control token lifetimes, cache housekeeping and input limits.

use std::time::Duration;

/// Expiration time for JWT access tokens
///
/// A session lasts one hour; after that the user has to log in again.
pub const ACCESS_TOKEN_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Maximum number of revoked tokens kept in memory before a cleanup pass
/// starts dropping the ones that have expired anyway.
pub const CACHE_CAPACITY: usize = 100;

/// Interval for automatic cache cleanup
///
/// Background task runs at this interval to remove expired revocation entries.
pub const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(3 * 60);

/// Minimum length of the `JWT_SECRET` value in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 200;

/// Years accepted for client-supplied timestamps once shifted to UTC.
///
/// PostgreSQL `timestamptz` has no year 0 and `time` stops at 9999; the upper
/// bound leaves room for the shift to UTC.
pub const MIN_TIMESTAMP_YEAR: i32 = 1;
pub const MAX_TIMESTAMP_YEAR: i32 = 9998;

/// Advice returned for any symptom that has no entry in the recommendation table.
pub const FALLBACK_RECOMMENDATION: &str = "Consult a healthcare provider.";

/// Default bind address and port when `HOST` / `PORT` are not set.
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8090;
