//! Date/time utilities for Cabinet.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Storage format for upload timestamps (UTC, microsecond precision).
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Display format used by the file listing.
pub const LISTING_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Current UTC time rendered in [`STORAGE_FORMAT`].
///
/// The fixed width keeps lexical and chronological order identical.
pub fn now_for_storage() -> String {
    Utc::now().format(STORAGE_FORMAT).to_string()
}

/// Format a datetime string (stored as UTC) to the specified timezone.
///
/// Accepts RFC3339 and SQLite-style `YYYY-MM-DD HH:MM:SS[.ffffff]` input.
/// Returns the original string if either the timezone or the datetime fails to parse.
pub fn format_datetime(datetime_str: &str, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return datetime_str.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return dt.with_timezone(&tz).format(format).to_string();
    }

    // %.f also matches an absent fractional part
    if let Ok(naive) = NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S%.f") {
        return naive.and_utc().with_timezone(&tz).format(format).to_string();
    }

    datetime_str.to_string()
}

/// Format a stored upload date for the listing (`dd/mm/YYYY HH:MM`).
pub fn format_listing_date(datetime_str: &str, timezone: &str) -> String {
    format_datetime(datetime_str, timezone, LISTING_FORMAT)
}
