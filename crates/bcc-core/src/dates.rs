//! Expiry dates in the format the coupon write endpoint expects.
//!
//! The remote API takes RFC-2822 style timestamps rendered in GMT, e.g.
//! `Thu, 15 Jan 2026 23:59:59 GMT`. Calendar dates supplied by users
//! (`YYYY-MM-DD`) are interpreted as the last second of that day in UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

const WIRE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Days added to "now" when no expiry is given.
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;

/// Renders a UTC instant in the wire format.
#[must_use]
pub fn format_wire(instant: DateTime<Utc>) -> String {
    instant.format(WIRE_FORMAT).to_string()
}

/// Converts a `YYYY-MM-DD` date into the wire format at 23:59:59 UTC.
///
/// Returns `None` (and logs a warning for non-blank input) when the date
/// cannot be parsed.
#[must_use]
pub fn to_wire_date(date: &str) -> Option<String> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(day) => {
            let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
            Some(format_wire(day.and_time(end_of_day).and_utc()))
        }
        Err(e) => {
            tracing::warn!(date = trimmed, error = %e, "date conversion failed");
            None
        }
    }
}

/// Now plus [`DEFAULT_EXPIRY_DAYS`], in the wire format.
#[must_use]
pub fn default_expiry() -> String {
    default_expiry_at(Utc::now())
}

/// [`default_expiry`] relative to a caller-supplied instant.
#[must_use]
pub fn default_expiry_at(now: DateTime<Utc>) -> String {
    format_wire(now + Duration::days(DEFAULT_EXPIRY_DAYS))
}

/// Uses `date` when it is present and parseable, otherwise the default expiry.
#[must_use]
pub fn resolve_expiry(date: Option<&str>) -> String {
    resolve_expiry_at(date, Utc::now())
}

/// [`resolve_expiry`] relative to a caller-supplied instant.
#[must_use]
pub fn resolve_expiry_at(date: Option<&str>, now: DateTime<Utc>) -> String {
    date.and_then(to_wire_date)
        .unwrap_or_else(|| default_expiry_at(now))
}
