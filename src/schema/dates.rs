use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use tracing::warn;

static TIMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").unwrap());
static DATE_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static ISO8601_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}:\d{2}(?:\.\d{3})?(?:Z|[+-]\d{2}:\d{2})?)?$").unwrap()
});

const LOOSE_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y.%m.%d"];

/// Normalizes a publication date to ISO 8601 with a time part.
///
/// Timed strings pass through untouched and bare dates get midnight UTC.
/// Anything else chrono can read is re-rendered in UTC with milliseconds;
/// the rest is returned unchanged.
pub fn ensure_iso8601(date: &str) -> String {
    if TIMED_RE.is_match(date) {
        return date.to_string();
    }
    if DATE_ONLY_RE.is_match(date) {
        return format!("{}T00:00:00Z", date);
    }
    match parse_loose(date) {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        None => {
            warn!(date, "unrecognized date format, leaving as is");
            date.to_string()
        }
    }
}

pub fn is_valid_iso8601(date: &str) -> bool {
    ISO8601_RE.is_match(date)
}

fn parse_loose(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(date)
        .or_else(|_| DateTime::parse_from_rfc2822(date))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            LOOSE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}
