//! Date parsing for the portal's assorted date formats

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Formats tried in order; the boolean marks formats carrying a time
const DATE_FORMATS: &[(&str, bool)] = &[
    ("%m/%d/%Y %H:%M", true),
    ("%m/%d/%Y %H:%M:%S", true),
    ("%m/%d/%Y", false),
    ("%m/%d/%y %H:%M", true),
    ("%m/%d/%y", false),
];

/// Values that mean "no date here" rather than "unparseable date"
const NO_DATE_SENTINELS: &[&str] = &["", "n/a", "unknown", "still in custody"];

static TIME_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*time:.*").unwrap());

/// Whether `text` is one of the known "no date" sentinels
pub fn is_no_date_sentinel(text: &str) -> bool {
    NO_DATE_SENTINELS.contains(&text.trim().to_lowercase().as_str())
}

/// Strip a trailing `time: ...` suffix the portal sometimes appends
pub fn strip_time_suffix(text: &str) -> String {
    TIME_SUFFIX_RE.replace(text, "").trim().to_string()
}

/// Parse a portal date string, trying each known format in order
///
/// Date-only formats resolve to midnight. Sentinel values return `None`
/// silently; anything else that fails every format is logged as a
/// warning and returns `None`.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if is_no_date_sentinel(trimmed) {
        return None;
    }

    for (format, has_time) in DATE_FORMATS {
        if *has_time {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(parsed);
            }
        } else if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }

    warn!("Failed to parse date: {}", trimmed);
    None
}
