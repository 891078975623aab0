//! Custody status resolution from release-date and location text

use crate::dates::{is_no_date_sentinel, parse_date, strip_time_suffix};
use blotter_domain::CustodyStatus;
use chrono::{Local, NaiveDateTime};

/// Keywords in a location string that imply active detention
pub const CUSTODY_INDICATORS: &[&str] = &[
    "jail",
    "prison",
    "facility",
    "block",
    "pod",
    "cell",
    "detention",
    "surety bond",
    "bonds",
    "holding",
    "center",
];

/// Infer custody status from the release-date and cell-location text
pub fn resolve_status(release_date_text: &str, cell_location_text: &str) -> CustodyStatus {
    resolve_status_at(
        release_date_text,
        cell_location_text,
        Local::now().naive_local(),
    )
}

/// Clock-injected variant of [`resolve_status`] for deterministic tests
///
/// Rule order matters: a parseable past release date wins even when the
/// location still carries custody keywords, because the portal sometimes
/// leaves stale location data in place after a release.
pub fn resolve_status_at(
    release_date_text: &str,
    cell_location_text: &str,
    now: NaiveDateTime,
) -> CustodyStatus {
    let release = release_date_text.trim().to_lowercase();
    let location = cell_location_text.trim().to_lowercase();

    if !release.is_empty() && !is_no_date_sentinel(&release) {
        let cleaned = strip_time_suffix(&release);
        if let Some(date) = parse_date(&cleaned) {
            if date <= now {
                return CustodyStatus::Released;
            }
        }
    }

    if CUSTODY_INDICATORS
        .iter()
        .any(|keyword| location.contains(keyword))
    {
        return CustodyStatus::InCustody;
    }

    // Portal convention: an explicit "N/A" release date means the person
    // has not been released yet.
    if release == "n/a" {
        return CustodyStatus::InCustody;
    }

    CustodyStatus::Unknown
}
