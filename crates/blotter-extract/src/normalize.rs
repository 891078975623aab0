//! Single-pass normalization of raw blocks into booking records
//!
//! A block is parsed exactly once: every derived field (status, time
//! served, display release date) is computed here and the resulting
//! [`BookingRecord`] is never re-parsed or mutated afterwards.

use crate::dates::{parse_date, strip_time_suffix};
use crate::fields;
use crate::status::resolve_status_at;
use blotter_domain::record::{NOT_SPECIFIED, NO_RELEASE_DATE, STILL_IN_CUSTODY, UNKNOWN};
use blotter_domain::{BookingRecord, CustodyStatus};
use chrono::{Local, NaiveDateTime};

/// Raw field values pulled out of one block, pre-normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Numeric booking identifier, if the label matched
    pub booking_number: Option<String>,

    /// Booking date/time text, if the label matched
    pub booking_date: Option<String>,

    /// Release date text, sentinels preserved verbatim
    pub release_date: Option<String>,

    /// Charges, pipe-joined, if the section was found
    pub charges: Option<String>,

    /// Cell location or facility fallback
    pub cell_location: Option<String>,
}

/// Run every field extractor over one raw block
pub fn extract_all(raw_text: &str) -> ExtractedFields {
    ExtractedFields {
        booking_number: fields::extract_field(raw_text, fields::BOOKING_NUMBER_LABEL),
        booking_date: fields::extract_field(raw_text, fields::BOOKING_DATE_LABEL),
        release_date: fields::extract_field(raw_text, fields::RELEASE_DATE_LABEL),
        charges: fields::extract_field(raw_text, fields::CHARGES_LABEL),
        cell_location: fields::extract_field(raw_text, fields::CELL_LOCATION_LABEL),
    }
}

/// Normalize one raw block into a booking record
pub fn normalize(name: &str, raw_text: &str) -> BookingRecord {
    normalize_at(name, raw_text, Local::now().naive_local())
}

/// Clock-injected variant of [`normalize`] for deterministic tests
pub fn normalize_at(name: &str, raw_text: &str, now: NaiveDateTime) -> BookingRecord {
    let extracted = extract_all(raw_text);

    let booking_date = extracted
        .booking_date
        .unwrap_or_else(|| UNKNOWN.to_string());
    let release_raw = extracted
        .release_date
        .unwrap_or_else(|| NO_RELEASE_DATE.to_string());
    let charges = extracted
        .charges
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let cell_location = extracted
        .cell_location
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    let status = resolve_status_at(&release_raw, &cell_location, now);
    let time_served_days = time_served(&booking_date, &release_raw, now);

    let release_date = if status == CustodyStatus::Released {
        release_raw
    } else {
        STILL_IN_CUSTODY.to_string()
    };

    BookingRecord {
        name: name.to_string(),
        booking_number: extracted.booking_number.unwrap_or_default(),
        booking_date,
        release_date,
        status,
        time_served_days,
        charges,
        cell_location,
        raw_text: raw_text.to_string(),
    }
}

/// Days served, computed on calendar dates
///
/// Released spans are floored at 1 (a same-day release still counts as
/// one day); open spans are floored at 0; an unparseable booking date
/// yields 0.
fn time_served(booking_date: &str, release_date: &str, now: NaiveDateTime) -> i64 {
    let booking = match parse_date(booking_date) {
        Some(parsed) => parsed,
        None => return 0,
    };

    match parse_date(&strip_time_suffix(release_date)) {
        Some(release) if release.date() >= booking.date() => {
            (release.date() - booking.date()).num_days().max(1)
        }
        _ => (now.date() - booking.date()).num_days().max(0),
    }
}

/// Repair pass guaranteeing every record is complete
///
/// Assigns `Unknown-<index>` to any record whose booking number is
/// empty. Idempotent and infallible; the aggregator runs it again
/// defensively on every merged batch.
pub fn repair_records(records: &mut [BookingRecord]) {
    for (index, record) in records.iter_mut().enumerate() {
        if record.booking_number.trim().is_empty() {
            record.booking_number = format!("Unknown-{}", index);
        }
    }
}
