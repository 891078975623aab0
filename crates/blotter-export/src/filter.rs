//! Read-time filtering and sorting projections
//!
//! These operate on borrowed records and never mutate the dataset:
//! dates and day counts are parsed on read into sort keys instead of
//! being re-parsed into the stored records.

use crate::table::{record_field, record_fields};
use blotter_domain::{BookingRecord, CustodyStatus};
use blotter_extract::parse_date;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Criteria for filtering a record set
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Case-insensitive text to match
    pub text: Option<String>,

    /// Restrict the text match to one column; `None` matches any
    /// exportable column
    pub field: Option<String>,

    /// Keep only records with this status
    pub status: Option<CustodyStatus>,
}

impl RecordFilter {
    /// Whether one record passes every criterion
    pub fn matches(&self, record: &BookingRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        let Some(text) = &self.text else {
            return true;
        };
        let needle = text.to_lowercase();

        match &self.field {
            Some(field) => record_field(record, field)
                .map(|value| value.to_lowercase().contains(&needle))
                .unwrap_or(false),
            // The raw block is intentionally not searched; it is audit
            // data, not a display column.
            None => record_fields(record)
                .iter()
                .any(|(_, value)| value.to_lowercase().contains(&needle)),
        }
    }
}

/// Filter a record set, borrowing the survivors
pub fn filter_records<'a>(
    records: &'a [BookingRecord],
    filter: &RecordFilter,
) -> Vec<&'a BookingRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .collect()
}

/// Sort key projected from one record column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(i64),
    Date(NaiveDateTime),
    Text(String),
    Missing,
}

fn sort_key(record: &BookingRecord, field: &str) -> SortKey {
    match field {
        "Time Served (Days)" => SortKey::Number(record.time_served_days),
        "Booking Date" | "Release Date" => {
            let value = record_field(record, field).unwrap_or_default();
            match parse_date(&value) {
                Some(parsed) => SortKey::Date(parsed),
                None if value.trim().is_empty() => SortKey::Missing,
                None => SortKey::Text(value.to_lowercase()),
            }
        }
        other => match record_field(record, other) {
            Some(value) if !value.trim().is_empty() => SortKey::Text(value.to_lowercase()),
            _ => SortKey::Missing,
        },
    }
}

/// Sort borrowed records by one column
///
/// Dates and day counts compare as parsed values; unparseable dates
/// fall back to text comparison; missing values sort last in both
/// directions.
pub fn sort_records<'a>(
    records: &[&'a BookingRecord],
    field: &str,
    ascending: bool,
) -> Vec<&'a BookingRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let key_a = sort_key(a, field);
        let key_b = sort_key(b, field);
        match (key_a == SortKey::Missing, key_b == SortKey::Missing) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = key_a.cmp(&key_b);
                if ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
        }
    });
    sorted
}
