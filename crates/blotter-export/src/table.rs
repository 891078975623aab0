//! Delimited tabular export of booking datasets
//!
//! The header row is the union of the exported records' columns minus
//! the raw block, preferred display columns first and anything else
//! alphabetical after them.

use crate::ExportError;
use blotter_domain::{BookingRecord, CustodyStatus};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Export columns in preferred display order
pub const PREFERRED_COLUMNS: &[&str] = &[
    "Name",
    "Status",
    "Booking Number",
    "Booking Date",
    "Release Date",
    "Time Served (Days)",
    "Cell Location",
    "Charges",
];

/// Column holding the raw block; excluded from every tabular export
pub const RAW_DATA_COLUMN: &str = "Raw Data";

/// All exportable column-value pairs of one record
pub fn record_fields(record: &BookingRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Name", record.name.clone()),
        ("Status", record.status.to_string()),
        ("Booking Number", record.booking_number.clone()),
        ("Booking Date", record.booking_date.clone()),
        ("Release Date", record.release_date.clone()),
        ("Time Served (Days)", record.time_served_days.to_string()),
        ("Cell Location", record.cell_location.clone()),
        ("Charges", record.charges.clone()),
    ]
}

/// Look up one exportable column of a record by header name
pub fn record_field(record: &BookingRecord, column: &str) -> Option<String> {
    record_fields(record)
        .into_iter()
        .find(|(name, _)| *name == column)
        .map(|(_, value)| value)
}

/// Header row for a record set
pub fn export_columns(records: &[BookingRecord]) -> Vec<String> {
    let mut union: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        for (name, _) in record_fields(record) {
            union.insert(name);
        }
    }
    union.remove(RAW_DATA_COLUMN);

    let mut columns = Vec::new();
    for preferred in PREFERRED_COLUMNS {
        if union.remove(*preferred) {
            columns.push(preferred.to_string());
        }
    }
    // BTreeSet iteration keeps the leftovers alphabetical
    columns.extend(union.into_iter().map(str::to_string));
    columns
}

/// Write records as CSV to any writer
pub fn write_csv<W: std::io::Write>(
    records: &[BookingRecord],
    writer: W,
) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    let columns = export_columns(records);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record_field(record, column).unwrap_or_default())
            .collect();
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write records as CSV to a file
pub fn write_csv_path(records: &[BookingRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(records, file)?;
    info!("Exported {} records to CSV: {}", records.len(), path.display());
    Ok(())
}

/// Read records back from a CSV produced by [`write_csv`]
///
/// The raw block is not part of tabular exports, so `raw_text` comes
/// back empty; every other field round-trips.
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<BookingRecord>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let get = |column: &str| -> String {
            headers
                .iter()
                .position(|header| header == column)
                .and_then(|index| row.get(index))
                .unwrap_or("")
                .to_string()
        };

        records.push(BookingRecord {
            name: get("Name"),
            booking_number: get("Booking Number"),
            booking_date: get("Booking Date"),
            release_date: get("Release Date"),
            status: CustodyStatus::parse(&get("Status")).unwrap_or_default(),
            time_served_days: get("Time Served (Days)").parse().unwrap_or(0),
            charges: get("Charges"),
            cell_location: get("Cell Location"),
            raw_text: String::new(),
        });
    }

    Ok(records)
}

/// Read records back from a CSV file
pub fn read_csv_path(path: &Path) -> Result<Vec<BookingRecord>, ExportError> {
    let file = File::open(path)?;
    read_csv(file)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_records() -> Vec<BookingRecord> {
        vec![
            BookingRecord {
                name: "Smith, John".to_string(),
                booking_number: "55521".to_string(),
                booking_date: "01/01/2024 10:00".to_string(),
                release_date: "Still in custody".to_string(),
                status: CustodyStatus::InCustody,
                time_served_days: 60,
                charges: "Burglary".to_string(),
                cell_location: "Main Jail".to_string(),
                raw_text: "Booking Number: 55521".to_string(),
            },
            BookingRecord {
                name: "Jones, Mary".to_string(),
                booking_number: "55522".to_string(),
                booking_date: "02/01/2024 09:00".to_string(),
                release_date: "02/05/2024 12:00".to_string(),
                status: CustodyStatus::Released,
                time_served_days: 4,
                charges: "Trespassing | Resisting".to_string(),
                cell_location: "Not specified".to_string(),
                raw_text: "Booking Number: 55522".to_string(),
            },
        ]
    }

    #[test]
    fn test_export_columns_preferred_order() {
        let columns = export_columns(&sample_records());
        assert_eq!(
            columns,
            vec![
                "Name",
                "Status",
                "Booking Number",
                "Booking Date",
                "Release Date",
                "Time Served (Days)",
                "Cell Location",
                "Charges",
            ]
        );
    }

    #[test]
    fn test_raw_text_never_exported() {
        let records = sample_records();
        let mut buffer = Vec::new();
        write_csv(&records, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(!output.contains("Raw Data"));
        assert!(!output.contains("Booking Number: 55521"));
        assert!(output.contains("Smith, John"));
        assert!(output.contains("Trespassing | Resisting"));
    }

    #[test]
    fn test_empty_export_is_an_error() {
        let mut buffer = Vec::new();
        let result = write_csv(&[], &mut buffer);
        assert!(matches!(result, Err(ExportError::NoData)));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let records = sample_records();
        let mut buffer = Vec::new();
        write_csv(&records, &mut buffer).unwrap();

        let reread = read_csv(buffer.as_slice()).unwrap();
        assert_eq!(reread.len(), records.len());
        for (original, copy) in records.iter().zip(&reread) {
            assert_eq!(copy.name, original.name);
            assert_eq!(copy.booking_number, original.booking_number);
            assert_eq!(copy.booking_date, original.booking_date);
            assert_eq!(copy.release_date, original.release_date);
            assert_eq!(copy.status, original.status);
            assert_eq!(copy.time_served_days, original.time_served_days);
            assert_eq!(copy.charges, original.charges);
            assert_eq!(copy.cell_location, original.cell_location);
            assert!(copy.raw_text.is_empty());
        }
    }
}
