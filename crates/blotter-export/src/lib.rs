//! Blotter Export Layer
//!
//! Consumers of a finished dataset: delimited tabular export, summary
//! statistics, and read-time filter/sort/group projections. Nothing in
//! this crate ever mutates a stored record - later re-derivations (a
//! re-sort by date, a filtered view) work on parsed-on-read
//! projections of the immutable records.

#![warn(missing_docs)]

pub mod filter;
pub mod stats;
pub mod table;

use thiserror::Error;

pub use filter::{filter_records, sort_records, RecordFilter};
pub use stats::{group_by_name, Statistics};
pub use table::{export_columns, read_csv, read_csv_path, write_csv, write_csv_path};

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export was requested for an empty record set
    #[error("No data to export")]
    NoData,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
