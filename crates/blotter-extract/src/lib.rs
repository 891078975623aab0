//! Blotter Extraction Pipeline
//!
//! Converts the unstructured, inconsistently formatted text blocks the
//! booking portal returns into canonical [`BookingRecord`]s.
//!
//! # Architecture
//!
//! ```text
//! raw block → fields → status + dates → normalize (+ repair) → BookingRecord
//! ```
//!
//! Every stage is total: a label that cannot be found, a date that does
//! not parse, or a missing required field is absorbed into a sentinel
//! value (logged at warn level where useful) and never surfaces as an
//! error. The repair pass is the last line of defense and always yields
//! a complete record.
//!
//! [`BookingRecord`]: blotter_domain::BookingRecord

#![warn(missing_docs)]

pub mod dates;
pub mod fields;
pub mod normalize;
pub mod status;

pub use dates::parse_date;
pub use fields::extract_field;
pub use normalize::{extract_all, normalize, normalize_at, repair_records, ExtractedFields};
pub use status::{resolve_status, resolve_status_at};
