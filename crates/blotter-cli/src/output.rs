//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use blotter_domain::BookingRecord;
use blotter_export::Statistics;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a set of booking records.
    pub fn format_records(&self, records: &[&BookingRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_records_json(records),
            OutputFormat::Table => self.format_records_table(records),
            OutputFormat::Quiet => self.format_records_quiet(records),
        }
    }

    /// Format records as JSON (raw text excluded, as in tabular exports).
    fn format_records_json(&self, records: &[&BookingRecord]) -> Result<String> {
        let json_records: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "booking_number": r.booking_number,
                    "booking_date": r.booking_date,
                    "release_date": r.release_date,
                    "status": r.status.as_str(),
                    "time_served_days": r.time_served_days,
                    "charges": r.charges,
                    "cell_location": r.cell_location,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_records)?)
    }

    /// Format records as a table.
    fn format_records_table(&self, records: &[&BookingRecord]) -> Result<String> {
        if records.is_empty() {
            return Ok(self.colorize("No records found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Name",
            "Status",
            "Booking #",
            "Booking Date",
            "Release Date",
            "Days",
            "Cell Location",
            "Charges",
        ]);

        for record in records {
            builder.push_record([
                record.name.clone(),
                record.status.as_str().to_string(),
                record.booking_number.clone(),
                record.booking_date.clone(),
                record.release_date.clone(),
                record.time_served_days.to_string(),
                record.cell_location.clone(),
                record.charges.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format records in quiet mode (booking numbers only).
    fn format_records_quiet(&self, records: &[&BookingRecord]) -> Result<String> {
        let numbers: Vec<&str> = records
            .iter()
            .map(|r| r.booking_number.as_str())
            .collect();
        Ok(numbers.join("\n"))
    }

    /// Format summary statistics.
    pub fn format_statistics(&self, stats: &Statistics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "total": stats.total,
                "in_custody": stats.in_custody,
                "released": stats.released,
                "avg_days": stats.avg_days,
                "max_days": stats.max_days,
                "min_days": stats.min_days,
                "unique_names": stats.unique_names,
            }))?),
            _ => Ok(stats.summary_block()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blotter_domain::CustodyStatus;

    fn test_record() -> BookingRecord {
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
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let record = test_record();
        let output = formatter.format_records(&[&record]).unwrap();
        assert!(output.contains("booking_number"));
        assert!(output.contains("In Custody"));
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let record = test_record();
        let output = formatter.format_records(&[&record]).unwrap();
        assert!(output.contains("Booking #"));
        assert!(output.contains("Smith, John"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let record = test_record();
        let output = formatter.format_records(&[&record]).unwrap();
        assert_eq!(output, "55521");
    }

    #[test]
    fn test_empty_records() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[]).unwrap();
        assert!(output.contains("No records found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }

    #[test]
    fn test_statistics_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let stats = Statistics {
            total: 2,
            in_custody: 1,
            released: 1,
            avg_days: 32.0,
            max_days: 60,
            min_days: 4,
            unique_names: 2,
        };
        let output = formatter.format_statistics(&stats).unwrap();
        assert!(output.contains("\"total\": 2"));
    }
}
