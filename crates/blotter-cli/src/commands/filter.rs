//! The filter command: browse an exported CSV.

use crate::cli::FilterArgs;
use crate::error::Result;
use crate::output::Formatter;
use blotter_domain::BookingRecord;
use blotter_export::{filter_records, read_csv_path, sort_records, write_csv_path, RecordFilter};

/// Filter, sort and re-display (or re-export) an exported record set.
pub fn execute_filter(args: FilterArgs, formatter: &Formatter) -> Result<()> {
    let records = read_csv_path(&args.file)?;

    let filter = RecordFilter {
        text: args.text,
        field: args.field,
        status: args.status.map(Into::into),
    };
    let mut kept = filter_records(&records, &filter);

    if let Some(column) = &args.sort {
        kept = sort_records(&kept, column, !args.descending);
    }

    if let Some(path) = &args.output {
        if kept.is_empty() {
            eprintln!("{}", formatter.warning("No visible records to export"));
        } else {
            let owned: Vec<BookingRecord> = kept.iter().map(|r| (*r).clone()).collect();
            write_csv_path(&owned, path)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Exported {} record(s) to {}",
                    owned.len(),
                    path.display()
                ))
            );
        }
    }

    println!("{}", formatter.format_records(&kept)?);
    println!(
        "{}",
        formatter.info(&format!(
            "{} of {} record(s) match",
            kept.len(),
            records.len()
        ))
    );

    Ok(())
}
