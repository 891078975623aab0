//! The summary command: statistics for an exported CSV.

use crate::cli::SummaryArgs;
use crate::error::Result;
use crate::output::Formatter;
use blotter_export::{read_csv_path, Statistics};

/// Print the summary statistics block for an exported record set.
pub fn execute_summary(args: SummaryArgs, formatter: &Formatter) -> Result<()> {
    let records = read_csv_path(&args.file)?;
    let stats = Statistics::compute(&records);
    println!("{}", formatter.format_statistics(&stats)?);
    Ok(())
}
