//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blotter CLI - search, browse and export county jail booking records.
#[derive(Debug, Parser)]
#[command(name = "blotter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (booking numbers only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run portal searches for a list of names
    Run(RunArgs),

    /// Print summary statistics for an exported CSV
    Summary(SummaryArgs),

    /// Filter and sort an exported CSV
    Filter(FilterArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Name list file: one "Last, First" per line (tab-delimited
    /// two-column lines accepted)
    #[arg(short, long)]
    pub names: PathBuf,

    /// Portal username
    #[arg(short, long, env = "BLOTTER_USERNAME")]
    pub username: Option<String>,

    /// Portal password
    #[arg(short, long, env = "BLOTTER_PASSWORD")]
    pub password: Option<String>,

    /// Portal base URL (defaults to the configured portal)
    #[arg(long)]
    pub portal_url: Option<String>,

    /// Concurrent searches (1-10)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Minimum delay between requests (seconds)
    #[arg(long)]
    pub min_delay: Option<u64>,

    /// Maximum delay between requests (seconds)
    #[arg(long)]
    pub max_delay: Option<u64>,

    /// Write the structured results to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the combined text report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the summary command.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// Exported CSV file
    pub file: PathBuf,
}

/// Arguments for the filter command.
#[derive(Debug, Parser)]
pub struct FilterArgs {
    /// Exported CSV file
    pub file: PathBuf,

    /// Case-insensitive text to match
    #[arg(short, long)]
    pub text: Option<String>,

    /// Restrict the text match to one column (e.g. "Charges")
    #[arg(long)]
    pub field: Option<String>,

    /// Keep only records with this status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Sort by this column
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub descending: bool,

    /// Write the filtered records to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Custody status argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    /// Currently detained
    InCustody,
    /// Released on a known past date
    Released,
    /// Status could not be determined
    Unknown,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StatusArg> for blotter_domain::CustodyStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::InCustody => blotter_domain::CustodyStatus::InCustody,
            StatusArg::Released => blotter_domain::CustodyStatus::Released,
            StatusArg::Unknown => blotter_domain::CustodyStatus::Unknown,
        }
    }
}
