//! Blotter CLI - search, browse and export county jail booking records.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod names;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
