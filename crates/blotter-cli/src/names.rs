//! Name-list loading.

use crate::error::{CliError, Result};
use blotter_domain::SearchQuery;
use std::fs;
use std::path::Path;

/// Load queries from a name-list file
///
/// One `"Last, First"` per line; tab-delimited two-column lines are
/// accepted too. Blank lines and `#` comments are skipped.
pub fn load_names(path: &Path) -> Result<Vec<SearchQuery>> {
    let contents = fs::read_to_string(path)?;
    let queries = parse_names(&contents);
    if queries.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "no valid names found in {}",
            path.display()
        )));
    }
    Ok(queries)
}

/// Parse a name-list string into queries
pub fn parse_names(contents: &str) -> Vec<SearchQuery> {
    contents.lines().filter_map(SearchQuery::parse_line).collect()
}
