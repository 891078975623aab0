//! Label-anchored field extraction from raw booking blocks
//!
//! Each label class has its own matching strategy; alternates are tried
//! in a fixed priority order and the first successful match wins. A
//! label that appears nowhere in the block is simply "not found", never
//! an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Label preceding the numeric booking identifier
pub const BOOKING_NUMBER_LABEL: &str = "Booking Number:";

/// Label preceding the booking date/time
pub const BOOKING_DATE_LABEL: &str = "Booking Date/Time:";

/// Label preceding the release date
pub const RELEASE_DATE_LABEL: &str = "Release Date:";

/// Label opening the charges section
pub const CHARGES_LABEL: &str = "Charges:";

/// Label preceding the cell location
pub const CELL_LOCATION_LABEL: &str = "Cell Location:";

/// Lines containing any of these end the charges section
const SECTION_TERMINATORS: &[&str] = &[
    "Bond:",
    "Original Bond:",
    "Current Bond:",
    "Bond Information",
    "Release Date:",
];

/// Facility values that mean "no facility on file"
const EMPTY_FACILITY: &[&str] = &["NO FILE"];

static BOOKING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Booking Number:\s*(\d+)").unwrap());

static BOOKING_DATETIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}/\d{2}/\d{4} \d{2}:\d{2}").unwrap());

static FACILITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Facility:\s*(.+)").unwrap());

/// Extract the value associated with `label` from one raw block
///
/// Returns `None` when the label (or a usable value for it) is absent.
pub fn extract_field(text: &str, label: &str) -> Option<String> {
    if text.is_empty() || label.is_empty() {
        return None;
    }

    match label {
        BOOKING_NUMBER_LABEL => extract_booking_number(text),
        BOOKING_DATE_LABEL => extract_booking_datetime(text),
        RELEASE_DATE_LABEL => extract_release_date(text),
        CHARGES_LABEL => extract_charges(text),
        CELL_LOCATION_LABEL => extract_cell_location(text),
        _ => extract_generic(text, label),
    }
}

/// Decimal-digit run immediately following the label; the rest of the
/// line is ignored
fn extract_booking_number(text: &str) -> Option<String> {
    BOOKING_NUMBER_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// `MM/DD/YYYY HH:MM` pattern anywhere after the label
fn extract_booking_datetime(text: &str) -> Option<String> {
    let start = text.find(BOOKING_DATE_LABEL)?;
    BOOKING_DATETIME_RE
        .find(&text[start..])
        .map(|m| m.as_str().to_string())
}

/// Remainder of the label line, trimmed
///
/// Sentinel values ("N/A", empty, "still in custody") are preserved
/// verbatim; deciding what they mean is the resolver's job.
fn extract_release_date(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(pos) = line.find(RELEASE_DATE_LABEL) {
            let value = line[pos + RELEASE_DATE_LABEL.len()..].trim();
            return Some(value.to_string());
        }
    }
    None
}

/// Explicit "Cell Location:" value, falling back to "Facility:"
fn extract_cell_location(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(pos) = line.find(CELL_LOCATION_LABEL) {
            let value = line[pos + CELL_LOCATION_LABEL.len()..].trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
            break;
        }
    }

    let caps = FACILITY_RE.captures(text)?;
    let value = caps[1].trim();
    if value.is_empty() || EMPTY_FACILITY.contains(&value) {
        return None;
    }
    Some(value.to_string())
}

/// Collect the charges section, joining the lines with `" | "`
///
/// Collection starts at the label (an inline value on the label line
/// counts) and stops at a section-terminator line or at the first blank
/// line after any charge was collected.
fn extract_charges(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let index = lines
        .iter()
        .position(|line| line.contains(CHARGES_LABEL) || line.trim() == "Charges")?;

    let mut charges = Vec::new();

    if let Some(pos) = lines[index].find(CHARGES_LABEL) {
        let inline = lines[index][pos + CHARGES_LABEL.len()..].trim();
        if !inline.is_empty() {
            charges.push(inline.to_string());
        }
    }

    for line in &lines[index + 1..] {
        if SECTION_TERMINATORS.iter().any(|term| line.contains(term)) {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if charges.is_empty() {
                continue;
            }
            break;
        }
        charges.push(trimmed.to_string());
    }

    if charges.is_empty() {
        None
    } else {
        Some(charges.join(" | "))
    }
}

/// Trimmed next non-empty line after the label line
fn extract_generic(text: &str, label: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let index = lines.iter().position(|line| line.contains(label))?;
    lines[index + 1..]
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BLOCK: &str = "\
Name: Smith, John
Booking Number: 55521
Booking Date/Time: 01/01/2024 10:00
Charges:
Burglary
Possession of burglary tools
Bond: $5,000
Release Date: N/A
Facility: Main Detention Center
Cell Location: Main Jail";

    #[test]
    fn test_booking_number_exact() {
        assert_eq!(
            extract_field(SAMPLE_BLOCK, BOOKING_NUMBER_LABEL),
            Some("55521".to_string())
        );
    }

    #[test]
    fn test_booking_number_ignores_rest_of_line() {
        let block = "Booking Number: 12345 (amended)";
        assert_eq!(
            extract_field(block, BOOKING_NUMBER_LABEL),
            Some("12345".to_string())
        );
    }

    #[test]
    fn test_booking_datetime() {
        assert_eq!(
            extract_field(SAMPLE_BLOCK, BOOKING_DATE_LABEL),
            Some("01/01/2024 10:00".to_string())
        );
    }

    #[test]
    fn test_release_date_preserves_sentinel() {
        assert_eq!(
            extract_field(SAMPLE_BLOCK, RELEASE_DATE_LABEL),
            Some("N/A".to_string())
        );
    }

    #[test]
    fn test_release_date_value() {
        let block = "Release Date: 01/10/2024 08:00";
        assert_eq!(
            extract_field(block, RELEASE_DATE_LABEL),
            Some("01/10/2024 08:00".to_string())
        );
    }

    #[test]
    fn test_release_date_empty_preserved() {
        let block = "Release Date:\nFacility: NO FILE";
        assert_eq!(
            extract_field(block, RELEASE_DATE_LABEL),
            Some(String::new())
        );
    }

    #[test]
    fn test_charges_stop_at_bond() {
        assert_eq!(
            extract_field(SAMPLE_BLOCK, CHARGES_LABEL),
            Some("Burglary | Possession of burglary tools".to_string())
        );
    }

    #[test]
    fn test_charges_inline_value() {
        let block = "Charges: Burglary\nRelease Date: N/A";
        assert_eq!(
            extract_field(block, CHARGES_LABEL),
            Some("Burglary".to_string())
        );
    }

    #[test]
    fn test_charges_single_line() {
        let block = "Charges:\nBurglary";
        assert_eq!(
            extract_field(block, CHARGES_LABEL),
            Some("Burglary".to_string())
        );
    }

    #[test]
    fn test_charges_stop_at_blank_after_content() {
        let block = "Charges:\nBurglary\n\nCell Location: Main Jail";
        assert_eq!(
            extract_field(block, CHARGES_LABEL),
            Some("Burglary".to_string())
        );
    }

    #[test]
    fn test_cell_location_prefers_explicit() {
        assert_eq!(
            extract_field(SAMPLE_BLOCK, CELL_LOCATION_LABEL),
            Some("Main Jail".to_string())
        );
    }

    #[test]
    fn test_cell_location_facility_fallback() {
        let block = "Booking Number: 1\nFacility: Stockade";
        assert_eq!(
            extract_field(block, CELL_LOCATION_LABEL),
            Some("Stockade".to_string())
        );
    }

    #[test]
    fn test_cell_location_excludes_no_file() {
        let block = "Booking Number: 1\nFacility: NO FILE";
        assert_eq!(extract_field(block, CELL_LOCATION_LABEL), None);
    }

    #[test]
    fn test_generic_label_next_line() {
        let block = "Race:\n\nWhite\nSex:\nM";
        assert_eq!(extract_field(block, "Race:"), Some("White".to_string()));
        assert_eq!(extract_field(block, "Sex:"), Some("M".to_string()));
    }

    #[test]
    fn test_label_not_found() {
        assert_eq!(extract_field(SAMPLE_BLOCK, "Arresting Agency:"), None);
        assert_eq!(extract_field("", BOOKING_NUMBER_LABEL), None);
        assert_eq!(extract_field(SAMPLE_BLOCK, ""), None);
    }
}
