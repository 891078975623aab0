//! Summary statistics over booking records

use blotter_domain::{BookingRecord, CustodyStatus};
use chrono::Local;
use std::collections::BTreeMap;

/// Aggregate statistics for a record set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    /// Total records
    pub total: usize,

    /// Records currently in custody
    pub in_custody: usize,

    /// Records with a past release date
    pub released: usize,

    /// Average days served (records with positive spans only), one
    /// decimal place
    pub avg_days: f64,

    /// Longest days served
    pub max_days: i64,

    /// Shortest days served
    pub min_days: i64,

    /// Distinct names across the set
    pub unique_names: usize,
}

impl Statistics {
    /// Compute statistics for a record set
    pub fn compute(records: &[BookingRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let in_custody = records
            .iter()
            .filter(|r| r.status == CustodyStatus::InCustody)
            .count();
        let released = records
            .iter()
            .filter(|r| r.status == CustodyStatus::Released)
            .count();

        let days_served: Vec<i64> = records
            .iter()
            .map(|r| r.time_served_days)
            .filter(|days| *days > 0)
            .collect();

        let avg_days = if days_served.is_empty() {
            0.0
        } else {
            let avg = days_served.iter().sum::<i64>() as f64 / days_served.len() as f64;
            (avg * 10.0).round() / 10.0
        };

        Self {
            total: records.len(),
            in_custody,
            released,
            avg_days,
            max_days: days_served.iter().copied().max().unwrap_or(0),
            min_days: days_served.iter().copied().min().unwrap_or(0),
            unique_names: group_by_name(records).len(),
        }
    }

    /// Render the summary block emitted alongside exports
    pub fn summary_block(&self) -> String {
        let generated = Local::now().format("%m/%d/%Y %H:%M");
        format!(
            "Summary Statistics\n\
             Total Records Found: {}\n\
             Currently In Custody: {}\n\
             Released: {}\n\
             Average Time Served (days): {:.1}\n\
             Longest Time Served (days): {}\n\
             Shortest Time Served (days): {}\n\
             Unique Names: {}\n\
             Report Generated: {}",
            self.total,
            self.in_custody,
            self.released,
            self.avg_days,
            self.max_days,
            self.min_days,
            self.unique_names,
            generated
        )
    }
}

/// Group records by name, name-sorted
pub fn group_by_name(records: &[BookingRecord]) -> BTreeMap<String, Vec<&BookingRecord>> {
    let mut groups: BTreeMap<String, Vec<&BookingRecord>> = BTreeMap::new();
    for record in records {
        let name = if record.name.trim().is_empty() {
            "Unknown".to_string()
        } else {
            record.name.clone()
        };
        groups.entry(name).or_default().push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample_records;

    #[test]
    fn test_statistics_counts() {
        let stats = Statistics::compute(&sample_records());

        assert_eq!(stats.total, 2);
        assert_eq!(stats.in_custody, 1);
        assert_eq!(stats.released, 1);
        assert_eq!(stats.unique_names, 2);
        assert_eq!(stats.max_days, 60);
        assert_eq!(stats.min_days, 4);
        assert_eq!(stats.avg_days, 32.0);
    }

    #[test]
    fn test_statistics_empty_set() {
        let stats = Statistics::compute(&[]);
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_statistics_skip_zero_day_spans() {
        let mut records = sample_records();
        records[0].time_served_days = 0;

        let stats = Statistics::compute(&records);
        assert_eq!(stats.avg_days, 4.0);
        assert_eq!(stats.max_days, 4);
        assert_eq!(stats.min_days, 4);
    }

    #[test]
    fn test_summary_block_contents() {
        let stats = Statistics::compute(&sample_records());
        let block = stats.summary_block();

        assert!(block.contains("Total Records Found: 2"));
        assert!(block.contains("Currently In Custody: 1"));
        assert!(block.contains("Average Time Served (days): 32.0"));
        assert!(block.contains("Report Generated:"));
    }

    #[test]
    fn test_group_by_name() {
        let mut records = sample_records();
        records.push(records[0].clone());

        let groups = group_by_name(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Smith, John"].len(), 2);
        assert_eq!(groups["Jones, Mary"].len(), 1);
    }
}
