//! Bounded-concurrency aggregation of search tasks
//!
//! Runs every query as an independent task under a semaphore, merging
//! each completed task's output into shared state inside one critical
//! section: the per-name text-result map, the consolidated dataset and
//! the completed counter always change together, so a progress count
//! can never disagree with the dataset it describes.

use crate::config::ScrapeConfig;
use crate::progress::{CancelFlag, ProgressEvent, ProgressSender};
use crate::task::SearchTask;
use blotter_domain::traits::PortalClient;
use blotter_domain::{CustodyStatus, Dataset, SearchOutcome, SearchQuery};
use blotter_extract::repair_records;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Final output of one aggregated run
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Per-name text results concatenated in name-sorted order,
    /// separated by a rule line
    pub combined_text: String,

    /// Consolidated dataset across all tasks
    pub dataset: Dataset,
}

/// Everything guarded by the aggregation lock
#[derive(Default)]
struct AggregateState {
    results: BTreeMap<String, String>,
    dataset: Dataset,
    completed: usize,
}

/// Bounded-concurrency scheduler for a batch of search tasks
pub struct Aggregator {
    config: ScrapeConfig,
    cancel: CancelFlag,
}

impl Aggregator {
    /// Create an aggregator, normalizing the supplied configuration
    pub fn new(config: ScrapeConfig) -> Self {
        Self {
            config: config.normalized(),
            cancel: CancelFlag::new(),
        }
    }

    /// The run's cancellation hook
    ///
    /// Cancelling stops new dispatches; tasks already in flight bail at
    /// their next checkpoint.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The normalized configuration this aggregator runs with
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run every query and collect the consolidated results
    ///
    /// All failures are absorbed: a failed task contributes its
    /// diagnostic text and zero records, and the run always completes.
    pub async fn run<P>(
        &self,
        client: Arc<P>,
        queries: Vec<SearchQuery>,
        progress: ProgressSender,
    ) -> ScrapeReport
    where
        P: PortalClient + 'static,
    {
        let total = queries.len();
        if total == 0 {
            return ScrapeReport::default();
        }

        progress.status("Starting parallel searches...");
        info!(
            "Starting parallel searches with {} workers",
            self.config.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let state = Arc::new(Mutex::new(AggregateState::default()));
        let mut tasks = JoinSet::new();

        for query in queries {
            if self.cancel.is_cancelled() {
                warn!("Run cancelled before dispatching {}", query.display_name());
                break;
            }

            let semaphore = Arc::clone(&semaphore);
            let client = Arc::clone(&client);
            let state = Arc::clone(&state);
            let progress = progress.clone();
            let config = self.config.clone();
            let cancel = self.cancel.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let task = SearchTask::new(client, query, &config);
                let outcome = task.run(&progress, &cancel).await;
                merge_outcome(&state, outcome, total, &progress);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                // A task that died mid-merge still unblocks the pool and
                // must not lose the other tasks' results.
                error!("Search task aborted: {}", e);
                merge_aborted(&state, total, &progress);
            }
        }

        let (combined_text, dataset) = {
            let mut locked = lock_state(&state);
            let mut combined = String::new();
            for text in locked.results.values() {
                combined.push_str(text);
                combined.push('\n');
                combined.push_str(&"-".repeat(50));
                combined.push_str("\n\n");
            }
            (combined, std::mem::take(&mut locked.dataset))
        };

        let total_records = dataset.len();
        progress.send(ProgressEvent::Finished { total_records });
        progress.status(format!(
            "All searches complete. Found {} booking records.",
            total_records
        ));
        info!("All searches complete. Found {} booking records.", total_records);

        ScrapeReport {
            combined_text,
            dataset,
        }
    }
}

/// Merge one task's outcome into shared state, then notify
fn merge_outcome(
    state: &Mutex<AggregateState>,
    outcome: SearchOutcome,
    total: usize,
    progress: &ProgressSender,
) {
    let SearchOutcome {
        name,
        summary,
        mut records,
    } = outcome;

    info!("Received {} records for {}", records.len(), name);
    if records.is_empty() {
        warn!("No booking data received for {}", name);
    }

    let (completed, total_records) = {
        let mut locked = lock_state(state);

        for record in &mut records {
            if record.name.trim().is_empty() {
                record.name = name.clone();
            }
        }
        repair_records(&mut records);

        let in_custody = records
            .iter()
            .filter(|r| r.status == CustodyStatus::InCustody)
            .count();
        let released = records
            .iter()
            .filter(|r| r.status == CustodyStatus::Released)
            .count();
        info!(
            "Added {} records for {} (In Custody: {}, Released: {})",
            records.len(),
            name,
            in_custody,
            released
        );

        locked.results.insert(name.clone(), summary);
        locked.dataset.extend(records);
        locked.completed += 1;
        (locked.completed, locked.dataset.len())
    };

    notify_completion(progress, name, completed, total, total_records);
}

/// Count an aborted task as a completion with zero records
fn merge_aborted(state: &Mutex<AggregateState>, total: usize, progress: &ProgressSender) {
    let (completed, total_records) = {
        let mut locked = lock_state(state);
        locked.completed += 1;
        (locked.completed, locked.dataset.len())
    };
    notify_completion(progress, "(aborted)".to_string(), completed, total, total_records);
}

fn notify_completion(
    progress: &ProgressSender,
    name: String,
    completed: usize,
    total: usize,
    total_records: usize,
) {
    let percent = (completed * 100 / total) as u32;
    progress.send(ProgressEvent::TaskCompleted {
        name,
        completed,
        total,
        percent,
        total_records,
    });
    progress.status(format!(
        "Progress: {}% ({}/{}) - Total records: {}",
        percent, completed, total, total_records
    ));
}

fn lock_state(state: &Mutex<AggregateState>) -> MutexGuard<'_, AggregateState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::progress_channel;
    use blotter_portal::MockPortal;

    const BLOCK_A: &str = "Booking Number: 11111\nBooking Date/Time: 01/01/2024 10:00\nRelease Date: N/A\nCell Location: Main Jail\nCharges:\nBurglary";
    const BLOCK_B: &str = "Booking Number: 22222\nBooking Date/Time: 02/01/2024 09:00\nRelease Date: 02/05/2024 12:00\nCell Location: Stockade\nCharges:\nTrespassing";

    fn no_delay_config(max_concurrency: usize) -> ScrapeConfig {
        ScrapeConfig {
            max_concurrency,
            min_delay_secs: 0,
            max_delay_secs: 0,
        }
    }

    fn queries(names: &[(&str, &str)]) -> Vec<SearchQuery> {
        names
            .iter()
            .map(|(last, first)| SearchQuery::new(last, first))
            .collect()
    }

    #[tokio::test]
    async fn test_two_concurrent_tasks_merge_fully() {
        let mut portal = MockPortal::new();
        portal.add_blocks(
            "Smith, John",
            vec![BLOCK_A.to_string(), BLOCK_B.to_string()],
        );
        portal.add_blocks("Jones, Mary", vec![BLOCK_A.to_string()]);

        let (tx, mut rx) = progress_channel();
        let aggregator = Aggregator::new(no_delay_config(2));
        let report = aggregator
            .run(
                Arc::new(portal),
                queries(&[("Smith", "John"), ("Jones", "Mary")]),
                tx,
            )
            .await;

        assert_eq!(report.dataset.len(), 3);

        let mut completions = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ProgressEvent::TaskCompleted {
                completed, percent, ..
            } = event
            {
                completions.push((completed, percent));
            }
        }
        assert_eq!(completions.len(), 2);
        assert_eq!(completions.last(), Some(&(2, 100)));
    }

    #[tokio::test]
    async fn test_combined_text_is_name_sorted() {
        let mut portal = MockPortal::new();
        portal.add_blocks("Zeta, Amy", vec![BLOCK_A.to_string()]);
        portal.add_blocks("Alpha, Bob", vec![BLOCK_B.to_string()]);

        let (tx, _rx) = progress_channel();
        let aggregator = Aggregator::new(no_delay_config(2));
        let report = aggregator
            .run(
                Arc::new(portal),
                queries(&[("Zeta", "Amy"), ("Alpha", "Bob")]),
                tx,
            )
            .await;

        let alpha = report.combined_text.find("Results for Alpha, Bob").unwrap();
        let zeta = report.combined_text.find("Results for Zeta, Amy").unwrap();
        assert!(alpha < zeta);
        assert!(report.combined_text.contains(&"-".repeat(50)));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stall_siblings() {
        let mut portal = MockPortal::new();
        portal.add_blocks("Smith, John", vec![BLOCK_A.to_string()]);
        portal.add_failure("Jones, Mary", "navigation timed out");

        let (tx, mut rx) = progress_channel();
        let aggregator = Aggregator::new(no_delay_config(2));
        let report = aggregator
            .run(
                Arc::new(portal),
                queries(&[("Smith", "John"), ("Jones", "Mary")]),
                tx,
            )
            .await;

        assert_eq!(report.dataset.len(), 1);
        assert!(report
            .combined_text
            .contains("Error processing Jones, Mary"));

        let mut completed_count = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, ProgressEvent::TaskCompleted { .. }) {
                completed_count += 1;
            }
        }
        assert_eq!(completed_count, 2);
    }

    #[tokio::test]
    async fn test_empty_query_list_yields_empty_report() {
        let portal = MockPortal::new();
        let (tx, _rx) = progress_channel();
        let aggregator = Aggregator::new(no_delay_config(2));
        let report = aggregator.run(Arc::new(portal), Vec::new(), tx).await;

        assert!(report.dataset.is_empty());
        assert!(report.combined_text.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_run_dispatches_nothing() {
        let mut portal = MockPortal::new();
        portal.add_blocks("Smith, John", vec![BLOCK_A.to_string()]);

        let aggregator = Aggregator::new(no_delay_config(2));
        aggregator.cancel_flag().cancel();

        let (tx, _rx) = progress_channel();
        let report = aggregator
            .run(
                Arc::new(portal.clone()),
                queries(&[("Smith", "John")]),
                tx,
            )
            .await;

        assert!(report.dataset.is_empty());
        assert_eq!(portal.query_count(), 0);
    }

    #[tokio::test]
    async fn test_pool_larger_than_query_count() {
        let mut portal = MockPortal::new();
        portal.add_blocks("Smith, John", vec![BLOCK_A.to_string()]);

        let (tx, _rx) = progress_channel();
        let aggregator = Aggregator::new(no_delay_config(10));
        let report = aggregator
            .run(Arc::new(portal), queries(&[("Smith", "John")]), tx)
            .await;

        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dataset.records()[0].name, "Smith, John");
    }
}
