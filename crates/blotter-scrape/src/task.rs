//! Per-name search task
//!
//! One task drives one name's end-to-end lookup: open the portal, log
//! in, submit the query, and feed every raw block through the
//! extraction pipeline. Whatever happens, the caller receives the
//! `(name, result text, records)` triple - a failure becomes a
//! diagnostic string plus an empty record list, never a propagated
//! error.

use crate::config::ScrapeConfig;
use crate::progress::{CancelFlag, ProgressSender};
use blotter_domain::traits::{PortalClient, PortalSession};
use blotter_domain::{SearchOutcome, SearchQuery};
use blotter_extract::{normalize, repair_records};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Lifecycle states of one search task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not started yet
    Idle,
    /// Opening the portal
    Navigating,
    /// Logging in
    Authenticating,
    /// Query submitted, waiting for results
    Querying,
    /// Turning raw blocks into records
    Collecting,
    /// Finished successfully
    Done,
    /// Finished with a diagnostic instead of results
    Failed,
}

impl TaskState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::Navigating => "navigating",
            TaskState::Authenticating => "authenticating",
            TaskState::Querying => "querying",
            TaskState::Collecting => "collecting",
            TaskState::Done => "done",
            TaskState::Failed => "failed",
        }
    }
}

/// One name's end-to-end lookup
pub struct SearchTask<P: PortalClient> {
    client: Arc<P>,
    query: SearchQuery,
    delay_secs: (u64, u64),
    state: TaskState,
}

impl<P: PortalClient> SearchTask<P> {
    /// Create a task for one query
    pub fn new(client: Arc<P>, query: SearchQuery, config: &ScrapeConfig) -> Self {
        Self {
            client,
            query,
            delay_secs: (config.min_delay_secs, config.max_delay_secs),
            state: TaskState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Run the task to completion
    ///
    /// Never panics past its boundary and never returns an error: the
    /// outcome triple is always produced.
    pub async fn run(mut self, progress: &ProgressSender, cancel: &CancelFlag) -> SearchOutcome {
        let name = self.query.display_name();
        match self.execute(progress, cancel).await {
            Ok(outcome) => {
                self.state = TaskState::Done;
                outcome
            }
            Err(diagnostic) => {
                self.state = TaskState::Failed;
                warn!("{}", diagnostic);
                progress.status(diagnostic.clone());
                SearchOutcome::failure(name, diagnostic)
            }
        }
    }

    async fn execute(
        &mut self,
        progress: &ProgressSender,
        cancel: &CancelFlag,
    ) -> Result<SearchOutcome, String> {
        let name = self.query.display_name();

        self.state = TaskState::Navigating;
        progress.status(format!("Worker starting for {}", name));
        self.pause().await;
        self.checkpoint(cancel)?;

        let mut session = self
            .client
            .navigate()
            .await
            .map_err(|e| format!("Error processing {}: {}", name, e))?;

        self.state = TaskState::Authenticating;
        progress.status(format!("Logging in for {}", name));
        session
            .authenticate()
            .await
            .map_err(|e| format!("Error processing {}: {}", name, e))?;
        progress.status(format!("Login successful for {}", name));
        self.pause().await;
        self.checkpoint(cancel)?;

        self.state = TaskState::Querying;
        progress.status(format!("Searching for {}", name));
        let blocks = session
            .submit_query(&self.query)
            .await
            .map_err(|e| format!("Error processing {}: {}", name, e))?;

        self.state = TaskState::Collecting;
        if blocks.is_empty() {
            progress.status(format!("No results for {}", name));
            return Ok(SearchOutcome {
                summary: format!("No results for {}.\n", name),
                name,
                records: Vec::new(),
            });
        }

        let mut records: Vec<_> = blocks
            .iter()
            .map(|block| normalize(&name, block))
            .collect();
        repair_records(&mut records);

        progress.status(format!("Found {} results for {}", blocks.len(), name));
        let summary = format!("Results for {}:\n{}\n", name, blocks.join("\n\n"));

        Ok(SearchOutcome {
            name,
            summary,
            records,
        })
    }

    fn checkpoint(&self, cancel: &CancelFlag) -> Result<(), String> {
        if cancel.is_cancelled() {
            Err(format!(
                "Search cancelled for {}",
                self.query.display_name()
            ))
        } else {
            Ok(())
        }
    }

    /// Randomized delay around network-sensitive steps
    ///
    /// A zero upper bound disables delays entirely (test mode).
    async fn pause(&self) {
        let (min, max) = self.delay_secs;
        if max == 0 {
            return;
        }
        let millis = {
            let mut rng = rand::thread_rng();
            rng.gen_range(min * 1000..=max * 1000)
        };
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::progress_channel;
    use blotter_domain::CustodyStatus;
    use blotter_portal::MockPortal;

    fn no_delay_config() -> ScrapeConfig {
        ScrapeConfig {
            max_concurrency: 2,
            min_delay_secs: 0,
            max_delay_secs: 0,
        }
    }

    const BLOCK: &str = "Booking Number: 55521\nBooking Date/Time: 01/01/2024 10:00\nRelease Date: N/A\nCell Location: Main Jail\nCharges:\nBurglary";

    #[tokio::test]
    async fn test_task_collects_and_normalizes() {
        let mut portal = MockPortal::new();
        portal.add_blocks("Smith, John", vec![BLOCK.to_string()]);

        let (tx, mut rx) = progress_channel();
        let task = SearchTask::new(
            Arc::new(portal),
            SearchQuery::new("Smith", "John"),
            &no_delay_config(),
        );
        let outcome = task.run(&tx, &CancelFlag::new()).await;

        assert_eq!(outcome.name, "Smith, John");
        assert!(outcome.summary.starts_with("Results for Smith, John:"));
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].booking_number, "55521");
        assert_eq!(outcome.records[0].status, CustodyStatus::InCustody);
        assert_eq!(outcome.records[0].name, "Smith, John");

        drop(tx);
        let mut statuses = Vec::new();
        while let Some(event) = rx.recv().await {
            if let crate::progress::ProgressEvent::Status(s) = event {
                statuses.push(s);
            }
        }
        assert!(statuses.iter().any(|s| s.contains("Found 1 results")));
    }

    #[tokio::test]
    async fn test_task_no_results() {
        let portal = MockPortal::new();
        let (tx, _rx) = progress_channel();
        let task = SearchTask::new(
            Arc::new(portal),
            SearchQuery::new("Nobody", "Here"),
            &no_delay_config(),
        );
        let outcome = task.run(&tx, &CancelFlag::new()).await;

        assert_eq!(outcome.summary, "No results for Nobody, Here.\n");
        assert!(outcome.records.is_empty());
    }

    #[tokio::test]
    async fn test_task_failure_yields_diagnostic_triple() {
        let mut portal = MockPortal::new();
        portal.add_failure("Jones, Mary", "navigation timed out");

        let (tx, _rx) = progress_channel();
        let task = SearchTask::new(
            Arc::new(portal),
            SearchQuery::new("Jones", "Mary"),
            &no_delay_config(),
        );
        let outcome = task.run(&tx, &CancelFlag::new()).await;

        assert_eq!(outcome.name, "Jones, Mary");
        assert!(outcome.summary.contains("Error processing Jones, Mary"));
        assert!(outcome.records.is_empty());
    }

    #[tokio::test]
    async fn test_task_auth_failure() {
        let mut portal = MockPortal::new();
        portal.fail_authentication("bad credentials");

        let (tx, _rx) = progress_channel();
        let task = SearchTask::new(
            Arc::new(portal),
            SearchQuery::new("Smith", "John"),
            &no_delay_config(),
        );
        let outcome = task.run(&tx, &CancelFlag::new()).await;

        assert!(outcome.summary.contains("bad credentials"));
        assert!(outcome.records.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_task_bails_out() {
        let mut portal = MockPortal::new();
        portal.add_blocks("Smith, John", vec![BLOCK.to_string()]);

        let cancel = CancelFlag::new();
        cancel.cancel();

        let (tx, _rx) = progress_channel();
        let task = SearchTask::new(
            Arc::new(portal.clone()),
            SearchQuery::new("Smith", "John"),
            &no_delay_config(),
        );
        let outcome = task.run(&tx, &cancel).await;

        assert!(outcome.summary.contains("cancelled"));
        assert!(outcome.records.is_empty());
        assert_eq!(portal.query_count(), 0);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(TaskState::Idle.as_str(), "idle");
        assert_eq!(TaskState::Failed.as_str(), "failed");
    }
}
