//! Push-model progress notifications and the cancellation hook

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Notification pushed to the caller while a run is in flight
///
/// Events are emitted in completion order, one `TaskCompleted` per
/// finished task plus interleaved `Status` lines relayed from the tasks
/// themselves.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Human-readable status line from a task or the aggregator
    Status(String),

    /// One search task finished (successfully or not)
    TaskCompleted {
        /// Display name of the completed query
        name: String,
        /// Tasks finished so far
        completed: usize,
        /// Tasks in the whole run
        total: usize,
        /// `completed / total * 100`, integer
        percent: u32,
        /// Records collected across all completed tasks
        total_records: usize,
    },

    /// Every task has completed and the dataset is final
    Finished {
        /// Records in the final dataset
        total_records: usize,
    },
}

/// Sending half of the progress channel
///
/// Sends never block and never fail loudly: a caller that dropped its
/// receiver simply stops being notified.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    /// Push one event
    pub fn send(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }

    /// Push a status line
    pub fn status(&self, message: impl Into<String>) {
        self.send(ProgressEvent::Status(message.into()));
    }
}

/// Receiving half of the progress channel
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Create a progress channel pair
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, rx)
}

/// Shared cancellation flag
///
/// Checked between suspension points: a cancelled run dispatches no new
/// tasks and tasks bail out at their next checkpoint. Mid-request
/// cancellation is intentionally not supported.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a fresh, uncancelled flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
