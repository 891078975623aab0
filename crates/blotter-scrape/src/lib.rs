//! Blotter Scrape Layer
//!
//! Runs a list of name queries against the portal under a bounded
//! worker pool and merges every task's output into one consolidated
//! dataset.
//!
//! # Architecture
//!
//! ```text
//! names → Aggregator → SearchTask (xN, semaphore-bounded)
//!                          └→ portal → extract → normalize → records
//!        ← merge under one lock ← (name, text, records) triples
//! ```
//!
//! Each task communicates only through its final [`SearchOutcome`]
//! triple; the only shared mutable state is the aggregator's critical
//! section. One task failing never stalls or aborts the others, and
//! progress is pushed to the caller after every completion.
//!
//! [`SearchOutcome`]: blotter_domain::SearchOutcome

#![warn(missing_docs)]

pub mod aggregator;
pub mod config;
pub mod progress;
pub mod task;

pub use aggregator::{Aggregator, ScrapeReport};
pub use config::ScrapeConfig;
pub use progress::{progress_channel, CancelFlag, ProgressEvent, ProgressReceiver, ProgressSender};
pub use task::{SearchTask, TaskState};
