//! Blotter Portal Layer
//!
//! Implementations of the `PortalClient`/`PortalSession` traits from
//! `blotter-domain`.
//!
//! # Clients
//!
//! - `MockPortal`: deterministic canned-result client for testing
//! - `HttpPortal`: the county booking portal over HTTP
//!
//! # Examples
//!
//! ```
//! use blotter_portal::MockPortal;
//! use blotter_domain::SearchQuery;
//! use blotter_domain::traits::{PortalClient, PortalSession};
//!
//! # async fn example() {
//! let mut portal = MockPortal::new();
//! portal.add_blocks("Smith, John", vec!["Booking Number: 1".to_string()]);
//!
//! let mut session = portal.navigate().await.unwrap();
//! session.authenticate().await.unwrap();
//! let blocks = session
//!     .submit_query(&SearchQuery::new("Smith", "John"))
//!     .await
//!     .unwrap();
//! assert_eq!(blocks.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

pub mod http;

use blotter_domain::traits::{PortalClient, PortalSession};
use blotter_domain::SearchQuery;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::HttpPortal;

/// Errors that can occur while driving the portal
#[derive(Error, Debug)]
pub enum PortalError {
    /// Could not reach or load a portal page
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Login was rejected or the search form never appeared
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A bounded network wait elapsed
    #[error("Portal timeout")]
    Timeout,

    /// The results page did not have the expected structure
    #[error("Malformed results page: {0}")]
    MalformedPage(String),
}

impl PortalError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            PortalError::Timeout
        } else {
            PortalError::Navigation(error.to_string())
        }
    }
}

/// Mock portal for deterministic testing
///
/// Returns pre-configured raw blocks keyed by the query's display name
/// without any network traffic, and can simulate per-name failures.
///
/// # Examples
///
/// ```
/// use blotter_portal::MockPortal;
///
/// let mut portal = MockPortal::new();
/// portal.add_blocks("Smith, John", vec!["Booking Number: 1".to_string()]);
/// portal.add_failure("Jones, Mary", "navigation timed out");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPortal {
    responses: Arc<Mutex<HashMap<String, Vec<String>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    auth_failure: Option<String>,
    query_count: Arc<Mutex<usize>>,
}

impl MockPortal {
    /// Create a mock portal with no canned results
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the raw blocks returned for a display name
    pub fn add_blocks(&mut self, name: impl Into<String>, blocks: Vec<String>) {
        self.responses.lock().unwrap().insert(name.into(), blocks);
    }

    /// Make queries for a display name fail with a navigation error
    pub fn add_failure(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(name.into(), message.into());
    }

    /// Make every authentication attempt fail
    pub fn fail_authentication(&mut self, message: impl Into<String>) {
        self.auth_failure = Some(message.into());
    }

    /// Number of queries submitted across all sessions
    pub fn query_count(&self) -> usize {
        *self.query_count.lock().unwrap()
    }
}

impl PortalClient for MockPortal {
    type Error = PortalError;
    type Session = MockSession;

    async fn navigate(&self) -> Result<MockSession, PortalError> {
        Ok(MockSession {
            responses: Arc::clone(&self.responses),
            failures: Arc::clone(&self.failures),
            auth_failure: self.auth_failure.clone(),
            query_count: Arc::clone(&self.query_count),
        })
    }
}

/// Session produced by [`MockPortal::navigate`]
#[derive(Debug)]
pub struct MockSession {
    responses: Arc<Mutex<HashMap<String, Vec<String>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    auth_failure: Option<String>,
    query_count: Arc<Mutex<usize>>,
}

impl PortalSession for MockSession {
    type Error = PortalError;

    async fn authenticate(&mut self) -> Result<(), PortalError> {
        match &self.auth_failure {
            Some(message) => Err(PortalError::Auth(message.clone())),
            None => Ok(()),
        }
    }

    async fn submit_query(&mut self, query: &SearchQuery) -> Result<Vec<String>, PortalError> {
        *self.query_count.lock().unwrap() += 1;

        let name = query.display_name();
        if let Some(message) = self.failures.lock().unwrap().get(&name) {
            return Err(PortalError::Navigation(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        Ok(responses.get(&name).cloned().unwrap_or_default())
    }
}
