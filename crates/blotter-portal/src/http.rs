//! HTTP client for the county booking portal
//!
//! Drives the portal the way an operator's browser session would:
//! navigate to the search page (establishing cookies), post the login
//! form, then post one name query with the fixed lookback window and
//! enumerate the result blocks from the returned page.

use crate::PortalError;
use blotter_domain::traits::{PortalClient, PortalSession};
use blotter_domain::SearchQuery;
use chrono::{Days, Local};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Default portal base URL
pub const DEFAULT_BASE_URL: &str = "https://www3.pbso.org/mediablotter";

/// Default bound for every network wait (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Queries cover bookings from this many days back
pub const LOOKBACK_DAYS: u64 = 730;

// Selector strings are compile-time constants; parsing them cannot fail.
static RESULT_BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[id^="allresults_"]"#).unwrap());

/// HTTP implementation of the portal client
///
/// One `HttpPortal` is shared across all search tasks; every
/// [`navigate`](PortalClient::navigate) call builds a fresh cookie jar
/// so concurrent lookups never share login state.
pub struct HttpPortal {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl HttpPortal {
    /// Create a portal client for the given base URL and credentials
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a portal client against [`DEFAULT_BASE_URL`]
    pub fn default_url(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, username, password)
    }

    /// Override the per-request network timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl PortalClient for HttpPortal {
    type Error = PortalError;
    type Session = HttpSession;

    async fn navigate(&self) -> Result<HttpSession, PortalError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()
            .map_err(|e| PortalError::Navigation(e.to_string()))?;

        let url = format!("{}/index.cfm?fa=search1", self.base_url);
        debug!("Navigating to {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(PortalError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(PortalError::Navigation(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        Ok(HttpSession {
            client,
            base_url: self.base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// One logged-in lookup session against the portal
pub struct HttpSession {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl PortalSession for HttpSession {
    type Error = PortalError;

    async fn authenticate(&mut self) -> Result<(), PortalError> {
        let url = format!("{}/index.cfm?fa=login", self.base_url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(PortalError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(PortalError::Auth(format!("HTTP {}", response.status())));
        }

        let body = response.text().await.map_err(PortalError::from_reqwest)?;

        // The name search form only renders once the login was accepted.
        if !body.contains("firstName") {
            return Err(PortalError::Auth(
                "search form not reachable after login".to_string(),
            ));
        }

        Ok(())
    }

    async fn submit_query(&mut self, query: &SearchQuery) -> Result<Vec<String>, PortalError> {
        let start_date = lookback_start_date();
        info!(
            "Submitting query for {} (start date {})",
            query.display_name(),
            start_date
        );

        let url = format!("{}/index.cfm?fa=search2", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("firstName", query.first_name.as_str()),
                ("lastName", query.last_name.as_str()),
                ("start_date", start_date.as_str()),
            ])
            .send()
            .await
            .map_err(PortalError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(PortalError::Navigation(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response.text().await.map_err(PortalError::from_reqwest)?;
        if !body.contains("resultspage") {
            return Err(PortalError::MalformedPage(
                "results container missing".to_string(),
            ));
        }

        let blocks = parse_result_blocks(&body);
        debug!(
            "{} result block(s) for {}",
            blocks.len(),
            query.display_name()
        );
        Ok(blocks)
    }
}

/// Start date of the fixed lookback window, portal date format
fn lookback_start_date() -> String {
    let start = Local::now().date_naive() - Days::new(LOOKBACK_DAYS);
    start.format("%m/%d/%Y").to_string()
}

/// Pull each result block's visible text, one string per block
fn parse_result_blocks(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    document
        .select(&RESULT_BLOCK_SELECTOR)
        .map(|element| {
            element
                .text()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}
