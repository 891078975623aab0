//! Trait definitions for external interactions
//!
//! These traits define the boundary between the domain and the portal
//! infrastructure. Implementations live in other crates (blotter-portal).

use crate::SearchQuery;
use std::future::Future;

/// Trait for opening sessions against the booking portal
///
/// Implemented by the infrastructure layer (blotter-portal). One client
/// is shared across all concurrent search tasks; each task opens its own
/// session so that cookies and form state never leak between lookups.
pub trait PortalClient: Send + Sync {
    /// Error type for portal operations
    type Error: std::fmt::Display + Send;

    /// Session type produced by a successful navigation
    type Session: PortalSession<Error = Self::Error> + Send;

    /// Navigate to the portal, yielding a fresh session
    fn navigate(&self) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send;
}

/// One authenticated lookup session against the portal
///
/// The expected call order is `authenticate` then `submit_query`; a
/// session is used for exactly one query and then dropped.
pub trait PortalSession: Send {
    /// Error type for portal operations
    type Error: std::fmt::Display + Send;

    /// Log in with the credentials the client was built with
    fn authenticate(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Submit one name query, returning zero or more raw booking blocks
    ///
    /// Each returned string is one unparsed result block exactly as the
    /// portal rendered it, newline-separated lines included.
    fn submit_query(
        &mut self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}
