//! Error types for the matscout crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. A source adapter returning [`SearchError::Http`]
//! or [`SearchError::Parse`] from its primary query marks that source as
//! unavailable for the query; the orchestrator logs it and moves on. "No
//! acceptable match" is never an error — it is an empty
//! [`crate::types::SourceResult`].

/// Errors that can occur during catalog search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a catalog source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a catalog source response (JSON or HTML).
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for matscout results.
pub type Result<T> = std::result::Result<T, SearchError>;
