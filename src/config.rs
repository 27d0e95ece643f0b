//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which sources are queried, how many top
//! matches each source fully resolves, timeouts, and request behaviour.

use crate::error::SearchError;
use crate::types::Source;

/// Configuration for one catalog search operation.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Which catalog sources to query. Queried concurrently; each source
    /// contributes its own result group, in this order.
    pub sources: Vec<Source>,
    /// How many top title matches each source fully resolves into
    /// instructionals. `1` resolves only the single best match.
    pub match_limit: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Creator handle scoping Submeta catalog queries.
    pub creator_handle: String,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sources: vec![Source::BjjFanatics, Source::Submeta],
            match_limit: 1,
            timeout_seconds: 10,
            creator_handle: "lachlangiles".into(),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `match_limit` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `sources` must not be empty
    /// - `creator_handle` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.match_limit == 0 {
            return Err(SearchError::Config(
                "match_limit must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.sources.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be enabled".into(),
            ));
        }
        if self.creator_handle.is_empty() {
            return Err(SearchError::Config(
                "creator_handle must not be empty".into(),
            ));
        }
        Ok(())
    }
}
