//! Trait definition for pluggable catalog source backends.
//!
//! Each catalog (BJJ Fanatics, Submeta) implements [`SourceAdapter`] to
//! provide a uniform interface for querying, matching, and resolving
//! instructionals.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{Instructional, Source};

/// A pluggable catalog source backend.
///
/// Implementors query a specific catalog, run the title matcher over the
/// raw candidate list, and resolve the top matches into fully-populated
/// [`Instructional`] values. Each source handles its own:
///
/// - request construction (query encoding, GraphQL bodies, headers)
/// - response deserialization (JSON models or CSS-selector HTML parsing)
/// - secondary detail fetches for selected matches, with per-record
///   degradation when a detail fetch fails
///
/// An `Err` from [`search`](SourceAdapter::search) means the source is
/// unavailable for this query (primary query transport or parse failure).
/// `Ok(vec![])` means the source answered but nothing matched.
///
/// All implementations must be `Send + Sync` for concurrent source queries.
pub trait SourceAdapter: Send + Sync {
    /// Query this source, match candidate titles, and resolve the top
    /// `config.match_limit` matches into instructionals, best first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the primary query HTTP request fails or
    /// its response cannot be parsed. Secondary detail-fetch failures are
    /// absorbed per record and never surface here.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<Instructional>, SearchError>> + Send;

    /// Returns which [`Source`] variant this implementation represents.
    fn source_type(&self) -> Source;
}
