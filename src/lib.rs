//! # matscout
//!
//! Fuzzy title search and metadata aggregation across BJJ instructional
//! catalogs.
//!
//! Given a free-text query, matscout queries one or more independent
//! catalog sources (each with its own retrieval protocol and schema),
//! normalizes heterogeneous records into a common [`Instructional`] entity,
//! ranks candidates by token-sort similarity to the query, and returns a
//! deterministic, ranked list of best matches grouped per source.
//!
//! ## Design
//!
//! - Sources are queried concurrently; each contributes its own
//!   [`SourceResult`] group, in configured order
//! - Ranking happens inside each source via the title matcher; results are
//!   never re-ranked or deduplicated across sources
//! - A failing source is dropped from the aggregate without affecting its
//!   siblings; "nothing matched" is an empty group, not a failure
//! - Secondary detail fetches (product pages, course breakdowns) degrade
//!   per record instead of failing a whole source
//!
//! ## Scope
//!
//! This is a library: no files are written, no XML or JSON emitted, no
//! persistent cache kept. Downstream consumers (CLI, file organizer, NFO
//! writer) receive [`Instructional`] values and do their own I/O. Search
//! queries are logged at trace level only.

pub mod config;
pub mod error;
pub mod http;
pub mod matcher;
pub mod orchestrator;
pub mod source;
pub mod sources;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use matcher::{best_matches, similarity, Candidate, TitleMatch};
pub use source::SourceAdapter;
pub use types::{Chapter, Episode, Instructional, Review, Source, SourceResult};

/// Search the configured catalog sources concurrently.
///
/// Queries every source in `config.sources`, resolves each source's top
/// `config.match_limit` title matches into [`Instructional`] values, and
/// returns one [`SourceResult`] per source that answered, in configured
/// order. Sources that fail are logged and omitted; if every source fails
/// the returned vec is empty.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the configuration is invalid. Source
/// failures are never surfaced here.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> matscout::Result<()> {
/// let config = matscout::SearchConfig::default();
/// let results = matscout::search("Leg Lock Lachlan Giles", &config).await?;
/// for group in &results {
///     for instructional in &group.instructionals {
///         println!("[{}] {}", group.source, instructional.title);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SourceResult>> {
    config.validate()?;
    orchestrator::orchestrate_search(query, config).await
}

/// Search with sensible default configuration.
///
/// Convenience wrapper around [`search`] using [`SearchConfig::default()`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(query: &str) -> Result<Vec<SourceResult>> {
    search(query, &SearchConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_validates_config_zero_match_limit() {
        let config = SearchConfig {
            match_limit: 0,
            ..Default::default()
        };
        let result = search("test", &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("match_limit"));
    }

    #[tokio::test]
    async fn search_validates_config_empty_sources() {
        let config = SearchConfig {
            sources: vec![],
            ..Default::default()
        };
        let result = search("test", &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("source"));
    }

    #[tokio::test]
    async fn search_validates_config_zero_timeout() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let result = search("test", &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }
}
