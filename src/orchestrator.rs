//! Search orchestration: concurrent per-source fan-out and collection.
//!
//! Queries every configured source concurrently, logs per-source failures
//! at warn level, and collects each successful outcome (including empty
//! ones) as a [`SourceResult`] in the configured source order. There is no
//! cross-source deduplication or re-ranking — ranking happens inside each
//! source via the title matcher, and the aggregate preserves per-source
//! grouping.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::source::SourceAdapter;
use crate::sources::{BjjFanaticsSource, SubmetaSource};
use crate::types::{Instructional, Source, SourceResult};

/// Orchestrate a concurrent search across all configured sources.
///
/// # Pipeline
///
/// 1. Fan out the query to each [`Source`] in `config.sources` with
///    [`futures::future::join_all`] (output order follows input order)
/// 2. Log per-source errors at warn level
/// 3. Collect every successful outcome as a [`SourceResult`], in source
///    order, keeping explicitly-empty ones
///
/// A source failure never prevents sibling sources from contributing. If
/// every source fails the aggregate is simply empty — deciding what "no
/// usable source" means is the caller's job.
///
/// Dropping the returned future cancels in-flight source requests; a
/// cancelled source contributes nothing.
pub async fn orchestrate_search(
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SourceResult>, SearchError> {
    let futures: Vec<_> = config
        .sources
        .iter()
        .map(|source| {
            let q = query.to_string();
            let cfg = config.clone();
            let src = *source;
            async move {
                let outcome = query_source(src, &q, &cfg).await;
                (src, outcome)
            }
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;
    Ok(collect_source_results(outcomes))
}

/// Collect per-source outcomes into the aggregate, preserving order.
///
/// Failures are logged and dropped; successes (including empty ones) become
/// [`SourceResult`] entries.
fn collect_source_results(
    outcomes: Vec<(Source, Result<Vec<Instructional>, SearchError>)>,
) -> Vec<SourceResult> {
    let mut results = Vec::with_capacity(outcomes.len());

    for (source, outcome) in outcomes {
        match outcome {
            Ok(instructionals) => {
                tracing::debug!(%source, count = instructionals.len(), "source contributed");
                results.push(SourceResult {
                    source: source.name().to_string(),
                    instructionals,
                });
            }
            Err(err) => {
                tracing::warn!(%source, error = %err, "source unavailable");
            }
        }
    }

    results
}

/// Query a single source, dispatching to the concrete adapter.
async fn query_source(
    source: Source,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<Instructional>, SearchError> {
    match source {
        Source::BjjFanatics => BjjFanaticsSource::new().search(query, config).await,
        Source::Submeta => SubmetaSource::new().search(query, config).await,
    }
}
