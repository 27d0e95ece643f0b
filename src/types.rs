//! Core types for instructional search results and source identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported catalog sources that matscout can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// BJJ Fanatics — storefront with a JSON search API; episode and
    /// chapter detail lives on scraped product pages.
    BjjFanatics,
    /// Submeta — GraphQL catalog scoped per creator, with nested
    /// course → chapter → content records.
    Submeta,
}

impl Source {
    /// Returns the human-readable name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BjjFanatics => "BJJFanatics",
            Self::Submeta => "Submeta",
        }
    }

    /// Returns all available source variants.
    pub fn all() -> &'static [Source] {
        &[Self::BjjFanatics, Self::Submeta]
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named timestamp mark inside an episode.
///
/// `time` is preserved exactly as the source supplied it — it may be a
/// plain duration ("754") or a range string ("0:00 - 12:34"). Splitting a
/// range into start/end is a presentation concern, not ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title.
    pub title: String,
    /// Raw time string, unmodified.
    pub time: String,
}

/// One video of an instructional, with its chapter marks in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode title.
    pub title: String,
    /// Chapter marks, chronological within the episode.
    pub chapters: Vec<Chapter>,
}

/// Aggregate review data for an instructional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Average review score.
    pub score: f64,
    /// Total number of reviews behind the average.
    pub total: u32,
}

/// The normalized entity every source adapter produces.
///
/// `title` is always non-empty; every other field defaults to its empty
/// equivalent when the source lacks the data. Adapters never fail solely
/// because optional metadata is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructional {
    /// Instructional title.
    pub title: String,
    /// Long-form description, empty when unavailable.
    #[serde(default)]
    pub description: String,
    /// Canonical page URL at the source, empty when unavailable.
    #[serde(default)]
    pub url: String,
    /// Name of the source that produced this entity.
    #[serde(default)]
    pub source: String,
    /// Cover image URL, empty when unavailable.
    #[serde(default)]
    pub image: String,
    /// Instructor names in source order.
    #[serde(default)]
    pub instructors: Vec<String>,
    /// Review aggregate, when the source carries one.
    #[serde(default)]
    pub review: Option<Review>,
    /// Category labels in source order.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Episode breakdown in source order.
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// One source's contribution for one query.
///
/// An empty `instructionals` vec means the source answered but nothing
/// cleared the relevance bar — distinct from the source being unavailable,
/// which the orchestrator drops from the aggregate entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceResult {
    /// Name of the contributing source.
    pub source: String,
    /// Resolved instructionals, best match first.
    pub instructionals: Vec<Instructional>,
}
