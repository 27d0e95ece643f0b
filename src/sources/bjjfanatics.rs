//! BJJ Fanatics catalog source — JSON search API plus scraped product pages.
//!
//! The storefront exposes a keyword search endpoint returning a flat JSON
//! list of videos with titles and light metadata. Description and the
//! episode/chapter breakdown only exist on the product detail page, so each
//! selected match costs one extra HTML fetch, cached per adapter instance.

use std::sync::Arc;

use moka::future::Cache;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::matcher::{self, Candidate};
use crate::source::SourceAdapter;
use crate::types::{Chapter, Episode, Instructional, Review, Source};

/// Keyword search endpoint of the storefront's product API.
const SEARCH_ENDPOINT: &str = "https://bjjfanatics-msigw.ondigitalocean.app/v4/products/search";

/// Base URL for resolving relative product links from the API.
const STOREFRONT_BASE: &str = "https://bjjfanatics.com/";

/// Maximum product pages kept in the per-instance detail cache.
///
/// The cache exists so that resolving several matches pointing at the same
/// product (or repeated queries against a long-lived adapter) fetch each
/// page once. Eviction is capacity-based; entries have no TTL and live as
/// long as the adapter instance, which is typically one search call.
const DETAIL_CACHE_CAPACITY: u64 = 64;

/// One video record from the search API.
///
/// Every field except `title` defaults when absent — a record with missing
/// metadata must still deserialize.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogVideo {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) image: String,
    #[serde(default)]
    pub(crate) authors: Vec<String>,
    #[serde(default)]
    pub(crate) categories: Vec<String>,
    #[serde(default)]
    pub(crate) review: Option<CatalogReview>,
}

/// Review aggregate as the search API reports it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogReview {
    #[serde(default)]
    pub(crate) average_score: f64,
    #[serde(default)]
    pub(crate) total_reviews: u32,
}

/// Top-level search API response. Fields beyond `videos` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    pub(crate) videos: Vec<CatalogVideo>,
}

/// Description and episode breakdown parsed from one product page.
#[derive(Debug, Clone, Default)]
pub(crate) struct DetailPage {
    pub(crate) description: String,
    pub(crate) episodes: Vec<Episode>,
}

/// BJJ Fanatics source adapter.
///
/// Holds a detail-page cache keyed by product URL, so inspecting the same
/// record twice (description then episodes, or across queries) performs a
/// single fetch.
pub struct BjjFanaticsSource {
    detail_cache: Cache<String, Arc<String>>,
}

impl BjjFanaticsSource {
    /// Create an adapter with an empty detail-page cache.
    pub fn new() -> Self {
        Self {
            detail_cache: Cache::builder()
                .max_capacity(DETAIL_CACHE_CAPACITY)
                .build(),
        }
    }

    /// Fetch a product page, going through the per-instance cache.
    async fn fetch_detail(
        &self,
        client: &reqwest::Client,
        raw_url: &str,
    ) -> Result<Arc<String>, SearchError> {
        let url = resolve_product_url(raw_url)?;

        if let Some(html) = self.detail_cache.get(&url).await {
            tracing::trace!(%url, "detail page cache hit");
            return Ok(html);
        }

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("BJJFanatics detail request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("BJJFanatics detail HTTP error: {e}")))?;

        let html = Arc::new(
            response
                .text()
                .await
                .map_err(|e| SearchError::Http(format!("BJJFanatics detail read failed: {e}")))?,
        );

        self.detail_cache.insert(url, Arc::clone(&html)).await;
        Ok(html)
    }

    /// Resolve one matched video into an [`Instructional`].
    ///
    /// A failed detail fetch degrades this record to an empty description
    /// and no episodes; it never fails the adapter call.
    async fn resolve_video(
        &self,
        client: &reqwest::Client,
        video: &CatalogVideo,
    ) -> Instructional {
        tracing::trace!(title = %video.title, "resolving BJJFanatics video");
        let detail = match self.fetch_detail(client, &video.url).await {
            Ok(html) => Some(parse_detail_page(&html)),
            Err(err) => {
                tracing::warn!(title = %video.title, error = %err, "detail fetch failed, degrading record");
                None
            }
        };
        build_instructional(video, detail)
    }
}

impl Default for BjjFanaticsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for BjjFanaticsSource {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<Instructional>, SearchError> {
        tracing::trace!(query, "BJJFanatics search");

        let client = http::build_client(config)?;

        let response = client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("term", query),
                ("qtyBestSellers", "5"),
                ("qtyNewReleases", "3"),
                ("qtyAll", "10000"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("BJJFanatics request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("BJJFanatics HTTP error: {e}")))?;

        let catalog: CatalogResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("BJJFanatics response parse failed: {e}")))?;

        tracing::debug!(count = catalog.videos.len(), "BJJFanatics candidates received");

        let candidates = to_candidates(&catalog.videos);
        let matches = matcher::best_matches(query, &candidates, config.match_limit);

        let mut results = Vec::with_capacity(matches.len());
        for title_match in &matches {
            let video = &catalog.videos[title_match.index];
            results.push(self.resolve_video(&client, video).await);
        }

        tracing::debug!(resolved = results.len(), "BJJFanatics search done");
        Ok(results)
    }

    fn source_type(&self) -> Source {
        Source::BjjFanatics
    }
}

/// Build matcher candidates from raw video records.
///
/// Records without a title cannot be matched (and would violate the
/// non-empty-title invariant downstream), so they are skipped; the index
/// still points at the original array position.
pub(crate) fn to_candidates(videos: &[CatalogVideo]) -> Vec<Candidate> {
    videos
        .iter()
        .enumerate()
        .filter(|(_, video)| !video.title.trim().is_empty())
        .map(|(index, video)| Candidate {
            title: video.title.clone(),
            index,
        })
        .collect()
}

/// Resolve a possibly-relative product link against the storefront base.
pub(crate) fn resolve_product_url(raw: &str) -> Result<String, SearchError> {
    let base = Url::parse(STOREFRONT_BASE)
        .map_err(|e| SearchError::Parse(format!("invalid storefront base: {e}")))?;
    base.join(raw)
        .map(Into::into)
        .map_err(|e| SearchError::Parse(format!("invalid product URL {raw:?}: {e}")))
}

/// Parse a product page into description and episode breakdown.
pub(crate) fn parse_detail_page(html: &str) -> DetailPage {
    let document = Html::parse_document(html);
    DetailPage {
        description: parse_description(&document),
        episodes: parse_episodes(&document),
    }
}

/// Extract the long-form description from `div.product_description`.
///
/// Collects header, paragraph, and list-item text in document order,
/// one line per element. Returns an empty string when the container is
/// missing — absence of a description is not an error.
fn parse_description(document: &Html) -> String {
    let Ok(container_sel) = Selector::parse("div.product_description") else {
        return String::new();
    };
    let Some(container) = document.select(&container_sel).next() else {
        return String::new();
    };
    let Ok(text_sel) = Selector::parse("h1, h2, h3, h4, h5, h6, p, li") else {
        return String::new();
    };

    let mut text = String::new();
    for element in container.select(&text_sel) {
        let line = element.text().collect::<String>();
        let line = line.trim();
        if !line.is_empty() {
            text.push_str(line);
            text.push('\n');
        }
    }
    text
}

/// Extract episodes from the course-content accordion.
///
/// The page lists episode names (`h3.product__course-title`) and chapter
/// tables (`figure.table`) as parallel sequences; a count mismatch means
/// the page layout changed and yields no episodes rather than misaligned
/// ones. Each table row contributes one chapter from its first two cells.
fn parse_episodes(document: &Html) -> Vec<Episode> {
    let selectors = (
        Selector::parse("div.product__course-content-accordion"),
        Selector::parse("h3.product__course-title"),
        Selector::parse("figure.table"),
        Selector::parse("tr"),
        Selector::parse("td"),
    );
    let (Ok(accordion_sel), Ok(title_sel), Ok(table_sel), Ok(row_sel), Ok(cell_sel)) = selectors
    else {
        return vec![];
    };

    let Some(accordion) = document.select(&accordion_sel).next() else {
        return vec![];
    };

    let names: Vec<ElementRef> = accordion.select(&title_sel).collect();
    let tables: Vec<ElementRef> = accordion.select(&table_sel).collect();
    if names.len() != tables.len() {
        tracing::debug!(
            names = names.len(),
            tables = tables.len(),
            "episode name/table count mismatch, skipping episodes"
        );
        return vec![];
    }

    names
        .iter()
        .zip(tables)
        .map(|(name, table)| {
            let chapters = table
                .select(&row_sel)
                .filter_map(|row| {
                    let mut cells = row.select(&cell_sel);
                    let title_cell = cells.next()?;
                    let time_cell = cells.next()?;
                    Some(Chapter {
                        title: title_cell.text().collect::<String>().trim().to_string(),
                        // Raw time string, preserved unmodified. It may be a
                        // duration or a "start - end" range.
                        time: time_cell.text().collect::<String>(),
                    })
                })
                .collect();
            Episode {
                title: name.text().collect::<String>().trim().to_string(),
                chapters,
            }
        })
        .collect()
}

/// Assemble the normalized entity from a raw video record and its
/// (possibly absent) detail page.
pub(crate) fn build_instructional(
    video: &CatalogVideo,
    detail: Option<DetailPage>,
) -> Instructional {
    let (description, episodes) = match detail {
        Some(page) => (page.description, page.episodes),
        None => (String::new(), vec![]),
    };

    let url = if video.url.is_empty() {
        String::new()
    } else {
        resolve_product_url(&video.url).unwrap_or_else(|_| video.url.clone())
    };

    Instructional {
        title: video.title.clone(),
        description,
        url,
        source: Source::BjjFanatics.name().to_string(),
        image: video.image.clone(),
        instructors: video.authors.clone(),
        review: video.review.as_ref().map(|r| Review {
            score: r.average_score,
            total: r.total_reviews,
        }),
        categories: video.categories.clone(),
        episodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::best_matches;

    const MOCK_CATALOG_JSON: &str = r#"{
        "videos": [
            {
                "title": "Lachlan Giles Leg Lock Masterclass",
                "url": "/products/leg-lock-masterclass",
                "image": "https://cdn.example.com/leglock.jpg",
                "authors": ["Lachlan Giles"],
                "categories": ["No Gi", "Leg Locks"],
                "review": {"average_score": 4.9, "total_reviews": 210}
            },
            {
                "title": "Unrelated Takedown Series",
                "url": "https://bjjfanatics.com/products/takedowns"
            },
            {
                "title": ""
            }
        ],
        "totalResults": 3
    }"#;

    const MOCK_DETAIL_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="product_description">
    <h2>About this instructional</h2>
    <p>A complete system for attacking the legs.</p>
    <ul>
        <li>Ashi garami entries</li>
        <li>Breaking mechanics</li>
    </ul>
</div>
<div class="product__course-content-accordion">
    <h3 class="product__course-title">Volume 1</h3>
    <figure class="table">
        <table>
            <tr><td>Introduction</td><td>0:00 - 4:31</td></tr>
            <tr><td>Ashi Entries</td><td>4:31 - 19:02</td></tr>
        </table>
    </figure>
    <h3 class="product__course-title">Volume 2</h3>
    <figure class="table">
        <table>
            <tr><td>Heel Hook Finishes</td><td>0:00 - 12:44</td></tr>
        </table>
    </figure>
</div>
</body>
</html>"#;

    #[test]
    fn catalog_response_deserializes() {
        let catalog: CatalogResponse =
            serde_json::from_str(MOCK_CATALOG_JSON).expect("deserialize");
        assert_eq!(catalog.videos.len(), 3);
        assert_eq!(catalog.videos[0].authors, vec!["Lachlan Giles"]);
        let review = catalog.videos[0].review.as_ref().expect("review present");
        assert!((review.average_score - 4.9).abs() < f64::EPSILON);
        assert_eq!(review.total_reviews, 210);
    }

    #[test]
    fn missing_optional_fields_do_not_fail_deserialization() {
        let catalog: CatalogResponse =
            serde_json::from_str(MOCK_CATALOG_JSON).expect("deserialize");
        let sparse = &catalog.videos[1];
        assert_eq!(sparse.title, "Unrelated Takedown Series");
        assert!(sparse.image.is_empty());
        assert!(sparse.authors.is_empty());
        assert!(sparse.review.is_none());
    }

    #[test]
    fn candidates_skip_untitled_records() {
        let catalog: CatalogResponse =
            serde_json::from_str(MOCK_CATALOG_JSON).expect("deserialize");
        let candidates = to_candidates(&catalog.videos);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].index, 0);
        assert_eq!(candidates[1].index, 1);
    }

    #[test]
    fn limit_one_selects_only_best_match() {
        let catalog: CatalogResponse =
            serde_json::from_str(MOCK_CATALOG_JSON).expect("deserialize");
        let candidates = to_candidates(&catalog.videos);
        let matches = best_matches("Leg Lock Lachlan Giles", &candidates, 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            catalog.videos[matches[0].index].title,
            "Lachlan Giles Leg Lock Masterclass"
        );
        assert!(matches[0].score >= 75);
    }

    #[test]
    fn parse_description_collects_text_lines() {
        let document = Html::parse_document(MOCK_DETAIL_HTML);
        let description = parse_description(&document);
        assert!(description.contains("About this instructional"));
        assert!(description.contains("A complete system for attacking the legs."));
        assert!(description.contains("Ashi garami entries"));
        assert!(description.contains("Breaking mechanics"));
    }

    #[test]
    fn parse_description_missing_container_is_empty() {
        let document = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        assert!(parse_description(&document).is_empty());
    }

    #[test]
    fn parse_episodes_extracts_chapter_tables() {
        let document = Html::parse_document(MOCK_DETAIL_HTML);
        let episodes = parse_episodes(&document);
        assert_eq!(episodes.len(), 2);

        assert_eq!(episodes[0].title, "Volume 1");
        assert_eq!(episodes[0].chapters.len(), 2);
        assert_eq!(episodes[0].chapters[0].title, "Introduction");
        assert_eq!(episodes[0].chapters[0].time, "0:00 - 4:31");

        assert_eq!(episodes[1].title, "Volume 2");
        assert_eq!(episodes[1].chapters[0].title, "Heel Hook Finishes");
    }

    #[test]
    fn parse_episodes_count_mismatch_yields_none() {
        let html = r#"
<div class="product__course-content-accordion">
    <h3 class="product__course-title">Volume 1</h3>
    <h3 class="product__course-title">Volume 2</h3>
    <figure class="table"><table><tr><td>A</td><td>1:00</td></tr></table></figure>
</div>"#;
        let document = Html::parse_document(html);
        assert!(parse_episodes(&document).is_empty());
    }

    #[test]
    fn parse_episodes_missing_accordion_is_empty() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(parse_episodes(&document).is_empty());
    }

    #[test]
    fn parse_detail_page_combines_both() {
        let detail = parse_detail_page(MOCK_DETAIL_HTML);
        assert!(!detail.description.is_empty());
        assert_eq!(detail.episodes.len(), 2);
    }

    #[test]
    fn build_instructional_with_detail() {
        let catalog: CatalogResponse =
            serde_json::from_str(MOCK_CATALOG_JSON).expect("deserialize");
        let detail = parse_detail_page(MOCK_DETAIL_HTML);
        let result = build_instructional(&catalog.videos[0], Some(detail));

        assert_eq!(result.title, "Lachlan Giles Leg Lock Masterclass");
        assert_eq!(result.source, "BJJFanatics");
        assert_eq!(
            result.url,
            "https://bjjfanatics.com/products/leg-lock-masterclass"
        );
        assert_eq!(result.instructors, vec!["Lachlan Giles"]);
        assert_eq!(result.categories.len(), 2);
        assert_eq!(result.episodes.len(), 2);
        let review = result.review.expect("review carried over");
        assert_eq!(review.total, 210);
    }

    #[test]
    fn failed_detail_fetch_degrades_to_empty_description_and_episodes() {
        let catalog: CatalogResponse =
            serde_json::from_str(MOCK_CATALOG_JSON).expect("deserialize");
        let result = build_instructional(&catalog.videos[0], None);

        assert_eq!(result.title, "Lachlan Giles Leg Lock Masterclass");
        assert!(result.description.is_empty());
        assert!(result.episodes.is_empty());
        // Light metadata from the primary query survives.
        assert_eq!(result.instructors, vec!["Lachlan Giles"]);
    }

    #[test]
    fn resolve_product_url_handles_relative_and_absolute() {
        assert_eq!(
            resolve_product_url("/products/leg-locks").expect("relative"),
            "https://bjjfanatics.com/products/leg-locks"
        );
        assert_eq!(
            resolve_product_url("https://bjjfanatics.com/products/x").expect("absolute"),
            "https://bjjfanatics.com/products/x"
        );
    }

    #[test]
    fn source_type_is_bjjfanatics() {
        let source = BjjFanaticsSource::new();
        assert_eq!(source.source_type(), Source::BjjFanatics);
    }

    #[test]
    fn adapter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BjjFanaticsSource>();
    }

    #[tokio::test]
    async fn detail_cache_serves_inserted_page() {
        let source = BjjFanaticsSource::new();
        let url = "https://bjjfanatics.com/products/cached".to_string();
        let html = Arc::new("<html></html>".to_string());
        source.detail_cache.insert(url.clone(), html).await;

        let cached = source.detail_cache.get(&url).await.expect("cache hit");
        assert_eq!(cached.as_str(), "<html></html>");
    }
}
