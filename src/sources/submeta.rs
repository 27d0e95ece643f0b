//! Submeta catalog source — GraphQL endpoint, scoped to one creator.
//!
//! The primary query is a `SearchCourses` operation against the creator's
//! catalog. Each selected match costs a `GetCourse` follow-up whose nested
//! chapter → content records are flattened into episodes and chapter marks.
//! When the scoped search finds nothing, the full course index is walked
//! page by page with an offset cursor until the server reports no more.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::matcher::{self, Candidate};
use crate::source::SourceAdapter;
use crate::types::{Chapter, Episode, Instructional, Source};

/// Submeta GraphQL endpoint.
const GRAPHQL_ENDPOINT: &str = "https://b.submeta.io/api";

/// Image CDN prefix for course cover files.
const IMAGE_CDN: &str = "https://optimg.submeta.io/uploads";

/// Offset increment between index pages.
const INDEX_PAGE_STEP: u64 = 3;

/// Hard upper bound on index pages walked per query.
///
/// Pagination normally terminates on `hasMore == false`; the cap bounds the
/// loop if the server keeps claiming more pages.
const MAX_INDEX_PAGES: u64 = 512;

/// Compact `SearchCourses` document requesting only the fields we consume.
const SEARCH_COURSES_QUERY: &str = "\
query SearchCourses($searchTerm: String, $creators: [String], $offset: Int, $limit: Int) {
  result: searchCourses(searchTerm: $searchTerm, creators: $creators, offset: $offset, limit: $limit) {
    courses {
      ... on Course {
        id
        title
        slug
        description
        level
        category
        cover { fileName }
        authors { name }
      }
    }
  }
}";

/// Document for walking the full course index page by page. The selection
/// mirrors [`CoursesPage`]: grouped courses plus the `hasMore` cursor flag.
const COURSES_PAGE_QUERY: &str = "\
query GetCoursesPage($creators: [String], $offset: Int, $limit: Int) {
  result: getCoursesPage(creators: $creators, offset: $offset, limit: $limit) {
    groupings {
      courses {
        ... on Course {
          id
          title
          slug
          description
          level
          category
          cover { fileName }
          authors { name }
        }
      }
    }
    hasMore
  }
}";

/// Compact `GetCourse` document for the episode breakdown of one course.
const GET_COURSE_QUERY: &str = "\
query GetCourse($courseId: ID) {
  result: getCourse(courseId: $courseId) {
    course {
      id
      chapters {
        title
        contents {
          ... on Video { title duration }
          ... on Group { id }
        }
      }
    }
  }
}";

/// Generic GraphQL envelope: everything interesting lives under `data`.
#[derive(Debug, Clone, Deserialize)]
struct GraphQlResponse<T> {
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    result: Option<CourseList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CourseList {
    #[serde(default)]
    courses: Vec<Course>,
}

/// One course record as returned by `SearchCourses` and index pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Course {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) slug: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) level: Option<String>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) cover: Option<Cover>,
    #[serde(default)]
    pub(crate) authors: Vec<Creator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Cover {
    #[serde(rename = "fileName", default)]
    pub(crate) file_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Creator {
    #[serde(default)]
    pub(crate) name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PageData {
    #[serde(default)]
    result: Option<CoursesPage>,
}

/// One page of the full course index.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CoursesPage {
    #[serde(default)]
    pub(crate) groupings: Vec<Grouping>,
    #[serde(rename = "hasMore", default)]
    pub(crate) has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Grouping {
    #[serde(default)]
    pub(crate) courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CourseDetailData {
    #[serde(default)]
    result: Option<CourseDetailResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CourseDetailResult {
    #[serde(default)]
    course: Option<CourseDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CourseDetail {
    #[serde(default)]
    pub(crate) chapters: Vec<CourseChapter>,
}

/// A course chapter; on Submeta each chapter plays as one video, so it maps
/// to an [`Episode`].
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CourseChapter {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) contents: Vec<ChapterContent>,
}

/// Nested chapter content: videos carry a duration, groups do not.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChapterContent {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) duration: Option<f64>,
}

/// Submeta source adapter. Stateless; every request goes straight to the
/// GraphQL endpoint.
pub struct SubmetaSource;

impl SubmetaSource {
    /// Create a Submeta adapter.
    pub fn new() -> Self {
        Self
    }

    /// Run the scoped `SearchCourses` operation.
    async fn search_courses(
        &self,
        client: &reqwest::Client,
        query: &str,
        handle: &str,
    ) -> Result<Vec<Course>, SearchError> {
        let body = search_request(query, handle);
        let response: GraphQlResponse<SearchData> = post_graphql(client, &body, "search").await?;
        Ok(response
            .data
            .and_then(|d| d.result)
            .map(|r| r.courses)
            .unwrap_or_default())
    }

    /// Walk the full course index with an offset cursor.
    ///
    /// Terminates when a page reports `hasMore == false`, when the envelope
    /// carries no result, or after [`MAX_INDEX_PAGES`] pages.
    async fn fetch_course_index(
        &self,
        client: &reqwest::Client,
        handle: &str,
    ) -> Result<Vec<Course>, SearchError> {
        let mut courses = Vec::new();
        let mut offset = 0u64;

        for _ in 0..MAX_INDEX_PAGES {
            let body = index_request(handle, offset);
            let response: GraphQlResponse<PageData> =
                post_graphql(client, &body, "index page").await?;

            let Some(page) = response.data.and_then(|d| d.result) else {
                break;
            };
            for grouping in page.groupings {
                courses.extend(grouping.courses);
            }
            if !page.has_more {
                break;
            }
            offset += INDEX_PAGE_STEP;
        }

        tracing::debug!(count = courses.len(), "Submeta course index fetched");
        Ok(courses)
    }

    /// Fetch and flatten the episode breakdown for one course.
    async fn fetch_episodes(
        &self,
        client: &reqwest::Client,
        course_id: &str,
    ) -> Result<Vec<Episode>, SearchError> {
        let body = course_request(course_id);
        let response: GraphQlResponse<CourseDetailData> =
            post_graphql(client, &body, "course detail").await?;

        let chapters = response
            .data
            .and_then(|d| d.result)
            .and_then(|r| r.course)
            .map(|c| c.chapters)
            .unwrap_or_default();

        Ok(episodes_from_chapters(chapters))
    }
}

impl Default for SubmetaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for SubmetaSource {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<Instructional>, SearchError> {
        tracing::trace!(query, handle = %config.creator_handle, "Submeta search");

        let client = http::build_client(config)?;

        let mut courses = self
            .search_courses(&client, query, &config.creator_handle)
            .await?;
        if courses.is_empty() {
            tracing::debug!("scoped search returned nothing, walking course index");
            courses = self
                .fetch_course_index(&client, &config.creator_handle)
                .await?;
        }

        tracing::debug!(count = courses.len(), "Submeta candidates received");

        let candidates = to_candidates(&courses);
        let matches = matcher::best_matches(query, &candidates, config.match_limit);

        let mut results = Vec::with_capacity(matches.len());
        for title_match in &matches {
            let course = &courses[title_match.index];
            let episodes = match self.fetch_episodes(&client, &course.id).await {
                Ok(episodes) => episodes,
                Err(err) => {
                    tracing::warn!(title = %course.title, error = %err, "course detail failed, degrading record");
                    vec![]
                }
            };
            results.push(build_instructional(course, &config.creator_handle, episodes));
        }

        tracing::debug!(resolved = results.len(), "Submeta search done");
        Ok(results)
    }

    fn source_type(&self) -> Source {
        Source::Submeta
    }
}

/// POST a GraphQL request body and deserialize the envelope.
async fn post_graphql<T: DeserializeOwned>(
    client: &reqwest::Client,
    body: &serde_json::Value,
    what: &str,
) -> Result<T, SearchError> {
    let response = client
        .post(GRAPHQL_ENDPOINT)
        .json(body)
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("Submeta {what} request failed: {e}")))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("Submeta {what} HTTP error: {e}")))?;

    response
        .json()
        .await
        .map_err(|e| SearchError::Parse(format!("Submeta {what} parse failed: {e}")))
}

/// Request body for `SearchCourses`.
pub(crate) fn search_request(query: &str, handle: &str) -> serde_json::Value {
    json!({
        "operationName": "SearchCourses",
        "variables": {
            "creators": [handle],
            "searchTerm": query,
            "offset": 0,
            "limit": 10000
        },
        "query": SEARCH_COURSES_QUERY,
    })
}

/// Request body for one `GetCoursesPage` step of the index walk. The
/// document's selection carries the grouped-page shape the walk reads;
/// the flat search document does not.
pub(crate) fn index_request(handle: &str, offset: u64) -> serde_json::Value {
    json!({
        "operationName": "GetCoursesPage",
        "variables": {
            "creators": [handle],
            "offset": offset,
            "limit": 10000
        },
        "query": COURSES_PAGE_QUERY,
    })
}

/// Request body for `GetCourse`.
pub(crate) fn course_request(course_id: &str) -> serde_json::Value {
    json!({
        "operationName": "GetCourse",
        "variables": { "courseId": course_id },
        "query": GET_COURSE_QUERY,
    })
}

/// Build matcher candidates from course records, skipping untitled ones.
pub(crate) fn to_candidates(courses: &[Course]) -> Vec<Candidate> {
    courses
        .iter()
        .enumerate()
        .filter(|(_, course)| !course.title.trim().is_empty())
        .map(|(index, course)| Candidate {
            title: course.title.clone(),
            index,
        })
        .collect()
}

/// Flatten course chapters into episodes; only contents carrying a
/// duration become chapter marks.
pub(crate) fn episodes_from_chapters(chapters: Vec<CourseChapter>) -> Vec<Episode> {
    chapters
        .into_iter()
        .map(|chapter| Episode {
            title: chapter.title,
            chapters: chapter
                .contents
                .into_iter()
                .filter_map(|content| {
                    content.duration.map(|duration| Chapter {
                        title: content.title,
                        time: format_duration(duration),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Stringify a duration in seconds: whole values lose the fraction.
fn format_duration(duration: f64) -> String {
    if duration.fract() == 0.0 {
        format!("{}", duration as i64)
    } else {
        duration.to_string()
    }
}

/// Assemble the normalized entity from a course and its episodes.
pub(crate) fn build_instructional(
    course: &Course,
    handle: &str,
    episodes: Vec<Episode>,
) -> Instructional {
    let image = course
        .cover
        .as_ref()
        .filter(|cover| !cover.file_name.is_empty())
        .map(|cover| format!("{IMAGE_CDN}/{}", cover.file_name))
        .unwrap_or_default();

    let url = if course.slug.is_empty() {
        String::new()
    } else {
        format!("https://submeta.io/@{handle}/courses/{}", course.slug)
    };

    let categories = [course.category.clone(), course.level.clone()]
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .collect();

    Instructional {
        title: course.title.clone(),
        description: course.description.clone().unwrap_or_default(),
        url,
        source: Source::Submeta.name().to_string(),
        image,
        instructors: course.authors.iter().map(|a| a.name.clone()).collect(),
        review: None,
        categories,
        episodes,
    }
}
