//! Shared HTTP client for the catalog endpoints.
//!
//! One [`reqwest::Client`] shape serves both sources: JSON and GraphQL
//! API calls, plus storefront product pages scraped as HTML. The client
//! presents itself as a desktop Chrome browser since the storefront
//! serves a reduced markup variant to unknown agents.

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use std::time::Duration;

/// Current desktop Chrome User-Agent strings, one per platform.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
];

/// Build a [`reqwest::Client`] configured for catalog requests.
///
/// The client has:
/// - Cookie store enabled (storefront session and currency cookies)
/// - Timeout from config
/// - A desktop Chrome User-Agent (or custom if configured)
/// - `Accept-Language` pinned to English; both catalogs are English-only
///   and product pages are parsed against English markup
/// - Brotli and gzip decompression
///
/// Redirects are followed up to 5 hops: renamed storefront products
/// redirect to their new handle, but chains longer than one hop mean a
/// dead listing.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Pick a User-Agent from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}
