//! Kakao Local keyword search.
//!
//! `GET /v2/local/search/keyword.json` with a `KakaoAK` REST key. Pages are
//! 1-based, at most 15 documents each, and the provider stops paging at 45.
//! The `meta.is_end` flag marks the final page.

use std::fmt;

use crate::backend::PlaceBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::response::RawSearchResponse;
use crate::types::{Backend, Page, QuerySpec, SortMode};

/// Production API host.
pub const KAKAO_API_BASE: &str = "https://dapi.kakao.com";

const KEYWORD_PATH: &str = "/v2/local/search/keyword.json";

/// Highest page number the provider serves.
const MAX_PAGE: u32 = 45;

/// Largest radius in metres the provider accepts.
const MAX_RADIUS_M: u32 = 20_000;

/// Kakao Local API client.
pub struct KakaoBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl KakaoBackend {
    /// Create a backend for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConfigurationMissing`] if `api_key` is blank,
    /// or [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, config: &SearchConfig) -> Result<Self, SearchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SearchError::ConfigurationMissing(
                "Kakao REST API key".into(),
            ));
        }
        Ok(Self {
            client: http::build_client(config)?,
            api_key,
            base_url: KAKAO_API_BASE.to_string(),
        })
    }

    /// Point the backend at a different host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn query_params(&self, query: &QuerySpec, page: u32) -> Vec<(&'static str, String)> {
        if query.sort == SortMode::MostReviewed {
            tracing::debug!("Kakao has no review ordering, using accuracy");
        }
        let mut params = vec![
            ("query", query.text.clone()),
            ("page", page.to_string()),
            ("size", self.effective_page_size(query.page_size).to_string()),
            ("sort", "accuracy".to_string()),
        ];
        if let Some(center) = query.center {
            params.push(("x", center.longitude.to_string()));
            params.push(("y", center.latitude.to_string()));
            params.push(("radius", center.radius_m.min(MAX_RADIUS_M).to_string()));
        }
        params
    }
}

impl fmt::Debug for KakaoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KakaoBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PlaceBackend for KakaoBackend {
    async fn fetch_page(&self, query: &QuerySpec, page: u32) -> Result<Page, SearchError> {
        if page > MAX_PAGE {
            tracing::debug!(page, "Kakao page beyond provider limit");
            return Ok(Page {
                is_last: true,
                ..Page::default()
            });
        }
        tracing::trace!(query = %query.text, page, "Kakao search");

        let response = self
            .client
            .get(format!("{}{KEYWORD_PATH}", self.base_url))
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .query(&self.query_params(query, page))
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Kakao request failed: {e}")))?;

        let body = http::read_body(response, "Kakao").await?;
        let mut parsed = RawSearchResponse::parse_kakao(&body)?.into_page(&query.keyword);
        if page == MAX_PAGE {
            parsed.is_last = true;
        }

        tracing::debug!(
            page,
            count = parsed.records.len(),
            skipped = parsed.skipped,
            is_last = parsed.is_last,
            "Kakao page parsed"
        );
        Ok(parsed)
    }

    fn backend_type(&self) -> Backend {
        Backend::Kakao
    }
}
