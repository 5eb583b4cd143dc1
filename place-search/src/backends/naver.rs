//! Naver Local search.
//!
//! `GET /v1/search/local.json` authenticated by client id and secret
//! headers. The provider returns at most 5 items per call and only serves
//! `start = 1`, so pagination ends after the first window. Titles carry
//! `<b>` highlight markup which is stripped during mapping.

use std::fmt;

use crate::backend::PlaceBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::response::RawSearchResponse;
use crate::types::{Backend, Page, QuerySpec, SortMode};

/// Production API host.
pub const NAVER_API_BASE: &str = "https://openapi.naver.com";

const LOCAL_PATH: &str = "/v1/search/local.json";

/// Highest `start` offset the provider accepts.
const MAX_START: u32 = 1;

/// Naver Local API client.
pub struct NaverBackend {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl NaverBackend {
    /// Create a backend for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConfigurationMissing`] if either credential is
    /// blank, or [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() {
            return Err(SearchError::ConfigurationMissing("Naver client id".into()));
        }
        if client_secret.trim().is_empty() {
            return Err(SearchError::ConfigurationMissing(
                "Naver client secret".into(),
            ));
        }
        Ok(Self {
            client: http::build_client(config)?,
            client_id,
            client_secret,
            base_url: NAVER_API_BASE.to_string(),
        })
    }

    /// Point the backend at a different host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// 1-based item offset for a 1-based page number.
    fn start_offset(page: u32, display: u32) -> u32 {
        page.saturating_sub(1).saturating_mul(display).saturating_add(1)
    }
}

impl fmt::Debug for NaverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaverBackend")
            .field("base_url", &self.base_url)
            .field("client_id", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl PlaceBackend for NaverBackend {
    async fn fetch_page(&self, query: &QuerySpec, page: u32) -> Result<Page, SearchError> {
        let display = self.effective_page_size(query.page_size);
        let start = Self::start_offset(page, display);
        if start > MAX_START {
            tracing::debug!(page, start, "Naver start offset beyond provider limit");
            return Ok(Page {
                is_last: true,
                ..Page::default()
            });
        }
        if query.center.is_some() {
            tracing::trace!("Naver ignores geo restriction");
        }
        tracing::trace!(query = %query.text, page, "Naver search");

        let sort = match query.sort {
            SortMode::Relevance => "random",
            SortMode::MostReviewed => "comment",
        };

        let response = self
            .client
            .get(format!("{}{LOCAL_PATH}", self.base_url))
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[
                ("query", query.text.clone()),
                ("display", display.to_string()),
                ("start", start.to_string()),
                ("sort", sort.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Naver request failed: {e}")))?;

        let body = http::read_body(response, "Naver").await?;
        let mut parsed = RawSearchResponse::parse_naver(&body)?.into_page(&query.keyword);
        if Self::start_offset(page + 1, display) > MAX_START {
            parsed.is_last = true;
        }

        tracing::debug!(
            page,
            count = parsed.records.len(),
            skipped = parsed.skipped,
            is_last = parsed.is_last,
            "Naver page parsed"
        );
        Ok(parsed)
    }

    fn backend_type(&self) -> Backend {
        Backend::Naver
    }
}
