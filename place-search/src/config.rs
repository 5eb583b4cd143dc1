//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which queries are issued, how many pages are
//! fetched per query, pacing between queries and HTTP behaviour. It is
//! loadable from TOML; every field has a default.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{GeoCenter, SortMode};

/// Primary search term appended to the region for the base query.
pub const DEFAULT_PRIMARY_TERM: &str = "맛집";

/// Expansion keywords used by deep search, in query order.
pub const DEFAULT_EXPANSION_KEYWORDS: &[&str] = &["노포", "현지인 맛집", "숨은 맛집"];

/// Configuration for fetching and aggregating places.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Term appended to the region for the base query.
    pub primary_term: String,
    /// Extra keywords queried in order when deep search is on.
    pub expansion_keywords: Vec<String>,
    /// Requested records per page. Backends clamp to their provider maximum.
    pub page_size: u32,
    /// Maximum number of pages fetched per query.
    pub max_pages: u32,
    /// Ordering requested from the backend.
    pub sort: SortMode,
    /// Optional geo restriction, honoured by backends that support it.
    pub center: Option<GeoCenter>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Random delay range in milliseconds `(min, max)` slept before each
    /// expansion query.
    pub request_delay_ms: (u64, u64),
    /// Custom User-Agent string. If `None`, rotates through a built-in list.
    pub user_agent: Option<String>,
    /// How long cached query results stay valid, in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_term: DEFAULT_PRIMARY_TERM.to_string(),
            expansion_keywords: DEFAULT_EXPANSION_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            page_size: 15,
            max_pages: 3,
            sort: SortMode::Relevance,
            center: None,
            timeout_seconds: 8,
            request_delay_ms: (200, 600),
            user_agent: None,
            cache_ttl_seconds: 600,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `primary_term` must not be blank
    /// - `page_size` and `max_pages` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `request_delay_ms.0` must be <= `request_delay_ms.1`
    /// - `center.radius_m` must be greater than 0 when a centre is set
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.primary_term.trim().is_empty() {
            return Err(SearchError::Config("primary_term must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.max_pages == 0 {
            return Err(SearchError::Config(
                "max_pages must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.request_delay_ms.0 > self.request_delay_ms.1 {
            return Err(SearchError::Config(
                "request_delay_ms min must be <= max".into(),
            ));
        }
        if let Some(center) = self.center {
            if center.radius_m == 0 {
                return Err(SearchError::Config(
                    "center.radius_m must be greater than 0".into(),
                ));
            }
        }
        Ok(())
    }
}
