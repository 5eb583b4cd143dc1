//! # place-search
//!
//! Restaurant discovery across map-provider search backends.
//!
//! This crate queries a place-search backend for a region, gathers results
//! across a base query and optional keyword-expansion queries, merges them
//! into one pool, deduplicates, and applies rule-based filtering.
//!
//! ## Design
//!
//! - Backends: Kakao Local and Naver Local REST APIs, plus a scraped map
//!   search page parsed with CSS selectors
//! - Each query is paginated with early stop on empty or last pages
//! - Queries and pages run strictly one after another, with a random
//!   pacing delay between queries
//! - A failed query never fails the search; the other queries still run
//! - First-seen deduplication and a configurable rule chain (franchise
//!   branches, category deny/allow lists, rating and review thresholds)
//! - Optional caller-owned result cache with TTL
//!
//! ## Security
//!
//! - Credentials are passed through to the provider and never logged;
//!   `Debug` output redacts them
//! - Query text is logged only at debug and trace level
//! - No network listeners; this is a library, not a server

pub mod backend;
pub mod backends;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter_config;
pub mod http;
pub mod orchestrator;
pub mod response;
pub mod text;
pub mod types;

pub use backend::PlaceBackend;
pub use backends::{AnyBackend, Credentials, MapPageConfig};
pub use cache::QueryCache;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use filter_config::FilterConfig;
pub use orchestrator::dedup::DedupKey;
pub use orchestrator::search::{SearchOutcome, SearchRequest, SearchStats, search_places};
pub use types::{Backend, GeoCenter, PlaceRecord, QuerySpec, SortMode};

use tokio_util::sync::CancellationToken;

/// Search `request.region` on the backend chosen by `kind`.
///
/// Builds the backend from `credentials`, then runs
/// [`search_places`] without a cache.
///
/// # Errors
///
/// Returns [`SearchError::ConfigurationMissing`] if the chosen backend's
/// credential is absent or the region is blank, and [`SearchError::Config`]
/// for invalid settings. Nothing is sent over the network in either case.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> place_search::Result<()> {
/// use place_search::{Backend, Credentials, MapPageConfig, SearchConfig, SearchRequest};
/// use tokio_util::sync::CancellationToken;
///
/// let credentials = Credentials {
///     kakao_rest_api_key: std::env::var("KAKAO_REST_API_KEY").ok(),
///     ..Default::default()
/// };
/// let outcome = place_search::search(
///     Backend::Kakao,
///     &credentials,
///     &MapPageConfig::default(),
///     &SearchRequest::new("대전 유성구").with_deep_search(true),
///     &SearchConfig::default(),
///     &CancellationToken::new(),
/// )
/// .await?;
/// for place in &outcome.records {
///     println!("{} ({}): {}", place.name, place.category, place.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    kind: Backend,
    credentials: &Credentials,
    map_page: &MapPageConfig,
    request: &SearchRequest,
    config: &SearchConfig,
    cancel: &CancellationToken,
) -> Result<SearchOutcome> {
    config.validate()?;
    let backend = AnyBackend::build(kind, credentials, map_page, config)?;
    search_places(&backend, request, config, None, cancel).await
}
