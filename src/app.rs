//! Wires [`AppConfig`] to the place-search library.

use place_search::{AnyBackend, QueryCache, SearchOutcome, SearchRequest, search_places};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::error::Result;

/// Build the configured backend and run one search for `region`.
///
/// `cache`, when given, is consulted before each query and filled with
/// complete query results.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the chosen backend's
/// credentials are missing, or `region` is blank. All of these are
/// reported before any network call.
pub async fn run_search(
    config: &AppConfig,
    region: &str,
    cache: Option<&QueryCache>,
    cancel: &CancellationToken,
) -> Result<SearchOutcome> {
    config.validate()?;

    let mut backend = AnyBackend::build(
        config.backend,
        &config.credentials,
        &config.map_page,
        &config.search,
    )?;
    if let Some(base_url) = config.api_base_url.as_deref() {
        backend = backend.with_base_url(base_url);
    }

    let request = SearchRequest::new(region)
        .with_deep_search(config.deep_search)
        .with_filters(config.filters.clone());

    tracing::info!(
        backend = %config.backend,
        deep_search = config.deep_search,
        "starting search"
    );
    let outcome = search_places(&backend, &request, &config.search, cache, cancel).await?;

    for failure in &outcome.stats.failures {
        tracing::warn!(keyword = %failure.keyword, error = %failure.error, "query skipped");
    }
    Ok(outcome)
}
