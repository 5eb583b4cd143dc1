//! Paginated fetch with early stop for a single query.
//!
//! Pages are requested one after another starting at 1. The loop stops at
//! the first of: a page with no items at all, the backend's last-page signal, the
//! configured page cap, a failed page, or cancellation. Records from pages
//! fetched before a failure are kept.

use tokio_util::sync::CancellationToken;

use crate::backend::PlaceBackend;
use crate::cache::{CacheKey, QueryCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{PlaceRecord, QuerySpec};

/// What one paginated query produced.
#[derive(Debug, Default)]
pub struct QueryOutcome {
    /// Records from every page fetched, in page order.
    pub records: Vec<PlaceRecord>,
    /// Number of pages actually requested from the backend.
    pub pages_fetched: u32,
    /// Malformed items dropped across all pages.
    pub skipped: usize,
    /// The error that stopped the query early, if any.
    pub rejection: Option<SearchError>,
    /// Cancellation was observed before the query finished.
    pub cancelled: bool,
    /// Records came from the cache; no page was requested.
    pub from_cache: bool,
}

impl QueryOutcome {
    /// Whether every page up to the stop condition was fetched.
    pub fn is_complete(&self) -> bool {
        self.rejection.is_none() && !self.cancelled
    }
}

/// Fetch pages of `query` until a stop condition holds.
///
/// Never fails: a rejected or failed page ends the query and is reported in
/// [`QueryOutcome::rejection`]. When `cache` is given, a fresh entry is
/// returned without any request, and only complete outcomes are stored.
pub async fn paginate<B: PlaceBackend>(
    backend: &B,
    query: &QuerySpec,
    config: &SearchConfig,
    cache: Option<&QueryCache>,
    cancel: &CancellationToken,
) -> QueryOutcome {
    let key = CacheKey::new(backend.backend_type(), query, config.max_pages);
    if let Some(cache) = cache {
        if let Some(records) = cache.get(&key).await {
            tracing::debug!(keyword = %query.keyword, count = records.len(), "query served from cache");
            // Entries are shared by queries with the same text; label for this one.
            let records = records
                .into_iter()
                .map(|r| r.with_source_query(query.keyword.as_str()))
                .collect();
            return QueryOutcome {
                records,
                from_cache: true,
                ..QueryOutcome::default()
            };
        }
    }

    let mut outcome = QueryOutcome::default();
    for page in 1..=config.max_pages {
        if cancel.is_cancelled() {
            tracing::debug!(keyword = %query.keyword, page, "pagination cancelled");
            outcome.cancelled = true;
            break;
        }

        outcome.pages_fetched += 1;
        match backend.fetch_page(query, page).await {
            Ok(fetched) => {
                outcome.skipped += fetched.skipped;
                let empty = fetched.records.is_empty() && fetched.skipped == 0;
                outcome.records.extend(fetched.records);
                if empty || fetched.is_last {
                    tracing::trace!(page, empty, "last page reached");
                    break;
                }
            }
            Err(err) => {
                tracing::debug!(keyword = %query.keyword, page, error = %err, "page failed, stopping query");
                outcome.rejection = Some(err);
                break;
            }
        }
    }

    if outcome.skipped > 0 {
        tracing::debug!(keyword = %query.keyword, skipped = outcome.skipped, "malformed items skipped");
    }
    if let Some(cache) = cache {
        if outcome.is_complete() {
            cache.insert(key, outcome.records.clone()).await;
        }
    }
    outcome
}
