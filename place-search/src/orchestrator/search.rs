//! End-to-end place search: aggregate, dedup, filter, optionally sort.

use tokio_util::sync::CancellationToken;

use crate::backend::PlaceBackend;
use crate::cache::QueryCache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::filter_config::FilterConfig;
use crate::types::PlaceRecord;

use super::aggregate::{QueryFailure, aggregate};
use super::dedup::dedup;
use super::rules::RuleChain;
use super::sort::sort_by_rating_desc;

/// One search as requested by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Region text prefixed to every query, e.g. `대전 유성구`.
    pub region: String,
    /// Also run the expansion keyword queries.
    pub deep_search: bool,
    /// Rules and post-processing applied to the merged pool.
    pub filters: FilterConfig,
}

impl SearchRequest {
    /// A base-query-only request with default filters.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            deep_search: false,
            filters: FilterConfig::default(),
        }
    }

    /// Enable or disable deep search.
    pub fn with_deep_search(mut self, deep_search: bool) -> Self {
        self.deep_search = deep_search;
        self
    }

    /// Replace the filter settings.
    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }
}

/// Counters describing one search run.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Queries started.
    pub queries_run: usize,
    /// Records pooled before dedup.
    pub pooled: usize,
    /// Records left after dedup.
    pub deduplicated: usize,
    /// Records left after the rule chain.
    pub filtered: usize,
    /// Malformed items dropped while parsing.
    pub skipped: usize,
    /// Queries that stopped on an error.
    pub failures: Vec<QueryFailure>,
    /// Cancellation cut the run short.
    pub cancelled: bool,
}

/// Final records plus run statistics. Empty `records` means "no results".
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Records left after dedup, filtering and the optional sort.
    pub records: Vec<PlaceRecord>,
    /// Counts and failures gathered along the way.
    pub stats: SearchStats,
}

/// Run a full search for `request` on `backend`.
///
/// # Pipeline
///
/// 1. Validate `config`, the request filters and the region
/// 2. Run the base query and, for deep search, the expansion queries
/// 3. Deduplicate the pool by the configured key, first seen wins
/// 4. Apply the rule chain
/// 5. Sort by rating when requested
///
/// # Errors
///
/// Returns [`SearchError::ConfigurationMissing`] for a blank region and
/// [`SearchError::Config`] for invalid settings. Both are reported before
/// any request is sent. Per-query failures are not errors; they are listed
/// in [`SearchStats::failures`].
pub async fn search_places<B: PlaceBackend>(
    backend: &B,
    request: &SearchRequest,
    config: &SearchConfig,
    cache: Option<&QueryCache>,
    cancel: &CancellationToken,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    if request.region.trim().is_empty() {
        return Err(SearchError::ConfigurationMissing("region".into()));
    }
    let chain = RuleChain::from_config(&request.filters)?;

    let report = aggregate(
        backend,
        &request.region,
        &config.expansion_keywords,
        request.deep_search,
        config,
        cache,
        cancel,
    )
    .await;

    let pooled = report.pool.len();
    let deduped = dedup(report.pool.into_records(), request.filters.dedup_key);
    let deduplicated = deduped.len();
    let mut records = chain.apply(deduped);
    if request.filters.sort_by_rating {
        sort_by_rating_desc(&mut records);
    }

    tracing::info!(
        backend = %backend.backend_type(),
        pooled,
        deduplicated,
        kept = records.len(),
        "search finished"
    );

    Ok(SearchOutcome {
        stats: SearchStats {
            queries_run: report.queries_run,
            pooled,
            deduplicated,
            filtered: records.len(),
            skipped: report.skipped,
            failures: report.failures,
            cancelled: report.cancelled,
        },
        records,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::orchestrator::dedup::DedupKey;
    use crate::types::{Backend, Page, QuerySpec};

    /// Returns the same fixed records for every query and counts calls.
    struct FixedBackend {
        records: Vec<PlaceRecord>,
        calls: AtomicU32,
    }

    impl FixedBackend {
        fn new(records: Vec<PlaceRecord>) -> Self {
            Self {
                records,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PlaceBackend for FixedBackend {
        async fn fetch_page(&self, query: &QuerySpec, _page: u32) -> Result<Page, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Page {
                records: self
                    .records
                    .iter()
                    .cloned()
                    .map(|r| r.with_source_query(query.keyword.clone()))
                    .collect(),
                is_last: true,
                skipped: 0,
            })
        }

        fn backend_type(&self) -> Backend {
            Backend::MapPage
        }
    }

    fn rec(name: &str, category: &str, rating: f64, reviews: u32) -> PlaceRecord {
        PlaceRecord::new(name, category, "대전", format!("https://m/{name}"))
            .with_rating(rating)
            .with_review_count(reviews)
    }

    fn config() -> SearchConfig {
        SearchConfig {
            request_delay_ms: (0, 0),
            ..SearchConfig::default()
        }
    }

    #[tokio::test]
    async fn chain_category_and_rating_rules_combine_to_empty() {
        let backend = FixedBackend::new(vec![
            rec("A점", "Food>Korean", 4.0, 50),
            rec("A점", "Food>Korean", 1.0, 1),
            rec("B본점", "Cafe", 3.0, 5),
        ]);
        let filters = FilterConfig {
            chain_exclusion: true,
            category_focus: true,
            category_deny: vec!["Cafe".into()],
            min_rating: Some(2.0),
            ..FilterConfig::disabled()
        };
        let request = SearchRequest::new("X").with_filters(filters);

        let outcome = search_places(&backend, &request, &config(), None, &CancellationToken::new())
            .await
            .expect("search");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.pooled, 3);
        assert_eq!(outcome.stats.deduplicated, 2);
        assert_eq!(outcome.stats.filtered, 0);
    }

    #[tokio::test]
    async fn blank_region_fails_before_any_request() {
        let backend = FixedBackend::new(vec![rec("a", "음식점", 0.0, 0)]);
        let err = search_places(
            &backend,
            &SearchRequest::new("   "),
            &config(),
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SearchError::ConfigurationMissing(_)));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_any_request() {
        let backend = FixedBackend::new(vec![]);
        let bad = SearchConfig {
            max_pages: 0,
            ..config()
        };
        let result = search_places(&backend, &SearchRequest::new("대전"), &bad, None, &CancellationToken::new()).await;
        assert!(matches!(result, Err(SearchError::Config(_))));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_filter_pattern_fails_before_any_request() {
        let backend = FixedBackend::new(vec![]);
        let request = SearchRequest::new("대전").with_filters(FilterConfig {
            chain_suffix_pattern: "[".into(),
            ..FilterConfig::default()
        });
        let result = search_places(&backend, &request, &config(), None, &CancellationToken::new()).await;
        assert!(matches!(result, Err(SearchError::Config(_))));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn deep_search_dedups_across_queries_keeping_first() {
        let backend = FixedBackend::new(vec![rec("광천식당", "음식점 > 한식", 4.2, 30)]);
        let request = SearchRequest::new("대전")
            .with_deep_search(true)
            .with_filters(FilterConfig::disabled());

        let outcome = search_places(&backend, &request, &config(), None, &CancellationToken::new())
            .await
            .expect("search");
        assert_eq!(outcome.stats.queries_run, 4);
        assert_eq!(outcome.stats.pooled, 4);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source_query, "맛집");
    }

    #[tokio::test]
    async fn sort_by_rating_is_applied_last() {
        let backend = FixedBackend::new(vec![
            rec("a", "음식점", 3.0, 0),
            rec("b", "음식점", 4.5, 0),
            rec("c", "음식점", 3.0, 0),
        ]);
        let request = SearchRequest::new("대전").with_filters(FilterConfig {
            sort_by_rating: true,
            ..FilterConfig::disabled()
        });
        let outcome = search_places(&backend, &request, &config(), None, &CancellationToken::new())
            .await
            .expect("search");
        let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn link_dedup_key_is_honoured() {
        let backend = FixedBackend::new(vec![
            PlaceRecord::new("성심당", "음식점", "", "http://m/1"),
            PlaceRecord::new("성심당 본점", "음식점", "", "https://m/1/"),
        ]);
        let request = SearchRequest::new("대전").with_filters(FilterConfig {
            dedup_key: DedupKey::Link,
            ..FilterConfig::disabled()
        });
        let outcome = search_places(&backend, &request, &config(), None, &CancellationToken::new())
            .await
            .expect("search");
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "성심당");
    }

    #[tokio::test]
    async fn no_results_is_not_an_error() {
        let backend = FixedBackend::new(vec![]);
        let outcome = search_places(&backend, &SearchRequest::new("대전"), &config(), None, &CancellationToken::new())
            .await
            .expect("empty is ok");
        assert!(outcome.records.is_empty());
        assert!(outcome.stats.failures.is_empty());
    }

    #[tokio::test]
    async fn cancelled_search_returns_partial_outcome() {
        let backend = FixedBackend::new(vec![rec("a", "음식점", 0.0, 0)]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = search_places(&backend, &SearchRequest::new("대전"), &config(), None, &cancel)
            .await
            .expect("cancelled is ok");
        assert!(outcome.stats.cancelled);
        assert!(outcome.records.is_empty());
        assert_eq!(backend.calls(), 0);
    }
}
