//! Multi-query aggregation into one ordered pool.
//!
//! Runs the base query `"{region} {primary_term}"` and, in deep search
//! mode, one `"{region} {keyword}"` query per expansion keyword in order.
//! Queries run strictly one after another; a failed query is logged and
//! recorded but the remaining queries still run.

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::backend::PlaceBackend;
use crate::cache::QueryCache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{QuerySpec, ResultPool};

use super::paginate::paginate;

/// A query that ended early because of an error.
#[derive(Debug)]
pub struct QueryFailure {
    /// Keyword label of the failed query.
    pub keyword: String,
    /// Why it stopped.
    pub error: SearchError,
}

/// Everything the aggregation produced.
#[derive(Debug, Default)]
pub struct AggregateReport {
    /// All records in discovery order, duplicates included.
    pub pool: ResultPool,
    /// Queries that stopped on an error, in query order.
    pub failures: Vec<QueryFailure>,
    /// Malformed items dropped across all queries.
    pub skipped: usize,
    /// Number of queries started.
    pub queries_run: usize,
    /// Cancellation cut the run short.
    pub cancelled: bool,
}

/// Build the query list for a region: base query first, then the
/// expansion keywords in order when `deep_search` is set.
pub fn build_queries(
    region: &str,
    expansion_keywords: &[String],
    deep_search: bool,
    config: &SearchConfig,
) -> Vec<QuerySpec> {
    let region = region.trim();
    let base = std::iter::once(config.primary_term.as_str());
    let extra = expansion_keywords
        .iter()
        .map(String::as_str)
        .filter(|k| deep_search && !k.trim().is_empty());

    base.chain(extra)
        .map(|keyword| {
            let keyword = keyword.trim();
            QuerySpec::new(format!("{region} {keyword}"), keyword, config.page_size)
                .with_center(config.center)
                .with_sort(config.sort)
        })
        .collect()
}

/// Random pacing delay drawn from `config.request_delay_ms`.
fn pacing_delay(config: &SearchConfig) -> Duration {
    let (min, max) = config.request_delay_ms;
    if max == 0 || min > max {
        return Duration::from_millis(min.min(max));
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

/// Run every query for `region` and collect the results.
///
/// Never fails. Per-query errors land in [`AggregateReport::failures`];
/// cancellation is checked before each query and before each page and
/// returns whatever was collected so far.
pub async fn aggregate<B: PlaceBackend>(
    backend: &B,
    region: &str,
    expansion_keywords: &[String],
    deep_search: bool,
    config: &SearchConfig,
    cache: Option<&QueryCache>,
    cancel: &CancellationToken,
) -> AggregateReport {
    let queries = build_queries(region, expansion_keywords, deep_search, config);
    let mut report = AggregateReport::default();

    for (index, query) in queries.iter().enumerate() {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        if index > 0 {
            let delay = pacing_delay(config);
            tokio::select! {
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::debug!(keyword = %query.keyword, "running query");
        report.queries_run += 1;
        let outcome = paginate(backend, query, config, cache, cancel).await;

        report.skipped += outcome.skipped;
        let count = outcome.records.len();
        report.pool.extend(outcome.records);

        if let Some(error) = outcome.rejection {
            tracing::warn!(
                backend = %backend.backend_type(),
                keyword = %query.keyword,
                kept = count,
                error = %error,
                "query failed, continuing with remaining queries"
            );
            report.failures.push(QueryFailure {
                keyword: query.keyword.clone(),
                error,
            });
        } else {
            tracing::debug!(keyword = %query.keyword, count, pages = outcome.pages_fetched, "query finished");
        }

        if outcome.cancelled {
            report.cancelled = true;
            break;
        }
    }

    tracing::info!(
        queries = report.queries_run,
        pooled = report.pool.len(),
        failed = report.failures.len(),
        cancelled = report.cancelled,
        "aggregation finished"
    );
    report
}
