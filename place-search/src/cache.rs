//! In-memory cache for paginated query results.
//!
//! Caches the records of one fully paginated query keyed by backend, exact
//! query text, geo restriction, ordering, page size and page range. The
//! keyword label is not part of the key; a hit is relabelled for the
//! requesting query by the pagination loop. Uses
//! [`moka`] for async-friendly caching with a TTL and bounded capacity.
//!
//! The cache is an explicit value owned by the caller. Nothing is shared
//! process-wide; dropping the cache or calling [`QueryCache::clear`]
//! invalidates everything.

use std::time::Duration;

use moka::future::Cache;

use crate::types::{Backend, PlaceRecord, QuerySpec};

/// Maximum number of cached queries.
const MAX_CACHE_ENTRIES: u64 = 256;

/// Composite cache key for one paginated query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    backend: Backend,
    /// Exact query text; no case folding or trimming.
    query: String,
    /// Centre rendered to text, since floats are not `Hash`.
    center: Option<String>,
    sort: crate::types::SortMode,
    page_size: u32,
    /// Inclusive page range fetched.
    pages: (u32, u32),
}

impl CacheKey {
    /// Build the key for paginating `query` on `backend` over pages
    /// `1..=max_pages`.
    pub fn new(backend: Backend, query: &QuerySpec, max_pages: u32) -> Self {
        Self {
            backend,
            query: query.text.clone(),
            center: query
                .center
                .map(|c| format!("{},{},{}", c.longitude, c.latitude, c.radius_m)),
            sort: query.sort,
            page_size: query.page_size,
            pages: (1, max_pages),
        }
    }
}

/// Caller-owned cache of paginated query results.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<CacheKey, Vec<PlaceRecord>>,
}

impl QueryCache {
    /// Create a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Create a cache from a TTL in seconds. Returns `None` for 0, which
    /// means caching is disabled.
    pub fn from_ttl_seconds(ttl_seconds: u64) -> Option<Self> {
        (ttl_seconds > 0).then(|| Self::new(Duration::from_secs(ttl_seconds)))
    }

    /// Look up cached records. `None` on miss or expiry.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<PlaceRecord>> {
        self.inner.get(key).await
    }

    /// Store the records of a fully successful query.
    pub async fn insert(&self, key: CacheKey, records: Vec<PlaceRecord>) {
        self.inner.insert(key, records).await;
    }

    /// Drop one entry.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
