//! Core types for discovered places, query descriptors and backend
//! identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Highest rating a place can carry. Ratings are clamped into `[0, MAX_RATING]`.
pub const MAX_RATING: f64 = 5.0;

/// One discovered venue.
///
/// `name` and `link` are always non-empty for records produced by a
/// backend; items without them are dropped at parse time. Missing ratings
/// and review counts are stored as zero, the lowest trust level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Display name of the venue.
    pub name: String,
    /// Hierarchical free-text category, e.g. `음식점 > 한식 > 국밥`.
    pub category: String,
    /// Road address, or the lot address when the road address is missing.
    pub address: String,
    /// Detail page URL on the provider's map site.
    pub link: String,
    /// Average rating in `[0, 5]`. Zero when the backend does not report one.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews. Zero when the backend does not report one.
    #[serde(default)]
    pub review_count: u32,
    /// Keyword of the query that produced this hit.
    #[serde(default)]
    pub source_query: String,
    /// Phone number, when the provider returns one.
    #[serde(default)]
    pub phone: Option<String>,
    /// WGS84 longitude, when the provider returns one.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// WGS84 latitude, when the provider returns one.
    #[serde(default)]
    pub latitude: Option<f64>,
}

impl PlaceRecord {
    /// Build a record with the four text fields every backend supplies.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        address: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            address: address.into(),
            link: link.into(),
            rating: 0.0,
            review_count: 0,
            source_query: String::new(),
            phone: None,
            longitude: None,
            latitude: None,
        }
    }

    /// Set the rating, clamped into `[0, 5]`. NaN is treated as absent.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = clamp_rating(rating);
        self
    }

    /// Set the review count.
    pub fn with_review_count(mut self, review_count: u32) -> Self {
        self.review_count = review_count;
        self
    }

    /// Set the keyword that produced this record.
    pub fn with_source_query(mut self, keyword: impl Into<String>) -> Self {
        self.source_query = keyword.into();
        self
    }

    /// Whether the record carries the fields required to be shown.
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty() && !self.link.trim().is_empty()
    }
}

/// Clamp a raw rating into the supported range.
pub fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    }
}

/// Result ordering requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Provider's relevance / accuracy ordering.
    #[default]
    Relevance,
    /// Most reviewed first, where the provider supports it.
    MostReviewed,
}

impl SortMode {
    /// Returns the kebab-case name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::MostReviewed => "most-reviewed",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relevance" | "accuracy" => Ok(Self::Relevance),
            "most-reviewed" | "reviews" => Ok(Self::MostReviewed),
            other => Err(SearchError::Config(format!("unknown sort mode: {other}"))),
        }
    }
}

/// Centre point and radius for providers that support geo-restricted search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCenter {
    /// WGS84 longitude (the provider's `x`).
    pub longitude: f64,
    /// WGS84 latitude (the provider's `y`).
    pub latitude: f64,
    /// Search radius in metres.
    pub radius_m: u32,
}

/// A single search request descriptor. The page cursor travels separately.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Full query text sent to the backend, e.g. `대전 유성구 맛집`.
    pub text: String,
    /// Keyword label recorded on every hit as `source_query`.
    pub keyword: String,
    /// Optional geo restriction.
    pub center: Option<GeoCenter>,
    /// Requested page size; backends clamp it to their own maximum.
    pub page_size: u32,
    /// Requested ordering.
    pub sort: SortMode,
}

impl QuerySpec {
    /// Build a query with relevance ordering and no geo restriction.
    pub fn new(text: impl Into<String>, keyword: impl Into<String>, page_size: u32) -> Self {
        Self {
            text: text.into(),
            keyword: keyword.into(),
            center: None,
            page_size,
            sort: SortMode::Relevance,
        }
    }

    /// Restrict the query around a centre point.
    pub fn with_center(mut self, center: Option<GeoCenter>) -> Self {
        self.center = center;
        self
    }

    /// Set the requested ordering.
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }
}

/// Supported search backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Kakao Local keyword search API.
    #[default]
    Kakao,
    /// Naver Local search API.
    Naver,
    /// Scraped map search page.
    MapPage,
}

impl Backend {
    /// Returns the human-readable name of this backend.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kakao => "Kakao",
            Self::Naver => "Naver",
            Self::MapPage => "MapPage",
        }
    }

    /// Largest page size the provider accepts.
    pub fn max_page_size(&self) -> u32 {
        match self {
            Self::Kakao => 15,
            Self::Naver => 5,
            Self::MapPage => 50,
        }
    }

    /// Returns all available backend variants.
    pub fn all() -> &'static [Backend] {
        &[Self::Kakao, Self::Naver, Self::MapPage]
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kakao" => Ok(Self::Kakao),
            "naver" => Ok(Self::Naver),
            "map-page" | "mappage" | "scrape" => Ok(Self::MapPage),
            other => Err(SearchError::Config(format!("unknown backend: {other}"))),
        }
    }
}

/// The output of one page fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Usable records in backend order.
    pub records: Vec<PlaceRecord>,
    /// The backend signalled there are no further pages.
    pub is_last: bool,
    /// Items dropped because a required field was missing.
    pub skipped: usize,
}

/// Ordered pool of every fetched record, in discovery order.
///
/// Only appended to; never reordered before deduplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPool {
    records: Vec<PlaceRecord>,
}

impl ResultPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records, keeping their order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = PlaceRecord>) {
        self.records.extend(records);
    }

    /// Number of pooled records, duplicates included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been pooled.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the pooled records.
    pub fn records(&self) -> &[PlaceRecord] {
        &self.records
    }

    /// Consume the pool.
    pub fn into_records(self) -> Vec<PlaceRecord> {
        self.records
    }
}

impl From<Vec<PlaceRecord>> for ResultPool {
    fn from(records: Vec<PlaceRecord>) -> Self {
        Self { records }
    }
}
