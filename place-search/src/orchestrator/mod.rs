//! Search orchestration: paginate, aggregate, dedup, filter, sort.
//!
//! Every stage is strictly sequential. [`paginate`] drives one query,
//! [`aggregate`] runs the base and expansion queries into one pool, and
//! [`search::search_places`] chains aggregation with deduplication, the
//! rule chain and the optional rating sort.

pub mod aggregate;
pub mod dedup;
pub mod paginate;
pub mod rules;
pub mod search;
pub mod sort;
pub mod url_normalize;

pub use aggregate::{AggregateReport, QueryFailure, aggregate};
pub use dedup::{DedupKey, dedup, dedup_by_key};
pub use paginate::{QueryOutcome, paginate};
pub use rules::{Rule, RuleChain};
pub use search::{SearchOutcome, SearchRequest, SearchStats, search_places};
pub use sort::sort_by_rating_desc;
