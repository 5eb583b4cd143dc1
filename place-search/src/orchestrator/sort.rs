//! Optional presentation ordering.

use std::cmp::Ordering;

use crate::types::PlaceRecord;

/// Sort by rating, highest first. Stable: equal ratings keep input order.
pub fn sort_by_rating_desc(records: &mut [PlaceRecord]) {
    records.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
}
