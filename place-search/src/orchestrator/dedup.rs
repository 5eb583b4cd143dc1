//! First-seen deduplication of the result pool.
//!
//! The pool is in discovery order (base query first, then expansion
//! keywords, then page order) and the first occurrence of each key wins
//! regardless of its rating or review count. Output keeps that order.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::types::PlaceRecord;

use super::url_normalize::normalize_link;

/// Which field identifies "the same place".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupKey {
    /// Exact display name. No whitespace or branch-suffix folding, so
    /// "성심당" and "성심당 본점" stay separate.
    #[default]
    Name,
    /// Detail link after [`normalize_link`].
    Link,
}

impl DedupKey {
    /// Key value for one record.
    pub fn key_of(&self, record: &PlaceRecord) -> String {
        match self {
            Self::Name => record.name.clone(),
            Self::Link => normalize_link(&record.link),
        }
    }
}

/// Keep the first record for every distinct key, in input order.
///
/// The output is never longer than the input and contains each key once.
pub fn dedup_by_key<K, F>(pool: impl IntoIterator<Item = PlaceRecord>, mut key_fn: F) -> Vec<PlaceRecord>
where
    K: Eq + Hash,
    F: FnMut(&PlaceRecord) -> K,
{
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|record| seen.insert(key_fn(record)))
        .collect()
}

/// Deduplicate by one of the built-in keys.
pub fn dedup(pool: impl IntoIterator<Item = PlaceRecord>, key: DedupKey) -> Vec<PlaceRecord> {
    let deduped = dedup_by_key(pool, |record| key.key_of(record));
    tracing::debug!(?key, count = deduped.len(), "deduplicated pool");
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, link: &str, rating: f64) -> PlaceRecord {
        PlaceRecord::new(name, "음식점 > 한식", "대전", link).with_rating(rating)
    }

    fn names(records: &[PlaceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn first_occurrence_wins_regardless_of_rating() {
        let pool = vec![
            rec("오씨칼국수", "https://a/1", 3.0),
            rec("태평소국밥", "https://a/2", 4.0),
            rec("오씨칼국수", "https://a/3", 5.0),
        ];
        let out = dedup(pool, DedupKey::Name);
        assert_eq!(names(&out), ["오씨칼국수", "태평소국밥"]);
        assert!((out[0].rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn name_key_is_exact() {
        let pool = vec![
            rec("성심당", "https://a/1", 0.0),
            rec("성심당 본점", "https://a/2", 0.0),
            rec("성심당 ", "https://a/3", 0.0),
        ];
        assert_eq!(dedup(pool, DedupKey::Name).len(), 3);
    }

    #[test]
    fn link_key_normalises() {
        let pool = vec![
            rec("광천식당", "http://place.map.kakao.com/1/", 0.0),
            rec("광천식당 (대흥동)", "https://place.map.kakao.com/1#menu", 0.0),
            rec("광천식당", "https://place.map.kakao.com/2", 0.0),
        ];
        let out = dedup(pool, DedupKey::Link);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "광천식당");
        assert_eq!(out[1].link, "https://place.map.kakao.com/2");
    }

    #[test]
    fn output_never_grows_and_keys_are_unique() {
        let pool: Vec<_> = (0..20)
            .map(|i| rec(&format!("식당{}", i % 7), &format!("https://a/{i}"), 0.0))
            .collect();
        let out = dedup(pool.clone(), DedupKey::Name);
        assert!(out.len() <= pool.len());
        assert_eq!(out.len(), 7);

        let mut seen = HashSet::new();
        assert!(out.iter().all(|r| seen.insert(r.name.clone())));
        // First-seen order.
        assert_eq!(out[0].name, "식당0");
        assert_eq!(out[6].name, "식당6");
    }

    #[test]
    fn dedup_is_idempotent() {
        let pool = vec![rec("a", "l1", 0.0), rec("b", "l2", 0.0), rec("a", "l3", 0.0)];
        let once = dedup(pool, DedupKey::Name);
        let twice = dedup(once.clone(), DedupKey::Name);
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_key_function() {
        let pool = vec![rec("a", "l1", 4.0), rec("b", "l2", 4.0), rec("c", "l3", 2.0)];
        let out = dedup_by_key(pool, |r| r.rating.to_bits());
        assert_eq!(names(&out), ["a", "c"]);
    }

    #[test]
    fn empty_pool() {
        assert!(dedup(Vec::new(), DedupKey::Link).is_empty());
    }

    #[test]
    fn dedup_key_serde_is_kebab_case() {
        let json = serde_json::to_string(&DedupKey::Link).expect("serialize");
        assert_eq!(json, "\"link\"");
        let key: DedupKey = serde_json::from_str("\"name\"").expect("deserialize");
        assert_eq!(key, DedupKey::Name);
    }
}
