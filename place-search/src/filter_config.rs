//! Rule toggles, thresholds and word lists for the filter chain.
//!
//! Category word lists are tied to the provider's Korean category taxonomy,
//! so they live here as data rather than inside the rules. Every field can
//! be overridden from a TOML `[filters]` table.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::orchestrator::dedup::DedupKey;
use crate::types::MAX_RATING;

/// Name pattern for franchise branches: the last word ends in `점`.
pub const DEFAULT_CHAIN_SUFFIX_PATTERN: &str = r"(?:^|\s)\S+점$";

/// Token marking a flagship store, which is exempt from chain exclusion.
pub const DEFAULT_MAIN_BRANCH_TOKEN: &str = "본점";

/// Category terms dropped when category focus is on.
pub const DEFAULT_CATEGORY_DENY: &[&str] = &[
    "카페",
    "커피",
    "디저트",
    "제과",
    "베이커리",
    "양식",
    "피자",
    "파스타",
    "햄버거",
];

/// Top-level categories kept in restaurants-only mode.
pub const DEFAULT_CATEGORY_ALLOW: &[&str] = &["음식점", "카페", "술집"];

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_string()).collect()
}

/// Which rules run and with what data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Drop franchise branches by name ending.
    pub chain_exclusion: bool,
    /// Regex matched against the name for chain exclusion.
    pub chain_suffix_pattern: String,
    /// Substring that exempts a name from chain exclusion.
    pub main_branch_token: String,
    /// Drop records whose category contains a deny term.
    pub category_focus: bool,
    /// Deny terms used when `category_focus` is on.
    pub category_deny: Vec<String>,
    /// Keep only records whose category contains an allow term.
    pub restaurants_only: bool,
    /// Allow terms used when `restaurants_only` is on.
    pub category_allow: Vec<String>,
    /// Inclusive lower bound on rating.
    pub min_rating: Option<f64>,
    /// Inclusive lower bound on review count.
    pub min_review_count: Option<u32>,
    /// Identity used to collapse duplicates.
    pub dedup_key: DedupKey,
    /// Sort the final list by rating, highest first.
    pub sort_by_rating: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            chain_exclusion: true,
            chain_suffix_pattern: DEFAULT_CHAIN_SUFFIX_PATTERN.to_string(),
            main_branch_token: DEFAULT_MAIN_BRANCH_TOKEN.to_string(),
            category_focus: false,
            category_deny: owned(DEFAULT_CATEGORY_DENY),
            restaurants_only: true,
            category_allow: owned(DEFAULT_CATEGORY_ALLOW),
            min_rating: None,
            min_review_count: None,
            dedup_key: DedupKey::Name,
            sort_by_rating: false,
        }
    }
}

impl FilterConfig {
    /// A configuration with every rule switched off.
    pub fn disabled() -> Self {
        Self {
            chain_exclusion: false,
            category_focus: false,
            restaurants_only: false,
            ..Self::default()
        }
    }

    /// Validates thresholds and word lists.
    ///
    /// The chain pattern is compiled later by the rule chain, which reports
    /// a bad pattern as [`SearchError::Config`].
    pub fn validate(&self) -> Result<(), SearchError> {
        if let Some(min) = self.min_rating {
            if !(0.0..=MAX_RATING).contains(&min) {
                return Err(SearchError::Config(format!(
                    "min_rating must be between 0 and {MAX_RATING}, got {min}"
                )));
            }
        }
        if self.chain_exclusion && self.main_branch_token.is_empty() {
            return Err(SearchError::Config(
                "main_branch_token must not be empty when chain_exclusion is on".into(),
            ));
        }
        if self.restaurants_only && self.category_allow.iter().all(|t| t.is_empty()) {
            return Err(SearchError::Config(
                "category_allow must list at least one term in restaurants_only mode".into(),
            ));
        }
        Ok(())
    }
}
