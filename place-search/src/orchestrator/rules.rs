//! Rule-based filtering of deduplicated records.
//!
//! Each [`Rule`] is a pure predicate over one record. A [`RuleChain`] keeps
//! a record only if every rule allows it, so the result does not depend on
//! rule order and applying the chain twice changes nothing. Matching is
//! case-sensitive substring containment.

use regex::Regex;

use crate::error::SearchError;
use crate::filter_config::FilterConfig;
use crate::types::PlaceRecord;

/// One filtering rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Drop franchise branches whose name matches `pattern`, unless the
    /// name contains `main_branch_token`.
    ///
    /// Cuisine words that happen to end in the same glyph as a branch
    /// suffix are dropped too; the heuristic has no dictionary.
    ChainSuffixExclusion {
        pattern: Regex,
        main_branch_token: String,
    },
    /// Drop records whose category contains any of the terms.
    CategoryDeny(Vec<String>),
    /// Keep only records whose category contains at least one of the terms.
    CategoryAllow(Vec<String>),
    /// Drop records rated below the threshold. Equal passes.
    MinRating(f64),
    /// Drop records with fewer reviews than the threshold. Equal passes.
    MinReviewCount(u32),
}

impl Rule {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChainSuffixExclusion { .. } => "chain-suffix-exclusion",
            Self::CategoryDeny(_) => "category-deny",
            Self::CategoryAllow(_) => "category-allow",
            Self::MinRating(_) => "min-rating",
            Self::MinReviewCount(_) => "min-review-count",
        }
    }

    /// Whether `record` survives this rule.
    pub fn allows(&self, record: &PlaceRecord) -> bool {
        match self {
            Self::ChainSuffixExclusion {
                pattern,
                main_branch_token,
            } => record.name.contains(main_branch_token.as_str()) || !pattern.is_match(&record.name),
            Self::CategoryDeny(terms) => !contains_any(&record.category, terms),
            Self::CategoryAllow(terms) => contains_any(&record.category, terms),
            Self::MinRating(min) => record.rating >= *min,
            Self::MinReviewCount(min) => record.review_count >= *min,
        }
    }
}

fn contains_any(haystack: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .any(|term| !term.is_empty() && haystack.contains(term.as_str()))
}

/// Ordered conjunction of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    /// A chain from explicit rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Build the chain for the enabled toggles in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or the
    /// chain suffix pattern does not compile.
    pub fn from_config(config: &FilterConfig) -> Result<Self, SearchError> {
        config.validate()?;

        let mut rules = Vec::new();
        if config.chain_exclusion {
            let pattern = Regex::new(&config.chain_suffix_pattern).map_err(|e| {
                SearchError::Config(format!("invalid chain_suffix_pattern: {e}"))
            })?;
            rules.push(Rule::ChainSuffixExclusion {
                pattern,
                main_branch_token: config.main_branch_token.clone(),
            });
        }
        if config.category_focus {
            rules.push(Rule::CategoryDeny(config.category_deny.clone()));
        }
        if config.restaurants_only {
            rules.push(Rule::CategoryAllow(config.category_allow.clone()));
        }
        if let Some(min) = config.min_rating {
            rules.push(Rule::MinRating(min));
        }
        if let Some(min) = config.min_review_count {
            rules.push(Rule::MinReviewCount(min));
        }
        Ok(Self { rules })
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether no rule is enabled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `record` passes every rule.
    pub fn allows(&self, record: &PlaceRecord) -> bool {
        self.rules.iter().all(|rule| rule.allows(record))
    }

    /// Keep the records every rule allows, in input order.
    pub fn apply(&self, records: Vec<PlaceRecord>) -> Vec<PlaceRecord> {
        let before = records.len();
        let kept: Vec<PlaceRecord> = records.into_iter().filter(|r| self.allows(r)).collect();
        tracing::debug!(
            rules = self.rules.len(),
            before,
            removed = before - kept.len(),
            "rule chain applied"
        );
        kept
    }
}
