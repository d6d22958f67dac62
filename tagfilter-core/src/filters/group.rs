//! Group filter: removes a set of co-occurring tags.
//!
//! A group fires only when every one of its patterns is found (as a
//! substring of a normalized tag) somewhere in the list. When it fires, every
//! tag matching any of the patterns is removed; otherwise the list is left
//! untouched.

use crate::errors::Result;
use crate::filters::{expect_group, FilterRole, TagFilter};
use crate::patterns::{normalize_tag, PatternCache};
use crate::rules::AnyFilterRule;

#[derive(Debug)]
pub struct GroupFilter {
    rule: AnyFilterRule,
    patterns: Vec<String>,
}

impl GroupFilter {
    pub fn new(rule: &AnyFilterRule, _cache: &PatternCache) -> Result<Self> {
        let patterns = expect_group(rule)?.patterns().to_vec();
        Ok(Self {
            rule: rule.clone(),
            patterns,
        })
    }

    fn pattern_in(normalized: &str, pattern: &str) -> bool {
        normalized.contains(pattern)
    }
}

impl TagFilter for GroupFilter {
    fn rule(&self) -> &AnyFilterRule {
        &self.rule
    }

    fn role(&self) -> FilterRole {
        FilterRole::Group
    }

    fn matches(&self, tag: &str) -> bool {
        let normalized = normalize_tag(tag);
        self.patterns
            .iter()
            .any(|pattern| Self::pattern_in(&normalized, pattern))
    }

    /// True when every pattern is present in at least one tag.
    fn matches_set(&self, tags: &[String]) -> bool {
        let normalized: Vec<String> = tags.iter().map(|tag| normalize_tag(tag)).collect();
        self.patterns.iter().all(|pattern| {
            normalized
                .iter()
                .any(|tag| Self::pattern_in(tag, pattern))
        })
    }

    fn apply(&self, mut tags: Vec<String>) -> Vec<String> {
        if !self.is_enabled() || !self.matches_set(&tags) {
            return tags;
        }
        tags.retain(|tag| !self.matches(tag));
        tags
    }
}
