//! Filter implementations, one per rule kind.
//!
//! A filter is the executable form of a rule. Every filter compiles what it
//! needs at construction time, so `apply` never fails and always processes
//! its whole input list. A disabled filter returns its input unchanged.
//!
//! New kinds can be plugged in by implementing [`TagFilter`] and registering
//! a constructor with [`crate::factory::register_filter`].
//!
//! License: MIT OR APACHE 2.0

pub mod group;
pub mod keyword;
pub mod replace;

use std::fmt;

use crate::errors::{Result, TagFilterError};
use crate::rules::{AnyFilterRule, FilterRule, GroupFilterRule};

pub use group::GroupFilter;
pub use keyword::{PlainKeywordFilter, RegexFilter, WildcardFilter};
pub use replace::{ReplaceCaptureFilter, ReplaceFilter};

/// How a filter acts on the tags it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRole {
    /// Matching tags are dropped.
    Remove,
    /// Matching tags are rewritten.
    Replace,
    /// Needs the whole tag list to decide; cannot judge a tag in isolation.
    Group,
}

/// The runtime interface shared by every filter.
pub trait TagFilter: fmt::Debug + Send + Sync {
    /// The rule this filter was built from.
    fn rule(&self) -> &AnyFilterRule;

    fn role(&self) -> FilterRole;

    /// Whether a single tag matches this filter's condition.
    ///
    /// For group filters this reports whether the tag matches any of the
    /// group's patterns, regardless of whether the group is complete.
    fn matches(&self, tag: &str) -> bool;

    /// Applies the filter to a whole tag list.
    fn apply(&self, tags: Vec<String>) -> Vec<String>;

    /// Whether the filter's condition holds for a tag list as a whole.
    fn matches_set(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.matches(tag))
    }

    fn priority(&self) -> u32 {
        self.rule().priority()
    }

    fn is_enabled(&self) -> bool {
        self.rule().enabled()
    }
}

/// Drops every tag the filter matches, unless the filter is disabled.
pub(crate) fn remove_matching<F: TagFilter + ?Sized>(filter: &F, mut tags: Vec<String>) -> Vec<String> {
    if !filter.is_enabled() {
        return tags;
    }
    tags.retain(|tag| !filter.matches(tag));
    tags
}

/// Extracts the single-tag rule a constructor expects.
pub(crate) fn expect_single(rule: &AnyFilterRule) -> Result<&FilterRule> {
    rule.as_single().ok_or_else(|| {
        TagFilterError::InvalidRule(format!(
            "{} filter requires a single-tag rule, got {}",
            rule.filter_type(),
            rule
        ))
    })
}

/// Extracts the group rule a constructor expects.
pub(crate) fn expect_group(rule: &AnyFilterRule) -> Result<&GroupFilterRule> {
    rule.as_group().ok_or_else(|| {
        TagFilterError::InvalidRule(format!(
            "{} filter requires a group rule, got {}",
            rule.filter_type(),
            rule
        ))
    })
}
