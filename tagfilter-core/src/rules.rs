//! Rule model for the tag filtering engine.
//!
//! Rules are immutable values: fields are private, accessors borrow, and the
//! `with_*` methods return a modified copy. Equality and hashing are
//! structural, so two rules built from the same values are interchangeable
//! (for example when removing a rule from an engine).
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TagFilterError};

/// The kind of a rule. Determines which filter implementation is built for it.
///
/// `Custom` carries any kind name not built into the library; such rules are
/// only constructible once a constructor has been registered for the name in
/// the filter factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterType {
    PlainKeyword,
    Wildcard,
    Regex,
    Group,
    Replace,
    ReplaceCapture,
    Custom(String),
}

impl FilterType {
    /// The six kinds supported out of the box.
    pub const BUILTIN: [FilterType; 6] = [
        FilterType::PlainKeyword,
        FilterType::Wildcard,
        FilterType::Regex,
        FilterType::Group,
        FilterType::Replace,
        FilterType::ReplaceCapture,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FilterType::PlainKeyword => "plain_keyword",
            FilterType::Wildcard => "wildcard",
            FilterType::Regex => "regex",
            FilterType::Group => "group",
            FilterType::Replace => "replace",
            FilterType::ReplaceCapture => "replace_capture",
            FilterType::Custom(name) => name,
        }
    }

    /// Replacement kinds rewrite tags instead of dropping them.
    pub fn is_replacement(&self) -> bool {
        matches!(self, FilterType::Replace | FilterType::ReplaceCapture)
    }
}

impl From<&str> for FilterType {
    fn from(value: &str) -> Self {
        match value {
            "plain_keyword" => FilterType::PlainKeyword,
            "wildcard" => FilterType::Wildcard,
            "regex" => FilterType::Regex,
            "group" => FilterType::Group,
            "replace" => FilterType::Replace,
            "replace_capture" => FilterType::ReplaceCapture,
            other => FilterType::Custom(other.to_string()),
        }
    }
}

impl From<String> for FilterType {
    fn from(value: String) -> Self {
        FilterType::from(value.as_str())
    }
}

impl From<FilterType> for String {
    fn from(value: FilterType) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for FilterType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(FilterType::from(s))
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule that applies to one tag at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterRule {
    filter_type: FilterType,
    pattern: String,
    priority: u32,
    replacement: Option<String>,
    enabled: bool,
    description: Option<String>,
}

impl FilterRule {
    /// Creates an enabled rule with priority 0 and no replacement or description.
    pub fn new(filter_type: FilterType, pattern: impl Into<String>) -> Self {
        Self {
            filter_type,
            pattern: pattern.into(),
            priority: 0,
            replacement: None,
            enabled: true,
            description: None,
        }
    }

    pub fn plain_keyword(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::PlainKeyword, pattern)
    }

    pub fn wildcard(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::Wildcard, pattern)
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::Regex, pattern)
    }

    /// `pattern` has the form `source||replacement`.
    pub fn replace(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::Replace, pattern)
    }

    /// `pattern` has the form `regex||replacement`, where the replacement may use `$N`.
    pub fn replace_capture(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::ReplaceCapture, pattern)
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn filter_type(&self) -> &FilterType {
        &self.filter_type
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FilterRule({}, '{}', priority={})",
            self.filter_type, self.pattern, self.priority
        )
    }
}

static GROUP_FILTER_TYPE: FilterType = FilterType::Group;

/// A rule that removes a set of tags when all of its patterns co-occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupFilterRule {
    patterns: Vec<String>,
    priority: u32,
    enabled: bool,
    description: Option<String>,
}

impl GroupFilterRule {
    /// Creates an enabled group with priority 0.
    ///
    /// Fails with `InvalidRule` when `patterns` is empty.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Err(TagFilterError::InvalidRule(
                "Group filter must have at least one pattern".to_string(),
            ));
        }
        Ok(Self {
            patterns,
            priority: 0,
            enabled: true,
            description: None,
        })
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn filter_type(&self) -> &FilterType {
        &GROUP_FILTER_TYPE
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for GroupFilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroupFilterRule(group, {:?}, priority={})",
            self.patterns, self.priority
        )
    }
}

/// Either kind of rule, as accepted by engines and the filter factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyFilterRule {
    Single(FilterRule),
    Group(GroupFilterRule),
}

impl AnyFilterRule {
    pub fn filter_type(&self) -> &FilterType {
        match self {
            AnyFilterRule::Single(rule) => rule.filter_type(),
            AnyFilterRule::Group(rule) => rule.filter_type(),
        }
    }

    pub fn priority(&self) -> u32 {
        match self {
            AnyFilterRule::Single(rule) => rule.priority(),
            AnyFilterRule::Group(rule) => rule.priority(),
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            AnyFilterRule::Single(rule) => rule.enabled(),
            AnyFilterRule::Group(rule) => rule.enabled(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            AnyFilterRule::Single(rule) => rule.description(),
            AnyFilterRule::Group(rule) => rule.description(),
        }
    }

    /// The pattern string of a single-tag rule; `None` for groups.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            AnyFilterRule::Single(rule) => Some(rule.pattern()),
            AnyFilterRule::Group(_) => None,
        }
    }

    pub fn as_single(&self) -> Option<&FilterRule> {
        match self {
            AnyFilterRule::Single(rule) => Some(rule),
            AnyFilterRule::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupFilterRule> {
        match self {
            AnyFilterRule::Group(rule) => Some(rule),
            AnyFilterRule::Single(_) => None,
        }
    }
}

impl From<FilterRule> for AnyFilterRule {
    fn from(rule: FilterRule) -> Self {
        AnyFilterRule::Single(rule)
    }
}

impl From<GroupFilterRule> for AnyFilterRule {
    fn from(rule: GroupFilterRule) -> Self {
        AnyFilterRule::Group(rule)
    }
}

impl fmt::Display for AnyFilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyFilterRule::Single(rule) => rule.fmt(f),
            AnyFilterRule::Group(rule) => rule.fmt(f),
        }
    }
}
