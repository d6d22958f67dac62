//! Filters that drop individual tags: plain keyword, wildcard and regex.

use log::debug;
use regex::Regex;

use crate::errors::Result;
use crate::filters::{expect_single, remove_matching, FilterRole, TagFilter};
use crate::patterns::{normalize_tag, wildcard_to_regex, PatternCache, PatternFlags};
use crate::rules::AnyFilterRule;

/// Drops tags whose normalized form contains the rule's keyword.
#[derive(Debug)]
pub struct PlainKeywordFilter {
    rule: AnyFilterRule,
    keyword: String,
}

impl PlainKeywordFilter {
    pub fn new(rule: &AnyFilterRule, _cache: &PatternCache) -> Result<Self> {
        let keyword = expect_single(rule)?.pattern().to_string();
        Ok(Self {
            rule: rule.clone(),
            keyword,
        })
    }
}

impl TagFilter for PlainKeywordFilter {
    fn rule(&self) -> &AnyFilterRule {
        &self.rule
    }

    fn role(&self) -> FilterRole {
        FilterRole::Remove
    }

    fn matches(&self, tag: &str) -> bool {
        normalize_tag(tag).contains(&self.keyword)
    }

    fn apply(&self, tags: Vec<String>) -> Vec<String> {
        remove_matching(self, tags)
    }
}

/// Drops tags that match a wildcard expression in full (`*`, `_`, `x?`).
#[derive(Debug)]
pub struct WildcardFilter {
    rule: AnyFilterRule,
    regex: Regex,
}

impl WildcardFilter {
    pub fn new(rule: &AnyFilterRule, cache: &PatternCache) -> Result<Self> {
        let single = expect_single(rule)?;
        let translated = wildcard_to_regex(single.pattern());
        debug!("Wildcard '{}' translated to '{}'.", single.pattern(), translated);
        let regex = cache.get_compiled_pattern(&translated, PatternFlags::NONE)?;
        Ok(Self {
            rule: rule.clone(),
            regex,
        })
    }
}

impl TagFilter for WildcardFilter {
    fn rule(&self) -> &AnyFilterRule {
        &self.rule
    }

    fn role(&self) -> FilterRole {
        FilterRole::Remove
    }

    fn matches(&self, tag: &str) -> bool {
        self.regex.find(tag).is_some_and(|m| m.start() == 0)
    }

    fn apply(&self, tags: Vec<String>) -> Vec<String> {
        remove_matching(self, tags)
    }
}

/// Drops tags in which the rule's regular expression finds a match anywhere.
#[derive(Debug)]
pub struct RegexFilter {
    rule: AnyFilterRule,
    regex: Regex,
}

impl RegexFilter {
    pub fn new(rule: &AnyFilterRule, cache: &PatternCache) -> Result<Self> {
        let regex = cache.get_compiled_pattern(expect_single(rule)?.pattern(), PatternFlags::NONE)?;
        Ok(Self {
            rule: rule.clone(),
            regex,
        })
    }
}

impl TagFilter for RegexFilter {
    fn rule(&self) -> &AnyFilterRule {
        &self.rule
    }

    fn role(&self) -> FilterRole {
        FilterRole::Remove
    }

    fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    fn apply(&self, tags: Vec<String>) -> Vec<String> {
        remove_matching(self, tags)
    }
}
