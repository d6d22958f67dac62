//! Filters that rewrite tags: exact replacement and capture-group replacement.
//!
//! Both read `source||replacement` from the rule pattern. A rule whose
//! pattern has no delimiter but which carries a `replacement` field is read
//! as `(pattern, replacement)`; this is the shape the plain-text config
//! loader produces.

use log::debug;
use regex::Regex;

use crate::errors::Result;
use crate::filters::{expect_single, FilterRole, TagFilter};
use crate::patterns::{
    capture_template, parse_replacement_pattern, PatternCache, PatternFlags, REPLACEMENT_DELIMITER,
};
use crate::rules::{AnyFilterRule, FilterRule};

pub(crate) fn resolve_replacement(rule: &FilterRule) -> Result<(String, String)> {
    match rule.replacement() {
        Some(replacement) if !rule.pattern().contains(REPLACEMENT_DELIMITER) => {
            Ok((rule.pattern().trim().to_string(), replacement.trim().to_string()))
        }
        _ => parse_replacement_pattern(rule.pattern()),
    }
}

/// Replaces tags equal to the source with the replacement text.
#[derive(Debug)]
pub struct ReplaceFilter {
    rule: AnyFilterRule,
    source: String,
    replacement: String,
}

impl ReplaceFilter {
    pub fn new(rule: &AnyFilterRule, _cache: &PatternCache) -> Result<Self> {
        let (source, replacement) = resolve_replacement(expect_single(rule)?)?;
        Ok(Self {
            rule: rule.clone(),
            source,
            replacement,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl TagFilter for ReplaceFilter {
    fn rule(&self) -> &AnyFilterRule {
        &self.rule
    }

    fn role(&self) -> FilterRole {
        FilterRole::Replace
    }

    fn matches(&self, tag: &str) -> bool {
        tag == self.source
    }

    fn apply(&self, tags: Vec<String>) -> Vec<String> {
        if !self.is_enabled() {
            return tags;
        }
        tags.into_iter()
            .map(|tag| {
                if self.matches(&tag) {
                    self.replacement.clone()
                } else {
                    tag
                }
            })
            .collect()
    }
}

/// Rewrites tags matched by a regex, expanding `$N` capture references.
///
/// Only the first match inside a tag is substituted.
#[derive(Debug)]
pub struct ReplaceCaptureFilter {
    rule: AnyFilterRule,
    regex: Regex,
    template: String,
}

impl ReplaceCaptureFilter {
    pub fn new(rule: &AnyFilterRule, cache: &PatternCache) -> Result<Self> {
        let (source, replacement) = resolve_replacement(expect_single(rule)?)?;
        let regex = cache.get_compiled_pattern(&source, PatternFlags::NONE)?;
        let template = capture_template(&replacement);
        debug!("Capture replacement '{}' -> '{}'.", source, template);
        Ok(Self {
            rule: rule.clone(),
            regex,
            template,
        })
    }

    /// Returns the rewritten tag, or `None` if the pattern does not match.
    pub fn substitute(&self, tag: &str) -> Option<String> {
        if !self.regex.is_match(tag) {
            return None;
        }
        Some(self.regex.replace(tag, self.template.as_str()).into_owned())
    }
}

impl TagFilter for ReplaceCaptureFilter {
    fn rule(&self) -> &AnyFilterRule {
        &self.rule
    }

    fn role(&self) -> FilterRole {
        FilterRole::Replace
    }

    fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    fn apply(&self, tags: Vec<String>) -> Vec<String> {
        if !self.is_enabled() {
            return tags;
        }
        tags.into_iter()
            .map(|tag| self.substitute(&tag).unwrap_or(tag))
            .collect()
    }
}
