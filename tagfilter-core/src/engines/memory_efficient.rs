// tagfilter-core/src/engines/memory_efficient.rs
//! An engine whose streaming mode decides each tag on its own, holding no
//! more than one tag at a time.
//!
//! The per-tag decision only consults filters that drop tags. Replacement
//! and group filters cannot judge a lone tag, so tags they would touch pass
//! through the stream untouched. List-based calls run the full pipeline.
//!
//! License: MIT OR APACHE 2.0

use crate::engine::{EngineKind, EngineOptions, FilterEngine};
use crate::engines::standard::TagFilterEngine;
use crate::errors::Result;
use crate::filters::{FilterRole, TagFilter};
use crate::rules::AnyFilterRule;

#[derive(Debug)]
pub struct MemoryEfficientFilterEngine {
    base: TagFilterEngine,
}

impl MemoryEfficientFilterEngine {
    pub fn new(rules: Vec<AnyFilterRule>) -> Result<Self> {
        Self::with_options(rules, EngineOptions::default())
    }

    pub fn with_options(rules: Vec<AnyFilterRule>, options: EngineOptions) -> Result<Self> {
        Ok(Self {
            base: TagFilterEngine::with_options(rules, options)?,
        })
    }

    /// False when any enabled removal filter matches the tag.
    pub fn should_keep_tag(&self, tag: &str) -> bool {
        !self
            .base
            .filters()
            .iter()
            .filter(|f| f.is_enabled() && f.role() == FilterRole::Remove)
            .any(|f| f.matches(tag))
    }

    pub fn predicate_stream<'a, I>(&'a self, tags: I) -> impl Iterator<Item = String> + 'a
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'a,
    {
        tags.into_iter().filter(move |tag| self.should_keep_tag(tag))
    }
}

impl FilterEngine for MemoryEfficientFilterEngine {
    fn filter_tags(&self, tags: &[String]) -> Vec<String> {
        self.base.filter_tags(tags)
    }

    fn filter_stream<'a>(
        &'a self,
        tags: Box<dyn Iterator<Item = String> + 'a>,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(self.predicate_stream(tags))
    }

    fn add_rule(&mut self, rule: AnyFilterRule) -> Result<()> {
        self.base.add_rule(rule)
    }

    fn remove_rule(&mut self, rule: &AnyFilterRule) -> Result<bool> {
        self.base.remove_rule(rule)
    }

    fn clear_rules(&mut self) {
        self.base.clear_rules()
    }

    fn filter_count(&self) -> usize {
        self.base.filter_count()
    }

    fn filters_by_priority(&self) -> Vec<&dyn TagFilter> {
        self.base.filters_by_priority()
    }

    fn rules(&self) -> &[AnyFilterRule] {
        self.base.rules()
    }

    fn kind(&self) -> EngineKind {
        EngineKind::MemoryEfficient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternCache;
    use crate::rules::{FilterRule, GroupFilterRule};

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn engine() -> MemoryEfficientFilterEngine {
        MemoryEfficientFilterEngine::with_options(
            vec![
                FilterRule::plain_keyword("nsfw").into(),
                FilterRule::wildcard("*_hair").into(),
                FilterRule::replace("bad||good").into(),
                GroupFilterRule::new(["x", "y"]).unwrap().into(),
            ],
            EngineOptions::default().with_pattern_cache(PatternCache::new(32)),
        )
        .unwrap()
    }

    #[test]
    fn keep_predicate_only_consults_removal_filters() {
        let engine = engine();
        assert!(!engine.should_keep_tag("nsfw"));
        assert!(!engine.should_keep_tag("red_hair"));
        assert!(engine.should_keep_tag("bad"));
        assert!(engine.should_keep_tag("x"));
        assert!(engine.should_keep_tag("smile"));
    }

    #[test]
    fn stream_passes_replacement_and_group_matches_through() {
        let engine = engine();
        let out: Vec<String> = engine
            .predicate_stream(tags(&["nsfw", "bad", "x", "y", "red_hair", "smile"]))
            .collect();
        assert_eq!(out, tags(&["bad", "x", "y", "smile"]));
    }

    #[test]
    fn list_filtering_runs_full_pipeline() {
        let engine = engine();
        assert_eq!(
            engine.filter_tags(&tags(&["nsfw", "bad", "x", "y", "smile"])),
            tags(&["good", "smile"])
        );
    }

    #[test]
    fn trait_stream_uses_predicate() {
        let engine = engine();
        let input = tags(&["nsfw", "cat"]);
        let out: Vec<String> = engine.filter_stream(Box::new(input.into_iter())).collect();
        assert_eq!(out, tags(&["cat"]));
    }
}
