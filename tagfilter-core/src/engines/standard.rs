// tagfilter-core/src/engines/standard.rs
//! The baseline `FilterEngine`: rules in, ordered filters out.
//! License: MIT OR APACHE 2.0

use log::{debug, warn};

use crate::engine::{
    apply_pipeline, build_filters, sort_by_priority, trace_step, EngineKind, EngineOptions,
    FilterEngine,
};
use crate::errors::{Result, TagFilterError};
use crate::factory::create_filter;
use crate::filters::TagFilter;
use crate::patterns::PatternCache;
use crate::rules::AnyFilterRule;

#[derive(Debug)]
pub struct TagFilterEngine {
    rules: Vec<AnyFilterRule>,
    filters: Vec<Box<dyn TagFilter>>,
    cache: PatternCache,
}

impl TagFilterEngine {
    pub fn new(rules: Vec<AnyFilterRule>) -> Result<Self> {
        Self::with_options(rules, EngineOptions::default())
    }

    pub fn with_options(rules: Vec<AnyFilterRule>, options: EngineOptions) -> Result<Self> {
        let cache = options.pattern_cache;
        let filters = build_filters(&rules, &cache)?;
        debug!(
            "Standard engine built with {} rules, {} active filters.",
            rules.len(),
            filters.len()
        );
        Ok(Self {
            rules,
            filters,
            cache,
        })
    }

    /// The cache every filter of this engine was compiled through.
    pub fn pattern_cache(&self) -> &PatternCache {
        &self.cache
    }

    pub(crate) fn filters(&self) -> &[Box<dyn TagFilter>] {
        &self.filters
    }
}

impl FilterEngine for TagFilterEngine {
    fn filter_tags(&self, tags: &[String]) -> Vec<String> {
        if tags.is_empty() {
            return Vec::new();
        }
        apply_pipeline(&self.filters, tags.to_vec(), trace_step)
    }

    fn add_rule(&mut self, rule: AnyFilterRule) -> Result<()> {
        if rule.enabled() {
            match create_filter(&rule, &self.cache) {
                Ok(filter) => {
                    self.filters.push(filter);
                    sort_by_priority(&mut self.filters);
                }
                Err(TagFilterError::UnknownFilterKind(kind)) => {
                    warn!("Not adding rule {}: unknown filter type '{}'.", rule, kind);
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
        self.rules.push(rule);
        Ok(())
    }

    fn remove_rule(&mut self, rule: &AnyFilterRule) -> Result<bool> {
        let Some(index) = self.rules.iter().position(|r| r == rule) else {
            return Ok(false);
        };
        self.rules.remove(index);
        self.filters = build_filters(&self.rules, &self.cache)?;
        Ok(true)
    }

    fn clear_rules(&mut self) {
        self.rules.clear();
        self.filters.clear();
    }

    fn filter_count(&self) -> usize {
        self.filters.iter().filter(|f| f.is_enabled()).count()
    }

    fn filters_by_priority(&self) -> Vec<&dyn TagFilter> {
        self.filters.iter().map(|f| f.as_ref()).collect()
    }

    fn rules(&self) -> &[AnyFilterRule] {
        &self.rules
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FilterRule, FilterType, GroupFilterRule};

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn engine(rules: Vec<AnyFilterRule>) -> TagFilterEngine {
        TagFilterEngine::with_options(
            rules,
            EngineOptions::default().with_pattern_cache(PatternCache::new(32)),
        )
        .unwrap()
    }

    #[test]
    fn filters_keyword_and_wildcard_rules() {
        let engine = engine(vec![
            FilterRule::plain_keyword("nsfw").with_priority(10).into(),
            FilterRule::wildcard("*_hair").with_priority(5).into(),
        ]);
        assert_eq!(
            engine.filter_tags(&tags(&["nsfw", "red_hair", "smile", "blue_hair"])),
            tags(&["smile"])
        );
    }

    #[test]
    fn empty_input_returns_empty_output() {
        let engine = engine(vec![FilterRule::plain_keyword("x").into()]);
        assert!(engine.filter_tags(&[]).is_empty());
    }

    #[test]
    fn filters_are_ordered_by_priority_then_insertion() {
        let engine = engine(vec![
            FilterRule::plain_keyword("low").with_priority(1).into(),
            FilterRule::plain_keyword("first").with_priority(7).into(),
            FilterRule::plain_keyword("second").with_priority(7).into(),
        ]);
        let order: Vec<&str> = engine
            .filters_by_priority()
            .iter()
            .filter_map(|f| f.rule().pattern())
            .collect();
        assert_eq!(order, vec!["first", "second", "low"]);
    }

    #[test]
    fn add_rule_reorders_filters() {
        let mut engine = engine(vec![FilterRule::plain_keyword("a").with_priority(1).into()]);
        engine
            .add_rule(FilterRule::plain_keyword("b").with_priority(9).into())
            .unwrap();
        assert_eq!(engine.filter_count(), 2);
        assert_eq!(engine.filters_by_priority()[0].rule().pattern(), Some("b"));
    }

    #[test]
    fn add_rule_with_bad_pattern_leaves_engine_unchanged() {
        let mut engine = engine(vec![FilterRule::plain_keyword("a").into()]);
        let err = engine.add_rule(FilterRule::regex("(oops").into()).unwrap_err();
        assert!(matches!(err, TagFilterError::InvalidPattern { .. }));
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(engine.filter_count(), 1);
    }

    #[test]
    fn add_rule_of_unknown_kind_is_skipped() {
        let mut engine = engine(Vec::new());
        engine
            .add_rule(FilterRule::new(FilterType::Custom("standard_unit_unknown".into()), "x").into())
            .unwrap();
        assert!(engine.rules().is_empty());
        assert_eq!(engine.filter_count(), 0);
    }

    #[test]
    fn remove_rule_by_value() {
        let keep: AnyFilterRule = FilterRule::plain_keyword("keep").into();
        let drop: AnyFilterRule = GroupFilterRule::new(["x", "y"]).unwrap().into();
        let mut engine = engine(vec![keep.clone(), drop.clone()]);

        let twin: AnyFilterRule = GroupFilterRule::new(["x", "y"]).unwrap().into();
        assert!(engine.remove_rule(&twin).unwrap());
        assert!(!engine.remove_rule(&twin).unwrap());
        assert_eq!(engine.rules(), &[keep]);
        assert_eq!(engine.filter_count(), 1);
    }

    #[test]
    fn clear_rules_makes_engine_identity() {
        let mut engine = engine(vec![FilterRule::plain_keyword("a").into()]);
        engine.clear_rules();
        assert_eq!(engine.filter_count(), 0);
        assert_eq!(engine.filter_tags(&tags(&["a", "b"])), tags(&["a", "b"]));
    }

    #[test]
    fn disabled_rules_are_kept_but_not_applied() {
        let engine = engine(vec![FilterRule::plain_keyword("a").with_enabled(false).into()]);
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(engine.filter_count(), 0);
        assert_eq!(engine.filter_tags(&tags(&["a"])), tags(&["a"]));
    }
}
