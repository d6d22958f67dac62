// tagfilter-core/src/engine.rs
//! Defines the core `FilterEngine` trait and the shared filtering pipeline.
//!
//! Every engine variant owns an ordered list of filters (highest priority
//! first, ties in the order the rules were supplied) and runs tags through
//! them with [`apply_pipeline`]. Variants differ only in what they wrap
//! around that pipeline: timing and statistics, batching, or a per-tag
//! streaming predicate.
//!
//! License: MIT OR APACHE 2.0

use log::{trace, warn};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TagFilterError};
use crate::factory::create_filter;
use crate::filters::TagFilter;
use crate::patterns::PatternCache;
use crate::rules::AnyFilterRule;

/// Default number of tags buffered per chunk when streaming.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Performance counters reported by engines that collect them.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterStats {
    pub total_processed: u64,
    pub total_filtered: u64,
    /// Accumulated wall-clock time in seconds.
    pub processing_time: f64,
    pub filter_rate: f64,
    pub avg_processing_time: f64,
}

impl FilterStats {
    /// Fills in the derived fields from the accumulated counters.
    pub fn with_derived(mut self) -> Self {
        if self.total_processed > 0 {
            self.filter_rate = self.total_filtered as f64 / self.total_processed as f64;
            self.avg_processing_time = self.processing_time / self.total_processed as f64;
        } else {
            self.filter_rate = 0.0;
            self.avg_processing_time = 0.0;
        }
        self
    }
}

/// Selects an engine variant in [`crate::headless::create_engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Standard,
    Optimized,
    MemoryEfficient,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Standard => "standard",
            EngineKind::Optimized => "optimized",
            EngineKind::MemoryEfficient => "memory_efficient",
        }
    }
}

impl FromStr for EngineKind {
    type Err = TagFilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(EngineKind::Standard),
            "optimized" => Ok(EngineKind::Optimized),
            "memory_efficient" => Ok(EngineKind::MemoryEfficient),
            other => Err(TagFilterError::UnknownEngineKind(other.to_string())),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime options shared by all engine variants.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Chunk size for the optimized engine's streaming mode.
    pub batch_size: usize,
    /// Cache used to compile every regex-bearing pattern.
    pub pattern_cache: PatternCache,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            pattern_cache: PatternCache::global(),
        }
    }
}

impl EngineOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_pattern_cache(mut self, cache: PatternCache) -> Self {
        self.pattern_cache = cache;
        self
    }
}

/// A trait that defines the core functionality of a filtering engine.
///
/// This trait decouples callers from the engine variant, allowing
/// [`crate::headless::create_engine`] to hand out any of them.
pub trait FilterEngine: Send + Sync {
    /// Runs the tags through every enabled filter in priority order.
    fn filter_tags(&self, tags: &[String]) -> Vec<String>;

    /// Filters each batch independently.
    fn filter_batch(&self, batches: &[Vec<String>]) -> Vec<Vec<String>> {
        batches.iter().map(|batch| self.filter_tags(batch)).collect()
    }

    /// Filters a stream of tags.
    ///
    /// The default buffers the whole stream and filters it as one list.
    fn filter_stream<'a>(
        &'a self,
        tags: Box<dyn Iterator<Item = String> + 'a>,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let all: Vec<String> = tags.collect();
        Box::new(self.filter_tags(&all).into_iter())
    }

    /// Adds a rule and rebuilds the filter order.
    ///
    /// A rule of an unregistered kind is skipped with a warning. A rule whose
    /// pattern does not compile is rejected and the engine is left unchanged.
    fn add_rule(&mut self, rule: AnyFilterRule) -> Result<()>;

    /// Removes the first rule equal in value to `rule`. Returns whether one was removed.
    fn remove_rule(&mut self, rule: &AnyFilterRule) -> Result<bool>;

    fn clear_rules(&mut self);

    /// Number of enabled filters.
    fn filter_count(&self) -> usize;

    /// Filters in application order.
    fn filters_by_priority(&self) -> Vec<&dyn TagFilter>;

    /// Rules in the order they were supplied.
    fn rules(&self) -> &[AnyFilterRule];

    fn kind(&self) -> EngineKind;

    /// Statistics, for engines that collect them.
    fn performance_stats(&self) -> Option<FilterStats> {
        None
    }

    fn reset_stats(&self) {}
}

/// Builds filters for every enabled rule and orders them by descending priority.
///
/// Rules of unknown kinds are skipped with a warning; any other construction
/// error aborts the build.
pub fn build_filters(rules: &[AnyFilterRule], cache: &PatternCache) -> Result<Vec<Box<dyn TagFilter>>> {
    let mut filters = Vec::with_capacity(rules.len());
    for rule in rules.iter().filter(|rule| rule.enabled()) {
        match create_filter(rule, cache) {
            Ok(filter) => filters.push(filter),
            Err(TagFilterError::UnknownFilterKind(kind)) => {
                warn!("Skipping rule {}: unknown filter type '{}'.", rule, kind);
            }
            Err(e) => return Err(e),
        }
    }
    sort_by_priority(&mut filters);
    Ok(filters)
}

/// Stable sort, highest priority first.
pub fn sort_by_priority(filters: &mut [Box<dyn TagFilter>]) {
    filters.sort_by(|a, b| b.priority().cmp(&a.priority()));
}

/// Feeds `tags` through `filters` in order, each filter receiving the previous output.
///
/// `hook` observes every applied filter with the tag counts before and after.
/// The pipeline stops as soon as the list becomes empty.
pub fn apply_pipeline<H>(filters: &[Box<dyn TagFilter>], tags: Vec<String>, mut hook: H) -> Vec<String>
where
    H: FnMut(&dyn TagFilter, usize, usize),
{
    let mut current = tags;
    for filter in filters.iter().filter(|f| f.is_enabled()) {
        if current.is_empty() {
            break;
        }
        let before = current.len();
        current = filter.apply(current);
        hook(filter.as_ref(), before, current.len());
    }
    current
}

/// Hook that traces each filter step.
pub(crate) fn trace_step(filter: &dyn TagFilter, before: usize, after: usize) {
    trace!("{} applied: {} -> {} tags.", filter.rule(), before, after);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FilterRule, FilterType};

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn engine_kind_parses_known_names() {
        assert_eq!("standard".parse::<EngineKind>().unwrap(), EngineKind::Standard);
        assert_eq!("optimized".parse::<EngineKind>().unwrap(), EngineKind::Optimized);
        assert_eq!(
            "memory_efficient".parse::<EngineKind>().unwrap(),
            EngineKind::MemoryEfficient
        );
        let err = "turbo".parse::<EngineKind>().unwrap_err();
        assert!(matches!(err, TagFilterError::UnknownEngineKind(ref k) if k == "turbo"));
    }

    #[test]
    fn derived_stats_are_zero_without_input() {
        let stats = FilterStats::default().with_derived();
        assert_eq!(stats.filter_rate, 0.0);
        assert_eq!(stats.avg_processing_time, 0.0);
    }

    #[test]
    fn build_filters_skips_disabled_and_unknown_rules() {
        let rules: Vec<AnyFilterRule> = vec![
            FilterRule::plain_keyword("a").with_priority(1).into(),
            FilterRule::plain_keyword("b").with_enabled(false).into(),
            FilterRule::new(FilterType::Custom("engine_unit_unknown".into()), "c").into(),
            FilterRule::plain_keyword("d").with_priority(5).into(),
        ];
        let filters = build_filters(&rules, &PatternCache::new(8)).unwrap();
        let order: Vec<&str> = filters.iter().filter_map(|f| f.rule().pattern()).collect();
        assert_eq!(order, vec!["d", "a"]);
    }

    #[test]
    fn build_filters_propagates_invalid_patterns() {
        let rules: Vec<AnyFilterRule> = vec![FilterRule::regex("(bad").into()];
        let err = build_filters(&rules, &PatternCache::new(8)).unwrap_err();
        assert!(matches!(err, TagFilterError::InvalidPattern { .. }));
    }

    #[test]
    fn pipeline_feeds_output_forward_and_stops_when_empty() {
        let rules: Vec<AnyFilterRule> = vec![
            FilterRule::replace("a||b").with_priority(10).into(),
            FilterRule::plain_keyword("b").with_priority(5).into(),
            FilterRule::plain_keyword("zzz").with_priority(1).into(),
        ];
        let filters = build_filters(&rules, &PatternCache::new(8)).unwrap();

        let mut steps = 0;
        let out = apply_pipeline(&filters, tags(&["a"]), |_, _, _| steps += 1);
        assert!(out.is_empty());
        // The replacement feeds "b" into the keyword filter, which empties the
        // list; the last filter never runs.
        assert_eq!(steps, 2);
    }
}
