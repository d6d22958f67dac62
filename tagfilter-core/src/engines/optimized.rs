// tagfilter-core/src/engines/optimized.rs
//! An engine that times every call, keeps running statistics and streams
//! its input in fixed-size chunks.
//! License: MIT OR APACHE 2.0

use log::debug;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::engine::{EngineKind, EngineOptions, FilterEngine, FilterStats};
use crate::engines::standard::TagFilterEngine;
use crate::errors::Result;
use crate::filters::TagFilter;
use crate::patterns::{PatternCache, PatternFlags};
use crate::rules::AnyFilterRule;

#[derive(Debug)]
pub struct OptimizedTagFilterEngine {
    base: TagFilterEngine,
    batch_size: usize,
    stats: Mutex<FilterStats>,
}

impl OptimizedTagFilterEngine {
    pub fn new(rules: Vec<AnyFilterRule>) -> Result<Self> {
        Self::with_options(rules, EngineOptions::default())
    }

    pub fn with_options(rules: Vec<AnyFilterRule>, options: EngineOptions) -> Result<Self> {
        prewarm(&rules, &options.pattern_cache);
        let batch_size = options.batch_size.max(1);
        Ok(Self {
            base: TagFilterEngine::with_options(rules, options)?,
            batch_size,
            stats: Mutex::new(FilterStats::default()),
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Lazily filters `tags`, buffering at most `batch_size` tags at a time.
    pub fn chunked_stream<I>(&self, tags: I) -> ChunkedStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = String>,
    {
        ChunkedStream {
            engine: self,
            source: tags.into_iter(),
            pending: Vec::new().into_iter(),
            exhausted: false,
        }
    }

    fn record(&self, processed: usize, kept: usize, seconds: f64) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        stats.total_processed += processed as u64;
        stats.total_filtered += processed.saturating_sub(kept) as u64;
        stats.processing_time += seconds;
    }
}

/// Compiles every single-tag pattern up front. Patterns that are not valid
/// regexes (plain keywords with metacharacters, wildcards) are skipped.
fn prewarm(rules: &[AnyFilterRule], cache: &PatternCache) {
    for pattern in rules.iter().filter_map(AnyFilterRule::pattern) {
        if let Err(e) = cache.get_compiled_pattern(pattern, PatternFlags::NONE) {
            debug!("Not pre-compiling '{}': {}", pattern, e);
        }
    }
}

impl FilterEngine for OptimizedTagFilterEngine {
    fn filter_tags(&self, tags: &[String]) -> Vec<String> {
        let start = Instant::now();
        let result = self.base.filter_tags(tags);
        self.record(tags.len(), result.len(), start.elapsed().as_secs_f64());
        result
    }

    fn filter_stream<'a>(
        &'a self,
        tags: Box<dyn Iterator<Item = String> + 'a>,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(self.chunked_stream(tags))
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
        EngineKind::Optimized
    }

    fn performance_stats(&self) -> Option<FilterStats> {
        let stats = *self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        Some(stats.with_derived())
    }

    fn reset_stats(&self) {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = FilterStats::default();
    }
}

/// Iterator returned by [`OptimizedTagFilterEngine::chunked_stream`].
///
/// Pulls up to `batch_size` tags from the source, filters them as one list
/// and yields the survivors before pulling the next chunk. A final partial
/// chunk is flushed when the source runs dry.
pub struct ChunkedStream<'a, I> {
    engine: &'a OptimizedTagFilterEngine,
    source: I,
    pending: std::vec::IntoIter<String>,
    exhausted: bool,
}

impl<I> Iterator for ChunkedStream<'_, I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(tag) = self.pending.next() {
                return Some(tag);
            }
            if self.exhausted {
                return None;
            }
            let chunk: Vec<String> = self.source.by_ref().take(self.engine.batch_size).collect();
            if chunk.len() < self.engine.batch_size {
                self.exhausted = true;
            }
            if chunk.is_empty() {
                return None;
            }
            self.pending = self.engine.filter_tags(&chunk).into_iter();
        }
    }
}
