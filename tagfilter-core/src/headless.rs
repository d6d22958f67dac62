// tagfilter-core/src/headless.rs
//! Convenience wrappers for using the engines without holding one.
//!
//! [`create_engine`] picks an engine variant by name and hands it out
//! behind the `FilterEngine` trait. [`headless_filter_tags`] builds an engine,
//! runs one tag list through it and throws the engine away.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::engine::{EngineKind, EngineOptions, FilterEngine};
use crate::engines::memory_efficient::MemoryEfficientFilterEngine;
use crate::engines::optimized::OptimizedTagFilterEngine;
use crate::engines::standard::TagFilterEngine;
use crate::errors::Result;
use crate::rules::AnyFilterRule;

/// Builds the engine named by `kind` (`standard`, `optimized` or `memory_efficient`).
///
/// An unrecognised name fails with `UnknownEngineKind`.
pub fn create_engine(
    rules: Vec<AnyFilterRule>,
    kind: &str,
    options: EngineOptions,
) -> Result<Box<dyn FilterEngine>> {
    create_engine_of_kind(rules, kind.parse()?, options)
}

/// Builds the engine for an already-parsed [`EngineKind`].
pub fn create_engine_of_kind(
    rules: Vec<AnyFilterRule>,
    kind: EngineKind,
    options: EngineOptions,
) -> Result<Box<dyn FilterEngine>> {
    debug!("Creating {} engine for {} rules.", kind, rules.len());
    let engine: Box<dyn FilterEngine> = match kind {
        EngineKind::Standard => Box::new(TagFilterEngine::with_options(rules, options)?),
        EngineKind::Optimized => Box::new(OptimizedTagFilterEngine::with_options(rules, options)?),
        EngineKind::MemoryEfficient => {
            Box::new(MemoryEfficientFilterEngine::with_options(rules, options)?)
        }
    };
    Ok(engine)
}

/// One-shot filtering of a single tag list with the standard engine.
pub fn headless_filter_tags(rules: Vec<AnyFilterRule>, tags: &[String]) -> Result<Vec<String>> {
    let engine = TagFilterEngine::new(rules)?;
    Ok(engine.filter_tags(tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TagFilterError;
    use crate::patterns::PatternCache;
    use crate::rules::FilterRule;

    fn options() -> EngineOptions {
        EngineOptions::default().with_pattern_cache(PatternCache::new(32))
    }

    #[test]
    fn creates_each_engine_kind() {
        for (name, kind) in [
            ("standard", EngineKind::Standard),
            ("optimized", EngineKind::Optimized),
            ("memory_efficient", EngineKind::MemoryEfficient),
        ] {
            let engine = create_engine(vec![FilterRule::plain_keyword("a").into()], name, options()).unwrap();
            assert_eq!(engine.kind(), kind);
            assert_eq!(engine.filter_count(), 1);
        }
    }

    #[test]
    fn only_optimized_engine_reports_stats() {
        let standard = create_engine(Vec::new(), "standard", options()).unwrap();
        let optimized = create_engine(Vec::new(), "optimized", options()).unwrap();
        assert!(standard.performance_stats().is_none());
        assert!(optimized.performance_stats().is_some());
    }

    #[test]
    fn unknown_engine_name_fails() {
        let err = create_engine(Vec::new(), "quantum", options()).err().unwrap();
        assert!(matches!(err, TagFilterError::UnknownEngineKind(ref k) if k == "quantum"));
    }

    #[test]
    fn headless_filtering_applies_rules() {
        let out = headless_filter_tags(
            vec![FilterRule::replace("bad||good").into()],
            &["bad".to_string(), "cat".to_string()],
        )
        .unwrap();
        assert_eq!(out, vec!["good".to_string(), "cat".to_string()]);
    }
}
