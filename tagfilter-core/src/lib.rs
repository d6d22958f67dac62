//! # Tagfilter Core Library
//!
//! `tagfilter-core` filters lists of metadata tags (the comma-separated
//! descriptors attached to generated images) according to user-defined
//! rules. A rule either drops tags (by keyword, wildcard or regular
//! expression), rewrites them (exact replacement or capture-group
//! substitution), or drops a whole set of co-occurring tags (groups).
//!
//! ## Modules
//!
//! * `rules`: The immutable rule model (`FilterRule`, `GroupFilterRule`, `AnyFilterRule`).
//! * `patterns`: Wildcard translation, replacement parsing, normalization and the LRU `PatternCache`.
//! * `filters`: The `TagFilter` trait and one implementation per rule kind.
//! * `factory`: The process-wide registry mapping rule kinds to filter constructors.
//! * `engine`: The `FilterEngine` trait, the shared pipeline and engine options.
//! * `engines`: The standard, optimized and memory-efficient engines.
//! * `headless`: `create_engine` and one-shot filtering helpers.
//! * `config`: JSON, YAML and plain-text rule documents.
//! * `errors`: The `TagFilterError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use tagfilter_core::{
//!     create_engine, AnyFilterRule, EngineOptions, FilterEngine, FilterRule, GroupFilterRule,
//! };
//!
//! fn main() -> Result<(), tagfilter_core::TagFilterError> {
//!     let rules: Vec<AnyFilterRule> = vec![
//!         FilterRule::plain_keyword("nsfw").with_priority(10).into(),
//!         FilterRule::wildcard("*_hair").with_priority(5).into(),
//!         FilterRule::replace("bad||good").into(),
//!         GroupFilterRule::new(["steam", "sweat", "blush"])?.with_priority(100).into(),
//!     ];
//!     let engine = create_engine(rules, "standard", EngineOptions::default())?;
//!
//!     let tags: Vec<String> = ["nsfw", "red_hair", "bad", "smile"]
//!         .iter()
//!         .map(|t| t.to_string())
//!         .collect();
//!     assert_eq!(engine.filter_tags(&tags), vec!["good", "smile"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`TagFilterError`]. Filters compile their
//! patterns when they are built, so applying a filter or running an engine
//! never fails.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod factory;
pub mod filters;
pub mod headless;
pub mod patterns;
pub mod rules;

/// Re-exports the custom error type and result alias.
pub use errors::{Result, TagFilterError};

/// Re-exports the rule model.
pub use rules::{AnyFilterRule, FilterRule, FilterType, GroupFilterRule};

/// Re-exports the pattern cache and the most used pattern helpers.
pub use patterns::{
    normalize_tag, wildcard_to_regex, PatternCache, PatternFlags, DEFAULT_CACHE_CAPACITY,
};

/// Re-exports the filter trait and built-in filters.
pub use filters::{
    FilterRole, GroupFilter, PlainKeywordFilter, RegexFilter, ReplaceCaptureFilter, ReplaceFilter,
    TagFilter, WildcardFilter,
};

/// Re-exports the filter registry.
pub use factory::{
    create_filter, is_supported, register_filter, reset_registry, supported_types,
    unregister_filter, FilterConstructor,
};

/// Re-exports the engine trait, its variants and their options.
pub use engine::{apply_pipeline, EngineKind, EngineOptions, FilterEngine, FilterStats, DEFAULT_BATCH_SIZE};
pub use engines::memory_efficient::MemoryEfficientFilterEngine;
pub use engines::optimized::{ChunkedStream, OptimizedTagFilterEngine};
pub use engines::standard::TagFilterEngine;

/// Re-exports the engine constructors for one-shot use.
pub use headless::{create_engine, create_engine_of_kind, headless_filter_tags};

/// Re-exports configuration documents.
pub use config::{RuleRecord, TagFilterConfig};
