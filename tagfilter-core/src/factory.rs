//! factory.rs - Maps rule kinds to filter constructors.
//!
//! The registry is process-wide state guarded by a `RwLock`. It starts out
//! with the six built-in kinds; [`register_filter`] adds or overrides a kind
//! at run time and [`reset_registry`] restores the built-in table.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::{Result, TagFilterError};
use crate::filters::{
    GroupFilter, PlainKeywordFilter, RegexFilter, ReplaceCaptureFilter, ReplaceFilter, TagFilter,
    WildcardFilter,
};
use crate::patterns::PatternCache;
use crate::rules::{AnyFilterRule, FilterType};

/// Builds a filter for a rule, compiling patterns through the given cache.
pub type FilterConstructor =
    Arc<dyn Fn(&AnyFilterRule, &PatternCache) -> Result<Box<dyn TagFilter>> + Send + Sync>;

lazy_static! {
    static ref FILTER_REGISTRY: RwLock<HashMap<FilterType, FilterConstructor>> =
        RwLock::new(builtin_registry());
}

fn constructor<F>(build: fn(&AnyFilterRule, &PatternCache) -> Result<F>) -> FilterConstructor
where
    F: TagFilter + 'static,
{
    Arc::new(move |rule: &AnyFilterRule, cache: &PatternCache| {
        Ok(Box::new(build(rule, cache)?) as Box<dyn TagFilter>)
    })
}

fn builtin_registry() -> HashMap<FilterType, FilterConstructor> {
    let mut registry: HashMap<FilterType, FilterConstructor> = HashMap::new();
    registry.insert(FilterType::PlainKeyword, constructor(PlainKeywordFilter::new));
    registry.insert(FilterType::Wildcard, constructor(WildcardFilter::new));
    registry.insert(FilterType::Regex, constructor(RegexFilter::new));
    registry.insert(FilterType::Group, constructor(GroupFilter::new));
    registry.insert(FilterType::Replace, constructor(ReplaceFilter::new));
    registry.insert(FilterType::ReplaceCapture, constructor(ReplaceCaptureFilter::new));
    registry
}

/// Creates the filter registered for the rule's kind.
///
/// Fails with `UnknownFilterKind` when nothing is registered for it, or with
/// whatever the constructor reports (typically `InvalidPattern`).
pub fn create_filter(rule: &AnyFilterRule, cache: &PatternCache) -> Result<Box<dyn TagFilter>> {
    let constructor = {
        let registry = FILTER_REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
        registry.get(rule.filter_type()).cloned()
    };
    match constructor {
        Some(constructor) => constructor(rule, cache),
        None => Err(TagFilterError::UnknownFilterKind(rule.filter_type().to_string())),
    }
}

/// Registers (or replaces) the constructor for a kind.
pub fn register_filter<F>(filter_type: FilterType, constructor: F)
where
    F: Fn(&AnyFilterRule, &PatternCache) -> Result<Box<dyn TagFilter>> + Send + Sync + 'static,
{
    debug!("Registering filter constructor for '{}'.", filter_type);
    FILTER_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(filter_type, Arc::new(constructor));
}

/// Removes a kind from the registry. Returns whether it was registered.
pub fn unregister_filter(filter_type: &FilterType) -> bool {
    FILTER_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(filter_type)
        .is_some()
}

/// Restores the registry to the six built-in kinds.
pub fn reset_registry() {
    debug!("Resetting filter registry to built-in kinds.");
    *FILTER_REGISTRY.write().unwrap_or_else(PoisonError::into_inner) = builtin_registry();
}

/// All registered kinds, sorted.
pub fn supported_types() -> Vec<FilterType> {
    let mut types: Vec<FilterType> = FILTER_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect();
    types.sort();
    types
}

pub fn is_supported(filter_type: &FilterType) -> bool {
    FILTER_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(filter_type)
}
