//! cache.rs - Compilation and caching of regular expressions.
//!
//! Every filter that carries a regex-bearing pattern obtains its compiled
//! `Regex` through a [`PatternCache`]. The cache is keyed by the pattern text
//! and its [`PatternFlags`], holds at most `capacity` entries and evicts the
//! least recently used entry once full.
//!
//! A `PatternCache` is a cheap, cloneable handle: clones share the same
//! underlying storage, which is guarded by a mutex so that concurrent engines
//! never corrupt it. [`PatternCache::global`] returns the process-wide default
//! instance; engines accept any cache through their options so tests and
//! isolated pipelines can use their own.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::{Result, TagFilterError};

/// Default number of compiled patterns retained by a cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Upper bound on the size of a single compiled regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Options that change how a pattern is compiled. Part of the cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PatternFlags {
    pub case_insensitive: bool,
}

impl PatternFlags {
    pub const NONE: PatternFlags = PatternFlags { case_insensitive: false };
    pub const IGNORE_CASE: PatternFlags = PatternFlags { case_insensitive: true };
}

type CacheKey = (String, PatternFlags);

#[derive(Debug)]
struct CacheEntry {
    regex: Regex,
    last_used: u64,
}

#[derive(Debug, Default)]
struct LruState {
    entries: HashMap<CacheKey, CacheEntry>,
    clock: u64,
}

impl LruState {
    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!("Evicting pattern '{}' from cache.", key.0);
            self.entries.remove(&key);
        }
    }
}

/// A size-bounded LRU cache of compiled regular expressions.
#[derive(Debug, Clone)]
pub struct PatternCache {
    capacity: usize,
    state: Arc<Mutex<LruState>>,
}

lazy_static! {
    /// The process-wide cache shared by engines built with default options.
    static ref GLOBAL_PATTERN_CACHE: PatternCache = PatternCache::new(DEFAULT_CACHE_CAPACITY);
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PatternCache {
    /// Creates an empty, independent cache. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Arc::new(Mutex::new(LruState::default())),
        }
    }

    /// Returns a handle to the process-wide cache.
    pub fn global() -> PatternCache {
        GLOBAL_PATTERN_CACHE.clone()
    }

    fn lock(&self) -> MutexGuard<'_, LruState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the compiled form of `pattern`, compiling and caching it on a miss.
    ///
    /// Compilation happens outside the lock; if two callers race on the same
    /// key the second insert simply replaces the first with an equivalent regex.
    pub fn get_compiled_pattern(&self, pattern: &str, flags: PatternFlags) -> Result<Regex> {
        let key: CacheKey = (pattern.to_string(), flags);

        {
            let mut state = self.lock();
            let tick = state.next_tick();
            if let Some(entry) = state.entries.get_mut(&key) {
                entry.last_used = tick;
                return Ok(entry.regex.clone());
            }
        }

        debug!("Compiling pattern '{}' ({:?}).", pattern, flags);
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| TagFilterError::invalid_pattern(pattern, e))?;

        let mut state = self.lock();
        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            state.evict_least_recently_used();
        }
        let tick = state.next_tick();
        state.entries.insert(
            key,
            CacheEntry {
                regex: regex.clone(),
                last_used: tick,
            },
        );
        Ok(regex)
    }

    /// Whether the pattern is currently cached. Does not count as a use.
    pub fn contains(&self, pattern: &str, flags: PatternFlags) -> bool {
        self.lock().entries.contains_key(&(pattern.to_string(), flags))
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every cached pattern.
    pub fn clear(&self) {
        let mut state = self.lock();
        debug!("Clearing pattern cache ({} entries).", state.entries.len());
        state.entries.clear();
    }
}
