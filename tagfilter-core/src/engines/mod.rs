// tagfilter-core/src/engines/mod.rs
//! Concrete `FilterEngine` implementations.
//!
//! Each variant lives in its own file and composes the shared pipeline from
//! [`crate::engine`]:
//!
//! * `standard` owns the rules and filters and runs the pipeline directly.
//! * `optimized` wraps the standard engine with timing, statistics and
//!   chunked streaming.
//! * `memory_efficient` wraps the standard engine with a lazy per-tag
//!   predicate stream.
//!
//! License: MIT OR APACHE 2.0

pub mod memory_efficient;
pub mod optimized;
pub mod standard;
