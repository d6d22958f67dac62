//! errors.rs - Custom error types for the tagfilter-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `tagfilter-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TagFilterError {
    /// Malformed wildcard, replacement or regex syntax.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The rule kind has no constructor in the filter registry.
    #[error("Unknown filter type: {0}")]
    UnknownFilterKind(String),

    #[error("Unknown engine type: {0}. Expected one of: standard, optimized, memory_efficient")]
    UnknownEngineKind(String),

    /// A rule violates a structural invariant (e.g. a group with no patterns).
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to process JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to process YAML configuration: {0}")]
    YamlError(#[from] serde_yml::Error),
}

impl TagFilterError {
    /// Builds an `InvalidPattern` error from any displayable reason.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        TagFilterError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = TagFilterError> = std::result::Result<T, E>;
