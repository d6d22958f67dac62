// tagfilter/src/commands/mod.rs
//! One module per `tagfilter` subcommand.

pub mod filter;
pub mod sample_config;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use tagfilter_core::TagFilterConfig;

/// Loads a rule file and validates every rule in it.
pub(crate) fn load_config(path: &Path, default_priority: u32) -> Result<TagFilterConfig> {
    let config = TagFilterConfig::load_from_file(path, default_priority)
        .with_context(|| format!("Failed to load rules from {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid rules in {}", path.display()))?;
    Ok(config)
}
