// tagfilter/src/commands/sample_config.rs
//! The `sample-config` command.

use anyhow::{Context, Result};
use log::info;

use tagfilter_core::TagFilterConfig;

use crate::cli::SampleConfigCommand;

pub fn run_sample_config(cmd: &SampleConfigCommand) -> Result<()> {
    TagFilterConfig::sample()
        .save_to_file(&cmd.output)
        .with_context(|| format!("Failed to write sample configuration to {}", cmd.output.display()))?;
    info!("Sample configuration written to {}.", cmd.output.display());
    eprintln!("Sample configuration written to {}", cmd.output.display());
    Ok(())
}
