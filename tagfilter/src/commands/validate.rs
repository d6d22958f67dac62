// tagfilter/src/commands/validate.rs
//! The `validate` command: loads a rule file and summarises it.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use tagfilter_core::TagFilterConfig;

use crate::cli::ValidateCommand;
use crate::commands::load_config;

/// What `validate` reports about a rule file that loaded cleanly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub version: String,
    pub rules: usize,
    pub enabled: usize,
    /// Rule count per filter type, in name order.
    pub by_kind: BTreeMap<String, usize>,
}

impl ValidationSummary {
    pub fn from_config(config: &TagFilterConfig) -> Self {
        let mut by_kind = BTreeMap::new();
        for record in &config.rules {
            *by_kind.entry(record.filter_type.as_str().to_string()).or_default() += 1;
        }
        Self {
            version: config.version.clone(),
            rules: config.rules.len(),
            enabled: config.enabled_rules().len(),
            by_kind,
        }
    }

    /// One header line, then one line per rule kind, e.g. `  regex: 2`.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} rules ({} enabled), version {}\n",
            self.rules, self.enabled, self.version
        );
        for (kind, count) in &self.by_kind {
            out.push_str(&format!("  {}: {}\n", kind, count));
        }
        out
    }
}

pub fn run_validate(cmd: &ValidateCommand) -> Result<()> {
    let config = load_config(&cmd.config, cmd.default_priority)?;
    let summary = ValidationSummary::from_config(&config);
    let mut stdout = io::stdout().lock();
    if cmd.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(stdout, "{}: OK", cmd.config.display())?;
        write!(stdout, "{}", summary.to_text())?;
    }
    Ok(())
}
