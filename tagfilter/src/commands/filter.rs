// tagfilter/src/commands/filter.rs
//! The `filter` command: reads tags, runs them through an engine and prints
//! the survivors joined with `", "`.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Read, Write};

use tagfilter_core::{create_engine_of_kind, EngineKind, EngineOptions, FilterEngine};

use crate::cli::FilterCommand;
use crate::commands::load_config;

/// Separator used between tags on output.
pub const OUTPUT_SEPARATOR: &str = ", ";

/// Splits raw input into trimmed, non-empty tags.
///
/// Newlines always separate tags; `separator` splits within a line. An
/// empty separator treats each line as one tag.
pub fn split_tags(text: &str, separator: &str) -> Vec<String> {
    let pieces: Vec<&str> = if separator.is_empty() {
        text.lines().collect()
    } else {
        text.lines().flat_map(|line| line.split(separator)).collect()
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_tags(cmd: &FilterCommand) -> Result<Vec<String>> {
    if !cmd.tags.is_empty() {
        return Ok(cmd
            .tags
            .iter()
            .flat_map(|arg| split_tags(arg, &cmd.separator))
            .collect());
    }
    let text = match &cmd.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read tags from stdin")?;
            buffer
        }
    };
    Ok(split_tags(&text, &cmd.separator))
}

/// Runs the tags through the engine, in streaming mode when requested.
pub fn filter_with(engine: &dyn FilterEngine, tags: Vec<String>, stream: bool) -> Vec<String> {
    if stream {
        engine.filter_stream(Box::new(tags.into_iter())).collect()
    } else {
        engine.filter_tags(&tags)
    }
}

pub fn run_filter(cmd: &FilterCommand) -> Result<()> {
    let config = load_config(&cmd.config, cmd.default_priority)?;
    let rules = config.to_filter_rules()?;
    let kind = EngineKind::from(cmd.engine);
    info!("Loaded {} rules; using the {} engine.", rules.len(), kind);

    let options = EngineOptions::default().with_batch_size(cmd.batch_size);
    let engine = create_engine_of_kind(rules, kind, options)
        .with_context(|| format!("Failed to build the {} engine", kind))?;

    let tags = read_tags(cmd)?;
    debug!("Read {} input tags.", tags.len());
    let filtered = filter_with(engine.as_ref(), tags, cmd.stream);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", filtered.join(OUTPUT_SEPARATOR)).context("Failed to write output")?;

    if cmd.stats {
        match engine.performance_stats() {
            Some(stats) => {
                let json = serde_json::to_string_pretty(&stats)?;
                eprintln!("{}", json);
            }
            None => warn!("Statistics are only collected by the optimized engine."),
        }
    }
    Ok(())
}
