// tagfilter/src/cli.rs
//! This file defines the command-line interface (CLI) for the tagfilter
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tagfilter_core::{EngineKind, DEFAULT_BATCH_SIZE};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "tagfilter",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Filter and rewrite metadata tags with configurable rules",
    long_about = "Tagfilter removes and rewrites comma-separated metadata tags using a rule file of keywords, wildcards, regular expressions, tag groups and replacements.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `tagfilter` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filters tags from arguments, a file or stdin.
    #[command(about = "Filters tags from arguments, a file or stdin.")]
    Filter(FilterCommand),

    /// Loads a rule file and reports whether every rule is valid.
    #[command(about = "Loads a rule file and reports whether every rule is valid.")]
    Validate(ValidateCommand),

    /// Writes a sample rule file.
    #[command(about = "Writes a sample rule file (JSON or YAML, by extension).")]
    SampleConfig(SampleConfigCommand),
}

/// Engine variants selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineChoice {
    Standard,
    Optimized,
    MemoryEfficient,
}

impl From<EngineChoice> for EngineKind {
    fn from(choice: EngineChoice) -> Self {
        match choice {
            EngineChoice::Standard => EngineKind::Standard,
            EngineChoice::Optimized => EngineKind::Optimized,
            EngineChoice::MemoryEfficient => EngineKind::MemoryEfficient,
        }
    }
}

/// Arguments for the `filter` command.
#[derive(Parser, Debug)]
pub struct FilterCommand {
    /// Rule file (.json, .yaml, .yml or .txt).
    #[arg(long, short = 'c', value_name = "FILE", help = "Rule file (.json, .yaml, .yml or .txt).")]
    pub config: PathBuf,

    /// Select which filtering engine to use.
    #[arg(long, short = 'e', value_enum, default_value = "standard", help = "Select a filtering engine.")]
    pub engine: EngineChoice,

    /// Chunk size used when streaming with the optimized engine.
    #[arg(long = "batch-size", value_name = "N", default_value_t = DEFAULT_BATCH_SIZE, help = "Chunk size for streaming with the optimized engine.")]
    pub batch_size: usize,

    /// Priority given to rules read from a .txt rule file.
    #[arg(long = "default-priority", value_name = "N", default_value_t = 0, help = "Priority given to rules read from a .txt rule file.")]
    pub default_priority: u32,

    /// Path to an input file (reads from stdin if neither tags nor a file are given).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read tags from a file instead of stdin.")]
    pub input: Option<PathBuf>,

    /// Separator between tags in the input. Newlines always separate tags.
    #[arg(long, short = 's', value_name = "SEP", default_value = ",", help = "Separator between input tags (newlines always separate).")]
    pub separator: String,

    /// Feed tags through the engine's streaming mode.
    #[arg(long, help = "Process tags through the engine's streaming mode.")]
    pub stream: bool,

    /// Print engine statistics as JSON on stderr.
    #[arg(long, help = "Print engine statistics as JSON on stderr (optimized engine).")]
    pub stats: bool,

    /// Tags to filter. Each argument may itself hold separated tags.
    #[arg(value_name = "TAGS")]
    pub tags: Vec<String>,
}

/// Arguments for the `validate` command.
#[derive(Parser, Debug)]
pub struct ValidateCommand {
    /// Rule file to validate.
    #[arg(long, short = 'c', value_name = "FILE", help = "Rule file to validate.")]
    pub config: PathBuf,

    #[arg(long = "default-priority", value_name = "N", default_value_t = 0, help = "Priority given to rules read from a .txt rule file.")]
    pub default_priority: u32,

    /// Print the summary as JSON.
    #[arg(long, help = "Print the summary as JSON.")]
    pub json: bool,
}

/// Arguments for the `sample-config` command.
#[derive(Parser, Debug)]
pub struct SampleConfigCommand {
    /// Destination file (.json, .yaml or .yml).
    #[arg(long, short = 'o', value_name = "FILE", help = "Destination file (.json, .yaml or .yml).")]
    pub output: PathBuf,
}
