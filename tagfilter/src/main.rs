// tagfilter/src/main.rs
//! Tagfilter entry point.
//!
//! Parses arguments, initialises logging and dispatches to the subcommand.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use tagfilter::cli::{Cli, Commands};
use tagfilter::commands::{filter, sample_config, validate};
use tagfilter::logger;

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    match &args.command {
        Commands::Filter(cmd) => filter::run_filter(cmd),
        Commands::Validate(cmd) => validate::run_validate(cmd),
        Commands::SampleConfig(cmd) => sample_config::run_sample_config(cmd),
    }
}
