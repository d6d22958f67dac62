// tagfilter/src/lib.rs
//! # Tagfilter CLI Application
//!
//! This crate provides the command-line interface for the `tagfilter-core`
//! engine: argument parsing, logging setup and one module per subcommand.

pub mod cli;
pub mod commands;
pub mod logger;
