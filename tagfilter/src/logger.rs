// tagfilter/src/logger.rs
//! Logger setup for the CLI.
//!
//! `init_logger(Some(level))` forces a level; `init_logger(None)` honours
//! `RUST_LOG` and falls back to `warn`. Calling it more than once is harmless,
//! which lets tests initialise logging freely.
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env};
use log::LevelFilter;

pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    // Already initialised (e.g. by an earlier call in the same test binary).
    let _ = builder.try_init();
}
