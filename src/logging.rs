//! Tracing setup
//!
//! Command-line runs log to stderr. The TUI owns the terminal, so it logs to
//! a file in the config directory instead. `FIC_EXPENSES_LOG` overrides the
//! level filter in both cases.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::FicResult;

pub const LOG_ENV_VAR: &str = "FIC_EXPENSES_LOG";

/// Filter for a `-v` count: 0 = warn, 1 = info, 2+ = debug
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log to stderr without timestamps
pub fn init_cli(verbose: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(filter(level_for_verbosity(verbose)))
        .try_init();
}

/// Log to a file, appending across sessions
pub fn init_file(path: &Path, verbose: u8) -> FicResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let level = match verbose {
        0 => "info",
        _ => level_for_verbosity(verbose),
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter(level))
        .try_init();
    Ok(())
}
