//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`. They are separate from the
//! user-facing messages of [`crate::output`] and stay at `warn` unless `-v`
//! is given.

use anyhow::{Context, anyhow};
use tracing::Level;

/// Map the `-v` count to a maximum log level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("failed to install log subscriber")
}
