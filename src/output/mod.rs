//! Output formatting and display for pdfjoin.
//!
//! This module handles all user-facing output:
//! - Informational and error messages ([`formatter`])
//! - The page progress bar ([`progress`])

pub mod formatter;
pub mod progress;

pub use formatter::OutputFormatter;
pub use progress::{ProgressState, render};
