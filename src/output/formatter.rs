//! Message formatting and display.
//!
//! The progress line goes to stdout and is suppressed in quiet mode. Notices
//! that belong to a question go to stdout regardless, and errors always go
//! to stderr.
//!
//! # Examples
//!
//! ```
//! use pdfjoin::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false);
//! formatter.progress("[=====     ] 50%");
//! formatter.finish_progress();
//! formatter.error("Something went wrong");
//! ```

use std::io::{self, Write};

use crate::config::Config;

/// Output formatter with a quiet switch.
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet)
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true)
    }

    /// Print a line to stdout that belongs to an interactive question.
    /// Shown even in quiet mode.
    pub fn notice(&self, message: &str) {
        println!("{message}");
    }

    /// Print an error line to stderr. Always displayed.
    pub fn error(&self, message: &str) {
        eprintln!("{message}");
    }

    /// Write a progress line without a trailing newline, so the next call
    /// overwrites it. Suppressed in quiet mode.
    pub fn progress(&self, line: &str) {
        if self.quiet {
            return;
        }
        let mut stdout = io::stdout().lock();
        // progress is best effort; a closed stdout must not abort the merge
        let _ = stdout.write_all(line.as_bytes()).and_then(|()| stdout.flush());
    }

    /// Terminate the progress line. Suppressed in quiet mode.
    pub fn finish_progress(&self) {
        if !self.quiet {
            println!();
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}
