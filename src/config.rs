//! Configuration module for pdfjoin.
//!
//! Turns parsed CLI arguments into a validated configuration that drives a
//! merge run: the ordered inputs, the normalized output path, and how an
//! existing output file is treated.

use std::path::PathBuf;

use crate::error::{PdfJoinError, Result};

/// Minimum number of input documents for a merge.
pub const MIN_INPUTS: usize = 2;

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF paths, as supplied, in merge order.
    pub inputs: Vec<PathBuf>,

    /// Output PDF path, normalized.
    pub output: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Suppress progress and informational output.
    pub quiet: bool,

    /// Diagnostic verbosity (0 = warnings only).
    pub verbosity: u8,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::NotEnoughArguments`] with fewer than two inputs,
    /// and [`PdfJoinError::InvalidConfig`] when quiet and verbose are combined.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.len() < MIN_INPUTS {
            return Err(PdfJoinError::NotEnoughArguments);
        }

        if self.quiet && self.verbosity > 0 {
            return Err(PdfJoinError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        Ok(())
    }
}
