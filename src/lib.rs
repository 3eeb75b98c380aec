//! pdfjoin - Concatenate PDF files into a single document.
//!
//! Inputs are opened in order, unlocked interactively when they carry a
//! password, and their pages are copied one by one into a new document while
//! a progress bar is drawn. The output is only put in place once every page
//! has been copied.
//!
//! The PDF library sits behind [`engine::PdfEngine`] and the terminal behind
//! [`io::Prompter`], so the whole pipeline can be driven without either.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//! use pdfjoin::config::{Config, OverwriteMode};
//! use pdfjoin::engine::LopdfEngine;
//! use pdfjoin::io::TerminalPrompter;
//! use pdfjoin::output::OutputFormatter;
//!
//! # fn example() -> pdfjoin::Result<()> {
//! let config = Config {
//!     inputs: vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     output: PathBuf::from("/tmp/merged.pdf"),
//!     overwrite_mode: OverwriteMode::Force,
//!     quiet: false,
//!     verbosity: 0,
//! };
//!
//! let outcome = pdfjoin::run(
//!     &config,
//!     &LopdfEngine::new(),
//!     &mut TerminalPrompter::new(),
//!     &OutputFormatter::from_config(&config),
//! )?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod merge;
pub mod output;
pub mod utils;

use tracing::{debug, info};

use crate::config::OverwriteMode;
use crate::engine::PdfEngine;
use crate::io::{DocumentLoader, Prompter, confirm};
use crate::merge::Merger;
use crate::output::OutputFormatter;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfJoinError, Result};
pub use merge::MergeSummary;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Question asked before replacing an existing output.
pub const CONFIRM_OVERWRITE: &str = "Please confirm that you want to proceed";

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The output was written.
    Merged(MergeSummary),
    /// The user chose not to replace the existing output.
    Declined,
}

/// Run one merge described by `config`.
///
/// An existing output is handled according to
/// [`Config::overwrite_mode`]; in prompt mode the user is asked first and a
/// "no" ends the run with [`Outcome::Declined`] before any input is opened.
///
/// # Arguments
///
/// * `config` - Inputs, output and overwrite policy
/// * `engine` - PDF library used to read inputs and write the output
/// * `prompter` - Answers password and overwrite questions
/// * `formatter` - Receives the progress bar and notices
///
/// # Errors
///
/// Returns [`PdfJoinError::OutputExists`] in no-clobber mode, and any
/// error from loading or merging.
pub fn run<E, P>(
    config: &Config,
    engine: &E,
    prompter: &mut P,
    formatter: &OutputFormatter,
) -> Result<Outcome>
where
    E: PdfEngine,
    P: Prompter + ?Sized,
{
    let output = &config.output;

    if output.exists() {
        match config.overwrite_mode {
            OverwriteMode::NoClobber => return Err(PdfJoinError::OutputExists(output.clone())),
            OverwriteMode::Force => info!(output = %output.display(), "replacing existing output"),
            OverwriteMode::Prompt => {
                formatter.notice(&format!("A file already exists at \"{}\"", output.display()));
                if !confirm(prompter, CONFIRM_OVERWRITE).map_err(PdfJoinError::Prompt)? {
                    debug!("overwrite declined");
                    return Ok(Outcome::Declined);
                }
            }
        }
    }

    let handles = DocumentLoader::new(engine, prompter).load_documents(&config.inputs)?;

    let summary = Merger::new(engine).merge(&handles, output, |state| {
        if let Some(line) = state.render() {
            formatter.progress(&line);
        }
    })?;

    if summary.total_pages > 0 {
        formatter.finish_progress();
    }

    Ok(Outcome::Merged(summary))
}
