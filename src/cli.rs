//! CLI argument parsing for pdfjoin.
//!
//! All positional arguments but the last are inputs; the last one is the
//! output. A first argument of `usage`, `help`, `-h` or `--help` prints the
//! one-line usage and nothing else, so those forms are caught before `clap`
//! sees the arguments.
//!
//! # Examples
//!
//! ```
//! use pdfjoin::cli::{Invocation, parse_args};
//!
//! let Invocation::Merge(cli) = parse_args(["pdfjoin", "a.pdf", "b.pdf", "out.pdf"]).unwrap() else {
//!     unreachable!();
//! };
//! let config = cli.to_config().unwrap();
//! assert_eq!(config.inputs.len(), 2);
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{Config, OverwriteMode};
use crate::error::{PdfJoinError, Result};
use crate::utils::normalize_path;

/// One-line usage text.
pub const USAGE: &str = "usage: pdfjoin file1 file2 ... output_file";

/// First arguments that ask for the usage text.
pub const HELP_FORMS: [&str; 4] = ["usage", "help", "-h", "--help"];

/// Concatenate PDF files into a single document.
#[derive(Parser, Debug)]
#[command(name = "pdfjoin")]
#[command(version)]
#[command(about = "Concatenate PDF files into a single document", long_about = None)]
#[command(override_usage = "pdfjoin [OPTIONS] <FILE> <FILE> [FILE...] <OUTPUT>")]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Input PDF files in merge order, followed by the output path
    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress the progress bar and informational output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print diagnostics to stderr (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    /// Print [`USAGE`] and exit successfully.
    Usage,
    /// Run a merge.
    Merge(Cli),
}

/// Parse a full argument list, program name included.
///
/// # Errors
///
/// Returns the `clap` error for unknown or conflicting options. `--version`
/// is also reported through `clap` as an error of kind `DisplayVersion`.
pub fn parse_args<I, T>(args: I) -> std::result::Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let wants_usage = args
        .get(1)
        .and_then(|arg| arg.to_str())
        .is_some_and(|arg| HELP_FORMS.contains(&arg));
    if wants_usage {
        return Ok(Invocation::Usage);
    }

    Cli::try_parse_from(args).map(Invocation::Merge)
}

impl Cli {
    /// Resolve the overwrite mode from the flags.
    pub fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }

    /// Convert CLI arguments into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::NotEnoughArguments`] with fewer than two
    /// inputs plus an output, [`PdfJoinError::InvalidConfig`] for conflicting
    /// flags, and [`PdfJoinError::UnableToWrite`] if the output path cannot
    /// be resolved.
    pub fn to_config(&self) -> Result<Config> {
        let Some((output, inputs)) = self.paths.split_last() else {
            return Err(PdfJoinError::NotEnoughArguments);
        };

        let mut config = Config {
            inputs: inputs.to_vec(),
            output: output.clone(),
            overwrite_mode: self.overwrite_mode(),
            quiet: self.quiet,
            verbosity: self.verbose,
        };
        config.validate()?;

        config.output = normalize_path(output)
            .map_err(|_| PdfJoinError::UnableToWrite(output.clone()))?;

        Ok(config)
    }
}
