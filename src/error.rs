//! Error types for pdfjoin.
//!
//! Every error is fatal to the current run. Incorrect passwords are not
//! errors: they are handled inside the interactive unlock loop and never
//! reach this type.

use std::io;
use std::path::PathBuf;

use crate::cli::USAGE;

/// Result type alias for pdfjoin operations.
pub type Result<T> = std::result::Result<T, PdfJoinError>;

/// Main error type for pdfjoin operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfJoinError {
    /// Fewer than two inputs, or no output path.
    #[error("{}", USAGE)]
    NotEnoughArguments,

    /// An input could not be opened as a PDF.
    #[error("\"{}\" is an invalid file path", .0.display())]
    InvalidPath(PathBuf),

    /// The output could not be created or committed.
    #[error("Unable to write to \"{}\"", .0.display())]
    UnableToWrite(PathBuf),

    /// A page of an input could not be fetched during the merge.
    #[error("Unable to read page {1} of \"{path}\"", path = .0.display())]
    FailedToReadPage(PathBuf, usize),

    /// The output exists and overwriting was forbidden with `--no-clobber`.
    #[error("A file already exists at \"{}\" and --no-clobber was given", .0.display())]
    OutputExists(PathBuf),

    /// Conflicting or malformed options.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The terminal could not be read while prompting.
    #[error("Unable to read from the terminal: {0}")]
    Prompt(#[source] io::Error),
}

impl PdfJoinError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NotEnoughArguments | Self::InvalidConfig(_) => 1,
            Self::InvalidPath(_) => 2,
            Self::FailedToReadPage(..) => 3,
            Self::OutputExists(_) => 4,
            Self::Prompt(err) if err.kind() == io::ErrorKind::Interrupted => 130,
            Self::UnableToWrite(_) | Self::Prompt(_) => 5,
        }
    }
}
