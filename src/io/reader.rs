//! Loading input documents.
//!
//! Inputs are opened one at a time in command-line order. The first input
//! that cannot be opened stops the load with
//! [`PdfJoinError::InvalidPath`]; later inputs are not touched. Encrypted
//! inputs are unlocked before they are accepted, which may prompt.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::engine::LopdfEngine;
//! use pdfjoin::io::{DocumentLoader, TerminalPrompter};
//!
//! # fn example() -> pdfjoin::Result<()> {
//! let engine = LopdfEngine::new();
//! let mut prompter = TerminalPrompter::new();
//! let handles = DocumentLoader::new(&engine, &mut prompter).load_documents(["a.pdf", "b.pdf"])?;
//! println!("{} pages in the first file", handles[0].page_count);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::engine::PdfEngine;
use crate::error::{PdfJoinError, Result};
use crate::io::prompt::Prompter;
use crate::io::unlock::UnlockNegotiator;
use crate::utils::normalize_path;

/// An opened, unlocked input document.
#[derive(Debug)]
pub struct DocumentHandle<D> {
    /// The engine's document.
    pub document: D,

    /// Number of pages, read once at load time.
    pub page_count: usize,

    /// Path as supplied by the user.
    pub source_path: PathBuf,
}

/// Turns input paths into [`DocumentHandle`]s.
pub struct DocumentLoader<'a, E, P: ?Sized> {
    engine: &'a E,
    prompter: &'a mut P,
}

impl<'a, E, P> DocumentLoader<'a, E, P>
where
    E: PdfEngine,
    P: Prompter + ?Sized,
{
    /// Create a loader that opens files with `engine` and asks for
    /// passwords through `prompter`.
    pub fn new(engine: &'a E, prompter: &'a mut P) -> Self {
        Self { engine, prompter }
    }

    /// Load a single document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::InvalidPath`] if the path cannot be opened as a
    /// PDF, or [`PdfJoinError::Prompt`] if a password prompt cannot be read.
    pub fn load(&mut self, path: &Path) -> Result<DocumentHandle<E::Document>> {
        let invalid = || PdfJoinError::InvalidPath(path.to_path_buf());

        let resolved = normalize_path(path).map_err(|err| {
            debug!(path = %path.display(), %err, "cannot resolve path");
            invalid()
        })?;

        let mut document = self.engine.open(&resolved).map_err(|err| {
            debug!(path = %resolved.display(), %err, "cannot open document");
            invalid()
        })?;

        UnlockNegotiator::new(&mut *self.prompter).unlock(self.engine, &mut document, path)?;

        let page_count = self.engine.page_count(&document);
        info!(path = %resolved.display(), page_count, "loaded document");

        Ok(DocumentHandle {
            document,
            page_count,
            source_path: path.to_path_buf(),
        })
    }

    /// Load every path in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`DocumentLoader::load`]. No partial result is returned.
    pub fn load_documents<I>(&mut self, paths: I) -> Result<Vec<DocumentHandle<E::Document>>>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let paths = paths.into_iter();
        let mut handles = Vec::with_capacity(paths.size_hint().0);

        for path in paths {
            handles.push(self.load(path.as_ref())?);
        }

        Ok(handles)
    }
}
