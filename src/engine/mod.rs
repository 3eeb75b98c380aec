//! PDF engine capability.
//!
//! The merge pipeline never touches a PDF library directly. It is written
//! against [`PdfEngine`], which can open a document, report its page count,
//! unlock it with a password, fetch pages, and write pages into an output
//! sink. [`LopdfEngine`] is the production binding.

pub mod lopdf_backend;

pub use lopdf_backend::LopdfEngine;

use std::io;
use std::path::Path;

/// Operations the merge pipeline needs from a PDF library.
pub trait PdfEngine {
    /// An opened input document.
    type Document;

    /// A page fetched from an input document.
    type Page;

    /// A writable output document that accumulates pages.
    type Sink;

    /// Backend-specific error for opening documents and writing pages.
    type Error: std::error::Error;

    /// Open the file at `path` as a PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a PDF.
    fn open(&self, path: &Path) -> Result<Self::Document, Self::Error>;

    /// Whether the document still needs a password before its pages can be read.
    fn is_locked(&self, doc: &Self::Document) -> bool;

    /// Try to unlock the document with `password`. Returns `true` on success.
    ///
    /// A failed attempt leaves the document locked and may be retried. A
    /// document that is not locked is left as it is and reports success.
    fn unlock(&self, doc: &mut Self::Document, password: &str) -> bool;

    /// Number of pages in the document.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Fetch a page by 1-based index, or `None` if it cannot be read.
    fn get_page(&self, doc: &Self::Document, index: usize) -> Option<Self::Page>;

    /// Create an output sink that will be committed to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing can be written at that location.
    fn create_sink(&self, path: &Path) -> io::Result<Self::Sink>;

    /// Append a copy of `page`, with its own dimensions, to the end of the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the page content cannot be copied.
    fn append_page(
        &self,
        sink: &mut Self::Sink,
        doc: &Self::Document,
        page: &Self::Page,
    ) -> Result<(), Self::Error>;

    /// Finalize the sink and commit it as a valid document at its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or moved into place.
    fn close_sink(&self, sink: Self::Sink) -> io::Result<()>;

    /// Drop a sink without committing it, removing anything it staged.
    fn discard_sink(&self, sink: Self::Sink);
}
