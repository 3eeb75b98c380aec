//! Core page-copying loop.
//!
//! [`Merger`] streams every page of every loaded document, in order, into a
//! single output sink. The sink is only committed once the last page has
//! been written; any failure before that discards it, so the output path is
//! either the complete merged document or untouched.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::engine::PdfEngine;
use crate::error::{PdfJoinError, Result};
use crate::io::DocumentHandle;
use crate::output::ProgressState;

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of input documents merged.
    pub files_merged: usize,

    /// Number of pages in the output.
    pub total_pages: usize,

    /// Where the output was written.
    pub output: PathBuf,
}

/// Merges loaded documents through a [`PdfEngine`].
pub struct Merger<'a, E> {
    engine: &'a E,
}

impl<'a, E: PdfEngine> Merger<'a, E> {
    /// Create a merger that writes through `engine`.
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Copy all pages of `handles` into a new document at `output`.
    ///
    /// # Arguments
    ///
    /// * `handles` - Loaded inputs, merged in slice order
    /// * `output` - Destination path, replaced only once every page is copied
    /// * `on_progress` - Called once after every copied page; never called
    ///   when the inputs have no pages at all
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::UnableToWrite`] if the output cannot be
    /// created or committed, and [`PdfJoinError::FailedToReadPage`] for the
    /// first page that cannot be fetched or copied. In both cases nothing is
    /// left at `output` by this call.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::path::Path;
    /// # use pdfjoin::engine::LopdfEngine;
    /// # use pdfjoin::io::{DocumentLoader, TerminalPrompter};
    /// # use pdfjoin::merge::Merger;
    /// # fn example() -> pdfjoin::Result<()> {
    /// let engine = LopdfEngine::new();
    /// let mut prompter = TerminalPrompter::new();
    /// let handles = DocumentLoader::new(&engine, &mut prompter).load_documents(["a.pdf", "b.pdf"])?;
    ///
    /// let summary = Merger::new(&engine).merge(&handles, Path::new("out.pdf"), |_| {})?;
    /// println!("wrote {} pages", summary.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge<F>(
        &self,
        handles: &[DocumentHandle<E::Document>],
        output: &Path,
        mut on_progress: F,
    ) -> Result<MergeSummary>
    where
        F: FnMut(&ProgressState),
    {
        let total_pages = handles.iter().map(|handle| handle.page_count).sum();
        let mut progress = ProgressState::new(total_pages);

        let sink = self.engine.create_sink(output).map_err(|err| {
            warn!(output = %output.display(), %err, "cannot create output");
            PdfJoinError::UnableToWrite(output.to_path_buf())
        })?;
        let mut guard = SinkGuard::new(self.engine, sink);

        for handle in handles {
            debug!(
                source = %handle.source_path.display(),
                pages = handle.page_count,
                "copying document"
            );

            for index in 1..=handle.page_count {
                let failed = || PdfJoinError::FailedToReadPage(handle.source_path.clone(), index);

                let page = self.engine.get_page(&handle.document, index).ok_or_else(|| {
                    warn!(source = %handle.source_path.display(), page = index, "page missing");
                    failed()
                })?;

                guard.append(&handle.document, &page).map_err(|err| {
                    warn!(source = %handle.source_path.display(), page = index, %err, "page not copied");
                    failed()
                })?;

                progress.advance();
                on_progress(&progress);
            }
        }

        guard.commit().map_err(|err| {
            warn!(output = %output.display(), %err, "cannot commit output");
            PdfJoinError::UnableToWrite(output.to_path_buf())
        })?;

        let summary = MergeSummary {
            files_merged: handles.len(),
            total_pages,
            output: output.to_path_buf(),
        };
        info!(
            files = summary.files_merged,
            pages = summary.total_pages,
            output = %summary.output.display(),
            "merge complete"
        );

        Ok(summary)
    }
}

/// Owns an open sink and discards it unless committed.
struct SinkGuard<'a, E: PdfEngine> {
    engine: &'a E,
    sink: Option<E::Sink>,
}

impl<'a, E: PdfEngine> SinkGuard<'a, E> {
    fn new(engine: &'a E, sink: E::Sink) -> Self {
        Self {
            engine,
            sink: Some(sink),
        }
    }

    fn append(&mut self, doc: &E::Document, page: &E::Page) -> std::result::Result<(), E::Error> {
        match self.sink.as_mut() {
            Some(sink) => self.engine.append_page(sink, doc, page),
            None => Ok(()),
        }
    }

    fn commit(mut self) -> std::io::Result<()> {
        match self.sink.take() {
            Some(sink) => self.engine.close_sink(sink),
            None => Ok(()),
        }
    }
}

impl<E: PdfEngine> Drop for SinkGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            debug!("discarding unfinished output");
            self.engine.discard_sink(sink);
        }
    }
}
