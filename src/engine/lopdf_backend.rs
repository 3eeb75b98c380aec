//! [`PdfEngine`] binding backed by `lopdf`.
//!
//! Pages are appended to the output by deep-copying the page dictionary and
//! every object it references, with object ids remapped into the output
//! document. Objects shared between pages of one source are copied once.
//!
//! `lopdf` decrypts a document on load when the empty password opens it. When
//! it does not, the loaded document holds nothing but the encryption
//! dictionary, so the objects are parsed again from the file bytes, still
//! encrypted, and kept until a password is accepted.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::xref::XrefEntry;
use lopdf::{Dictionary, Document, Object, ObjectId, Reader, dictionary};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use super::PdfEngine;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Upper bound on page tree depth when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Mode requested for the output file, before the umask.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o666;

/// Errors raised by the lopdf binding.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The file could not be read.
    #[error("failed to read PDF: {0}")]
    Io(#[from] io::Error),

    /// The file could not be parsed.
    #[error("failed to parse PDF: {0}")]
    Parse(#[from] lopdf::Error),

    /// An encrypted document whose catalog could not be recovered.
    #[error("encrypted document has no readable catalog")]
    MissingCatalog,

    /// A page reference does not point at a page dictionary.
    #[error("object {0:?} is not a page dictionary")]
    NotAPage(ObjectId),
}

/// An input document opened with lopdf.
#[derive(Debug)]
pub struct LopdfDocument {
    inner: Document,
    /// Objects of a document the empty password did not open, still encrypted.
    sealed: Option<Document>,
    page_ids: Vec<ObjectId>,
    /// Distinguishes documents inside a sink's object id map.
    key: u64,
}

/// Output document being assembled, staged in a temporary file.
#[derive(Debug)]
pub struct LopdfSink {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    imported: HashMap<(u64, ObjectId), ObjectId>,
    staging: NamedTempFile,
    target: PathBuf,
}

/// The production [`PdfEngine`].
#[derive(Debug, Default)]
pub struct LopdfEngine {
    next_key: Cell<u64>,
}

impl LopdfEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PdfEngine for LopdfEngine {
    type Document = LopdfDocument;
    type Page = ObjectId;
    type Sink = LopdfSink;
    type Error = BackendError;

    fn open(&self, path: &Path) -> Result<LopdfDocument, BackendError> {
        let bytes = std::fs::read(path)?;
        let inner = Document::load_mem(&bytes)?;

        let sealed = if inner.is_encrypted() && inner.encryption_state.is_none() {
            Some(read_sealed(&bytes, &inner)?)
        } else {
            None
        };

        let key = self.next_key.get();
        self.next_key.set(key + 1);

        // get_pages returns a BTreeMap keyed by 1-based page number
        let page_ids = inner.get_pages().into_values().collect();

        debug!(
            path = %path.display(),
            version = %inner.version,
            locked = sealed.is_some(),
            "opened document"
        );

        Ok(LopdfDocument {
            inner,
            sealed,
            page_ids,
            key,
        })
    }

    fn is_locked(&self, doc: &LopdfDocument) -> bool {
        doc.sealed.is_some()
    }

    fn unlock(&self, doc: &mut LopdfDocument, password: &str) -> bool {
        let Some(sealed) = doc.sealed.as_ref() else {
            return true;
        };

        // the sealed copy stays untouched for the next attempt
        let mut candidate = sealed.clone();
        match candidate.decrypt(password) {
            Ok(()) => {
                doc.page_ids = candidate.get_pages().into_values().collect();
                doc.inner = candidate;
                doc.sealed = None;
                true
            }
            Err(err) => {
                trace!(%err, "decryption attempt rejected");
                false
            }
        }
    }

    fn page_count(&self, doc: &LopdfDocument) -> usize {
        doc.page_ids.len()
    }

    fn get_page(&self, doc: &LopdfDocument, index: usize) -> Option<ObjectId> {
        let id = *doc.page_ids.get(index.checked_sub(1)?)?;
        doc.inner.get_dictionary(id).ok().map(|_| id)
    }

    fn create_sink(&self, path: &Path) -> io::Result<LopdfSink> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".pdfjoin-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(OUTPUT_MODE));
        }
        let staging = builder.tempfile_in(dir)?;

        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        debug!(staging = %staging.path().display(), "created output sink");

        Ok(LopdfSink {
            document,
            pages_id,
            kids: Vec::new(),
            imported: HashMap::new(),
            staging,
            target: path.to_path_buf(),
        })
    }

    fn append_page(
        &self,
        sink: &mut LopdfSink,
        doc: &LopdfDocument,
        page: &ObjectId,
    ) -> Result<(), BackendError> {
        let source = &doc.inner;
        let mut page_dict = source
            .get_dictionary(*page)
            .map_err(|_| BackendError::NotAPage(*page))?
            .clone();

        for key in INHERITABLE_KEYS {
            if !page_dict.has(key)
                && let Some(value) = resolve_inherited(source, &page_dict, key)
            {
                page_dict.set(key, value.clone());
            }
        }
        page_dict.remove(b"Parent");

        // Register the page first so annotations pointing back at it resolve to the copy.
        let page_id = sink.document.new_object_id();
        sink.imported.insert((doc.key, *page), page_id);

        let mut copied = sink.import_dictionary(doc.key, source, page_dict);
        copied.set("Parent", sink.pages_id);
        sink.document
            .objects
            .insert(page_id, Object::Dictionary(copied));
        sink.kids.push(page_id.into());

        Ok(())
    }

    fn close_sink(&self, sink: LopdfSink) -> io::Result<()> {
        let LopdfSink {
            mut document,
            pages_id,
            kids,
            staging,
            target,
            ..
        } = sink;

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        };
        document.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        {
            let mut writer = BufWriter::new(staging.as_file());
            document.save_to(&mut writer).map_err(io::Error::other)?;
            writer.flush()?;
        }

        staging.persist(&target).map_err(|err| err.error)?;
        debug!(output = %target.display(), pages = count, "committed output");

        Ok(())
    }

    fn discard_sink(&self, sink: LopdfSink) {
        debug!(staging = %sink.staging.path().display(), "discarding output sink");
        // NamedTempFile removes the staged file on drop
        drop(sink);
    }
}

impl LopdfSink {
    fn import_dictionary(&mut self, key: u64, source: &Document, mut dict: Dictionary) -> Dictionary {
        for (_, value) in dict.iter_mut() {
            let original = std::mem::replace(value, Object::Null);
            *value = self.import_value(key, source, original);
        }
        dict
    }

    fn import_value(&mut self, key: u64, source: &Document, object: Object) -> Object {
        match object {
            Object::Reference(id) => self.import_reference(key, source, id),
            Object::Array(items) => Object::Array(
                items
                    .into_iter()
                    .map(|item| self.import_value(key, source, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dictionary(key, source, dict)),
            Object::Stream(mut stream) => {
                stream.dict = self.import_dictionary(key, source, stream.dict);
                Object::Stream(stream)
            }
            other => other,
        }
    }

    fn import_reference(&mut self, key: u64, source: &Document, id: ObjectId) -> Object {
        if let Some(&mapped) = self.imported.get(&(key, id)) {
            return Object::Reference(mapped);
        }

        let Ok(object) = source.get_object(id) else {
            return Object::Null;
        };

        // Links to pages not copied yet would drag in the whole source page tree.
        if is_page_tree_node(object) {
            return Object::Null;
        }

        let mapped = self.document.new_object_id();
        self.imported.insert((key, id), mapped);

        let copied = self.import_value(key, source, object.clone());
        self.document.objects.insert(mapped, copied);

        Object::Reference(mapped)
    }
}

/// Parse every object of an encrypted file without decrypting it.
///
/// `stub` is what `lopdf` loaded from `bytes`; its cross-reference table and
/// trailer locate the objects.
fn read_sealed(bytes: &[u8], stub: &Document) -> Result<Document, BackendError> {
    let mut reader = Reader {
        buffer: bytes,
        document: Document::new(),
        encryption_state: None,
        raw_objects: BTreeMap::new(),
    };
    reader.document.reference_table = stub.reference_table.clone();

    let mut sealed = stub.clone();
    for (&number, entry) in &stub.reference_table.entries {
        let XrefEntry::Normal { generation, .. } = *entry else {
            continue;
        };
        let id = (number, generation);
        match reader.get_object(id, &mut HashSet::new()) {
            Ok(object) => {
                sealed.objects.insert(id, object);
            }
            Err(err) => trace!(?id, %err, "skipping unreadable object"),
        }
    }

    let root = sealed.trailer.get(b"Root").and_then(Object::as_reference)?;
    if !sealed.objects.contains_key(&root) {
        return Err(BackendError::MissingCatalog);
    }

    Ok(sealed)
}

fn is_page_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}

/// Look up `key` on the ancestors of a page, nearest first.
fn resolve_inherited<'a>(doc: &'a Document, page: &Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }

    None
}
