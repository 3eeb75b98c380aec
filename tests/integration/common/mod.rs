//! Shared helpers for the integration tests.
//!
//! Fixtures are generated with `lopdf` into a temporary directory, so the
//! tests carry no binary files.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, Stream,
    StringFormat, dictionary,
};
use pdfjoin::config::{Config, OverwriteMode};
use pdfjoin::io::Prompter;
use tempfile::TempDir;

/// US Letter in points.
pub const LETTER: (i64, i64) = (612, 792);

/// A4 in points.
pub const A4: (i64, i64) = (595, 842);

/// Scratch directory holding generated fixtures.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a PDF with one page per entry in `sizes` and return its path.
    pub fn pdf(&self, name: &str, sizes: &[(i64, i64)]) -> PathBuf {
        let path = self.path(name);
        build_pdf(name, sizes)
            .save(&path)
            .expect("Failed to write fixture");
        path
    }

    /// Like [`Workspace::pdf`], but readable only with `password`.
    pub fn encrypted_pdf(&self, name: &str, sizes: &[(i64, i64)], password: &str) -> PathBuf {
        let path = self.path(name);
        let mut doc = build_pdf(name, sizes);
        doc.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(b"pdfjoin-fixture-".to_vec(), StringFormat::Literal),
                Object::String(b"pdfjoin-fixture-".to_vec(), StringFormat::Literal),
            ]),
        );
        let state = EncryptionState::try_from(EncryptionVersion::V2 {
            document: &doc,
            owner_password: "owner",
            user_password: password,
            key_length: 128,
            permissions: Permissions::all(),
        })
        .expect("Failed to derive encryption key");
        doc.encrypt(&state).expect("Failed to encrypt fixture");
        doc.save(&path).expect("Failed to write fixture");
        path
    }

    /// Names of all files in the workspace.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .expect("Failed to list temp dir")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn build_pdf(label: &str, sizes: &[(i64, i64)]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = sizes
        .iter()
        .enumerate()
        .map(|(idx, &(w, h))| {
            let text = format!("BT /F1 10 Tf 36 36 Td ({label} {}) Tj ET", idx + 1);
            let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => sizes.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Page sizes of the PDF at `path`, in page order.
pub fn page_sizes(path: &Path) -> Vec<(i64, i64)> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .into_values()
        .map(|id| media_box(&doc, id))
        .collect()
}

/// Text drawn on each page of the PDF at `path`, in page order.
pub fn page_texts(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .into_values()
        .map(|id| {
            let content = doc.get_page_content(id).expect("page has no content");
            String::from_utf8(content).expect("content is not UTF-8")
        })
        .collect()
}

fn media_box(doc: &Document, page: ObjectId) -> (i64, i64) {
    let values: Vec<i64> = doc
        .get_dictionary(page)
        .and_then(|dict| dict.get(b"MediaBox"))
        .and_then(Object::as_array)
        .expect("page has no MediaBox")
        .iter()
        .map(|v| v.as_i64().expect("non-integer MediaBox entry"))
        .collect();
    (values[2] - values[0], values[3] - values[1])
}

/// Quiet config that overwrites without asking.
pub fn config(inputs: &[PathBuf], output: &Path) -> Config {
    Config {
        inputs: inputs.to_vec(),
        output: output.to_path_buf(),
        overwrite_mode: OverwriteMode::Force,
        quiet: true,
        verbosity: 0,
    }
}

/// Prompter that answers from a fixed list.
#[derive(Default)]
pub struct CannedAnswers {
    answers: VecDeque<String>,
    pub asked: usize,
}

impl CannedAnswers {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: 0,
        }
    }
}

impl Prompter for CannedAnswers {
    fn ask_secret(&mut self, _prompt: &str) -> io::Result<String> {
        self.asked += 1;
        self.answers
            .pop_front()
            .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
    }

    fn ask_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        self.asked += 1;
        Ok(self.answers.pop_front())
    }

    fn complain(&mut self, _message: &str) {}
}
