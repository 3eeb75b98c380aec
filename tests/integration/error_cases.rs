//! Integration tests for failure paths.

use std::fs;

use pdfjoin::PdfJoinError;
use pdfjoin::config::OverwriteMode;
use pdfjoin::engine::LopdfEngine;
use pdfjoin::output::OutputFormatter;
use pdfjoin::run;

use crate::common::{CannedAnswers, LETTER, Workspace, config};

fn run_quiet(config: &pdfjoin::Config) -> pdfjoin::Result<pdfjoin::Outcome> {
    run(
        config,
        &LopdfEngine::new(),
        &mut CannedAnswers::default(),
        &OutputFormatter::quiet(),
    )
}

#[test]
fn test_missing_input_is_invalid_path() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let missing = ws.path("missing.pdf");

    let err = run_quiet(&config(&[a, missing.clone()], &ws.path("out.pdf"))).unwrap_err();

    match err {
        PdfJoinError::InvalidPath(path) => assert_eq!(path, missing),
        other => panic!("expected InvalidPath, got {other:?}"),
    }
    assert!(!ws.path("out.pdf").exists());
}

#[test]
fn test_non_pdf_input_is_invalid_path() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let notes = ws.path("notes.pdf");
    fs::write(&notes, "not a pdf").unwrap();

    let err = run_quiet(&config(&[notes, a], &ws.path("out.pdf"))).unwrap_err();

    assert!(matches!(err, PdfJoinError::InvalidPath(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_unwritable_output_directory() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let b = ws.pdf("b.pdf", &[LETTER]);
    let output = ws.path("no_such_dir").join("out.pdf");

    let err = run_quiet(&config(&[a, b], &output)).unwrap_err();

    match err {
        PdfJoinError::UnableToWrite(path) => assert_eq!(path, output),
        other => panic!("expected UnableToWrite, got {other:?}"),
    }
}

#[test]
fn test_no_clobber_keeps_existing_output() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let b = ws.pdf("b.pdf", &[LETTER]);
    let output = ws.path("out.pdf");
    fs::write(&output, b"keep").unwrap();

    let mut config = config(&[a, b], &output);
    config.overwrite_mode = OverwriteMode::NoClobber;
    let err = run_quiet(&config).unwrap_err();

    assert!(matches!(err, PdfJoinError::OutputExists(_)));
    assert_eq!(fs::read(&output).unwrap(), b"keep");
}
