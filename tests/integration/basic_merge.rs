//! Integration tests for merging real PDF files.

use pdfjoin::engine::LopdfEngine;
use pdfjoin::output::OutputFormatter;
use pdfjoin::{Outcome, run};
use rstest::rstest;

use crate::common::{A4, CannedAnswers, LETTER, Workspace, config, page_sizes, page_texts};

fn merge(ws: &Workspace, inputs: &[std::path::PathBuf], output: &str) -> pdfjoin::MergeSummary {
    let output = ws.path(output);
    let outcome = run(
        &config(inputs, &output),
        &LopdfEngine::new(),
        &mut CannedAnswers::default(),
        &OutputFormatter::quiet(),
    )
    .expect("merge failed");

    match outcome {
        Outcome::Merged(summary) => summary,
        Outcome::Declined => panic!("merge was declined"),
    }
}

#[test]
fn test_merge_two_documents() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER, LETTER]);
    let b = ws.pdf("b.pdf", &[A4, A4, A4]);

    let summary = merge(&ws, &[a, b], "out.pdf");

    assert_eq!(summary.files_merged, 2);
    assert_eq!(summary.total_pages, 5);
    assert_eq!(
        page_sizes(&ws.path("out.pdf")),
        vec![LETTER, LETTER, A4, A4, A4]
    );
}

#[rstest]
#[case(&[1, 1])]
#[case(&[3, 1, 2])]
#[case(&[0, 4])]
fn test_page_count_is_sum_of_inputs(#[case] counts: &[usize]) {
    let ws = Workspace::new();
    let inputs: Vec<_> = counts
        .iter()
        .enumerate()
        .map(|(idx, &n)| ws.pdf(&format!("in{idx}.pdf"), &vec![LETTER; n]))
        .collect();

    let summary = merge(&ws, &inputs, "out.pdf");

    let expected: usize = counts.iter().sum();
    assert_eq!(summary.total_pages, expected);
    assert_eq!(page_sizes(&ws.path("out.pdf")).len(), expected);
}

#[test]
fn test_same_input_twice_doubles_pages() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER, A4, (300, 500)]);

    merge(&ws, &[a.clone(), a], "out.pdf");

    assert_eq!(
        page_sizes(&ws.path("out.pdf")),
        vec![LETTER, A4, (300, 500), LETTER, A4, (300, 500)]
    );
}

#[test]
fn test_merge_is_associative() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let b = ws.pdf("b.pdf", &[A4, A4]);
    let c = ws.pdf("c.pdf", &[(200, 300)]);

    merge(&ws, &[a.clone(), b.clone()], "ab.pdf");
    merge(&ws, &[ws.path("ab.pdf"), c.clone()], "ab_c.pdf");
    merge(&ws, &[a, b, c], "abc.pdf");

    assert_eq!(page_sizes(&ws.path("ab_c.pdf")), page_sizes(&ws.path("abc.pdf")));
}

#[test]
fn test_existing_output_replaced_when_confirmed() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let b = ws.pdf("b.pdf", &[A4]);
    let output = ws.path("out.pdf");
    std::fs::write(&output, b"stale").unwrap();

    let mut config = config(&[a, b], &output);
    config.overwrite_mode = pdfjoin::config::OverwriteMode::Prompt;
    let mut prompter = CannedAnswers::new(&["y"]);

    let outcome = run(
        &config,
        &LopdfEngine::new(),
        &mut prompter,
        &OutputFormatter::quiet(),
    )
    .unwrap();

    assert!(matches!(outcome, Outcome::Merged(_)));
    assert_eq!(prompter.asked, 1);
    assert_eq!(page_sizes(&output), vec![LETTER, A4]);
    // staging file is gone
    assert_eq!(ws.entries(), vec!["a.pdf", "b.pdf", "out.pdf"]);
}

#[test]
fn test_password_protected_input_merges_after_retry() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", &[LETTER]);
    let b = ws.encrypted_pdf("b.pdf", &[A4, A4], "secret");
    let output = ws.path("out.pdf");
    let mut prompter = CannedAnswers::new(&["guess", "secret"]);

    let outcome = run(
        &config(&[a, b], &output),
        &LopdfEngine::new(),
        &mut prompter,
        &OutputFormatter::quiet(),
    )
    .unwrap();

    let Outcome::Merged(summary) = outcome else {
        panic!("merge was declined");
    };
    assert_eq!(prompter.asked, 2);
    assert_eq!(summary.total_pages, 3);
    assert_eq!(page_sizes(&output), vec![LETTER, A4, A4]);
    assert_eq!(
        page_texts(&output),
        vec![
            "BT /F1 10 Tf 36 36 Td (a.pdf 1) Tj ET",
            "BT /F1 10 Tf 36 36 Td (b.pdf 1) Tj ET",
            "BT /F1 10 Tf 36 36 Td (b.pdf 2) Tj ET",
        ]
    );
}

#[test]
fn test_owner_only_encryption_needs_no_password() {
    let ws = Workspace::new();
    let a = ws.encrypted_pdf("a.pdf", &[LETTER, A4], "");
    let output = ws.path("out.pdf");
    let mut prompter = CannedAnswers::default();

    run(
        &config(&[a], &output),
        &LopdfEngine::new(),
        &mut prompter,
        &OutputFormatter::quiet(),
    )
    .unwrap();

    assert_eq!(prompter.asked, 0);
    assert_eq!(
        page_texts(&output),
        vec![
            "BT /F1 10 Tf 36 36 Td (a.pdf 1) Tj ET",
            "BT /F1 10 Tf 36 36 Td (a.pdf 2) Tj ET",
        ]
    );
}
