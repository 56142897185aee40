//! End-to-end pipeline tests: configuration validation, cancellation,
//! batch isolation, and full reconstruction of a small document.

mod common;

use common::{hline, multiline_at, page_with, text_at, vline};
use strata_core::{
    CancelToken, CellGridRegion, DocumentInput, Node, Pipeline, PipelineConfig, StructError,
};

fn small_document(name: &str) -> DocumentInput {
    DocumentInput {
        name: name.to_string(),
        pages: vec![page_with(
            1,
            200.0,
            200.0,
            vec![
                text_at("1. Scope", 25.0, 150.0, "Helvetica-Bold", 14.0),
                multiline_at(
                    &["The works described", "herein shall apply."],
                    25.0,
                    130.0,
                    "Helvetica",
                    10.0,
                ),
                multiline_at(
                    &["Additional provisions", "follow in annexes."],
                    25.0,
                    90.0,
                    "Helvetica",
                    10.0,
                ),
            ],
        )],
        cell_grids: Vec::new(),
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn overlapping_margins_are_rejected_at_construction() {
    let mut config = PipelineConfig::default();
    config.headers.margins = [0.6, 0.2, 0.6, 0.2];
    let err = Pipeline::new(config).unwrap_err();
    assert!(matches!(err, StructError::Config(_)));
}

#[test]
fn out_of_range_ratio_is_rejected() {
    let mut config = PipelineConfig::default();
    config.paragraphs.one_liner_ratio = 1.4;
    assert!(Pipeline::new(config).is_err());
}

#[test]
fn default_config_is_valid() {
    assert!(Pipeline::new(PipelineConfig::default()).is_ok());
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn cancellation_is_honored_between_stages() {
    let pipeline = Pipeline::with_defaults();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = pipeline
        .run_document(&small_document("doc"), &cancel)
        .unwrap_err();
    assert!(matches!(err, StructError::Cancelled));
}

// ============================================================================
// Reconstruction
// ============================================================================

#[test]
fn reconstructs_title_and_paragraphs() {
    let pipeline = Pipeline::with_defaults();
    let document = pipeline
        .run_document(&small_document("works"), &CancelToken::new())
        .unwrap();

    assert_eq!(document.name, "works");
    assert_eq!(document.content.len(), 3);
    assert!(matches!(
        &document.content[0],
        Node::Title { level: 0, text, .. } if text == "1. Scope"
    ));
    assert!(matches!(&document.content[1], Node::Paragraph { .. }));
    assert!(matches!(&document.content[2], Node::Paragraph { .. }));
}

/// Shared input is cloned defensively: the caller's pages are unchanged
/// after a run.
#[test]
fn shared_input_is_not_mutated() {
    let input = small_document("shared");
    let before = input.pages.clone();

    let pipeline = Pipeline::with_defaults();
    pipeline.run_document(&input, &CancelToken::new()).unwrap();

    assert_eq!(input.pages, before);
}

/// A table region with a supplied grid comes out as a table node with
/// rows; the ruling and cell text disappear into it.
#[test]
fn tables_travel_with_their_grids() {
    let input = DocumentInput {
        name: "tabled".to_string(),
        pages: vec![page_with(
            1,
            200.0,
            200.0,
            vec![
                multiline_at(
                    &["Narrative before the", "figures start below."],
                    25.0,
                    170.0,
                    "Helvetica",
                    10.0,
                ),
                hline(60.0, 25.0, 150.0),
                hline(120.0, 25.0, 150.0),
                vline(25.0, 60.0, 120.0),
                vline(150.0, 60.0, 120.0),
            ],
        )],
        cell_grids: vec![CellGridRegion {
            page: 0,
            bbox: (25.0, 60.0, 150.0, 120.0),
            rows: vec![
                vec!["h1".into(), "h2".into()],
                vec!["v1".into(), "v2".into()],
            ],
        }],
    };

    let pipeline = Pipeline::with_defaults();
    let document = pipeline
        .run_document(&input, &CancelToken::new())
        .unwrap();

    let table = document
        .content
        .iter()
        .find_map(|n| match n {
            Node::Table { rows, .. } => Some(rows),
            _ => None,
        })
        .expect("table node emitted");
    assert_eq!(table.as_ref().unwrap().len(), 2);
}

// ============================================================================
// Batch isolation
// ============================================================================

#[test]
fn one_failing_document_does_not_poison_the_batch() {
    let good = small_document("good");
    // More grids than detectable regions: the document fails its table
    // step and is recorded as failed.
    let bad = DocumentInput {
        name: "bad".to_string(),
        pages: vec![page_with(
            1,
            200.0,
            200.0,
            vec![text_at("only text here", 25.0, 100.0, "Helvetica", 10.0)],
        )],
        cell_grids: vec![CellGridRegion {
            page: 0,
            bbox: (10.0, 10.0, 50.0, 50.0),
            rows: vec![vec!["x".into()]],
        }],
    };

    let pipeline = Pipeline::with_defaults();
    let outcomes = pipeline.run_batch(vec![good, bad], &CancelToken::new());

    assert_eq!(outcomes.len(), 2);
    let good_outcome = outcomes.iter().find(|o| o.name == "good").unwrap();
    let bad_outcome = outcomes.iter().find(|o| o.name == "bad").unwrap();
    assert!(good_outcome.result.is_ok());
    assert!(matches!(
        bad_outcome.result.as_ref().unwrap_err(),
        StructError::GridMismatch { .. }
    ));
}

// ============================================================================
// Bullet grouping through assembly
// ============================================================================

#[test]
fn bullet_runs_group_into_one_paragraph() {
    let input = DocumentInput {
        name: "bullets".to_string(),
        pages: vec![page_with(
            1,
            200.0,
            300.0,
            vec![
                multiline_at(
                    &["The following items", "are included below:"],
                    25.0,
                    250.0,
                    "Helvetica",
                    10.0,
                ),
                multiline_at(&["- first item text", "continues briefly"], 25.0, 210.0, "Helvetica", 10.0),
                multiline_at(&["- second item text", "continues as well"], 25.0, 170.0, "Helvetica", 10.0),
                multiline_at(&["A closing paragraph", "ends the document."], 25.0, 130.0, "Helvetica", 10.0),
            ],
        )],
        cell_grids: Vec::new(),
    };

    let pipeline = Pipeline::with_defaults();
    let document = pipeline
        .run_document(&input, &CancelToken::new())
        .unwrap();

    let paragraphs: Vec<&String> = document
        .content
        .iter()
        .filter_map(|n| match n {
            Node::Paragraph { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(paragraphs.len(), 2);
    assert!(paragraphs[0].contains("first item"));
    assert!(paragraphs[0].contains("second item"));
    assert!(paragraphs[1].starts_with("A closing"));
}
