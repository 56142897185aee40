//! Tests for the cleanup passes.

mod common;

use common::{multiline_at, page_with, text_at, vline};
use strata_core::config::CleaningParams;
use strata_core::layout::Page;
use strata_core::stages::cleaning::{
    self, is_searchable_page, remove_blank_lines, remove_math_glyphs, remove_offsize_pages,
    remove_toc_pages, remove_unsearchable_pages,
};

#[test]
fn offsize_pages_are_emptied() {
    let mut pages = vec![
        page_with(1, 100.0, 200.0, vec![text_at("a", 10.0, 50.0, "F", 10.0)]),
        page_with(2, 100.0, 200.0, vec![text_at("b", 10.0, 50.0, "F", 10.0)]),
        page_with(3, 300.0, 100.0, vec![text_at("landscape", 10.0, 50.0, "F", 10.0)]),
        page_with(4, 100.0, 200.0, vec![text_at("c", 10.0, 50.0, "F", 10.0)]),
    ];

    remove_offsize_pages(&mut pages, 10.0);

    assert!(!pages[0].is_empty());
    assert!(!pages[1].is_empty());
    assert!(pages[2].is_empty(), "landscape page dropped");
    assert!(!pages[3].is_empty());
    assert_eq!(pages[2].page_id, 3, "page keeps its identity");
}

#[test]
fn toc_and_preceding_pages_are_emptied() {
    let mut pages = vec![
        page_with(
            1,
            200.0,
            200.0,
            vec![text_at("Cover page", 20.0, 100.0, "F", 12.0)],
        ),
        page_with(
            2,
            200.0,
            200.0,
            vec![
                text_at("Table of Contents", 20.0, 180.0, "F", 12.0),
                text_at("1. Introduction 3", 20.0, 150.0, "F", 10.0),
                text_at("2. The works 5", 20.0, 130.0, "F", 10.0),
                text_at("3. Annexes 12", 20.0, 110.0, "F", 10.0),
            ],
        ),
        page_with(
            3,
            200.0,
            200.0,
            vec![multiline_at(
                &["Real document content", "starts on this page"],
                20.0,
                150.0,
                "F",
                10.0,
            )],
        ),
    ];

    remove_toc_pages(&mut pages, 0.6);

    assert!(pages[0].is_empty(), "cover before the TOC dropped");
    assert!(pages[1].is_empty(), "TOC page dropped");
    assert!(!pages[2].is_empty(), "content survives");
}

#[test]
fn unsearchable_pages_are_emptied() {
    let mut pages = vec![
        page_with(1, 100.0, 100.0, vec![vline(50.0, 10.0, 90.0)]),
        page_with(2, 100.0, 100.0, vec![text_at("text", 10.0, 50.0, "F", 10.0)]),
    ];

    assert!(!is_searchable_page(&pages[0]));
    assert!(is_searchable_page(&pages[1]));

    remove_unsearchable_pages(&mut pages);
    assert!(pages[0].is_empty());
    assert!(!pages[1].is_empty());
}

#[test]
fn math_glyphs_are_stripped() {
    let mut pages = vec![page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("formula", 10.0, 50.0, "CMSY10-Math", 10.0),
            text_at("prose", 10.0, 30.0, "Times", 10.0),
        ],
    )];

    remove_math_glyphs(&mut pages);
    remove_blank_lines(&mut pages);

    let texts: Vec<String> = pages[0]
        .iter()
        .filter_map(|e| e.as_text())
        .map(|b| b.get_text())
        .collect();
    assert_eq!(texts, vec!["prose"]);
}

#[test]
fn blank_lines_and_empty_blocks_are_swept() {
    let mut pages = vec![page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("   ", 10.0, 50.0, "F", 10.0),
            text_at("kept", 10.0, 30.0, "F", 10.0),
        ],
    )];

    remove_blank_lines(&mut pages);
    assert_eq!(pages[0].len(), 1);
}

#[test]
fn full_stage_runs_all_passes(){
    let mut pages = vec![
        page_with(1, 100.0, 200.0, vec![text_at("normal body", 10.0, 100.0, "F", 10.0)]),
        page_with(2, 100.0, 200.0, vec![vline(50.0, 10.0, 90.0)]),
    ];
    cleaning::run(&mut pages, &CleaningParams::default());
    assert!(!pages[0].is_empty());
    assert!(pages[1].is_empty());
}
