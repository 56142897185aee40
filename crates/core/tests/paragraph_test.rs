//! Tests for paragraph reassembly: indentation/centered merges and the
//! one-liner repair.

mod common;

use common::{line_at, page_with, text_at};
use strata_core::config::ParagraphParams;
use strata_core::layout::{Element, Page, TextBlock};
use strata_core::stages::paragraphs::{self, merge_indented_blocks, repair_one_liners};

fn texts(page: &Page) -> Vec<String> {
    page.iter()
        .filter_map(|e| e.as_text())
        .map(|b| b.get_text())
        .collect()
}

// ============================================================================
// Indentation / centered-text merge
// ============================================================================

/// A bulleted line reaching the end of the area, continued by an
/// indented block, is one wrapped paragraph.
#[test]
fn wrapped_bullet_continuation_merges() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("- bullet line xx", 10.0, 50.0, "Helvetica", 10.0),
            text_at("continued", 15.0, 38.0, "Helvetica", 10.0),
        ],
    );

    merge_indented_blocks(&mut page, &ParagraphParams::default());

    assert_eq!(page.len(), 1);
    let block = page.get(0).unwrap().as_text().unwrap();
    assert_eq!(block.line_count(), 2);
}

/// Centered text split across blocks shares one midpoint; merge it.
#[test]
fn centered_text_merges() {
    // Midpoint 50 for every line: widths 40 and 20 centered on x=50.
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("12345678", 30.0, 50.0, "Helvetica", 10.0),
            text_at("1234", 40.0, 38.0, "Helvetica", 10.0),
        ],
    );

    merge_indented_blocks(&mut page, &ParagraphParams::default());
    assert_eq!(page.len(), 1);
}

/// Blocks too far apart vertically stay separate whatever their shape.
#[test]
fn distant_blocks_stay_separate() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("- bullet line xx", 10.0, 80.0, "Helvetica", 10.0),
            text_at("continued", 15.0, 20.0, "Helvetica", 10.0),
        ],
    );

    merge_indented_blocks(&mut page, &ParagraphParams::default());
    assert_eq!(page.len(), 2);
}

// ============================================================================
// One-liner repair
// ============================================================================

fn one_liner_page(lines: &[(&str, f64, f64)]) -> Page {
    let blocks: Vec<Element> = lines
        .iter()
        .map(|(text, x0, y0)| text_at(text, *x0, *y0, "Helvetica", 10.0))
        .collect();
    page_with(1, 120.0, 200.0, blocks)
}

/// Aligned full-width one-liners collapse into paragraphs; a short line
/// (a heading, say) starts a new one.
#[test]
fn aligned_one_liners_merge_into_paragraphs() {
    let mut pages = vec![one_liner_page(&[
        ("short head", 10.0, 180.0),
        ("a full width line of text xxxx", 10.0, 165.0),
        ("a full width line of text yyyy", 10.0, 150.0),
        ("closing words", 10.0, 135.0),
    ])];

    repair_one_liners(&mut pages, &ParagraphParams::default()).unwrap();

    let texts = texts(&pages[0]);
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], "short head");
    assert!(texts[1].contains("xxxx"));
    assert!(texts[1].contains("closing words"));
}

/// An indented line under a full line continues it; an outdented full
/// line under an indented one starts fresh.
#[test]
fn indented_continuation_merges() {
    let mut pages = vec![one_liner_page(&[
        ("a full width line of text xxxx", 10.0, 180.0),
        ("   indented continuation xx", 25.0, 165.0),
    ])];

    repair_one_liners(&mut pages, &ParagraphParams::default()).unwrap();
    assert_eq!(texts(&pages[0]).len(), 1);
}

/// Documents with healthy multi-line blocks never trigger the repair.
#[test]
fn healthy_documents_are_untouched() {
    let mut block = TextBlock::new();
    block.add(line_at("first line of block", 10.0, 60.0, "Helvetica", 10.0));
    block.add(line_at("second line of block", 10.0, 48.0, "Helvetica", 10.0));
    let mut pages = vec![page_with(
        1,
        120.0,
        100.0,
        vec![
            Element::Text(block),
            text_at("stray one-liner", 10.0, 30.0, "Helvetica", 10.0),
        ],
    )];

    let before = texts(&pages[0]);
    repair_one_liners(&mut pages, &ParagraphParams::default()).unwrap();
    assert_eq!(texts(&pages[0]), before);
}

/// The full stage applies both passes without disturbing separate
/// content.
#[test]
fn stage_preserves_distinct_paragraphs() {
    let mut pages = vec![page_with(
        1,
        200.0,
        200.0,
        vec![
            text_at("First paragraph", 10.0, 150.0, "Helvetica", 10.0),
            text_at("Second paragraph body", 10.0, 100.0, "Helvetica", 10.0),
        ],
    )];

    paragraphs::run(&mut pages, &ParagraphParams::default()).unwrap();
    assert_eq!(texts(&pages[0]).len(), 2);
}
