//! Tests for column/line reconciliation: same-height line merging and
//! left-then-right reading order.

mod common;

use common::{page_with, text_at};
use strata_core::config::ColumnParams;
use strata_core::layout::Page;
use strata_core::stages::columns::{self, Area, area_of, merge_split_lines, reorder_columns};

fn texts(page: &Page) -> Vec<String> {
    page.iter()
        .filter_map(|e| e.as_text())
        .map(|b| b.get_text())
        .collect()
}

// ============================================================================
// Area assignment
// ============================================================================

#[test]
fn area_bands_split_the_page() {
    // Page 100 wide, band 45..55.
    assert_eq!(area_of(5.0, 40.0, 100.0, 0.05), Area::Left);
    assert_eq!(area_of(60.0, 95.0, 100.0, 0.05), Area::Right);
    assert_eq!(area_of(10.0, 90.0, 100.0, 0.05), Area::Common);
    assert_eq!(area_of(40.0, 60.0, 100.0, 0.05), Area::Common);
}

// ============================================================================
// Line merging
// ============================================================================

/// Two fragments at the same height, split by incidental whitespace,
/// become one line with glyphs in x order.
#[test]
fn incidental_splits_merge_into_one_line() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("left part", 5.0, 50.0, "Helvetica", 10.0),
            text_at("right", 52.0, 50.0, "Helvetica", 10.0),
        ],
    );

    merge_split_lines(&mut page, &ColumnParams::default());

    assert_eq!(page.len(), 1);
    let block = page.get(0).unwrap().as_text().unwrap();
    assert_eq!(block.line_count(), 1);
    assert_eq!(block.get_text(), "left partright");
}

/// A genuine two-column split (one fragment per side, wide gap) is left
/// alone.
#[test]
fn genuine_column_gap_is_not_merged() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("colA", 5.0, 50.0, "Helvetica", 10.0),
            text_at("colB", 60.0, 50.0, "Helvetica", 10.0),
        ],
    );

    merge_split_lines(&mut page, &ColumnParams::default());

    assert_eq!(page.len(), 2);
}

/// Lines at different heights never merge.
#[test]
fn different_heights_do_not_merge() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("upper", 5.0, 60.0, "Helvetica", 10.0),
            text_at("lower", 52.0, 40.0, "Helvetica", 10.0),
        ],
    );

    merge_split_lines(&mut page, &ColumnParams::default());
    assert_eq!(page.len(), 2);
}

// ============================================================================
// Reading order
// ============================================================================

/// A full-width heading above two columns: reconciled order is the left
/// column top to bottom, then the right column.
#[test]
fn two_column_reading_order() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("3", 60.0, 70.0, "Helvetica", 10.0),
            text_at("1", 5.0, 70.0, "Helvetica", 10.0),
            text_at("heading across the page", 5.0, 90.0, "Helvetica", 10.0),
            text_at("4", 60.0, 40.0, "Helvetica", 10.0),
            text_at("2", 5.0, 40.0, "Helvetica", 10.0),
        ],
    );

    reorder_columns(&mut page, 0.05);

    assert_eq!(
        texts(&page),
        vec!["heading across the page", "1", "2", "3", "4"]
    );
}

/// Leftover column content below the last full-width element still
/// reads left column first.
#[test]
fn full_stage_keeps_column_order() {
    let mut pages = vec![page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("2", 5.0, 40.0, "Helvetica", 10.0),
            text_at("3", 60.0, 70.0, "Helvetica", 10.0),
            text_at("1", 5.0, 70.0, "Helvetica", 10.0),
            text_at("4", 60.0, 40.0, "Helvetica", 10.0),
        ],
    )];

    columns::run(&mut pages, &ColumnParams::default());

    assert_eq!(texts(&pages[0]), vec!["1", "2", "3", "4"]);
}
