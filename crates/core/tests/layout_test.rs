//! Tests for the element model: bounding box invariants, overlap
//! predicates, page ordering helpers, and the serialized input format.

mod common;

use common::{block_at, line_at, page_with, text_at};
use strata_core::layout::{Component, Element, Page, TextBlock};
use strata_core::utils::HasBBox;

// ============================================================================
// Bounding box invariants
// ============================================================================

#[test]
fn block_bbox_is_union_of_lines() {
    let mut block = TextBlock::new();
    block.add(line_at("first", 10.0, 50.0, "Helvetica", 10.0));
    block.add(line_at("second line", 5.0, 38.0, "Helvetica", 10.0));

    assert_eq!(block.x0(), 5.0);
    assert_eq!(block.y0(), 38.0);
    assert_eq!(block.x1(), 5.0 + 11.0 * common::CHAR_W);
    assert_eq!(block.y1(), 60.0);
}

#[test]
fn line_bbox_follows_glyph_mutation() {
    let mut block = block_at("abcdef", 10.0, 50.0, "Helvetica", 10.0);
    let before = block.bbox();
    // Dropping glyphs must re-derive the line box, and the block box
    // after refresh.
    block.lines_mut()[0].remove_glyphs_where(|g| g.x0() >= 10.0 + 3.0 * common::CHAR_W);
    block.refresh_bbox();
    assert!(block.x1() < before.2);
    assert_eq!(block.x1(), 10.0 + 3.0 * common::CHAR_W);
}

// ============================================================================
// Overlap predicate symmetry
// ============================================================================

#[test]
fn overlap_predicates_are_symmetric() {
    let boxes = [
        Component::new((0.0, 0.0, 10.0, 10.0)),
        Component::new((5.0, 5.0, 15.0, 15.0)),
        Component::new((20.0, 0.0, 30.0, 10.0)),
        Component::new((0.0, 20.0, 10.0, 30.0)),
        Component::new((10.0, 0.0, 20.0, 10.0)),
    ];
    for a in &boxes {
        for b in &boxes {
            assert_eq!(a.is_hoverlap(b), b.is_hoverlap(a));
            assert_eq!(a.is_voverlap(b), b.is_voverlap(a));
            assert_eq!(a.hdistance(b), b.hdistance(a));
            assert_eq!(a.vdistance(b), b.vdistance(a));
        }
    }
}

#[test]
fn containment_is_edge_inclusive() {
    let outer = Component::new((0.0, 0.0, 10.0, 10.0));
    let edge = Component::new((0.0, 0.0, 10.0, 10.0));
    let inside = Component::new((1.0, 1.0, 9.0, 9.0));
    let outside = Component::new((1.0, 1.0, 11.0, 9.0));
    assert!(outer.contains(&edge));
    assert!(outer.contains(&inside));
    assert!(!outer.contains(&outside));
}

// ============================================================================
// Page ordering helpers
// ============================================================================

#[test]
fn reposition_reinserts_by_top_edge() {
    let mut page = page_with(
        1,
        100.0,
        100.0,
        vec![
            text_at("top", 10.0, 80.0, "Helvetica", 10.0),
            text_at("middle", 10.0, 50.0, "Helvetica", 10.0),
            text_at("bottom", 10.0, 20.0, "Helvetica", 10.0),
        ],
    );
    // Shrink the first element down to below the last one, then ask the
    // page to re-place it.
    page.get_mut(0).unwrap().set_bbox((10.0, 5.0, 30.0, 10.0));
    page.reposition(&[0]);

    let order: Vec<String> = page
        .iter()
        .map(|e| e.as_text().unwrap().get_text())
        .collect();
    assert_eq!(order, vec!["middle", "bottom", "top"]);
}

#[test]
fn cleared_page_keeps_identity() {
    let page = page_with(
        7,
        300.0,
        500.0,
        vec![text_at("content", 10.0, 80.0, "Helvetica", 10.0)],
    );
    let cleared = page.cleared();
    assert_eq!(cleared.page_id, 7);
    assert_eq!(cleared.width, 300.0);
    assert_eq!(cleared.height, 500.0);
    assert!(cleared.is_empty());
}

// ============================================================================
// Serialized input format
// ============================================================================

#[test]
fn deserializes_analyzer_page_dump() {
    let dump = r#"{
        "page_id": 1,
        "width": 612.0,
        "height": 792.0,
        "elements": [
            {
                "kind": "text",
                "x0": 72.0, "y0": 700.0, "x1": 144.0, "y1": 712.0,
                "lines": [
                    {
                        "x0": 72.0, "y0": 700.0, "x1": 144.0, "y1": 712.0,
                        "glyphs": [
                            {"x0": 72.0, "y0": 700.0, "x1": 80.0, "y1": 712.0,
                             "text": "H", "fontname": "Helvetica-Bold", "size": 12.0}
                        ]
                    }
                ]
            },
            {"kind": "rule", "x0": 72.0, "y0": 690.0, "x1": 144.0, "y1": 690.5, "rule_kind": "line"},
            {"kind": "other", "x0": 0.0, "y0": 0.0, "x1": 10.0, "y1": 10.0}
        ]
    }"#;
    let page: Page = serde_json::from_str(dump).expect("page dump parses");
    assert_eq!(page.len(), 3);
    assert!(page.get(0).unwrap().is_text());
    assert!(matches!(page.get(1), Some(Element::Rule(_))));
    let block = page.get(0).unwrap().as_text().unwrap();
    assert_eq!(block.get_text(), "H");
}
