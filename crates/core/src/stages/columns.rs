//! Column and line reconciliation.
//!
//! Two passes. Line merging re-joins text line fragments that sit at the
//! same height but were split across blocks, unless the split is a
//! genuine column gap. Reordering then rewrites the page into
//! left-column-first reading order, bounded by full-width elements.

use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;

use crate::config::ColumnParams;
use crate::layout::{Element, Page};
use crate::utils::{HasBBox, is_same_span};

/// Horizontal band a box falls into, relative to a widened page midline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Left,
    Right,
    /// Straddles the middle band: full width.
    Common,
}

/// Classifies a horizontal extent against the page midline widened by
/// `middle_margin × width`. Scanned documents are rarely perfectly
/// aligned, hence the band instead of an exact split.
pub fn area_of(x0: f64, x1: f64, width: f64, middle_margin: f64) -> Area {
    let middle = width / 2.0;
    let middle_up = middle + width * middle_margin;
    let middle_low = middle - width * middle_margin;

    if x0 < middle_low && x1 <= middle_up {
        Area::Left
    } else if x0 >= middle_low && x1 > middle_up {
        Area::Right
    } else {
        Area::Common
    }
}

/// Runs line merging then column reordering over every page.
pub fn run(pages: &mut Vec<Page>, params: &ColumnParams) {
    for page in pages.iter_mut() {
        merge_split_lines(page, params);
        reorder_columns(page, params.middle_margin);
    }
}

/// Line address within a page: (element index, line index).
type LineId = (usize, usize);

/// Merges text lines that sit at the same height into one logical line,
/// splicing glyphs into the left-most member of each merge group.
pub fn merge_split_lines(page: &mut Page, params: &ColumnParams) {
    let groups = find_merge_groups(page, params);

    let mut touched: FxHashSet<usize> = FxHashSet::default();
    for group in &groups {
        debug_assert!(group.len() > 1);

        // Left-to-right, so glyph order stays monotonic after splicing.
        let mut ordered: Vec<LineId> = group.iter().copied().collect();
        ordered.sort_by_key(|id| OrderedFloat(line_x0(page, *id)));

        let target = ordered[0];
        for source in &ordered[1..] {
            let glyphs = {
                let block = page
                    .get_mut(source.0)
                    .and_then(Element::as_text_mut)
                    .expect("merge group addresses a text block");
                block.lines_mut()[source.1].take_glyphs()
            };
            let block = page
                .get_mut(target.0)
                .and_then(Element::as_text_mut)
                .expect("merge group addresses a text block");
            block.lines_mut()[target.1].splice(glyphs);
            touched.insert(source.0);
        }
        touched.insert(target.0);
    }

    // Sweep out the emptied lines and refresh the affected boxes.
    for e in touched {
        if let Some(block) = page.get_mut(e).and_then(Element::as_text_mut) {
            block.remove_lines_where(|l| l.glyph_count() == 0);
        }
    }
    page.remove_where(|e| e.as_text().map(|b| b.line_count() == 0).unwrap_or(false));
}

fn line_x0(page: &Page, id: LineId) -> f64 {
    page.get(id.0)
        .and_then(Element::as_text)
        .map(|b| b.lines()[id.1].x0())
        .unwrap_or(0.0)
}

/// Finds groups of line fragments that belong on one baseline, as a
/// union of pairwise same-height relations.
fn find_merge_groups(page: &Page, params: &ColumnParams) -> Vec<FxHashSet<LineId>> {
    let mut groups: Vec<FxHashSet<LineId>> = Vec::new();

    for (e1, elem1) in page.iter().enumerate() {
        let Some(block1) = elem1.as_text() else {
            continue;
        };
        for i1 in 0..block1.lines().len() {
            let partners = find_same_height_lines(page, (e1, i1), params);
            if partners.is_empty() {
                continue;
            }

            let group_id = match index_in(&groups, (e1, i1)) {
                Some(g) => g,
                None => {
                    groups.push(FxHashSet::from_iter([(e1, i1)]));
                    groups.len() - 1
                }
            };

            let mut group_id = group_id;
            for partner in partners {
                match index_in(&groups, partner) {
                    Some(g) if g == group_id => {}
                    Some(g) => {
                        let other = groups.remove(g);
                        if group_id > g {
                            group_id -= 1;
                        }
                        groups[group_id].extend(other);
                    }
                    None => {
                        groups[group_id].insert(partner);
                    }
                }
            }
        }
    }
    groups
}

fn index_in(groups: &[FxHashSet<LineId>], id: LineId) -> Option<usize> {
    groups.iter().position(|g| g.contains(&id))
}

/// All lines at the same height as the given one whose split is not a
/// genuine column gap (one fragment per column, wide enough apart).
fn find_same_height_lines(page: &Page, id: LineId, params: &ColumnParams) -> Vec<LineId> {
    let l1 = &page.get(id.0).and_then(Element::as_text).unwrap().lines()[id.1];
    let mut found = Vec::new();

    for (e2, elem2) in page.iter().enumerate() {
        let Some(block2) = elem2.as_text() else {
            continue;
        };
        for (i2, l2) in block2.lines().iter().enumerate() {
            if (e2, i2) == id {
                continue;
            }
            if !is_same_span((l1.y0(), l1.y1()), (l2.y0(), l2.y1()), params.line_tolerance)
                || l1.x1() > l2.x0()
            {
                continue;
            }
            let a1 = area_of(l1.x0(), l1.x1(), page.width, params.middle_margin);
            let a2 = area_of(l2.x0(), l2.x1(), page.width, params.middle_margin);
            let genuine_columns =
                a1 == Area::Left && a2 == Area::Right && l2.x0() - l1.x1() >= params.min_column_gap;
            if !genuine_columns {
                found.push((e2, i2));
            }
        }
    }
    found
}

/// Rewrites the page into reading order: walk down the page, and at each
/// full-width element first drain the left column above it, then the
/// right column, then emit the element itself.
pub fn reorder_columns(page: &mut Page, middle_margin: f64) {
    let elements = std::mem::take(&mut page.elements);
    let total = elements.len();

    let mut left: Vec<Element> = Vec::new();
    let mut right: Vec<Element> = Vec::new();
    let mut common: Vec<Element> = Vec::new();
    for elem in elements {
        match area_of(elem.x0(), elem.x1(), page.width, middle_margin) {
            Area::Left => left.push(elem),
            Area::Right => right.push(elem),
            Area::Common => common.push(elem),
        }
    }

    let by_top = |e: &Element| std::cmp::Reverse(OrderedFloat(e.y1()));
    left.sort_by_key(by_top);
    right.sort_by_key(by_top);
    common.sort_by_key(by_top);

    let mut ordered: Vec<Element> = Vec::with_capacity(total);
    let mut left = std::collections::VecDeque::from(left);
    let mut right = std::collections::VecDeque::from(right);
    for divider in common {
        while left.front().is_some_and(|e| e.y1() >= divider.y1()) {
            ordered.push(left.pop_front().unwrap());
        }
        while right.front().is_some_and(|e| e.y1() >= divider.y1()) {
            ordered.push(right.pop_front().unwrap());
        }
        ordered.push(divider);
    }
    ordered.extend(left);
    ordered.extend(right);

    debug_assert_eq!(ordered.len(), total);
    page.elements = ordered;
}
