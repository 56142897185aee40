//! Table boundary detection.
//!
//! A table announces itself through its ruling: horizontal and vertical
//! line segments that cross. Candidate rules are partitioned into thin
//! (vertical) and flat (horizontal) sets, then joined into connected
//! components under two relations: approximate overlap between opposite
//! orientations (a crossing) and exact edge contact within one
//! orientation (a single visual line drawn as two abutting primitives).
//! Components containing at least one crossing become table regions.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::TableParams;
use crate::error::{Result, StructError};
use crate::layout::{CellGrid, Element, Page, Table};
use crate::utils::{HasBBox, Rect};

/// One cell grid returned by the external extraction service, tagged
/// with the page and region it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGridRegion {
    pub page: usize,
    pub bbox: Rect,
    pub rows: Vec<Vec<String>>,
}

/// Detects table regions on every page, folds their content into the
/// region, assigns externally-supplied cell grids, and merges tables
/// that continue across a page break.
pub fn run(pages: &mut Vec<Page>, grids: &[CellGridRegion], params: &TableParams) -> Result<()> {
    for page in pages.iter_mut() {
        let tables = find_table_regions(page, params.rule_margin);
        replace_table_content(page, tables);
    }
    assign_cell_grids(pages, grids)?;
    merge_consecutive_tables(pages, params.merge_margin);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    bbox: Rect,
    horizontal: bool,
}

/// Approximate bounding-box overlap, the crossing relation.
fn is_approx_overlap(a: Rect, b: Rect, margin: f64) -> bool {
    let hoverlap = a.0 - margin <= b.2 && a.2 + margin >= b.0;
    let voverlap = a.1 - margin <= b.3 && a.3 + margin >= b.1;
    hoverlap && voverlap
}

/// Exact end-to-end contact between two aligned segments. No tolerance:
/// abutting primitives from one drawn line share coordinates exactly.
fn is_touching(a: Rect, b: Rect) -> bool {
    if a.0 == b.0 && a.2 == b.2 {
        a.3 == b.1 || b.3 == a.1
    } else if a.1 == b.1 && a.3 == b.3 {
        a.2 == b.0 || b.2 == a.0
    } else {
        false
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Finds one table region per connected component of crossing/touching
/// rules. Pairwise overlap tests make this O(n²) in the page's rule
/// count; pages are independent.
pub fn find_table_regions(page: &Page, margin: f64) -> Vec<Table> {
    let mut segments: Vec<Segment> = Vec::new();
    for elem in page.iter() {
        let Some(rule) = elem.as_rule() else {
            continue;
        };
        let thin = rule.width() <= margin;
        let flat = rule.height() <= margin;
        if thin && flat {
            // Degenerate mark, not a ruling line.
            continue;
        } else if thin {
            segments.push(Segment {
                bbox: rule.bbox(),
                horizontal: false,
            });
        } else if flat {
            segments.push(Segment {
                bbox: rule.bbox(),
                horizontal: true,
            });
        }
    }

    let mut uf = UnionFind::new(segments.len());
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let (a, b) = (&segments[i], &segments[j]);
            if a.horizontal != b.horizontal {
                if is_approx_overlap(a.bbox, b.bbox, margin) {
                    uf.union(i, j);
                }
            } else if is_touching(a.bbox, b.bbox) {
                uf.union(i, j);
            }
        }
    }

    // Components in page order of their first member.
    let mut components: Vec<(usize, Vec<usize>)> = Vec::new();
    for i in 0..segments.len() {
        let root = uf.find(i);
        match components.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(i),
            None => components.push((root, vec![i])),
        }
    }

    let mut tables = Vec::new();
    for (_, members) in components {
        let has_h = members.iter().any(|&i| segments[i].horizontal);
        let has_v = members.iter().any(|&i| !segments[i].horizontal);
        if !(has_h && has_v) {
            // No crossing anywhere: just a drawn line, not a table.
            continue;
        }
        let mut table = Table::new();
        for &i in &members {
            table.absorb(segments[i].bbox);
        }
        tables.push(table);
    }
    tables
}

/// Folds each region's content into its Table element: fully-contained
/// elements are absorbed (deleted), partially-contained text blocks are
/// truncated at the line level and re-positioned, and the Table itself
/// is inserted at the position its top edge calls for.
pub fn replace_table_content(page: &mut Page, tables: Vec<Table>) {
    if page.is_empty() {
        return;
    }
    for table in tables {
        let region = *table.component();
        page.remove_where(|e| region.contains(&e.component()));

        let mut truncated: SmallVec<[usize; 8]> = SmallVec::new();
        for e in 0..page.len() {
            let Some(block) = page.get_mut(e).and_then(Element::as_text_mut) else {
                continue;
            };
            let inside: Vec<usize> = block
                .lines()
                .iter()
                .enumerate()
                .filter(|(_, line)| region.contains(&crate::layout::Component::new(line.bbox())))
                .map(|(i, _)| i)
                .collect();
            if !inside.is_empty() {
                block.remove_lines(&inside);
                truncated.push(e);
            }
        }
        page.reposition(&truncated);

        let insert_at = page.iter().position(|e| e.y0() < table.y0());
        match insert_at {
            Some(idx) => page.insert(idx, Element::Table(table)),
            None => page.push(Element::Table(table)),
        }
    }
}

fn grid_distance(table: &Table, grid: &CellGridRegion) -> f64 {
    let t = table.bbox();
    let g = grid.bbox;
    (t.0 - g.0).abs() + (t.1 - g.1).abs() + (t.2 - g.2).abs() + (t.3 - g.3).abs()
}

/// Assigns each externally-extracted grid to the closest unassigned
/// pre-detected region on its page, by summed coordinate difference.
/// More grids than regions is a contract violation and fails loudly.
pub fn assign_cell_grids(pages: &mut [Page], grids: &[CellGridRegion]) -> Result<()> {
    for (p, page) in pages.iter_mut().enumerate() {
        let page_grids: Vec<&CellGridRegion> = grids.iter().filter(|g| g.page == p).collect();
        if page_grids.is_empty() {
            continue;
        }

        // Top-of-page first, like the regions were reported to the service.
        let mut table_indices: Vec<usize> = (0..page.len())
            .filter(|&e| page.get(e).is_some_and(Element::is_table))
            .collect();
        table_indices.sort_by_key(|&e| {
            std::cmp::Reverse(OrderedFloat(page.get(e).map(|el| el.y0()).unwrap_or(0.0)))
        });

        if page_grids.len() > table_indices.len() {
            return Err(StructError::GridMismatch {
                page: p,
                grids: page_grids.len(),
                regions: table_indices.len(),
            });
        }

        let mut assigned = vec![false; table_indices.len()];
        for grid in page_grids {
            let mut best_dist = f64::INFINITY;
            let mut best: Option<usize> = None;
            for (t, &e) in table_indices.iter().enumerate() {
                if assigned[t] {
                    continue;
                }
                let table = page.get(e).and_then(Element::as_table).unwrap();
                let dist = grid_distance(table, grid);
                if dist < best_dist {
                    best_dist = dist;
                    best = Some(t);
                }
            }
            let t = best.expect("more regions than grids checked above");
            assigned[t] = true;
            let table = page
                .get_mut(table_indices[t])
                .and_then(Element::as_table_mut)
                .unwrap();
            table.grid = Some(CellGrid::new(grid.rows.clone()));
        }
    }
    Ok(())
}

/// Merges tables split by a page break: the last element of one page and
/// the first of the next, when both carry grids with the same column
/// count and their x-extents agree within the margin.
pub fn merge_consecutive_tables(pages: &mut Vec<Page>, margin: f64) {
    let mut start: Option<(usize, usize)> = None;
    let mut to_rm: Vec<usize> = Vec::new();

    for p in 1..pages.len() {
        let mergeable = {
            let prev = pages[p - 1].elements.last().and_then(Element::as_table);
            let curr = pages[p].elements.first().and_then(Element::as_table);
            match (prev, curr) {
                (Some(a), Some(b)) => {
                    (a.x0() - b.x0()).abs() <= margin
                        && (a.x1() - b.x1()).abs() <= margin
                        && a.grid.is_some()
                        && b.grid.is_some()
                        && a.n_columns() == b.n_columns()
                }
                _ => false,
            }
        };

        if mergeable {
            if start.is_none() {
                start = Some((p - 1, pages[p - 1].len() - 1));
            }
            let rows = {
                let curr = pages[p].elements[0].as_table().unwrap();
                curr.grid.clone().unwrap()
            };
            let (sp, se) = start.unwrap();
            let table = pages[sp].elements[se].as_table_mut().unwrap();
            if let Some(grid) = table.grid.as_mut() {
                grid.append(rows);
            }
            to_rm.push(p);
        } else {
            start = None;
        }
    }

    to_rm.sort_unstable();
    for p in to_rm.into_iter().rev() {
        pages[p].elements.remove(0);
    }
}
