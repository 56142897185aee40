//! Pre-classification cleanup passes.
//!
//! These remove content that would poison the heuristic stages: pages
//! whose size departs from the document's usual format, table-of-contents
//! pages, image-only pages, math glyphs, and blank lines. Emptied pages
//! are kept in place so page numbering survives.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CleaningParams;
use crate::layout::{Element, Page};
use crate::utils::HasBBox;

const TOC_TITLES: &[&str] = &["content", "contents", "tableofcontent", "tableofcontents"];

static ENDS_WITH_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\s*$").unwrap());

/// Runs every cleaning pass in order.
pub fn run(pages: &mut Vec<Page>, params: &CleaningParams) {
    remove_offsize_pages(pages, params.size_margin);
    remove_toc_pages(pages, params.toc_digit_ratio);
    remove_unsearchable_pages(pages);
    remove_math_glyphs(pages);
    remove_blank_lines(pages);
}

fn size_dist(a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Empties pages whose size is an outlier against the document's most
/// common page size. Such pages usually carry appendix-grade content
/// (oversized tables, rotated figures).
pub fn remove_offsize_pages(pages: &mut Vec<Page>, size_margin: f64) {
    if pages.is_empty() {
        return;
    }
    let sizes: Vec<(i64, i64)> = pages
        .iter()
        .map(|p| (p.width.round() as i64, p.height.round() as i64))
        .collect();

    let mut counts: IndexMap<(i64, i64), usize> = IndexMap::new();
    for size in &sizes {
        *counts.entry(*size).or_insert(0) += 1;
    }
    let mut normal = sizes[0];
    let mut best = 0usize;
    for (size, count) in &counts {
        if *count > best {
            best = *count;
            normal = *size;
        }
    }

    for (p, size) in sizes.iter().enumerate() {
        if size_dist(*size, normal) as f64 > size_margin {
            log::debug!("dropping off-size page {}", pages[p].page_id);
            pages[p] = pages[p].cleared();
        }
    }
}

fn normalize_title(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn is_toc_title(text: &str) -> bool {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .any(|line| TOC_TITLES.contains(&normalize_title(line).as_str()))
}

/// TOC content: most lines end with a page number.
fn is_toc_content<'a>(lines: impl Iterator<Item = &'a String>, ratio: f64) -> bool {
    let lines: Vec<&String> = lines.filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return false;
    }
    let digit_lines = lines
        .iter()
        .filter(|l| ENDS_WITH_DIGIT.is_match(l))
        .count();
    digit_lines as f64 / lines.len() as f64 > ratio
}

/// Finds table-of-contents pages and empties them, together with
/// everything before the first TOC (cover pages, legal boilerplate). A
/// TOC is recognized by its title and by most of its lines ending in a
/// page number; per y-position only the right-most line fragment is
/// inspected, so dot leaders split into fragments do not hide the number.
pub fn remove_toc_pages(pages: &mut Vec<Page>, ratio: f64) {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut toc_start: Option<usize> = None;

    for (p, page) in pages.iter().enumerate() {
        let mut lines: IndexMap<(i64, i64), String> = IndexMap::new();
        let mut lines_x: IndexMap<(i64, i64), f64> = IndexMap::new();
        for elem in page.iter() {
            let Some(block) = elem.as_text() else {
                continue;
            };
            let text = block.get_text();
            let text = text.trim();
            if toc_start.is_none() && is_toc_title(text) {
                toc_start = Some(p);
            }
            if toc_start.is_some() {
                for line in block.lines() {
                    let y = (line.y0().round() as i64, line.y1().round() as i64);
                    if lines_x.get(&y).is_none_or(|x1| line.x1() > *x1) {
                        lines.insert(y, line.get_text().trim().to_string());
                        lines_x.insert(y, line.x1());
                    }
                }
            }
        }
        if let Some(start) = toc_start {
            if !is_toc_content(lines.values(), ratio) {
                spans.push((start, p));
                toc_start = None;
            }
        }
    }
    if let Some(start) = toc_start {
        spans.push((start, start + 1));
    }
    if let Some(first) = spans.first_mut() {
        first.0 = 0;
    }

    for (start, end) in spans {
        for p in start..end.min(pages.len()) {
            pages[p] = pages[p].cleared();
        }
    }
}

/// True if the page carries any non-blank text.
pub fn is_searchable_page(page: &Page) -> bool {
    page.iter()
        .filter_map(Element::as_text)
        .any(|b| !b.get_text().trim().is_empty())
}

/// Empties image-only pages; the downstream stages have nothing to work
/// with there and the cell-extraction service cannot either.
pub fn remove_unsearchable_pages(pages: &mut Vec<Page>) {
    for p in 0..pages.len() {
        if !is_searchable_page(&pages[p]) {
            pages[p] = pages[p].cleared();
        }
    }
}

/// Strips glyphs set in a math font; formula fragments read as garbage
/// once linearized.
pub fn remove_math_glyphs(pages: &mut Vec<Page>) {
    for page in pages.iter_mut() {
        for elem in page.iter_mut() {
            let Some(block) = elem.as_text_mut() else {
                continue;
            };
            for line in block.lines_mut() {
                line.remove_glyphs_where(|g| g.fontname().contains("Math"));
            }
            block.refresh_bbox();
        }
    }
}

/// Drops whitespace-only lines, then text blocks left without lines.
pub fn remove_blank_lines(pages: &mut Vec<Page>) {
    for page in pages.iter_mut() {
        for elem in page.iter_mut() {
            if let Some(block) = elem.as_text_mut() {
                block.remove_lines_where(|l| l.is_blank());
            }
        }
        page.remove_where(|e| e.as_text().map(|b| b.line_count() == 0).unwrap_or(false));
    }
}
