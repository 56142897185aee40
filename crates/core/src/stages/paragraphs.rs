//! Paragraph reassembly.
//!
//! Layout analyzers split paragraphs they should not: a bullet glyph
//! shifts the first line's box, centered text starts every line at a new
//! x, and some documents come back as a cloud of one-line blocks. Two
//! passes repair this: an indentation/centered-text merge that always
//! runs, and a one-liner repair that only triggers when the document is
//! drowning in single-line blocks.

use crate::config::ParagraphParams;
use crate::error::{Result, StructError};
use crate::layout::{Element, Page, TextBlock};
use crate::utils::HasBBox;

/// Runs both repair passes.
pub fn run(pages: &mut Vec<Page>, params: &ParagraphParams) -> Result<()> {
    for page in pages.iter_mut() {
        merge_indented_blocks(page, params);
    }
    repair_one_liners(pages, params)
}

/// Merges each listed element into its predecessor, moving lines over
/// and re-deriving the predecessor's box.
fn merge_with_previous(page: &mut Page, to_merge: &[usize]) {
    let mut sorted: Vec<usize> = to_merge.to_vec();
    sorted.sort_unstable();
    for idx in sorted.into_iter().rev() {
        let mut removed = page.elements.remove(idx);
        let Some(block) = removed.as_text_mut() else {
            continue;
        };
        let lines = block.take_lines();
        if let Some(prev) = page.get_mut(idx - 1).and_then(Element::as_text_mut) {
            for line in lines {
                prev.add(line);
            }
        }
    }
}

/// Two consecutive blocks are close when the gap between the last line
/// of the first and the first line of the second stays within the
/// analyzer's line margin.
fn is_close(first: &TextBlock, second: &TextBlock, line_margin: f64) -> bool {
    let (Some(last), Some(head)) = (first.lines().last(), second.lines().first()) else {
        return false;
    };
    let l1 = last.y1() - head.y1();
    let l2 = last.y0() - head.y0();
    let allowed = (last.height() + head.height()) * line_margin;
    l1 < allowed && l2 < allowed
}

/// A wrapped bullet item: the first block is a single line reaching the
/// end of the text area, the continuation starts further right. When the
/// continuation also ends further right, the overhang must fit within
/// its first word, since a wrap breaks before the word that no longer
/// fits.
fn is_indented_item(
    first: &TextBlock,
    second: &TextBlock,
    max_x1: f64,
    params: &ParagraphParams,
) -> bool {
    if first.line_count() != 1 {
        return false;
    }
    if first.x1() < params.end_area_ratio * max_x1 {
        return false;
    }

    if second.x1() > first.x1() {
        let mut widths: Vec<f64> = Vec::new();
        if let Some(line) = second.lines().first() {
            for glyph in line.glyphs() {
                if glyph.is_whitespace() {
                    break;
                }
                widths.push(glyph.width());
            }
        }
        let word_width: f64 = widths[..widths.len().saturating_sub(1)].iter().sum();
        second.x0() - first.x0() > params.indent_tolerance && second.x1() <= first.x1() + word_width
    } else {
        second.x0() - first.x0() > params.indent_tolerance
    }
}

/// Centered text split across blocks: every line of both blocks shares
/// the same rounded midpoint.
fn is_middle_text(first: &TextBlock, second: &TextBlock) -> bool {
    let mids: Vec<i64> = first
        .lines()
        .iter()
        .chain(second.lines())
        .map(|l| (l.x0() + (l.x1() - l.x0()) / 2.0).round() as i64)
        .collect();
    match mids.first() {
        Some(first_mid) => mids.iter().all(|m| m == first_mid),
        None => false,
    }
}

/// The indentation/centered-text pass over one page.
pub fn merge_indented_blocks(page: &mut Page, params: &ParagraphParams) {
    let mut to_merge: Vec<usize> = Vec::new();
    let mut max_x1: f64 = 0.0;

    for e in 0..page.len() {
        if e > 0 {
            let prev = page.get(e - 1).and_then(Element::as_text);
            let curr = page.get(e).and_then(Element::as_text);
            if let (Some(prev), Some(curr)) = (prev, curr) {
                if prev.line_count() > 0
                    && curr.line_count() > 0
                    && is_close(prev, curr, params.line_margin)
                    && (is_indented_item(prev, curr, max_x1, params)
                        || is_middle_text(prev, curr))
                {
                    to_merge.push(e);
                }
            }
        }
        max_x1 = max_x1.max(page.get(e).map(|el| el.x1()).unwrap_or(0.0));
    }

    merge_with_previous(page, &to_merge);
}

fn one_liner_ratio(pages: &[Page]) -> f64 {
    let counts: Vec<usize> = pages
        .iter()
        .flat_map(|p| p.iter())
        .filter_map(Element::as_text)
        .map(TextBlock::line_count)
        .collect();
    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().filter(|&&c| c == 1).count() as f64 / counts.len() as f64
}

fn widest_text_x1(pages: &[Page]) -> Option<f64> {
    pages
        .iter()
        .flat_map(|p| p.iter())
        .filter(|e| e.is_text())
        .map(|e| e.x1())
        .fold(None, |acc, x| Some(acc.map_or(x, |a: f64| a.max(x))))
}

/// A line that starts in the left half of the text area and stretches to
/// near its right edge.
fn is_full_line(block: &TextBlock, max_x1: f64, ratio: f64) -> bool {
    block.x0() < max_x1 / 2.0 && block.x1() > max_x1 * ratio
}

/// The one-liner repair: reclassifies each pair of consecutive text
/// blocks into one of four geometric cases and merges accordingly. Only
/// runs when the share of single-line blocks says the analyzer
/// over-split this document. A pair matching none of the cases means the
/// geometric model is wrong for this document; that is an error, not a
/// judgment call.
pub fn repair_one_liners(pages: &mut Vec<Page>, params: &ParagraphParams) -> Result<()> {
    if one_liner_ratio(pages) < params.one_liner_ratio {
        return Ok(());
    }
    let Some(mut max_x1) = widest_text_x1(pages) else {
        return Ok(());
    };

    for p in 0..pages.len() {
        let page = &mut pages[p];
        let mut to_merge: Vec<usize> = Vec::new();

        for e in 0..page.len() {
            max_x1 = max_x1.max(page.get(e).map(|el| el.x1()).unwrap_or(0.0));
            if e == 0 {
                continue;
            }
            let prev = page.get(e - 1).and_then(Element::as_text);
            let curr = page.get(e).and_then(Element::as_text);
            let (Some(prev), Some(curr)) = (prev, curr) else {
                continue;
            };

            let diff_x0 = (curr.x0() - prev.x0()).abs();
            let apx = params.indent_tolerance;

            if !is_full_line(prev, max_x1, params.full_width_ratio) {
                // Short line over anything: a heading-like break, keep.
            } else if diff_x0 >= apx && curr.x0() - prev.x0() < 0.0 {
                // Indented line over an outdented one: new paragraph.
            } else if diff_x0 <= apx {
                // Aligned continuation of a full line.
                to_merge.push(e);
            } else if diff_x0 >= apx && curr.x0() - prev.x0() > 0.0 {
                // Indented continuation of a full line.
                to_merge.push(e);
            } else {
                return Err(StructError::UnknownParagraphShape {
                    page: p,
                    first: prev.get_text().trim().to_string(),
                    second: curr.get_text().trim().to_string(),
                });
            }
        }

        merge_with_previous(page, &to_merge);
    }
    Ok(())
}
