//! Shared fixture builders for the integration tests.

#![allow(dead_code)]

use strata_core::layout::{Element, Glyph, Page, Rule, TextBlock, TextLine};

pub const CHAR_W: f64 = 5.0;

/// Glyphs for `text` starting at (x0, y0), one CHAR_W-wide cell per
/// character, `size` points tall.
pub fn glyphs_for(text: &str, x0: f64, y0: f64, fontname: &str, size: f64) -> Vec<Glyph> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            Glyph::new(
                (
                    x0 + i as f64 * CHAR_W,
                    y0,
                    x0 + (i + 1) as f64 * CHAR_W,
                    y0 + size,
                ),
                &c.to_string(),
                fontname,
                size,
            )
        })
        .collect()
}

pub fn line_at(text: &str, x0: f64, y0: f64, fontname: &str, size: f64) -> TextLine {
    TextLine::from_glyphs(glyphs_for(text, x0, y0, fontname, size))
}

/// A single-line text block.
pub fn block_at(text: &str, x0: f64, y0: f64, fontname: &str, size: f64) -> TextBlock {
    TextBlock::from_lines(vec![line_at(text, x0, y0, fontname, size)])
}

pub fn text_at(text: &str, x0: f64, y0: f64, fontname: &str, size: f64) -> Element {
    Element::Text(block_at(text, x0, y0, fontname, size))
}

/// A multi-line text block; lines stack downward from (x0, top_y).
pub fn multiline_at(
    lines: &[&str],
    x0: f64,
    top_y: f64,
    fontname: &str,
    size: f64,
) -> Element {
    let built: Vec<TextLine> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| line_at(text, x0, top_y - i as f64 * (size + 2.0), fontname, size))
        .collect();
    Element::Text(TextBlock::from_lines(built))
}

pub fn hline(y: f64, x0: f64, x1: f64) -> Element {
    Element::Rule(Rule::line((x0, y, x1, y)))
}

pub fn vline(x: f64, y0: f64, y1: f64) -> Element {
    Element::Rule(Rule::line((x, y0, x, y1)))
}

pub fn page_with(page_id: i32, width: f64, height: f64, elements: Vec<Element>) -> Page {
    let mut page = Page::new(page_id, width, height);
    for element in elements {
        page.push(element);
    }
    page
}
