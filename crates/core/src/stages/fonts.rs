//! Font signature extraction.
//!
//! Every text block gets the signature of its first alphanumeric glyph,
//! enriched with block-level facts (caps, title-likeness, alignment).
//! A second pass probes thin horizontal rules as underlines and flips
//! the signature of the text they sit beneath.

use crate::config::FontParams;
use crate::layout::font::{FontSignature, TextFont, has_sep_in_title, is_like_title};
use crate::layout::{Component, Element, Page};
use crate::utils::{HasBBox, is_upper_text};

/// Extracts a signature for every text block on every page.
pub fn run(pages: &mut Vec<Page>, params: &FontParams) {
    for page in pages.iter_mut() {
        let mut underline_rules: Vec<Component> = Vec::new();

        for elem in page.iter_mut() {
            if let Some(rule) = elem.as_rule() {
                if rule.height() <= params.underline_margin {
                    underline_rules.push(*rule.component());
                }
            }
            let Some(block) = elem.as_text_mut() else {
                continue;
            };

            // Each glyph carries its own font; the first alphanumeric one
            // speaks for the block.
            let lead = block
                .lines()
                .iter()
                .flat_map(|l| l.glyphs())
                .find(|g| g.is_alnum());
            let Some(lead) = lead else {
                block.font = None;
                continue;
            };
            let size = lead.size().round() as i64;
            let bold = lead.fontname().contains("Bold");
            let italic = lead.fontname().contains("Italic");

            let text = block.get_text();
            let text = text.trim();
            // Possessive endings stay lower-case even in caps titles.
            let caps = is_upper_text(&text.replace("'s", ""));

            block.font = Some(FontSignature::Text(TextFont {
                size,
                bold,
                italic,
                underline: false,
                caps,
                title_like: is_like_title(text),
                sep_in_title: has_sep_in_title(text),
                alignment: block.x0().round() as i64,
            }));
        }

        mark_underlined(page, &underline_rules, params.underline_margin);
    }
}

/// For each thin rule, finds the first signed text block with a line
/// close enough above it and flips that block's underline flag. Partial
/// underlines within a multi-line block are not modeled.
fn mark_underlined(page: &mut Page, rules: &[Component], margin: f64) {
    for rule in rules {
        for elem in page.iter_mut() {
            let Some(block) = elem.as_text_mut() else {
                continue;
            };
            let Some(FontSignature::Text(font)) = block.font else {
                continue;
            };
            let sits_on_rule = block.lines().iter().any(|line| {
                if line.get_text().trim().is_empty() {
                    return false;
                }
                let line_box = Component::new(line.bbox());
                line_box.is_hoverlap(rule) && line_box.vdistance(rule) <= margin
            });
            if sits_on_rule {
                block.font = Some(FontSignature::Text(TextFont {
                    underline: true,
                    ..font
                }));
                break;
            }
        }
    }
}
