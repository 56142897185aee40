//! Title hierarchy classification.
//!
//! No single rule finds titles in every document, so the classifier
//! leans on one structural fact: a title always has content underneath.
//! The most populous font signature is body text; remaining signatures
//! are promoted to title levels one by one when every occurrence is
//! followed by body content, or demoted to body when none qualifies.
//! Promotion starts with the most-nested-looking candidates, so levels
//! are assigned in reverse promotion order. A normalization pass then
//! repairs level skips left by misclassification.

use indexmap::IndexMap;

use crate::layout::font::FontSignature;
use crate::layout::{Element, Page};

/// Classifies titles, then normalizes the level sequence.
pub fn run(pages: &mut Vec<Page>) {
    classify_titles(pages);
    normalize_title_levels(pages);
}

/// Index of the next element carrying a font signature after `idx`, and
/// that signature. Blocks that never got a signature are skipped.
fn next_font(page: &Page, idx: usize) -> (usize, Option<FontSignature>) {
    let mut i = idx;
    while i + 1 < page.len() {
        i += 1;
        if let Some(font) = page.get(i).and_then(Element::font) {
            return (i, Some(font));
        }
    }
    (i, None)
}

/// Whether body-font content appears between the element at `idx` and
/// the next element set in the same signature.
fn has_text_between(page: &Page, idx: usize, text_fonts: &[FontSignature]) -> bool {
    let Some(current) = page.get(idx).and_then(Element::font) else {
        return false;
    };
    let mut i = idx;
    loop {
        let (ni, nf) = next_font(page, i);
        i = ni;
        match nf {
            None => return false,
            Some(f) if text_fonts.contains(&f) => return true,
            Some(f) if f == current => return false,
            Some(_) => continue,
        }
    }
}

/// One round of the promote/demote loop. Returns the signatures decided
/// this round, the remaining candidates, and whether the decision was a
/// promotion (title) or a demotion (body).
fn next_title_font(
    pages: &[Page],
    mut fonts: Vec<FontSignature>,
    text_fonts: &[FontSignature],
) -> (Vec<FontSignature>, Vec<FontSignature>, bool) {
    let mut encounter: IndexMap<FontSignature, usize> =
        fonts.iter().map(|f| (*f, 0)).collect();
    let mut valid: IndexMap<FontSignature, usize> = fonts.iter().map(|f| (*f, 0)).collect();
    let mut will_be: IndexMap<FontSignature, usize> = fonts.iter().map(|f| (*f, 0)).collect();

    for page in pages {
        for e in 0..page.len() {
            let Some(font) = page.get(e).and_then(Element::font) else {
                continue;
            };
            if text_fonts.contains(&font) || !encounter.contains_key(&font) {
                continue;
            }
            let (_, next) = next_font(page, e);
            let Some(next) = next else {
                continue;
            };
            *encounter.get_mut(&font).unwrap() += 1;
            if text_fonts.contains(&next) {
                *valid.get_mut(&font).unwrap() += 1;
            } else if has_text_between(page, e, text_fonts) {
                *will_be.get_mut(&font).unwrap() += 1;
            }
        }
    }

    // A signature that only ever closes a page (nothing after it, ever)
    // cannot be judged; treat it as body.
    if encounter.values().min().copied() == Some(0) {
        let demoted: Vec<FontSignature> = fonts
            .iter()
            .filter(|f| encounter[*f] == 0)
            .copied()
            .collect();
        fonts.retain(|f| !demoted.contains(f));
        return (demoted, fonts, false);
    }

    // Promote the fully-valid candidate with the fewest occurrences: the
    // rarest heading is the most nested one.
    let mut best: Option<(usize, usize)> = None;
    for (i, font) in fonts.iter().enumerate() {
        let count = encounter[font];
        if count == valid[font] && best.is_none_or(|(_, c)| count < c) {
            best = Some((i, count));
        }
    }
    if let Some((i, _)) = best {
        let font = fonts.remove(i);
        return (vec![font], fonts, true);
    }

    // Nothing fully valid: some body text wears an odd font. Demote the
    // candidates least likely to ever become valid.
    let min_valid = fonts.iter().map(|f| valid[f]).min().unwrap_or(0);
    let candidates: Vec<FontSignature> = fonts
        .iter()
        .filter(|f| valid[*f] == min_valid)
        .copied()
        .collect();
    let min_will_be = candidates.iter().map(|f| will_be[f]).min().unwrap_or(0);
    let demoted: Vec<FontSignature> = candidates
        .into_iter()
        .filter(|f| will_be[f] == min_will_be)
        .collect();
    fonts.retain(|f| !demoted.contains(f));
    (demoted, fonts, false)
}

/// Elects the body font, decides the title signatures, and assigns each
/// text block its level (or none, for body text).
pub fn classify_titles(pages: &mut Vec<Page>) {
    let mut counts: IndexMap<FontSignature, usize> = IndexMap::new();
    for page in pages.iter() {
        for elem in page.iter() {
            if let Some(font) = elem.font() {
                *counts.entry(font).or_insert(0) += 1;
            }
        }
    }
    if counts.is_empty() {
        return;
    }

    // The mode signature; first-seen wins a tie.
    let mut body = *counts.keys().next().unwrap();
    let mut best = 0usize;
    for (font, count) in &counts {
        if *count > best {
            best = *count;
            body = *font;
        }
    }

    let mut text_fonts: Vec<FontSignature> = Vec::new();
    let mut other_fonts: Vec<FontSignature> = Vec::new();
    for font in counts.keys() {
        if font.is_reduced_match(&body) || font.is_smaller_than(&body) {
            text_fonts.push(*font);
        } else {
            other_fonts.push(*font);
        }
    }
    text_fonts.push(FontSignature::Table);

    let mut title_fonts: Vec<FontSignature> = Vec::new();
    while !other_fonts.is_empty() {
        let (decided, remaining, is_title) = next_title_font(pages, other_fonts, &text_fonts);
        if is_title {
            title_fonts.extend(decided.iter().copied());
        }
        text_fonts.extend(decided);
        other_fonts = remaining;
    }
    // First promoted = most nested = highest numeric level.
    title_fonts.reverse();
    log::debug!("classified {} title level(s)", title_fonts.len());

    for page in pages.iter_mut() {
        for elem in page.iter_mut() {
            if let Some(block) = elem.as_text_mut() {
                block.title_level = block
                    .font
                    .and_then(|f| title_fonts.iter().position(|t| *t == f));
            }
        }
    }
}

const MAX_NORMALIZE_PASSES: usize = 64;

/// First level-skip in document order: a title deeper than the current
/// nesting allows. Returns (wrong level, expected level).
fn find_inconsistency(pages: &[Page]) -> (usize, Option<usize>) {
    let mut nest = 0usize;
    let mut wrong = usize::MAX;
    let mut expected = None;
    for page in pages {
        for elem in page.iter() {
            let Some(level) = elem.as_text().and_then(|b| b.title_level) else {
                continue;
            };
            if level < wrong && level > nest {
                wrong = level;
                expected = Some(nest);
            }
            nest = level + 1;
        }
    }
    (wrong, expected)
}

/// Rewrites level skips to a fixed point. Fixing one inconsistency can
/// surface the next, so this loops, bounded by a hard pass cap and a
/// no-progress check.
pub fn normalize_title_levels(pages: &mut Vec<Page>) {
    let mut last: Option<(usize, usize)> = None;
    for _ in 0..MAX_NORMALIZE_PASSES {
        let (wrong, expected) = find_inconsistency(pages);
        let Some(expected) = expected else {
            return;
        };
        if last == Some((wrong, expected)) {
            log::warn!("title normalization made no progress at level {wrong}");
            return;
        }
        last = Some((wrong, expected));

        for page in pages.iter_mut() {
            for elem in page.iter_mut() {
                if let Some(block) = elem.as_text_mut() {
                    if block.title_level == Some(wrong) {
                        block.title_level = Some(expected);
                    }
                }
            }
        }
    }
    log::warn!("title normalization hit the pass cap");
}
