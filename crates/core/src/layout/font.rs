//! Font signatures for title/body classification.
//!
//! A signature condenses everything the title classifier needs to know
//! about how a text block is set: rounded size, weight, slant,
//! underline, capitalization, whether the text opens like a numbered
//! heading, and the rounded left alignment. Two blocks are "the same
//! font" iff their signatures compare equal; the reduced comparison
//! merges near-duplicate body signatures that differ only in slant or
//! alignment.

use once_cell::sync::Lazy;
use regex::Regex;

/// Measurement units that must not be mistaken for heading bodies when
/// they trail an ordinal ("2.5 mm" is a measurement, not a title).
const UNITS: &[&str] = &["m", "cm", "km", "mm", "nm", "kg", "°C", "°K", "°F"];

/// Signature of a text block's dominant font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextFont {
    /// Font size rounded to the nearest point.
    pub size: i64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// The whole block is upper-case.
    pub caps: bool,
    /// The block text opens like a numbered heading.
    pub title_like: bool,
    /// A numbered heading whose body itself contains separators.
    pub sep_in_title: bool,
    /// Rounded left edge of the block.
    pub alignment: i64,
}

/// Font classification tag. Tables carry the dedicated zero-field
/// variant and always count as body content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSignature {
    Text(TextFont),
    Table,
}

impl FontSignature {
    /// Reduced comparison used to fold near-duplicate body signatures:
    /// size, weight, caps, underline and title-likeness must agree;
    /// slant and alignment may differ.
    pub fn is_reduced_match(&self, other: &FontSignature) -> bool {
        match (self, other) {
            (FontSignature::Table, FontSignature::Table) => true,
            (FontSignature::Text(a), FontSignature::Text(b)) => {
                a.size == b.size
                    && a.bold == b.bold
                    && a.caps == b.caps
                    && a.underline == b.underline
                    && a.title_like == b.title_like
            }
            _ => false,
        }
    }

    /// Strictly smaller in size than `other`. Smaller fonts are never
    /// titles. Table signatures have no size and never compare smaller.
    pub fn is_smaller_than(&self, other: &FontSignature) -> bool {
        match (self, other) {
            (FontSignature::Text(a), FontSignature::Text(b)) => a.size < b.size,
            _ => false,
        }
    }
}

// Ordinal prefixes a numbered heading can open with. Each pattern
// captures the remainder after the ordinal; the remainder is then
// checked against UNIT_REMAINDER separately (the regex engine has no
// look-ahead, and a two-step check reads better anyway).
static TITLE_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Digits or one/two uppercase letters, dot-separated, ending in digits.
        r"(?s)^([0-9A-Z]{1,2}\.)*[0-9]{1,2}\.?\s+(\S.*)$",
        // Dot-terminated groups only (covers the uppercase-letter case).
        r"(?s)^([0-9A-Z]{1,2}\.)+\s+(\S.*)$",
        // Leading number up to three digits long.
        r"(?s)^[0-9]{1,3}(\.[0-9A-Z]{1,2})*\.?\s+(\S.*)$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static UNIT_REMAINDER: Lazy<Regex> = Lazy::new(|| {
    let units = UNITS
        .iter()
        .map(|u| regex::escape(u))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?s)^\.*({units})\.*(\n.+)?$")).unwrap()
});

static NO_SEP_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^\S+\s+[^.]+$").unwrap());

/// Detects whether text opens like a numbered heading ("2.1 Scope",
/// "A. Introduction"), excluding measurements ("2.5 mm of steel").
pub fn is_like_title(text: &str) -> bool {
    for prefix in TITLE_PREFIXES.iter() {
        if let Some(caps) = prefix.captures(text) {
            let rest = caps.get(caps.len() - 1).map(|m| m.as_str()).unwrap_or("");
            if !UNIT_REMAINDER.is_match(rest) {
                return true;
            }
        }
    }
    false
}

/// A numbered heading whose body still contains dot separators after the
/// ordinal; such text is often a reference rather than a real heading.
pub fn has_sep_in_title(text: &str) -> bool {
    is_like_title(text) && !NO_SEP_BODY.is_match(text)
}
