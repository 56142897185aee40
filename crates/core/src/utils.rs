//! Miscellaneous routines shared by every stage.
//!
//! Provides the basic geometric types and predicates (rectangles,
//! tolerance comparisons, the `HasBBox` trait) plus the OCR-tolerant
//! text normalization used when matching recurring page furniture.

use once_cell::sync::Lazy;
use regex::Regex;

/// Floating-point infinity for bounding box seeding.
pub const INF_F64: f64 = f64::MAX;

/// A rectangle defined by (x0, y0, x1, y1) where (x0, y0) is the
/// bottom-left corner and (x1, y1) the top-right, in page coordinates.
pub type Rect = (f64, f64, f64, f64);

/// Compares two floats for approximate equality within `abs_tol`.
#[inline]
pub fn approx_eq(a: f64, b: f64, abs_tol: f64) -> bool {
    (a - b).abs() <= abs_tol
}

/// Returns true if two coordinate spans match within `abs_tol`.
#[inline]
pub fn is_same_span(a: (f64, f64), b: (f64, f64), abs_tol: f64) -> bool {
    approx_eq(a.0, b.0, abs_tol) && approx_eq(a.1, b.1, abs_tol)
}

/// Returns true if two rectangles sit at the same position within `abs_tol`.
pub fn is_same_rect(a: Rect, b: Rect, abs_tol: f64) -> bool {
    approx_eq(a.0, b.0, abs_tol)
        && approx_eq(a.1, b.1, abs_tol)
        && approx_eq(a.2, b.2, abs_tol)
        && approx_eq(a.3, b.3, abs_tol)
}

/// Trait for objects that have a bounding box.
pub trait HasBBox {
    fn x0(&self) -> f64;
    fn y0(&self) -> f64;
    fn x1(&self) -> f64;
    fn y1(&self) -> f64;

    fn bbox(&self) -> Rect {
        (self.x0(), self.y0(), self.x1(), self.y1())
    }

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.y1() - self.y0()
    }
}

static CONFUSABLE_ONES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[1IiLl]").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Normalizes text for recurring-content matching:
/// * collapses whitespace runs into single spaces,
/// * maps `1`, `I`, `i`, `L`, `l` to `1` (common OCR confusions),
/// * replaces digit runs with a `<#>` placeholder so page counters match.
pub fn normalize_match_text(s: &str) -> String {
    let ones = CONFUSABLE_ONES.replace_all(s, "1");
    let numbered = DIGIT_RUN.replace_all(&ones, "<#>");
    numbered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Python-style uppercase check: at least one cased character, and every
/// cased character is uppercase.
pub fn is_upper_text(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
