//! Pipeline configuration.
//!
//! Every stage tunable lives here, with the documented defaults. A
//! configuration is validated once, before any document is processed;
//! invalid margin combinations are construction-time errors, never
//! runtime failures.

use crate::error::{Result, StructError};

/// Parameters for the supplementary cleaning passes.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningParams {
    /// Minimum summed width/height difference for a page to count as
    /// off-size relative to the document's majority page size.
    pub size_margin: f64,

    /// Fraction of lines that must end in a page number for a page to be
    /// considered table-of-contents material.
    pub toc_digit_ratio: f64,
}

impl Default for CleaningParams {
    fn default() -> Self {
        Self {
            size_margin: 10.0,
            toc_digit_ratio: 0.6,
        }
    }
}

/// Parameters for header/footer detection.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderParams {
    /// Margins (top, right, bottom, left) as fractions of page height and
    /// width; elements outside the inner box are header material.
    pub margins: [f64; 4],
}

impl Default for HeaderParams {
    fn default() -> Self {
        Self {
            margins: [0.25, 0.2, 0.2, 0.2],
        }
    }
}

/// Parameters for column and line reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnParams {
    /// Band half-width around the page midline, as a fraction of page
    /// width. Elements straddling the band are full-width.
    pub middle_margin: f64,

    /// Tolerance when comparing line heights for the same-height merge.
    pub line_tolerance: f64,

    /// Minimum horizontal gap between two same-height lines for the pair
    /// to count as genuine separate columns.
    pub min_column_gap: f64,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self {
            middle_margin: 0.05,
            line_tolerance: 1.0,
            min_column_gap: 13.5,
        }
    }
}

/// Parameters for table boundary detection.
#[derive(Debug, Clone, PartialEq)]
pub struct TableParams {
    /// Maximum thickness for a rule to count as a line; also the
    /// crossing-overlap tolerance.
    pub rule_margin: f64,

    /// Maximum x-extent difference between tables on consecutive pages
    /// for them to merge across the page break.
    pub merge_margin: f64,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            rule_margin: 1.0,
            merge_margin: 1.0,
        }
    }
}

/// Parameters for paragraph reassembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphParams {
    /// Relative inter-line gap under which two blocks are close enough to
    /// be one paragraph (same meaning as the analyzer's line margin).
    pub line_margin: f64,

    /// Fraction of the widest observed text extent a line must reach to
    /// count as hitting the end of its area.
    pub end_area_ratio: f64,

    /// Fraction of single-line blocks above which the one-liner repair
    /// kicks in.
    pub one_liner_ratio: f64,

    /// Fraction of the widest extent a line must stretch to for the
    /// one-liner repair to treat it as a full line.
    pub full_width_ratio: f64,

    /// Tolerance when comparing the left edges of consecutive blocks.
    pub indent_tolerance: f64,
}

impl Default for ParagraphParams {
    fn default() -> Self {
        Self {
            line_margin: 0.75,
            end_area_ratio: 0.75,
            one_liner_ratio: 0.9,
            full_width_ratio: 0.95,
            indent_tolerance: 1.0,
        }
    }
}

/// Parameters for font signature extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct FontParams {
    /// Maximum rule height to probe as an underline, and the maximum gap
    /// between the rule and the text above it.
    pub underline_margin: f64,
}

impl Default for FontParams {
    fn default() -> Self {
        Self {
            underline_margin: 1.5,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub cleaning: CleaningParams,
    pub headers: HeaderParams,
    pub columns: ColumnParams,
    pub tables: TableParams,
    pub paragraphs: ParagraphParams,
    pub fonts: FontParams,

    /// Group bulleted runs into single paragraphs during assembly.
    pub group_bullets: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cleaning: CleaningParams::default(),
            headers: HeaderParams::default(),
            columns: ColumnParams::default(),
            tables: TableParams::default(),
            paragraphs: ParagraphParams::default(),
            fonts: FontParams::default(),
            group_bullets: true,
        }
    }
}

impl PipelineConfig {
    /// Checks every tunable, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        let [top, right, bottom, left] = self.headers.margins;
        for m in self.headers.margins {
            if !(0.0..=1.0).contains(&m) {
                return Err(StructError::Config(format!(
                    "header margin must be a ratio in [0, 1], got {m}"
                )));
            }
        }
        if top + bottom > 1.0 {
            return Err(StructError::Config(format!(
                "top and bottom header margins overlap: {top} + {bottom} > 1"
            )));
        }
        if left + right > 1.0 {
            return Err(StructError::Config(format!(
                "left and right header margins overlap: {left} + {right} > 1"
            )));
        }
        if !(0.0..=1.0).contains(&self.columns.middle_margin) {
            return Err(StructError::Config(format!(
                "middle margin must be a ratio in [0, 1], got {}",
                self.columns.middle_margin
            )));
        }
        if !(0.0..=1.0).contains(&self.paragraphs.one_liner_ratio) {
            return Err(StructError::Config(format!(
                "one-liner ratio must be in [0, 1], got {}",
                self.paragraphs.one_liner_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.cleaning.toc_digit_ratio) {
            return Err(StructError::Config(format!(
                "TOC digit ratio must be in [0, 1], got {}",
                self.cleaning.toc_digit_ratio
            )));
        }
        if self.tables.rule_margin < 0.0 {
            return Err(StructError::Config(format!(
                "table rule margin must be non-negative, got {}",
                self.tables.rule_margin
            )));
        }
        Ok(())
    }
}
