//! Text blocks: groups of text lines.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::impl_has_bbox_delegate;
use super::textline::TextLine;
use crate::layout::font::FontSignature;
use crate::utils::{HasBBox, INF_F64};

/// A group of text lines, as delivered by the analyzer's paragraph
/// grouping. Carries the optional classification fields filled in by the
/// font and title stages; those never travel across the serialization
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(flatten)]
    pub(crate) component: Component,
    lines: Vec<TextLine>,
    #[serde(skip)]
    pub font: Option<FontSignature>,
    #[serde(skip)]
    pub title_level: Option<usize>,
}

impl TextBlock {
    pub fn new() -> Self {
        Self {
            component: Component::new((INF_F64, INF_F64, -INF_F64, -INF_F64)),
            lines: Vec::new(),
            font: None,
            title_level: None,
        }
    }

    pub fn from_lines(lines: Vec<TextLine>) -> Self {
        let mut block = Self::new();
        for line in lines {
            block.add(line);
        }
        block
    }

    /// Appends a line, expanding the block's bounding box.
    pub fn add(&mut self, line: TextLine) {
        self.component.expand(line.bbox());
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [TextLine] {
        &mut self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Block text: line texts joined with newlines.
    pub fn get_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.get_text());
        }
        out
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.is_blank())
    }

    /// Removes the lines at the given indices (any order) and re-derives
    /// the bounding box.
    pub fn remove_lines(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        for idx in sorted.into_iter().rev() {
            self.lines.remove(idx);
        }
        self.refresh_bbox();
    }

    /// Drops lines for which `pred` returns true, re-deriving the box.
    pub fn remove_lines_where(&mut self, pred: impl Fn(&TextLine) -> bool) {
        self.lines.retain(|l| !pred(l));
        self.refresh_bbox();
    }

    /// Moves all lines out of this block.
    pub(crate) fn take_lines(&mut self) -> Vec<TextLine> {
        std::mem::take(&mut self.lines)
    }

    /// Re-derives the bounding box from the current lines. Must be called
    /// after any mutation of the line list; a block left without lines
    /// keeps its previous box and is swept by the caller.
    pub fn refresh_bbox(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let mut component = Component::new((INF_F64, INF_F64, -INF_F64, -INF_F64));
        for line in &self.lines {
            component.expand(line.bbox());
        }
        self.component = component;
    }
}

impl Default for TextBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl_has_bbox_delegate!(TextBlock, component);
