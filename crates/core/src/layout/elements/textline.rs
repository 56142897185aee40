//! A run of glyphs on one baseline.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::glyph::Glyph;
use super::impl_has_bbox_delegate;
use crate::utils::{HasBBox, INF_F64};

/// One line of text. Glyph order is the analyzer's left-to-right order;
/// spaces are real glyphs, there are no virtual end-of-line markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(flatten)]
    pub(crate) component: Component,
    glyphs: Vec<Glyph>,
}

impl TextLine {
    pub fn new() -> Self {
        Self {
            component: Component::new((INF_F64, INF_F64, -INF_F64, -INF_F64)),
            glyphs: Vec::new(),
        }
    }

    /// Builds a line from glyphs, deriving the bounding box.
    pub fn from_glyphs(glyphs: Vec<Glyph>) -> Self {
        let mut line = Self::new();
        for glyph in glyphs {
            line.add(glyph);
        }
        line
    }

    /// Appends a glyph, expanding the line's bounding box.
    pub fn add(&mut self, glyph: Glyph) {
        self.component.expand(glyph.bbox());
        self.glyphs.push(glyph);
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn get_text(&self) -> String {
        self.glyphs.iter().map(|g| g.get_text()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.glyphs.is_empty() || self.get_text().trim().is_empty()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Takes all glyphs out of this line, leaving it empty.
    pub(crate) fn take_glyphs(&mut self) -> Vec<Glyph> {
        std::mem::take(&mut self.glyphs)
    }

    /// Splices foreign glyphs onto the end of this line, expanding the box.
    pub(crate) fn splice(&mut self, glyphs: Vec<Glyph>) {
        for glyph in glyphs {
            self.add(glyph);
        }
    }

    /// Drops glyphs for which `pred` returns true, re-deriving the box.
    pub fn remove_glyphs_where(&mut self, pred: impl Fn(&Glyph) -> bool) {
        self.glyphs.retain(|g| !pred(g));
        self.refresh_bbox();
    }

    /// Re-derives the bounding box from the current glyphs. A line left
    /// without glyphs keeps its previous box, like any other container
    /// whose children vanished.
    pub fn refresh_bbox(&mut self) {
        if self.glyphs.is_empty() {
            return;
        }
        let mut component = Component::new((INF_F64, INF_F64, -INF_F64, -INF_F64));
        for glyph in &self.glyphs {
            component.expand(glyph.bbox());
        }
        self.component = component;
    }
}

impl Default for TextLine {
    fn default() -> Self {
        Self::new()
    }
}

impl_has_bbox_delegate!(TextLine, component);
