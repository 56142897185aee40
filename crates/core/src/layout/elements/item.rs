//! Element - enum to represent any page-level layout object.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::graphics::Rule;
use super::table::Table;
use super::textbox::TextBlock;
use crate::utils::{HasBBox, Rect};

/// Macro to dispatch a method call to the appropriate enum variant.
macro_rules! dispatch_element {
    ($self:ident, $method:ident) => {
        match $self {
            Element::Text(b) => b.$method(),
            Element::Rule(r) => r.$method(),
            Element::Table(t) => t.$method(),
            Element::Other(c) => c.$method(),
        }
    };
}

/// Any element that can appear on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Text(TextBlock),
    Rule(Rule),
    Table(Table),
    Other(Component),
}

impl Element {
    pub fn is_text(&self) -> bool {
        matches!(self, Element::Text(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Element::Table(_))
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Element::Text(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Element::Text(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Element::Rule(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Element::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Element::Table(t) => Some(t),
            _ => None,
        }
    }

    /// The classification signature, for elements that carry one.
    pub fn font(&self) -> Option<crate::layout::font::FontSignature> {
        match self {
            Element::Text(b) => b.font,
            Element::Table(_) => Some(crate::layout::font::FontSignature::Table),
            _ => None,
        }
    }

    pub fn set_bbox(&mut self, bbox: Rect) {
        match self {
            Element::Text(b) => b.component.set_bbox(bbox),
            Element::Rule(r) => r.component.set_bbox(bbox),
            Element::Table(t) => t.component.set_bbox(bbox),
            Element::Other(c) => c.set_bbox(bbox),
        }
    }

    pub fn component(&self) -> Component {
        Component::new(self.bbox())
    }

    /// Discriminant equality: two elements are of the same kind.
    pub fn same_kind(&self, other: &Element) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl HasBBox for Element {
    fn x0(&self) -> f64 {
        dispatch_element!(self, x0)
    }
    fn y0(&self) -> f64 {
        dispatch_element!(self, y0)
    }
    fn x1(&self) -> f64 {
        dispatch_element!(self, x1)
    }
    fn y1(&self) -> f64 {
        dispatch_element!(self, y1)
    }
}
