//! A single positioned character.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::impl_has_bbox_delegate;
use crate::utils::Rect;

/// One character placed on the page by the layout analyzer, with the
/// font information needed for signature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    #[serde(flatten)]
    pub(crate) component: Component,
    text: String,
    fontname: String,
    size: f64,
}

impl Glyph {
    pub fn new(bbox: Rect, text: &str, fontname: &str, size: f64) -> Self {
        Self {
            component: Component::new(bbox),
            text: text.to_string(),
            fontname: fontname.to_string(),
            size,
        }
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn fontname(&self) -> &str {
        &self.fontname
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// True if every character of the glyph text is alphanumeric.
    pub fn is_alnum(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c.is_alphanumeric())
    }

    pub fn is_whitespace(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c.is_whitespace())
    }
}

impl_has_bbox_delegate!(Glyph, component);
