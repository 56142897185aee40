//! Drawing primitives: lines and rectangles.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::impl_has_bbox_delegate;
use crate::utils::Rect;

/// Which drawing primitive produced this rule. Analyzers emit thin
/// rectangles and stroked lines interchangeably, so both feed the same
/// table/underline probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Line,
    Rect,
}

/// A line or rectangle primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(flatten)]
    pub(crate) component: Component,
    /// Serialized as `rule_kind`: the page element envelope already uses
    /// `kind` as its variant tag.
    #[serde(rename = "rule_kind")]
    pub kind: RuleKind,
}

impl Rule {
    pub fn new(kind: RuleKind, bbox: Rect) -> Self {
        Self {
            component: Component::new(bbox),
            kind,
        }
    }

    pub fn line(bbox: Rect) -> Self {
        Self::new(RuleKind::Line, bbox)
    }

    pub fn rect(bbox: Rect) -> Self {
        Self::new(RuleKind::Rect, bbox)
    }

    pub fn component(&self) -> &Component {
        &self.component
    }
}

impl_has_bbox_delegate!(Rule, component);
