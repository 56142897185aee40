//! Page/element data model shared by every reclassification stage.

pub mod elements;
pub mod font;

pub use elements::{
    CellGrid, Component, Element, Glyph, Page, Rule, RuleKind, Table, TextBlock, TextLine,
};
pub use font::{FontSignature, TextFont};
