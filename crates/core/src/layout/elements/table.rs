//! Table regions and externally-supplied cell grids.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::impl_has_bbox_delegate;
use crate::utils::{INF_F64, Rect};

/// Rows-by-columns cell text, as returned by the external cell
/// extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    pub rows: Vec<Vec<String>>,
}

impl CellGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn n_columns(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Appends another grid's rows (a page-break continuation).
    pub fn append(&mut self, other: CellGrid) {
        self.rows.extend(other.rows);
    }
}

/// A detected table region. Without a grid it renders downstream as a
/// placeholder marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(flatten)]
    pub(crate) component: Component,
    pub grid: Option<CellGrid>,
}

impl Table {
    pub fn new() -> Self {
        Self {
            component: Component::new((INF_F64, INF_F64, -INF_F64, -INF_F64)),
            grid: None,
        }
    }

    pub fn from_bbox(bbox: Rect) -> Self {
        Self {
            component: Component::new(bbox),
            grid: None,
        }
    }

    /// Grows the region to cover one more constituent segment.
    pub fn absorb(&mut self, bbox: Rect) {
        self.component.expand(bbox);
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn n_columns(&self) -> Option<usize> {
        self.grid.as_ref().map(|g| g.n_columns())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl_has_bbox_delegate!(Table, component);
