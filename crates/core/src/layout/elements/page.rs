//! Page container.

use serde::{Deserialize, Serialize};

use super::item::Element;
use crate::utils::HasBBox;

/// One page of the document: geometry plus the ordered element list.
/// Order is nominally top-to-bottom but is only trustworthy once the
/// column reconciler has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_id: i32,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotate: f64,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(page_id: i32, width: f64, height: f64) -> Self {
        Self {
            page_id,
            width,
            height,
            rotate: 0.0,
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.elements.iter_mut()
    }

    pub fn get(&self, idx: usize) -> Option<&Element> {
        self.elements.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Element> {
        self.elements.get_mut(idx)
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn insert(&mut self, idx: usize, element: Element) {
        self.elements.insert(idx, element);
    }

    /// Removes the elements at the given indices (any order).
    pub fn remove_indices(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        for idx in sorted.into_iter().rev() {
            self.elements.remove(idx);
        }
    }

    /// Removes every element for which `pred` returns true.
    pub fn remove_where(&mut self, pred: impl Fn(&Element) -> bool) {
        self.elements.retain(|e| !pred(e));
    }

    /// Re-inserts the elements at the given indices at the position their
    /// (possibly updated) y-coordinate calls for: before the first element
    /// whose top edge lies below theirs.
    pub fn reposition(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        let mut taken = Vec::with_capacity(sorted.len());
        for idx in sorted.iter().rev() {
            taken.push(self.elements.remove(*idx));
        }
        taken.reverse();
        for element in taken {
            let pos = self
                .elements
                .iter()
                .position(|e| element.y1() > e.y1())
                .unwrap_or(self.elements.len());
            self.elements.insert(pos, element);
        }
    }

    /// An empty page with the same identity and geometry, used when a
    /// page's content is dropped but its position must survive.
    pub fn cleared(&self) -> Page {
        Page {
            page_id: self.page_id,
            width: self.width,
            height: self.height,
            rotate: self.rotate,
            elements: Vec::new(),
        }
    }
}
