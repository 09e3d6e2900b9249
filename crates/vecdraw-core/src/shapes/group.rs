//! Group shape for combining multiple shapes.

use super::{Property, ShapeId};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// An ordered collection of child shapes that moves and selects as one unit.
/// Groups can contain other groups.
///
/// The aggregate of the children's properties is computed on first use and
/// dropped whenever the child list changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupShape {
    shapes: Vec<ShapeId>,
    #[serde(skip)]
    properties_cache: OnceCell<Vec<Property>>,
}

impl GroupShape {
    pub fn new(shapes: Vec<ShapeId>) -> Self {
        Self {
            shapes,
            properties_cache: OnceCell::new(),
        }
    }

    /// Child shapes in order.
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    /// Replace the child list. Returns whether it changed.
    pub fn set_shapes(&mut self, shapes: Vec<ShapeId>) -> bool {
        if self.shapes == shapes {
            return false;
        }
        self.shapes = shapes;
        self.invalidate();
        true
    }

    pub fn add_shape(&mut self, id: ShapeId) {
        self.shapes.push(id);
        self.invalidate();
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|&s| s != id);
        let changed = self.shapes.len() != before;
        if changed {
            self.invalidate();
        }
        changed
    }

    pub(crate) fn replace_shape(&mut self, old: ShapeId, new: ShapeId) -> bool {
        let mut changed = false;
        for s in &mut self.shapes {
            if *s == old {
                *s = new;
                changed = true;
            }
        }
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Aggregated child properties, computed with `collect` on first access.
    pub fn shapes_properties(&self, collect: impl FnOnce(&[ShapeId]) -> Vec<Property>) -> &[Property] {
        self.properties_cache.get_or_init(|| collect(&self.shapes))
    }

    pub fn is_properties_cached(&self) -> bool {
        self.properties_cache.get().is_some()
    }

    fn invalidate(&mut self) {
        self.properties_cache = OnceCell::new();
    }
}
