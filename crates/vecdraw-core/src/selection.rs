//! Selection and hover state shared by tools and draw code.

use crate::shapes::ShapeId;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Selected shapes plus the hovered shape.
///
/// Kept apart from shape data: the scene graph never stores whether a shape
/// is selected.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<ShapeId>,
    hovered: Option<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a shape is selected.
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    /// Get all selected shape IDs.
    pub fn selected(&self) -> &HashSet<ShapeId> {
        &self.selected
    }

    pub fn selected_mut(&mut self) -> &mut HashSet<ShapeId> {
        &mut self.selected
    }

    /// The only selected shape, if exactly one is selected.
    pub fn single(&self) -> Option<ShapeId> {
        if self.selected.len() == 1 {
            self.selected.iter().next().copied()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Select a single shape (clears other selections).
    pub fn select(&mut self, id: ShapeId) {
        self.selected.clear();
        self.selected.insert(id);
    }

    /// Add a shape to the selection. Returns whether it was newly added.
    pub fn add(&mut self, id: ShapeId) -> bool {
        self.selected.insert(id)
    }

    /// Remove a shape from the selection.
    pub fn deselect(&mut self, id: ShapeId) -> bool {
        self.selected.remove(&id)
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the selection with a set of shapes.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.selected.clear();
        self.selected.extend(ids);
    }

    /// Get the hovered shape ID (if any).
    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    /// Set the hovered shape. Returns whether it changed.
    pub fn set_hovered(&mut self, id: Option<ShapeId>) -> bool {
        if self.hovered == id {
            return false;
        }
        self.hovered = id;
        true
    }

    /// Drop handles that no longer exist in the arena.
    pub fn retain(&mut self, mut live: impl FnMut(ShapeId) -> bool) {
        self.selected.retain(|&id| live(id));
        if self.hovered.is_some_and(|id| !live(id)) {
            self.hovered = None;
        }
    }
}

/// Selection guarded for read-then-write sequences.
///
/// Hover scans and drag handling both mutate the selection; every sequence
/// that reads and then writes it runs under one [`SelectionSurface::lock`].
#[derive(Debug, Default)]
pub struct SelectionSurface {
    inner: Mutex<Selection>,
}

impl SelectionSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the scoped selection region. A poisoned lock is recovered:
    /// selection state is always structurally valid.
    pub fn lock(&self) -> MutexGuard<'_, Selection> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current selection, for draw code.
    pub fn snapshot(&self) -> Selection {
        self.lock().clone()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.lock().is_selected(id)
    }

    pub fn hovered(&self) -> Option<ShapeId> {
        self.lock().hovered()
    }
}
