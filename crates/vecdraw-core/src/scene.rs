//! Scene graph storage and the operations every shape supports.
//!
//! All shapes live in one slot-map arena. Layers hold ordered handles; the
//! `current` layer is the persistent document content and the `working`
//! layer holds tool previews.

use crate::shapes::{GroupShape, Property, Shape, ShapeId, ShapeKind, ShapeState};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Which layer a container operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Persistent, undo-recorded document content.
    Current,
    /// Transient previews of in-progress gestures.
    Working,
}

/// An ordered container of shapes (back to front).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    shapes: Vec<ShapeId>,
    pub is_visible: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
            is_visible: true,
        }
    }

    /// Shapes in z-order (back to front).
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains(&id)
    }

    pub fn position(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|&s| s == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Append on top. Adding a shape twice is a no-op.
    pub fn add(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.shapes.push(id);
        true
    }

    /// Insert at a z-index (clamped to the layer length).
    pub fn insert(&mut self, index: usize, id: ShapeId) -> bool {
        if self.contains(id) {
            return false;
        }
        let index = index.min(self.shapes.len());
        self.shapes.insert(index, id);
        true
    }

    /// Remove a shape. Returns its former index.
    pub fn remove(&mut self, id: ShapeId) -> Option<usize> {
        let index = self.position(id)?;
        self.shapes.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone)]
struct SceneSnapshot {
    shapes: SlotMap<ShapeId, Shape>,
    current: Layer,
}

/// The shape arena plus its layers and undo history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    shapes: SlotMap<ShapeId, Shape>,
    current: Layer,
    working: Layer,
    #[serde(skip)]
    undo_stack: Vec<SceneSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<SceneSnapshot>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            shapes: SlotMap::with_key(),
            current: Layer::new("Layer1"),
            working: Layer::new("Working"),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    // ---- arena -------------------------------------------------------------

    /// Insert a shape. Slot points without an owner that are not placed on a
    /// layer are adopted: their owner becomes the new shape and they are
    /// marked as connectors.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let points = shape.direct_points();
        let children: Vec<ShapeId> = shape
            .kind
            .as_group()
            .map(|g| g.shapes().to_vec())
            .unwrap_or_default();
        let id = self.shapes.insert(shape);
        for p in points {
            if self.current.contains(p) || self.working.contains(p) {
                continue;
            }
            if let Some(point) = self.shapes.get_mut(p) {
                if point.owner().is_none() {
                    point.set_owner(Some(id));
                    point.state_mut().mark_connector();
                }
            }
        }
        for child in children {
            if let Some(child) = self.shapes.get_mut(child) {
                child.set_owner(Some(id));
                child.state_mut().remove(ShapeState::STANDALONE);
            }
        }
        id
    }

    /// Insert a free point (no owner, standalone until adopted).
    pub fn insert_point(&mut self, position: Point) -> ShapeId {
        self.shapes.insert(Shape::point(position))
    }

    /// Make `owner` the owner of a point and flag it as a connector.
    pub fn adopt(&mut self, owner: ShapeId, point: ShapeId) -> bool {
        let Some(p) = self.shapes.get_mut(point) else {
            return false;
        };
        let changed = p.set_owner(Some(owner));
        p.state_mut().mark_connector() || changed
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Number of arena entries (shapes and points alike).
    pub fn arena_len(&self) -> usize {
        self.shapes.len()
    }

    /// Iterate over every arena entry.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter()
    }

    /// Position of a point shape.
    pub fn position(&self, id: ShapeId) -> Option<Point> {
        self.shapes.get(id).and_then(Shape::position)
    }

    /// Move a point to a location. Returns whether it changed.
    pub fn set_position(&mut self, id: ShapeId, position: Point) -> bool {
        self.shapes
            .get_mut(id)
            .and_then(|s| s.kind.as_point_mut())
            .map(|p| p.set_position(position))
            .unwrap_or(false)
    }

    // ---- layers ------------------------------------------------------------

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Current => &self.current,
            LayerKind::Working => &self.working,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Current => &mut self.current,
            LayerKind::Working => &mut self.working,
        }
    }

    pub fn current(&self) -> &Layer {
        &self.current
    }

    pub fn working(&self) -> &Layer {
        &self.working
    }

    /// Move a shape from the working layer to the current layer.
    pub fn commit(&mut self, id: ShapeId) -> bool {
        if !self.shapes.contains_key(id) {
            return false;
        }
        self.working.remove(id);
        self.current.add(id)
    }

    // ---- undo --------------------------------------------------------------

    fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            shapes: self.shapes.clone(),
            current: self.current.clone(),
        }
    }

    fn restore(&mut self, snapshot: SceneSnapshot) {
        self.shapes = snapshot.shapes;
        self.current = snapshot.current;
        self.working.clear();
        self.prune_unreachable();
    }

    /// Drop arena entries no longer reachable from the current layer.
    ///
    /// Snapshots taken mid-gesture hold the working shape off-layer; left in
    /// the arena it would still show up in `owners_of`.
    fn prune_unreachable(&mut self) {
        let mut reachable = HashSet::new();
        let mut stack = self.current.shapes().to_vec();
        while let Some(id) = stack.pop() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(shape) = self.shapes.get(id) {
                stack.extend(parts_of(shape));
            }
        }
        let before = self.shapes.len();
        self.shapes.retain(|id, _| reachable.contains(&id));
        if self.shapes.len() < before {
            log::debug!("pruned {} unreachable shape(s)", before - self.shapes.len());
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ---- polymorphic shape operations ---------------------------------------

    /// Every point a shape owns or references, flattened and deduplicated.
    ///
    /// A point returns itself. Groups return their children's points
    /// followed by their own connectors.
    pub fn points(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_points(id, &mut out, &mut seen);
        out
    }

    fn collect_points(&self, id: ShapeId, out: &mut Vec<ShapeId>, seen: &mut HashSet<ShapeId>) {
        let Some(shape) = self.shapes.get(id) else {
            return;
        };
        match &shape.kind {
            ShapeKind::Point(_) => {
                if seen.insert(id) {
                    out.push(id);
                }
            }
            ShapeKind::Group(group) => {
                for &child in group.shapes() {
                    self.collect_points(child, out, seen);
                }
                for &c in shape.connectors() {
                    self.collect_points(c, out, seen);
                }
            }
            _ => {
                for p in shape.direct_points() {
                    self.collect_points(p, out, seen);
                }
            }
        }
    }

    /// Positions of [`Self::points`].
    pub fn point_positions(&self, id: ShapeId) -> Vec<Point> {
        self.points(id).into_iter().filter_map(|p| self.position(p)).collect()
    }

    /// Axis-aligned bounds over a shape's points.
    pub fn bounds(&self, id: ShapeId) -> Option<Rect> {
        let positions = self.point_positions(id);
        let first = *positions.first()?;
        Some(
            positions
                .iter()
                .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
        )
    }

    /// Move several shapes by a delta. Each point moves at most once, even
    /// when it is shared between moved shapes.
    ///
    /// Points and children that are themselves members of `selection` are
    /// skipped: they move through their own selection entry, so a group and
    /// one of its connectors both being selected never double-moves the
    /// connector.
    pub fn move_shapes(&mut self, ids: &[ShapeId], selection: &HashSet<ShapeId>, delta: Vec2) {
        let mut moved = HashSet::new();
        for &id in ids {
            self.move_inner(id, selection, delta, &mut moved);
        }
    }

    fn move_inner(&mut self, id: ShapeId, selection: &HashSet<ShapeId>, delta: Vec2, moved: &mut HashSet<ShapeId>) {
        let Some(shape) = self.shapes.get_mut(id) else {
            return;
        };
        if shape.state().is_locked() {
            return;
        }
        let connectors = shape.connectors().to_vec();
        let parts = match &mut shape.kind {
            ShapeKind::Point(point) => {
                if moved.insert(id) {
                    point.position += delta;
                }
                return;
            }
            ShapeKind::Group(group) => group.shapes().to_vec(),
            kind => kind.slots(),
        };
        for part in parts.into_iter().chain(connectors) {
            if !selection.contains(&part) {
                self.move_inner(part, selection, delta, moved);
            }
        }
    }

    /// Add a shape to a selection set.
    pub fn select(&self, id: ShapeId, selection: &mut HashSet<ShapeId>) {
        if self.shapes.contains_key(id) {
            selection.insert(id);
        }
    }

    /// Remove a shape from a selection set.
    pub fn deselect(&self, id: ShapeId, selection: &mut HashSet<ShapeId>) {
        selection.remove(&id);
    }

    /// Mark every point of a shape selected (handle highlighting).
    pub fn select_points(&self, id: ShapeId, selection: &mut HashSet<ShapeId>) {
        selection.extend(self.points(id));
    }

    pub fn deselect_points(&self, id: ShapeId, selection: &mut HashSet<ShapeId>) {
        for p in self.points(id) {
            selection.remove(&p);
        }
    }

    /// Cloned records of every shape reachable from `roots` (points,
    /// connectors, children), parts before the shapes that use them.
    /// Handles already in `skip` are not collected.
    pub fn subgraph(&self, roots: &[ShapeId], skip: &HashMap<ShapeId, ShapeId>) -> Vec<(ShapeId, Shape)> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for &root in roots {
            self.collect_subgraph(root, skip, &mut seen, &mut out);
        }
        out
    }

    fn collect_subgraph(
        &self,
        id: ShapeId,
        skip: &HashMap<ShapeId, ShapeId>,
        seen: &mut HashSet<ShapeId>,
        out: &mut Vec<(ShapeId, Shape)>,
    ) {
        if skip.contains_key(&id) || !seen.insert(id) {
            return;
        }
        let Some(shape) = self.shapes.get(id) else {
            return;
        };
        for part in parts_of(shape) {
            self.collect_subgraph(part, skip, seen, out);
        }
        out.push((id, shape.clone()));
    }

    /// Allocate copies of records produced by [`Self::subgraph`] (from this
    /// scene or another one). `shared` maps original handles to copies and
    /// is extended with every new allocation.
    ///
    /// Copies get fresh names. A copy's owner is the copy of the original
    /// owner when that was copied too, otherwise the copy of the first
    /// copied shape that referenced it.
    pub fn paste_subgraph(&mut self, records: Vec<(ShapeId, Shape)>, shared: &mut HashMap<ShapeId, ShapeId>) {
        let mut parents: HashMap<ShapeId, ShapeId> = HashMap::new();
        for (old, shape) in &records {
            for part in parts_of(shape) {
                parents.entry(part).or_insert(*old);
            }
        }

        let mut owners = Vec::with_capacity(records.len());
        for (old, mut shape) in records {
            let remap = |id: &mut ShapeId| {
                if let Some(&new) = shared.get(id) {
                    *id = new;
                }
            };
            shape.kind.slots_mut().into_iter().for_each(remap);
            shape.connectors_mut().iter_mut().for_each(remap);
            if let Some(group) = shape.kind.as_group_mut() {
                let children = group
                    .shapes()
                    .iter()
                    .map(|c| shared.get(c).copied().unwrap_or(*c))
                    .collect();
                group.set_shapes(children);
            }
            shape.set_name(format!("{}-{}", shape.kind.name(), uuid::Uuid::new_v4()));
            let owner = shape.owner();
            shape.set_owner(None);
            let new = self.shapes.insert(shape);
            shared.insert(old, new);
            owners.push((new, owner, parents.get(&old).copied()));
        }

        for (new, owner, parent) in owners {
            let resolved = owner.and_then(|o| {
                shared
                    .get(&o)
                    .copied()
                    .or_else(|| parent.and_then(|p| shared.get(&p).copied()))
            });
            if let Some(shape) = self.shapes.get_mut(new) {
                shape.set_owner(resolved);
            }
        }
    }

    /// Deep copy a shape.
    ///
    /// `shared` maps original handles to their copies. A point that was
    /// already copied through the same map is re-shared instead of being
    /// copied again, so connections inside a copied set survive.
    pub fn copy(&mut self, id: ShapeId, shared: &mut HashMap<ShapeId, ShapeId>) -> Option<ShapeId> {
        let records = self.subgraph(&[id], shared);
        self.paste_subgraph(records, shared);
        shared.get(&id).copied()
    }

    /// Deep copy shapes from another scene into this one.
    pub fn import(&mut self, source: &Scene, ids: &[ShapeId]) -> Vec<ShapeId> {
        let mut shared = HashMap::new();
        let records = source.subgraph(ids, &shared);
        self.paste_subgraph(records, &mut shared);
        ids.iter().filter_map(|id| shared.get(id).copied()).collect()
    }

    /// Every shape whose slots or connectors reference `point`.
    pub fn owners_of(&self, point: ShapeId) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|(_, s)| s.direct_points().contains(&point))
            .map(|(id, _)| id)
            .collect()
    }

    /// Replace a referenced point in one shape.
    pub fn replace_point(&mut self, owner: ShapeId, old: ShapeId, new: ShapeId) -> bool {
        self.shapes
            .get_mut(owner)
            .map(|s| s.replace_point(old, new))
            .unwrap_or(false)
    }

    /// Remove a shape from the arena and both layers.
    ///
    /// Points and children it owns are removed too, unless another live shape
    /// still references them; such a point is handed to one of those shapes.
    pub fn delete(&mut self, id: ShapeId) -> bool {
        let Some(shape) = self.shapes.remove(id) else {
            return false;
        };
        self.current.remove(id);
        self.working.remove(id);

        for part in parts_of(&shape) {
            let owned = self.shapes.get(part).map(|s| s.owner() == Some(id)).unwrap_or(false);
            if !owned {
                continue;
            }
            match self.owners_of(part).first() {
                Some(&other) => {
                    if let Some(p) = self.shapes.get_mut(part) {
                        p.set_owner(Some(other));
                    }
                }
                None => {
                    self.delete(part);
                }
            }
        }
        true
    }

    // ---- groups ------------------------------------------------------------

    /// Wrap shapes in a new group (arena only; the caller updates layers).
    /// Children keep their order.
    pub fn create_group(&mut self, shapes: Vec<ShapeId>) -> ShapeId {
        let group = Shape::new(ShapeKind::Group(GroupShape::new(shapes)));
        self.insert(group)
    }

    /// Dissolve a group: children become standalone again and the group entry
    /// is removed from the arena. Returns the children, or `None` if `id` is
    /// not a group.
    pub fn dissolve_group(&mut self, id: ShapeId) -> Option<Vec<ShapeId>> {
        let children = self.shapes.get(id)?.kind.as_group()?.shapes().to_vec();
        let connectors = self.shapes.get(id).map(|s| s.connectors().to_vec()).unwrap_or_default();
        for &child in &children {
            if let Some(shape) = self.shapes.get_mut(child) {
                shape.set_owner(None);
                shape.state_mut().mark_standalone();
            }
        }
        self.shapes.remove(id);
        for c in connectors {
            if self.shapes.get(c).map(|s| s.owner() == Some(id)).unwrap_or(false) && self.owners_of(c).is_empty() {
                self.shapes.remove(c);
            }
        }
        Some(children)
    }

    /// Aggregated properties of a group's children, cached until the child
    /// list changes.
    pub fn group_properties(&self, id: ShapeId) -> Vec<Property> {
        let Some(group) = self.shapes.get(id).and_then(|s| s.kind.as_group()) else {
            return Vec::new();
        };
        group
            .shapes_properties(|children| {
                children
                    .iter()
                    .filter_map(|&c| self.shapes.get(c))
                    .flat_map(|s| s.data().properties.iter().cloned())
                    .collect()
            })
            .to_vec()
    }
}

/// Points, connectors and children a shape references directly.
fn parts_of(shape: &Shape) -> Vec<ShapeId> {
    let mut parts = shape.direct_points();
    if let Some(group) = shape.kind.as_group() {
        parts.extend(group.shapes().iter().copied());
    }
    parts
}
