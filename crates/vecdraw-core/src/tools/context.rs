//! Capabilities a tool transition runs against.

use super::Effect;
use crate::algorithms::IntersectionFinder;
use crate::filters::FilterChain;
use crate::hittest;
use crate::scene::Scene;
use crate::selection::SelectionSurface;
use crate::settings::EditorSettings;
use crate::shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};
use kurbo::Point;
use std::sync::Arc;

/// Borrowed editor state for the duration of one event.
///
/// Arena writes go straight to the scene. Layer changes and host hooks are
/// queued with [`ToolContext::emit`] and applied by the driver once the
/// transition returns.
pub struct ToolContext<'a> {
    pub scene: &'a mut Scene,
    pub selection: &'a SelectionSurface,
    pub settings: &'a EditorSettings,
    /// Style given to new shapes.
    pub style: Option<Arc<ShapeStyle>>,
    /// Template attached to new points.
    pub point_template: Option<ShapeId>,
    pub filters: &'a mut FilterChain,
    pub finders: &'a mut [Box<dyn IntersectionFinder>],
    effects: Vec<Effect>,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        scene: &'a mut Scene,
        selection: &'a SelectionSurface,
        settings: &'a EditorSettings,
        filters: &'a mut FilterChain,
        finders: &'a mut [Box<dyn IntersectionFinder>],
    ) -> Self {
        Self {
            scene,
            selection,
            settings,
            style: None,
            point_template: None,
            filters,
            finders,
            effects: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: Option<Arc<ShapeStyle>>) -> Self {
        self.style = style;
        self
    }

    pub fn with_point_template(mut self, template: Option<ShapeId>) -> Self {
        self.point_template = template;
        self
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }

    /// Run the filter chain over a pointer location.
    pub fn filter(&mut self, point: Point) -> Point {
        let mut point = point;
        let scene: &Scene = self.scene;
        self.filters.process(scene, scene.current().shapes(), &mut point);
        point
    }

    /// Topmost committed point near `target`, ignoring `exclude`.
    pub fn try_get_point(&self, target: Point, radius: f64, exclude: &[ShapeId]) -> Option<ShapeId> {
        let scene: &Scene = self.scene;
        hittest::try_get_point(scene, scene.current().shapes(), target, radius, exclude)
    }

    /// Topmost committed shape under `target`.
    pub fn try_get_shape(&self, target: Point, radius: f64) -> Option<ShapeId> {
        let scene: &Scene = self.scene;
        hittest::try_get_shape(scene, scene.current().shapes(), target, radius)
    }

    /// A point for `target`: an existing committed point within `radius`
    /// when `connect` is set, otherwise a fresh one.
    pub fn next_point(&mut self, target: Point, connect: bool, radius: f64) -> ShapeId {
        if connect {
            if let Some(existing) = self.try_get_point(target, radius, &[]) {
                return existing;
            }
        }
        self.new_point(target)
    }

    /// Same as [`Self::next_point`] with the configured connect settings.
    pub fn next_point_default(&mut self, target: Point) -> ShapeId {
        let (connect, radius) = (self.settings.connect_points, self.settings.connection_radius);
        self.next_point(target, connect, radius)
    }

    /// Allocate a free point carrying the current point template.
    pub fn new_point(&mut self, position: Point) -> ShapeId {
        let mut point = Shape::point(position);
        if let Some(p) = point.kind.as_point_mut() {
            p.template = self.point_template;
        }
        self.scene.insert(point)
    }

    /// Allocate a shape with the current style and default paint flags.
    pub fn new_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let shape = Shape::new(kind)
            .with_style(self.style.clone())
            .with_paint(self.settings.default_is_stroked, self.settings.default_is_filled);
        self.scene.insert(shape)
    }

    pub fn select_points(&self, id: ShapeId) {
        let mut selection = self.selection.lock();
        self.scene.select_points(id, selection.selected_mut());
    }

    pub fn deselect_points(&self, id: ShapeId) {
        let mut selection = self.selection.lock();
        self.scene.deselect_points(id, selection.selected_mut());
    }

    /// Swap the live point `temp` of `shape` for an existing committed point
    /// near `target`, if connecting is enabled and one is found. The shape's
    /// own points are never candidates. Returns the point now in the slot.
    pub fn resolve_point(&mut self, shape: ShapeId, temp: ShapeId, target: Point) -> ShapeId {
        if !self.settings.connect_points {
            return temp;
        }
        let own = self.scene.points(shape);
        let Some(existing) = self.try_get_point(target, self.settings.connection_radius, &own) else {
            return temp;
        };
        if !self.scene.replace_point(shape, temp, existing) {
            return temp;
        }
        self.selection.lock().deselect(temp);
        self.scene.delete(temp);
        log::debug!("resolved live point to an existing point");
        existing
    }

    /// Finish a gesture: the working shape becomes document content.
    pub fn commit(&mut self, shape: ShapeId) {
        self.deselect_points(shape);
        self.scene.push_undo();
        self.emit(Effect::Commit(shape));
        self.finish();
        log::info!(
            "committed {}",
            self.scene.get(shape).map(|s| s.kind.name()).unwrap_or("shape")
        );
    }

    /// Abandon a gesture: the working shape is dropped.
    pub fn abort(&mut self, shape: ShapeId) {
        self.deselect_points(shape);
        self.emit(Effect::RemoveWorking(shape));
        self.emit(Effect::Discard(shape));
        self.finish();
        log::debug!("gesture aborted");
    }

    /// Release capture and request a redraw.
    pub fn finish(&mut self) {
        self.filters.clear();
        self.emit(Effect::Release);
        self.emit(Effect::Invalidate);
    }

    pub fn clear_finders(&mut self) {
        for finder in self.finders.iter_mut() {
            finder.clear();
        }
    }
}
