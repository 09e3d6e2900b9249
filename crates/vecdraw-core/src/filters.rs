//! Point filters: snapping rules that rewrite a pointer location before a
//! tool uses it.

use crate::scene::Scene;
use crate::settings::{EditorSettings, GridSettings, LineSnapSettings};
use crate::shapes::{ShapeId, ShapeKind};
use kurbo::Point;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64, origin: Point) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    let snapped_x = ((point.x - origin.x) / grid_size).round() * grid_size + origin.x;
    let snapped_y = ((point.y - origin.y) / grid_size).round() * grid_size + origin.y;
    SnapResult {
        point: Point::new(snapped_x, snapped_y),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Snap each axis independently to the closest target coordinate within
/// `threshold`.
pub fn snap_to_axes(point: Point, targets: &[Point], threshold: f64) -> SnapResult {
    let mut result = SnapResult::none(point);
    let mut best_dx = threshold;
    let mut best_dy = threshold;
    for target in targets {
        let dx = (point.x - target.x).abs();
        if dx <= best_dx {
            best_dx = dx;
            result.point.x = target.x;
            result.snapped_x = true;
        }
        let dy = (point.y - target.y).abs();
        if dy <= best_dy {
            best_dy = dy;
            result.point.y = target.y;
            result.snapped_y = true;
        }
    }
    result
}

/// Collect snap targets from committed line endpoints.
pub fn line_snap_targets(scene: &Scene, shapes: &[ShapeId]) -> Vec<Point> {
    shapes
        .iter()
        .filter_map(|&id| match &scene.get(id)?.kind {
            ShapeKind::Line(l) => Some([scene.position(l.start)?, scene.position(l.end)?]),
            _ => None,
        })
        .flatten()
        .collect()
}

/// A coordinate-rewriting rule.
pub trait PointFilter {
    /// Rewrite `point` in place. Returns whether the filter changed anything.
    fn process(&mut self, scene: &Scene, shapes: &[ShapeId], point: &mut Point) -> bool;

    /// Drop per-gesture state.
    fn clear(&mut self) {}
}

/// Snap to grid intersections.
#[derive(Debug, Clone, Default)]
pub struct GridSnapFilter {
    pub settings: GridSettings,
}

impl GridSnapFilter {
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }
}

impl PointFilter for GridSnapFilter {
    fn process(&mut self, _scene: &Scene, _shapes: &[ShapeId], point: &mut Point) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let origin = Point::new(self.settings.origin_x, self.settings.origin_y);
        let result = snap_to_grid(*point, self.settings.size, origin);
        let changed = result.point != *point;
        *point = result.point;
        changed
    }
}

/// Snap x/y to line endpoints on the layer (axis guides).
#[derive(Debug, Clone, Default)]
pub struct LineSnapFilter {
    pub settings: LineSnapSettings,
}

impl LineSnapFilter {
    pub fn new(settings: LineSnapSettings) -> Self {
        Self { settings }
    }
}

impl PointFilter for LineSnapFilter {
    fn process(&mut self, scene: &Scene, shapes: &[ShapeId], point: &mut Point) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let targets = line_snap_targets(scene, shapes);
        let result = snap_to_axes(*point, &targets, self.settings.threshold);
        if !result.is_snapped() {
            return false;
        }
        let changed = result.point != *point;
        *point = result.point;
        changed
    }
}

/// Ordered filter chain. Every filter runs on every point.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn PointFilter>>,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain").field("len", &self.filters.len()).finish()
    }
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grid and line-snap filters configured by `settings`.
    pub fn from_settings(settings: &EditorSettings) -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(GridSnapFilter::new(settings.grid)));
        chain.push(Box::new(LineSnapFilter::new(settings.line_snap)));
        chain
    }

    pub fn push(&mut self, filter: Box<dyn PointFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run all filters in order. Returns whether any filter processed.
    pub fn process(&mut self, scene: &Scene, shapes: &[ShapeId], point: &mut Point) -> bool {
        let mut any = false;
        for filter in &mut self.filters {
            any |= filter.process(scene, shapes, point);
        }
        any
    }

    pub fn clear(&mut self) {
        for filter in &mut self.filters {
            filter.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LayerKind;
    use crate::shapes::{LineShape, Shape};

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(23.0, 47.0), 20.0, Point::ZERO);
        assert_eq!(result.point, Point::new(20.0, 40.0));
        assert!(result.snapped_x);
        assert!(result.snapped_y);
    }

    #[test]
    fn test_snap_to_grid_round_up() {
        let result = snap_to_grid(Point::new(31.0, 51.0), 20.0, Point::ZERO);
        assert_eq!(result.point, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_to_grid_origin() {
        let result = snap_to_grid(Point::new(14.0, 14.0), 10.0, Point::new(5.0, 5.0));
        assert_eq!(result.point, Point::new(15.0, 15.0));
    }

    #[test]
    fn test_snap_to_axes_independent() {
        let targets = [Point::new(100.0, 0.0), Point::new(0.0, 50.0)];
        let result = snap_to_axes(Point::new(97.0, 53.0), &targets, 5.0);
        assert_eq!(result.point, Point::new(100.0, 50.0));
        let result = snap_to_axes(Point::new(80.0, 30.0), &targets, 5.0);
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_disabled_filters_pass_through() {
        let scene = Scene::new();
        let mut chain = FilterChain::from_settings(&EditorSettings::default());
        let mut p = Point::new(23.0, 47.0);
        assert!(!chain.process(&scene, &[], &mut p));
        assert_eq!(p, Point::new(23.0, 47.0));
    }

    #[test]
    fn test_chain_runs_every_filter() {
        let mut scene = Scene::new();
        let a = scene.insert_point(Point::new(0.0, 0.0));
        let b = scene.insert_point(Point::new(33.0, 0.0));
        let line = scene.insert(Shape::new(ShapeKind::Line(LineShape::new(a, b))));
        scene.layer_mut(LayerKind::Current).add(line);

        let mut settings = EditorSettings::default();
        settings.grid.enabled = true;
        settings.line_snap.enabled = true;
        let mut chain = FilterChain::from_settings(&settings);

        // Grid puts x at 40, then the line snap pulls it onto the endpoint at 33.
        let mut p = Point::new(38.0, 21.0);
        let shapes = scene.current().shapes().to_vec();
        assert!(chain.process(&scene, &shapes, &mut p));
        assert_eq!(p, Point::new(33.0, 20.0));
    }
}
