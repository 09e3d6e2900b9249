//! Hit testing against shapes in a layer.
//!
//! Single-target queries walk a layer top to bottom and return the first
//! match. Rectangle queries are closed-interval: touching an edge counts.

use crate::geometry::{contains_closed, point_to_segment_dist, polyline_intersects_rect, rect_from_corners, rects_overlap_closed};
use crate::scene::Scene;
use crate::shapes::{ShapeId, ShapeKind};
use kurbo::{CubicBez, ParamCurveExtrema, ParamCurveNearest, Point, QuadBez, Rect};
use std::collections::HashSet;

/// Accuracy for curve nearest-point searches.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Find the topmost point within `radius` of `target`.
///
/// Standalone points are tested directly; other shapes offer their points.
/// Points in `exclude` are never returned.
pub fn try_get_point(scene: &Scene, shapes: &[ShapeId], target: Point, radius: f64, exclude: &[ShapeId]) -> Option<ShapeId> {
    for &id in shapes.iter().rev() {
        let Some(shape) = scene.get(id) else { continue };
        if !shape.state().is_visible() {
            continue;
        }
        for p in scene.points(id) {
            if exclude.contains(&p) {
                continue;
            }
            if let Some(pos) = scene.position(p) {
                if (pos - target).hypot() <= radius {
                    return Some(p);
                }
            }
        }
    }
    None
}

/// Find the topmost shape under `target`.
pub fn try_get_shape(scene: &Scene, shapes: &[ShapeId], target: Point, radius: f64) -> Option<ShapeId> {
    shapes.iter().rev().copied().find(|&id| {
        scene.get(id).is_some_and(|s| s.state().is_visible()) && contains(scene, id, target, radius)
    })
}

/// Every shape in `shapes` that touches `rect`.
pub fn try_get_shapes_in_rect(scene: &Scene, shapes: &[ShapeId], rect: Rect) -> Vec<ShapeId> {
    shapes
        .iter()
        .copied()
        .filter(|&id| scene.get(id).is_some_and(|s| s.state().is_visible()) && intersects_rect(scene, id, rect))
        .collect()
}

/// Every point of the shapes in `shapes` that lies inside `rect`.
pub fn try_get_points_in_rect(scene: &Scene, shapes: &[ShapeId], rect: Rect) -> Vec<ShapeId> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for &id in shapes {
        for p in scene.points(id) {
            let inside = scene.position(p).is_some_and(|pos| contains_closed(rect, pos));
            if inside && seen.insert(p) {
                found.push(p);
            }
        }
    }
    found
}

fn corners(scene: &Scene, a: ShapeId, b: ShapeId) -> Option<Rect> {
    Some(rect_from_corners(scene.position(a)?, scene.position(b)?))
}

fn cubic(scene: &Scene, p: [ShapeId; 4]) -> Option<CubicBez> {
    Some(CubicBez::new(
        scene.position(p[0])?,
        scene.position(p[1])?,
        scene.position(p[2])?,
        scene.position(p[3])?,
    ))
}

fn quadratic(scene: &Scene, p: [ShapeId; 3]) -> Option<QuadBez> {
    Some(QuadBez::new(scene.position(p[0])?, scene.position(p[1])?, scene.position(p[2])?))
}

/// Whether `target` is on (or within `radius` of) a shape.
pub fn contains(scene: &Scene, id: ShapeId, target: Point, radius: f64) -> bool {
    let Some(shape) = scene.get(id) else {
        return false;
    };
    match &shape.kind {
        ShapeKind::Point(p) => (p.position - target).hypot() <= radius,
        ShapeKind::Line(l) => match (scene.position(l.start), scene.position(l.end)) {
            (Some(a), Some(b)) => point_to_segment_dist(target, a, b) <= radius,
            _ => false,
        },
        ShapeKind::CubicBezier(c) => cubic(scene, [c.point1, c.point2, c.point3, c.point4])
            .is_some_and(|curve| curve.nearest(target, NEAREST_ACCURACY).distance_sq.sqrt() <= radius),
        ShapeKind::QuadraticBezier(q) => quadratic(scene, [q.point1, q.point2, q.point3])
            .is_some_and(|curve| curve.nearest(target, NEAREST_ACCURACY).distance_sq.sqrt() <= radius),
        ShapeKind::Rectangle(r) => {
            corners(scene, r.top_left, r.bottom_right).is_some_and(|rect| contains_closed(rect.inflate(radius, radius), target))
        }
        ShapeKind::Text(t) => {
            corners(scene, t.top_left, t.bottom_right).is_some_and(|rect| contains_closed(rect.inflate(radius, radius), target))
        }
        ShapeKind::Ellipse(e) => corners(scene, e.top_left, e.bottom_right).is_some_and(|rect| {
            let rx = rect.width() / 2.0 + radius;
            let ry = rect.height() / 2.0 + radius;
            let d = target - rect.center();
            (d.x / rx).powi(2) + (d.y / ry).powi(2) <= 1.0
        }),
        ShapeKind::Path(p) => {
            let path = p.geometry.to_bez_path(|id| scene.position(id));
            if shape.is_filled() && kurbo::Shape::contains(&path, target) {
                return true;
            }
            path.segments()
                .any(|seg| seg.nearest(target, NEAREST_ACCURACY).distance_sq.sqrt() <= radius)
        }
        ShapeKind::Group(g) => g.shapes().iter().any(|&c| contains(scene, c, target, radius)),
    }
}

/// Whether a shape touches `rect` (closed interval).
pub fn intersects_rect(scene: &Scene, id: ShapeId, rect: Rect) -> bool {
    let Some(shape) = scene.get(id) else {
        return false;
    };
    match &shape.kind {
        ShapeKind::Point(p) => contains_closed(rect, p.position),
        ShapeKind::Line(l) => {
            let points: Vec<Point> = [l.start, l.end].iter().filter_map(|&p| scene.position(p)).collect();
            polyline_intersects_rect(&points, rect)
        }
        ShapeKind::CubicBezier(c) => cubic(scene, [c.point1, c.point2, c.point3, c.point4])
            .is_some_and(|curve| rects_overlap_closed(ParamCurveExtrema::bounding_box(&curve), rect)),
        ShapeKind::QuadraticBezier(q) => quadratic(scene, [q.point1, q.point2, q.point3])
            .is_some_and(|curve| rects_overlap_closed(ParamCurveExtrema::bounding_box(&curve), rect)),
        ShapeKind::Rectangle(r) => {
            corners(scene, r.top_left, r.bottom_right).is_some_and(|bounds| rects_overlap_closed(bounds, rect))
        }
        ShapeKind::Ellipse(e) => {
            corners(scene, e.top_left, e.bottom_right).is_some_and(|bounds| rects_overlap_closed(bounds, rect))
        }
        ShapeKind::Text(t) => {
            corners(scene, t.top_left, t.bottom_right).is_some_and(|bounds| rects_overlap_closed(bounds, rect))
        }
        ShapeKind::Path(p) => {
            let path = p.geometry.to_bez_path(|id| scene.position(id));
            !path.elements().is_empty() && rects_overlap_closed(kurbo::Shape::bounding_box(&path), rect)
        }
        ShapeKind::Group(g) => g.shapes().iter().any(|&c| intersects_rect(scene, c, rect)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LayerKind;
    use crate::shapes::{CubicBezierShape, LineShape, Shape};

    fn add_line(scene: &mut Scene, a: (f64, f64), b: (f64, f64)) -> ShapeId {
        let start = scene.insert_point(a.into());
        let end = scene.insert_point(b.into());
        let id = scene.insert(Shape::new(ShapeKind::Line(LineShape::new(start, end))));
        scene.layer_mut(LayerKind::Current).add(id);
        id
    }

    #[test]
    fn test_rect_selection_includes_edge_point() {
        let mut scene = Scene::new();
        let p = scene.insert_point(Point::new(10.0, 5.0));
        scene.layer_mut(LayerKind::Current).add(p);
        let rect = rect_from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let shapes = scene.current().shapes().to_vec();
        assert_eq!(try_get_shapes_in_rect(&scene, &shapes, rect), vec![p]);
        assert_eq!(try_get_points_in_rect(&scene, &shapes, rect), vec![p]);
    }

    #[test]
    fn test_topmost_shape_wins() {
        let mut scene = Scene::new();
        let bottom = add_line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let top = add_line(&mut scene, (0.0, 1.0), (10.0, 1.0));
        let shapes = scene.current().shapes().to_vec();
        assert_eq!(try_get_shape(&scene, &shapes, Point::new(5.0, 0.5), 3.0), Some(top));
        assert_eq!(try_get_shape(&scene, &shapes, Point::new(5.0, -2.5), 3.0), Some(bottom));
        assert_eq!(try_get_shape(&scene, &shapes, Point::new(5.0, 20.0), 3.0), None);
    }

    #[test]
    fn test_try_get_point_with_exclusion() {
        let mut scene = Scene::new();
        let line = add_line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let start = scene.get(line).unwrap().kind.as_line().unwrap().start;
        let shapes = scene.current().shapes().to_vec();
        assert_eq!(try_get_point(&scene, &shapes, Point::new(1.0, 1.0), 3.0, &[]), Some(start));
        assert_eq!(try_get_point(&scene, &shapes, Point::new(1.0, 1.0), 3.0, &[start]), None);
    }

    #[test]
    fn test_cubic_hit() {
        let mut scene = Scene::new();
        let p: Vec<ShapeId> = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]
            .iter()
            .map(|&p| scene.insert_point(p.into()))
            .collect();
        let id = scene.insert(Shape::new(ShapeKind::CubicBezier(CubicBezierShape::new(p[0], p[1], p[2], p[3]))));
        // Curve apex is at (5, 7.5).
        assert!(contains(&scene, id, Point::new(5.0, 7.0), 1.0));
        assert!(!contains(&scene, id, Point::new(5.0, 2.0), 1.0));
    }

    #[test]
    fn test_line_crossing_rect_without_endpoints_inside() {
        let mut scene = Scene::new();
        let line = add_line(&mut scene, (-10.0, 5.0), (20.0, 5.0));
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(intersects_rect(&scene, line, rect));
    }
}
