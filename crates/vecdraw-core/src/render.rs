//! Draw boundary between the scene graph and a rendering backend.
//!
//! The core never rasterizes. It walks shapes and hands resolved kurbo
//! geometry to a [`ShapeRenderer`] implemented by the host.

use crate::scene::{LayerKind, Scene};
use crate::shapes::{ShapeId, ShapeKind, ShapeStyle, bind_text};
use kurbo::{Affine, BezPath, CubicBez, Line, Point, QuadBez, Rect, Vec2};
use std::collections::HashSet;

/// Paint parameters shared by every draw call of one shape.
#[derive(Debug, Clone, Copy)]
pub struct DrawStyle<'a> {
    pub style: Option<&'a ShapeStyle>,
    pub is_stroked: bool,
    pub is_filled: bool,
    pub transform: Affine,
}

/// Rendering backend for shapes.
pub trait ShapeRenderer {
    fn draw_point(&mut self, position: Point, style: &DrawStyle);

    fn draw_line(&mut self, line: Line, style: &DrawStyle);

    fn draw_cubic(&mut self, curve: CubicBez, style: &DrawStyle);

    fn draw_quadratic(&mut self, curve: QuadBez, style: &DrawStyle);

    /// `grid` is `(rows, columns)` for grid rectangles.
    fn draw_rectangle(&mut self, rect: Rect, grid: Option<(u32, u32)>, style: &DrawStyle);

    /// Ellipse inscribed in `rect`.
    fn draw_ellipse(&mut self, rect: Rect, style: &DrawStyle);

    /// Text laid out in `rect`, after property binding.
    fn draw_text(&mut self, rect: Rect, text: &str, style: &DrawStyle);

    fn draw_path(&mut self, path: &BezPath, style: &DrawStyle);
}

impl Scene {
    /// Draw every visible shape of a layer, back to front.
    pub fn draw_layer(&self, layer: LayerKind, renderer: &mut dyn ShapeRenderer, selection: &HashSet<ShapeId>) {
        let layer = self.layer(layer);
        if !layer.is_visible {
            return;
        }
        for &id in layer.shapes() {
            self.draw(id, renderer, 0.0, 0.0, selection);
        }
    }

    /// Draw a shape offset by `(dx, dy)`.
    ///
    /// Content is drawn first. Handles (the shape's points) follow only when
    /// the shape or one of its points is in `selection`.
    pub fn draw(&self, id: ShapeId, renderer: &mut dyn ShapeRenderer, dx: f64, dy: f64, selection: &HashSet<ShapeId>) {
        self.draw_inner(id, renderer, Vec2::new(dx, dy), selection, true);
    }

    fn draw_inner(
        &self,
        id: ShapeId,
        renderer: &mut dyn ShapeRenderer,
        offset: Vec2,
        selection: &HashSet<ShapeId>,
        follow_template: bool,
    ) {
        let Some(shape) = self.get(id) else {
            return;
        };
        if !shape.state().is_visible() {
            return;
        }
        let style = DrawStyle {
            style: shape.style(),
            is_stroked: shape.is_stroked(),
            is_filled: shape.is_filled(),
            transform: shape.transform(),
        };
        let at = |p: ShapeId| self.position(p).map(|p| p + offset);

        match &shape.kind {
            ShapeKind::Point(point) => {
                let template = point.template.filter(|_| follow_template);
                match template {
                    Some(t) if self.contains(t) => {
                        self.draw_inner(t, renderer, offset + point.position.to_vec2(), selection, false)
                    }
                    _ => renderer.draw_point(point.position + offset, &style),
                }
                return;
            }
            ShapeKind::Line(l) => {
                if let (Some(a), Some(b)) = (at(l.start), at(l.end)) {
                    renderer.draw_line(Line::new(a, b), &style);
                }
            }
            ShapeKind::CubicBezier(c) => {
                if let (Some(p0), Some(p1), Some(p2), Some(p3)) = (at(c.point1), at(c.point2), at(c.point3), at(c.point4)) {
                    renderer.draw_cubic(CubicBez::new(p0, p1, p2, p3), &style);
                }
            }
            ShapeKind::QuadraticBezier(q) => {
                if let (Some(p0), Some(p1), Some(p2)) = (at(q.point1), at(q.point2), at(q.point3)) {
                    renderer.draw_quadratic(QuadBez::new(p0, p1, p2), &style);
                }
            }
            ShapeKind::Rectangle(r) => {
                if let (Some(a), Some(b)) = (at(r.top_left), at(r.bottom_right)) {
                    let grid = r.is_grid.then_some((r.rows, r.columns));
                    renderer.draw_rectangle(Rect::from_points(a, b), grid, &style);
                }
            }
            ShapeKind::Ellipse(e) => {
                if let (Some(a), Some(b)) = (at(e.top_left), at(e.bottom_right)) {
                    renderer.draw_ellipse(Rect::from_points(a, b), &style);
                }
            }
            ShapeKind::Text(t) => {
                if let (Some(a), Some(b)) = (at(t.top_left), at(t.bottom_right)) {
                    let text = bind_text(&t.text, shape.data());
                    renderer.draw_text(Rect::from_points(a, b), &text, &style);
                }
            }
            ShapeKind::Path(p) => {
                let path = p.geometry.to_bez_path(at);
                renderer.draw_path(&path, &style);
            }
            ShapeKind::Group(g) => {
                for &child in g.shapes() {
                    self.draw_inner(child, renderer, offset, selection, follow_template);
                }
            }
        }

        let points = shape.direct_points();
        let show_handles = selection.contains(&id) || points.iter().any(|p| selection.contains(p));
        if show_handles {
            for p in points {
                self.draw_inner(p, renderer, offset, selection, follow_template);
            }
        }
    }
}

/// Renderer that records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub points: Vec<Point>,
    pub lines: Vec<Line>,
    pub cubics: usize,
    pub quadratics: usize,
    pub rectangles: Vec<Rect>,
    pub ellipses: usize,
    pub texts: Vec<String>,
    pub paths: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of draw calls.
    pub fn calls(&self) -> usize {
        self.points.len()
            + self.lines.len()
            + self.cubics
            + self.quadratics
            + self.rectangles.len()
            + self.ellipses
            + self.texts.len()
            + self.paths
    }
}

impl ShapeRenderer for RecordingRenderer {
    fn draw_point(&mut self, position: Point, _style: &DrawStyle) {
        self.points.push(position);
    }

    fn draw_line(&mut self, line: Line, _style: &DrawStyle) {
        self.lines.push(line);
    }

    fn draw_cubic(&mut self, _curve: CubicBez, _style: &DrawStyle) {
        self.cubics += 1;
    }

    fn draw_quadratic(&mut self, _curve: QuadBez, _style: &DrawStyle) {
        self.quadratics += 1;
    }

    fn draw_rectangle(&mut self, rect: Rect, _grid: Option<(u32, u32)>, _style: &DrawStyle) {
        self.rectangles.push(rect);
    }

    fn draw_ellipse(&mut self, _rect: Rect, _style: &DrawStyle) {
        self.ellipses += 1;
    }

    fn draw_text(&mut self, _rect: Rect, text: &str, _style: &DrawStyle) {
        self.texts.push(text.to_string());
    }

    fn draw_path(&mut self, _path: &BezPath, _style: &DrawStyle) {
        self.paths += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{LineShape, Shape, TextShape};

    fn scene_with_line() -> (Scene, ShapeId, ShapeId) {
        let mut scene = Scene::new();
        let a = scene.insert_point(Point::new(0.0, 0.0));
        let b = scene.insert_point(Point::new(10.0, 0.0));
        let line = scene.insert(Shape::new(ShapeKind::Line(LineShape::new(a, b))));
        scene.layer_mut(LayerKind::Current).add(line);
        (scene, line, a)
    }

    #[test]
    fn test_handles_hidden_when_not_selected() {
        let (scene, _, _) = scene_with_line();
        let mut r = RecordingRenderer::new();
        scene.draw_layer(LayerKind::Current, &mut r, &HashSet::new());
        assert_eq!(r.lines.len(), 1);
        assert!(r.points.is_empty());
    }

    #[test]
    fn test_handles_drawn_when_shape_selected() {
        let (scene, line, _) = scene_with_line();
        let mut r = RecordingRenderer::new();
        let selection: HashSet<ShapeId> = [line].into_iter().collect();
        scene.draw_layer(LayerKind::Current, &mut r, &selection);
        assert_eq!(r.points.len(), 2);
    }

    #[test]
    fn test_handles_drawn_when_point_selected() {
        let (scene, _, start) = scene_with_line();
        let mut r = RecordingRenderer::new();
        let selection: HashSet<ShapeId> = [start].into_iter().collect();
        scene.draw_layer(LayerKind::Current, &mut r, &selection);
        assert_eq!(r.points.len(), 2);
    }

    #[test]
    fn test_draw_offset() {
        let (scene, line, _) = scene_with_line();
        let mut r = RecordingRenderer::new();
        scene.draw(line, &mut r, 5.0, 1.0, &HashSet::new());
        assert_eq!(r.lines[0], Line::new((5.0, 1.0), (15.0, 1.0)));
    }

    #[test]
    fn test_text_binding_on_draw() {
        let mut scene = Scene::new();
        let a = scene.insert_point(Point::new(0.0, 0.0));
        let b = scene.insert_point(Point::new(10.0, 10.0));
        let text = scene.insert(Shape::new(ShapeKind::Text(TextShape::new(a, b, "Hello {who}"))));
        scene.get_mut(text).unwrap().data_mut().set_property("who", "world");
        let mut r = RecordingRenderer::new();
        scene.draw(text, &mut r, 0.0, 0.0, &HashSet::new());
        assert_eq!(r.texts, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_point_template() {
        let mut scene = Scene::new();
        let a = scene.insert_point(Point::new(-1.0, 0.0));
        let b = scene.insert_point(Point::new(1.0, 0.0));
        let template = scene.insert(Shape::new(ShapeKind::Line(LineShape::new(a, b))));
        let p = scene.insert_point(Point::new(100.0, 100.0));
        scene.get_mut(p).unwrap().kind.as_point_mut().unwrap().template = Some(template);

        let mut r = RecordingRenderer::new();
        scene.draw(p, &mut r, 0.0, 0.0, &HashSet::new());
        assert_eq!(r.lines, vec![Line::new((99.0, 100.0), (101.0, 100.0))]);
        assert!(r.points.is_empty());
    }

    #[test]
    fn test_invisible_layer_skipped() {
        let (mut scene, _, _) = scene_with_line();
        scene.layer_mut(LayerKind::Current).is_visible = false;
        let mut r = RecordingRenderer::new();
        scene.draw_layer(LayerKind::Current, &mut r, &HashSet::new());
        assert_eq!(r.calls(), 0);
    }
}
