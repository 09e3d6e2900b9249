//! Bezier curve tools: end point first, then the control points.

use super::{Effect, Tool, ToolContext, ToolKind};
use crate::input::ToolEvent;
use crate::shapes::{CubicBezierShape, QuadraticBezierShape, ShapeId, ShapeKind};
use kurbo::Point;

/// Live handles of a cubic under construction.
#[derive(Debug, Clone, Copy)]
struct CubicParts {
    shape: ShapeId,
    point2: ShapeId,
    point3: ShapeId,
    point4: ShapeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubicState {
    #[default]
    None,
    /// Waiting for the end point.
    Point4,
    /// Waiting for the first control point.
    Point2,
    /// Waiting for the second control point.
    Point3,
}

impl CubicState {
    fn transition(self, event: ToolEvent, data: &mut Option<CubicParts>, ctx: &mut ToolContext) -> Self {
        let parts = *data;
        match (self, event, parts) {
            (CubicState::None, ToolEvent::LeftDown(args), _) => {
                let p = ctx.filter(args.point);
                let point1 = ctx.next_point_default(p);
                let point2 = ctx.new_point(p);
                let point3 = ctx.new_point(p);
                let point4 = ctx.new_point(p);
                let shape = ctx.new_shape(ShapeKind::CubicBezier(CubicBezierShape::new(point1, point2, point3, point4)));
                ctx.emit(Effect::AddWorking(shape));
                ctx.select_points(shape);
                ctx.emit(Effect::Capture);
                ctx.emit(Effect::Invalidate);
                *data = Some(CubicParts {
                    shape,
                    point2,
                    point3,
                    point4,
                });
                CubicState::Point4
            }
            (state, ToolEvent::RightDown(_), Some(parts)) if state != CubicState::None => {
                ctx.abort(parts.shape);
                *data = None;
                CubicState::None
            }
            (CubicState::Point4, ToolEvent::Move(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                move_all(ctx, &[parts.point2, parts.point3, parts.point4], p);
                CubicState::Point4
            }
            (CubicState::Point4, ToolEvent::LeftDown(args), Some(mut parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.point4, p);
                parts.point4 = ctx.resolve_point(parts.shape, parts.point4, p);
                *data = Some(parts);
                ctx.emit(Effect::Invalidate);
                CubicState::Point2
            }
            (CubicState::Point2, ToolEvent::Move(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                move_all(ctx, &[parts.point2, parts.point3], p);
                CubicState::Point2
            }
            (CubicState::Point2, ToolEvent::LeftDown(args), Some(mut parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.point2, p);
                parts.point2 = ctx.resolve_point(parts.shape, parts.point2, p);
                *data = Some(parts);
                ctx.emit(Effect::Invalidate);
                CubicState::Point3
            }
            (CubicState::Point3, ToolEvent::Move(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                move_all(ctx, &[parts.point3], p);
                CubicState::Point3
            }
            (CubicState::Point3, ToolEvent::LeftDown(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.point3, p);
                ctx.resolve_point(parts.shape, parts.point3, p);
                ctx.commit(parts.shape);
                *data = None;
                CubicState::None
            }
            (state, _, _) => state,
        }
    }
}

fn move_all(ctx: &mut ToolContext, points: &[ShapeId], p: Point) {
    for &point in points {
        ctx.scene.set_position(point, p);
    }
    ctx.emit(Effect::Invalidate);
}

/// Draws a cubic bezier: start, end, then both control points.
#[derive(Debug, Default)]
pub struct CubicBezierTool {
    state: CubicState,
    data: Option<CubicParts>,
}

impl CubicBezierTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CubicState {
        self.state
    }
}

impl Tool for CubicBezierTool {
    fn kind(&self) -> ToolKind {
        ToolKind::CubicBezier
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event, &mut self.data, ctx);
    }

    fn clean(&mut self, ctx: &mut ToolContext) {
        if let Some(parts) = self.data.take() {
            ctx.abort(parts.shape);
        }
        self.state = CubicState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == CubicState::None
    }
}

#[derive(Debug, Clone, Copy)]
struct QuadraticParts {
    shape: ShapeId,
    point2: ShapeId,
    point3: ShapeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuadraticState {
    #[default]
    None,
    /// Waiting for the end point.
    Point3,
    /// Waiting for the control point.
    Point2,
}

impl QuadraticState {
    fn transition(self, event: ToolEvent, data: &mut Option<QuadraticParts>, ctx: &mut ToolContext) -> Self {
        let parts = *data;
        match (self, event, parts) {
            (QuadraticState::None, ToolEvent::LeftDown(args), _) => {
                let p = ctx.filter(args.point);
                let point1 = ctx.next_point_default(p);
                let point2 = ctx.new_point(p);
                let point3 = ctx.new_point(p);
                let shape = ctx.new_shape(ShapeKind::QuadraticBezier(QuadraticBezierShape::new(point1, point2, point3)));
                ctx.emit(Effect::AddWorking(shape));
                ctx.select_points(shape);
                ctx.emit(Effect::Capture);
                ctx.emit(Effect::Invalidate);
                *data = Some(QuadraticParts { shape, point2, point3 });
                QuadraticState::Point3
            }
            (state, ToolEvent::RightDown(_), Some(parts)) if state != QuadraticState::None => {
                ctx.abort(parts.shape);
                *data = None;
                QuadraticState::None
            }
            (QuadraticState::Point3, ToolEvent::Move(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                move_all(ctx, &[parts.point2, parts.point3], p);
                QuadraticState::Point3
            }
            (QuadraticState::Point3, ToolEvent::LeftDown(args), Some(mut parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.point3, p);
                parts.point3 = ctx.resolve_point(parts.shape, parts.point3, p);
                *data = Some(parts);
                ctx.emit(Effect::Invalidate);
                QuadraticState::Point2
            }
            (QuadraticState::Point2, ToolEvent::Move(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                move_all(ctx, &[parts.point2], p);
                QuadraticState::Point2
            }
            (QuadraticState::Point2, ToolEvent::LeftDown(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.point2, p);
                ctx.resolve_point(parts.shape, parts.point2, p);
                ctx.commit(parts.shape);
                *data = None;
                QuadraticState::None
            }
            (state, _, _) => state,
        }
    }
}

/// Draws a quadratic bezier: start, end, then the control point.
#[derive(Debug, Default)]
pub struct QuadraticBezierTool {
    state: QuadraticState,
    data: Option<QuadraticParts>,
}

impl QuadraticBezierTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> QuadraticState {
        self.state
    }
}

impl Tool for QuadraticBezierTool {
    fn kind(&self) -> ToolKind {
        ToolKind::QuadraticBezier
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event, &mut self.data, ctx);
    }

    fn clean(&mut self, ctx: &mut ToolContext) {
        if let Some(parts) = self.data.take() {
            ctx.abort(parts.shape);
        }
        self.state = QuadraticState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == QuadraticState::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::Harness;

    #[test]
    fn test_cubic_four_clicks() {
        let mut h = Harness::new();
        let mut tool = CubicBezierTool::new();
        h.down(&mut tool, 0.0, 0.0);
        h.moved(&mut tool, 100.0, 0.0);
        h.down(&mut tool, 100.0, 0.0);
        assert_eq!(tool.state(), CubicState::Point2);
        h.moved(&mut tool, 30.0, 50.0);
        h.down(&mut tool, 30.0, 50.0);
        assert_eq!(tool.state(), CubicState::Point3);
        assert!(h.current().is_empty());
        h.down(&mut tool, 70.0, 50.0);

        assert!(tool.is_idle());
        let shapes = h.current();
        assert_eq!(shapes.len(), 1);
        let ShapeKind::CubicBezier(c) = &h.scene.get(shapes[0]).unwrap().kind else {
            panic!("expected a cubic");
        };
        assert_eq!(h.scene.position(c.point1), Some(Point::new(0.0, 0.0)));
        assert_eq!(h.scene.position(c.point2), Some(Point::new(30.0, 50.0)));
        assert_eq!(h.scene.position(c.point3), Some(Point::new(70.0, 50.0)));
        assert_eq!(h.scene.position(c.point4), Some(Point::new(100.0, 0.0)));
        assert!(h.scene.working().is_empty());
        assert_eq!(h.captured, 0);
    }

    #[test]
    fn test_cubic_abort_mid_gesture() {
        let mut h = Harness::new();
        let mut tool = CubicBezierTool::new();
        h.down(&mut tool, 0.0, 0.0);
        h.down(&mut tool, 100.0, 0.0);
        h.right(&mut tool, 50.0, 50.0);
        assert!(tool.is_idle());
        assert!(h.current().is_empty());
        assert_eq!(h.scene.arena_len(), 0);
    }

    #[test]
    fn test_quadratic_three_clicks() {
        let mut h = Harness::new();
        let mut tool = QuadraticBezierTool::new();
        h.down(&mut tool, 0.0, 0.0);
        h.down(&mut tool, 100.0, 0.0);
        assert_eq!(tool.state(), QuadraticState::Point2);
        h.moved(&mut tool, 50.0, 80.0);
        h.down(&mut tool, 50.0, 80.0);

        let shapes = h.current();
        assert_eq!(shapes.len(), 1);
        let ShapeKind::QuadraticBezier(q) = &h.scene.get(shapes[0]).unwrap().kind else {
            panic!("expected a quadratic");
        };
        assert_eq!(h.scene.position(q.point2), Some(Point::new(50.0, 80.0)));
        assert_eq!(h.scene.position(q.point3), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_quadratic_clean() {
        let mut h = Harness::new();
        let mut tool = QuadraticBezierTool::new();
        h.down(&mut tool, 0.0, 0.0);
        h.clean(&mut tool);
        assert!(tool.is_idle());
        assert!(h.scene.working().is_empty());
        assert!(h.current().is_empty());
    }
}
