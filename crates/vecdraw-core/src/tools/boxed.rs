//! Two-corner tools: rectangle, ellipse and text.

use super::{Effect, Tool, ToolContext, ToolKind};
use crate::input::ToolEvent;
use crate::shapes::{EllipseShape, RectangleShape, ShapeId, ShapeKind, TextShape};

/// Which shape a [`BoxTool`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Rectangle,
    Ellipse,
    Text,
}

impl BoxKind {
    fn build(self, top_left: ShapeId, bottom_right: ShapeId, text: &str) -> ShapeKind {
        match self {
            BoxKind::Rectangle => ShapeKind::Rectangle(RectangleShape::new(top_left, bottom_right)),
            BoxKind::Ellipse => ShapeKind::Ellipse(EllipseShape::new(top_left, bottom_right)),
            BoxKind::Text => ShapeKind::Text(TextShape::new(top_left, bottom_right, text)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxState {
    #[default]
    None,
    /// Top-left placed, bottom-right follows the pointer.
    BottomRight,
}

#[derive(Debug, Clone, Copy)]
struct BoxParts {
    shape: ShapeId,
    bottom_right: ShapeId,
}

impl BoxState {
    fn transition(self, kind: BoxKind, event: ToolEvent, data: &mut Option<BoxParts>, ctx: &mut ToolContext) -> Self {
        match (self, event, *data) {
            (BoxState::None, ToolEvent::LeftDown(args), _) => {
                let p = ctx.filter(args.point);
                let top_left = ctx.next_point_default(p);
                let bottom_right = ctx.new_point(p);
                let built = kind.build(top_left, bottom_right, &ctx.settings.default_text);
                let shape = ctx.new_shape(built);
                ctx.emit(Effect::AddWorking(shape));
                ctx.select_points(shape);
                ctx.emit(Effect::Capture);
                ctx.emit(Effect::Invalidate);
                *data = Some(BoxParts { shape, bottom_right });
                BoxState::BottomRight
            }
            (BoxState::BottomRight, ToolEvent::Move(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.bottom_right, p);
                ctx.emit(Effect::Invalidate);
                BoxState::BottomRight
            }
            (BoxState::BottomRight, ToolEvent::LeftDown(args), Some(parts)) => {
                let p = ctx.filter(args.point);
                ctx.scene.set_position(parts.bottom_right, p);
                ctx.resolve_point(parts.shape, parts.bottom_right, p);
                ctx.commit(parts.shape);
                *data = None;
                BoxState::None
            }
            (BoxState::BottomRight, ToolEvent::RightDown(_), Some(parts)) => {
                ctx.abort(parts.shape);
                *data = None;
                BoxState::None
            }
            (state, _, _) => state,
        }
    }
}

/// Draws a box-shaped shape from two opposite corners.
#[derive(Debug)]
pub struct BoxTool {
    kind: BoxKind,
    state: BoxState,
    data: Option<BoxParts>,
}

impl BoxTool {
    pub fn new(kind: BoxKind) -> Self {
        Self {
            kind,
            state: BoxState::None,
            data: None,
        }
    }

    pub fn rectangle() -> Self {
        Self::new(BoxKind::Rectangle)
    }

    pub fn ellipse() -> Self {
        Self::new(BoxKind::Ellipse)
    }

    pub fn text() -> Self {
        Self::new(BoxKind::Text)
    }

    pub fn state(&self) -> BoxState {
        self.state
    }
}

impl Tool for BoxTool {
    fn kind(&self) -> ToolKind {
        match self.kind {
            BoxKind::Rectangle => ToolKind::Rectangle,
            BoxKind::Ellipse => ToolKind::Ellipse,
            BoxKind::Text => ToolKind::Text,
        }
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(self.kind, event, &mut self.data, ctx);
    }

    fn clean(&mut self, ctx: &mut ToolContext) {
        if let Some(parts) = self.data.take() {
            ctx.abort(parts.shape);
        }
        self.state = BoxState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == BoxState::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::Harness;
    use kurbo::Rect;

    #[test]
    fn test_rectangle_two_corners() {
        let mut h = Harness::new();
        let mut tool = BoxTool::rectangle();
        h.down(&mut tool, 10.0, 10.0);
        h.moved(&mut tool, 40.0, 30.0);
        assert_eq!(tool.state(), BoxState::BottomRight);
        h.down(&mut tool, 50.0, 40.0);

        let shapes = h.current();
        assert_eq!(shapes.len(), 1);
        assert_eq!(h.scene.bounds(shapes[0]), Some(Rect::new(10.0, 10.0, 50.0, 40.0)));
        assert!(tool.is_idle());
    }

    #[test]
    fn test_text_uses_default_text() {
        let mut h = Harness::new();
        let mut tool = BoxTool::text();
        h.down(&mut tool, 0.0, 0.0);
        h.down(&mut tool, 80.0, 20.0);
        let shape = h.scene.get(h.current()[0]).unwrap();
        let ShapeKind::Text(text) = &shape.kind else {
            panic!("expected text");
        };
        assert_eq!(text.text, "Text");
        assert_eq!(tool.kind(), ToolKind::Text);
    }

    #[test]
    fn test_ellipse_abort_leaves_document_unchanged() {
        let mut h = Harness::new();
        let mut tool = BoxTool::ellipse();
        h.down(&mut tool, 0.0, 0.0);
        h.moved(&mut tool, 20.0, 20.0);
        h.right(&mut tool, 20.0, 20.0);
        assert!(h.current().is_empty());
        assert!(h.scene.working().is_empty());
        assert_eq!(h.scene.arena_len(), 0);
    }
}
