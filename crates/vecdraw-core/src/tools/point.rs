//! One-click point tool.

use super::line::emit_layer_splits;
use super::{Effect, Tool, ToolContext, ToolKind};
use crate::algorithms::split_line_at;
use crate::geometry::project_on_segment;
use crate::input::ToolEvent;
use crate::shapes::ShapeId;
use kurbo::Point;

/// Places standalone points. A click on a committed line splits the line
/// there instead, the two halves sharing the new point.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointTool;

impl PointTool {
    pub fn new() -> Self {
        Self
    }

    fn split_target(ctx: &ToolContext, p: Point) -> Option<(ShapeId, Point, f64)> {
        if !(ctx.settings.connect_points && ctx.settings.split_lines) {
            return None;
        }
        let hit = ctx.try_get_shape(p, ctx.settings.hit_test_radius)?;
        let line = ctx.scene.get(hit)?.kind.as_line()?;
        let (a, b) = (ctx.scene.position(line.start)?, ctx.scene.position(line.end)?);
        let (on_line, t) = project_on_segment(p, a, b);
        Some((hit, on_line, t))
    }
}

impl Tool for PointTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Point
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let ToolEvent::LeftDown(args) = event else {
            return;
        };
        let p = ctx.filter(args.point);

        ctx.scene.push_undo();
        if let Some((line, on_line, t)) = Self::split_target(ctx, p) {
            let point = ctx.new_point(on_line);
            match split_line_at(ctx.scene, line, point, t) {
                Some(split) => {
                    emit_layer_splits(ctx, &[split]);
                    ctx.emit(Effect::Invalidate);
                    log::info!("split line at placed point");
                    return;
                }
                None => {
                    ctx.scene.delete(point);
                }
            }
        }

        let point = ctx.new_point(p);
        ctx.emit(Effect::AddCurrent(point));
        ctx.emit(Effect::Invalidate);
        log::info!("committed point");
    }

    fn clean(&mut self, _ctx: &mut ToolContext) {}

    fn is_idle(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EditorSettings;
    use crate::tools::LineTool;
    use crate::tools::test_support::Harness;

    #[test]
    fn test_places_standalone_point() {
        let mut h = Harness::new();
        let mut tool = PointTool::new();
        h.down(&mut tool, 3.0, 4.0);
        let shapes = h.current();
        assert_eq!(shapes.len(), 1);
        let point = h.scene.get(shapes[0]).unwrap();
        assert!(point.state().is_standalone());
        assert_eq!(point.position(), Some(Point::new(3.0, 4.0)));
        assert!(h.scene.can_undo());
    }

    #[test]
    fn test_click_on_line_splits_it() {
        let mut h = Harness::new();
        let mut line_tool = LineTool::new();
        h.down(&mut line_tool, 0.0, 0.0);
        h.down(&mut line_tool, 100.0, 0.0);
        let original = h.current()[0];

        let mut tool = PointTool::new();
        h.down(&mut tool, 40.0, 2.0);
        let shapes = h.current();
        assert_eq!(shapes.len(), 2);
        assert!(!h.scene.contains(original));
        let first = h.scene.get(shapes[0]).unwrap().kind.as_line().unwrap();
        let second = h.scene.get(shapes[1]).unwrap().kind.as_line().unwrap();
        assert_eq!(first.end, second.start);
        assert_eq!(h.scene.position(first.end), Some(Point::new(40.0, 0.0)));
    }

    #[test]
    fn test_no_split_when_disabled() {
        let settings = EditorSettings {
            split_lines: false,
            ..EditorSettings::default()
        };
        let mut h = Harness::with_settings(settings);
        let mut line_tool = LineTool::new();
        h.down(&mut line_tool, 0.0, 0.0);
        h.down(&mut line_tool, 100.0, 0.0);
        let mut tool = PointTool::new();
        h.down(&mut tool, 40.0, 2.0);
        assert_eq!(h.current().len(), 2);
    }
}
