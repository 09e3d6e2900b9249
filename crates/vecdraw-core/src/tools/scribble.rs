//! Freehand drawing as a streamed polyline path.

use super::{Effect, Tool, ToolContext, ToolKind};
use crate::algorithms::douglas_peucker;
use crate::geometry::GEOMETRY_EPSILON;
use crate::input::ToolEvent;
use crate::shapes::{PathFigure, PathGeometry, PathSegment, PathShape, ShapeId, ShapeKind};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScribbleState {
    #[default]
    None,
    /// Button held, every move appends a segment.
    Drawing,
}

#[derive(Debug, Clone, Default)]
struct ScribbleData {
    path: Option<ShapeId>,
    /// Start point followed by every appended point, in drawing order.
    points: Vec<ShapeId>,
}

impl ScribbleState {
    fn transition(self, event: ToolEvent, data: &mut ScribbleData, ctx: &mut ToolContext) -> Self {
        match (self, event) {
            (ScribbleState::None, ToolEvent::LeftDown(args)) => {
                let p = ctx.filter(args.point);
                let start = ctx.new_point(p);
                let geometry = PathGeometry {
                    figures: vec![PathFigure::new(start)],
                    ..PathGeometry::default()
                };
                let path = ctx.new_shape(ShapeKind::Path(PathShape::new(geometry)));
                ctx.emit(Effect::AddWorking(path));
                ctx.emit(Effect::Capture);
                ctx.emit(Effect::Invalidate);
                data.path = Some(path);
                data.points = vec![start];
                ScribbleState::Drawing
            }
            (ScribbleState::Drawing, ToolEvent::Move(args)) => {
                let Some(path) = data.path else {
                    return ScribbleState::None;
                };
                let p = ctx.filter(args.point);
                let point = ctx.new_point(p);
                ctx.scene.adopt(path, point);
                if let Some(figure) = last_figure(ctx, path) {
                    figure.segments.push(PathSegment::line(point));
                }
                data.points.push(point);
                ctx.emit(Effect::Invalidate);
                ScribbleState::Drawing
            }
            (ScribbleState::Drawing, ToolEvent::LeftUp(_)) => {
                if let Some(path) = data.path.take() {
                    let points = std::mem::take(&mut data.points);
                    finish(path, points, ctx);
                }
                ScribbleState::None
            }
            (ScribbleState::Drawing, ToolEvent::RightDown(_)) => {
                if let Some(path) = data.path.take() {
                    data.points.clear();
                    ctx.abort(path);
                }
                ScribbleState::None
            }
            (state, _) => state,
        }
    }
}

fn last_figure<'s>(ctx: &'s mut ToolContext, path: ShapeId) -> Option<&'s mut PathFigure> {
    ctx.scene
        .get_mut(path)?
        .kind
        .as_path_mut()?
        .geometry
        .figures
        .last_mut()
}

/// Simplify the stroke if enabled, then commit it or drop it when it never
/// grew a segment.
fn finish(path: ShapeId, points: Vec<ShapeId>, ctx: &mut ToolContext) {
    if ctx.settings.scribble_simplify {
        let kept = simplified(ctx, &points, ctx.settings.scribble_epsilon);
        if kept.len() < points.len() {
            if let Some(figure) = last_figure(ctx, path) {
                figure.start_point = kept[0];
                figure.segments = kept[1..].iter().map(|&p| PathSegment::line(p)).collect();
            }
            for p in points.iter().filter(|p| !kept.contains(p)) {
                ctx.scene.delete(*p);
            }
            log::debug!("scribble simplified from {} to {} points", points.len(), kept.len());
        }
    }

    let valid = ctx
        .scene
        .get(path)
        .and_then(|s| s.kind.as_path())
        .is_some_and(|p| p.geometry.figures.iter().all(PathFigure::is_valid));
    if valid {
        ctx.commit(path);
    } else {
        log::warn!("scribble dropped: no segments");
        ctx.abort(path);
    }
}

/// Drop consecutive coincident points, then keep the Douglas-Peucker subset.
/// A non-positive epsilon or fewer than two points only deduplicates.
fn simplified(ctx: &ToolContext, points: &[ShapeId], epsilon: f64) -> Vec<ShapeId> {
    let mut unique: Vec<(ShapeId, Point)> = Vec::with_capacity(points.len());
    for &id in points {
        let Some(pos) = ctx.scene.position(id) else { continue };
        if unique.last().is_none_or(|&(_, last)| (pos - last).hypot() > GEOMETRY_EPSILON) {
            unique.push((id, pos));
        }
    }
    if epsilon <= 0.0 || unique.len() < 2 {
        return unique.into_iter().map(|(id, _)| id).collect();
    }
    let positions: Vec<Point> = unique.iter().map(|&(_, p)| p).collect();
    douglas_peucker(&positions, epsilon)
        .into_iter()
        .map(|i| unique[i].0)
        .collect()
}

/// Draws freehand strokes while the left button is held.
#[derive(Debug, Default)]
pub struct ScribbleTool {
    state: ScribbleState,
    data: ScribbleData,
}

impl ScribbleTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScribbleState {
        self.state
    }
}

impl Tool for ScribbleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Scribble
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event, &mut self.data, ctx);
    }

    fn clean(&mut self, ctx: &mut ToolContext) {
        if let Some(path) = self.data.path.take() {
            ctx.abort(path);
        }
        self.data.points.clear();
        self.state = ScribbleState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == ScribbleState::None
    }
}
