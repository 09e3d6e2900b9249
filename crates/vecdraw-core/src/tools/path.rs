//! Path tool: chains line and bezier segments into figures of one path.
//!
//! The segment under construction (the preview) is always the last segment
//! of the last figure. Completing it starts the next preview at its end
//! point, so every figure stays continuous.

use super::{Effect, Tool, ToolContext, ToolKind};
use crate::input::ToolEvent;
use crate::shapes::{PathFigure, PathGeometry, PathSegment, PathShape, ShapeId, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Segment kind the path tool adds next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PathSubTool {
    #[default]
    Line,
    CubicBezier,
    QuadraticBezier,
    /// End the current figure; the next click starts a new one.
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathState {
    #[default]
    None,
    /// A preview segment follows the pointer.
    Segment,
    /// Figure ended, waiting for the start of the next one.
    NewFigure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    End,
    Control1,
    Control2,
}

#[derive(Debug, Clone, Copy)]
enum Preview {
    Line {
        end: ShapeId,
    },
    Cubic {
        phase: Phase,
        point1: ShapeId,
        point2: ShapeId,
        point3: ShapeId,
    },
    Quadratic {
        phase: Phase,
        point1: ShapeId,
        point2: ShapeId,
    },
}

impl Preview {
    /// Points that follow the pointer in the current phase.
    fn live(&self) -> Vec<ShapeId> {
        match *self {
            Preview::Line { end } => vec![end],
            Preview::Cubic { phase, point1, point2, point3 } => match phase {
                Phase::End => vec![point1, point2, point3],
                Phase::Control1 => vec![point1, point2],
                Phase::Control2 => vec![point2],
            },
            Preview::Quadratic { phase, point1, point2 } => match phase {
                Phase::End => vec![point1, point2],
                _ => vec![point1],
            },
        }
    }

    fn points(&self) -> Vec<ShapeId> {
        match *self {
            Preview::Line { end } => vec![end],
            Preview::Cubic { point1, point2, point3, .. } => vec![point1, point2, point3],
            Preview::Quadratic { point1, point2, .. } => vec![point1, point2],
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PathData {
    path: Option<ShapeId>,
    sub: PathSubTool,
    /// Sub-tool to return to after a `Move`.
    previous: PathSubTool,
    preview: Option<Preview>,
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

fn last_position(ctx: &ToolContext, path: ShapeId) -> Option<Point> {
    let figure = ctx.scene.get(path)?.kind.as_path()?.geometry.figures.last()?;
    ctx.scene.position(figure.last_point())
}

fn new_owned_point(ctx: &mut ToolContext, path: ShapeId, at: Point) -> ShapeId {
    let point = ctx.new_point(at);
    ctx.scene.adopt(path, point);
    point
}

/// Append a preview segment of kind `sub` to the last figure.
fn begin(sub: PathSubTool, path: ShapeId, at: Point, ctx: &mut ToolContext) -> Option<Preview> {
    let (preview, segment) = match sub {
        PathSubTool::Move => return None,
        PathSubTool::Line => {
            let end = new_owned_point(ctx, path, at);
            (Preview::Line { end }, PathSegment::line(end))
        }
        PathSubTool::CubicBezier => {
            let point1 = new_owned_point(ctx, path, at);
            let point2 = new_owned_point(ctx, path, at);
            let point3 = new_owned_point(ctx, path, at);
            (
                Preview::Cubic {
                    phase: Phase::End,
                    point1,
                    point2,
                    point3,
                },
                PathSegment::cubic(point1, point2, point3),
            )
        }
        PathSubTool::QuadraticBezier => {
            let point1 = new_owned_point(ctx, path, at);
            let point2 = new_owned_point(ctx, path, at);
            (
                Preview::Quadratic {
                    phase: Phase::End,
                    point1,
                    point2,
                },
                PathSegment::quadratic(point1, point2),
            )
        }
    };
    last_figure(ctx, path)?.segments.push(segment);
    ctx.select_points(path);
    Some(preview)
}

/// Fix the live point of the current phase at `p`. Returns the preview if
/// the segment still needs more clicks.
fn advance(preview: Preview, path: ShapeId, p: Point, ctx: &mut ToolContext) -> Option<Preview> {
    let place = |ctx: &mut ToolContext, point: ShapeId| place_point(ctx, path, point, p);
    match preview {
        Preview::Line { end } => {
            place(ctx, end);
            None
        }
        Preview::Cubic { phase, point1, point2, point3 } => match phase {
            Phase::End => Some(Preview::Cubic {
                phase: Phase::Control1,
                point1,
                point2,
                point3: place(ctx, point3),
            }),
            Phase::Control1 => Some(Preview::Cubic {
                phase: Phase::Control2,
                point1: place(ctx, point1),
                point2,
                point3,
            }),
            Phase::Control2 => {
                place(ctx, point2);
                None
            }
        },
        Preview::Quadratic { phase, point1, point2 } => match phase {
            Phase::End => Some(Preview::Quadratic {
                phase: Phase::Control1,
                point1,
                point2: place(ctx, point2),
            }),
            _ => {
                place(ctx, point1);
                None
            }
        },
    }
}

fn place_point(ctx: &mut ToolContext, path: ShapeId, point: ShapeId, p: Point) -> ShapeId {
    ctx.scene.set_position(point, p);
    ctx.resolve_point(path, point, p)
}

/// Delete points of `path` that nothing references any more.
fn release_points(ctx: &mut ToolContext, path: ShapeId, points: &[ShapeId]) {
    let mut selection = ctx.selection.lock();
    for &point in points {
        selection.deselect(point);
        let owned = ctx.scene.get(point).is_some_and(|s| s.owner() == Some(path));
        if owned && ctx.scene.owners_of(point).is_empty() {
            ctx.scene.delete(point);
        }
    }
}

/// Remove the preview segment from the last figure.
fn drop_preview(data: &mut PathData, ctx: &mut ToolContext) {
    let (Some(path), Some(preview)) = (data.path, data.preview.take()) else {
        return;
    };
    if let Some(figure) = last_figure(ctx, path) {
        figure.segments.pop();
    }
    release_points(ctx, path, &preview.points());
}

/// End the gesture: keep the valid figures and commit, or drop the path.
fn finalize(data: &mut PathData, ctx: &mut ToolContext) {
    drop_preview(data, ctx);
    let Some(path) = data.path.take() else {
        return;
    };
    ctx.deselect_points(path);

    let mut dropped: Vec<ShapeId> = Vec::new();
    let mut remaining = 0;
    if let Some(shape) = ctx.scene.get_mut(path).and_then(|s| s.kind.as_path_mut()) {
        let figures = std::mem::take(&mut shape.geometry.figures);
        let (valid, invalid): (Vec<PathFigure>, Vec<PathFigure>) = figures.into_iter().partition(PathFigure::is_valid);
        dropped.extend(invalid.iter().map(|f| f.start_point));
        remaining = valid.len();
        shape.geometry.figures = valid;
    }
    release_points(ctx, path, &dropped);

    if remaining == 0 {
        log::warn!("path dropped: no complete segment");
        ctx.abort(path);
    } else {
        ctx.commit(path);
    }
}

impl PathState {
    fn transition(self, event: ToolEvent, data: &mut PathData, ctx: &mut ToolContext) -> Self {
        match (self, event) {
            (PathState::None, ToolEvent::LeftDown(args)) => {
                if data.sub == PathSubTool::Move {
                    data.sub = data.previous;
                }
                let p = ctx.filter(args.point);
                let start = ctx.next_point_default(p);
                let geometry = PathGeometry {
                    figures: vec![PathFigure::new(start)],
                    ..PathGeometry::default()
                };
                let path = ctx.new_shape(ShapeKind::Path(PathShape::new(geometry)));
                ctx.emit(Effect::AddWorking(path));
                ctx.emit(Effect::Capture);
                ctx.emit(Effect::Invalidate);
                data.path = Some(path);
                data.preview = begin(data.sub, path, p, ctx);
                PathState::Segment
            }
            (PathState::Segment, ToolEvent::Move(args)) => {
                let p = ctx.filter(args.point);
                if let Some(preview) = data.preview {
                    for point in preview.live() {
                        ctx.scene.set_position(point, p);
                    }
                }
                ctx.emit(Effect::Invalidate);
                PathState::Segment
            }
            (PathState::Segment, ToolEvent::LeftDown(args)) => {
                let (Some(path), Some(preview)) = (data.path, data.preview) else {
                    return self;
                };
                let p = ctx.filter(args.point);
                data.preview = match advance(preview, path, p, ctx) {
                    Some(next) => Some(next),
                    None => {
                        let at = last_position(ctx, path).unwrap_or(p);
                        begin(data.sub, path, at, ctx)
                    }
                };
                ctx.emit(Effect::Invalidate);
                PathState::Segment
            }
            (PathState::NewFigure, ToolEvent::LeftDown(args)) => {
                let Some(path) = data.path else {
                    return PathState::None;
                };
                let p = ctx.filter(args.point);
                let start = ctx.next_point_default(p);
                if let Some(shape) = ctx.scene.get_mut(path).and_then(|s| s.kind.as_path_mut()) {
                    shape.geometry.figures.push(PathFigure::new(start));
                }
                let free = ctx.scene.get(start).is_some_and(|s| s.owner().is_none()) && !ctx.scene.current().contains(start);
                if free {
                    ctx.scene.adopt(path, start);
                }
                data.sub = data.previous;
                data.preview = begin(data.sub, path, p, ctx);
                ctx.emit(Effect::Invalidate);
                log::debug!("path: new figure");
                PathState::Segment
            }
            (PathState::Segment | PathState::NewFigure, ToolEvent::RightDown(_)) => {
                finalize(data, ctx);
                PathState::None
            }
            (state, _) => state,
        }
    }
}

/// Builds a path from chained segments. Right click finishes the path.
#[derive(Debug, Default)]
pub struct PathTool {
    state: PathState,
    data: PathData,
}

impl PathTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    pub fn sub_tool(&self) -> PathSubTool {
        self.data.sub
    }

    /// Switch the segment kind. A preview in progress is replaced by one of
    /// the new kind; `Move` ends the current figure.
    pub fn set_sub_tool(&mut self, sub: PathSubTool, ctx: &mut ToolContext) {
        if sub == self.data.sub {
            return;
        }
        if sub != PathSubTool::Move {
            self.data.previous = sub;
        } else if self.data.sub != PathSubTool::Move {
            self.data.previous = self.data.sub;
        }
        self.data.sub = sub;

        if self.state != PathState::Segment {
            return;
        }
        drop_preview(&mut self.data, ctx);
        let Some(path) = self.data.path else {
            return;
        };
        if sub == PathSubTool::Move {
            self.state = PathState::NewFigure;
        } else if let Some(at) = last_position(ctx, path) {
            self.data.preview = begin(sub, path, at, ctx);
        }
        ctx.emit(Effect::Invalidate);
    }
}

impl Tool for PathTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Path
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event, &mut self.data, ctx);
    }

    /// Drops the whole path, completed segments included.
    fn clean(&mut self, ctx: &mut ToolContext) {
        self.data.preview = None;
        if let Some(path) = self.data.path.take() {
            ctx.abort(path);
        }
        self.state = PathState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == PathState::None
    }
}
