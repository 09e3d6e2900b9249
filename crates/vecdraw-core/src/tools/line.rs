//! Two-click line tool.

use super::{Effect, Tool, ToolContext, ToolKind};
use crate::algorithms::{Intersection, LineSplit, split_lines};
use crate::geometry::normalized;
use crate::input::ToolEvent;
use crate::scene::Scene;
use crate::settings::{FixedLength, FixedLengthFlags};
use crate::shapes::{LineShape, ShapeId, ShapeKind};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    #[default]
    None,
    /// Start placed, end follows the pointer.
    End,
}

#[derive(Debug, Clone, Default)]
struct LineData {
    line: Option<ShapeId>,
    end: Option<ShapeId>,
}

impl LineData {
    fn take(&mut self) -> Option<(ShapeId, ShapeId)> {
        Some((self.line.take()?, self.end.take()?))
    }
}

impl LineState {
    fn transition(self, event: ToolEvent, data: &mut LineData, ctx: &mut ToolContext) -> Self {
        match (self, event) {
            (LineState::None, ToolEvent::LeftDown(args)) => {
                let p = ctx.filter(args.point);
                let start = ctx.next_point_default(p);
                let end = ctx.new_point(p);
                let line = ctx.new_shape(ShapeKind::Line(LineShape::new(start, end)));
                ctx.emit(Effect::AddWorking(line));
                ctx.select_points(line);
                ctx.emit(Effect::Capture);
                ctx.emit(Effect::Invalidate);
                data.line = Some(line);
                data.end = Some(end);
                log::debug!("line: start placed");
                LineState::End
            }
            (LineState::End, ToolEvent::Move(args)) => {
                let p = ctx.filter(args.point);
                if let Some(end) = data.end {
                    ctx.scene.set_position(end, p);
                }
                ctx.emit(Effect::Invalidate);
                LineState::End
            }
            (LineState::End, ToolEvent::LeftDown(args)) => {
                let Some((line, end)) = data.take() else {
                    return LineState::None;
                };
                let p = ctx.filter(args.point);
                ctx.scene.set_position(end, p);
                let fixed = ctx.settings.fixed_length;
                apply_fixed_length(ctx.scene, line, &fixed);
                let p = ctx.scene.position(end).unwrap_or(p);
                ctx.resolve_point(line, end, p);
                finalize(line, ctx);
                LineState::None
            }
            (LineState::End, ToolEvent::RightDown(_)) => {
                if let Some((line, _)) = data.take() {
                    ctx.abort(line);
                }
                LineState::None
            }
            (state, _) => state,
        }
    }
}

/// Commit the finished line, splitting it at crossings when enabled.
fn finalize(line: ShapeId, ctx: &mut ToolContext) {
    if !ctx.settings.split_lines {
        ctx.commit(line);
        return;
    }

    let scene: &Scene = ctx.scene;
    let shapes = scene.current().shapes().to_vec();
    let mut found: Vec<Intersection> = Vec::new();
    for finder in ctx.finders.iter_mut() {
        if finder.find(scene, &shapes, line) {
            found.extend_from_slice(finder.intersections());
        }
    }
    ctx.clear_finders();

    if found.is_empty() {
        ctx.commit(line);
        return;
    }

    ctx.deselect_points(line);
    ctx.scene.push_undo();
    let splits = split_lines(ctx.scene, line, &found);
    let (own, others): (Vec<LineSplit>, Vec<LineSplit>) = splits.into_iter().partition(|s| s.original == line);
    emit_layer_splits(ctx, &others);
    ctx.emit(Effect::RemoveWorking(line));
    for split in &own {
        for &piece in &split.segments {
            ctx.emit(Effect::AddCurrent(piece));
        }
    }
    ctx.emit(Effect::Discard(line));
    ctx.finish();
    log::info!("line split at {} crossing(s)", found.len());
}

/// Replace committed lines by their pieces, in place in the z-order.
pub(super) fn emit_layer_splits(ctx: &mut ToolContext, splits: &[LineSplit]) {
    let mut placed: Vec<(usize, &LineSplit)> = splits
        .iter()
        .filter_map(|s| Some((ctx.scene.current().position(s.original)?, s)))
        .collect();
    // Highest index first so earlier indices stay valid.
    placed.sort_by(|a, b| b.0.cmp(&a.0));
    for (index, split) in placed {
        for (offset, &piece) in split.segments.iter().enumerate() {
            ctx.emit(Effect::InsertCurrent {
                index: index + offset,
                shape: piece,
            });
        }
        ctx.emit(Effect::RemoveCurrent(split.original));
        ctx.emit(Effect::Discard(split.original));
    }
}

/// Force a line to a fixed length by moving its start or end point along
/// the line direction. Returns whether a point moved.
///
/// With both `START` and `END` set the line is left as drawn, and so is a
/// line whose moving point is not exclusively its own.
pub fn apply_fixed_length(scene: &mut Scene, line: ShapeId, fixed: &FixedLength) -> bool {
    if !fixed.is_enabled() {
        return false;
    }
    let flags = fixed.flags;
    if flags.contains(FixedLengthFlags::START | FixedLengthFlags::END) {
        log::debug!("fixed length on both ends is not applied");
        return false;
    }
    let Some(l) = scene.get(line).and_then(|s| s.kind.as_line()) else {
        return false;
    };
    let (anchor, moving) = if flags.contains(FixedLengthFlags::END) {
        (l.start, l.end)
    } else {
        (l.end, l.start)
    };
    let exclusive = scene.get(moving).and_then(|s| s.owner()) == Some(line) && scene.owners_of(moving) == [line];
    if !exclusive {
        log::debug!("fixed length skipped: the moving point is shared");
        return false;
    }
    let (Some(a), Some(mut m)) = (scene.position(anchor), scene.position(moving)) else {
        return false;
    };

    if flags.contains(FixedLengthFlags::VERTICAL) {
        m.x = a.x;
    }
    if flags.contains(FixedLengthFlags::HORIZONTAL) {
        m.y = a.y;
    }
    let Some(dir) = normalized(m - a) else {
        log::debug!("fixed length skipped for a zero-length line");
        return false;
    };
    let target: Point = a + dir * fixed.length;
    scene.set_position(moving, target)
}

/// Draws a straight line with two clicks.
#[derive(Debug, Default)]
pub struct LineTool {
    state: LineState,
    data: LineData,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LineState {
        self.state
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event, &mut self.data, ctx);
    }

    fn clean(&mut self, ctx: &mut ToolContext) {
        if let Some((line, _)) = self.data.take() {
            ctx.abort(line);
        }
        self.state = LineState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == LineState::None
    }
}
