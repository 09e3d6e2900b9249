//! Selection tool: click and rubber-band selection, dragging, and
//! connect/disconnect while dragging a single point.

use super::{Effect, Tool, ToolContext, ToolKind};
use crate::connect::{connect_point, disconnect_point};
use crate::geometry::rect_from_corners;
use crate::hittest;
use crate::input::{InputArgs, ToolEvent};
use crate::shapes::{RectangleShape, ShapeId, ShapeKind};
use kurbo::Point;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    None,
    /// Rubber-band rectangle follows the pointer.
    Selection,
    /// Dragging the selection.
    Move,
}

#[derive(Debug, Clone, Default)]
struct SelectionData {
    /// Rubber band and its live corner.
    band: Option<(ShapeId, ShapeId)>,
    origin: Point,
    last: Point,
    /// Undo snapshot taken for this drag.
    undo_pushed: bool,
    /// Disconnect already fired in this drag.
    disconnected: bool,
}

impl SelectionData {
    fn reset(&mut self, at: Point) {
        *self = SelectionData {
            origin: at,
            last: at,
            ..SelectionData::default()
        };
    }
}

/// Whether a point under the pointer may be picked directly: standalone
/// points always, connectors only when they or their owner are selected.
fn point_pickable(ctx: &ToolContext, point: ShapeId) -> bool {
    let Some(shape) = ctx.scene.get(point) else {
        return false;
    };
    let selection = ctx.selection.lock();
    shape.state().is_standalone()
        || selection.is_selected(point)
        || shape.owner().is_some_and(|o| selection.is_selected(o))
}

/// The single selected point, if the selection is exactly one point.
fn single_point(ctx: &ToolContext) -> Option<ShapeId> {
    let single = ctx.selection.lock().single()?;
    ctx.scene.get(single)?.kind.is_point().then_some(single)
}

impl SelectionState {
    fn transition(self, event: ToolEvent, data: &mut SelectionData, ctx: &mut ToolContext) -> Self {
        match (self, event) {
            (SelectionState::None, ToolEvent::LeftDown(args)) => Self::press(args, data, ctx),
            (SelectionState::None, ToolEvent::Move(args)) => {
                let hit = ctx.try_get_shape(args.point, ctx.settings.hit_test_radius);
                if ctx.selection.lock().set_hovered(hit) {
                    ctx.emit(Effect::Invalidate);
                }
                SelectionState::None
            }
            (SelectionState::Selection, ToolEvent::Move(args)) => {
                if let Some((_, corner)) = data.band {
                    ctx.scene.set_position(corner, args.point);
                    ctx.emit(Effect::Invalidate);
                }
                SelectionState::Selection
            }
            (SelectionState::Selection, ToolEvent::LeftUp(args)) => {
                let rect = rect_from_corners(data.origin, args.point);
                let scene = &*ctx.scene;
                let layer = scene.current().shapes();
                let found = if ctx.settings.point_selection {
                    hittest::try_get_points_in_rect(scene, layer, rect)
                } else {
                    hittest::try_get_shapes_in_rect(scene, layer, rect)
                };
                log::debug!("rubber band selected {} item(s)", found.len());
                ctx.selection.lock().selected_mut().extend(found);
                if let Some((band, _)) = data.band.take() {
                    ctx.emit(Effect::RemoveWorking(band));
                    ctx.emit(Effect::Discard(band));
                }
                ctx.finish();
                SelectionState::None
            }
            (SelectionState::Selection, ToolEvent::RightDown(_)) => {
                if let Some((band, _)) = data.band.take() {
                    ctx.abort(band);
                }
                SelectionState::None
            }
            (SelectionState::Move, ToolEvent::Move(args)) => {
                Self::drag(args, data, ctx);
                SelectionState::Move
            }
            (SelectionState::Move, ToolEvent::LeftUp(_) | ToolEvent::RightDown(_)) => {
                ctx.finish();
                SelectionState::None
            }
            (state, _) => state,
        }
    }

    fn press(args: InputArgs, data: &mut SelectionData, ctx: &mut ToolContext) -> Self {
        let p = args.point;
        let additive = args.modifiers.has(ctx.settings.additive_modifier);
        let radius = ctx.settings.hit_test_radius;
        data.reset(p);

        let point = ctx.try_get_point(p, radius, &[]).filter(|&pt| point_pickable(ctx, pt));
        if let Some(target) = point.or_else(|| ctx.try_get_shape(p, radius)) {
            let removed = {
                let mut selection = ctx.selection.lock();
                if additive {
                    let removed = selection.deselect(target);
                    if !removed {
                        selection.add(target);
                    }
                    removed
                } else {
                    if !selection.is_selected(target) {
                        selection.select(target);
                    }
                    false
                }
            };
            ctx.emit(Effect::Invalidate);
            // Toggling a shape off does not start a drag of the rest.
            if removed {
                return SelectionState::None;
            }
            ctx.emit(Effect::Capture);
            return SelectionState::Move;
        }

        if !additive {
            ctx.selection.lock().clear();
        }
        let top_left = ctx.new_point(p);
        let bottom_right = ctx.new_point(p);
        let band = ctx.new_shape(ShapeKind::Rectangle(RectangleShape::new(top_left, bottom_right)));
        data.band = Some((band, bottom_right));
        ctx.emit(Effect::AddWorking(band));
        ctx.emit(Effect::Capture);
        ctx.emit(Effect::Invalidate);
        SelectionState::Selection
    }

    fn drag(args: InputArgs, data: &mut SelectionData, ctx: &mut ToolContext) {
        let p = args.point;
        let delta = p - data.last;
        if delta.hypot2() == 0.0 {
            return;
        }
        data.last = p;
        if !data.undo_pushed {
            ctx.scene.push_undo();
            data.undo_pushed = true;
        }

        let settings = ctx.settings;
        if settings.disconnect_points
            && !data.disconnected
            && args.modifiers.has(settings.disconnect_modifier)
            && (p - data.origin).hypot() >= settings.disconnect_threshold
        {
            if let Some(copy) = Self::disconnect_dragged(ctx) {
                data.disconnected = true;
                ctx.selection.lock().select(copy);
            }
        }

        let (ids, set): (Vec<ShapeId>, HashSet<ShapeId>) = {
            let selection = ctx.selection.lock();
            (selection.selected().iter().copied().collect(), selection.selected().clone())
        };
        ctx.scene.move_shapes(&ids, &set, delta);

        if settings.connect_points && args.modifiers.has(settings.connect_modifier) {
            Self::connect_dragged(p, ctx);
        }
        ctx.emit(Effect::Invalidate);
    }

    /// Give the first non-primary owner of the dragged shared point its own
    /// copy. Returns the copy.
    fn disconnect_dragged(ctx: &mut ToolContext) -> Option<ShapeId> {
        let point = single_point(ctx)?;
        let owners = ctx.scene.owners_of(point);
        if owners.len() < 2 {
            return None;
        }
        let primary = ctx.scene.get(point)?.owner();
        let target = owners.iter().copied().find(|&o| Some(o) != primary)?;
        disconnect_point(ctx.scene, target, point)
    }

    /// Splice the dragged point into a nearby foreign point's owners.
    fn connect_dragged(p: Point, ctx: &mut ToolContext) {
        let Some(point) = single_point(ctx) else {
            return;
        };
        let mut exclude = vec![point];
        for owner in ctx.scene.owners_of(point) {
            exclude.extend(ctx.scene.points(owner));
        }
        let Some(target) = ctx.try_get_point(p, ctx.settings.connection_radius, &exclude) else {
            return;
        };
        let target_position = ctx.scene.position(target);
        let Some(connection) = connect_point(ctx.scene, point, target) else {
            return;
        };
        if let Some(at) = target_position {
            ctx.scene.set_position(point, at);
        }
        if connection.was_standalone {
            ctx.emit(Effect::RemoveCurrent(point));
        }
    }
}

/// Picks, rubber-band selects and drags shapes.
#[derive(Debug, Default)]
pub struct SelectionTool {
    state: SelectionState,
    data: SelectionData,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }
}

impl Tool for SelectionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Selection
    }

    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event, &mut self.data, ctx);
    }

    fn clean(&mut self, ctx: &mut ToolContext) {
        match self.state {
            SelectionState::Selection => {
                if let Some((band, _)) = self.data.band.take() {
                    ctx.abort(band);
                }
            }
            SelectionState::Move => ctx.finish(),
            SelectionState::None => {}
        }
        self.state = SelectionState::None;
    }

    fn is_idle(&self) -> bool {
        self.state == SelectionState::None
    }
}
