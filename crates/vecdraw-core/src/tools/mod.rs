//! Tool system: state machines that turn pointer events into scene edits.
//!
//! A tool owns an explicit state enum. Each event runs one transition,
//! which may allocate in the arena and move points directly, but every
//! change to a layer and every host hook is emitted as an [`Effect`] for
//! the driver to apply afterwards. A transition never reads layer contents
//! it has itself changed.

mod bezier;
mod boxed;
mod context;
mod line;
mod path;
mod point;
mod scribble;
mod selection;

pub use bezier::{CubicBezierTool, CubicState, QuadraticBezierTool, QuadraticState};
pub use boxed::{BoxKind, BoxState, BoxTool};
pub use context::ToolContext;
pub use line::{LineState, LineTool, apply_fixed_length};
pub use path::{PathState, PathSubTool, PathTool};
pub use point::PointTool;
pub use scribble::{ScribbleState, ScribbleTool};
pub use selection::{SelectionState, SelectionTool};

use crate::input::ToolEvent;
use crate::shapes::ShapeId;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    None,
    #[default]
    Selection,
    Point,
    Line,
    CubicBezier,
    QuadraticBezier,
    Rectangle,
    Ellipse,
    Text,
    Path,
    Scribble,
}

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 11] = [
        ToolKind::None,
        ToolKind::Selection,
        ToolKind::Point,
        ToolKind::Line,
        ToolKind::CubicBezier,
        ToolKind::QuadraticBezier,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Text,
        ToolKind::Path,
        ToolKind::Scribble,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::None => "none",
            ToolKind::Selection => "selection",
            ToolKind::Point => "point",
            ToolKind::Line => "line",
            ToolKind::CubicBezier => "cubic-bezier",
            ToolKind::QuadraticBezier => "quadratic-bezier",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Text => "text",
            ToolKind::Path => "path",
            ToolKind::Scribble => "scribble",
        }
    }
}

/// A deferred change requested by a tool transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    AddWorking(ShapeId),
    RemoveWorking(ShapeId),
    AddCurrent(ShapeId),
    InsertCurrent { index: usize, shape: ShapeId },
    RemoveCurrent(ShapeId),
    /// Move from the working layer to the current layer.
    Commit(ShapeId),
    /// Delete from the arena (with the points it alone owns).
    Discard(ShapeId),
    Capture,
    Release,
    Invalidate,
}

/// Common interface of every tool.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Run one transition.
    fn handle(&mut self, event: ToolEvent, ctx: &mut ToolContext);

    /// Abort any gesture in progress. Safe to call when idle.
    fn clean(&mut self, ctx: &mut ToolContext);

    /// Whether the tool is in its initial state.
    fn is_idle(&self) -> bool;
}

/// Tool that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneTool;

impl Tool for NoneTool {
    fn kind(&self) -> ToolKind {
        ToolKind::None
    }

    fn handle(&mut self, _event: ToolEvent, _ctx: &mut ToolContext) {}

    fn clean(&mut self, _ctx: &mut ToolContext) {}

    fn is_idle(&self) -> bool {
        true
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::algorithms::{IntersectionFinder, LineIntersectionFinder};
    use crate::filters::FilterChain;
    use crate::input::InputArgs;
    use crate::scene::Scene;
    use crate::selection::SelectionSurface;
    use crate::settings::EditorSettings;

    /// Owns everything a [`ToolContext`] borrows and applies effects the way
    /// the editor does.
    pub struct Harness {
        pub scene: Scene,
        pub selection: SelectionSurface,
        pub settings: EditorSettings,
        pub filters: FilterChain,
        pub finders: Vec<Box<dyn IntersectionFinder>>,
        pub captured: i32,
        pub effects: Vec<Effect>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_settings(EditorSettings::default())
        }

        pub fn with_settings(settings: EditorSettings) -> Self {
            Self {
                scene: Scene::new(),
                selection: SelectionSurface::new(),
                filters: FilterChain::from_settings(&settings),
                settings,
                finders: vec![Box::new(LineIntersectionFinder::new())],
                captured: 0,
                effects: Vec::new(),
            }
        }

        pub fn run(&mut self, f: impl FnOnce(&mut ToolContext)) {
            let mut ctx = ToolContext::new(
                &mut self.scene,
                &self.selection,
                &self.settings,
                &mut self.filters,
                &mut self.finders,
            );
            f(&mut ctx);
            let effects = ctx.into_effects();
            for effect in &effects {
                match *effect {
                    Effect::AddWorking(id) => {
                        self.scene.layer_mut(crate::scene::LayerKind::Working).add(id);
                    }
                    Effect::RemoveWorking(id) => {
                        self.scene.layer_mut(crate::scene::LayerKind::Working).remove(id);
                    }
                    Effect::AddCurrent(id) => {
                        self.scene.layer_mut(crate::scene::LayerKind::Current).add(id);
                    }
                    Effect::InsertCurrent { index, shape } => {
                        self.scene.layer_mut(crate::scene::LayerKind::Current).insert(index, shape);
                    }
                    Effect::RemoveCurrent(id) => {
                        self.scene.layer_mut(crate::scene::LayerKind::Current).remove(id);
                    }
                    Effect::Commit(id) => {
                        self.scene.commit(id);
                    }
                    Effect::Discard(id) => {
                        self.scene.delete(id);
                    }
                    Effect::Capture => self.captured += 1,
                    Effect::Release => self.captured -= 1,
                    Effect::Invalidate => {}
                }
            }
            self.effects.extend(effects);
        }

        pub fn event(&mut self, tool: &mut dyn Tool, event: ToolEvent) {
            self.run(|ctx| tool.handle(event, ctx));
        }

        pub fn clean(&mut self, tool: &mut dyn Tool) {
            self.run(|ctx| tool.clean(ctx));
        }

        pub fn down(&mut self, tool: &mut dyn Tool, x: f64, y: f64) {
            self.event(tool, ToolEvent::LeftDown(InputArgs::new(x, y)));
        }

        pub fn up(&mut self, tool: &mut dyn Tool, x: f64, y: f64) {
            self.event(tool, ToolEvent::LeftUp(InputArgs::new(x, y)));
        }

        pub fn right(&mut self, tool: &mut dyn Tool, x: f64, y: f64) {
            self.event(tool, ToolEvent::RightDown(InputArgs::new(x, y)));
        }

        pub fn moved(&mut self, tool: &mut dyn Tool, x: f64, y: f64) {
            self.event(tool, ToolEvent::Move(InputArgs::new(x, y)));
        }

        pub fn current(&self) -> Vec<ShapeId> {
            self.scene.current().shapes().to_vec()
        }
    }
}
