//! vecdraw Core Library
//!
//! Scene graph, hit testing, connectivity and tool state machines for a 2D
//! vector drawing editor. Platform-agnostic: hosts supply pointer events and
//! a renderer.

pub mod algorithms;
pub mod connect;
pub mod editor;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod hittest;
pub mod input;
pub mod render;
pub mod scene;
pub mod selection;
pub mod settings;
pub mod shapes;
pub mod tools;

pub use algorithms::{IntersectionFinder, LineIntersectionFinder, douglas_peucker};
pub use connect::{Connection, connect_point, disconnect_point, disconnect_shape};
pub use editor::{Editor, HeadlessHost, ToolHost};
pub use error::{EditorError, EditorResult};
pub use filters::{FilterChain, PointFilter};
pub use input::{InputArgs, ModifierKey, Modifiers, ToolEvent};
pub use render::{RecordingRenderer, ShapeRenderer};
pub use scene::{LayerKind, Scene};
pub use selection::{Selection, SelectionSurface};
pub use settings::EditorSettings;
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeState, ShapeStyle};
pub use tools::{Effect, PathSubTool, Tool, ToolContext, ToolKind};
