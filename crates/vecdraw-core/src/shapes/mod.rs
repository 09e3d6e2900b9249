//! Shape definitions for the scene graph.
//!
//! Shapes live in a slot-map arena owned by [`crate::scene::Scene`]. A shape
//! never holds another shape by value: points, children and connectors are
//! [`ShapeId`] handles into that arena. A point referenced from two shapes is
//! a connection; the arena entry is its only storage.

mod bezier;
mod data;
mod ellipse;
mod group;
mod line;
mod path;
mod point;
mod rectangle;
mod text;

pub use bezier::{CubicBezierShape, QuadraticBezierShape};
pub use data::{Property, Record, ShapeData, bind_text};
pub use ellipse::EllipseShape;
pub use group::GroupShape;
pub use line::LineShape;
pub use path::{FillRule, PathFigure, PathGeometry, PathSegment, PathShape, SegmentKind, SweepDirection};
pub use point::{PointAlignment, PointShape};
pub use rectangle::RectangleShape;
pub use text::TextShape;

use bitflags::bitflags;
use kurbo::{Affine, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

slotmap::new_key_type! {
    /// Handle of a shape in the scene arena.
    pub struct ShapeId;
}

bitflags! {
    /// Shape state flags.
    ///
    /// `CONNECTOR` and `STANDALONE` partition shapes: a shape placed directly
    /// on a layer is standalone, a point held in another shape's slot is a
    /// connector. `NONE`, `INPUT` and `OUTPUT` give a connector its role.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ShapeState: u16 {
        const VISIBLE    = 1 << 0;
        const PRINTABLE  = 1 << 1;
        const LOCKED     = 1 << 2;
        const SIZE       = 1 << 3;
        const THICKNESS  = 1 << 4;
        const CONNECTOR  = 1 << 5;
        const NONE       = 1 << 6;
        const STANDALONE = 1 << 7;
        const INPUT      = 1 << 8;
        const OUTPUT     = 1 << 9;
    }
}

impl Default for ShapeState {
    fn default() -> Self {
        Self::VISIBLE | Self::PRINTABLE | Self::STANDALONE
    }
}

impl ShapeState {
    /// State of a point living in another shape's slot.
    pub fn connector() -> Self {
        Self::VISIBLE | Self::PRINTABLE | Self::CONNECTOR | Self::NONE
    }

    /// Mark as a connector (clears `STANDALONE`).
    pub fn mark_connector(&mut self) -> bool {
        let before = *self;
        self.remove(Self::STANDALONE);
        self.insert(Self::CONNECTOR);
        if !self.intersects(Self::INPUT | Self::OUTPUT) {
            self.insert(Self::NONE);
        }
        before != *self
    }

    /// Mark as standalone (clears the connector role flags).
    pub fn mark_standalone(&mut self) -> bool {
        let before = *self;
        self.remove(Self::CONNECTOR | Self::NONE | Self::INPUT | Self::OUTPUT);
        self.insert(Self::STANDALONE);
        before != *self
    }

    pub fn is_connector(&self) -> bool {
        self.contains(Self::CONNECTOR)
    }

    pub fn is_standalone(&self) -> bool {
        self.contains(Self::STANDALONE)
    }

    pub fn is_visible(&self) -> bool {
        self.contains(Self::VISIBLE)
    }

    pub fn is_locked(&self) -> bool {
        self.contains(Self::LOCKED)
    }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Drawing style shared by shapes.
///
/// Styles belong to a library outside the scene; shapes hold an `Arc` and
/// never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Style name as shown in the library.
    pub name: String,
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Dash style.
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            stroke_style: StrokeStyle::default(),
            opacity: 1.0,
        }
    }
}

/// Access to the point handles a shape kind stores in its own slots.
///
/// Connectors and group children are not slots; they live on the common
/// record and in [`GroupShape`] respectively.
pub trait PointSlots {
    /// Point handles in slot order.
    fn slots(&self) -> Vec<ShapeId>;

    /// Mutable access to every slot.
    fn slots_mut(&mut self) -> Vec<&mut ShapeId>;

    /// Replace every slot holding `old` with `new`. Returns whether any slot changed.
    fn replace_slot(&mut self, old: ShapeId, new: ShapeId) -> bool {
        let mut changed = false;
        for slot in self.slots_mut() {
            if *slot == old {
                *slot = new;
                changed = true;
            }
        }
        changed
    }
}

/// Per-kind payload of a shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeKind {
    Point(PointShape),
    Line(LineShape),
    CubicBezier(CubicBezierShape),
    QuadraticBezier(QuadraticBezierShape),
    Rectangle(RectangleShape),
    Ellipse(EllipseShape),
    Text(TextShape),
    Path(PathShape),
    Group(GroupShape),
}

impl ShapeKind {
    /// Short lowercase name, used for default shape names.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Point(_) => "point",
            ShapeKind::Line(_) => "line",
            ShapeKind::CubicBezier(_) => "cubic-bezier",
            ShapeKind::QuadraticBezier(_) => "quadratic-bezier",
            ShapeKind::Rectangle(_) => "rectangle",
            ShapeKind::Ellipse(_) => "ellipse",
            ShapeKind::Text(_) => "text",
            ShapeKind::Path(_) => "path",
            ShapeKind::Group(_) => "group",
        }
    }

    pub fn slots(&self) -> Vec<ShapeId> {
        match self {
            ShapeKind::Point(_) => Vec::new(),
            ShapeKind::Line(s) => s.slots(),
            ShapeKind::CubicBezier(s) => s.slots(),
            ShapeKind::QuadraticBezier(s) => s.slots(),
            ShapeKind::Rectangle(s) => s.slots(),
            ShapeKind::Ellipse(s) => s.slots(),
            ShapeKind::Text(s) => s.slots(),
            ShapeKind::Path(s) => s.slots(),
            ShapeKind::Group(_) => Vec::new(),
        }
    }

    pub fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        match self {
            ShapeKind::Point(_) => Vec::new(),
            ShapeKind::Line(s) => s.slots_mut(),
            ShapeKind::CubicBezier(s) => s.slots_mut(),
            ShapeKind::QuadraticBezier(s) => s.slots_mut(),
            ShapeKind::Rectangle(s) => s.slots_mut(),
            ShapeKind::Ellipse(s) => s.slots_mut(),
            ShapeKind::Text(s) => s.slots_mut(),
            ShapeKind::Path(s) => s.slots_mut(),
            ShapeKind::Group(_) => Vec::new(),
        }
    }

    pub fn as_point(&self) -> Option<&PointShape> {
        match self {
            ShapeKind::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointShape> {
        match self {
            ShapeKind::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineShape> {
        match self {
            ShapeKind::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathShape> {
        match self {
            ShapeKind::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathShape> {
        match self {
            ShapeKind::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupShape> {
        match self {
            ShapeKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupShape> {
        match self {
            ShapeKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, ShapeKind::Point(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ShapeKind::Group(_))
    }
}

/// A node of the scene graph: the record every shape kind shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    /// Enclosing connectable shape or group. A back-reference, never an ownership edge.
    owner: Option<ShapeId>,
    state: ShapeState,
    style: Option<Arc<ShapeStyle>>,
    transform: Affine,
    is_stroked: bool,
    is_filled: bool,
    data: ShapeData,
    /// Connector points, in order. Their state marks the role (None/Input/Output).
    connectors: Vec<ShapeId>,
    /// Kind-specific payload.
    pub kind: ShapeKind,
}

impl Shape {
    /// Create a standalone shape with a generated name.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            name: format!("{}-{}", kind.name(), uuid::Uuid::new_v4()),
            owner: None,
            state: ShapeState::default(),
            style: None,
            transform: Affine::IDENTITY,
            is_stroked: true,
            is_filled: false,
            data: ShapeData::default(),
            connectors: Vec::new(),
            kind,
        }
    }

    /// Create a point shape at a location.
    pub fn point(position: Point) -> Self {
        Self::new(ShapeKind::Point(PointShape::new(position)))
    }

    /// Builder: set the style.
    pub fn with_style(mut self, style: Option<Arc<ShapeStyle>>) -> Self {
        self.style = style;
        self
    }

    /// Builder: set the stroke/fill flags.
    pub fn with_paint(mut self, is_stroked: bool, is_filled: bool) -> Self {
        self.is_stroked = is_stroked;
        self.is_filled = is_filled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }

    pub fn owner(&self) -> Option<ShapeId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<ShapeId>) -> bool {
        if self.owner == owner {
            return false;
        }
        self.owner = owner;
        true
    }

    pub fn state(&self) -> ShapeState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut ShapeState {
        &mut self.state
    }

    pub fn set_state(&mut self, state: ShapeState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    pub fn style(&self) -> Option<&ShapeStyle> {
        self.style.as_deref()
    }

    pub fn style_ref(&self) -> Option<Arc<ShapeStyle>> {
        self.style.clone()
    }

    pub fn set_style(&mut self, style: Option<Arc<ShapeStyle>>) -> bool {
        let same = match (&self.style, &style) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }
        self.style = style;
        true
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Affine) -> bool {
        if self.transform == transform {
            return false;
        }
        self.transform = transform;
        true
    }

    pub fn is_stroked(&self) -> bool {
        self.is_stroked
    }

    pub fn set_is_stroked(&mut self, value: bool) -> bool {
        let changed = self.is_stroked != value;
        self.is_stroked = value;
        changed
    }

    pub fn is_filled(&self) -> bool {
        self.is_filled
    }

    pub fn set_is_filled(&mut self, value: bool) -> bool {
        let changed = self.is_filled != value;
        self.is_filled = value;
        changed
    }

    pub fn data(&self) -> &ShapeData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ShapeData {
        &mut self.data
    }

    pub fn connectors(&self) -> &[ShapeId] {
        &self.connectors
    }

    pub(crate) fn connectors_mut(&mut self) -> &mut Vec<ShapeId> {
        &mut self.connectors
    }

    /// Position of a point shape.
    pub fn position(&self) -> Option<Point> {
        self.kind.as_point().map(|p| p.position)
    }

    /// Point handles this shape references directly: its slots followed by
    /// its connectors. Group children are not included.
    pub fn direct_points(&self) -> Vec<ShapeId> {
        let mut points = self.kind.slots();
        points.extend(self.connectors.iter().copied());
        points
    }

    /// Replace a referenced point in slots and connectors.
    pub fn replace_point(&mut self, old: ShapeId, new: ShapeId) -> bool {
        let mut changed = false;
        for slot in self.kind.slots_mut() {
            if *slot == old {
                *slot = new;
                changed = true;
            }
        }
        for connector in &mut self.connectors {
            if *connector == old {
                *connector = new;
                changed = true;
            }
        }
        changed
    }
}
