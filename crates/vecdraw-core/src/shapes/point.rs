//! Point shape.

use super::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Where a point's rendering template is anchored relative to the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointAlignment {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

/// A point: the only shape that can be shared between two owners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointShape {
    /// Location in world coordinates.
    pub position: Point,
    /// Shape used to render the point on canvas. Purely visual, never owned.
    #[serde(default)]
    pub template: Option<ShapeId>,
    /// Anchor hint for the template.
    #[serde(default)]
    pub alignment: PointAlignment,
}

impl PointShape {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            template: None,
            alignment: PointAlignment::None,
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Move to a new location. Returns whether the position changed.
    pub fn set_position(&mut self, position: Point) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position;
        true
    }
}
