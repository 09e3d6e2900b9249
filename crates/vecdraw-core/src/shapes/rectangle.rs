//! Rectangle shape.

use super::{PointSlots, ShapeId};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle spanned by two corner points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectangleShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
    /// Draw a grid inside the rectangle.
    #[serde(default)]
    pub is_grid: bool,
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub columns: u32,
}

impl RectangleShape {
    pub fn new(top_left: ShapeId, bottom_right: ShapeId) -> Self {
        Self {
            top_left,
            bottom_right,
            is_grid: false,
            rows: 2,
            columns: 2,
        }
    }
}

impl PointSlots for RectangleShape {
    fn slots(&self) -> Vec<ShapeId> {
        vec![self.top_left, self.bottom_right]
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        vec![&mut self.top_left, &mut self.bottom_right]
    }
}
