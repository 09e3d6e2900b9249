//! Ellipse shape.

use super::{PointSlots, ShapeId};
use serde::{Deserialize, Serialize};

/// An ellipse inscribed in the box spanned by two corner points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EllipseShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
}

impl EllipseShape {
    pub fn new(top_left: ShapeId, bottom_right: ShapeId) -> Self {
        Self { top_left, bottom_right }
    }
}

impl PointSlots for EllipseShape {
    fn slots(&self) -> Vec<ShapeId> {
        vec![self.top_left, self.bottom_right]
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        vec![&mut self.top_left, &mut self.bottom_right]
    }
}
