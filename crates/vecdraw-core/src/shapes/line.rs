//! Line shape.

use super::{PointSlots, ShapeId};
use serde::{Deserialize, Serialize};

/// A straight line between two point handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineShape {
    /// Start point.
    pub start: ShapeId,
    /// End point.
    pub end: ShapeId,
}

impl LineShape {
    pub fn new(start: ShapeId, end: ShapeId) -> Self {
        Self { start, end }
    }
}

impl PointSlots for LineShape {
    fn slots(&self) -> Vec<ShapeId> {
        vec![self.start, self.end]
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        vec![&mut self.start, &mut self.end]
    }
}
