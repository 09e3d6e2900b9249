//! Cubic and quadratic bezier shapes.

use super::{PointSlots, ShapeId};
use serde::{Deserialize, Serialize};

/// Cubic bezier: `point1` and `point4` are the ends, `point2`/`point3` the controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubicBezierShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
    pub point4: ShapeId,
}

impl CubicBezierShape {
    pub fn new(point1: ShapeId, point2: ShapeId, point3: ShapeId, point4: ShapeId) -> Self {
        Self { point1, point2, point3, point4 }
    }
}

impl PointSlots for CubicBezierShape {
    fn slots(&self) -> Vec<ShapeId> {
        vec![self.point1, self.point2, self.point3, self.point4]
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        vec![&mut self.point1, &mut self.point2, &mut self.point3, &mut self.point4]
    }
}

/// Quadratic bezier: `point1` and `point3` are the ends, `point2` the control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadraticBezierShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
}

impl QuadraticBezierShape {
    pub fn new(point1: ShapeId, point2: ShapeId, point3: ShapeId) -> Self {
        Self { point1, point2, point3 }
    }
}

impl PointSlots for QuadraticBezierShape {
    fn slots(&self) -> Vec<ShapeId> {
        vec![self.point1, self.point2, self.point3]
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        vec![&mut self.point1, &mut self.point2, &mut self.point3]
    }
}
