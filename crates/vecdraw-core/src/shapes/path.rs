//! Path shape: geometry → figures → segments.

use super::{PointSlots, ShapeId};
use kurbo::{BezPath, Point, Size, SvgArc, Vec2};
use serde::{Deserialize, Serialize};

/// Fill rule for path interiors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    EvenOdd,
    Nonzero,
}

/// Sweep direction of an arc segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepDirection {
    #[default]
    Clockwise,
    Counterclockwise,
}

/// Segment payload. Each variant owns the points it needs; the start of a
/// segment is the end of the previous one (or the figure's start point).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SegmentKind {
    Line {
        point: ShapeId,
    },
    CubicBezier {
        point1: ShapeId,
        point2: ShapeId,
        point3: ShapeId,
    },
    QuadraticBezier {
        point1: ShapeId,
        point2: ShapeId,
    },
    Arc {
        point: ShapeId,
        size: Size,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
    },
    PolyLine {
        points: Vec<ShapeId>,
    },
    PolyCubicBezier {
        points: Vec<ShapeId>,
    },
    PolyQuadraticBezier {
        points: Vec<ShapeId>,
    },
}

/// A single segment of a figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub is_stroked: bool,
}

impl PathSegment {
    pub fn new(kind: SegmentKind) -> Self {
        Self { kind, is_stroked: true }
    }

    pub fn line(point: ShapeId) -> Self {
        Self::new(SegmentKind::Line { point })
    }

    pub fn cubic(point1: ShapeId, point2: ShapeId, point3: ShapeId) -> Self {
        Self::new(SegmentKind::CubicBezier { point1, point2, point3 })
    }

    pub fn quadratic(point1: ShapeId, point2: ShapeId) -> Self {
        Self::new(SegmentKind::QuadraticBezier { point1, point2 })
    }

    /// The point this segment ends at.
    pub fn end_point(&self) -> Option<ShapeId> {
        match &self.kind {
            SegmentKind::Line { point } | SegmentKind::Arc { point, .. } => Some(*point),
            SegmentKind::CubicBezier { point3, .. } => Some(*point3),
            SegmentKind::QuadraticBezier { point2, .. } => Some(*point2),
            SegmentKind::PolyLine { points }
            | SegmentKind::PolyCubicBezier { points }
            | SegmentKind::PolyQuadraticBezier { points } => points.last().copied(),
        }
    }
}

impl PointSlots for PathSegment {
    fn slots(&self) -> Vec<ShapeId> {
        match &self.kind {
            SegmentKind::Line { point } | SegmentKind::Arc { point, .. } => vec![*point],
            SegmentKind::CubicBezier { point1, point2, point3 } => vec![*point1, *point2, *point3],
            SegmentKind::QuadraticBezier { point1, point2 } => vec![*point1, *point2],
            SegmentKind::PolyLine { points }
            | SegmentKind::PolyCubicBezier { points }
            | SegmentKind::PolyQuadraticBezier { points } => points.clone(),
        }
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        match &mut self.kind {
            SegmentKind::Line { point } | SegmentKind::Arc { point, .. } => vec![point],
            SegmentKind::CubicBezier { point1, point2, point3 } => vec![point1, point2, point3],
            SegmentKind::QuadraticBezier { point1, point2 } => vec![point1, point2],
            SegmentKind::PolyLine { points }
            | SegmentKind::PolyCubicBezier { points }
            | SegmentKind::PolyQuadraticBezier { points } => points.iter_mut().collect(),
        }
    }
}

/// A contour: a start point followed by connected segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFigure {
    pub start_point: ShapeId,
    pub segments: Vec<PathSegment>,
    pub is_closed: bool,
    pub is_filled: bool,
}

impl PathFigure {
    pub fn new(start_point: ShapeId) -> Self {
        Self {
            start_point,
            segments: Vec::new(),
            is_closed: false,
            is_filled: true,
        }
    }

    /// The last point of the figure: the last segment's end, or the start.
    pub fn last_point(&self) -> ShapeId {
        self.segments
            .iter()
            .rev()
            .find_map(PathSegment::end_point)
            .unwrap_or(self.start_point)
    }

    /// A figure is well formed when it has at least one segment and no
    /// empty poly segment.
    pub fn is_valid(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| s.end_point().is_some())
    }
}

impl PointSlots for PathFigure {
    fn slots(&self) -> Vec<ShapeId> {
        let mut points = vec![self.start_point];
        for segment in &self.segments {
            points.extend(segment.slots());
        }
        points
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        let mut points = vec![&mut self.start_point];
        for segment in &mut self.segments {
            points.extend(segment.slots_mut());
        }
        points
    }
}

/// Geometry of a path shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathGeometry {
    pub fill_rule: FillRule,
    pub figures: Vec<PathFigure>,
}

impl PathGeometry {
    /// Build a kurbo path, resolving point handles through `position`.
    /// Segments whose points cannot be resolved are skipped.
    pub fn to_bez_path(&self, position: impl Fn(ShapeId) -> Option<Point>) -> BezPath {
        let mut path = BezPath::new();
        for figure in &self.figures {
            let Some(start) = position(figure.start_point) else {
                continue;
            };
            path.move_to(start);
            let mut current = start;
            for segment in &figure.segments {
                match &segment.kind {
                    SegmentKind::Line { point } => {
                        if let Some(p) = position(*point) {
                            path.line_to(p);
                            current = p;
                        }
                    }
                    SegmentKind::CubicBezier { point1, point2, point3 } => {
                        if let (Some(p1), Some(p2), Some(p3)) = (position(*point1), position(*point2), position(*point3)) {
                            path.curve_to(p1, p2, p3);
                            current = p3;
                        }
                    }
                    SegmentKind::QuadraticBezier { point1, point2 } => {
                        if let (Some(p1), Some(p2)) = (position(*point1), position(*point2)) {
                            path.quad_to(p1, p2);
                            current = p2;
                        }
                    }
                    SegmentKind::Arc {
                        point,
                        size,
                        rotation_angle,
                        is_large_arc,
                        sweep_direction,
                    } => {
                        let Some(to) = position(*point) else { continue };
                        let arc = SvgArc {
                            from: current,
                            to,
                            radii: Vec2::new(size.width, size.height),
                            x_rotation: rotation_angle.to_radians(),
                            large_arc: *is_large_arc,
                            sweep: *sweep_direction == SweepDirection::Clockwise,
                        };
                        match kurbo::Arc::from_svg_arc(&arc) {
                            Some(arc) => {
                                for el in arc.append_iter(0.1) {
                                    path.push(el);
                                }
                            }
                            None => path.line_to(to),
                        }
                        current = to;
                    }
                    SegmentKind::PolyLine { points } => {
                        for p in points.iter().filter_map(|&id| position(id)) {
                            path.line_to(p);
                            current = p;
                        }
                    }
                    SegmentKind::PolyCubicBezier { points } => {
                        let resolved: Vec<Point> = points.iter().filter_map(|&id| position(id)).collect();
                        for c in resolved.chunks_exact(3) {
                            path.curve_to(c[0], c[1], c[2]);
                            current = c[2];
                        }
                    }
                    SegmentKind::PolyQuadraticBezier { points } => {
                        let resolved: Vec<Point> = points.iter().filter_map(|&id| position(id)).collect();
                        for c in resolved.chunks_exact(2) {
                            path.quad_to(c[0], c[1]);
                            current = c[1];
                        }
                    }
                }
            }
            if figure.is_closed {
                path.close_path();
            }
        }
        path
    }
}

impl PointSlots for PathGeometry {
    fn slots(&self) -> Vec<ShapeId> {
        self.figures.iter().flat_map(|f| f.slots()).collect()
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        self.figures.iter_mut().flat_map(|f| f.slots_mut()).collect()
    }
}

/// A composite path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathShape {
    pub geometry: PathGeometry,
}

impl PathShape {
    pub fn new(geometry: PathGeometry) -> Self {
        Self { geometry }
    }
}

impl PointSlots for PathShape {
    fn slots(&self) -> Vec<ShapeId> {
        self.geometry.slots()
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        self.geometry.slots_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_figure_last_point_and_validity() {
        let mut keys: SlotMap<ShapeId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        let c = keys.insert(());

        let mut figure = PathFigure::new(a);
        assert_eq!(figure.last_point(), a);
        assert!(!figure.is_valid());

        figure.segments.push(PathSegment::line(b));
        figure.segments.push(PathSegment::quadratic(b, c));
        assert_eq!(figure.last_point(), c);
        assert!(figure.is_valid());
        assert_eq!(figure.slots(), vec![a, b, b, c]);
    }

    #[test]
    fn test_to_bez_path_lines() {
        let mut keys: SlotMap<ShapeId, Point> = SlotMap::with_key();
        let a = keys.insert(Point::new(0.0, 0.0));
        let b = keys.insert(Point::new(10.0, 0.0));
        let mut figure = PathFigure::new(a);
        figure.segments.push(PathSegment::line(b));
        let geometry = PathGeometry {
            fill_rule: FillRule::EvenOdd,
            figures: vec![figure],
        };
        let path = geometry.to_bez_path(|id| keys.get(id).copied());
        assert_eq!(path.elements().len(), 2);
    }
}
