//! 2D geometry helpers on top of kurbo.
//!
//! Rectangle tests here are closed-interval: a point lying exactly on an edge
//! is inside. kurbo's own `Rect::contains` is half-open, so selection code
//! must go through these helpers.

use kurbo::{Point, Rect, Vec2};

/// Tolerance below which a length is treated as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-10;

/// Build a normalized rectangle from two arbitrary corners.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Closed-interval containment test.
pub fn contains_closed(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Closed-interval overlap test between two rectangles (touching edges count).
pub fn rects_overlap_closed(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    distance(point, a + seg * t)
}

/// Closest point on segment a→b to `point`, with its parameter in `[0, 1]`.
pub fn project_on_segment(point: Point, a: Point, b: Point) -> (Point, f64) {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return (a, 0.0);
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    (a + seg * t, t)
}

/// Perpendicular distance from a point to the infinite line through a and b.
///
/// Degenerates to the point-to-point distance when a and b coincide.
pub fn perpendicular_distance(point: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len_sq = d.hypot2();
    if len_sq < f64::EPSILON {
        return distance(point, a);
    }
    // Twice the triangle area over the base.
    (point - a).cross(d).abs() / len_sq.sqrt()
}

/// Intersection of segments a0→a1 and b0→b1.
///
/// Returns the crossing point together with the parameters along each
/// segment. Parallel, collinear and zero-length segments yield `None`.
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<(Point, f64, f64)> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.cross(s);
    if denom.abs() < GEOMETRY_EPSILON || r.hypot2() < f64::EPSILON || s.hypot2() < f64::EPSILON {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((a0 + r * t, t, u))
    } else {
        None
    }
}

/// Test if two line segments (a-b) and (c-d) touch or cross.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross = |o: Point, p: Point, q: Point| -> f64 { (p - o).cross(q - o) };
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear cases: check if endpoint lies on the other segment
    let on_segment = |p: Point, q: Point, r: Point| -> bool {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1.abs() < GEOMETRY_EPSILON && on_segment(c, d, a))
        || (d2.abs() < GEOMETRY_EPSILON && on_segment(c, d, b))
        || (d3.abs() < GEOMETRY_EPSILON && on_segment(a, b, c))
        || (d4.abs() < GEOMETRY_EPSILON && on_segment(a, b, d))
}

/// Test if a segment touches a rectangle (closed interval).
pub fn segment_intersects_rect(a: Point, b: Point, rect: Rect) -> bool {
    if contains_closed(rect, a) || contains_closed(rect, b) {
        return true;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}

/// Test if any segment of a polyline touches a rectangle.
pub fn polyline_intersects_rect(points: &[Point], rect: Rect) -> bool {
    match points {
        [] => false,
        [p] => contains_closed(rect, *p),
        _ => points.windows(2).any(|w| segment_intersects_rect(w[0], w[1], rect)),
    }
}

/// Unit vector in the direction of `v`, or `None` for a zero vector.
pub fn normalized(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    if len < GEOMETRY_EPSILON { None } else { Some(v / len) }
}
