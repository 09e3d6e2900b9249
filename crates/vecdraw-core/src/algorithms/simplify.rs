//! Polyline simplification.

use crate::geometry::{GEOMETRY_EPSILON, perpendicular_distance};
use kurbo::Point;

/// Ramer-Douglas-Peucker simplification.
///
/// Returns the indices of the accepted points in ascending order. Both ends
/// are always accepted. A range is split at its farthest interior point only
/// while that point's perpendicular distance from the chord exceeds
/// `epsilon`; ties go to the lowest index.
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_index = first;
        for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
            let dist = perpendicular_distance(*point, points[first], points[last]);
            if dist > max_dist {
                max_dist = dist;
                max_index = i;
            }
        }
        if max_dist > epsilon {
            keep[max_index] = true;
            stack.push((max_index, last));
            stack.push((first, max_index));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

/// Drop consecutive coincident points.
pub fn dedup_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_none_or(|last| (p - *last).hypot() > GEOMETRY_EPSILON) {
            out.push(p);
        }
    }
    out
}

/// Dedup then simplify, returning the kept points.
///
/// A non-positive epsilon or fewer than two points bypasses simplification.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    let unique = dedup_points(points);
    if epsilon <= 0.0 || unique.len() < 2 {
        return unique;
    }
    douglas_peucker(&unique, epsilon)
        .into_iter()
        .map(|i| unique[i])
        .collect()
}
