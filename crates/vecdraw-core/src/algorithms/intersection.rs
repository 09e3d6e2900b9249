//! Line/line intersection finding and splitting.

use crate::geometry::{GEOMETRY_EPSILON, segment_intersection};
use crate::scene::Scene;
use crate::shapes::{LineShape, Shape, ShapeId, ShapeKind};
use kurbo::Point;

/// Parameter margin that keeps a split away from line ends.
const END_MARGIN: f64 = 1e-6;

/// A crossing between a candidate line and a committed line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The committed line that was crossed.
    pub line: ShapeId,
    pub point: Point,
    /// Parameter along the candidate line.
    pub t: f64,
    /// Parameter along the crossed line.
    pub u: f64,
}

/// Finds where a candidate shape crosses shapes already on a layer.
pub trait IntersectionFinder {
    /// Search `shapes` for crossings with `candidate`. Returns whether any
    /// were found. Results accumulate until [`IntersectionFinder::clear`].
    fn find(&mut self, scene: &Scene, shapes: &[ShapeId], candidate: ShapeId) -> bool;

    fn clear(&mut self);

    fn intersections(&self) -> &[Intersection];
}

/// Finds interior crossings between straight lines.
#[derive(Debug, Clone, Default)]
pub struct LineIntersectionFinder {
    found: Vec<Intersection>,
}

impl LineIntersectionFinder {
    pub fn new() -> Self {
        Self::default()
    }
}

fn line_ends(scene: &Scene, id: ShapeId) -> Option<(Point, Point)> {
    let line = scene.get(id)?.kind.as_line()?;
    Some((scene.position(line.start)?, scene.position(line.end)?))
}

fn interior(t: f64) -> bool {
    t > END_MARGIN && t < 1.0 - END_MARGIN
}

impl IntersectionFinder for LineIntersectionFinder {
    fn find(&mut self, scene: &Scene, shapes: &[ShapeId], candidate: ShapeId) -> bool {
        let Some((a0, a1)) = line_ends(scene, candidate) else {
            return false;
        };
        let before = self.found.len();
        for &other in shapes {
            if other == candidate {
                continue;
            }
            let Some((b0, b1)) = line_ends(scene, other) else { continue };
            if let Some((point, t, u)) = segment_intersection(a0, a1, b0, b1) {
                if interior(t) && interior(u) {
                    self.found.push(Intersection { line: other, point, t, u });
                }
            }
        }
        self.found.len() > before
    }

    fn clear(&mut self) {
        self.found.clear();
    }

    fn intersections(&self) -> &[Intersection] {
        &self.found
    }
}

/// Replacement of one line by its pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSplit {
    pub original: ShapeId,
    pub segments: Vec<ShapeId>,
}

/// Cut `candidate` and every crossed line at their crossings.
///
/// Each crossing gets exactly one new point, shared by the pieces of both
/// lines. The pieces are allocated in the arena; the originals are left in
/// place for the caller to remove. The candidate's split comes first.
pub fn split_lines(scene: &mut Scene, candidate: ShapeId, intersections: &[Intersection]) -> Vec<LineSplit> {
    if intersections.is_empty() {
        return Vec::new();
    }

    // One shared point per distinct crossing location.
    let mut crossings: Vec<(Intersection, ShapeId)> = Vec::new();
    for hit in intersections {
        let existing = crossings
            .iter()
            .find(|(c, _)| (c.point - hit.point).hypot() < GEOMETRY_EPSILON)
            .map(|&(_, p)| p);
        let point = existing.unwrap_or_else(|| scene.insert_point(hit.point));
        crossings.push((*hit, point));
    }

    let mut splits = Vec::new();
    let candidate_cuts: Vec<(f64, ShapeId)> = crossings.iter().map(|(c, p)| (c.t, *p)).collect();
    if let Some(split) = cut_line(scene, candidate, candidate_cuts) {
        splits.push(split);
    }

    let mut others: Vec<ShapeId> = Vec::new();
    for (c, _) in &crossings {
        if !others.contains(&c.line) {
            others.push(c.line);
        }
    }
    for other in others {
        let cuts: Vec<(f64, ShapeId)> = crossings
            .iter()
            .filter(|(c, _)| c.line == other)
            .map(|(c, p)| (c.u, *p))
            .collect();
        if let Some(split) = cut_line(scene, other, cuts) {
            splits.push(split);
        }
    }
    splits
}

/// Cut one line in two at parameter `t`, sharing `point` between the pieces.
pub fn split_line_at(scene: &mut Scene, line: ShapeId, point: ShapeId, t: f64) -> Option<LineSplit> {
    if !interior(t) {
        return None;
    }
    cut_line(scene, line, vec![(t, point)])
}

/// Build the pieces of a line between its ends and the given cut points.
fn cut_line(scene: &mut Scene, id: ShapeId, mut cuts: Vec<(f64, ShapeId)>) -> Option<LineSplit> {
    let original = scene.get(id)?;
    let line = original.kind.as_line()?;
    let (start, end) = (line.start, line.end);
    let style = original.style_ref();
    let (stroked, filled) = (original.is_stroked(), original.is_filled());

    cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
    cuts.dedup_by(|a, b| a.1 == b.1);

    let mut chain = vec![start];
    chain.extend(cuts.iter().map(|&(_, p)| p));
    chain.push(end);

    let segments = chain
        .windows(2)
        .map(|w| {
            let piece = Shape::new(ShapeKind::Line(LineShape::new(w[0], w[1])))
                .with_style(style.clone())
                .with_paint(stroked, filled);
            scene.insert(piece)
        })
        .collect();
    Some(LineSplit { original: id, segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LayerKind;

    fn line(scene: &mut Scene, a: (f64, f64), b: (f64, f64)) -> ShapeId {
        let start = scene.insert_point(a.into());
        let end = scene.insert_point(b.into());
        scene.insert(Shape::new(ShapeKind::Line(LineShape::new(start, end))))
    }

    #[test]
    fn test_find_crossing() {
        let mut scene = Scene::new();
        let a = line(&mut scene, (0.0, 0.0), (10.0, 10.0));
        scene.layer_mut(LayerKind::Current).add(a);
        let b = line(&mut scene, (0.0, 10.0), (10.0, 0.0));

        let mut finder = LineIntersectionFinder::new();
        let shapes = scene.current().shapes().to_vec();
        assert!(finder.find(&scene, &shapes, b));
        let hit = finder.intersections()[0];
        assert_eq!(hit.line, a);
        assert!((hit.point.x - 5.0).abs() < 1e-9 && (hit.point.y - 5.0).abs() < 1e-9);

        finder.clear();
        assert!(finder.intersections().is_empty());
    }

    #[test]
    fn test_touching_ends_are_not_crossings() {
        let mut scene = Scene::new();
        let a = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        scene.layer_mut(LayerKind::Current).add(a);
        let b = line(&mut scene, (10.0, 0.0), (10.0, 10.0));
        let mut finder = LineIntersectionFinder::new();
        assert!(!finder.find(&scene, &[a], b));
    }

    #[test]
    fn test_split_shares_one_point() {
        let mut scene = Scene::new();
        let a = line(&mut scene, (0.0, 0.0), (10.0, 10.0));
        let b = line(&mut scene, (0.0, 10.0), (10.0, 0.0));
        let mut finder = LineIntersectionFinder::new();
        finder.find(&scene, &[a], b);

        let splits = split_lines(&mut scene, b, finder.intersections());
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].original, b);
        assert_eq!(splits[1].original, a);
        let pieces: Vec<ShapeId> = splits.iter().flat_map(|s| s.segments.clone()).collect();
        assert_eq!(pieces.len(), 4);

        let shared = scene.get(pieces[0]).unwrap().kind.as_line().unwrap().end;
        assert_eq!(scene.position(shared), Some(Point::new(5.0, 5.0)));
        assert_eq!(scene.owners_of(shared).len(), 4);
    }

    #[test]
    fn test_split_line_at() {
        let mut scene = Scene::new();
        let a = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let mid = scene.insert_point(Point::new(4.0, 0.0));
        let split = split_line_at(&mut scene, a, mid, 0.4).unwrap();
        assert_eq!(split.segments.len(), 2);
        assert_eq!(scene.owners_of(mid).len(), 2);
        assert!(split_line_at(&mut scene, a, mid, 1.0).is_none());
    }

    #[test]
    fn test_multiple_cuts_are_ordered() {
        let mut scene = Scene::new();
        let a = line(&mut scene, (2.0, -5.0), (2.0, 5.0));
        let b = line(&mut scene, (8.0, -5.0), (8.0, 5.0));
        let c = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let mut finder = LineIntersectionFinder::new();
        // Reverse layer order so crossings arrive out of order along `c`.
        finder.find(&scene, &[b, a], c);

        let splits = split_lines(&mut scene, c, finder.intersections());
        let pieces = &splits[0].segments;
        assert_eq!(pieces.len(), 3);
        let ends: Vec<Point> = pieces
            .iter()
            .map(|&p| {
                let l = scene.get(p).unwrap().kind.as_line().unwrap();
                scene.position(l.end).unwrap()
            })
            .collect();
        assert_eq!(ends, vec![Point::new(2.0, 0.0), Point::new(8.0, 0.0), Point::new(10.0, 0.0)]);
    }
}
