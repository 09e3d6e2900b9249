//! Connecting points into other shapes and splitting shared points apart.

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};

/// Outcome of a successful [`connect_point`].
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// The point that now sits in the target's slots.
    pub point: ShapeId,
    /// The replaced point (removed from the arena unless still referenced).
    pub replaced: ShapeId,
    /// Shapes whose slots were rewritten.
    pub owners: Vec<ShapeId>,
    /// `point` was a standalone layer shape before and must leave the layer.
    pub was_standalone: bool,
}

/// Splice `point` into every shape that references `target`, in place of
/// `target`. Slot counts never change.
///
/// Fails (returns `None`) when the two are the same point, when `target` has
/// no owner, or when an owner of `target` already holds `point`.
pub fn connect_point(scene: &mut Scene, point: ShapeId, target: ShapeId) -> Option<Connection> {
    if point == target || !scene.contains(point) {
        return None;
    }
    let owners = scene.owners_of(target);
    if owners.is_empty() {
        return None;
    }
    let already = owners
        .iter()
        .any(|&o| scene.get(o).is_some_and(|s| s.direct_points().contains(&point)));
    if already {
        log::debug!("connect rejected: owner already holds the point");
        return None;
    }

    for &owner in &owners {
        scene.replace_point(owner, target, point);
    }

    let was_standalone = scene.get(point).is_some_and(|s| s.state().is_standalone());
    let target_owner = scene.get(target).and_then(Shape::owner);
    if let Some(p) = scene.get_mut(point) {
        if p.owner().is_none() {
            p.set_owner(target_owner.or(owners.first().copied()));
        }
        p.state_mut().mark_connector();
    }
    if scene.owners_of(target).is_empty() {
        scene.delete(target);
    }
    log::info!("connected point into {} shape(s)", owners.len());
    Some(Connection {
        point,
        replaced: target,
        owners,
        was_standalone,
    })
}

/// Give `owner` its own copy of a shared point. Other owners keep the
/// original. Returns the copy, or `None` if the point is not shared or
/// `owner` does not reference it.
pub fn disconnect_point(scene: &mut Scene, owner: ShapeId, point: ShapeId) -> Option<ShapeId> {
    let owners = scene.owners_of(point);
    if owners.len() < 2 || !owners.contains(&owner) {
        return None;
    }
    let original = scene.get(point)?;
    let mut copy = Shape::point(original.position()?);
    if let (Some(src), Some(dst)) = (original.kind.as_point(), copy.kind.as_point_mut()) {
        dst.template = src.template;
        dst.alignment = src.alignment;
    }
    copy.set_style(original.style_ref());
    copy.set_state(original.state());
    copy.set_owner(Some(owner));
    let original_owner = original.owner();

    let copy = scene.insert(copy);
    scene.replace_point(owner, point, copy);
    if original_owner == Some(owner) {
        let next = owners.iter().copied().find(|&o| o != owner);
        if let Some(p) = scene.get_mut(point) {
            p.set_owner(next);
        }
    }
    log::info!("disconnected shared point");
    Some(copy)
}

/// Disconnect every shared point referenced by a shape (recursing into
/// groups). Returns the created copies.
pub fn disconnect_shape(scene: &mut Scene, id: ShapeId) -> Vec<ShapeId> {
    let Some(shape) = scene.get(id) else {
        return Vec::new();
    };
    let children: Vec<ShapeId> = shape.kind.as_group().map(|g| g.shapes().to_vec()).unwrap_or_default();
    let points = shape.direct_points();

    let mut copies: Vec<ShapeId> = points
        .into_iter()
        .filter_map(|p| disconnect_point(scene, id, p))
        .collect();
    for child in children {
        copies.extend(disconnect_shape(scene, child));
    }
    copies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{LineShape, ShapeKind};
    use kurbo::Point;

    fn line(scene: &mut Scene, a: (f64, f64), b: (f64, f64)) -> (ShapeId, ShapeId, ShapeId) {
        let start = scene.insert_point(a.into());
        let end = scene.insert_point(b.into());
        let id = scene.insert(Shape::new(ShapeKind::Line(LineShape::new(start, end))));
        (id, start, end)
    }

    fn point_lists_containing(scene: &Scene, p: ShapeId) -> Vec<ShapeId> {
        scene
            .iter()
            .filter(|(_, s)| s.direct_points().contains(&p))
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn test_connect_free_point_replaces_connector() {
        let mut scene = Scene::new();
        let (target_line, _, target_end) = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let free = scene.insert_point(Point::new(11.0, 1.0));
        let before = scene.get(target_line).unwrap().direct_points().len();

        let c = connect_point(&mut scene, free, target_end).unwrap();
        assert!(c.was_standalone);
        assert_eq!(c.owners, vec![target_line]);
        assert_eq!(point_lists_containing(&scene, free), vec![target_line]);
        assert_eq!(scene.get(target_line).unwrap().direct_points().len(), before);
        assert!(!scene.contains(target_end));

        let p = scene.get(free).unwrap();
        assert!(p.state().is_connector());
        assert!(!p.state().is_standalone());
        assert_eq!(p.owner(), Some(target_line));
    }

    #[test]
    fn test_connect_line_end_shares_point() {
        let mut scene = Scene::new();
        let (a, _, a_end) = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let (b, b_start, _) = line(&mut scene, (10.0, 1.0), (20.0, 1.0));

        connect_point(&mut scene, a_end, b_start).unwrap();
        let mut owners = scene.owners_of(a_end);
        owners.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(owners, expected);
        assert!(!scene.contains(b_start));
        assert_eq!(scene.get(a_end).unwrap().owner(), Some(a));
    }

    #[test]
    fn test_connect_rejects_self_and_same_owner() {
        let mut scene = Scene::new();
        let (_, start, end) = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        assert!(connect_point(&mut scene, start, start).is_none());
        assert!(connect_point(&mut scene, start, end).is_none());
        let lonely = scene.insert_point(Point::ZERO);
        assert!(connect_point(&mut scene, start, lonely).is_none());
    }

    #[test]
    fn test_disconnect_gives_owner_a_copy() {
        let mut scene = Scene::new();
        let (a, _, a_end) = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let (b, b_start, _) = line(&mut scene, (10.0, 0.0), (20.0, 0.0));
        connect_point(&mut scene, a_end, b_start).unwrap();

        let copy = disconnect_point(&mut scene, b, a_end).unwrap();
        assert_eq!(scene.owners_of(a_end), vec![a]);
        assert_eq!(scene.owners_of(copy), vec![b]);
        assert_eq!(scene.position(copy), Some(Point::new(10.0, 0.0)));
        assert_eq!(scene.get(copy).unwrap().owner(), Some(b));
        assert!(scene.get(copy).unwrap().state().is_connector());

        // No longer shared.
        assert!(disconnect_point(&mut scene, a, a_end).is_none());
    }

    #[test]
    fn test_disconnect_by_original_owner_hands_over_point() {
        let mut scene = Scene::new();
        let (a, _, a_end) = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let (b, b_start, _) = line(&mut scene, (10.0, 0.0), (20.0, 0.0));
        connect_point(&mut scene, a_end, b_start).unwrap();

        let copy = disconnect_point(&mut scene, a, a_end).unwrap();
        assert_eq!(scene.get(a_end).unwrap().owner(), Some(b));
        assert_eq!(scene.get(copy).unwrap().owner(), Some(a));
    }

    #[test]
    fn test_disconnect_shape() {
        let mut scene = Scene::new();
        let (a, _, a_end) = line(&mut scene, (0.0, 0.0), (10.0, 0.0));
        let (_, b_start, _) = line(&mut scene, (10.0, 0.0), (20.0, 0.0));
        connect_point(&mut scene, a_end, b_start).unwrap();

        let copies = disconnect_shape(&mut scene, a);
        assert_eq!(copies.len(), 1);
        assert_eq!(scene.owners_of(a_end).len(), 1);
    }
}
