//! Shape-pair intersection and swept collision detection
//!
//! Dispatch is done per concrete pair of kinds. Rectangles are tested as
//! placed quads, polygons and spheres are tested as circles. Any pair without
//! a dedicated test reports no intersection.

use crate::collision::{rectangle_circle_intersect, rectangles_intersect, spheres_intersect};
use crate::shapes::{Shape, ShapeKind};
use lumen_math::Vec3;

/// Test two shapes placed at `a_at` and `b_at` for intersection
///
/// Returns a point of contact in the shared parent frame.
pub fn intersect(a: &Shape, a_at: Vec3, b: &Shape, b_at: Vec3) -> Option<Vec3> {
    match (a.kind(), b.kind()) {
        (ShapeKind::Rectangle { .. }, ShapeKind::Rectangle { .. }) => {
            let quad_a = a.quad()?.translated(a_at);
            let quad_b = b.quad()?.translated(b_at);
            rectangles_intersect(&quad_a, &a.orientation(), &quad_b, &b.orientation())
        }
        (ShapeKind::Rectangle { .. }, _) if b.is_circular() => {
            let quad = a.quad()?.translated(a_at);
            rectangle_circle_intersect(&quad, b_at + b.position(), b.radius()?)
        }
        (_, ShapeKind::Rectangle { .. }) if a.is_circular() => {
            let quad = b.quad()?.translated(b_at);
            rectangle_circle_intersect(&quad, a_at + a.position(), a.radius()?)
        }
        _ if a.is_circular() && b.is_circular() => {
            let (center_a, radius_a) = (a_at + a.position(), a.radius()?);
            let (center_b, radius_b) = (b_at + b.position(), b.radius()?);
            if !spheres_intersect(center_a, radius_a, center_b, radius_b) {
                return None;
            }
            let reach = radius_a + radius_b;
            let weight = if reach > 0.0 { radius_a / reach } else { 0.5 };
            Some(center_a.lerp(center_b, weight))
        }
        _ => None,
    }
}

/// Test two moving shapes for collision, including the region swept since the last sample
///
/// `travel` is how far each shape moved during the last sample. The direct
/// overlap is tried first; when the mover is fast enough to have a swept
/// region, that region is tested against the other shape and then against the
/// other's own swept region. If nothing hits, the test is repeated once with
/// the roles exchanged.
pub fn detect_collision(
    mover: &Shape,
    mover_at: Vec3,
    travel: Vec3,
    other: &Shape,
    other_at: Vec3,
    other_travel: Vec3,
) -> Option<Vec3> {
    sweep_test(mover, mover_at, travel, other, other_at, other_travel, true)
}

fn sweep_test(
    mover: &Shape,
    mover_at: Vec3,
    travel: Vec3,
    other: &Shape,
    other_at: Vec3,
    other_travel: Vec3,
    try_inverse: bool,
) -> Option<Vec3> {
    if let Some(point) = intersect(mover, mover_at, other, other_at) {
        return Some(point);
    }

    if let Some(space) = mover.collision_space(travel) {
        if let Some(point) = intersect(&space, mover_at, other, other_at) {
            log::trace!("swept {} hit {} at {}", mover.kind().name(), other.kind().name(), point);
            return Some(point);
        }
        if let Some(other_space) = other.collision_space(other_travel) {
            if let Some(point) = intersect(&space, mover_at, &other_space, other_at) {
                log::trace!("two swept regions crossed at {}", point);
                return Some(point);
            }
        }
    }

    if try_inverse {
        sweep_test(other, other_at, other_travel, mover, mover_at, travel, false)
    } else {
        None
    }
}
