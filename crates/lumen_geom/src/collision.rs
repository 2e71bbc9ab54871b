//! Collision primitives
//!
//! Pure geometric predicates: closest points between segments, point in a
//! convex polygon, sphere overlap, rectangle overlap and rectangle vs circle.
//! None of these can fail. Degenerate input (zero-length segments, coincident
//! points) is resolved through [`EPSILON`] into a well-defined fallback.
//!
//! The 2D predicates work on the XY projection of their inputs.

use lumen_math::{Orientation, Vec2, Vec3, Vector, EPSILON};

/// Distance under which two edges are considered touching
///
/// Edge proximity is a distance, not a squared length, so it gets its own
/// tolerance instead of [`EPSILON`].
pub const CONTACT_EPSILON: f64 = 1e-9;

/// Closest points between two finite segments
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentClosest<const N: usize> {
    /// Parameter along the first segment, in `[0, 1]`
    pub s: f64,
    /// Parameter along the second segment, in `[0, 1]`
    pub t: f64,
    /// Closest point on the first segment
    pub on_first: Vector<N>,
    /// Closest point on the second segment
    pub on_second: Vector<N>,
}

impl<const N: usize> SegmentClosest<N> {
    /// Distance between the two closest points
    pub fn distance(&self) -> f64 {
        self.on_first.distance(self.on_second)
    }
}

/// Compute the closest points between segments `a0-a1` and `b0-b1`
///
/// Parameters are clamped to the segments, not the infinite lines through
/// them. A segment whose squared length is at most [`EPSILON`] is treated as a
/// point and the problem reduces to a point-to-segment projection.
pub fn closest_points_between_segments<const N: usize>(
    a0: Vector<N>,
    a1: Vector<N>,
    b0: Vector<N>,
    b1: Vector<N>,
) -> SegmentClosest<N> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;
    let len1 = d1.length_squared();
    let len2 = d2.length_squared();
    let f = d2.dot(r);

    let (s, t) = if len1 <= EPSILON && len2 <= EPSILON {
        (0.0, 0.0)
    } else if len1 <= EPSILON {
        (0.0, (f / len2).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if len2 <= EPSILON {
            ((-c / len1).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = len1 * len2 - b * b;

            // Parallel segments: any s works, start from the first endpoint
            let mut s = if denom != 0.0 {
                ((b * f - c * len2) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let t_numer = b * s + f;
            let t = if t_numer <= 0.0 {
                s = (-c / len1).clamp(0.0, 1.0);
                0.0
            } else if t_numer >= len2 {
                s = ((b - c) / len1).clamp(0.0, 1.0);
                1.0
            } else {
                t_numer / len2
            };
            (s, t)
        }
    };

    SegmentClosest {
        s,
        t,
        on_first: a0 + d1 * s,
        on_second: b0 + d2 * t,
    }
}

/// Distance from `point` to the segment `start-end`, with the nearest point on the segment
pub fn distance_segment_to_point<const N: usize>(
    start: Vector<N>,
    end: Vector<N>,
    point: Vector<N>,
) -> (f64, Vector<N>) {
    let delta = end - start;
    let len2 = delta.length_squared();

    let near = if len2 <= EPSILON {
        start
    } else {
        let t = ((point - start).dot(delta) / len2).clamp(0.0, 1.0);
        start + delta * t
    };

    (point.distance(near), near)
}

/// Whether `point` lies inside a convex polygon given counter-clockwise
///
/// The point is inside iff it is on the interior side of every edge's line.
/// Points on an edge count as inside. Fewer than three vertices enclose
/// nothing.
pub fn point_in_convex_polygon(point: Vec2, vertices_ccw: &[Vec2]) -> bool {
    let n = vertices_ccw.len();
    if n < 3 {
        return false;
    }

    (0..n).all(|i| {
        let start = vertices_ccw[i];
        let end = vertices_ccw[(i + 1) % n];
        (end - start).perp_dot(point - start) >= 0.0
    })
}

/// Whether two spheres (or circles) overlap or touch
pub fn spheres_intersect<const N: usize>(
    center_1: Vector<N>,
    radius_1: f64,
    center_2: Vector<N>,
    radius_2: f64,
) -> bool {
    let reach = radius_1 + radius_2;
    center_1.distance_squared(center_2) <= reach * reach
}

/// The four corners of a placed rectangle
///
/// Corners go top-left, bottom-left, bottom-right, top-right, which is
/// counter-clockwise with y pointing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub top_left: Vec3,
    pub bottom_left: Vec3,
    pub bottom_right: Vec3,
    pub top_right: Vec3,
}

impl Quad {
    /// Corners in counter-clockwise order
    pub fn vertices(&self) -> [Vec3; 4] {
        [self.top_left, self.bottom_left, self.bottom_right, self.top_right]
    }

    /// Edges as `(start, end)` pairs following the corner order
    pub fn edges(&self) -> [(Vec3, Vec3); 4] {
        [
            (self.top_left, self.bottom_left),
            (self.bottom_left, self.bottom_right),
            (self.bottom_right, self.top_right),
            (self.top_right, self.top_left),
        ]
    }

    /// Move every corner by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            top_left: self.top_left + offset,
            bottom_left: self.bottom_left + offset,
            bottom_right: self.bottom_right + offset,
            top_right: self.top_right + offset,
        }
    }

    /// Center of the rectangle
    pub fn center(&self) -> Vec3 {
        (self.top_left + self.bottom_right) * 0.5
    }

    /// XY outline, counter-clockwise
    ///
    /// A rotation that mirrors the rectangle in the XY plane (a half turn
    /// around X, say) flips the winding, so the order is normalized here.
    pub fn outline_2d(&self) -> [Vec2; 4] {
        let mut outline = self.vertices().map(Vec3::xy);
        let doubled_area: f64 = (0..4)
            .map(|i| outline[i].perp_dot(outline[(i + 1) % 4]))
            .sum();
        if doubled_area < 0.0 {
            outline.reverse();
        }
        outline
    }

    /// Whether the XY projection of `point` is inside the rectangle
    pub fn contains_point(&self, point: Vec3) -> bool {
        point_in_convex_polygon(point.xy(), &self.outline_2d())
    }
}

/// Intersection test between two placed rectangles
///
/// Rectangles with the same orientation are compared as boxes in the first
/// rectangle's local frame (no rotation at all when that orientation is the
/// identity). Touching boxes count as intersecting. Differently oriented
/// rectangles intersect when an edge of one comes within [`CONTACT_EPSILON`]
/// of an edge of the other, or when a corner of one lies inside the other;
/// the corner check catches interpenetration where no edges cross.
pub fn rectangles_intersect(
    rect_1: &Quad,
    orientation_1: &Orientation,
    rect_2: &Quad,
    orientation_2: &Orientation,
) -> Option<Vec3> {
    if orientation_1 == orientation_2 {
        let to_local = orientation_1.inverse();
        let (min_1, max_1) = local_bounds(rect_1, &to_local);
        let (min_2, max_2) = local_bounds(rect_2, &to_local);

        let overlaps = min_1.x() <= max_2.x()
            && max_1.x() >= min_2.x()
            && min_1.y() <= max_2.y()
            && max_1.y() >= min_2.y();

        if !overlaps {
            return None;
        }

        let overlap_min = min_1.max_components(min_2);
        let overlap_max = max_1.min_components(max_2);
        let local_point = (overlap_min + overlap_max) * 0.5;
        return Some(orientation_1.rotate(local_point));
    }

    for (start_1, end_1) in rect_1.edges() {
        for (start_2, end_2) in rect_2.edges() {
            let closest = closest_points_between_segments(start_1.xy(), end_1.xy(), start_2.xy(), end_2.xy());
            if closest.distance() <= CONTACT_EPSILON {
                return Some(closest.on_first.extend(start_1.z()));
            }
        }
    }

    if let Some(corner) = rect_2.vertices().into_iter().find(|v| rect_1.contains_point(*v)) {
        return Some(corner);
    }

    rect_1.vertices().into_iter().find(|v| rect_2.contains_point(*v))
}

/// Axis-aligned bounds of a rectangle after rotating it by `to_local`
fn local_bounds(rect: &Quad, to_local: &Orientation) -> (Vec3, Vec3) {
    let corners = rect.vertices().map(|v| to_local.rotate(v));
    corners[1..].iter().fold((corners[0], corners[0]), |(min, max), c| {
        (min.min_components(*c), max.max_components(*c))
    })
}

/// Intersection test between a placed rectangle and a circle
///
/// Hits when the circle comes within `radius` of any edge, or when its center
/// is inside the rectangle. The returned point is the nearest edge point, or
/// the circle center for the containment case.
pub fn rectangle_circle_intersect(rect: &Quad, center: Vec3, radius: f64) -> Option<Vec3> {
    let center_2d = center.xy();

    for (start, end) in rect.edges() {
        let (distance, near) = distance_segment_to_point(start.xy(), end.xy(), center_2d);
        if distance <= radius {
            return Some(near.extend(center.z()));
        }
    }

    if rect.contains_point(center) {
        return Some(center);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    const EPS: f64 = 1e-9;

    fn axis_quad(top_left: Vec3, width: f64, height: f64) -> Quad {
        Quad {
            top_left,
            bottom_left: top_left + Vec3::new(0.0, -height, 0.0),
            bottom_right: top_left + Vec3::new(width, -height, 0.0),
            top_right: top_left + Vec3::new(width, 0.0, 0.0),
        }
    }

    // Deterministic pseudo-random source for property checks
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 20.0 - 10.0
        }

        fn vec2(&mut self) -> Vec2 {
            Vec2::new(self.next(), self.next())
        }
    }

    // ===== Segment Tests =====

    #[test]
    fn test_segments_crossing() {
        let c = closest_points_between_segments(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        );
        assert!((c.s - 0.5).abs() < EPS);
        assert!((c.t - 0.5).abs() < EPS);
        assert!(c.distance() < EPS);
    }

    #[test]
    fn test_segments_parallel() {
        let c = closest_points_between_segments(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(5.0, 3.0),
        );
        assert!((c.distance() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_segments_endpoint_clamped() {
        // Lines would cross at x = 5, but the first segment stops at x = 1
        let c = closest_points_between_segments(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(5.0, -1.0),
            Vec2::new(5.0, 1.0),
        );
        assert_eq!(c.s, 1.0);
        assert!((c.t - 0.5).abs() < EPS);
        assert!((c.distance() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_segments_degenerate_first() {
        let p = Vec2::new(1.0, 1.0);
        let c = closest_points_between_segments(p, p, Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        assert_eq!(c.s, 0.0);
        assert!((c.t - 0.5).abs() < EPS);
        assert!((c.distance() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_segments_degenerate_second() {
        let p = Vec3::new(3.0, 0.0, 4.0);
        let c = closest_points_between_segments(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), p, p);
        assert_eq!(c.t, 0.0);
        assert!((c.s - 0.5).abs() < EPS);
        assert!((c.distance() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_segments_both_degenerate() {
        let c = closest_points_between_segments(Vec2::ZERO, Vec2::ZERO, Vec2::X, Vec2::X);
        assert_eq!((c.s, c.t), (0.0, 0.0));
        assert!((c.distance() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_segments_parameters_clamped_and_locally_minimal() {
        let mut rng = Lcg(7);
        for _ in 0..200 {
            let (a0, a1, b0, b1) = (rng.vec2(), rng.vec2(), rng.vec2(), rng.vec2());
            let c = closest_points_between_segments(a0, a1, b0, b1);
            assert!((0.0..=1.0).contains(&c.s));
            assert!((0.0..=1.0).contains(&c.t));

            let best = c.distance();
            for i in 0..=10 {
                for j in 0..=10 {
                    let p = a0.lerp(a1, i as f64 / 10.0);
                    let q = b0.lerp(b1, j as f64 / 10.0);
                    assert!(best <= p.distance(q) + 1e-9, "{} > {}", best, p.distance(q));
                }
            }
        }
    }

    #[test]
    fn test_distance_segment_to_point() {
        let (d, near) = distance_segment_to_point(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(2.0, 3.0));
        assert!((d - 3.0).abs() < EPS);
        assert_eq!(near, Vec2::new(2.0, 0.0));

        let (d, near) = distance_segment_to_point(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(-3.0, 4.0));
        assert!((d - 5.0).abs() < EPS);
        assert_eq!(near, Vec2::ZERO);
    }

    // ===== Polygon Tests =====

    #[test]
    fn test_point_in_convex_polygon() {
        let triangle = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)];
        assert!(point_in_convex_polygon(Vec2::new(1.0, 1.0), &triangle));
        assert!(!point_in_convex_polygon(Vec2::new(3.0, 3.0), &triangle));
        assert!(!point_in_convex_polygon(Vec2::new(-0.1, 1.0), &triangle));
        // On an edge counts as inside
        assert!(point_in_convex_polygon(Vec2::new(2.0, 0.0), &triangle));
    }

    #[test]
    fn test_point_in_convex_polygon_needs_three_vertices() {
        assert!(!point_in_convex_polygon(Vec2::ZERO, &[Vec2::ZERO, Vec2::X]));
    }

    #[test]
    fn test_point_in_regular_polygon_half_planes() {
        let hexagon: Vec<Vec2> = (0..6)
            .map(|i| {
                let a = i as f64 * std::f64::consts::PI / 3.0;
                Vec2::new(a.cos(), a.sin()) * 2.0
            })
            .collect();

        let mut rng = Lcg(42);
        for _ in 0..500 {
            let p = rng.vec2() * 0.3;
            let inside_all = (0..6).all(|i| {
                let (s, e) = (hexagon[i], hexagon[(i + 1) % 6]);
                (e - s).perp_dot(p - s) > 0.0
            });
            let outside_one = (0..6).any(|i| {
                let (s, e) = (hexagon[i], hexagon[(i + 1) % 6]);
                (e - s).perp_dot(p - s) < 0.0
            });
            if inside_all {
                assert!(point_in_convex_polygon(p, &hexagon));
            }
            if outside_one {
                assert!(!point_in_convex_polygon(p, &hexagon));
            }
        }
    }

    // ===== Sphere Tests =====

    #[test]
    fn test_spheres_intersect() {
        assert!(spheres_intersect(Vec3::ZERO, 1.0, Vec3::new(1.5, 0.0, 0.0), 1.0));
        assert!(spheres_intersect(Vec3::ZERO, 1.0, Vec3::new(2.0, 0.0, 0.0), 1.0));
        assert!(!spheres_intersect(Vec3::ZERO, 1.0, Vec3::new(2.1, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_spheres_intersect_symmetric() {
        let mut rng = Lcg(3);
        for _ in 0..200 {
            let (a, b) = (rng.vec2(), rng.vec2());
            let (ra, rb) = (rng.next().abs(), rng.next().abs());
            assert_eq!(spheres_intersect(a, ra, b, rb), spheres_intersect(b, rb, a, ra));
        }
    }

    // ===== Rectangle Tests =====

    #[test]
    fn test_quad_contains_point() {
        let quad = axis_quad(Vec3::new(0.0, 10.0, 0.0), 10.0, 10.0);
        assert!(quad.contains_point(Vec3::new(5.0, 5.0, 0.0)));
        assert!(!quad.contains_point(Vec3::new(5.0, 11.0, 0.0)));
        assert_eq!(quad.center(), Vec3::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn test_quad_contains_point_mirrored_winding() {
        let flipped = Orientation::from_axis_angle(Vec3::X, std::f64::consts::PI);
        let quad = axis_quad(Vec3::ZERO, 4.0, 2.0);
        let mirrored = Quad {
            top_left: flipped.rotate(quad.top_left),
            bottom_left: flipped.rotate(quad.bottom_left),
            bottom_right: flipped.rotate(quad.bottom_right),
            top_right: flipped.rotate(quad.top_right),
        };
        // Mirrored across the X axis: now spans y in [0, 2]
        assert!(mirrored.contains_point(Vec3::new(2.0, 1.0, 0.0)));
        assert!(!mirrored.contains_point(Vec3::new(2.0, -1.0, 0.0)));
    }

    #[test]
    fn test_rectangles_axis_aligned_overlap() {
        let id = Orientation::IDENTITY;
        let a = axis_quad(Vec3::new(0.0, 0.0, 0.0), 10.0, 10.0);
        let b = axis_quad(Vec3::new(5.0, 5.0, 0.0), 10.0, 10.0);
        let c = axis_quad(Vec3::new(20.0, 20.0, 0.0), 10.0, 10.0);

        let hit = rectangles_intersect(&a, &id, &b, &id).expect("should overlap");
        assert!((hit.x() - 7.5).abs() < EPS);
        assert!((hit.y() + 2.5).abs() < EPS);
        assert!(rectangles_intersect(&a, &id, &c, &id).is_none());
    }

    #[test]
    fn test_rectangles_touching_counts() {
        let id = Orientation::IDENTITY;
        let a = axis_quad(Vec3::ZERO, 2.0, 2.0);
        let b = axis_quad(Vec3::new(2.0, 0.0, 0.0), 2.0, 2.0);
        assert!(rectangles_intersect(&a, &id, &b, &id).is_some());
    }

    #[test]
    fn test_rectangles_same_rotated_orientation() {
        let rot = Orientation::from_angle_z(FRAC_PI_4);
        let place = |top_left: Vec3| {
            let q = axis_quad(top_left, 2.0, 2.0);
            Quad {
                top_left: rot.rotate_about(q.top_left, top_left),
                bottom_left: rot.rotate_about(q.bottom_left, top_left),
                bottom_right: rot.rotate_about(q.bottom_right, top_left),
                top_right: rot.rotate_about(q.top_right, top_left),
            }
        };
        let a = place(Vec3::ZERO);
        let near = place(Vec3::new(1.0, 1.0, 0.0));
        let far = place(Vec3::new(10.0, 0.0, 0.0));

        assert!(rectangles_intersect(&a, &rot, &near, &rot).is_some());
        assert!(rectangles_intersect(&a, &rot, &far, &rot).is_none());
    }

    #[test]
    fn test_rectangles_different_orientation_crossing_edges() {
        // A plus sign: neither rectangle has a corner inside the other
        let id = Orientation::IDENTITY;
        let tilted = Orientation::from_angle_z(1e-3);
        let horizontal = axis_quad(Vec3::new(-5.0, 1.0, 0.0), 10.0, 2.0);
        let vertical = axis_quad(Vec3::new(-1.0, 5.0, 0.0), 2.0, 10.0);
        assert!(rectangles_intersect(&horizontal, &id, &vertical, &tilted).is_some());
    }

    #[test]
    fn test_rectangles_different_orientation_corner_inside() {
        let id = Orientation::IDENTITY;
        let rot = Orientation::from_angle_z(FRAC_PI_4);
        let big = axis_quad(Vec3::new(0.0, 10.0, 0.0), 10.0, 10.0);
        let small = axis_quad(Vec3::new(4.0, 6.0, 0.0), 1.0, 1.0);
        // Entirely inside: no edges touch, only the corner test can see it
        assert!(rectangles_intersect(&big, &id, &small, &rot).is_some());
        assert!(rectangles_intersect(&small, &rot, &big, &id).is_some());
    }

    #[test]
    fn test_rectangles_different_orientation_apart() {
        let id = Orientation::IDENTITY;
        let rot = Orientation::from_angle_z(FRAC_PI_4);
        let a = axis_quad(Vec3::ZERO, 1.0, 1.0);
        let b = axis_quad(Vec3::new(10.0, 10.0, 0.0), 1.0, 1.0);
        assert!(rectangles_intersect(&a, &id, &b, &rot).is_none());
    }

    #[test]
    fn test_rectangle_circle() {
        let rect = axis_quad(Vec3::new(5.0, -1.0, 0.0), 2.0, 2.0);

        // Touching the top edge from above
        let near = rectangle_circle_intersect(&rect, Vec3::new(6.0, 0.0, 0.0), 1.0).expect("touches");
        assert_eq!(near, Vec3::new(6.0, -1.0, 0.0));

        // Center inside but far from every edge
        let big = axis_quad(Vec3::new(0.0, 10.0, 0.0), 10.0, 10.0);
        let center = Vec3::new(5.0, 5.0, 0.0);
        assert_eq!(rectangle_circle_intersect(&big, center, 0.5), Some(center));

        assert!(rectangle_circle_intersect(&rect, Vec3::new(0.0, 0.0, 0.0), 1.0).is_none());
    }
}
