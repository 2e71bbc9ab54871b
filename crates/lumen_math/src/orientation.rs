//! Unit quaternion orientation
//!
//! An `Orientation` is a rotation stored as a unit-length quaternion
//! `(x, y, z, w)` where `w` is the scalar part. Every constructor
//! renormalizes, so the magnitude stays at 1 within floating tolerance.
//!
//! Most objects in a scene are never rotated. `rotate`, `rotate_about` and
//! `compose` check for the exact identity first and skip the matrix work;
//! this is what keeps per-frame evaluation of large static trees cheap.

use crate::vector::{Vec3, Vec4, EPSILON};
use std::f64::consts::PI;

/// A rotation in 3D space, stored as a unit quaternion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation(Vec4);

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    /// Identity orientation (no rotation)
    ///
    /// Also used as a sentinel: comparing against it is how rotation work
    /// gets skipped.
    pub const IDENTITY: Self = Self(Vec4::new(0.0, 0.0, 0.0, 1.0));

    /// Create an orientation from raw quaternion components, renormalizing
    ///
    /// A zero quaternion has no direction and maps to the identity.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self::from_vec4(Vec4::new(x, y, z, w))
    }

    /// Create an orientation from a 4-vector, renormalizing
    pub fn from_vec4(q: Vec4) -> Self {
        let len2 = q.length_squared();
        if len2 <= EPSILON {
            Self::IDENTITY
        } else {
            Self(q / len2.sqrt())
        }
    }

    /// Rotation of `angle` radians around `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        if axis.length_squared() <= EPSILON {
            return Self::IDENTITY;
        }
        let half = angle * 0.5;
        let v = axis.normalized() * half.sin();
        Self::new(v.x(), v.y(), v.z(), half.cos())
    }

    /// Rotation around the Z axis, the only one that matters for 2D shapes
    pub fn from_angle_z(angle: f64) -> Self {
        Self::from_axis_angle(Vec3::Z, angle)
    }

    /// Shortest-arc rotation that turns direction `from` onto direction `to`
    ///
    /// Antiparallel inputs have no unique shortest arc; a half turn around an
    /// axis perpendicular to `from` is returned.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        let from = from.normalized();
        let to = to.normalized();
        let border = 1.0 - EPSILON;
        let dot = from.dot(to);

        if dot > border {
            Self::IDENTITY
        } else if dot < -border {
            let mut axis = Vec3::X.cross(from);
            if axis.length_squared() < EPSILON {
                axis = Vec3::Y.cross(from);
            }
            Self::from_axis_angle(axis, PI)
        } else {
            let axis = from.cross(to);
            Self::new(axis.x(), axis.y(), axis.z(), 1.0 + dot)
        }
    }

    /// Quaternion components `(x, y, z, w)`
    #[inline]
    pub fn as_vec4(&self) -> Vec4 {
        self.0
    }

    /// Whether this is exactly the identity sentinel
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The inverse rotation (conjugate of a unit quaternion)
    pub fn inverse(&self) -> Self {
        if self.is_identity() {
            return *self;
        }
        let [x, y, z, w] = self.0.to_array();
        Self(Vec4::new(-x, -y, -z, w))
    }

    /// Compose two rotations: the result applies `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        if other.is_identity() {
            return *self;
        }
        if self.is_identity() {
            return *other;
        }

        let [ax, ay, az, aw] = self.0.to_array();
        let [bx, by, bz, bw] = other.0.to_array();

        // Hamilton product, renormalized to stop drift across long chains
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// 4x4 homogeneous rotation matrix, column-major
    pub fn rotation_matrix(&self) -> [f64; 16] {
        let [x, y, z, w] = self.0.to_array();
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        [
            1.0 - 2.0 * (yy + zz), 2.0 * (xy + zw), 2.0 * (xz - yw), 0.0,
            2.0 * (xy - zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + xw), 0.0,
            2.0 * (xz + yw), 2.0 * (yz - xw), 1.0 - 2.0 * (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    /// Rotate a vector around the origin
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        if self.is_identity() {
            return v;
        }
        let m = self.rotation_matrix();
        let [x, y, z] = v.to_array();
        Vec3::new(
            x * m[0] + y * m[4] + z * m[8],
            x * m[1] + y * m[5] + z * m[9],
            x * m[2] + y * m[6] + z * m[10],
        )
    }

    /// Rotate a point around `pivot`
    pub fn rotate_about(&self, v: Vec3, pivot: Vec3) -> Vec3 {
        if self.is_identity() {
            return v;
        }
        pivot + self.rotate(v - pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < EPS
    }

    #[test]
    fn test_constructor_normalizes() {
        let q = Orientation::new(1.0, 2.0, 3.0, 4.0);
        assert!((q.as_vec4().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_quaternion_is_identity() {
        assert!(Orientation::new(0.0, 0.0, 0.0, 0.0).is_identity());
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Orientation::IDENTITY.rotate(v), v);
        assert_eq!(Orientation::default().rotate_about(v, Vec3::X), v);
    }

    #[test]
    fn test_z_rotation_90() {
        let q = Orientation::from_angle_z(FRAC_PI_2);
        assert!(vec_approx_eq(q.rotate(Vec3::X), Vec3::Y), "got {:?}", q.rotate(Vec3::X));
        assert!(vec_approx_eq(q.rotate(Vec3::Y), -Vec3::X));
        assert!(vec_approx_eq(q.rotate(Vec3::Z), Vec3::Z));
    }

    #[test]
    fn test_x_rotation_90() {
        let q = Orientation::from_axis_angle(Vec3::X, FRAC_PI_2);
        assert!(vec_approx_eq(q.rotate(Vec3::Y), Vec3::Z));
    }

    #[test]
    fn test_rotation_uses_all_axes() {
        // A point off the rotation plane keeps its z while x/y rotate
        let q = Orientation::from_angle_z(FRAC_PI_2);
        let rotated = q.rotate(Vec3::new(1.0, 0.0, 5.0));
        assert!(vec_approx_eq(rotated, Vec3::new(0.0, 1.0, 5.0)), "got {:?}", rotated);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let q = Orientation::from_axis_angle(Vec3::new(1.0, 1.0, 0.5), 1.23);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((v.length() - q.rotate(v).length()).abs() < EPS);
    }

    #[test]
    fn test_rotate_about_pivot() {
        let q = Orientation::from_angle_z(FRAC_PI_2);
        let pivot = Vec3::new(1.0, 1.0, 0.0);
        let rotated = q.rotate_about(Vec3::new(2.0, 1.0, 0.0), pivot);
        assert!(vec_approx_eq(rotated, Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn test_compose_identity_short_circuits() {
        let q = Orientation::from_angle_z(0.7);
        assert_eq!(q.compose(&Orientation::IDENTITY), q);
        assert_eq!(Orientation::IDENTITY.compose(&q), q);
    }

    #[test]
    fn test_compose_order() {
        let about_z = Orientation::from_angle_z(FRAC_PI_2);
        let about_x = Orientation::from_axis_angle(Vec3::X, FRAC_PI_2);
        // X first: Y -> Z, then Z: Z stays Z
        let composed = about_z.compose(&about_x);
        assert!(vec_approx_eq(composed.rotate(Vec3::Y), Vec3::Z));
        assert!(vec_approx_eq(
            composed.rotate(Vec3::Y),
            about_z.rotate(about_x.rotate(Vec3::Y))
        ));
    }

    #[test]
    fn test_compose_inverse() {
        let q = Orientation::from_axis_angle(Vec3::new(0.3, -1.0, 2.0), 1.1);
        let v = Vec3::new(4.0, -2.0, 1.0);
        let back = q.inverse().compose(&q).rotate(v);
        assert!(vec_approx_eq(back, v));
    }

    #[test]
    fn test_between() {
        let q = Orientation::between(Vec3::X, Vec3::Y);
        assert!(vec_approx_eq(q.rotate(Vec3::X), Vec3::Y));

        assert!(Orientation::between(Vec3::X, Vec3::X * 3.0).is_identity());

        let flip = Orientation::between(Vec3::X, -Vec3::X);
        assert!(vec_approx_eq(flip.rotate(Vec3::X), -Vec3::X));
    }

    #[test]
    fn test_rotation_matrix_identity() {
        let m = Orientation::IDENTITY.rotation_matrix();
        for (i, value) in m.iter().enumerate() {
            let expected = if i % 5 == 0 { 1.0 } else { 0.0 };
            assert_eq!(*value, expected, "entry {}", i);
        }
    }
}
