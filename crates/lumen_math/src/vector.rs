//! Fixed-size vector type
//!
//! `Vector<N>` is a plain value type over `f64`. The scene layer works in 3D
//! (`Vec3`), the 2D collision predicates project onto `Vec2`, and orientations
//! are stored as `Vec4`.

use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// Squared-length threshold below which a vector (or segment) is treated as degenerate
pub const EPSILON: f64 = 1e-16;

/// N-dimensional vector with `f64` components
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<const N: usize>(pub [f64; N]);

/// 2D vector
pub type Vec2 = Vector<2>;
/// 3D vector
pub type Vec3 = Vector<3>;
/// 4D vector (also the storage of [`crate::Orientation`])
pub type Vec4 = Vector<4>;

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> Vector<N> {
    pub const ZERO: Self = Self([0.0; N]);

    /// Create a vector with every component set to `value`
    #[inline]
    pub const fn splat(value: f64) -> Self {
        Self([value; N])
    }

    /// Create a vector from its components
    #[inline]
    pub const fn from_array(components: [f64; N]) -> Self {
        Self(components)
    }

    /// Components as an array
    #[inline]
    pub fn to_array(self) -> [f64; N] {
        self.0
    }

    /// Number of components
    #[inline]
    pub const fn dimension(&self) -> usize {
        N
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Length squared (faster than length)
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length (magnitude)
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Squared distance to another point
    #[inline]
    pub fn distance_squared(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    /// Normalize to unit length
    ///
    /// A zero vector stays zero; callers that care about near-degenerate input
    /// should compare `length_squared` against [`EPSILON`] first.
    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Rescale to the given length, keeping direction
    #[inline]
    pub fn with_length(self, length: f64) -> Self {
        self.normalized() * length
    }

    /// Whether every component is exactly zero
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }

    /// Linear interpolation between two vectors
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Clamp each component between corresponding min and max values
    #[inline]
    pub fn clamp_components(self, min: Self, max: Self) -> Self {
        self.zip_with(min, f64::max).zip_with(max, f64::min)
    }

    /// Component-wise minimum
    #[inline]
    pub fn min_components(self, other: Self) -> Self {
        self.zip_with(other, f64::min)
    }

    /// Component-wise maximum
    #[inline]
    pub fn max_components(self, other: Self) -> Self {
        self.zip_with(other, f64::max)
    }

    /// Component-wise multiplication (Hadamard product)
    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// Apply `f` to each component
    #[inline]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = self.0;
        for c in out.iter_mut() {
            *c = f(*c);
        }
        Self(out)
    }

    #[inline]
    fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = self.0;
        for (c, o) in out.iter_mut().zip(other.0.iter()) {
            *c = f(*c, *o);
        }
        Self(out)
    }
}

impl Vec2 {
    pub const X: Self = Self([1.0, 0.0]);
    pub const Y: Self = Self([0.0, 1.0]);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// 2D cross product (z component of the 3D cross product)
    #[inline]
    pub fn perp_dot(self, other: Self) -> f64 {
        self.0[0] * other.0[1] - self.0[1] * other.0[0]
    }

    /// Rotate by +90 degrees
    #[inline]
    pub fn perp(self) -> Self {
        Self([-self.0[1], self.0[0]])
    }

    /// Extend to 3D with the given z
    #[inline]
    pub fn extend(self, z: f64) -> Vec3 {
        Vector([self.0[0], self.0[1], z])
    }
}

impl Vec3 {
    pub const X: Self = Self([1.0, 0.0, 0.0]);
    pub const Y: Self = Self([0.0, 1.0, 0.0]);
    pub const Z: Self = Self([0.0, 0.0, 1.0]);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    /// Cross product
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        Self([ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx])
    }

    /// Drop the z component
    #[inline]
    pub fn xy(self) -> Vec2 {
        Vector([self.0[0], self.0[1]])
    }

    /// Extend to 4D with the given w
    #[inline]
    pub fn extend(self, w: f64) -> Vec4 {
        Vector([self.0[0], self.0[1], self.0[2], w])
    }

    /// Components narrowed to `f32`, for vertex data
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.0[0] as f32, self.0[1] as f32, self.0[2] as f32]
    }
}

impl Vec4 {
    pub const X: Self = Self([1.0, 0.0, 0.0, 0.0]);
    pub const Y: Self = Self([0.0, 1.0, 0.0, 0.0]);
    pub const Z: Self = Self([0.0, 0.0, 1.0, 0.0]);
    pub const W: Self = Self([0.0, 0.0, 0.0, 1.0]);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self([x, y, z, w])
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.0[3]
    }

    /// Drop the w component
    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vector([self.0[0], self.0[1], self.0[2]])
    }
}

impl<const N: usize> From<[f64; N]> for Vector<N> {
    fn from(components: [f64; N]) -> Self {
        Self(components)
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;
    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

// Operator overloads

impl<const N: usize> Add for Vector<N> {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        self.map(|c| c * scalar)
    }
}

impl<const N: usize> Mul<Vector<N>> for f64 {
    type Output = Vector<N>;
    #[inline]
    fn mul(self, v: Vector<N>) -> Vector<N> {
        v * self
    }
}

impl<const N: usize> MulAssign<f64> for Vector<N> {
    #[inline]
    fn mul_assign(&mut self, scalar: f64) {
        *self = *self * scalar;
    }
}

impl<const N: usize> Div<f64> for Vector<N> {
    type Output = Self;
    #[inline]
    fn div(self, scalar: f64) -> Self {
        self.map(|c| c / scalar)
    }
}

impl<const N: usize> DivAssign<f64> for Vector<N> {
    #[inline]
    fn div_assign(&mut self, scalar: f64) {
        *self = *self / scalar;
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl<const N: usize> std::fmt::Display for Vector<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}
