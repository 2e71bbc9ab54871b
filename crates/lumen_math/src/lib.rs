//! Vector and orientation math for the Lumen engine
//!
//! ## Core Types
//!
//! - [`Vector`] - fixed-size `f64` vector, with the [`Vec2`], [`Vec3`] and [`Vec4`] aliases
//! - [`Orientation`] - unit quaternion rotation with an identity fast path
//!
//! Everything here is pure and stateless.

mod vector;
mod orientation;

pub use vector::{Vector, Vec2, Vec3, Vec4, EPSILON};
pub use orientation::Orientation;
