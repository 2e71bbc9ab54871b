//! Geometry for the Lumen scene engine
//!
//! This crate provides the shapes scene objects are built from, including:
//! - Shapes (rectangles, polygons, circles, meshes, cylinders, spheres)
//! - Collision primitives and shape-pair intersection
//! - Swept collision detection for fast circular shapes
//! - A drawing interface with a recording canvas

pub mod collision;
pub mod detect;
pub mod draw;
pub mod shapes;

// Re-export commonly used types
pub use collision::{
    closest_points_between_segments, distance_segment_to_point, point_in_convex_polygon, rectangle_circle_intersect,
    rectangles_intersect, spheres_intersect, Quad, SegmentClosest, CONTACT_EPSILON,
};
pub use detect::{detect_collision, intersect};
pub use draw::{Appearance, Canvas, DrawBatch, Primitive, RecordingCanvas, Vertex, SPHERE_DETAIL};
pub use shapes::{Shape, ShapeKind, CIRCLE_SIDES_PER_UNIT, MIN_CIRCLE_SIDES};
