//! Scene graph and frame scheduler for the Lumen engine
//!
//! This crate provides the moving parts of a scene:
//!
//! - [`World`] - Arena of objects with parent/child links and deferred teardown
//! - [`ObjectKey`] - Generational key to an object in the world
//! - [`Object`] - Kinematics, shape, collider and appearance of one object
//! - [`Behavior`] - Callbacks for collisions, updates, destruction and drawing
//! - [`CollisionFilter`] - Layer/mask filtering of collision pairs
//! - [`SchedulerConfig`] - Sub-stepping of collision-checked movement

mod behavior;
mod error;
mod filter;
mod object;
mod scheduler;
mod world;

pub use behavior::{Behavior, FrameTime};
pub use error::SceneError;
pub use filter::{CollisionFilter, CollisionLayer};
pub use object::{Bounds, Object, ObjectState};
pub use scheduler::SchedulerConfig;
pub use world::{ObjectKey, World};

// Re-export the geometry and math types objects are built from
pub use lumen_geom::{Appearance, Canvas, Primitive, RecordingCanvas, Shape, ShapeKind, Vertex};
pub use lumen_math::{Orientation, Vec2, Vec3};
