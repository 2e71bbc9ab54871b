//! Lumen - a small 2D/3D scene engine
//!
//! The engine itself lives in the workspace crates:
//! - `lumen_math` - vectors and orientations
//! - `lumen_geom` - shapes, collision detection and drawing
//! - `lumen_core` - the scene graph and the frame scheduler
//!
//! This crate holds the application configuration used by the driver binary.

pub mod config;
