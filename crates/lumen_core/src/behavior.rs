//! Per-object callbacks
//!
//! A [`Behavior`] is attached to an object when it is spawned and is invoked
//! synchronously at fixed points of the frame. Every hook receives the world
//! and the key of the object it belongs to, so it can read or change any
//! object, destroy any object (itself included) or rearrange the tree.
//! Structural changes requested while an update is running are deferred to
//! the end of the outermost update.

use crate::world::{ObjectKey, World};
use lumen_geom::Canvas;
use lumen_math::Vec3;

/// Timing of the frame being processed
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Time since the driver started, in seconds
    pub now: f64,
    /// Time elapsed since the previous frame, in seconds
    pub delta: f64,
    /// Frame counter, increasing by one per frame
    pub tick: u64,
}

impl FrameTime {
    pub fn new(now: f64, delta: f64, tick: u64) -> Self {
        Self { now, delta, tick }
    }

    /// The frame following this one, `delta` seconds later
    pub fn next(&self, delta: f64) -> Self {
        Self {
            now: self.now + delta,
            delta,
            tick: self.tick + 1,
        }
    }
}

/// Callbacks invoked on a scene object
///
/// Every method has an empty default, so implementors only write the hooks
/// they need.
#[allow(unused_variables)]
pub trait Behavior {
    /// Name shown in debug dumps
    fn kind(&self) -> &str {
        "object"
    }

    /// This object's collider touched `other`'s at `point`
    fn on_collision(&mut self, world: &mut World, me: ObjectKey, other: ObjectKey, point: Vec3) {}

    /// Start of this object's update, before its children move
    fn before_update(&mut self, world: &mut World, me: ObjectKey, time: FrameTime) {}

    /// End of this object's update, after every descendant was updated
    fn after_update(&mut self, world: &mut World, me: ObjectKey, time: FrameTime) {}

    /// Start of the update pass that runs even when the scene is paused
    fn before_always_update(&mut self, world: &mut World, me: ObjectKey, time: FrameTime) {}

    /// End of the update pass that runs even when the scene is paused
    fn after_always_update(&mut self, world: &mut World, me: ObjectKey, time: FrameTime) {}

    /// Teardown is starting; the object is still attached to its parent
    fn before_destroy(&mut self, world: &mut World, me: ObjectKey) {}

    /// Teardown is done; the children are gone and the key is about to expire
    fn after_destroy(&mut self, world: &mut World, me: ObjectKey) {}

    /// Inside this object's transform, before its shape is drawn
    fn before_draw(&self, world: &World, me: ObjectKey, canvas: &mut dyn Canvas, only_border: bool) {}

    /// Inside this object's transform, after its children were drawn
    fn after_draw(&self, world: &World, me: ObjectKey, canvas: &mut dyn Canvas, only_border: bool) {}
}
