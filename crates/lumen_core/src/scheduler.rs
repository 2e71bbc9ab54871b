//! Per-frame update and movement
//!
//! An update visits the tree depth-first. Each object moves its direct
//! children, integrates its own acceleration, then updates the children in
//! order. Collisions are only tested between siblings, never across levels.
//!
//! Movement with collision detection is sub-stepped: the frame is cut into
//! [`SchedulerConfig::collision_samples`] equal slices, every collidable
//! mover advances by one slice and is then tested against its siblings. A
//! pair that collided is not reported again during the same move.

use crate::behavior::FrameTime;
use crate::object::Object;
use crate::world::{ObjectKey, World};
use lumen_geom::{detect_collision, Shape};
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

/// Scheduler tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Collision sub-steps per frame, at least one
    pub collision_samples: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { collision_samples: 4 }
    }
}

impl SchedulerConfig {
    pub fn new(collision_samples: u32) -> Self {
        Self {
            collision_samples: collision_samples.max(1),
        }
    }

    /// Effective number of sub-steps
    #[inline]
    pub fn samples(&self) -> u32 {
        self.collision_samples.max(1)
    }
}

/// Unordered pair of objects
fn pair(a: ObjectKey, b: ObjectKey) -> (ObjectKey, ObjectKey) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl World {
    /// Update `root` and its subtree for one frame
    ///
    /// When this is the outermost update, queued destroy/attach/detach
    /// commands are applied once everything else is done.
    pub fn update(&mut self, root: ObjectKey, time: FrameTime, collision_detect: bool) {
        self.run_pass(|world| world.update_node(root, time, collision_detect));
    }

    /// Update every root for one frame, flushing once at the end
    pub fn update_roots(&mut self, time: FrameTime, collision_detect: bool) {
        let roots: Vec<ObjectKey> = self.roots().collect();
        self.run_pass(|world| {
            for root in roots {
                world.update_node(root, time, collision_detect);
            }
        });
    }

    /// Run only the always-update hooks of `root` and its subtree
    ///
    /// Nothing moves. This is the pass a driver keeps running while the scene
    /// is paused.
    pub fn always_update(&mut self, root: ObjectKey, time: FrameTime) {
        self.run_pass(|world| world.always_update_node(root, time));
    }

    fn run_pass(&mut self, pass: impl FnOnce(&mut World)) {
        self.update_depth += 1;
        pass(self);
        self.update_depth -= 1;

        if self.update_depth == 0 {
            self.flush();
        }
    }

    fn update_node(&mut self, key: ObjectKey, time: FrameTime, collision_detect: bool) {
        if !self.is_live(key) {
            return;
        }

        self.with_behavior(key, |behavior, world| behavior.before_update(world, key, time));
        if !self.is_live(key) {
            return;
        }

        self.move_children(key, time.delta, collision_detect);
        if !self.is_live(key) {
            return;
        }

        if let Some(object) = self.get_mut(key) {
            object.integrate(time.delta);
        }

        for child in self.children(key).to_vec() {
            self.update_node(child, time, collision_detect);
        }

        if self.is_live(key) {
            self.with_behavior(key, |behavior, world| behavior.after_update(world, key, time));
        }
    }

    fn always_update_node(&mut self, key: ObjectKey, time: FrameTime) {
        if !self.is_live(key) {
            return;
        }

        self.with_behavior(key, |behavior, world| behavior.before_always_update(world, key, time));
        for child in self.children(key).to_vec() {
            self.always_update_node(child, time);
        }
        if self.is_live(key) {
            self.with_behavior(key, |behavior, world| behavior.after_always_update(world, key, time));
        }
    }

    fn advance(&mut self, key: ObjectKey, dt: f64) {
        if let Some(object) = self.get_mut(key) {
            object.advance(dt);
        }
    }

    /// Move the direct children of `parent` by one frame
    fn move_children(&mut self, parent: ObjectKey, dt: f64, collision_detect: bool) {
        let siblings = self.children(parent).to_vec();

        if !collision_detect {
            for &child in &siblings {
                self.advance(child, dt);
            }
            return;
        }

        let mut active = Vec::new();
        for &child in &siblings {
            let moving = self.is_live(child) && self.get(child).is_some_and(|o| o.is_moving());
            if !moving {
                continue;
            }
            if self.is_collidable(child) {
                active.push(child);
            } else {
                self.advance(child, dt);
            }
        }

        if active.is_empty() {
            return;
        }

        let samples = self.config.samples();
        let slice = dt / samples as f64;
        let mut collided = HashSet::new();

        for step in 0..samples {
            for &key in &active {
                self.advance(key, slice);
            }

            let remaining = (samples - step - 1) as f64 * slice;
            let mut i = 0;
            while i < active.len() {
                let key = active[i];
                if self.is_collidable(key) {
                    self.collide_with_siblings(key, &siblings, slice, &mut collided);
                }

                if self.is_collidable(key) {
                    i += 1;
                } else {
                    // Out of the simulation: finish the frame's travel in one go
                    self.advance(key, remaining);
                    active.remove(i);
                }
            }
        }
    }

    /// Test one mover against every sibling, firing callbacks on hits
    fn collide_with_siblings(
        &mut self,
        key: ObjectKey,
        siblings: &[ObjectKey],
        slice: f64,
        collided: &mut HashSet<(ObjectKey, ObjectKey)>,
    ) {
        for &other in siblings {
            if other == key || !self.is_collidable(other) {
                continue;
            }
            let memo_key = pair(key, other);
            if collided.contains(&memo_key) {
                continue;
            }
            let Some(point) = self.test_pair(key, other, slice) else {
                continue;
            };

            collided.insert(memo_key);
            log::trace!("{:?} collided with {:?} at {}", key, other, point);

            self.with_behavior(key, |behavior, world| behavior.on_collision(world, key, other, point));
            if self.is_valid(other) {
                self.with_behavior(other, |behavior, world| behavior.on_collision(world, other, key, point));
            }

            if !self.is_collidable(key) {
                break;
            }
        }
    }

    /// Swept collision test between two siblings over the last slice
    fn test_pair(&self, key: ObjectKey, other: ObjectKey, slice: f64) -> Option<Vec3> {
        let a = self.get(key)?;
        let b = self.get(other)?;
        if !a.filter().collides_with(&b.filter()) {
            return None;
        }

        let collider_a = placed_collider(a)?;
        let collider_b = placed_collider(b)?;

        detect_collision(
            &collider_a,
            a.position(),
            a.speed() * slice,
            &collider_b,
            b.position(),
            b.speed() * slice,
        )
    }
}

/// Collider in the parent's frame, rotated only when the object is
fn placed_collider(object: &Object) -> Option<Cow<'_, Shape>> {
    let collider = object.collider()?;
    if object.orientation().is_identity() {
        Some(Cow::Borrowed(collider))
    } else {
        Some(Cow::Owned(collider.rotated(&object.orientation())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Orientation;

    #[test]
    fn test_config_default_and_minimum() {
        assert_eq!(SchedulerConfig::default().samples(), 4);
        assert_eq!(SchedulerConfig::new(0).samples(), 1);
        let raw = SchedulerConfig { collision_samples: 0 };
        assert_eq!(raw.samples(), 1);
    }

    #[test]
    fn test_pair_is_unordered() {
        let mut world = World::new();
        let a = world.spawn(Object::new());
        let b = world.spawn(Object::new());
        assert_eq!(pair(a, b), pair(b, a));
    }

    #[test]
    fn test_move_without_collision_detection() {
        let mut world = World::new();
        let root = world.spawn(Object::new());
        let a = world
            .spawn_child(root, Object::new().with_speed(Vec3::new(1.0, 2.0, 0.0)))
            .unwrap();
        world.update(root, FrameTime::new(0.0, 0.5, 0), false);
        assert_eq!(world.get(a).unwrap().position(), Vec3::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn test_root_integrates_but_does_not_move() {
        let mut world = World::new();
        let root = world.spawn(
            Object::new()
                .with_speed(Vec3::new(1.0, 0.0, 0.0))
                .with_acceleration(Vec3::new(2.0, 0.0, 0.0)),
        );
        world.update(root, FrameTime::new(0.0, 1.0, 0), true);
        let object = world.get(root).unwrap();
        assert_eq!(object.position(), Vec3::ZERO);
        assert_eq!(object.speed(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotated_object_rotates_its_collider() {
        let mut world = World::new();
        let root = world.spawn(Object::new());
        // A 4x0.2 bar pointing along +x; turned a quarter it points along +y
        let bar = Shape::rectangle(Vec3::new(0.0, 0.1, 0.0), 4.0, 0.2);
        let turned = world
            .spawn_child(
                root,
                Object::new()
                    .with_orientation(Orientation::from_angle_z(std::f64::consts::FRAC_PI_2))
                    .with_collider(bar),
            )
            .unwrap();
        let probe = world
            .spawn_child(
                root,
                Object::new()
                    .at(Vec3::new(0.0, 3.0, 0.0))
                    .with_collider(Shape::circle(Vec3::ZERO, 0.5)),
            )
            .unwrap();

        assert!(world.test_pair(probe, turned, 0.0).is_some());
        world.get_mut(turned).unwrap().set_orientation(Orientation::IDENTITY);
        assert!(world.test_pair(probe, turned, 0.0).is_none());
    }

    #[test]
    fn test_filtered_pair_is_not_tested() {
        use crate::filter::CollisionFilter;

        let mut world = World::new();
        let root = world.spawn(Object::new());
        let shot = || {
            Object::new()
                .with_collider(Shape::circle(Vec3::ZERO, 1.0))
                .with_filter(CollisionFilter::projectile())
        };
        let a = world.spawn_child(root, shot()).unwrap();
        let b = world.spawn_child(root, shot()).unwrap();
        assert!(world.test_pair(a, b, 0.0).is_none());

        world.get_mut(b).unwrap().set_filter(CollisionFilter::default());
        assert!(world.test_pair(a, b, 0.0).is_some());
    }
}
