//! Scene objects
//!
//! An [`Object`] holds everything a node of the scene carries apart from its
//! place in the tree: kinematics, an optional visual shape, an optional
//! collider, and how it is drawn and filtered. The tree links live in the
//! [`World`](crate::World).

use crate::filter::CollisionFilter;
use lumen_geom::{Appearance, Shape};
use lumen_math::{Orientation, Vec3};

/// Inclusive per-component range a vector is kept in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Bounds {
    /// No limit on any component
    pub const UNBOUNDED: Self = Self {
        min: Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        max: Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
    };

    /// Create bounds, swapping components given in the wrong order
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min_components(max),
            max: min.max_components(max),
        }
    }

    /// Every component within `[-limit, limit]`
    pub fn symmetric(limit: f64) -> Self {
        let limit = limit.abs();
        Self::new(Vec3::splat(-limit), Vec3::splat(limit))
    }

    #[inline]
    pub fn clamp(&self, v: Vec3) -> Vec3 {
        v.clamp_components(self.min, self.max)
    }
}

/// Lifecycle phase of an object that still has storage
///
/// An object that has been torn down has no state at all: its key is simply
/// no longer found in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectState {
    Live,
    /// Destroyed but not torn down yet; inert until the next flush
    Marked,
}

/// Data of one scene object
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    position: Vec3,
    orientation: Orientation,
    speed: Vec3,
    acceleration: Vec3,
    shape: Option<Shape>,
    collider: Option<Shape>,
    appearance: Appearance,
    display: bool,
    mass: f64,
    speed_bounds: Bounds,
    acceleration_bounds: Bounds,
    filter: CollisionFilter,
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    /// A visible, motionless object at the origin with no shape
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Orientation::IDENTITY,
            speed: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            shape: None,
            collider: None,
            appearance: Appearance::default(),
            display: true,
            mass: 1.0,
            speed_bounds: Bounds::UNBOUNDED,
            acceleration_bounds: Bounds::UNBOUNDED,
            filter: CollisionFilter::default(),
        }
    }

    /// Builder: set the position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_speed(mut self, speed: Vec3) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.set_acceleration(acceleration);
        self
    }

    /// Builder: set the drawn shape
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Builder: set the collider
    pub fn with_collider(mut self, collider: Shape) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Builder: use the same shape for drawing and collision
    pub fn with_solid_shape(self, shape: Shape) -> Self {
        self.with_shape(shape.clone()).with_collider(shape)
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: set speed bounds, clamping the current speed into them
    pub fn with_speed_bounds(mut self, bounds: Bounds) -> Self {
        self.set_speed_bounds(bounds);
        self
    }

    /// Builder: set acceleration bounds, clamping the current acceleration into them
    pub fn with_acceleration_bounds(mut self, bounds: Bounds) -> Self {
        self.set_acceleration_bounds(bounds);
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    // ===== Accessors =====

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn speed(&self) -> Vec3 {
        self.speed
    }

    #[inline]
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    #[inline]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    #[inline]
    pub fn collider(&self) -> Option<&Shape> {
        self.collider.as_ref()
    }

    #[inline]
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    #[inline]
    pub fn display(&self) -> bool {
        self.display
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn speed_bounds(&self) -> Bounds {
        self.speed_bounds
    }

    #[inline]
    pub fn acceleration_bounds(&self) -> Bounds {
        self.acceleration_bounds
    }

    #[inline]
    pub fn filter(&self) -> CollisionFilter {
        self.filter
    }

    /// Whether the object has a non-zero speed
    #[inline]
    pub fn is_moving(&self) -> bool {
        !self.speed.is_zero()
    }

    // ===== Mutators =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Set the speed, clamped into the speed bounds
    pub fn set_speed(&mut self, speed: Vec3) {
        self.speed = self.speed_bounds.clamp(speed);
    }

    /// Set the acceleration, clamped into the acceleration bounds
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = self.acceleration_bounds.clamp(acceleration);
    }

    pub fn set_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
    }

    /// Replace the collider; `None` takes the object out of collision testing
    pub fn set_collider(&mut self, collider: Option<Shape>) {
        self.collider = collider;
    }

    pub fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
    }

    pub fn set_display(&mut self, display: bool) {
        self.display = display;
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    pub fn set_speed_bounds(&mut self, bounds: Bounds) {
        self.speed_bounds = bounds;
        self.speed = bounds.clamp(self.speed);
    }

    pub fn set_acceleration_bounds(&mut self, bounds: Bounds) {
        self.acceleration_bounds = bounds;
        self.acceleration = bounds.clamp(self.acceleration);
    }

    pub fn set_filter(&mut self, filter: CollisionFilter) {
        self.filter = filter;
    }

    /// Move by `offset`
    #[inline]
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Advance the position by the current speed over `dt`
    #[inline]
    pub(crate) fn advance(&mut self, dt: f64) {
        self.position += self.speed * dt;
    }

    /// Add acceleration over `dt` to the speed
    pub(crate) fn integrate(&mut self, dt: f64) {
        if !self.acceleration.is_zero() {
            self.set_speed(self.speed + self.acceleration * dt);
        }
    }
}
