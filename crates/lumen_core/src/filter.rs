//! Collision filtering via layer masks
//!
//! A filter decides whether two colliders are tested at all, before any
//! geometry is looked at.

use bitflags::bitflags;

bitflags! {
    /// Layers an object can belong to and collide with
    ///
    /// Each layer is a bit in a 32-bit mask. An object may sit on several
    /// layers at once.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Walls, floors and other scenery
        const SCENERY = 1 << 1;
        /// Objects driven by the player or by game logic
        const ACTOR = 1 << 2;
        /// Fast small movers (shots, thrown items)
        const PROJECTILE = 1 << 3;
        /// Regions that only report overlap
        const SENSOR = 1 << 4;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Which layers an object occupies and which it reacts to
///
/// Two objects A and B are tested against each other only if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Scenery collides with everything
    pub fn scenery() -> Self {
        Self {
            layer: CollisionLayer::SCENERY,
            mask: CollisionLayer::ALL,
        }
    }

    /// Projectiles hit actors and scenery but pass through each other
    pub fn projectile() -> Self {
        Self {
            layer: CollisionLayer::PROJECTILE,
            mask: CollisionLayer::ALL & !CollisionLayer::PROJECTILE,
        }
    }

    /// A sensor that reports the given layers
    pub fn sensor(detects: CollisionLayer) -> Self {
        Self {
            layer: CollisionLayer::SENSOR,
            mask: detects,
        }
    }

    /// Whether both filters agree to be tested against each other
    #[inline]
    pub fn collides_with(&self, other: &Self) -> bool {
        self.mask.intersects(other.layer) && other.mask.intersects(self.layer)
    }
}
