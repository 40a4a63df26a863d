//! Collision layer system for filtering collision detection
//!
//! A body carries two sets of layers: its `layer` says what it is, its
//! `mask` says what it reacts to. Filtering is one-directional: a body only
//! tests (and hears about) things whose layer is in its own mask.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bits
    ///
    /// The named layers cover bits 0-7. Games can define more with
    /// [`CollisionLayers::from_bits_retain`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Solid level geometry
        const TERRAIN = 1 << 2;
        /// Geometry that only blocks enemies
        const ENEMY_PASSTHROUGH = 1 << 3;
        /// Projectiles and hazards
        const PROJECTILE = 1 << 4;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 5;
        /// Pickups and collectibles
        const PICKUP = 1 << 6;
        /// Debris and small physics objects
        const DEBRIS = 1 << 7;
    }
}

impl CollisionLayers {
    /// Whether a body with `mask` reacts to something on `layer`
    pub fn reacts_to(mask: Self, layer: Self) -> bool {
        mask.intersects(layer)
    }
}
