//! Physics module for collision detection and response
//!
//! Bodies are integrated once per fixed tick, swept against static level
//! geometry so fast movers cannot tunnel, clipped at the earliest contact,
//! and finally tested against each other for overlap notifications.

pub mod body;
pub mod collision;
pub mod collision_layers;
pub mod world;

#[cfg(test)]
mod tests;

pub use body::{Body, BodyDesc, BodyHandle, OnHit, OnHitStatic, StaticBody, StaticBodyHandle};
pub use collision::{Aabb, Hit};
pub use collision_layers::CollisionLayers;
pub use world::PhysicsWorld;

use crate::foundation::collections::PoolError;

/// Misuse of the physics handle surface
#[derive(thiserror::Error, Debug)]
pub enum PhysicsError {
    /// Body index past the end of the pool
    #[error("body handle {index} is out of range (pool holds {len})")]
    BodyOutOfRange {
        /// Offending index
        index: usize,
        /// Pool length
        len: usize,
    },

    /// Body slot exists but has been destroyed
    #[error("body handle {0} refers to an inactive body")]
    InactiveBody(usize),

    /// Static body index past the end of the pool
    #[error("static body handle {index} is out of range (pool holds {len})")]
    StaticBodyOutOfRange {
        /// Offending index
        index: usize,
        /// Pool length
        len: usize,
    },

    /// Body storage could not grow
    #[error("body storage exhausted: {0}")]
    Storage(#[from] PoolError),
}
