//! # Platform Physics
//!
//! Swept-AABB physics for 2D platform games.
//!
//! ## Features
//!
//! - **Swept collision**: bodies are ray cast through the Minkowski
//!   difference of each piece of static geometry, so fast movers never tunnel
//! - **Sliding resolution**: bodies stop at the earliest contact and keep
//!   their speed along the surface
//! - **Collision layers**: layer/mask bitflags decide what each body reacts to
//! - **Hit callbacks**: closures for body-vs-body overlap and body-vs-static
//!   contact
//! - **Slot reuse**: destroyed bodies free their slot for the next creation
//!
//! ## Quick Start
//!
//! ```rust
//! use platform_physics::prelude::*;
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::platformer());
//! world.create_static_body(Vec2::new(0.0, -16.0), Vec2::new(640.0, 32.0), CollisionLayers::TERRAIN);
//!
//! let player = world.create_body(
//!     BodyDesc::new(Vec2::new(0.0, 100.0), Vec2::new(24.0, 24.0))
//!         .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY | CollisionLayers::TERRAIN)
//!         .on_hit_static(|_body, _floor, hit| {
//!             if hit.normal.y > 0.0 {
//!                 // landed
//!             }
//!         }),
//! );
//!
//! for _ in 0..60 {
//!     world.update(1.0 / 60.0);
//! }
//!
//! assert!(world.body(player).aabb.position.y < 100.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig},
        ecs::{Entity, EntityId, EntityRegistry},
        foundation::math::Vec2,
        physics::{
            Aabb, Body, BodyDesc, BodyHandle, CollisionLayers, Hit, PhysicsError, PhysicsWorld,
            StaticBody, StaticBodyHandle,
        },
    };
}
