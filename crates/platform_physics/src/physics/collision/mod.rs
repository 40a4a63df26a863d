//! Collision geometry and intersection tests
//!
//! # Module Organization
//!
//! - [`primitives`] - Boxes, hit results and the swept ray cast
//!
//! # Key Types
//!
//! - [`Aabb`] - Center/half-extent box shared by bodies and static geometry
//! - [`Hit`] - Outcome of a single intersection test

pub mod primitives;

// Re-export commonly used types
pub use primitives::{
    aabb_intersect, minkowski_difference, penetration_vector, point_in_aabb, ray_intersect_aabb,
    Aabb, Hit,
};
