//! Entity bookkeeping
//!
//! Game-side records that pair physics bodies with presentation handles.

pub mod entity;

pub use entity::{Entity, EntityError, EntityId, EntityRegistry};
