//! Dynamic and static bodies
//!
//! Bodies live inside a [`PhysicsWorld`](super::PhysicsWorld) and are only
//! referenced from outside through index handles. A handle is valid while
//! its slot is active; once a body is destroyed the slot may be handed to the
//! next body that gets created.

use std::fmt;
use std::rc::Rc;

use crate::foundation::collections::PoolRecord;
use crate::foundation::math::Vec2;
use crate::physics::collision::{Aabb, Hit};
use crate::physics::collision_layers::CollisionLayers;

/// Called when a body overlaps another body it reacts to: `(self, other, hit)`
pub type OnHit = Rc<dyn Fn(&mut Body, &mut Body, Hit)>;

/// Called when a body runs into static geometry: `(self, other, hit)`
pub type OnHitStatic = Rc<dyn Fn(&mut Body, &StaticBody, Hit)>;

/// Index of a dynamic body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// Slot index in the body pool
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of a static body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaticBodyHandle(pub(crate) usize);

impl StaticBodyHandle {
    /// Slot index in the static body pool
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A moving box
#[derive(Clone)]
pub struct Body {
    /// Current bounds
    pub aabb: Aabb,
    /// Units per second
    pub velocity: Vec2,
    /// Units per second squared, added to velocity every update
    pub acceleration: Vec2,
    /// What this body is
    pub collision_layer: CollisionLayers,
    /// What this body reacts to
    pub collision_mask: CollisionLayers,
    /// Moves under its own velocity but is never swept or pushed out
    pub is_kinematic: bool,
    /// Inactive slots are skipped by the update and reused on creation
    pub is_active: bool,
    /// Owning entity, if any
    pub entity_id: Option<usize>,
    /// Overlap callback for other bodies
    pub on_hit: Option<OnHit>,
    /// Contact callback for static geometry
    pub on_hit_static: Option<OnHitStatic>,
}

impl Body {
    /// Center of the body
    pub fn position(&self) -> Vec2 {
        self.aabb.position
    }

    /// `[center_x, center_y, half_width, half_height]` for drawing
    pub fn render_rect(&self) -> [f32; 4] {
        self.aabb.to_array()
    }
}

impl PoolRecord for Body {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("aabb", &self.aabb)
            .field("velocity", &self.velocity)
            .field("acceleration", &self.acceleration)
            .field("collision_layer", &self.collision_layer)
            .field("collision_mask", &self.collision_mask)
            .field("is_kinematic", &self.is_kinematic)
            .field("is_active", &self.is_active)
            .field("entity_id", &self.entity_id)
            .field("on_hit", &self.on_hit.is_some())
            .field("on_hit_static", &self.on_hit_static.is_some())
            .finish()
    }
}

/// Immovable level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBody {
    /// Bounds
    pub aabb: Aabb,
    /// What this geometry is; bodies test it when their mask contains it
    pub collision_layer: CollisionLayers,
}

impl StaticBody {
    /// `[center_x, center_y, half_width, half_height]` for drawing
    pub fn render_rect(&self) -> [f32; 4] {
        self.aabb.to_array()
    }
}

// Static geometry is only ever cleared in bulk, so every slot stays live.
impl PoolRecord for StaticBody {
    fn is_active(&self) -> bool {
        true
    }
}

/// Everything needed to create a [`Body`]
///
/// ```
/// use platform_physics::physics::{BodyDesc, CollisionLayers};
/// use platform_physics::foundation::math::Vec2;
///
/// let desc = BodyDesc::new(Vec2::new(100.0, 200.0), Vec2::new(24.0, 24.0))
///     .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY | CollisionLayers::TERRAIN);
/// ```
#[derive(Clone)]
pub struct BodyDesc {
    /// Center
    pub position: Vec2,
    /// Full width and height
    pub size: Vec2,
    /// Initial velocity
    pub velocity: Vec2,
    /// What the body is
    pub collision_layer: CollisionLayers,
    /// What the body reacts to
    pub collision_mask: CollisionLayers,
    /// See [`Body::is_kinematic`]
    pub is_kinematic: bool,
    /// See [`Body::on_hit`]
    pub on_hit: Option<OnHit>,
    /// See [`Body::on_hit_static`]
    pub on_hit_static: Option<OnHitStatic>,
    /// See [`Body::entity_id`]
    pub entity_id: Option<usize>,
}

impl BodyDesc {
    /// A resting, non-kinematic body with no layers and no callbacks
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::zeros(),
            collision_layer: CollisionLayers::empty(),
            collision_mask: CollisionLayers::empty(),
            is_kinematic: false,
            on_hit: None,
            on_hit_static: None,
            entity_id: None,
        }
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.collision_layer = layer;
        self.collision_mask = mask;
        self
    }

    /// Mark the body kinematic
    pub fn kinematic(mut self) -> Self {
        self.is_kinematic = true;
        self
    }

    /// Attach a body-vs-body callback
    pub fn on_hit(mut self, callback: impl Fn(&mut Body, &mut Body, Hit) + 'static) -> Self {
        self.on_hit = Some(Rc::new(callback));
        self
    }

    /// Attach a body-vs-static callback
    pub fn on_hit_static(
        mut self,
        callback: impl Fn(&mut Body, &StaticBody, Hit) + 'static,
    ) -> Self {
        self.on_hit_static = Some(Rc::new(callback));
        self
    }

    /// Record the owning entity
    pub fn with_entity(mut self, entity_id: usize) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub(crate) fn into_body(self) -> Body {
        Body {
            aabb: Aabb::from_size(self.position, self.size),
            velocity: self.velocity,
            acceleration: Vec2::zeros(),
            collision_layer: self.collision_layer,
            collision_mask: self.collision_mask,
            is_kinematic: self.is_kinematic,
            is_active: true,
            entity_id: self.entity_id,
            on_hit: self.on_hit,
            on_hit_static: self.on_hit_static,
        }
    }
}

impl fmt::Debug for BodyDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyDesc")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("velocity", &self.velocity)
            .field("collision_layer", &self.collision_layer)
            .field("collision_mask", &self.collision_mask)
            .field("is_kinematic", &self.is_kinematic)
            .field("entity_id", &self.entity_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_builds_fresh_body() {
        let body = BodyDesc::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0))
            .with_velocity(Vec2::new(1.0, 0.0))
            .with_layers(CollisionLayers::ENEMY, CollisionLayers::TERRAIN)
            .with_entity(7)
            .into_body();

        assert!(body.is_active);
        assert!(!body.is_kinematic);
        assert_eq!(body.aabb.half_size, Vec2::new(2.0, 3.0));
        assert_eq!(body.acceleration, Vec2::zeros());
        assert_eq!(body.entity_id, Some(7));
        assert!(body.on_hit.is_none());
        assert_eq!(body.render_rect(), [10.0, 20.0, 2.0, 3.0]);
    }

    #[test]
    fn test_desc_callbacks_are_stored() {
        let body = BodyDesc::new(Vec2::zeros(), Vec2::new(1.0, 1.0))
            .kinematic()
            .on_hit(|_, _, _| {})
            .on_hit_static(|_, _, _| {})
            .into_body();

        assert!(body.is_kinematic);
        assert!(body.on_hit.is_some());
        assert!(body.on_hit_static.is_some());
        assert!(format!("{body:?}").contains("on_hit: true"));
    }
}
