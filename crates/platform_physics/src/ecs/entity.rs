//! Entity implementation
//!
//! An entity is a thin record tying a physics body to an optional animation
//! handle. Entities share the body pool's reuse rules: destroying one frees
//! its slot for the next `create`.

use crate::foundation::collections::{PoolRecord, SlotPool};
use crate::foundation::logging::fatal;
use crate::physics::{BodyDesc, BodyHandle, PhysicsWorld};

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

impl EntityId {
    /// Get the entity ID
    pub const fn id(self) -> usize {
        self.0
    }
}

/// Entity lookup errors
#[derive(thiserror::Error, Debug)]
pub enum EntityError {
    /// Id past the end of the registry
    #[error("entity id {index} is out of range (registry holds {len})")]
    OutOfRange {
        /// Offending id
        index: usize,
        /// Registry length
        len: usize,
    },

    /// Entity slot exists but has been destroyed
    #[error("entity id {0} refers to an inactive entity")]
    Inactive(usize),
}

/// Pairing of a body with whatever else the game attaches to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Physics body owned by this entity
    pub body: BodyHandle,
    /// Animation handle, if the entity is drawn animated
    pub animation: Option<usize>,
    /// Inactive entities are skipped and their slots reused
    pub is_active: bool,
}

impl PoolRecord for Entity {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Storage for all entities of a game
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: SlotPool<Entity>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity together with its body.
    ///
    /// The body is stamped with the new entity's id so callbacks can map a
    /// body back to its entity.
    pub fn create(&mut self, world: &mut PhysicsWorld, desc: BodyDesc) -> EntityId {
        let index = self.entities.next_index();
        if index < self.entities.len() {
            log::debug!("Reusing inactive entity slot {index}");
        }

        let body = world.create_body(desc.with_entity(index));
        let entity = Entity {
            body,
            animation: None,
            is_active: true,
        };

        match self.entities.insert(entity) {
            Ok(index) => EntityId(index),
            Err(error) => fatal(error),
        }
    }

    /// Look up an active entity
    pub fn try_get(&self, id: EntityId) -> Result<&Entity, EntityError> {
        match self.entities.get(id.0) {
            Some(entity) if entity.is_active => Ok(entity),
            Some(_) => Err(EntityError::Inactive(id.0)),
            None => Err(EntityError::OutOfRange {
                index: id.0,
                len: self.entities.len(),
            }),
        }
    }

    /// Active entity behind `id`
    ///
    /// # Panics
    ///
    /// If the id is out of range or the entity was destroyed.
    #[track_caller]
    pub fn get(&self, id: EntityId) -> &Entity {
        match self.try_get(id) {
            Ok(entity) => entity,
            Err(error) => fatal(error),
        }
    }

    /// Active entity behind `id`, mutably
    ///
    /// # Panics
    ///
    /// If the id is out of range or the entity was destroyed.
    #[track_caller]
    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        let len = self.entities.len();
        match self.entities.get_mut(id.0) {
            Some(entity) if entity.is_active => entity,
            Some(_) => fatal(EntityError::Inactive(id.0)),
            None => fatal(EntityError::OutOfRange { index: id.0, len }),
        }
    }

    /// Find the entity that owns `body`
    pub fn find_by_body(&self, body: BodyHandle) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|entity| entity.is_active && entity.body == body)
            .map(EntityId)
    }

    /// Destroy an entity and its body. Destroying twice does nothing.
    #[track_caller]
    pub fn destroy(&mut self, world: &mut PhysicsWorld, id: EntityId) {
        let len = self.entities.len();
        let Some(entity) = self.entities.get_mut(id.0) else {
            fatal(EntityError::OutOfRange { index: id.0, len });
        };

        if entity.is_active {
            entity.is_active = false;
            world.destroy_body(entity.body);
            log::debug!("Destroyed entity {}", id.0);
        }
    }

    /// Deactivate entities whose body was destroyed behind their back,
    /// typically by a hit callback. Returns how many were retired.
    pub fn retire_orphans(&mut self, world: &PhysicsWorld) -> usize {
        let mut retired = 0;
        for (index, entity) in self.entities.iter_mut().enumerate() {
            if entity.is_active && !world.is_body_active(entity.body) {
                entity.is_active = false;
                retired += 1;
                log::debug!("Entity {index} lost its body");
            }
        }
        retired
    }

    /// Number of entity slots, including destroyed ones
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Active entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| entity.is_active)
            .map(|(index, entity)| (EntityId(index), entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::CollisionLayers;

    fn small_body() -> BodyDesc {
        BodyDesc::new(Vec2::zeros(), Vec2::new(2.0, 2.0))
    }

    #[test]
    fn test_create_links_body_and_entity() {
        let mut world = PhysicsWorld::default();
        let mut entities = EntityRegistry::new();

        // A body that belongs to no entity shifts the body indices
        world.create_body(small_body());

        let player = entities.create(&mut world, small_body());
        let entity = entities.get(player);

        assert_eq!(player.id(), 0);
        assert_eq!(entity.body.index(), 1);
        assert_eq!(entity.animation, None);
        assert_eq!(world.body(entity.body).entity_id, Some(0));
        assert_eq!(entities.find_by_body(entity.body), Some(player));
    }

    #[test]
    fn test_destroy_frees_both_slots() {
        let mut world = PhysicsWorld::default();
        let mut entities = EntityRegistry::new();

        let a = entities.create(&mut world, small_body());
        let b = entities.create(&mut world, small_body());
        let a_body = entities.get(a).body;

        entities.destroy(&mut world, a);
        entities.destroy(&mut world, a);

        assert!(!world.is_body_active(a_body));
        assert!(entities.try_get(a).is_err());
        assert_eq!(entities.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);

        let c = entities.create(&mut world, small_body());
        assert_eq!(c, a);
        assert_eq!(entities.get(c).body, a_body);
        assert_eq!(entities.count(), 2);
    }

    #[test]
    fn test_retire_orphans_after_callback_kill() {
        let mut world = PhysicsWorld::default();
        let mut entities = EntityRegistry::new();

        entities.create(
            &mut world,
            small_body()
                .with_layers(CollisionLayers::PROJECTILE, CollisionLayers::ENEMY)
                .on_hit(|_, other, _| other.is_active = false),
        );
        let enemy = entities.create(
            &mut world,
            small_body().with_layers(CollisionLayers::ENEMY, CollisionLayers::TERRAIN),
        );

        world.update(1.0 / 60.0);

        assert_eq!(entities.retire_orphans(&world), 1);
        assert!(matches!(entities.try_get(enemy), Err(EntityError::Inactive(1))));
        assert_eq!(entities.retire_orphans(&world), 0);
    }

    #[test]
    fn test_animation_handle_is_game_data() {
        let mut world = PhysicsWorld::default();
        let mut entities = EntityRegistry::new();

        let id = entities.create(&mut world, small_body());
        entities.get_mut(id).animation = Some(3);

        assert_eq!(entities.get(id).animation, Some(3));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_unknown_entity_is_fatal() {
        let entities = EntityRegistry::new();
        let _ = entities.get(EntityId(2));
    }
}
