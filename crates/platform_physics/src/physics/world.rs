//! Physics world: body storage and the per-tick update
//!
//! The world owns two slot pools, one for dynamic bodies and one for static
//! level geometry. Both are iterated in index order, which makes every tick
//! deterministic: when two static bodies are hit at the same time of impact,
//! the one created first wins.
//!
//! An update runs in two passes:
//!
//! 1. Every active body is integrated. Non-kinematic bodies are swept
//!    against static geometry, clipped at the earliest contact, slid along
//!    that surface for the rest of the move and pushed out of anything they
//!    already overlap.
//! 2. With all positions final, every body is tested for overlap against
//!    every other body whose layer it reacts to, and its `on_hit` callback is
//!    told about it. This pass never moves anything.
//!
//! Callbacks may deactivate bodies (their own or the other one). The update
//! re-checks activity before every test, and slots are only reused on the
//! next `create_body`, so nothing is overwritten mid-tick.

use crate::config::PhysicsConfig;
use crate::foundation::collections::SlotPool;
use crate::foundation::logging::fatal;
use crate::foundation::math::{sign, Vec2};
use crate::physics::body::{Body, BodyDesc, BodyHandle, StaticBody, StaticBodyHandle};
use crate::physics::collision::{minkowski_difference, ray_intersect_aabb, Aabb, Hit};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::PhysicsError;

/// Owns every body and static body of one simulation
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: SlotPool<Body>,
    static_bodies: SlotPool<StaticBody>,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(config: PhysicsConfig) -> Self {
        log::debug!(
            "Creating physics world (gravity: {:?}, terminal velocity: {:?})",
            config.gravity,
            config.terminal_velocity
        );

        Self {
            bodies: SlotPool::with_capacity(config.initial_body_capacity),
            static_bodies: SlotPool::with_capacity(config.initial_static_capacity),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Mutable configuration; changes apply from the next update
    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Create a dynamic body, reusing the first destroyed slot if any
    pub fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let reused = self.bodies.next_index() < self.bodies.len();

        let index = match self.bodies.insert(desc.into_body()) {
            Ok(index) => index,
            Err(error) => fatal(PhysicsError::from(error)),
        };

        if reused {
            log::debug!("Created body {index} in reused slot");
        } else {
            log::debug!("Created body {index}");
        }

        BodyHandle(index)
    }

    /// Create a trigger: a kinematic, stationary body that only reports
    /// overlaps through `on_hit`
    pub fn create_trigger(
        &mut self,
        position: Vec2,
        size: Vec2,
        collision_layer: CollisionLayers,
        collision_mask: CollisionLayers,
        on_hit: impl Fn(&mut Body, &mut Body, Hit) + 'static,
    ) -> BodyHandle {
        self.create_body(
            BodyDesc::new(position, size)
                .with_layers(collision_layer, collision_mask)
                .kinematic()
                .on_hit(on_hit),
        )
    }

    /// Add a piece of static level geometry
    pub fn create_static_body(
        &mut self,
        position: Vec2,
        size: Vec2,
        collision_layer: CollisionLayers,
    ) -> StaticBodyHandle {
        let static_body = StaticBody {
            aabb: Aabb::from_size(position, size),
            collision_layer,
        };

        match self.static_bodies.insert(static_body) {
            Ok(index) => StaticBodyHandle(index),
            Err(error) => fatal(PhysicsError::from(error)),
        }
    }

    /// Look up an active body
    pub fn try_body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        match self.bodies.get(handle.0) {
            Some(body) if body.is_active => Ok(body),
            Some(_) => Err(PhysicsError::InactiveBody(handle.0)),
            None => Err(PhysicsError::BodyOutOfRange {
                index: handle.0,
                len: self.bodies.len(),
            }),
        }
    }

    /// Look up an active body for modification
    pub fn try_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        let len = self.bodies.len();
        match self.bodies.get_mut(handle.0) {
            Some(body) if body.is_active => Ok(body),
            Some(_) => Err(PhysicsError::InactiveBody(handle.0)),
            None => Err(PhysicsError::BodyOutOfRange { index: handle.0, len }),
        }
    }

    /// Active body behind `handle`
    ///
    /// # Panics
    ///
    /// If the handle is out of range or the body was destroyed.
    #[track_caller]
    pub fn body(&self, handle: BodyHandle) -> &Body {
        match self.try_body(handle) {
            Ok(body) => body,
            Err(error) => fatal(error),
        }
    }

    /// Active body behind `handle`, mutably
    ///
    /// # Panics
    ///
    /// If the handle is out of range or the body was destroyed.
    #[track_caller]
    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut Body {
        match self.try_body_mut(handle) {
            Ok(body) => body,
            Err(error) => fatal(error),
        }
    }

    /// Whether `handle` currently refers to a live body
    pub fn is_body_active(&self, handle: BodyHandle) -> bool {
        self.bodies.get(handle.0).is_some_and(|body| body.is_active)
    }

    /// Look up a static body
    pub fn try_static_body(&self, handle: StaticBodyHandle) -> Result<&StaticBody, PhysicsError> {
        self.static_bodies
            .get(handle.0)
            .ok_or(PhysicsError::StaticBodyOutOfRange {
                index: handle.0,
                len: self.static_bodies.len(),
            })
    }

    /// Static body behind `handle`
    ///
    /// # Panics
    ///
    /// If the handle is out of range.
    #[track_caller]
    pub fn static_body(&self, handle: StaticBodyHandle) -> &StaticBody {
        match self.try_static_body(handle) {
            Ok(static_body) => static_body,
            Err(error) => fatal(error),
        }
    }

    /// Deactivate a body. Destroying an already inactive body does nothing.
    ///
    /// # Panics
    ///
    /// If the handle is out of range.
    #[track_caller]
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        let len = self.bodies.len();
        let Some(body) = self.bodies.get_mut(handle.0) else {
            fatal(PhysicsError::BodyOutOfRange { index: handle.0, len });
        };

        if body.is_active {
            body.is_active = false;
            log::debug!("Destroyed body {}", handle.0);
        }
    }

    /// Number of body slots, including destroyed ones
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of static bodies
    pub fn static_body_count(&self) -> usize {
        self.static_bodies.len()
    }

    /// Active bodies in slot order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.is_active)
            .map(|(index, body)| (BodyHandle(index), body))
    }

    /// Static bodies in creation order
    pub fn static_bodies(&self) -> impl Iterator<Item = (StaticBodyHandle, &StaticBody)> + '_ {
        self.static_bodies
            .iter()
            .enumerate()
            .map(|(index, static_body)| (StaticBodyHandle(index), static_body))
    }

    /// Remove all static geometry, e.g. when switching levels
    pub fn reset(&mut self) {
        log::debug!("Clearing {} static bodies", self.static_bodies.len());
        self.static_bodies.clear();
    }

    /// Advance the simulation by one tick of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        for index in 0..self.bodies.len() {
            self.step_body(index, dt);
        }

        self.dispatch_body_hits();
    }

    fn step_body(&mut self, index: usize, dt: f32) {
        let Some(body) = self.bodies.get_mut(index) else {
            return;
        };
        if !body.is_active {
            return;
        }

        if !body.is_kinematic {
            body.velocity += self.config.gravity * dt;
        }
        body.velocity += body.acceleration * dt;
        if let Some(terminal_velocity) = self.config.terminal_velocity {
            if !body.is_kinematic {
                body.velocity.y = body.velocity.y.max(-terminal_velocity);
            }
        }

        let displacement = body.velocity * dt;

        if body.is_kinematic {
            body.aabb.position += displacement;
            return;
        }

        let epsilon = self.config.contact_epsilon;
        let hit = sweep_static_bodies(body, &self.static_bodies, displacement);
        if !hit.is_hit {
            body.aabb.position += displacement;
        } else {
            resolve_static_hit(body, &self.static_bodies, hit, epsilon);

            // Carry the rest of the move along the surface
            let mut remaining = displacement * (1.0 - hit.time);
            if hit.normal.x != 0.0 {
                remaining.x = 0.0;
            }
            if hit.normal.y != 0.0 {
                remaining.y = 0.0;
            }

            if body.is_active && remaining != Vec2::zeros() {
                let slide = sweep_static_bodies(body, &self.static_bodies, remaining);
                if slide.is_hit {
                    let slide = Hit {
                        time: hit.time + (1.0 - hit.time) * slide.time,
                        ..slide
                    };
                    resolve_static_hit(body, &self.static_bodies, slide, epsilon);
                } else {
                    body.aabb.position += remaining;
                }
            }
        }

        push_out_of_static_bodies(body, &self.static_bodies);
    }

    fn dispatch_body_hits(&mut self) {
        let count = self.bodies.len();

        for index in 0..count {
            for other_index in 0..count {
                let Some((body, other)) = self.bodies.get_pair_mut(index, other_index) else {
                    continue;
                };

                if !body.is_active {
                    break;
                }
                if !other.is_active
                    || !CollisionLayers::reacts_to(body.collision_mask, other.collision_layer)
                {
                    continue;
                }
                let Some(on_hit) = body.on_hit.clone() else {
                    continue;
                };
                if !body.aabb.intersects(&other.aabb) {
                    continue;
                }

                let push = minkowski_difference(&other.aabb, &body.aabb).penetration_vector();
                let hit = Hit {
                    other_id: other_index,
                    time: 0.0,
                    position: body.aabb.position + push,
                    normal: overlap_normal(&body.aabb, &other.aabb, push),
                    is_hit: true,
                };

                on_hit(body, other, hit);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Outward normal of `body` for an overlap with `other`. Boxes that only
/// touch have no penetration, so the side they touch on decides.
fn overlap_normal(body: &Aabb, other: &Aabb, push: Vec2) -> Vec2 {
    if push != Vec2::zeros() {
        return Vec2::new(sign(push.x), sign(push.y));
    }

    let offset = body.position - other.position;
    let overlap = body.half_size + other.half_size - offset.abs();
    if overlap.x <= overlap.y {
        Vec2::new(sign(offset.x), 0.0)
    } else {
        Vec2::new(0.0, sign(offset.y))
    }
}

/// Earliest hit along `displacement` against every static body in the mask.
///
/// The sweep casts a ray from the origin through the Minkowski difference of
/// each static body and the mover, then translates the contact back into
/// world space. Strict `<` keeps the first static body on equal times; the
/// miss result starts at `time = 1`, so contacts at the very end of the move
/// are ignored.
fn sweep_static_bodies(body: &Body, static_bodies: &SlotPool<StaticBody>, displacement: Vec2) -> Hit {
    let mut result = Hit::miss();

    for (index, static_body) in static_bodies.iter().enumerate() {
        if !CollisionLayers::reacts_to(body.collision_mask, static_body.collision_layer) {
            continue;
        }

        let swept = minkowski_difference(&static_body.aabb, &body.aabb);
        let hit = ray_intersect_aabb(Vec2::zeros(), displacement, &swept);

        if hit.is_hit && hit.time < result.time {
            result = Hit {
                other_id: index,
                position: body.aabb.position + hit.position,
                ..hit
            };
        }
    }

    result
}

/// Clip the body at the contact and stop motion into the surface
fn resolve_static_hit(body: &mut Body, static_bodies: &SlotPool<StaticBody>, hit: Hit, epsilon: f32) {
    body.aabb.position = hit.position + hit.normal * epsilon;

    if hit.normal.x != 0.0 {
        body.velocity.x = 0.0;
    }
    if hit.normal.y != 0.0 {
        body.velocity.y = 0.0;
    }

    log::trace!(
        "Body hit static {} at t={:.4} normal=({}, {})",
        hit.other_id,
        hit.time,
        hit.normal.x,
        hit.normal.y
    );

    if let (Some(on_hit_static), Some(static_body)) =
        (body.on_hit_static.clone(), static_bodies.get(hit.other_id))
    {
        on_hit_static(body, static_body, hit);
    }
}

/// Separate a body from static geometry it already overlaps (spawned inside a
/// wall, moved by game code, ...). Touching without depth is left alone.
fn push_out_of_static_bodies(body: &mut Body, static_bodies: &SlotPool<StaticBody>) {
    for (index, static_body) in static_bodies.iter().enumerate() {
        if !body.is_active {
            return;
        }
        if !CollisionLayers::reacts_to(body.collision_mask, static_body.collision_layer) {
            continue;
        }

        let overlap = minkowski_difference(&static_body.aabb, &body.aabb);
        if !overlap.contains_point(Vec2::zeros()) {
            continue;
        }

        let push = overlap.penetration_vector();
        if push == Vec2::zeros() {
            continue;
        }

        body.aabb.position += push;

        let normal = Vec2::new(sign(push.x), sign(push.y));
        // Only cancel motion heading into the surface
        if body.velocity.x * normal.x < 0.0 {
            body.velocity.x = 0.0;
        }
        if body.velocity.y * normal.y < 0.0 {
            body.velocity.y = 0.0;
        }

        log::trace!("Pushed body out of static {index} by ({}, {})", push.x, push.y);

        if let Some(on_hit_static) = body.on_hit_static.clone() {
            let hit = Hit {
                other_id: index,
                time: 0.0,
                position: body.aabb.position,
                normal,
                is_hit: true,
            };
            on_hit_static(body, static_body, hit);
        }
    }
}
