//! Headless platformer level
//!
//! Runs a scripted session of a small single-screen level: a player that
//! walks and jumps, enemies that spawn at the top corners and patrol until
//! they drop into the fire pit, and a periodic status line in the log.
//!
//! Pass a `.toml` or `.ron` physics config path as the first argument to
//! override the default platformer tuning.

use std::cell::Cell;
use std::rc::Rc;

use platform_physics::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TICK: f32 = 1.0 / 60.0;
const RUN_TICKS: u32 = 60 * 20;

const RENDER_WIDTH: f32 = 640.0;
const RENDER_HEIGHT: f32 = 360.0;

const SPEED_PLAYER: f32 = 300.0;
const JUMP_VELOCITY: f32 = 700.0;
const SPEED_ENEMY_LARGE: f32 = 200.0;
const SPEED_ENEMY_SMALL: f32 = 400.0;

/// Anything that falls this far below the screen is gone for good
const KILL_PLANE: f32 = -200.0;

/// Level geometry as (center, size, layer)
fn level_layout() -> Vec<(Vec2, Vec2, CollisionLayers)> {
    let w = RENDER_WIDTH;
    let h = RENDER_HEIGHT;
    let terrain = CollisionLayers::TERRAIN;
    let passthrough = CollisionLayers::ENEMY_PASSTHROUGH;

    vec![
        // Ceiling and the two floor halves around the fire pit
        (Vec2::new(w * 0.5, h - 16.0), Vec2::new(w, 32.0), terrain),
        (Vec2::new(w * 0.25 - 16.0, 16.0), Vec2::new(w * 0.5 - 32.0, 48.0), terrain),
        (Vec2::new(w * 0.75 + 16.0, 16.0), Vec2::new(w * 0.5 - 32.0, 48.0), terrain),
        // Side walls
        (Vec2::new(16.0, h * 0.5 - 3.0 * 32.0), Vec2::new(32.0, h), terrain),
        (Vec2::new(w - 16.0, h * 0.5 - 3.0 * 32.0), Vec2::new(32.0, h), terrain),
        // Upper platforms
        (Vec2::new(32.0 + 64.0, h - 32.0 * 3.0 - 16.0), Vec2::new(128.0, 32.0), terrain),
        (Vec2::new(w - 32.0 - 64.0, h - 32.0 * 3.0 - 16.0), Vec2::new(128.0, 32.0), terrain),
        (Vec2::new(w * 0.5, h - 32.0 * 3.0 - 16.0), Vec2::new(192.0, 32.0), terrain),
        // Middle shelf
        (Vec2::new(w * 0.5, 32.0 * 3.0 + 24.0), Vec2::new(448.0, 32.0), terrain),
        // Enemy entrances
        (Vec2::new(16.0, h - 64.0), Vec2::new(32.0, 64.0), passthrough),
        (Vec2::new(w - 16.0, h - 64.0), Vec2::new(32.0, 64.0), passthrough),
    ]
}

struct Level {
    world: PhysicsWorld,
    entities: EntityRegistry,
    player: EntityId,
    grounded: Rc<Cell<bool>>,
    hurt_ticks: Rc<Cell<u32>>,
    kills: Rc<Cell<u32>>,
    rng: StdRng,
    spawn_timer: f32,
}

impl Level {
    fn new(config: PhysicsConfig, seed: u64) -> Self {
        let mut world = PhysicsWorld::new(config);
        let mut entities = EntityRegistry::new();

        for (position, size, layer) in level_layout() {
            world.create_static_body(position, size, layer);
        }
        log::info!("Level built with {} static bodies", world.static_body_count());

        let grounded = Rc::new(Cell::new(false));
        let hurt_ticks = Rc::new(Cell::new(0));
        let kills = Rc::new(Cell::new(0));

        let player = {
            let grounded = Rc::clone(&grounded);
            let hurt_ticks = Rc::clone(&hurt_ticks);
            entities.create(
                &mut world,
                BodyDesc::new(Vec2::new(100.0, 200.0), Vec2::new(24.0, 24.0))
                    .with_layers(
                        CollisionLayers::PLAYER,
                        CollisionLayers::ENEMY | CollisionLayers::TERRAIN,
                    )
                    .on_hit(move |_, other, _| {
                        if other.collision_layer == CollisionLayers::ENEMY {
                            hurt_ticks.set(hurt_ticks.get() + 1);
                        }
                    })
                    .on_hit_static(move |_, _, hit| {
                        if hit.normal.y > 0.0 {
                            grounded.set(true);
                        }
                    }),
            )
        };

        // Fire pit between the two floor halves
        {
            let kills = Rc::clone(&kills);
            world.create_trigger(
                Vec2::new(RENDER_WIDTH * 0.5, 0.0),
                Vec2::new(64.0, 8.0),
                CollisionLayers::PROJECTILE,
                CollisionLayers::ENEMY | CollisionLayers::PLAYER,
                move |_, other, _| {
                    if other.collision_layer == CollisionLayers::ENEMY {
                        other.is_active = false;
                        kills.set(kills.get() + 1);
                    }
                },
            );
        }

        Self {
            world,
            entities,
            player,
            grounded,
            hurt_ticks,
            kills,
            rng: StdRng::seed_from_u64(seed),
            spawn_timer: 0.0,
        }
    }

    fn tick(&mut self, tick: u32) {
        self.handle_input(tick);
        self.world.update(TICK);

        let retired = self.entities.retire_orphans(&self.world);
        if retired > 0 {
            log::debug!("{retired} enemies burned");
        }

        self.cull_fallen();
        self.spawn_enemies();
    }

    /// Scripted stand-in for keyboard input: pace left and right, hop
    /// whenever standing on something
    fn handle_input(&mut self, tick: u32) {
        let handle = self.entities.get(self.player).body;
        let body = self.world.body_mut(handle);

        let velocity_x = if tick % 240 < 120 { SPEED_PLAYER } else { -SPEED_PLAYER };
        let mut velocity_y = body.velocity.y;

        if tick % 90 == 0 && self.grounded.get() {
            self.grounded.set(false);
            velocity_y = JUMP_VELOCITY;
        }

        body.velocity.x = velocity_x;
        body.velocity.y = velocity_y;
    }

    fn spawn_enemies(&mut self) {
        self.spawn_timer -= TICK;
        if self.spawn_timer > 0.0 {
            return;
        }
        self.spawn_timer = self.rng.gen_range(1.0..2.0);

        let is_flipped = self.rng.gen_bool(0.5);
        let is_small = self.rng.gen_bool(0.8);
        self.spawn_enemy(is_small, is_flipped);
    }

    fn spawn_enemy(&mut self, is_small: bool, is_flipped: bool) {
        let (speed, size) = if is_small {
            (SPEED_ENEMY_SMALL, Vec2::new(12.0, 12.0))
        } else {
            (SPEED_ENEMY_LARGE, Vec2::new(20.0, 20.0))
        };
        let spawn_x = if is_flipped { RENDER_WIDTH } else { 0.0 };
        let velocity = Vec2::new(if is_flipped { -speed } else { speed }, 0.0);

        let id = self.entities.create(
            &mut self.world,
            BodyDesc::new(Vec2::new(spawn_x, RENDER_HEIGHT - 64.0), size)
                .with_velocity(velocity)
                .with_layers(
                    CollisionLayers::ENEMY,
                    CollisionLayers::PLAYER | CollisionLayers::TERRAIN,
                )
                .on_hit_static(move |body, _, hit| {
                    // Turn around at walls
                    if hit.normal.x > 0.0 {
                        body.velocity.x = speed;
                    }
                    if hit.normal.x < 0.0 {
                        body.velocity.x = -speed;
                    }
                }),
        );

        log::debug!(
            "Spawned {} enemy {} heading {}",
            if is_small { "small" } else { "large" },
            id.id(),
            if is_flipped { "left" } else { "right" }
        );
    }

    fn cull_fallen(&mut self) {
        let fallen: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(id, entity)| {
                *id != self.player && self.world.body(entity.body).aabb.position.y < KILL_PLANE
            })
            .map(|(id, _)| id)
            .collect();

        for id in fallen {
            log::debug!("Enemy {} fell out of the level", id.id());
            self.entities.destroy(&mut self.world, id);
        }
    }

    fn report(&self, tick: u32) {
        let player = self.world.body(self.entities.get(self.player).body);
        let enemies = self
            .entities
            .iter()
            .filter(|(id, _)| *id != self.player)
            .count();

        log::info!(
            "t={:>5.2}s player=({:.1}, {:.1}) grounded={} enemies={} burned={} hurt_ticks={}",
            tick as f32 * TICK,
            player.aabb.position.x,
            player.aabb.position.y,
            self.grounded.get(),
            enemies,
            self.kills.get(),
            self.hurt_ticks.get()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    platform_physics::foundation::logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics config from {path}");
            PhysicsConfig::load_from_file(&path)?
        }
        None => PhysicsConfig::platformer(),
    };

    let mut level = Level::new(config, 0x5EED);

    for tick in 0..RUN_TICKS {
        level.tick(tick);
        if tick % 60 == 0 {
            level.report(tick);
        }
    }
    level.report(RUN_TICKS);

    log::info!(
        "Finished: {} body slots, {} entity slots",
        level.world.body_count(),
        level.entities.count()
    );

    Ok(())
}
