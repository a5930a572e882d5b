//! Enemy, powerup, and particle generation
//!
//! Enemy stats and spawn cadence scale with the wave number; everything
//! random draws from the world's seeded RNG.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{EnemyVariant, Enemy, EntityId, Particle, ParticleTint, PowerupType, World, Body};
use crate::consts::*;
use crate::tuning::Tuning;

/// Ticks between spawn attempts, shrinking with the wave but never below the floor
pub fn spawn_interval(wave: u32) -> u64 {
    SPAWN_INTERVAL_BASE
        .saturating_sub(wave as u64 * SPAWN_INTERVAL_STEP)
        .max(SPAWN_INTERVAL_FLOOR)
}

/// Whether this tick is a spawn tick
pub fn spawn_due(tick: u64, wave: u32) -> bool {
    tick % spawn_interval(wave) == 0
}

/// Health of a freshly spawned enemy
pub fn enemy_health(wave: u32) -> i32 {
    20 + wave as i32 * 10
}

/// Straight-down speed of a Basic enemy
pub fn basic_speed(tuning: &Tuning, wave: u32) -> f32 {
    tuning.enemy_speed_base + wave as f32 * 0.5
}

/// Homing speed of a Chaser enemy
pub fn chaser_speed(tuning: &Tuning, wave: u32) -> f32 {
    tuning.enemy_speed_base + wave as f32 * 0.2
}

/// Roll a new enemy just above the top edge
pub fn roll_enemy<R: Rng>(rng: &mut R, id: EntityId, wave: u32, screen_width: f32, tuning: &Tuning) -> Enemy {
    let variant = if rng.random_bool(tuning.chaser_chance) {
        EnemyVariant::Chaser
    } else {
        EnemyVariant::Basic
    };
    let span = (screen_width - ENEMY_SPAWN_INSET * 2.0).max(0.0);
    let x = ENEMY_SPAWN_INSET + rng.random::<f32>() * span;
    let radius = ENEMY_MIN_RADIUS + rng.random::<f32>() * ENEMY_RADIUS_JITTER;
    // Chasers start falling like Basics and pick up their heading next tick
    let vel = Vec2::new(0.0, basic_speed(tuning, wave));

    Enemy::new(id, variant, Vec2::new(x, ENEMY_SPAWN_Y), vel, radius, enemy_health(wave))
}

/// Spawn one enemy for the current wave
pub fn spawn_enemy(world: &mut World) -> EntityId {
    let id = world.next_entity_id();
    let enemy = roll_enemy(&mut world.rng, id, world.current_wave, world.bounds.x, &world.tuning);
    log::debug!("Spawned {:?} {:?} at x={:.0}", enemy.variant, id, enemy.body.pos.x);
    world.enemies.push(enemy);
    id
}

/// Weighted powerup draw: 40% spread, 40% laser, 20% health
pub fn roll_powerup_kind<R: Rng>(rng: &mut R) -> PowerupType {
    let r: f32 = rng.random();
    if r < 0.4 {
        PowerupType::WeaponSpread
    } else if r < 0.8 {
        PowerupType::WeaponLaser
    } else {
        PowerupType::Health
    }
}

/// Drop a powerup at a position
pub fn spawn_powerup(world: &mut World, pos: Vec2) -> EntityId {
    let kind = roll_powerup_kind(&mut world.rng);
    log::debug!("Dropped {:?} powerup", kind);
    world.insert_powerup(kind, pos)
}

/// Roll the drop chance for a destroyed enemy
pub fn maybe_drop_powerup(world: &mut World, pos: Vec2) -> Option<EntityId> {
    if world.rng.random_bool(world.tuning.powerup_drop_chance) {
        Some(spawn_powerup(world, pos))
    } else {
        None
    }
}

/// Emit a radial burst. Bursts past the particle cap are truncated.
pub fn spawn_particles(world: &mut World, pos: Vec2, count: usize, tint: ParticleTint) {
    let room = world.max_particles.saturating_sub(world.particles.len());
    for _ in 0..count.min(room) {
        let angle = world.rng.random::<f32>() * TAU;
        let speed = world.rng.random::<f32>() * PARTICLE_MAX_SPEED;
        let radius = world.rng.random::<f32>() * PARTICLE_MAX_RADIUS;
        let lifetime = PARTICLE_MIN_LIFETIME + world.rng.random::<f32>() * PARTICLE_LIFETIME_JITTER;
        let id = world.next_entity_id();
        world.particles.push(Particle {
            body: Body::new(id, pos, Vec2::new(angle.cos(), angle.sin()) * speed, radius),
            tint,
            lifetime,
        });
    }
}
