//! Neon Thunder - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Per-tick simulation (entities, spawning, combat, wave progression)
//! - `renderer`: WebGPU rendering of the world snapshot
//! - `platform`: Browser/native input translation
//! - `persistence`: Key-value storage for high score and settings
//! - `tuning`: Data-driven game balance
//! - `app`: Screen flow around a run (menu, briefing, results)

pub mod app;
pub mod audio;
pub mod briefing;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate, one tick per display refresh
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame the scheduler will account for (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Player ship defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Ships start this far above the bottom edge
    pub const PLAYER_SPAWN_INSET: f32 = 100.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 4.0;
    /// Muzzle offset above the ship for blaster and spread shots
    pub const MUZZLE_OFFSET: f32 = 10.0;
    /// Laser beams start further up the nose
    pub const LASER_MUZZLE_OFFSET: f32 = 20.0;
    pub const BLASTER_DAMAGE: i32 = 20;
    pub const SPREAD_DAMAGE: i32 = 15;
    pub const LASER_DAMAGE: i32 = 30;
    /// Horizontal velocity of the three spread pellets
    pub const SPREAD_FAN: [f32; 3] = [-0.3, 0.0, 0.3];
    /// Laser half-extents used by the beam hit test (added to target radius)
    pub const LASER_HALF_WIDTH: f32 = 5.0;
    pub const LASER_HALF_LENGTH: f32 = 40.0;

    /// Enemy defaults
    pub const ENEMY_SPAWN_Y: f32 = -30.0;
    pub const ENEMY_MIN_RADIUS: f32 = 15.0;
    pub const ENEMY_RADIUS_JITTER: f32 = 10.0;
    /// Keep spawns this far from the side edges
    pub const ENEMY_SPAWN_INSET: f32 = 20.0;

    /// Powerup defaults
    pub const POWERUP_RADIUS: f32 = 15.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    pub const HEALTH_PICKUP_AMOUNT: i32 = 30;

    /// Contact damage a ship takes from ramming an enemy
    pub const CONTACT_DAMAGE: i32 = 20;
    /// Score for each destroyed enemy
    pub const KILL_SCORE: u64 = 100;

    /// Off-screen culling margins
    pub const BULLET_MARGIN: f32 = 50.0;
    pub const ENEMY_MARGIN: f32 = 50.0;
    pub const POWERUP_MARGIN: f32 = 20.0;

    /// Particle bursts
    pub const HIT_SPARKS: usize = 3;
    pub const EXPLOSION_PARTICLES: usize = 15;
    pub const PICKUP_PARTICLES: usize = 10;
    pub const DAMAGE_FLASH_PARTICLES: usize = 10;
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 3.0;
    pub const PARTICLE_MIN_LIFETIME: f32 = 30.0;
    pub const PARTICLE_LIFETIME_JITTER: f32 = 20.0;
    /// Lifetime at which a particle is drawn fully opaque
    pub const PARTICLE_FADE_TICKS: f32 = 40.0;

    /// Spawn cadence: one attempt every max(FLOOR, BASE - wave * STEP) ticks
    pub const SPAWN_INTERVAL_BASE: u64 = 60;
    pub const SPAWN_INTERVAL_STEP: u64 = 5;
    pub const SPAWN_INTERVAL_FLOOR: u64 = 20;

    /// Campaign wave-complete screen duration (2 seconds)
    pub const LEVEL_COMPLETE_TICKS: u32 = 2 * TICK_RATE;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector from `from` toward `to`, or `None` if the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Clamp a point into the rectangle `[inset, size - inset]` on both axes.
///
/// Degenerate rectangles (smaller than twice the inset) collapse to their center.
#[inline]
pub fn clamp_to_rect(pos: Vec2, size: Vec2, inset: f32) -> Vec2 {
    let clamp_axis = |v: f32, extent: f32| {
        if extent < inset * 2.0 {
            extent / 2.0
        } else {
            v.clamp(inset, extent - inset)
        }
    };
    Vec2::new(clamp_axis(pos.x, size.x), clamp_axis(pos.y, size.y))
}
