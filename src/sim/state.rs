//! World state and entity types
//!
//! One struct per entity kind, each owning a [`Body`] with the attributes
//! every kind shares. The [`World`] holds the typed pools plus the run's
//! scalar counters and is advanced in place by the tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Stable entity identity, never reused within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Campaign has a finish line, endless scales forever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Campaign,
    Endless,
}

/// One or two ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerCount {
    #[default]
    One,
    Two,
}

impl PlayerCount {
    pub fn from_count(n: u8) -> Option<Self> {
        match n {
            1 => Some(PlayerCount::One),
            2 => Some(PlayerCount::Two),
            _ => None,
        }
    }

    pub fn get(self) -> usize {
        match self {
            PlayerCount::One => 1,
            PlayerCount::Two => 2,
        }
    }
}

/// Which seat a ship belongs to (controls, color, silhouette)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

/// Ship armament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    Blaster,
    Spread,
    Laser,
}

/// Enemy behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    /// Falls straight down at a wave-scaled speed
    Basic,
    /// Steers toward the first ship every tick
    Chaser,
}

/// Powerup effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupType {
    Health,
    WeaponSpread,
    WeaponLaser,
}

/// Visual style of a shot, doubling as its spark color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotStyle {
    Blaster(PlayerSlot),
    Spread,
    Laser,
}

/// Particle color family, resolved to RGBA by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    Explosion,
    /// White flash when a ship takes a hit
    Flash,
    Shot(ShotStyle),
    Pickup(PowerupType),
}

/// Attributes shared by every entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision and draw size, fixed at creation
    pub radius: f32,
}

impl Body {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { id, pos, vel, radius }
    }
}

/// Subtract damage, clamping at zero. Returns true when health is exhausted.
fn apply_damage(health: &mut i32, amount: i32) -> bool {
    *health = (*health - amount).max(0);
    *health == 0
}

/// A player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub slot: PlayerSlot,
    pub health: i32,
    pub max_health: i32,
    pub weapon: WeaponType,
}

impl Player {
    pub fn new(id: EntityId, slot: PlayerSlot, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, pos, Vec2::ZERO, PLAYER_RADIUS),
            slot,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            weapon: WeaponType::default(),
        }
    }

    /// Returns true if the ship is destroyed
    pub fn take_damage(&mut self, amount: i32) -> bool {
        apply_damage(&mut self.health, amount)
    }

    /// Restore health, never past the maximum
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
        debug_assert!(self.health <= self.max_health);
    }
}

/// A hostile ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub variant: EnemyVariant,
    pub health: i32,
    pub max_health: i32,
}

impl Enemy {
    pub fn new(id: EntityId, variant: EnemyVariant, pos: Vec2, vel: Vec2, radius: f32, health: i32) -> Self {
        Self {
            body: Body::new(id, pos, vel, radius),
            variant,
            health,
            max_health: health,
        }
    }

    /// Returns true if the enemy is destroyed
    pub fn take_damage(&mut self, amount: i32) -> bool {
        apply_damage(&mut self.health, amount)
    }

    /// Health fraction for the health bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            0.0
        } else {
            (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
        }
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    /// Firing ship; `None` would mark a hostile shot
    pub owner: Option<EntityId>,
    pub style: ShotStyle,
    pub damage: i32,
    /// Survives hits and is only removed by leaving the screen
    pub piercing: bool,
}

/// A short-lived visual speck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub tint: ParticleTint,
    /// Ticks until removal
    pub lifetime: f32,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub body: Body,
    pub kind: PowerupType,
}

impl Powerup {
    pub fn new(id: EntityId, kind: PowerupType, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, pos, Vec2::new(0.0, POWERUP_FALL_SPEED), POWERUP_RADIUS),
            kind,
        }
    }
}

/// Decorative background star
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub alpha: f32,
}

/// Things that happened during a tick, drained by the loop driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot { player: EntityId, weapon: WeaponType },
    EnemyDestroyed { enemy: EntityId, pos: Vec2 },
    PowerupCollected { player: EntityId, kind: PowerupType },
    PlayerHit { player: EntityId, health: i32 },
    PlayerDestroyed { player: EntityId },
    /// Endless mode rolled over to a new wave without pausing
    WaveAdvanced { wave: u32 },
}

/// Parameters for a fresh run's first wave
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub mode: GameMode,
    pub players: PlayerCount,
    /// Visible area in pixels, origin top-left, y down
    pub bounds: Vec2,
    pub seed: u64,
    pub tuning: Tuning,
    pub max_particles: usize,
    pub star_count: usize,
}

impl WorldConfig {
    pub fn new(mode: GameMode, players: PlayerCount, bounds: Vec2, seed: u64) -> Self {
        let settings = Settings::default();
        Self {
            mode,
            players,
            bounds,
            seed,
            tuning: Tuning::default(),
            max_particles: settings.max_particles(),
            star_count: settings.star_count(),
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.max_particles = settings.max_particles();
        self.star_count = settings.star_count();
        self
    }
}

/// The mutable snapshot of one wave
#[derive(Debug, Clone)]
pub struct World {
    pub mode: GameMode,
    pub tuning: Tuning,
    pub bounds: Vec2,

    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub powerups: Vec<Powerup>,
    pub stars: Vec<Star>,

    pub score: u64,
    /// 1-based wave number
    pub current_wave: u32,
    pub kills_this_wave: u32,
    /// Every ship is gone
    pub is_over: bool,
    /// Campaign quota met; the tick will not advance further
    pub is_wave_complete: bool,
    pub tick_counter: u64,

    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub max_particles: usize,
    star_count: usize,
    pub(crate) rng: Pcg32,
    next_id: u64,
}

impl World {
    /// Create wave 1 of a new run
    pub fn new(config: WorldConfig) -> Self {
        let mut world = Self {
            mode: config.mode,
            tuning: config.tuning,
            bounds: config.bounds,
            players: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            powerups: Vec::new(),
            stars: Vec::new(),
            score: 0,
            current_wave: 1,
            kills_this_wave: 0,
            is_over: false,
            is_wave_complete: false,
            tick_counter: 0,
            events: Vec::new(),
            max_particles: config.max_particles,
            star_count: config.star_count,
            rng: Pcg32::seed_from_u64(config.seed),
            next_id: 1,
        };

        let (w, h) = (world.bounds.x, world.bounds.y);
        let y = h - PLAYER_SPAWN_INSET;
        match config.players {
            PlayerCount::One => {
                let id = world.next_entity_id();
                world.players.push(Player::new(id, PlayerSlot::One, Vec2::new(w * 0.5, y)));
            }
            PlayerCount::Two => {
                let id = world.next_entity_id();
                world.players.push(Player::new(id, PlayerSlot::One, Vec2::new(w * 0.3, y)));
                let id = world.next_entity_id();
                world.players.push(Player::new(id, PlayerSlot::Two, Vec2::new(w * 0.7, y)));
            }
        }

        world.scatter_stars();
        world
    }

    /// Rebuild the snapshot for the following wave. Ships, score, RNG, and
    /// the id counter carry over; every other pool starts empty.
    pub fn begin_next_wave(&mut self) {
        for player in &mut self.players {
            player.body.vel = Vec2::ZERO;
        }
        self.enemies.clear();
        self.bullets.clear();
        self.particles.clear();
        self.powerups.clear();
        self.events.clear();

        self.current_wave += 1;
        self.kills_this_wave = 0;
        self.is_over = false;
        self.is_wave_complete = false;
        self.tick_counter = 0;
        self.scatter_stars();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a pre-built enemy, assigning it a fresh id
    pub fn insert_enemy(&mut self, variant: EnemyVariant, pos: Vec2, vel: Vec2, radius: f32, health: i32) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, variant, pos, vel, radius, health));
        id
    }

    /// Place a powerup at a position, assigning it a fresh id
    pub fn insert_powerup(&mut self, kind: PowerupType, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.powerups.push(Powerup::new(id, kind, pos));
        id
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.body.id == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.body.id == id)
    }

    /// Follow a resized viewport; ships are pulled back inside
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        for player in &mut self.players {
            player.body.pos = crate::clamp_to_rect(player.body.pos, bounds, player.body.radius);
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn scatter_stars(&mut self) {
        let (w, h) = (self.bounds.x, self.bounds.y);
        self.stars = (0..self.star_count)
            .map(|_| Star {
                pos: Vec2::new(self.rng.random::<f32>() * w, self.rng.random::<f32>() * h),
                speed: 0.5 + self.rng.random::<f32>() * 2.0,
                size: 1.0 + self.rng.random::<f32>() * 2.0,
                alpha: self.rng.random::<f32>(),
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(players: PlayerCount) -> WorldConfig {
        WorldConfig::new(GameMode::Campaign, players, Vec2::new(800.0, 600.0), 42)
    }

    #[test]
    fn test_new_world_places_ships() {
        let world = World::new(config(PlayerCount::Two));
        assert_eq!(world.players.len(), 2);
        assert_eq!(world.players[0].body.pos, Vec2::new(240.0, 500.0));
        assert_eq!(world.players[1].body.pos, Vec2::new(560.0, 500.0));
        assert!(world.players.iter().all(|p| p.weapon == WeaponType::Blaster));
        assert_eq!(world.stars.len(), 100);
        assert_eq!(world.current_wave, 1);
    }

    #[test]
    fn test_ids_unique_across_waves() {
        let mut world = World::new(config(PlayerCount::One));
        let first = world.insert_enemy(EnemyVariant::Basic, Vec2::ZERO, Vec2::ZERO, 20.0, 30);
        world.score = 700;
        world.players[0].weapon = WeaponType::Laser;

        world.begin_next_wave();
        let second = world.insert_enemy(EnemyVariant::Basic, Vec2::ZERO, Vec2::ZERO, 20.0, 30);
        assert!(second > first);
        assert_eq!(world.current_wave, 2);
        assert_eq!(world.score, 700);
        assert_eq!(world.players[0].weapon, WeaponType::Laser);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.kills_this_wave, 0);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut enemy = Enemy::new(EntityId(1), EnemyVariant::Basic, Vec2::ZERO, Vec2::ZERO, 20.0, 30);
        assert!(!enemy.take_damage(20));
        assert!(enemy.take_damage(20));
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut player = Player::new(EntityId(1), PlayerSlot::One, Vec2::ZERO);
        player.take_damage(10);
        player.heal(30);
        assert_eq!(player.health, PLAYER_MAX_HEALTH);
    }
}
