//! Fixed timestep simulation tick
//!
//! Advances one wave by exactly one step. Pools are updated in a fixed
//! order: ships (and their guns), bullets, powerups, enemies, hit
//! resolution, particles, stars.

use glam::Vec2;
use rand::Rng;

use super::collision::{bodies_overlap, outside_bounds};
use super::combat::{self, Shooter};
use super::progression::{self, RunPhase, WaveCheck};
use super::spawn::{chaser_speed, spawn_due, spawn_enemy, spawn_particles};
use super::state::{EnemyVariant, GameEvent, GameMode, ParticleTint, PlayerSlot, World};
use crate::consts::*;

/// Steering for a single tick, indexed by player slot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub intents: [Vec2; 2],
}

impl TickInput {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { intents: [p1, p2] }
    }

    /// Intent for a slot, clamped to the unit square
    pub fn intent(&self, slot: PlayerSlot) -> Vec2 {
        self.intents[slot.index()].clamp(Vec2::NEG_ONE, Vec2::ONE)
    }
}

/// Advance the world by one fixed timestep and report the phase it ends in.
///
/// A world that has already left `InWave` is not touched.
pub fn tick(world: &mut World, input: &TickInput) -> RunPhase {
    let phase = progression::phase_of(world);
    if phase != RunPhase::InWave {
        return phase;
    }

    world.tick_counter += 1;

    if progression::check_wave(world) == WaveCheck::Complete {
        return progression::phase_of(world);
    }

    move_players(world, input);
    advance_bullets(world);
    advance_powerups(world);
    advance_enemies(world);
    combat::resolve(world);
    advance_particles(world);
    advance_stars(world);

    progression::phase_of(world)
}

fn move_players(world: &mut World, input: &TickInput) {
    let speed = world.tuning.player_speed;
    let bounds = world.bounds;
    for player in &mut world.players {
        let intent = input.intent(player.slot);
        player.body.vel = intent * speed;
        player.body.pos = crate::clamp_to_rect(player.body.pos + player.body.vel, bounds, player.body.radius);
    }

    // Guns are on a shared clock; there is no trigger
    if world.tick_counter % world.tuning.fire_interval_ticks == 0 {
        let shooters: Vec<Shooter> = world.players.iter().map(Shooter::from).collect();
        for shooter in shooters {
            combat::fire_weapon(world, shooter);
        }
    }
}

fn advance_bullets(world: &mut World) {
    let speed = world.tuning.bullet_speed;
    let bounds = world.bounds;
    world.bullets.retain_mut(|b| {
        b.body.pos += b.body.vel * speed;
        !outside_bounds(b.body.pos, bounds, 0.0, BULLET_MARGIN)
    });
}

fn advance_powerups(world: &mut World) {
    let floor = world.bounds.y + POWERUP_MARGIN;
    for i in (0..world.powerups.len()).rev() {
        let powerup = &mut world.powerups[i];
        powerup.body.pos += powerup.body.vel;
        if powerup.body.pos.y > floor {
            world.powerups.remove(i);
            continue;
        }

        let powerup = world.powerups[i].clone();
        let Some(player) = world.players.iter_mut().find(|p| bodies_overlap(&p.body, &powerup.body)) else {
            continue;
        };
        combat::apply_powerup(player, powerup.kind);
        let player_id = player.body.id;
        log::debug!("{:?} collected {:?}", player_id, powerup.kind);

        spawn_particles(world, powerup.body.pos, PICKUP_PARTICLES, ParticleTint::Pickup(powerup.kind));
        world.events.push(GameEvent::PowerupCollected {
            player: player_id,
            kind: powerup.kind,
        });
        world.powerups.remove(i);
    }
}

fn advance_enemies(world: &mut World) {
    if spawn_due(world.tick_counter, world.current_wave) {
        spawn_enemy(world);
    }

    let homing_speed = chaser_speed(&world.tuning, world.current_wave);
    // Chasers all home in on the first ship in the roster
    let target = world.players.first().map(|p| p.body.pos);
    let floor = world.bounds.y + ENEMY_MARGIN;

    world.enemies.retain_mut(|e| {
        e.body.pos += e.body.vel;
        if e.variant == EnemyVariant::Chaser {
            if let Some(dir) = target.and_then(|t| crate::direction_to(e.body.pos, t)) {
                e.body.vel = dir * homing_speed;
            }
        }
        e.body.pos.y <= floor
    });
}

fn advance_particles(world: &mut World) {
    world.particles.retain_mut(|p| {
        p.body.pos += p.body.vel;
        p.lifetime -= 1.0;
        p.lifetime > 0.0
    });
}

fn advance_stars(world: &mut World) {
    let bonus = match world.mode {
        GameMode::Endless => world.current_wave as f32 * 0.1,
        GameMode::Campaign => 0.0,
    };
    let (w, h) = (world.bounds.x, world.bounds.y);
    for star in &mut world.stars {
        star.pos.y += star.speed + bonus;
        if star.pos.y > h {
            star.pos.y = 0.0;
            star.pos.x = world.rng.random::<f32>() * w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PlayerCount, PowerupType, WeaponType, WorldConfig};

    fn world(mode: GameMode, players: PlayerCount) -> World {
        World::new(WorldConfig::new(mode, players, Vec2::new(800.0, 600.0), 12345))
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut w = world(GameMode::Campaign, PlayerCount::One);
        let start = w.players[0].body.pos;
        tick(&mut w, &TickInput::new(Vec2::new(1.0, 0.0), Vec2::ZERO));
        assert_eq!(w.players[0].body.pos, start + Vec2::new(5.0, 0.0));

        // Oversized intents are clamped; walls stop the ship at its radius
        for _ in 0..100 {
            tick(&mut w, &TickInput::new(Vec2::new(3.0, 3.0), Vec2::ZERO));
        }
        assert_eq!(w.players[0].body.pos, Vec2::new(780.0, 580.0));
    }

    #[test]
    fn test_auto_fire_cadence() {
        let mut w = world(GameMode::Campaign, PlayerCount::Two);
        for _ in 0..9 {
            tick(&mut w, &idle());
        }
        assert!(w.bullets.is_empty());
        tick(&mut w, &idle());
        assert_eq!(w.bullets.len(), 2);
        let shots = w.events.iter().filter(|e| matches!(e, GameEvent::Shot { .. })).count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_bullets_leave_by_top_margin() {
        let mut w = world(GameMode::Campaign, PlayerCount::One);
        for _ in 0..10 {
            tick(&mut w, &idle());
        }
        assert_eq!(w.bullets.len(), 1);
        // Fired at y = 490, travels 12/tick, culled once above y = -50
        for _ in 0..45 {
            tick(&mut w, &idle());
        }
        assert!(w.bullets.iter().all(|b| b.body.pos.y >= -50.0));
        assert!(w.bullets.len() <= 5);
    }

    #[test]
    fn test_powerup_pickup_applies_once() {
        let mut w = world(GameMode::Campaign, PlayerCount::Two);
        let pos = w.players[0].body.pos - Vec2::new(0.0, 2.0);
        w.insert_powerup(PowerupType::WeaponLaser, pos);

        tick(&mut w, &idle());
        assert!(w.powerups.is_empty());
        assert_eq!(w.players[0].weapon, WeaponType::Laser);
        assert_eq!(w.players[1].weapon, WeaponType::Blaster);
        assert_eq!(
            w.events
                .iter()
                .filter(|e| matches!(e, GameEvent::PowerupCollected { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_powerup_falls_off_screen() {
        let mut w = world(GameMode::Campaign, PlayerCount::One);
        w.insert_powerup(PowerupType::Health, Vec2::new(10.0, 619.0));
        tick(&mut w, &idle());
        assert!(w.powerups.is_empty());
        assert_eq!(w.players[0].health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_chaser_homes_on_first_ship() {
        let mut w = world(GameMode::Campaign, PlayerCount::Two);
        let target = w.players[0].body.pos;
        w.insert_enemy(EnemyVariant::Chaser, Vec2::new(target.x, 100.0), Vec2::new(0.0, 1.0), 20.0, 30);

        tick(&mut w, &idle());
        let chaser = &w.enemies[0];
        let expected = chaser_speed(&w.tuning, 1);
        assert!((chaser.body.vel.length() - expected).abs() < 1e-4);
        assert!(chaser.body.vel.y > 0.0);
        assert!(chaser.body.vel.x.abs() < 1e-4);
    }

    #[test]
    fn test_chaser_retargets_surviving_ship() {
        let mut w = world(GameMode::Campaign, PlayerCount::Two);
        let lost = w.players.remove(0);
        assert_eq!(w.players[0].slot, PlayerSlot::Two);
        let survivor = w.players[0].body.pos;
        w.insert_enemy(EnemyVariant::Chaser, Vec2::new(lost.body.pos.x, 100.0), Vec2::new(0.0, 1.0), 20.0, 30);

        tick(&mut w, &idle());
        let chaser = &w.enemies[0];
        let heading = (survivor - chaser.body.pos).normalize() * chaser_speed(&w.tuning, 1);
        assert!((chaser.body.vel - heading).length() < 1e-4);
        assert!(chaser.body.vel.x > 0.0);
    }

    #[test]
    fn test_enemies_past_bottom_removed_without_score() {
        let mut w = world(GameMode::Campaign, PlayerCount::One);
        w.insert_enemy(EnemyVariant::Basic, Vec2::new(20.0, 648.0), Vec2::new(0.0, 3.0), 15.0, 30);
        tick(&mut w, &idle());
        assert!(w.enemies.is_empty());
        assert_eq!(w.score, 0);
        assert_eq!(w.kills_this_wave, 0);
    }

    #[test]
    fn test_campaign_quota_stops_tick() {
        let mut w = world(GameMode::Campaign, PlayerCount::One);
        w.kills_this_wave = 20;
        let pos = w.players[0].body.pos;
        assert_eq!(tick(&mut w, &TickInput::new(Vec2::X, Vec2::ZERO)), RunPhase::WaveComplete);
        assert!(w.is_wave_complete);
        assert_eq!(w.players[0].body.pos, pos);

        // Further ticks are no-ops
        let counter = w.tick_counter;
        assert_eq!(tick(&mut w, &idle()), RunPhase::WaveComplete);
        assert_eq!(w.tick_counter, counter);
    }

    #[test]
    fn test_endless_keeps_running() {
        let mut w = world(GameMode::Endless, PlayerCount::One);
        w.kills_this_wave = 20;
        assert_eq!(tick(&mut w, &idle()), RunPhase::InWave);
        assert_eq!(w.current_wave, 2);
        assert!(!w.is_wave_complete);
    }

    #[test]
    fn test_particles_expire() {
        let mut w = world(GameMode::Campaign, PlayerCount::One);
        spawn_particles(&mut w, Vec2::new(100.0, 100.0), 5, ParticleTint::Explosion);
        for _ in 0..50 {
            tick(&mut w, &idle());
        }
        assert!(w.particles.iter().all(|p| p.tint != ParticleTint::Explosion));
    }

    #[test]
    fn test_stars_wrap() {
        let mut w = world(GameMode::Endless, PlayerCount::One);
        for _ in 0..600 {
            tick(&mut w, &idle());
            if w.players.is_empty() {
                break;
            }
        }
        assert!(w.stars.iter().all(|s| (0.0..=600.0 + 3.0).contains(&s.pos.y)));
        assert_eq!(w.stars.len(), 100);
    }

    #[test]
    fn test_determinism() {
        let mut a = world(GameMode::Endless, PlayerCount::Two);
        let mut b = world(GameMode::Endless, PlayerCount::Two);
        let input = TickInput::new(Vec2::new(0.5, -1.0), Vec2::new(-1.0, 0.0));
        for _ in 0..500 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.tick_counter, b.tick_counter);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.players.len(), b.players.len());
        assert_eq!(a.particles.len(), b.particles.len());
    }
}
