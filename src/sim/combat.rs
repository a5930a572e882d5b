//! Weapons, pickups, and hit resolution
//!
//! Runs after movement each tick. Pools are walked back-to-front so removals
//! never shift an index that is still to be visited.

use glam::Vec2;

use super::collision::{bodies_overlap, bullet_hits};
use super::spawn::{maybe_drop_powerup, spawn_particles};
use super::state::{
    Body, Bullet, EntityId, GameEvent, ParticleTint, Player, PlayerSlot, PowerupType, ShotStyle, WeaponType, World,
};
use crate::consts::*;

/// What a weapon needs to know about the ship firing it
#[derive(Debug, Clone, Copy)]
pub struct Shooter {
    pub id: EntityId,
    pub slot: PlayerSlot,
    pub pos: Vec2,
    pub weapon: WeaponType,
}

impl From<&Player> for Shooter {
    fn from(p: &Player) -> Self {
        Self {
            id: p.body.id,
            slot: p.slot,
            pos: p.body.pos,
            weapon: p.weapon,
        }
    }
}

/// Fire one volley from a ship's current weapon
pub fn fire_weapon(world: &mut World, shooter: Shooter) {
    world.events.push(GameEvent::Shot {
        player: shooter.id,
        weapon: shooter.weapon,
    });

    match shooter.weapon {
        WeaponType::Blaster => {
            let pos = shooter.pos - Vec2::new(0.0, MUZZLE_OFFSET);
            push_bullet(world, shooter.id, pos, Vec2::new(0.0, -1.0), ShotStyle::Blaster(shooter.slot), BLASTER_DAMAGE, false);
        }
        WeaponType::Spread => {
            let pos = shooter.pos - Vec2::new(0.0, MUZZLE_OFFSET);
            for vx in SPREAD_FAN {
                push_bullet(world, shooter.id, pos, Vec2::new(vx, -1.0), ShotStyle::Spread, SPREAD_DAMAGE, false);
            }
        }
        WeaponType::Laser => {
            let pos = shooter.pos - Vec2::new(0.0, LASER_MUZZLE_OFFSET);
            push_bullet(world, shooter.id, pos, Vec2::new(0.0, -2.0), ShotStyle::Laser, LASER_DAMAGE, true);
        }
    }
}

fn push_bullet(world: &mut World, owner: EntityId, pos: Vec2, vel: Vec2, style: ShotStyle, damage: i32, piercing: bool) {
    let id = world.next_entity_id();
    world.bullets.push(Bullet {
        body: Body::new(id, pos, vel, BULLET_RADIUS),
        owner: Some(owner),
        style,
        damage,
        piercing,
    });
}

/// Apply a pickup to a ship. Weapon pickups replace the current weapon for good.
pub fn apply_powerup(player: &mut Player, kind: PowerupType) {
    match kind {
        PowerupType::Health => player.heal(HEALTH_PICKUP_AMOUNT),
        PowerupType::WeaponSpread => player.weapon = WeaponType::Spread,
        PowerupType::WeaponLaser => player.weapon = WeaponType::Laser,
    }
}

/// Remove the enemy at `index` and run its death effects: kill credit,
/// explosion, powerup roll, score.
pub fn destroy_enemy(world: &mut World, index: usize) {
    let enemy = world.enemies.remove(index);
    let pos = enemy.body.pos;

    world.kills_this_wave += 1;
    spawn_particles(world, pos, EXPLOSION_PARTICLES, ParticleTint::Explosion);
    world.events.push(GameEvent::EnemyDestroyed {
        enemy: enemy.body.id,
        pos,
    });
    maybe_drop_powerup(world, pos);
    world.score += KILL_SCORE;
}

/// Player shots against enemies. Each bullet damages at most one enemy per
/// tick; non-piercing bullets are spent on contact.
pub fn resolve_bullet_hits(world: &mut World) {
    for b_idx in (0..world.bullets.len()).rev() {
        if world.bullets[b_idx].owner.is_none() {
            continue;
        }

        let mut hit = false;
        for e_idx in (0..world.enemies.len()).rev() {
            if !bullet_hits(&world.bullets[b_idx], &world.enemies[e_idx].body) {
                continue;
            }

            let bullet = &world.bullets[b_idx];
            let (damage, style) = (bullet.damage, bullet.style);
            let enemy = &mut world.enemies[e_idx];
            let destroyed = enemy.take_damage(damage);
            let pos = enemy.body.pos;

            spawn_particles(world, pos, HIT_SPARKS, ParticleTint::Shot(style));
            hit = true;

            if destroyed {
                destroy_enemy(world, e_idx);
            }
            break;
        }

        if hit && !world.bullets[b_idx].piercing {
            world.bullets.remove(b_idx);
        }
    }
}

/// Ship-enemy contact. Ramming always destroys the enemy and costs the ship
/// `CONTACT_DAMAGE`. Returns true if the last ship was lost.
pub fn resolve_rams(world: &mut World) -> bool {
    for p_idx in (0..world.players.len()).rev() {
        for e_idx in (0..world.enemies.len()).rev() {
            if !bodies_overlap(&world.players[p_idx].body, &world.enemies[e_idx].body) {
                continue;
            }

            world.enemies[e_idx].health = 0;
            destroy_enemy(world, e_idx);

            let player = &mut world.players[p_idx];
            let destroyed = player.take_damage(CONTACT_DAMAGE);
            let (id, pos, health) = (player.body.id, player.body.pos, player.health);
            spawn_particles(world, pos, DAMAGE_FLASH_PARTICLES, ParticleTint::Flash);
            world.events.push(GameEvent::PlayerHit { player: id, health });

            if destroyed {
                world.players.remove(p_idx);
                world.events.push(GameEvent::PlayerDestroyed { player: id });
                log::info!("Ship {:?} destroyed, {} remaining", id, world.players.len());
                break;
            }
        }
    }

    if world.players.is_empty() && !world.is_over {
        world.is_over = true;
        log::info!("All ships lost at wave {} with score {}", world.current_wave, world.score);
        return true;
    }
    false
}

/// Full hit resolution for one tick
pub fn resolve(world: &mut World) {
    resolve_bullet_hits(world);
    resolve_rams(world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyVariant, GameMode, PlayerCount, WorldConfig};

    fn world(players: PlayerCount) -> World {
        World::new(WorldConfig::new(GameMode::Campaign, players, Vec2::new(800.0, 600.0), 1))
    }

    fn shooter(world: &World, weapon: WeaponType) -> Shooter {
        let mut s = Shooter::from(&world.players[0]);
        s.weapon = weapon;
        s
    }

    #[test]
    fn test_blaster_volley() {
        let mut w = world(PlayerCount::One);
        let s = shooter(&w, WeaponType::Blaster);
        fire_weapon(&mut w, s);
        assert_eq!(w.bullets.len(), 1);
        let b = &w.bullets[0];
        assert_eq!(b.body.vel, Vec2::new(0.0, -1.0));
        assert_eq!(b.damage, 20);
        assert!(!b.piercing);
        assert_eq!(b.owner, Some(s.id));
        assert_eq!(b.body.pos, s.pos - Vec2::new(0.0, 10.0));
        assert_eq!(w.events, vec![GameEvent::Shot { player: s.id, weapon: WeaponType::Blaster }]);
    }

    #[test]
    fn test_laser_volley() {
        let mut w = world(PlayerCount::One);
        let s = shooter(&w, WeaponType::Laser);
        fire_weapon(&mut w, s);
        assert_eq!(w.bullets.len(), 1);
        assert_eq!(w.bullets[0].body.vel, Vec2::new(0.0, -2.0));
        assert_eq!(w.bullets[0].damage, 30);
        assert!(w.bullets[0].piercing);
    }

    #[test]
    fn test_health_pickup_idempotent_at_max() {
        let mut w = world(PlayerCount::One);
        let player = &mut w.players[0];
        apply_powerup(player, PowerupType::Health);
        assert_eq!(player.health, player.max_health);

        player.health = 50;
        apply_powerup(player, PowerupType::Health);
        assert_eq!(player.health, 80);
    }

    #[test]
    fn test_weapon_pickup_overwrites() {
        let mut w = world(PlayerCount::One);
        let player = &mut w.players[0];
        apply_powerup(player, PowerupType::WeaponLaser);
        assert_eq!(player.weapon, WeaponType::Laser);
        apply_powerup(player, PowerupType::WeaponSpread);
        assert_eq!(player.weapon, WeaponType::Spread);
    }

    #[test]
    fn test_bullet_spent_on_hit_and_one_enemy_per_bullet() {
        let mut w = world(PlayerCount::One);
        // Two enemies stacked on the same spot
        w.insert_enemy(EnemyVariant::Basic, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0, 100);
        w.insert_enemy(EnemyVariant::Basic, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0, 100);
        let s = Shooter {
            pos: Vec2::new(100.0, 110.0),
            ..shooter(&w, WeaponType::Blaster)
        };
        fire_weapon(&mut w, s);

        resolve_bullet_hits(&mut w);
        assert!(w.bullets.is_empty());
        let healths: Vec<i32> = w.enemies.iter().map(|e| e.health).collect();
        assert_eq!(healths.iter().filter(|&&h| h == 80).count(), 1);
        assert_eq!(healths.iter().filter(|&&h| h == 100).count(), 1);
        assert_eq!(w.particles.len(), HIT_SPARKS);
    }

    #[test]
    fn test_piercing_bullet_survives_hit() {
        let mut w = world(PlayerCount::One);
        w.insert_enemy(EnemyVariant::Basic, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0, 100);
        let s = Shooter {
            pos: Vec2::new(100.0, 140.0),
            ..shooter(&w, WeaponType::Laser)
        };
        fire_weapon(&mut w, s);
        resolve_bullet_hits(&mut w);
        assert_eq!(w.bullets.len(), 1);
        assert_eq!(w.enemies[0].health, 70);
    }

    #[test]
    fn test_kill_credits_score_and_counter() {
        let mut w = world(PlayerCount::One);
        w.insert_enemy(EnemyVariant::Chaser, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0, 20);
        let s = Shooter {
            pos: Vec2::new(100.0, 110.0),
            ..shooter(&w, WeaponType::Blaster)
        };
        fire_weapon(&mut w, s);
        resolve_bullet_hits(&mut w);

        assert!(w.enemies.is_empty());
        assert_eq!(w.score, KILL_SCORE);
        assert_eq!(w.kills_this_wave, 1);
        assert!(w.particles.len() >= HIT_SPARKS + EXPLOSION_PARTICLES);
        assert!(w.events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
    }

    #[test]
    fn test_ram_kills_enemy_regardless_of_health() {
        let mut w = world(PlayerCount::One);
        let pos = w.players[0].body.pos;
        w.insert_enemy(EnemyVariant::Basic, pos, Vec2::ZERO, 20.0, 10_000);

        assert!(!resolve_rams(&mut w));
        assert!(w.enemies.is_empty());
        assert_eq!(w.players[0].health, 80);
        assert_eq!(w.kills_this_wave, 1);
        assert!(!w.is_over);
    }

    #[test]
    fn test_last_ship_lost_ends_run() {
        let mut w = world(PlayerCount::One);
        w.players[0].health = 20;
        let pos = w.players[0].body.pos;
        w.insert_enemy(EnemyVariant::Basic, pos, Vec2::ZERO, 20.0, 30);

        assert!(resolve_rams(&mut w));
        assert!(w.players.is_empty());
        assert!(w.is_over);
    }

    #[test]
    fn test_one_of_two_ships_lost_keeps_running() {
        let mut w = world(PlayerCount::Two);
        w.players[1].health = 10;
        let pos = w.players[1].body.pos;
        w.insert_enemy(EnemyVariant::Basic, pos, Vec2::ZERO, 20.0, 30);

        assert!(!resolve_rams(&mut w));
        assert_eq!(w.players.len(), 1);
        assert_eq!(w.players[0].slot, PlayerSlot::One);
        assert!(!w.is_over);
    }
}
