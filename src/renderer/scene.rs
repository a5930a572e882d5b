//! World snapshot to triangles
//!
//! Draw order, back to front: stars, particles, powerups, bullets, enemies,
//! ships.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{PARTICLE_FADE_TICKS, PLAYER_MAX_HEALTH};
use crate::sim::state::{
    Bullet, Enemy, EnemyVariant, Particle, ParticleTint, Player, PlayerSlot, Powerup, PowerupType, ShotStyle, World,
};

const STAR_SEGMENTS: u32 = 6;
const SMALL_SEGMENTS: u32 = 8;
const BULLET_SEGMENTS: u32 = 10;
const SHIELD_SEGMENTS: u32 = 32;
/// Health at or below which the shield ring disappears
const SHIELD_MIN_HEALTH: i32 = 20;

/// Ship body color for a slot
pub fn player_color(slot: PlayerSlot) -> [f32; 4] {
    match slot {
        PlayerSlot::One => colors::PLAYER_1,
        PlayerSlot::Two => colors::PLAYER_2,
    }
}

pub fn shot_color(style: ShotStyle) -> [f32; 4] {
    match style {
        ShotStyle::Blaster(PlayerSlot::One) => colors::BULLET_P1,
        ShotStyle::Blaster(PlayerSlot::Two) => colors::BULLET_P2,
        ShotStyle::Spread => colors::BULLET_SPREAD,
        ShotStyle::Laser => colors::BULLET_LASER,
    }
}

pub fn powerup_color(kind: PowerupType) -> [f32; 4] {
    match kind {
        PowerupType::Health => colors::POWERUP_HEALTH,
        PowerupType::WeaponSpread => colors::POWERUP_SPREAD,
        PowerupType::WeaponLaser => colors::POWERUP_LASER,
    }
}

/// Resolve a particle tint to RGBA
pub fn tint_color(tint: ParticleTint) -> [f32; 4] {
    match tint {
        ParticleTint::Explosion => colors::EXPLOSION,
        ParticleTint::Flash => colors::WHITE,
        ParticleTint::Shot(style) => shot_color(style),
        ParticleTint::Pickup(kind) => powerup_color(kind),
    }
}

fn particle(out: &mut Vec<Vertex>, p: &Particle) {
    let alpha = (p.lifetime / PARTICLE_FADE_TICKS).clamp(0.0, 1.0);
    let color = colors::with_alpha(tint_color(p.tint), alpha);
    out.extend(shapes::circle(p.body.pos, p.body.radius, color, SMALL_SEGMENTS));
}

fn powerup(out: &mut Vec<Vertex>, p: &Powerup) {
    let color = powerup_color(p.kind);
    out.extend(shapes::diamond(p.body.pos, p.body.radius, color));
    // Dark core stands in for the pickup's letter
    out.extend(shapes::diamond(p.body.pos, p.body.radius * 0.35, colors::BACKGROUND));
}

fn bullet(out: &mut Vec<Vertex>, b: &Bullet) {
    let color = shot_color(b.style);
    if b.piercing {
        // Beam is drawn well past the hit box so it reads as a streak
        let origin = b.body.pos + Vec2::new(-2.0, -40.0);
        out.extend(shapes::rect(origin, Vec2::new(4.0, 60.0), color));
    } else {
        out.extend(shapes::circle(b.body.pos, b.body.radius, color, BULLET_SEGMENTS));
    }
}

fn enemy(out: &mut Vec<Vertex>, e: &Enemy) {
    let (pos, r) = (e.body.pos, e.body.radius);
    let color = match e.variant {
        EnemyVariant::Basic => colors::ENEMY_BASIC,
        EnemyVariant::Chaser => colors::ENEMY_CHASER,
    };
    out.extend(shapes::triangle(
        pos + Vec2::new(0.0, r),
        pos + Vec2::new(-r, -r),
        pos + Vec2::new(r, -r),
        color,
    ));

    let bar = pos + Vec2::new(-10.0, -r - 10.0);
    out.extend(shapes::rect(bar, Vec2::new(20.0, 3.0), colors::HEALTH_BAR_BACK));
    let fill = 20.0 * e.health_ratio();
    if fill > 0.0 {
        out.extend(shapes::rect(bar, Vec2::new(fill, 3.0), colors::HEALTH_BAR_FILL));
    }
}

/// Forward-swept interceptor
fn interceptor(out: &mut Vec<Vertex>, pos: Vec2, r: f32, color: [f32; 4]) {
    let outline = [
        Vec2::new(0.0, -r),
        Vec2::new(r * 0.2, -r * 0.2),
        Vec2::new(r, -r * 0.1),
        Vec2::new(r * 0.4, r * 0.5),
        Vec2::new(r * 0.2, r * 0.8),
        Vec2::new(0.0, r * 0.6),
        Vec2::new(-r * 0.2, r * 0.8),
        Vec2::new(-r * 0.4, r * 0.5),
        Vec2::new(-r, -r * 0.1),
        Vec2::new(-r * 0.2, -r * 0.2),
    ];
    out.extend(shapes::polygon(pos, &outline, color));
    out.extend(shapes::triangle(
        pos + Vec2::new(0.0, -r * 0.5),
        pos + Vec2::new(r * 0.1, -r * 0.2),
        pos + Vec2::new(-r * 0.1, -r * 0.2),
        colors::WHITE,
    ));
}

/// Twin-boom heavy fighter
fn twin_boom(out: &mut Vec<Vertex>, pos: Vec2, r: f32, color: [f32; 4]) {
    let pod = [
        Vec2::new(0.0, -r * 0.8),
        Vec2::new(r * 0.3, 0.0),
        Vec2::new(r * 0.3, r * 0.5),
        Vec2::new(-r * 0.3, r * 0.5),
        Vec2::new(-r * 0.3, 0.0),
    ];
    out.extend(shapes::polygon(pos, &pod, color));
    out.extend(shapes::rect(pos + Vec2::new(-r, -r * 0.2), Vec2::new(r * 0.4, r * 1.2), color));
    out.extend(shapes::rect(pos + Vec2::new(r * 0.6, -r * 0.2), Vec2::new(r * 0.4, r * 1.2), color));
    out.extend(shapes::rect(pos + Vec2::new(-r, 0.0), Vec2::new(r * 2.0, r * 0.2), color));
}

fn player(out: &mut Vec<Vertex>, p: &Player) {
    let (pos, r) = (p.body.pos, p.body.radius);
    let color = player_color(p.slot);
    match p.slot {
        PlayerSlot::One => interceptor(out, pos, r, color),
        PlayerSlot::Two => twin_boom(out, pos, r, color),
    }

    if p.health > SHIELD_MIN_HEALTH {
        let alpha = p.health as f32 / (PLAYER_MAX_HEALTH as f32 * 2.0);
        let shield = colors::with_alpha(colors::WHITE, alpha);
        out.extend(shapes::ring(pos, r * 1.5 - 0.5, r * 1.5 + 0.5, shield, SHIELD_SEGMENTS));
    }
}

/// Tessellate the whole world in screen pixels
pub fn build_scene(world: &World) -> Vec<Vertex> {
    let mut out = Vec::new();

    for star in &world.stars {
        let color = colors::with_alpha(colors::STAR, star.alpha);
        out.extend(shapes::circle(star.pos, star.size, color, STAR_SEGMENTS));
    }
    for p in &world.particles {
        particle(&mut out, p);
    }
    for p in &world.powerups {
        powerup(&mut out, p);
    }
    for b in &world.bullets {
        bullet(&mut out, b);
    }
    for e in &world.enemies {
        enemy(&mut out, e);
    }
    for p in &world.players {
        player(&mut out, p);
    }

    out
}
