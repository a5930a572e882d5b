//! Hit tests
//!
//! Everything is a circle except laser beams, which are long and thin and
//! get a box test instead.

use glam::Vec2;

use super::state::{Body, Bullet};
use crate::consts::{LASER_HALF_LENGTH, LASER_HALF_WIDTH};

/// Strict circle overlap: touching edges do not count
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    crate::distance(a_pos, b_pos) < a_radius + b_radius
}

/// Circle overlap between two bodies
#[inline]
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    circles_overlap(a.pos, a.radius, b.pos, b.radius)
}

/// Axis-aligned beam test: the beam is `LASER_HALF_WIDTH` wide and
/// `LASER_HALF_LENGTH` tall on each side of its position, grown by the
/// target's radius.
#[inline]
pub fn beam_overlaps(beam_pos: Vec2, target: &Body) -> bool {
    (beam_pos.x - target.pos.x).abs() < target.radius + LASER_HALF_WIDTH
        && (beam_pos.y - target.pos.y).abs() < target.radius + LASER_HALF_LENGTH
}

/// Whether a bullet strikes a target this tick
pub fn bullet_hits(bullet: &Bullet, target: &Body) -> bool {
    if bullet.piercing {
        beam_overlaps(bullet.body.pos, target)
    } else {
        bodies_overlap(&bullet.body, target)
    }
}

/// Whether a point lies outside `[-margin_x, w + margin_x] x [-margin_y, h + margin_y]`
#[inline]
pub fn outside_bounds(pos: Vec2, bounds: Vec2, margin_x: f32, margin_y: f32) -> bool {
    pos.x < -margin_x || pos.x > bounds.x + margin_x || pos.y < -margin_y || pos.y > bounds.y + margin_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityId, ShotStyle};

    fn body(x: f32, y: f32, r: f32) -> Body {
        Body::new(EntityId(1), Vec2::new(x, y), Vec2::ZERO, r)
    }

    fn bullet(x: f32, y: f32, piercing: bool) -> Bullet {
        Bullet {
            body: body(x, y, 4.0),
            owner: Some(EntityId(9)),
            style: if piercing { ShotStyle::Laser } else { ShotStyle::Spread },
            damage: 10,
            piercing,
        }
    }

    #[test]
    fn test_circle_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_beam_reaches_further_vertically() {
        let target = body(100.0, 100.0, 20.0);
        // 55 units above: outside a circle test (4 + 20) but inside the beam (20 + 40)
        assert!(!bodies_overlap(&bullet(100.0, 45.0, false).body, &target));
        assert!(bullet_hits(&bullet(100.0, 45.0, true), &target));
        // Beam is narrow horizontally
        assert!(!bullet_hits(&bullet(126.0, 100.0, true), &target));
        assert!(bullet_hits(&bullet(124.0, 100.0, true), &target));
    }

    #[test]
    fn test_outside_bounds() {
        let bounds = Vec2::new(800.0, 600.0);
        assert!(!outside_bounds(Vec2::new(0.0, -50.0), bounds, 0.0, 50.0));
        assert!(outside_bounds(Vec2::new(0.0, -51.0), bounds, 0.0, 50.0));
        assert!(outside_bounds(Vec2::new(-0.1, 300.0), bounds, 0.0, 50.0));
        assert!(outside_bounds(Vec2::new(400.0, 651.0), bounds, 0.0, 50.0));
    }
}
