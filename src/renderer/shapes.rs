//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(3);
    push_tri(&mut vertices, a, b, c, color);
    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(origin: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    let mut vertices = Vec::with_capacity(6);
    push_tri(&mut vertices, Vec2::new(x0, y0), Vec2::new(x1, y0), Vec2::new(x0, y1), color);
    push_tri(&mut vertices, Vec2::new(x1, y0), Vec2::new(x1, y1), Vec2::new(x0, y1), color);
    vertices
}

/// Diamond with its corners `radius` from the center
pub fn diamond(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    polygon(
        center,
        &[
            Vec2::new(0.0, -radius),
            Vec2::new(radius, 0.0),
            Vec2::new(0.0, radius),
            Vec2::new(-radius, 0.0),
        ],
        color,
    )
}

/// Fan-triangulated polygon around `center`. Outline points are offsets from
/// the center and must be star-shaped with respect to it.
pub fn polygon(center: Vec2, outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let n = outline.len();
    let mut vertices = Vec::with_capacity(n * 3);
    for i in 0..n {
        let a = center + outline[i];
        let b = center + outline[(i + 1) % n];
        push_tri(&mut vertices, center, a, b, color);
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let p1 = center + radius * Vec2::new(theta1.cos(), theta1.sin());
        let p2 = center + radius * Vec2::new(theta2.cos(), theta2.sin());
        push_tri(&mut vertices, center, p1, p2, color);
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + inner_radius * dir1;
        let outer1 = center + outer_radius * dir1;
        let inner2 = center + inner_radius * dir2;
        let outer2 = center + outer_radius * dir2;

        // Two triangles per segment
        push_tri(&mut vertices, inner1, outer1, inner2, color);
        push_tri(&mut vertices, inner2, outer1, outer2, color);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let c = [1.0; 4];
        assert_eq!(circle(Vec2::ZERO, 5.0, c, 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 4.0, 5.0, c, 12).len(), 72);
        assert_eq!(rect(Vec2::ZERO, Vec2::ONE, c).len(), 6);
        assert_eq!(diamond(Vec2::ZERO, 3.0, c).len(), 12);
    }

    #[test]
    fn test_circle_stays_on_radius() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, [1.0; 4], 16);
        for v in verts {
            let d = Vec2::from(v.position).distance(Vec2::new(10.0, 10.0));
            assert!(d <= 5.0 + 1e-4);
        }
    }
}
