//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// `0xRRGGBB` to an opaque RGBA color
    pub const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    /// Same color with a different alpha
    pub const fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
        [c[0], c[1], c[2], a]
    }

    pub const BACKGROUND: [f32; 4] = hex(0x0f172a);
    pub const STAR: [f32; 4] = hex(0xffffff);
    pub const WHITE: [f32; 4] = hex(0xffffff);

    pub const PLAYER_1: [f32; 4] = hex(0x00ffff);
    pub const PLAYER_2: [f32; 4] = hex(0xff00ff);

    pub const ENEMY_BASIC: [f32; 4] = hex(0xff4444);
    pub const ENEMY_CHASER: [f32; 4] = hex(0xffaa00);
    pub const HEALTH_BAR_BACK: [f32; 4] = hex(0xff0000);
    pub const HEALTH_BAR_FILL: [f32; 4] = hex(0x008000);

    pub const BULLET_P1: [f32; 4] = hex(0xccffff);
    pub const BULLET_P2: [f32; 4] = hex(0xffccff);
    pub const BULLET_SPREAD: [f32; 4] = hex(0xfacc15);
    pub const BULLET_LASER: [f32; 4] = hex(0x38bdf8);

    pub const POWERUP_SPREAD: [f32; 4] = hex(0xfbbf24);
    pub const POWERUP_LASER: [f32; 4] = hex(0x0ea5e9);
    pub const POWERUP_HEALTH: [f32; 4] = hex(0x22c55e);

    pub const EXPLOSION: [f32; 4] = hex(0xffdd00);
}
