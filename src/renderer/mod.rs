//! WebGPU rendering module
//!
//! The world is tessellated on the CPU into a colored triangle list each
//! frame and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::build_scene;
pub use vertex::Vertex;
