//! Flat-shaded software rasterizer
//!
//! Features:
//! - Per-frame spin about a single axis
//! - Backface culling by winding order
//! - Point light with inverse-square falloff, one intensity per face
//! - Painter's algorithm (no depth buffer)
//! - Scanline fill with optional wireframe overlay

mod math;
mod types;
mod render;

pub use math::*;
pub use types::*;
pub use render::*;

/// Window dimensions
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;
