//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::{Mat4, Vec3};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale RGB by intensity (0.0-1.0), alpha untouched
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Per-channel product, treating 255 as 1.0
    pub fn modulate(self, other: Color) -> Self {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Self {
            r: mul(self.r, other.r),
            g: mul(self.g, other.g),
            b: mul(self.b, other.b),
            a: mul(self.a, other.a),
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A triangle in model or world space.
///
/// Vertices are ordered so that `cross(b - a, c - a)` points out of the
/// visible side. Every stage transforms the vertices in place and never
/// reorders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    #[serde(default = "default_color")]
    pub color: Color,
    /// Illumination computed by the lighting stage; never stored in files
    #[serde(skip, default = "default_intensity")]
    pub intensity: f32,
}

fn default_color() -> Color {
    Color::WHITE
}

fn default_intensity() -> f32 {
    1.0
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            a,
            b,
            c,
            color: Color::WHITE,
            intensity: 1.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Apply `f` to each vertex, keeping order
    pub fn map_vertices(self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self {
            a: f(self.a),
            b: f(self.b),
            c: f(self.c),
            ..self
        }
    }

    pub fn transformed(self, mat: &Mat4) -> Self {
        self.map_vertices(|v| mat.transform_point(v))
    }

    pub fn translated(self, offset: Vec3) -> Self {
        self.map_vertices(|v| v + offset)
    }

    /// Unit face normal, zero for degenerate triangles
    pub fn normal(&self) -> Vec3 {
        let line1 = self.b - self.a;
        let line2 = self.c - self.a;
        line1.cross(line2).normalize()
    }

    /// Midpoint of side AC (the shared diagonal when the triangle came from a quad)
    pub fn center_of_third_side(&self) -> Vec3 {
        self.a.midpoint(self.c)
    }
}

/// Screen-space triangle for one frame: x/y in pixels, z is reciprocal depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedTriangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Final fill color (base color already shaded)
    pub color: Color,
}

impl ProjectedTriangle {
    /// Mean of the three projected z values (larger is nearer)
    pub fn depth(&self) -> f32 {
        (self.a.z + self.b.z + self.c.z) / 3.0
    }

    /// Integer pixel coordinates, truncated toward zero
    pub fn screen_points(&self) -> [(i32, i32); 3] {
        [
            (self.a.x as i32, self.a.y as i32),
            (self.b.x as i32, self.b.y as i32),
            (self.c.x as i32, self.c.y as i32),
        ]
    }
}

/// Axis the scene spins about when animated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub fn rotation(self, angle: f32) -> Mat4 {
        match self {
            Axis::X => Mat4::rotation_x(angle),
            Axis::Y => Mat4::rotation_y(angle),
            Axis::Z => Mat4::rotation_z(angle),
        }
    }
}

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Projection scale (1.0 = 90 degree field of view)
    pub fov_factor: f32,
    /// Projected z is `near / depth`
    pub near: f32,
    /// Spin axis for animated frames
    pub spin_axis: Axis,
    /// Point light position (world space)
    pub light_position: Vec3,
    pub light_intensity: f32,
    /// Illumination is clamped to [min_illumination, max_illumination]
    pub min_illumination: f32,
    pub max_illumination: f32,
    /// Backface culling
    pub backface_cull: bool,
    /// Stroke triangle edges after filling
    pub wireframe: bool,
    pub wireframe_color: Color,
    pub background: Color,
    /// Tint multiplied into every triangle's color before shading
    pub base_color: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov_factor: 1.0,
            near: 0.1,
            spin_axis: Axis::Y,
            light_position: Vec3::new(0.0, -0.5, -2.0),
            light_intensity: 5.0,
            min_illumination: 0.1,
            max_illumination: 1.0,
            backface_cull: true,
            wireframe: true,
            wireframe_color: Color::WHITE,
            background: Color::BLACK,
            base_color: Color::WHITE,
        }
    }
}
