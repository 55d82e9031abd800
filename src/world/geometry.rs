//! Scene geometry: quads, meshes and the scene itself
//!
//! Pure data structures with minimal behavior.
//! All rendering logic lives in the rasterizer.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Triangle, Vec3};

fn default_color() -> Color {
    Color::WHITE
}

/// Four coplanar corners in winding order, split along diagonal AC
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub d: Vec3,
    #[serde(default = "default_color")]
    pub color: Color,
}

impl Quad {
    pub fn new(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        Self { a, b, c, d, color: Color::WHITE }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// (a, b, c) and (a, c, d), both keeping the quad's winding
    pub fn to_triangles(&self) -> [Triangle; 2] {
        [
            Triangle::new(self.a, self.b, self.c).with_color(self.color),
            Triangle::new(self.a, self.c, self.d).with_color(self.color),
        ]
    }
}

/// A static mesh placed at `origin`. Vertices are relative to the origin,
/// which is also the pivot for animated spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    #[serde(default)]
    pub origin: Vec3,
    #[serde(default)]
    pub quads: Vec<Quad>,
    #[serde(default)]
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(name: &str, origin: Vec3) -> Self {
        Self {
            name: name.to_string(),
            origin,
            quads: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn from_quads(name: &str, origin: Vec3, quads: Vec<Quad>) -> Self {
        Self { quads, ..Self::new(name, origin) }
    }

    pub fn from_triangles(name: &str, origin: Vec3, triangles: Vec<Triangle>) -> Self {
        Self { triangles, ..Self::new(name, origin) }
    }

    /// Axis-aligned cube with outward-facing winding on every side
    pub fn cube(name: &str, origin: Vec3, half_size: f32, color: Color) -> Self {
        let h = half_size;
        let v = |x: f32, y: f32, z: f32| Vec3::new(x * h, y * h, z * h);

        let quads = vec![
            // -Z (faces a camera at the origin)
            Quad::new(v(-1.0, -1.0, -1.0), v(-1.0, 1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, -1.0, -1.0)),
            // +Z
            Quad::new(v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0), v(-1.0, -1.0, 1.0)),
            // +X
            Quad::new(v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0)),
            // -X
            Quad::new(v(-1.0, -1.0, 1.0), v(-1.0, 1.0, 1.0), v(-1.0, 1.0, -1.0), v(-1.0, -1.0, -1.0)),
            // +Y
            Quad::new(v(-1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, -1.0)),
            // -Y
            Quad::new(v(-1.0, -1.0, 1.0), v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, -1.0, 1.0)),
        ]
        .into_iter()
        .map(|q| q.with_color(color))
        .collect();

        Self::from_quads(name, origin, quads)
    }

    /// Every triangle in model space: quads first (two each), then loose triangles
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut out = Vec::with_capacity(self.triangle_count());
        for quad in &self.quads {
            out.extend(quad.to_triangles());
        }
        out.extend_from_slice(&self.triangles);
        out
    }

    pub fn triangle_count(&self) -> usize {
        self.quads.len() * 2 + self.triangles.len()
    }
}

/// Camera position plus meshes. Read-only while a frame renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub camera_position: Vec3,
    pub meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(camera_position: Vec3, meshes: Vec<Mesh>) -> Self {
        Self { camera_position, meshes }
    }

    /// A single white cube three units in front of the camera
    pub fn demo() -> Self {
        Self::new(
            Vec3::ZERO,
            vec![Mesh::cube("cube", Vec3::new(0.0, 0.0, 3.0), 1.0, Color::WHITE)],
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}
