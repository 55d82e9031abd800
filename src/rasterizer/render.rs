//! Core rendering functions
//! Transform, cull, light, project, depth sort and scanline fill

use std::path::Path;
use tracing::debug;

use super::math::{Mat4, Vec3, EPSILON};
use super::types::{Color, ProjectedTriangle, RenderSettings, Triangle};
use crate::world::Scene;

/// Drawing target supplied by the host.
///
/// Spans and lines may extend past the surface; implementations clip.
pub trait Surface {
    /// Fill the entire surface with a solid color
    fn clear(&mut self, color: Color);

    /// Set pixels `x_start..=x_end` on row `y`
    fn draw_span(&mut self, y: i32, x_start: i32, x_end: i32, color: Color);

    /// Bresenham line, drawn as one-pixel spans
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.draw_span(y, x, x, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Flush the finished frame to the display
    fn present(&mut self);
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
    }

    /// Write the current contents to a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ColorType::Rgba8,
        )
    }
}

impl Surface for Framebuffer {
    fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    fn draw_span(&mut self, y: i32, x_start: i32, x_end: i32, color: Color) {
        if y < 0 || y >= self.height as i32 || self.width == 0 {
            return;
        }
        let (lo, hi) = if x_start <= x_end { (x_start, x_end) } else { (x_end, x_start) };
        if hi < 0 || lo >= self.width as i32 {
            return;
        }
        let lo = lo.max(0) as usize;
        let hi = hi.min(self.width as i32 - 1) as usize;
        let row = y as usize * self.width;
        let bytes = color.to_bytes();
        for px in self.pixels[(row + lo) * 4..(row + hi + 1) * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// The bare buffer has no display; the window host uploads it instead
    fn present(&mut self) {}
}

/// Per-frame triangle counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles gathered from the scene
    pub submitted: usize,
    /// Dropped by the backface test
    pub culled: usize,
    /// Degenerate, nearer than the near distance, or far off screen
    pub rejected: usize,
    /// Rasterized
    pub drawn: usize,
}

/// What happened to one triangle in the geometry stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangleFate {
    Culled,
    Rejected,
    Visible(ProjectedTriangle),
}

/// Rotate about the mesh origin, then place the mesh in the world
pub fn transform_triangle(tri: Triangle, origin: Vec3, rotation: &Mat4) -> Triangle {
    tri.transformed(rotation).translated(origin)
}

/// Backface test. Keeps the triangle when its normal does not point along
/// the ray from the camera to vertex B.
pub fn is_front_facing(tri: &Triangle, normal: Vec3, camera: Vec3) -> bool {
    let camera_ray = (tri.b - camera).normalize();
    normal.dot(camera_ray) <= 0.0
}

/// Point-light illumination `I / d^2 * cos(theta)`, clamped to the
/// configured range.
///
/// `theta` is the angle between the face normal and the vector from the
/// midpoint of side AC to the light.
pub fn illumination(normal: Vec3, surface_point: Vec3, settings: &RenderSettings) -> f32 {
    let light_ray = settings.light_position - surface_point;
    let dist_sq = light_ray.dot(light_ray);

    let lit = if dist_sq < EPSILON {
        // light sits on the surface
        settings.max_illumination
    } else {
        let denom = normal.magnitude() * light_ray.magnitude();
        let cos_arg = if denom < EPSILON {
            0.0
        } else {
            (normal.dot(light_ray) / denom).clamp(-1.0, 1.0)
        };
        let theta = cos_arg.acos();
        settings.light_intensity / dist_sq * theta.cos()
    };

    // f32::clamp panics when min > max
    lit.max(settings.min_illumination).min(settings.max_illumination)
}

/// Map normalized device coordinates to pixels; z passes through
pub fn to_viewport(v: Vec3, width: usize, height: usize) -> Vec3 {
    Vec3::new(
        (v.x + 1.0) * 0.5 * width as f32,
        (v.y + 1.0) * 0.5 * height as f32,
        v.z,
    )
}

/// Projected x/y beyond this (in normalized units) would overflow the
/// integer scanline math
pub const GUARD_BAND: f32 = 64.0;

/// Smallest usable near distance
pub const MIN_NEAR: f32 = 1e-3;

/// Project a camera-space triangle to the window. `None` if any vertex is
/// nearer than `near` or lands outside the guard band.
pub fn project_triangle(
    tri: &Triangle,
    projection: &Mat4,
    near: f32,
    width: usize,
    height: usize,
) -> Option<ProjectedTriangle> {
    let project = |v: Vec3| {
        if v.z < near {
            return None;
        }
        let p = projection.project_point(v)?;
        if p.x.abs() > GUARD_BAND || p.y.abs() > GUARD_BAND {
            return None;
        }
        Some(to_viewport(p, width, height))
    };

    Some(ProjectedTriangle {
        a: project(tri.a)?,
        b: project(tri.b)?,
        c: project(tri.c)?,
        color: tri.color.shade(tri.intensity),
    })
}

/// Painter's order: farthest (smallest reciprocal depth) first
pub fn sort_back_to_front(triangles: &mut [ProjectedTriangle]) {
    triangles.sort_by(|t1, t2| t1.depth().total_cmp(&t2.depth()));
}

/// Flat scanline fill of a triangle given in integer pixel coordinates
pub fn fill_triangle<S: Surface + ?Sized>(
    surface: &mut S,
    v1: (i32, i32),
    v2: (i32, i32),
    v3: (i32, i32),
    color: Color,
) {
    let (mut v1, mut v2, mut v3) = (v1, v2, v3);
    if v1.1 > v2.1 {
        std::mem::swap(&mut v1, &mut v2);
    }
    if v1.1 > v3.1 {
        std::mem::swap(&mut v1, &mut v3);
    }
    if v2.1 > v3.1 {
        std::mem::swap(&mut v2, &mut v3);
    }

    let total_height = v3.1 - v1.1;
    if total_height == 0 {
        return;
    }
    let upper_height = v2.1 - v1.1;

    for i in 0..=total_height {
        let second_half = i > upper_height || v2.1 == v1.1;
        let segment_height = if second_half { v3.1 - v2.1 } else { upper_height };

        let alpha = i as f32 / total_height as f32;
        let mut ax = v1.0 + (alpha * (v3.0 - v1.0) as f32) as i32;

        let mut bx = if segment_height == 0 {
            v2.0
        } else {
            let local = if second_half { i - upper_height } else { i };
            let beta = local as f32 / segment_height as f32;
            if second_half {
                v2.0 + (beta * (v3.0 - v2.0) as f32) as i32
            } else {
                v1.0 + (beta * (v2.0 - v1.0) as f32) as i32
            }
        };

        if ax > bx {
            std::mem::swap(&mut ax, &mut bx);
        }
        surface.draw_span(v1.1 + i, ax, bx, color);
    }
}

/// Fill a projected triangle, then optionally stroke its edges
pub fn draw_triangle<S: Surface + ?Sized>(
    surface: &mut S,
    tri: &ProjectedTriangle,
    settings: &RenderSettings,
) {
    let [p1, p2, p3] = tri.screen_points();
    fill_triangle(surface, p1, p2, p3, tri.color);

    if settings.wireframe {
        let color = settings.wireframe_color;
        surface.draw_line(p1.0, p1.1, p2.0, p2.1, color);
        surface.draw_line(p2.0, p2.1, p3.0, p3.1, color);
        surface.draw_line(p3.0, p3.1, p1.0, p1.1, color);
    }
}

/// Frame renderer: owns settings and the output resolution
pub struct Renderer {
    pub settings: RenderSettings,
    pub width: usize,
    pub height: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self { settings, width, height }
    }

    /// Near distance actually used. Zero or negative values would flip the
    /// reciprocal depth key and reverse the draw order.
    pub fn near(&self) -> f32 {
        self.settings.near.max(MIN_NEAR)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::projection(self.width, self.height, self.settings.fov_factor, self.near())
    }

    /// Spin for this frame: `time` radians when animated, none otherwise
    pub fn rotation(&self, time: f32, animated: bool) -> Mat4 {
        let theta = if animated { time } else { 0.0 };
        self.settings.spin_axis.rotation(theta)
    }

    /// Cull, light and project one world-space triangle
    pub fn process_triangle(&self, tri: Triangle, camera: Vec3, projection: &Mat4) -> TriangleFate {
        let normal = tri.normal();
        if normal == Vec3::ZERO {
            return TriangleFate::Rejected;
        }

        if self.settings.backface_cull && !is_front_facing(&tri, normal, camera) {
            return TriangleFate::Culled;
        }

        let lit = tri
            .with_color(tri.color.modulate(self.settings.base_color))
            .with_intensity(illumination(normal, tri.center_of_third_side(), &self.settings));
        let view = lit.translated(camera * -1.0);

        match project_triangle(&view, projection, self.near(), self.width, self.height) {
            Some(projected) => TriangleFate::Visible(projected),
            None => TriangleFate::Rejected,
        }
    }

    /// Run the geometry pipeline over the whole scene. The result is in
    /// draw order.
    pub fn collect(&self, scene: &Scene, time: f32, animated: bool) -> (Vec<ProjectedTriangle>, FrameStats) {
        let rotation = self.rotation(time, animated);
        let projection = self.projection();
        let mut stats = FrameStats::default();
        let mut projected = Vec::new();

        for mesh in &scene.meshes {
            for tri in mesh.triangles() {
                stats.submitted += 1;
                let world = transform_triangle(tri, mesh.origin, &rotation);
                match self.process_triangle(world, scene.camera_position, &projection) {
                    TriangleFate::Visible(p) => projected.push(p),
                    TriangleFate::Culled => stats.culled += 1,
                    TriangleFate::Rejected => stats.rejected += 1,
                }
            }
        }

        sort_back_to_front(&mut projected);
        stats.drawn = projected.len();
        (projected, stats)
    }

    /// Clear, draw every visible triangle back to front, present
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        scene: &Scene,
        time: f32,
        animated: bool,
    ) -> FrameStats {
        surface.clear(self.settings.background);

        let (triangles, stats) = self.collect(scene, time, animated);
        for tri in &triangles {
            draw_triangle(surface, tri, &self.settings);
        }

        surface.present();
        debug!(
            submitted = stats.submitted,
            culled = stats.culled,
            rejected = stats.rejected,
            drawn = stats.drawn,
            "frame rendered"
        );
        stats
    }
}
