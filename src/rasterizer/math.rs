//! Vector and matrix math for the geometry pipeline

use std::ops::{Add, Mul, Sub};
use serde::{Serialize, Deserialize};

/// Below this magnitude a vector is treated as degenerate
pub const EPSILON: f32 = 1e-6;

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean norm
    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `Vec3::ZERO` when the
    /// magnitude is below `EPSILON`
    pub fn normalize(self) -> Vec3 {
        let l = self.magnitude();
        if l < EPSILON {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise product
    pub fn mul_elem(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    pub fn midpoint(self, other: Vec3) -> Vec3 {
        (self + other).scale(0.5)
    }

    pub fn approx_eq(self, other: Vec3, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 4x4 homogeneous transform, row-major, applied to column vectors (x, y, z, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    /// Right-handed rotation about the X axis (radians)
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, -s, 0.0],
                [0.0, s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Right-handed rotation about the Y axis (radians)
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4 {
            m: [
                [c, 0.0, s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Right-handed rotation about the Z axis (radians)
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4 {
            m: [
                [c, -s, 0.0, 0.0],
                [s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Perspective projection for a camera looking down +Z.
    ///
    /// Produces `w = z`, so after the divide x/y land in roughly [-1, 1]
    /// and `z = near / depth` (reciprocal depth, larger is nearer).
    pub fn projection(width: usize, height: usize, fov_factor: f32, near: f32) -> Self {
        let aspect = height as f32 / width.max(1) as f32;
        Mat4 {
            m: [
                [aspect * fov_factor, 0.0, 0.0, 0.0],
                [0.0, fov_factor, 0.0, 0.0],
                [0.0, 0.0, 0.0, near],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Full homogeneous product, returns (x, y, z, w)
    pub fn transform(&self, v: Vec3) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, o) in self.m.iter().zip(out.iter_mut()) {
            *o = row[0] * v.x + row[1] * v.y + row[2] * v.z + row[3];
        }
        out
    }

    /// Transform a point, dividing by w unless w is degenerate
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let [x, y, z, w] = self.transform(v);
        if w.abs() < EPSILON {
            return Vec3::new(x, y, z);
        }
        Vec3::new(x / w, y / w, z / w)
    }

    /// Transform and perspective divide. `None` when the point sits at or
    /// behind the eye (w <= EPSILON).
    pub fn project_point(&self, v: Vec3) -> Option<Vec3> {
        let [x, y, z, w] = self.transform(v);
        if w <= EPSILON {
            return None;
        }
        Some(Vec3::new(x / w, y / w, z / w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const TOL: f32 = 1e-4;

    fn samples() -> [Vec3; 5] {
        [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, -3.0),
            Vec3::new(-1.5, 4.0, 0.25),
            Vec3::new(10.0, -7.0, 3.0),
            Vec3::ZERO,
        ]
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!(c.approx_eq(Vec3::new(0.0, 0.0, 1.0), TOL));
    }

    #[test]
    fn test_vec3_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Vec3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vec3::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.mul_elem(b), Vec3::new(0.5, -2.0, 6.0));
        assert!((Vec3::new(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < TOL);
    }

    #[test]
    fn test_normalize_unit_length() {
        for v in samples().iter().filter(|v| **v != Vec3::ZERO) {
            assert!((v.normalize().magnitude() - 1.0).abs() < TOL, "{:?}", v);
        }
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert_eq!(Vec3::new(1e-9, 0.0, -1e-9).normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_rotation_zero_is_identity() {
        for rot in [Mat4::rotation_x(0.0), Mat4::rotation_y(0.0), Mat4::rotation_z(0.0)] {
            for v in samples() {
                assert!(rot.transform_point(v).approx_eq(v, TOL));
            }
        }
    }

    #[test]
    fn test_rotation_round_trip() {
        type Builder = fn(f32) -> Mat4;
        let builders: [Builder; 3] = [Mat4::rotation_x, Mat4::rotation_y, Mat4::rotation_z];
        for build in builders {
            for theta in [0.3, 1.0, PI / 2.0, 2.5, -4.0] {
                let there = build(theta);
                let back = build(-theta);
                for v in samples() {
                    let r = back.transform_point(there.transform_point(v));
                    assert!(r.approx_eq(v, TOL), "{:?} -> {:?}", v, r);
                }
            }
        }
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        // +X rotates toward -Z about +Y
        let r = Mat4::rotation_y(PI / 2.0).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(r.approx_eq(Vec3::new(0.0, 0.0, -1.0), TOL));
    }

    #[test]
    fn test_projection_divides_by_depth() {
        let proj = Mat4::projection(200, 100, 1.0, 0.1);
        let p = proj.project_point(Vec3::new(2.0, 1.0, 4.0)).unwrap();
        assert!(p.approx_eq(Vec3::new(0.5 * 2.0 / 4.0, 1.0 / 4.0, 0.1 / 4.0), TOL));

        // nearer points get a larger z
        let near = proj.project_point(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let far = proj.project_point(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert!(near.z > far.z);
    }

    #[test]
    fn test_transform_point_divide() {
        let proj = Mat4::projection(100, 100, 1.0, 0.1);
        let v = Vec3::new(2.0, 1.0, 4.0);
        assert_eq!(proj.transform_point(v), proj.project_point(v).unwrap());

        // w = 0: returned undivided
        let p = proj.transform_point(Vec3::new(2.0, 1.0, 0.0));
        assert!(p.approx_eq(Vec3::new(2.0, 1.0, 0.1), TOL));
    }

    #[test]
    fn test_projection_rejects_behind_eye() {
        let proj = Mat4::projection(100, 100, 1.0, 0.1);
        assert!(proj.project_point(Vec3::new(1.0, 1.0, 0.0)).is_none());
        assert!(proj.project_point(Vec3::new(1.0, 1.0, -2.0)).is_none());
    }
}
