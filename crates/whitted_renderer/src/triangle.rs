//! Ray/triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm.

use whitted_math::{Ray, Vec3, RAY_EPSILON};

/// Determinants closer to zero than this are treated as a ray parallel to the plane.
///
/// Kept far below `f32::EPSILON` because the determinant scales with triangle area, and
/// finely tessellated meshes have legitimately tiny triangles.
const DETERMINANT_EPSILON: f32 = 1e-10;

/// Barycentric hit on a triangle `(v0, v1, v2)`.
///
/// The hit point is `(1 - u - v) * v0 + u * v1 + v * v2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl TriangleHit {
    /// Weight of the first vertex.
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }

    /// Blend per-vertex attributes with the barycentric weights.
    pub fn interpolate<T>(&self, values: [T; 3]) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        let [a, b, c] = values;
        a * self.w() + b * self.u + c * self.v
    }
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `None` for rays parallel to the plane, hits outside the triangle and hits at
/// or behind `RAY_EPSILON`.
pub fn intersect_triangle(ray: &Ray, [v0, v1, v2]: [Vec3; 3]) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle, or the triangle is degenerate
    if a.abs() < DETERMINANT_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t <= RAY_EPSILON || !t.is_finite() {
        return None;
    }

    Some(TriangleHit { t, u, v })
}
