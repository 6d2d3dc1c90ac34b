// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::{Aabb, Axis};
pub use interval::Interval;
pub use ray::Ray;
pub use transform::AffineTransform;

/// Smallest hit distance accepted by the primitive tests.
///
/// Hits at or below this distance are treated as self-intersections of a
/// secondary ray with the surface it was spawned from.
pub const RAY_EPSILON: f32 = 1e-4;

/// Conservative bound on the relative rounding error of `n` chained f32 operations.
#[inline]
pub fn gamma(n: i32) -> f32 {
    let e = f32::EPSILON * 0.5;
    (n as f32 * e) / (1.0 - n as f32 * e)
}

/// Mirror `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    let n = n.normalize_or_zero();
    v - 2.0 * v.dot(n) * n
}

/// Refract the direction `v` through a surface with normal `n` facing the incoming ray.
///
/// `eta` is the ratio of refractive indices (incident over transmitted). Returns `None`
/// on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let n = n.normalize();
    let cos_i = (-uv).dot(n).min(1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * uv + (eta * cos_i - cos_t) * n)
}
