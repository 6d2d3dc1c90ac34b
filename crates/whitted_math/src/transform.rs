// Affine transform pair used by scene-graph nodes.
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse();
// this wraps a forward/inverse pair so the two can never drift apart.

use crate::{Aabb, Mat4, Ray, Vec3};

/// A node-to-parent transform together with its inverse.
///
/// Setting either side recomputes the other, so `to_parent` and `to_object` are exact
/// inverses between mutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    to_parent: Mat4,
    to_object: Mat4,
    /// Transpose of `to_object`, used to map normals into parent space.
    normal_to_parent: Mat4,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        to_parent: Mat4::IDENTITY,
        to_object: Mat4::IDENTITY,
        normal_to_parent: Mat4::IDENTITY,
    };

    /// Create a transform from its object-to-parent matrix.
    pub fn from_to_parent(to_parent: Mat4) -> Self {
        let mut t = Self::IDENTITY;
        t.set_to_parent(to_parent);
        t
    }

    /// Create a transform from its parent-to-object matrix.
    pub fn from_to_object(to_object: Mat4) -> Self {
        let mut t = Self::IDENTITY;
        t.set_to_object(to_object);
        t
    }

    pub fn to_parent(&self) -> Mat4 {
        self.to_parent
    }

    pub fn to_object(&self) -> Mat4 {
        self.to_object
    }

    pub fn set_to_parent(&mut self, to_parent: Mat4) {
        self.to_parent = to_parent;
        self.to_object = to_parent.inverse();
        self.normal_to_parent = self.to_object.transpose();
    }

    pub fn set_to_object(&mut self, to_object: Mat4) {
        self.to_object = to_object;
        self.to_parent = to_object.inverse();
        self.normal_to_parent = to_object.transpose();
    }

    /// Append `m` after the current transform (`to_parent = m * to_parent`).
    pub fn then(self, m: Mat4) -> Self {
        Self::from_to_parent(m * self.to_parent)
    }

    pub fn point_to_parent(&self, p: Vec3) -> Vec3 {
        self.to_parent.transform_point3(p)
    }

    pub fn point_to_object(&self, p: Vec3) -> Vec3 {
        self.to_object.transform_point3(p)
    }

    pub fn vector_to_object(&self, v: Vec3) -> Vec3 {
        self.to_object.transform_vector3(v)
    }

    /// Map a surface normal into parent space (inverse-transpose, renormalized).
    pub fn normal_to_parent(&self, n: Vec3) -> Vec3 {
        self.normal_to_parent.transform_vector3(n).normalize_or_zero()
    }

    /// Map a parent-space ray into object space.
    ///
    /// The direction is transformed but not renormalized, so hit distances found in object
    /// space are valid in parent space unchanged.
    pub fn ray_to_object(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.point_to_object(ray.origin),
            self.vector_to_object(ray.direction),
        )
    }

    /// Parent-space bounds of an object-space box (bounds of its 8 transformed corners).
    pub fn aabb_to_parent(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { aabb.min.x } else { aabb.max.x },
                if i & 2 == 0 { aabb.min.y } else { aabb.max.y },
                if i & 4 == 0 { aabb.min.z } else { aabb.max.z },
            )
        });
        Aabb::enclosing(corners.map(|c| self.point_to_parent(c)))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for AffineTransform {
    fn from(to_parent: Mat4) -> Self {
        Self::from_to_parent(to_parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::PI;

    fn random_transform(rng: &mut StdRng) -> AffineTransform {
        let axis = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 1.0).normalize();
        let m = Mat4::from_scale_rotation_translation(
            Vec3::new(rng.gen_range(0.5..2.0), rng.gen_range(0.5..2.0), rng.gen_range(0.5..2.0)),
            Quat::from_axis_angle(axis, rng.gen_range(0.0..(2.0 * PI))),
            Vec3::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)),
        );
        AffineTransform::from_to_parent(m).then(Mat4::from_rotation_x(rng.gen_range(0.0..PI)))
    }

    #[test]
    fn test_identity() {
        let t = AffineTransform::default();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.point_to_parent(p), p);
        assert_eq!(t.point_to_object(p), p);
    }

    #[test]
    fn test_setting_either_side_keeps_inverse() {
        let m = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0)) * Mat4::from_rotation_y(PI / 4.0);

        let a = AffineTransform::from_to_parent(m);
        let b = AffineTransform::from_to_object(m.inverse());

        assert!((a.to_parent() * a.to_object()).abs_diff_eq(Mat4::IDENTITY, 1e-5));
        assert!(a.to_object().abs_diff_eq(b.to_object(), 1e-5));
        assert!(a.to_parent().abs_diff_eq(b.to_parent(), 1e-4));
    }

    #[test]
    fn test_round_trip_recovers_point() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let t = random_transform(&mut rng);
            let p = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));

            let there_and_back = t.point_to_object(t.point_to_parent(p));
            let back_and_there = t.point_to_parent(t.point_to_object(p));

            assert!((there_and_back - p).length() < 1e-3, "{there_and_back} vs {p}");
            assert!((back_and_there - p).length() < 1e-3, "{back_and_there} vs {p}");
        }
    }

    #[test]
    fn test_ray_to_object_preserves_t() {
        let t = AffineTransform::from_to_parent(
            Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)) * Mat4::from_scale(Vec3::splat(2.0)),
        );
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let local = t.ray_to_object(&ray);

        for s in [0.0, 1.0, 3.5] {
            let p = t.point_to_parent(local.at(s));
            assert!((p - ray.at(s)).length() < 1e-5);
        }
    }

    #[test]
    fn test_normal_under_non_uniform_scale_stays_perpendicular() {
        let t = AffineTransform::from_to_parent(Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0)));

        // Plane x + y = 1 in object space, normal (1, 1, 0).
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let world_tangent = t.to_parent().transform_vector3(tangent);
        let world_normal = t.normal_to_parent(Vec3::new(1.0, 1.0, 0.0));

        assert!(world_normal.dot(world_tangent).abs() < 1e-5);
        assert!((world_normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_to_parent() {
        let t = AffineTransform::from_to_parent(Mat4::from_translation(Vec3::splat(5.0)));
        let moved = t.aabb_to_parent(&Aabb::from_points(Vec3::ZERO, Vec3::ONE));
        assert!((moved.min - Vec3::splat(5.0)).length() < 1e-6);
        assert!((moved.max - Vec3::splat(6.0)).length() < 1e-6);

        let rotated = AffineTransform::from_to_parent(Mat4::from_rotation_z(PI / 4.0))
            .aabb_to_parent(&Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0)));
        assert!((rotated.max.x - 2.0f32.sqrt()).abs() < 1e-5);
    }
}
