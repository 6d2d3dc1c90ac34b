//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::Intersection;
use whitted_core::Material;
use whitted_math::{Aabb, Ray, Vec2, Vec3, RAY_EPSILON};

/// A sphere primitive.
#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    /// `None` inherits the enclosing node's material
    material: Option<Arc<Material>>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material: None,
        }
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_deref()
    }

    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    /// Append both crossings of the ray with the sphere that lie in front of the origin.
    ///
    /// A tangent ray counts as a miss.
    pub fn collect_hits<'a>(
        &'a self,
        ray: &Ray,
        inherited: &'a Material,
        out: &mut Vec<Intersection<'a>>,
    ) {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let h = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant <= 0.0 || a == 0.0 {
            return;
        }

        let sqrtd = discriminant.sqrt();
        let material = self.material.as_deref().unwrap_or(inherited);

        for root in [(-h - sqrtd) / a, (-h + sqrtd) / a] {
            if root <= RAY_EPSILON || !root.is_finite() {
                continue;
            }
            let position = ray.at(root);
            let normal = (position - self.center) / self.radius;
            out.push(Intersection {
                t: root,
                position,
                normal,
                uv: Self::sphere_uv(normal),
                vertex_color: None,
                enter: normal.dot(ray.direction()) < 0.0,
                material,
            });
        }
    }
}
