//! A complete renderable scene.

use crate::{Camera, Intersection, SceneNode, SceneObject};
use whitted_core::{Background, Light, Material, ShadingModel};
use whitted_math::{Interval, Ray};

/// Default secondary-ray offset for f32 geometry.
pub const DEFAULT_SHADOW_BIAS: f32 = 1e-3;

/// Geometry, lights, camera and background handed to the renderer.
///
/// Assembled once up front and only read while rendering.
#[derive(Debug)]
pub struct Scene {
    pub root: SceneNode,
    /// Material for any surface whose ancestors set none
    pub default_material: Material,
    pub lights: Vec<Light>,
    pub camera: Camera,
    pub background: Background,
    /// Offset applied to secondary ray origins to avoid self-intersection
    pub shadow_bias: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            root: SceneNode::new(),
            default_material: Material::default(),
            lights: Vec::new(),
            camera: Camera::default(),
            background: Background::default(),
            shadow_bias: DEFAULT_SHADOW_BIAS,
        }
    }
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_object(mut self, object: impl Into<SceneObject>) -> Self {
        self.root.add(object);
        self
    }

    pub fn with_default_material(mut self, material: Material) -> Self {
        self.default_material = material;
        self
    }

    pub fn with_shadow_bias(mut self, bias: f32) -> Self {
        self.shadow_bias = bias;
        self
    }

    /// All hits along the ray, nearest first.
    pub fn intersect(&self, ray: &Ray) -> Vec<Intersection<'_>> {
        self.root.intersect(ray, &self.default_material)
    }

    /// Nearest hit along the ray.
    pub fn nearest(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.intersect(ray).into_iter().next()
    }

    /// True if any surface crosses the ray within `range`.
    pub fn is_occluded(&self, ray: &Ray, range: Interval) -> bool {
        let mut hits = Vec::new();
        self.root.collect_hits(ray, &self.default_material, &mut hits);
        hits.iter().any(|hit| hit.is_valid(range))
    }

    /// Log every material whose shading weights cannot be normalized.
    pub(crate) fn warn_degenerate_materials(&self) {
        let mut check = |material: &Material| {
            if material.coefficients().normalized().is_none() {
                log::warn!(
                    "Material {:?} has shading weights summing to zero; shading it as pure diffuse",
                    material.coefficients()
                );
            }
        };
        check(&self.default_material);
        self.root.for_each_material(&mut check);
    }
}
