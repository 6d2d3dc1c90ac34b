//! Ray color evaluation.
//!
//! [`WhittedIntegrator`] implements recursive local illumination: Phong shading with hard
//! shadows, mirror reflection and Snell refraction blended by Schlick's Fresnel
//! approximation. Recursion stops when the depth budget is exhausted or a ray's
//! contribution to the pixel falls below the configured minimum weight.

use crate::{Intersection, RenderSettings, RenderStats, Scene};
use whitted_core::{schlick_reflectance, Coefficients, Color, ShadingModel};
use whitted_math::{reflect, refract, Ray};

/// Everything a ray evaluation may read, shared by all workers of a render.
#[derive(Clone, Copy)]
pub struct TraceContext<'a> {
    pub scene: &'a Scene,
    pub settings: &'a RenderSettings,
    pub stats: &'a RenderStats,
}

/// Computes the color carried back along a ray.
pub trait Integrator: Send + Sync {
    /// Color seen along `ray` with `depth` bounces left and `weight` the fraction of the
    /// pixel this ray still contributes.
    ///
    /// Implementations return black when `depth` is 0 or `weight` is below
    /// `settings.min_weight`.
    fn ray_color(&self, ray: &Ray, ctx: &TraceContext<'_>, depth: u32, weight: f32) -> Color;
}

/// Recursive Whitted-style shading.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhittedIntegrator;

impl Integrator for WhittedIntegrator {
    fn ray_color(&self, ray: &Ray, ctx: &TraceContext<'_>, depth: u32, weight: f32) -> Color {
        if depth == 0 || weight < ctx.settings.min_weight {
            return Color::ZERO;
        }

        match ctx.scene.nearest(ray) {
            Some(hit) => self.shade(ray, &hit, ctx, depth, weight),
            None => ctx.scene.background.color(ray.direction()),
        }
    }
}

impl WhittedIntegrator {
    fn shade(
        &self,
        ray: &Ray,
        hit: &Intersection<'_>,
        ctx: &TraceContext<'_>,
        depth: u32,
        weight: f32,
    ) -> Color {
        let TraceContext {
            scene,
            settings,
            stats,
        } = *ctx;
        let material = hit.material;
        let surface = hit.resolve_surface();

        // Degenerate weights are reported once per render, before tracing starts.
        let k = material
            .coefficients()
            .normalized()
            .unwrap_or(Coefficients::new(1.0, 0.0, 0.0));

        let d = ray.direction().normalize_or_zero();
        let n = if hit.enter {
            surface.normal
        } else {
            -surface.normal
        };
        let position = hit.position;
        let biased = position + n * scene.shadow_bias;

        let specular_color = material
            .specular_map()
            .map(|map| map.sample(hit.uv, position).color)
            .unwrap_or(surface.color);

        // Direct illumination
        let mut diffuse = Color::ZERO;
        let mut specular = Color::ZERO;
        for light in &scene.lights {
            let sample = light.sample(position);

            if settings.shadows {
                stats.record_shadow();
                let (shadow_ray, range) = light.shadow_ray(biased);
                if scene.is_occluded(&shadow_ray, range) {
                    continue;
                }
            }

            let cos = sample.direction.dot(n);
            if cos <= 0.0 {
                continue;
            }
            diffuse += sample.intensity * surface.color * cos;

            let r = reflect(-sample.direction, n);
            let highlight = r.dot(-d);
            if highlight > 0.0 {
                specular += sample.intensity * specular_color * highlight.powf(material.exponent());
            }
        }

        // Mirror reflection
        let mut reflective = Color::ZERO;
        let reflect_weight = weight * k.ks;
        // A child at depth 0 would return black, so it is not spawned or counted
        let can_recurse = depth > 1;
        if settings.reflections && can_recurse && reflect_weight >= settings.min_weight {
            stats.record_reflection();
            let reflected = Ray::new(biased, reflect(d, n));
            reflective = self.ray_color(&reflected, ctx, depth - 1, reflect_weight);
        }

        // Refraction
        let global_alpha = (1.0 - material.transparency()).clamp(0.0, 1.0);
        let local_alpha = surface.alpha.clamp(0.0, 1.0);
        let transparency = (1.0 - local_alpha).max(material.transparency());
        let eta = if hit.enter {
            1.0 / material.ior()
        } else {
            material.ior()
        };

        let mut refractive = Color::ZERO;
        let refract_weight = weight * transparency;
        if settings.refractions
            && can_recurse
            && transparency > 0.0
            && refract_weight >= settings.min_weight
        {
            refractive = match refract(d, n, eta) {
                Some(direction) => {
                    stats.record_refraction();
                    let origin = position + direction.normalize_or_zero() * scene.shadow_bias;
                    self.ray_color(&Ray::new(origin, direction), ctx, depth - 1, refract_weight)
                }
                // Total internal reflection
                None => reflective,
            };
        }

        let ambient = match material.ambient_map() {
            Some(map) => surface.color * map.sample(hit.uv, position).color,
            None => surface.color,
        };

        let local = k.kd * diffuse + k.ka * ambient + k.ks * specular.max(reflective);
        let fresnel = schlick_reflectance((-d).dot(n).clamp(0.0, 1.0), eta);

        global_alpha * local_alpha * local
            + global_alpha * (1.0 - local_alpha) * refractive
            + (1.0 - global_alpha) * (fresnel * reflective + (1.0 - fresnel) * refractive)
    }
}

/// Debug view mapping outward normals to RGB (`0.5 + 0.5 * n`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalIntegrator;

impl Integrator for NormalIntegrator {
    fn ray_color(&self, ray: &Ray, ctx: &TraceContext<'_>, depth: u32, weight: f32) -> Color {
        if depth == 0 || weight < ctx.settings.min_weight {
            return Color::ZERO;
        }

        match ctx.scene.nearest(ray) {
            Some(hit) => Color::splat(0.5) + 0.5 * hit.normal,
            None => ctx.scene.background.color(ray.direction()),
        }
    }
}
