//! Ray/surface intersection records.

use whitted_core::{Color, Material, ShadingModel};
use whitted_math::{AffineTransform, Interval, Vec2, Vec3};

/// A single point where a ray crosses a surface.
///
/// Positions and normals are expressed in the space of whoever produced or last
/// transformed the record. The normal always points out of the solid; use
/// [`Intersection::facing_normal`] for the side the ray arrived from.
#[derive(Clone, Copy, Debug)]
pub struct Intersection<'a> {
    /// Ray parameter of the hit
    pub t: f32,
    pub position: Vec3,
    /// Unit outward normal (interpolated when smooth shading applies)
    pub normal: Vec3,
    pub uv: Vec2,
    /// Interpolated vertex color, if the mesh carries colors
    pub vertex_color: Option<Color>,
    /// True if the ray crosses into the solid here
    pub enter: bool,
    pub material: &'a Material,
}

/// Surface attributes after texture and bump lookups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub color: Color,
    pub alpha: f32,
    /// Unit outward shading normal
    pub normal: Vec3,
}

impl<'a> Intersection<'a> {
    /// Whether the hit distance falls in `range`.
    pub fn is_valid(&self, range: Interval) -> bool {
        range.accepts(self.t)
    }

    /// The normal flipped, if needed, to point back toward the incoming ray.
    pub fn facing_normal(&self) -> Vec3 {
        if self.enter {
            self.normal
        } else {
            -self.normal
        }
    }

    /// Express this record in the parent space of `transform`.
    ///
    /// `t` carries over unchanged because object-space rays are never renormalized.
    pub fn transform(&self, transform: &AffineTransform) -> Self {
        Self {
            position: transform.point_to_parent(self.position),
            normal: transform.normal_to_parent(self.normal),
            ..*self
        }
    }

    /// Resolve color, coverage and shading normal from the material's maps.
    pub fn resolve_surface(&self) -> Surface {
        let material = self.material;

        let (color, alpha) = match material.diffuse_map() {
            Some(map) => {
                let texel = map.sample(self.uv, self.position);
                (texel.color, texel.alpha)
            }
            None => (self.vertex_color.unwrap_or_else(|| material.color()), 1.0),
        };

        let normal = match material.bump_map() {
            Some(map) => {
                let offset = map.sample(self.uv, self.position).color - Vec3::splat(0.5);
                (self.normal + offset).try_normalize().unwrap_or(self.normal)
            }
            None => self.normal,
        };

        Surface {
            color,
            alpha,
            normal,
        }
    }
}
