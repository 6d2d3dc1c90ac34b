//! Surface materials.
//!
//! Every material is shaded by the same local illumination model. The kinds differ only
//! in how they fill in its parameters, which they expose through [`ShadingModel`].

use std::sync::Arc;

use crate::{Color, TextureMap};

/// Relative weights of the diffuse, specular and ambient terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    pub kd: f32,
    pub ks: f32,
    pub ka: f32,
}

impl Coefficients {
    pub const fn new(kd: f32, ks: f32, ka: f32) -> Self {
        Self { kd, ks, ka }
    }

    pub fn sum(&self) -> f32 {
        self.kd + self.ks + self.ka
    }

    /// Scale the weights so they sum to one.
    ///
    /// Returns `None` when the weights sum to zero or less.
    pub fn normalized(&self) -> Option<Coefficients> {
        let sum = self.sum();
        if sum > 0.0 {
            Some(Coefficients::new(self.kd / sum, self.ks / sum, self.ka / sum))
        } else {
            None
        }
    }
}

/// Parameters of the local illumination model.
pub trait ShadingModel {
    /// Base surface color, used when no diffuse map is present.
    fn color(&self) -> Color;

    /// Diffuse, specular and ambient weights (not necessarily normalized).
    fn coefficients(&self) -> Coefficients;

    /// Phong specular exponent.
    fn exponent(&self) -> f32;

    /// Transparency coefficient, 0 for opaque.
    fn transparency(&self) -> f32 {
        0.0
    }

    /// Index of refraction.
    fn ior(&self) -> f32 {
        1.0
    }

    fn diffuse_map(&self) -> Option<&TextureMap> {
        None
    }

    fn specular_map(&self) -> Option<&TextureMap> {
        None
    }

    fn ambient_map(&self) -> Option<&TextureMap> {
        None
    }

    /// Normal perturbation map, read as `rgb - 0.5`.
    fn bump_map(&self) -> Option<&TextureMap> {
        None
    }
}

/// Fully configurable Phong material.
#[derive(Clone, Debug)]
pub struct PhongMaterial {
    pub color: Color,
    pub transparency: f32,
    pub kd: f32,
    pub ks: f32,
    pub ka: f32,
    pub exponent: f32,
    pub ior: f32,
    pub diffuse_map: Option<Arc<TextureMap>>,
    pub specular_map: Option<Arc<TextureMap>>,
    pub ambient_map: Option<Arc<TextureMap>>,
    pub bump_map: Option<Arc<TextureMap>>,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            transparency: 0.0,
            kd: 0.6,
            ks: 0.2,
            ka: 0.2,
            exponent: 5.0,
            ior: 1.0,
            diffuse_map: None,
            specular_map: None,
            ambient_map: None,
            bump_map: None,
        }
    }
}

impl PhongMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_coefficients(mut self, kd: f32, ks: f32, ka: f32) -> Self {
        self.kd = kd;
        self.ks = ks;
        self.ka = ka;
        self
    }

    pub fn with_exponent(mut self, exponent: f32) -> Self {
        self.exponent = exponent;
        self
    }

    /// Make the material transparent with the given refractive index.
    pub fn with_refraction(mut self, transparency: f32, ior: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self.ior = ior;
        self
    }

    pub fn with_diffuse_map(mut self, map: Arc<TextureMap>) -> Self {
        self.diffuse_map = Some(map);
        self
    }

    pub fn with_specular_map(mut self, map: Arc<TextureMap>) -> Self {
        self.specular_map = Some(map);
        self
    }

    pub fn with_ambient_map(mut self, map: Arc<TextureMap>) -> Self {
        self.ambient_map = Some(map);
        self
    }

    pub fn with_bump_map(mut self, map: Arc<TextureMap>) -> Self {
        self.bump_map = Some(map);
        self
    }
}

impl ShadingModel for PhongMaterial {
    fn color(&self) -> Color {
        self.color
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::new(self.kd, self.ks, self.ka)
    }

    fn exponent(&self) -> f32 {
        self.exponent
    }

    fn transparency(&self) -> f32 {
        self.transparency
    }

    fn ior(&self) -> f32 {
        self.ior
    }

    fn diffuse_map(&self) -> Option<&TextureMap> {
        self.diffuse_map.as_deref()
    }

    fn specular_map(&self) -> Option<&TextureMap> {
        self.specular_map.as_deref()
    }

    fn ambient_map(&self) -> Option<&TextureMap> {
        self.ambient_map.as_deref()
    }

    fn bump_map(&self) -> Option<&TextureMap> {
        self.bump_map.as_deref()
    }
}

/// Matte material: mostly diffuse with a little ambient.
#[derive(Clone, Debug)]
pub struct LambertianMaterial {
    albedo: Color,
}

impl LambertianMaterial {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl ShadingModel for LambertianMaterial {
    fn color(&self) -> Color {
        self.albedo
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::new(0.9, 0.0, 0.1)
    }

    fn exponent(&self) -> f32 {
        1.0
    }
}

/// Polished metal: dominated by mirror reflection and a tight highlight.
#[derive(Clone, Debug)]
pub struct MetalMaterial {
    albedo: Color,
    /// Relative weight of the mirror term, in [0, 1]
    shine: f32,
}

impl MetalMaterial {
    /// - `albedo`: The color of the metal
    /// - `shine`: 0.0 = dull, 1.0 = perfect mirror
    pub fn new(albedo: Color, shine: f32) -> Self {
        Self {
            albedo,
            shine: shine.clamp(0.0, 1.0),
        }
    }
}

impl ShadingModel for MetalMaterial {
    fn color(&self) -> Color {
        self.albedo
    }

    fn coefficients(&self) -> Coefficients {
        let ks = 0.8 * self.shine;
        Coefficients::new(0.9 - ks, ks, 0.1)
    }

    fn exponent(&self) -> f32 {
        20.0 + 180.0 * self.shine
    }
}

/// The closed set of materials a surface can carry.
#[derive(Clone, Debug)]
pub enum Material {
    Phong(PhongMaterial),
    Lambertian(LambertianMaterial),
    Metal(MetalMaterial),
}

impl Default for Material {
    fn default() -> Self {
        Material::Phong(PhongMaterial::default())
    }
}

impl Material {
    pub fn phong(color: Color) -> Self {
        Material::Phong(PhongMaterial::new(color))
    }

    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(LambertianMaterial::new(albedo))
    }

    pub fn metal(albedo: Color, shine: f32) -> Self {
        Material::Metal(MetalMaterial::new(albedo, shine))
    }

    fn model(&self) -> &dyn ShadingModel {
        match self {
            Material::Phong(m) => m,
            Material::Lambertian(m) => m,
            Material::Metal(m) => m,
        }
    }
}

impl ShadingModel for Material {
    fn color(&self) -> Color {
        self.model().color()
    }

    fn coefficients(&self) -> Coefficients {
        self.model().coefficients()
    }

    fn exponent(&self) -> f32 {
        self.model().exponent()
    }

    fn transparency(&self) -> f32 {
        self.model().transparency()
    }

    fn ior(&self) -> f32 {
        self.model().ior()
    }

    fn diffuse_map(&self) -> Option<&TextureMap> {
        self.model().diffuse_map()
    }

    fn specular_map(&self) -> Option<&TextureMap> {
        self.model().specular_map()
    }

    fn ambient_map(&self) -> Option<&TextureMap> {
        self.model().ambient_map()
    }

    fn bump_map(&self) -> Option<&TextureMap> {
        self.model().bump_map()
    }
}

impl From<PhongMaterial> for Material {
    fn from(m: PhongMaterial) -> Self {
        Material::Phong(m)
    }
}

impl From<LambertianMaterial> for Material {
    fn from(m: LambertianMaterial) -> Self {
        Material::Lambertian(m)
    }
}

impl From<MetalMaterial> for Material {
    fn from(m: MetalMaterial) -> Self {
        Material::Metal(m)
    }
}

/// Schlick's approximation of Fresnel reflectance.
///
/// `cosine` is the cosine of the incidence angle and `eta` the ratio of refractive
/// indices across the boundary.
pub fn schlick_reflectance(cosine: f32, eta: f32) -> f32 {
    let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
