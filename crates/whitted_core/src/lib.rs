//! Whitted Core - renderer-agnostic scene data.
//!
//! This crate provides the data the ray tracer consumes:
//!
//! - **Geometry**: [`MeshData`] vertex/triangle buffers grouped into [`SubMesh`]es
//! - **Appearance**: [`Material`], [`TextureMap`], [`Texture`]
//! - **Illumination**: [`Light`], [`Background`]
//!
//! Parsing of mesh, material or image files is left to callers; everything here is
//! built from in-memory values.

pub mod background;
pub mod light;
pub mod material;
pub mod mesh;
pub mod texture;

/// Linear RGB color (typically 0-1 per channel).
pub type Color = whitted_math::Vec3;

pub use background::Background;
pub use light::{Attenuation, Light, LightSample};
pub use material::{
    schlick_reflectance, Coefficients, LambertianMaterial, Material, MetalMaterial,
    PhongMaterial, ShadingModel,
};
pub use mesh::{MeshData, MeshError, SubMesh, DEFAULT_SUB_MESH};
pub use texture::{Texel, Texture, TextureError, TextureMap};
