//! In-memory textures for material maps.
//!
//! Decoding image files is left to callers: a [`Texture`] is built from raw texels or from
//! an already decoded [`image::RgbaImage`]. Texels are stored as normalized RGBA floats
//! without any transfer-function conversion, matching the un-gamma'd framebuffer output.

use image::RgbaImage;
use thiserror::Error;
use whitted_math::{Vec2, Vec3};

use crate::Color;

/// Errors that can occur when assembling a texture.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    #[error("texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("texture is {width}x{height} but {len} texels were supplied")]
    SizeMismatch { width: u32, height: u32, len: usize },
}

/// Color and coverage returned by a texture lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texel {
    pub color: Color,
    pub alpha: f32,
}

impl Texel {
    pub const fn opaque(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }
}

/// A grid of RGBA texels.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Stored as [R, G, B, A] per pixel, row-major, top row first
    pixels: Vec<[f32; 4]>,

    /// Label used in log output
    pub name: String,
}

impl Texture {
    /// Create a texture from pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        name: impl Into<String>,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if pixels.len() != width as usize * height as usize {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            name: name.into(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            name: "<solid>".to_string(),
        }
    }

    /// Convert a decoded 8-bit image.
    pub fn from_rgba_image(image: &RgbaImage, name: impl Into<String>) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| p.0.map(|channel| channel as f32 / 255.0))
            .collect();
        let texture = Self::new(width, height, pixels, name)?;
        log::debug!(
            "Created texture {} ({}x{})",
            texture.name,
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// UV coordinates wrap, with (0, 0) at the bottom-left corner.
    pub fn sample(&self, uv: Vec2) -> Texel {
        let u = wrap(uv.x);
        let v = wrap(uv.y);

        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0); // Flip V for image coordinates

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = x.ceil() as u32;
        let y1 = y.ceil() as u32;

        // Not enough neighbours for interpolation: nearest texel
        if x1 >= self.width || y1 >= self.height {
            let p = self.get_pixel(
                (x.round() as u32).min(self.width - 1),
                (y.round() as u32).min(self.height - 1),
            );
            return to_texel(p);
        }

        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = self.get_pixel(x0, y0);
        let p10 = self.get_pixel(x1, y0);
        let p01 = self.get_pixel(x0, y1);
        let p11 = self.get_pixel(x1, y1);

        let mut out = [0.0f32; 4];
        for (c, value) in out.iter_mut().enumerate() {
            let top = p00[c] * (1.0 - fx) + p10[c] * fx;
            let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
            *value = top * (1.0 - fy) + bottom * fy;
        }
        to_texel(out)
    }

    fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }
}

/// Any source of surface color that a material can reference.
#[derive(Clone, Debug)]
pub enum TextureMap {
    /// Image texels looked up by UV.
    Image(Texture),

    /// Two-color pattern over UV space.
    Checker { even: Color, odd: Color, frequency: f32 },

    /// Two-color pattern over object-space position, independent of UVs.
    Checker3d { even: Color, odd: Color, frequency: f32 },
}

impl TextureMap {
    /// UV checker with red and green cells.
    pub fn checker() -> Self {
        TextureMap::Checker {
            even: Color::new(0.0, 1.0, 0.0),
            odd: Color::new(1.0, 0.0, 0.0),
            frequency: 100.0,
        }
    }

    /// Solid 3D checker with red and green cells.
    pub fn checker_3d() -> Self {
        TextureMap::Checker3d {
            even: Color::new(0.0, 1.0, 0.0),
            odd: Color::new(1.0, 0.0, 0.0),
            frequency: 25.0,
        }
    }

    /// Look up the map at a surface point with texture coordinates `uv`.
    pub fn sample(&self, uv: Vec2, point: Vec3) -> Texel {
        match self {
            TextureMap::Image(texture) => texture.sample(uv),
            TextureMap::Checker {
                even,
                odd,
                frequency,
            } => {
                let s = (frequency * uv.x).sin() * (frequency * uv.y).sin();
                Texel::opaque(if s < 0.0 { *odd } else { *even })
            }
            TextureMap::Checker3d {
                even,
                odd,
                frequency,
            } => {
                let s = (frequency * point.x).sin()
                    * (frequency * point.y).sin()
                    * (frequency * point.z).sin();
                Texel::opaque(if s < 0.0 { *odd } else { *even })
            }
        }
    }
}

impl From<Texture> for TextureMap {
    fn from(texture: Texture) -> Self {
        TextureMap::Image(texture)
    }
}

fn wrap(x: f32) -> f32 {
    let w = x.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

fn to_texel(p: [f32; 4]) -> Texel {
    Texel {
        color: Color::new(p[0], p[1], p[2]),
        alpha: p[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> Texture {
        Texture::new(
            2,
            1,
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 0.0]],
            "ramp",
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);

        let sample = tex.sample(Vec2::new(0.5, 0.5));
        assert!((sample.color.x - 1.0).abs() < 0.001);
        assert!((sample.color.y - 0.5).abs() < 0.001);
        assert!((sample.color.z - 0.0).abs() < 0.001);
        assert_eq!(sample.alpha, 1.0);
    }

    #[test]
    fn test_size_validation() {
        assert_eq!(
            Texture::new(0, 4, vec![], "empty").unwrap_err(),
            TextureError::Empty { width: 0, height: 4 }
        );
        assert!(matches!(
            Texture::new(2, 2, vec![[0.0; 4]; 3], "short"),
            Err(TextureError::SizeMismatch { len: 3, .. })
        ));
    }

    #[test]
    fn test_bilinear_blend() {
        let tex = two_by_one();
        let mid = tex.sample(Vec2::new(0.5, 0.5));
        assert!((mid.color.x - 0.5).abs() < 1e-5);
        assert!((mid.alpha - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_uv_wraps() {
        let tex = two_by_one();
        let a = tex.sample(Vec2::new(0.25, 0.5));
        let b = tex.sample(Vec2::new(1.25, -0.5));
        assert!((a.color - b.color).length() < 1e-5);
    }

    #[test]
    fn test_from_rgba_image() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 128]));
        let tex = Texture::from_rgba_image(&img, "img").unwrap();

        // v = 1 is the top row of the image
        let top = tex.sample(Vec2::new(0.0, 0.99999));
        assert!(top.color.x > 0.99);
        let bottom = tex.sample(Vec2::new(0.0, 0.0));
        assert!(bottom.color.z > 0.99);
        assert!((bottom.alpha - 128.0 / 255.0).abs() < 1e-5);
    }

    #[test]
    fn test_checkers() {
        let checker = TextureMap::checker();
        let a = checker.sample(Vec2::new(0.01, 0.01), Vec3::ZERO);
        let b = checker.sample(Vec2::new(0.04, 0.01), Vec3::ZERO);
        assert_ne!(a.color, b.color);

        let solid = TextureMap::checker_3d();
        let p = Vec3::splat(0.05);
        let q = Vec3::new(0.15, 0.05, 0.05);
        // The 3D pattern ignores UVs entirely
        assert_eq!(solid.sample(Vec2::ZERO, p), solid.sample(Vec2::ONE, p));
        assert_ne!(solid.sample(Vec2::ZERO, p), solid.sample(Vec2::ZERO, q));
    }
}
