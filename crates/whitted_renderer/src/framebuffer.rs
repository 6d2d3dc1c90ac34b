//! 8-bit RGBA render target.

use image::{Rgba, RgbaImage};
use whitted_core::Color;

/// Convert a linear color to 8-bit RGBA.
///
/// Channels are clamped to [0, 1] and scaled; no gamma curve is applied.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * c.clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Row-major image, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    /// Create a framebuffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.index(x, y);
        self.pixels[idx] = rgba;
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        &mut self.pixels
    }

    /// Raw RGBA bytes, e.g. for upload or encoding.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(self.pixel(x, y)))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(0.0, 0.5, 1.0)), [0, 127, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(-1.0, 2.0, f32::NAN)), [0, 255, 0, 255]);
    }

    #[test]
    fn test_layout() {
        let mut fb = Framebuffer::new(3, 2);
        fb.set_pixel(2, 1, [1, 2, 3, 4]);
        assert_eq!(fb.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(fb.pixels()[5], [1, 2, 3, 4]);

        let bytes = fb.as_bytes();
        assert_eq!(bytes.len(), 3 * 2 * 4);
        assert_eq!(&bytes[20..24], &[1, 2, 3, 4]);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_to_image() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(1, 0, [255, 0, 0, 255]);
        let img = fb.to_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
