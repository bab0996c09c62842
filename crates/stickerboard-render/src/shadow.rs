//! Soft drop shadows for sticker glyphs.
//!
//! The shadow is the glyph's alpha mask, gaussian blurred on the CPU and
//! tinted once per glyph key.

use image::{GrayImage, Luma, imageops};
use kurbo::Vec2;
use stickerboard_core::GlyphImage;

/// Shadow appearance, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    pub rgb: [u8; 3],
    pub opacity: f32,
    /// Blur amount; the gaussian sigma is half of it.
    pub blur: f64,
    pub offset: Vec2,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            rgb: [0, 0, 0],
            opacity: 0.3,
            blur: 5.0,
            offset: Vec2::new(2.0, 2.0),
        }
    }
}

impl ShadowStyle {
    /// Gaussian sigma in physical pixels at `pixel_ratio`.
    pub fn sigma(&self, pixel_ratio: f64) -> f64 {
        self.blur / 2.0 * pixel_ratio
    }
}

/// Blurred shadow bitmap. It is larger than its glyph by `padding` physical
/// pixels on every side.
#[derive(Debug, Clone)]
pub struct ShadowImage {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub rgba: Vec<u8>,
}

/// Transparent margin that holds the blur tail, three sigmas wide.
fn blur_padding(sigma: f64) -> u32 {
    if sigma <= 0.0 {
        return 0;
    }
    (3.0 * sigma).ceil() as u32
}

/// Build the shadow bitmap for `glyph`.
pub fn render_shadow(glyph: &GlyphImage, style: &ShadowStyle) -> ShadowImage {
    let sigma = style.sigma(glyph.key.pixel_ratio());
    let padding = blur_padding(sigma);
    let width = glyph.width + 2 * padding;
    let height = glyph.height + 2 * padding;

    let mut mask = GrayImage::new(width, height);
    for (y, row) in glyph.rgba.chunks_exact(glyph.width as usize * 4).enumerate() {
        for (x, px) in row.chunks_exact(4).enumerate() {
            mask.put_pixel(x as u32 + padding, y as u32 + padding, Luma([px[3]]));
        }
    }
    if padding > 0 {
        mask = imageops::blur(&mask, sigma as f32);
    }

    let [r, g, b] = style.rgb;
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for Luma([a]) in mask.pixels() {
        let a = (*a as f32 * style.opacity).round().clamp(0.0, 255.0) as u8;
        rgba.extend_from_slice(&[r, g, b, a]);
    }

    ShadowImage {
        width,
        height,
        padding,
        rgba,
    }
}
