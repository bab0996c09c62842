//! Pre-rendered glyph bitmaps shared by stickers.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Font size of the glyph relative to the sticker box.
pub const GLYPH_FONT_RATIO: f64 = 0.8;

/// Errors that can occur while producing a glyph bitmap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GlyphError {
    #[error("glyph text is empty")]
    EmptyGlyph,
    #[error("no usable font: {0}")]
    FontUnavailable(String),
    #[error("font has no glyph for {0:?}")]
    MissingGlyph(char),
    #[error("glyph {0:?} has neither an outline nor a bitmap")]
    NoOutline(char),
    #[error("failed to decode glyph bitmap: {0}")]
    Decode(String),
    #[error("2D rendering context is unavailable")]
    ContextUnavailable,
    #[error("glyph worker went away before finishing")]
    Disconnected,
}

/// Identifies one rasterization: the same key always yields the same pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub glyph: String,
    /// Logical box size in pixels.
    pub size: u32,
    /// Pixel ratio in hundredths, so the key stays hashable.
    ratio_centi: u32,
}

impl GlyphKey {
    pub fn new(glyph: impl Into<String>, size: f64, pixel_ratio: f64) -> Self {
        Self {
            glyph: glyph.into(),
            size: size.round().max(1.0) as u32,
            ratio_centi: (pixel_ratio.max(0.01) * 100.0).round() as u32,
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.ratio_centi as f64 / 100.0
    }

    /// Side of the square bitmap in physical pixels.
    pub fn physical_size(&self) -> u32 {
        (self.size as f64 * self.pixel_ratio()).ceil().max(1.0) as u32
    }

    /// Font size in physical pixels.
    pub fn font_px(&self) -> f64 {
        self.size as f64 * GLYPH_FONT_RATIO * self.pixel_ratio()
    }

    /// First character of the glyph text, used for font lookups.
    pub fn primary_char(&self) -> Option<char> {
        self.glyph.chars().next()
    }
}

/// Straight-alpha RGBA8 pixels of a rasterized glyph.
///
/// Cloning is cheap: the pixel buffer is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphImage {
    pub key: GlyphKey,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

impl GlyphImage {
    pub fn new(key: GlyphKey, width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, GlyphError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(GlyphError::Decode(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            key,
            width,
            height,
            rgba: Arc::new(rgba),
        })
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.rgba.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Check if two images share the same pixel buffer.
    pub fn shares_pixels(&self, other: &GlyphImage) -> bool {
        Arc::ptr_eq(&self.rgba, &other.rgba)
    }
}

/// Turns glyph keys into bitmaps.
///
/// Implementations must be deterministic for a given key.
pub trait GlyphRasterizer: Send + Sync {
    fn rasterize(&self, key: &GlyphKey) -> Result<GlyphImage, GlyphError>;
}

/// Rasterizer that always fails with the same error. Stands in when no font
/// could be loaded so every request reports the problem.
#[derive(Debug, Clone)]
pub struct UnavailableRasterizer {
    reason: String,
}

impl UnavailableRasterizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl GlyphRasterizer for UnavailableRasterizer {
    fn rasterize(&self, _key: &GlyphKey) -> Result<GlyphImage, GlyphError> {
        Err(GlyphError::FontUnavailable(self.reason.clone()))
    }
}

/// Cache of finished glyph images.
#[derive(Debug, Default)]
pub struct GlyphCache {
    images: HashMap<GlyphKey, GlyphImage>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &GlyphKey) -> Option<&GlyphImage> {
        self.images.get(key)
    }

    pub fn insert(&mut self, image: GlyphImage) {
        self.images.insert(image.key.clone(), image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sizes() {
        let key = GlyphKey::new("🐱", 60.0, 2.0);
        assert_eq!(key.physical_size(), 120);
        assert!((key.font_px() - 96.0).abs() < 1e-9);
        assert_eq!(key.primary_char(), Some('🐱'));

        let fractional = GlyphKey::new("🍎", 55.0, 1.25);
        assert_eq!(fractional.physical_size(), 69);
    }

    #[test]
    fn test_key_equality_ignores_float_noise() {
        let a = GlyphKey::new("🐧", 55.0, 1.5);
        let b = GlyphKey::new("🐧", 55.0, 1.5000000001);
        assert_eq!(a, b);
        assert_ne!(a, GlyphKey::new("🐧", 55.0, 2.0));
    }

    #[test]
    fn test_image_length_checked() {
        let key = GlyphKey::new("x", 2.0, 1.0);
        assert!(GlyphImage::new(key.clone(), 2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            GlyphImage::new(key, 2, 2, vec![0; 3]),
            Err(GlyphError::Decode(_))
        ));
    }

    #[test]
    fn test_blank_detection() {
        let key = GlyphKey::new("x", 1.0, 1.0);
        let blank = GlyphImage::new(key.clone(), 1, 1, vec![255, 255, 255, 0]).unwrap();
        let inked = GlyphImage::new(key, 1, 1, vec![0, 0, 0, 200]).unwrap();
        assert!(blank.is_blank());
        assert!(!inked.is_blank());
    }

    #[test]
    fn test_cache_roundtrip() {
        let mut cache = GlyphCache::new();
        let key = GlyphKey::new("🐱", 60.0, 1.0);
        let image = GlyphImage::new(key.clone(), 1, 1, vec![1, 2, 3, 4]).unwrap();
        cache.insert(image.clone());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).unwrap().shares_pixels(&image));
    }

    #[test]
    fn test_unavailable_rasterizer_reports_reason() {
        let rasterizer = UnavailableRasterizer::new("no fonts found");
        let err = rasterizer.rasterize(&GlyphKey::new("🐱", 60.0, 1.0)).unwrap_err();
        assert_eq!(err, GlyphError::FontUnavailable("no fonts found".into()));
    }
}
