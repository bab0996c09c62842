//! Sticker records and the built-in sticker presets.

use kurbo::{Point, Rect, Size};
use uuid::Uuid;

use crate::glyph::{GlyphImage, GlyphKey};

/// Unique identifier for a sticker.
pub type StickerId = Uuid;

/// A button-selectable sticker kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerPreset {
    pub glyph: &'static str,
    pub label: &'static str,
    /// Side of the square sticker in logical pixels.
    pub size: f64,
}

impl StickerPreset {
    pub const fn new(glyph: &'static str, label: &'static str, size: f64) -> Self {
        Self { glyph, label, size }
    }

    pub fn glyph_key(&self, pixel_ratio: f64) -> GlyphKey {
        GlyphKey::new(self.glyph, self.size, pixel_ratio)
    }

    pub fn sticker_size(&self) -> Size {
        Size::new(self.size, self.size)
    }
}

/// Stickers offered by default.
pub const STICKER_PRESETS: [StickerPreset; 3] = [
    StickerPreset::new("🐱", "Cat", 60.0),
    StickerPreset::new("🍎", "Apple", 50.0),
    StickerPreset::new("🐧", "Penguin", 55.0),
];

/// A placed glyph image.
///
/// Only the position changes after creation; the board keeps it inside its
/// bounds.
#[derive(Debug, Clone)]
pub struct Sticker {
    pub(crate) id: StickerId,
    pub(crate) position: Point,
    size: Size,
    glyph: GlyphImage,
}

impl Sticker {
    /// Create a sticker with a fresh id at the origin.
    pub fn new(glyph: GlyphImage, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            size,
            glyph,
        }
    }

    /// Builder-style initial position. The board clamps it on insertion.
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> StickerId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn glyph(&self) -> &GlyphImage {
        &self.glyph
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Axis-aligned containment test, edges included.
    pub fn hit_test(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }
}

/// Square sticker with a one-pixel glyph, for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn test_sticker(size: f64) -> Sticker {
    let glyph = GlyphImage::new(GlyphKey::new("■", size, 1.0), 1, 1, vec![0, 0, 0, 255])
        .expect("one pixel");
    Sticker::new(glyph, Size::new(size, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph() -> GlyphImage {
        GlyphImage::new(GlyphKey::new("🐱", 60.0, 1.0), 1, 1, vec![0, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_presets() {
        let labels: Vec<_> = STICKER_PRESETS.iter().map(|p| p.label).collect();
        assert_eq!(labels, ["Cat", "Apple", "Penguin"]);
        assert_eq!(STICKER_PRESETS[0].sticker_size(), Size::new(60.0, 60.0));
        assert_eq!(STICKER_PRESETS[2].glyph_key(2.0).physical_size(), 110);
    }

    #[test]
    fn test_unique_ids() {
        let shared = glyph();
        let a = Sticker::new(shared.clone(), Size::new(60.0, 60.0));
        let b = Sticker::new(shared, Size::new(60.0, 60.0));
        assert_ne!(a.id(), b.id());
        assert!(a.glyph().shares_pixels(b.glyph()));
    }

    #[test]
    fn test_hit_test() {
        let sticker = Sticker::new(glyph(), Size::new(60.0, 60.0)).at(Point::new(40.0, 80.0));
        assert!(sticker.hit_test(Point::new(40.0, 80.0)));
        assert!(sticker.hit_test(Point::new(70.0, 110.0)));
        assert!(sticker.hit_test(Point::new(100.0, 140.0)));
        assert!(!sticker.hit_test(Point::new(101.0, 110.0)));
        assert!(!sticker.hit_test(Point::new(39.0, 110.0)));
    }
}
