//! Glyph rasterizers.
//!
//! Natively, glyphs come from an emoji font on disk through `ab_glyph`; color
//! bitmap fonts are decoded from their embedded PNG strikes. On the web the
//! browser draws the glyph into an offscreen 2D canvas.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{Font, FontArc, FontVec, GlyphId, GlyphImageFormat, PxScale, point};
use image::{RgbaImage, imageops};
use stickerboard_core::{GlyphError, GlyphImage, GlyphKey, GlyphRasterizer};

/// Fill color for outline glyphs.
const INK: [u8; 3] = [0, 0, 0];

/// Emoji fonts tried in order when no font is configured.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
    "/usr/share/fonts/noto/NotoColorEmoji.ttf",
    "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
    "/System/Library/Fonts/Apple Color Emoji.ttc",
    "C:\\Windows\\Fonts\\seguiemj.ttf",
    "/usr/share/fonts/truetype/ancient-scripts/Symbola_hint.ttf",
];

/// Rasterizes glyphs from a single font file.
#[derive(Clone)]
pub struct FontRasterizer {
    font: FontArc,
    name: String,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer").field("name", &self.name).finish()
    }
}

impl FontRasterizer {
    /// Load the first face of a font file or collection.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, GlyphError> {
        let name = name.into();
        let font = FontVec::try_from_vec_and_index(data, 0)
            .map_err(|e| GlyphError::FontUnavailable(format!("{name}: {e}")))?;
        Ok(Self {
            font: FontArc::new(font),
            name,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, GlyphError> {
        let data = std::fs::read(path)
            .map_err(|e| GlyphError::FontUnavailable(format!("{}: {e}", path.display())))?;
        Self::from_bytes(path.display().to_string(), data)
    }

    /// Load the first candidate that parses.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, GlyphError> {
        let mut last = GlyphError::FontUnavailable("no font paths given".into());
        for path in paths {
            match Self::from_path(path.as_ref()) {
                Ok(rasterizer) => {
                    log::info!("using glyph font {}", rasterizer.name);
                    return Ok(rasterizer);
                }
                Err(err) => {
                    log::debug!("skipping font: {err}");
                    last = err;
                }
            }
        }
        Err(last)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn glyph_id(&self, ch: char) -> Result<GlyphId, GlyphError> {
        let id = self.font.glyph_id(ch);
        if id.0 == 0 {
            return Err(GlyphError::MissingGlyph(ch));
        }
        Ok(id)
    }

    /// Pixel scale whose em square is `font_px` tall, as CSS font sizes are.
    fn em_scale(&self, font_px: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_px * self.font.height_unscaled() / units_per_em)
    }

    fn draw_outline(&self, id: GlyphId, key: &GlyphKey, canvas: &mut RgbaImage) -> bool {
        let scale = self.em_scale(key.font_px() as f32);
        let glyph = id.with_scale_and_position(scale, point(0.0, 0.0));
        let Some(outlined) = self.font.outline_glyph(glyph) else {
            return false;
        };

        let bounds = outlined.px_bounds();
        let left = ((canvas.width() as f32 - bounds.width()) / 2.0).round() as i64;
        let top = ((canvas.height() as f32 - bounds.height()) / 2.0).round() as i64;
        let [r, g, b] = INK;
        outlined.draw(|x, y, coverage| {
            let px = left + x as i64;
            let py = top + y as i64;
            if px < 0 || py < 0 || px >= canvas.width() as i64 || py >= canvas.height() as i64 {
                return;
            }
            let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            canvas.put_pixel(px as u32, py as u32, image::Rgba([r, g, b, alpha]));
        });
        true
    }

    fn draw_bitmap(&self, id: GlyphId, ch: char, key: &GlyphKey, canvas: &mut RgbaImage) -> Result<(), GlyphError> {
        let font_px = key.font_px();
        let strike = self
            .font
            .glyph_raster_image2(id, font_px.ceil().min(u16::MAX as f64) as u16)
            .ok_or(GlyphError::NoOutline(ch))?;
        if !matches!(strike.format, GlyphImageFormat::Png) {
            return Err(GlyphError::Decode(format!("unsupported bitmap format {:?}", strike.format)));
        }

        let decoded = image::load_from_memory_with_format(strike.data, image::ImageFormat::Png)
            .map_err(|e| GlyphError::Decode(e.to_string()))?
            .to_rgba8();
        let scale = font_px / strike.pixels_per_em.max(1) as f64;
        let width = ((decoded.width() as f64 * scale).round() as u32).max(1);
        let height = ((decoded.height() as f64 * scale).round() as u32).max(1);
        let resized = imageops::resize(&decoded, width, height, imageops::FilterType::Triangle);

        let left = (canvas.width() as i64 - width as i64) / 2;
        let top = (canvas.height() as i64 - height as i64) / 2;
        imageops::overlay(canvas, &resized, left, top);
        Ok(())
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, key: &GlyphKey) -> Result<GlyphImage, GlyphError> {
        let ch = key.primary_char().ok_or(GlyphError::EmptyGlyph)?;
        let id = self.glyph_id(ch)?;

        let side = key.physical_size();
        let mut canvas = RgbaImage::new(side, side);
        if !self.draw_outline(id, key, &mut canvas) {
            self.draw_bitmap(id, ch, key, &mut canvas)?;
        }
        GlyphImage::new(key.clone(), side, side, canvas.into_raw())
    }
}

/// Draws glyphs with the browser's text renderer.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasRasterizer;

#[cfg(target_arch = "wasm32")]
impl GlyphRasterizer for CanvasRasterizer {
    fn rasterize(&self, key: &GlyphKey) -> Result<GlyphImage, GlyphError> {
        use wasm_bindgen::JsCast;

        if key.glyph.is_empty() {
            return Err(GlyphError::EmptyGlyph);
        }
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(GlyphError::ContextUnavailable)?;
        let canvas = document
            .create_element("canvas")
            .ok()
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .ok_or(GlyphError::ContextUnavailable)?;

        let side = key.physical_size();
        canvas.set_width(side);
        canvas.set_height(side);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web_sys::CanvasRenderingContext2d>().ok())
            .ok_or(GlyphError::ContextUnavailable)?;

        ctx.set_font(&format!("{}px serif", key.font_px()));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let center = side as f64 / 2.0;
        ctx.fill_text(&key.glyph, center, center)
            .map_err(|e| GlyphError::Decode(format!("{e:?}")))?;

        let data = ctx
            .get_image_data(0.0, 0.0, side as f64, side as f64)
            .map_err(|e| GlyphError::Decode(format!("{e:?}")))?;
        GlyphImage::new(key.clone(), side, side, data.data().0)
    }
}

/// Pick the rasterizer for this platform.
///
/// Natively this loads the first usable font from `font_paths` (falling back
/// to [`DEFAULT_FONT_CANDIDATES`] when empty). If none loads, every request
/// fails with the load error so the UI can report it.
pub fn default_rasterizer(font_paths: &[PathBuf]) -> Arc<dyn GlyphRasterizer> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = font_paths;
        Arc::new(CanvasRasterizer)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let loaded = if font_paths.is_empty() {
            FontRasterizer::from_paths(DEFAULT_FONT_CANDIDATES)
        } else {
            FontRasterizer::from_paths(font_paths)
        };
        match loaded {
            Ok(rasterizer) => Arc::new(rasterizer),
            Err(err) => {
                log::error!("no glyph font available: {err}");
                Arc::new(stickerboard_core::UnavailableRasterizer::new(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_bytes() {
        let err = FontRasterizer::from_bytes("junk", vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, GlyphError::FontUnavailable(msg) if msg.starts_with("junk")));
    }

    #[test]
    fn test_from_paths_reports_last_error() {
        let err = FontRasterizer::from_paths(&["/nonexistent/a.ttf", "/nonexistent/b.ttf"]).unwrap_err();
        match err {
            GlyphError::FontUnavailable(msg) => assert!(msg.contains("b.ttf")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_from_paths_empty() {
        let paths: [&str; 0] = [];
        assert!(FontRasterizer::from_paths(&paths).is_err());
    }

    #[test]
    fn test_default_rasterizer_without_fonts_fails_each_request() {
        let rasterizer = default_rasterizer(&[PathBuf::from("/nonexistent/emoji.ttf")]);
        let key = GlyphKey::new("🐱", 60.0, 1.0);
        assert!(matches!(rasterizer.rasterize(&key), Err(GlyphError::FontUnavailable(_))));
    }

    #[test]
    fn test_system_emoji_font_renders_if_present() {
        let Ok(rasterizer) = FontRasterizer::from_paths(DEFAULT_FONT_CANDIDATES) else {
            return;
        };
        let key = GlyphKey::new("🍎", 50.0, 2.0);
        match rasterizer.rasterize(&key) {
            Ok(image) => {
                assert_eq!((image.width, image.height), (100, 100));
                assert!(!image.is_blank());
            }
            // Fonts without this emoji are fine; a panic is not.
            Err(err) => assert!(matches!(err, GlyphError::MissingGlyph(_) | GlyphError::Decode(_))),
        }
    }
}
