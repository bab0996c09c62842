//! Vello-based renderer implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::renderer::{BoardBackground, GridOverlay, RenderContext, Renderer};
use crate::shadow::{ShadowStyle, render_shadow};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Size, Stroke};
use peniko::{Color, Fill, Gradient};
use stickerboard_core::{GlyphImage, GlyphKey, Sticker, StickerBoard};
use vello::Scene;

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Board corner radius in logical pixels.
const BOARD_RADIUS: f64 = 8.0;
const BORDER_WIDTH: f64 = 2.0;

#[derive(Clone)]
struct CachedShadow {
    image: peniko::ImageData,
    padding: f64,
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Uploaded glyph bitmaps, one per glyph key.
    image_cache: HashMap<GlyphKey, peniko::ImageData>,
    /// Blurred shadow bitmaps, one per glyph key.
    shadow_cache: HashMap<GlyphKey, CachedShadow>,
    shadow_style: ShadowStyle,
    border_color: Color,
    grid_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn rgba_image(width: u32, height: u32, pixels: Vec<u8>) -> peniko::ImageData {
    peniko::ImageData {
        data: peniko::Blob::new(Arc::new(pixels)),
        format: peniko::ImageFormat::Rgba8,
        width,
        height,
        alpha_type: peniko::ImageAlphaType::Alpha,
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            image_cache: HashMap::new(),
            shadow_cache: HashMap::new(),
            shadow_style: ShadowStyle::default(),
            border_color: Color::from_rgba8(229, 231, 235, 255), // gray-200
            grid_color: Color::from_rgba8(229, 231, 235, 255),
        }
    }

    /// Replace the sticker shadow style. Cached shadows are rebuilt.
    pub fn set_shadow_style(&mut self, style: ShadowStyle) {
        if style != self.shadow_style {
            self.shadow_style = style;
            self.shadow_cache.clear();
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Number of glyph bitmaps held for drawing.
    pub fn cached_images(&self) -> usize {
        self.image_cache.len()
    }

    /// Build a scene for export: the board only, at `scale` physical pixels
    /// per board pixel. Returns the scene and the output size in pixels.
    pub fn build_export_scene(
        &mut self,
        board: &StickerBoard,
        background: BoardBackground,
        grid: GridOverlay,
        scale: f64,
    ) -> (Scene, u32, u32) {
        self.scene.reset();

        let size = board.size();
        let width = (size.width * scale).ceil().max(1.0) as u32;
        let height = (size.height * scale).ceil().max(1.0) as u32;

        self.render_board(board, Affine::scale(scale), background, grid, 0.0);

        (std::mem::take(&mut self.scene), width, height)
    }

    /// Board fill, grid and stickers under `transform`.
    fn render_board(
        &mut self,
        board: &StickerBoard,
        transform: Affine,
        background: BoardBackground,
        grid: GridOverlay,
        corner_radius: f64,
    ) {
        let size = board.size();
        let gradient = Gradient::new_linear(Point::ZERO, Point::new(size.width, size.height))
            .with_stops([background.from, background.to]);
        let fill = RoundedRect::from_rect(size.to_rect(), corner_radius);
        self.scene.fill(Fill::NonZero, transform, &gradient, None, &fill);

        if grid.visible {
            self.render_grid_lines(size, transform, grid);
        }

        self.prune_caches(board);
        for sticker in board.stickers_ordered() {
            self.render_sticker(sticker, transform);
        }
    }

    /// Render the grid's interior lines.
    fn render_grid_lines(&mut self, board: Size, transform: Affine, grid: GridOverlay) {
        let stroke = Stroke::new(1.0);
        let (xs, ys) = grid.policy.grid_lines(board);

        let mut path = BezPath::new();
        for x in xs {
            path.move_to(Point::new(x, 0.0));
            path.line_to(Point::new(x, board.height));
        }
        for y in ys {
            path.move_to(Point::new(0.0, y));
            path.line_to(Point::new(board.width, y));
        }
        if !path.elements().is_empty() {
            self.scene.stroke(&stroke, transform, self.grid_color, None, &path);
        }
    }

    fn glyph_image(&mut self, glyph: &GlyphImage) -> peniko::ImageData {
        self.image_cache
            .entry(glyph.key.clone())
            .or_insert_with(|| rgba_image(glyph.width, glyph.height, glyph.rgba.as_ref().clone()))
            .clone()
    }

    fn shadow_image(&mut self, glyph: &GlyphImage) -> CachedShadow {
        let style = self.shadow_style;
        self.shadow_cache
            .entry(glyph.key.clone())
            .or_insert_with(|| {
                let shadow = render_shadow(glyph, &style);
                CachedShadow {
                    image: rgba_image(shadow.width, shadow.height, shadow.rgba),
                    padding: shadow.padding as f64,
                }
            })
            .clone()
    }

    /// Drop bitmaps whose glyph no sticker uses anymore.
    fn prune_caches(&mut self, board: &StickerBoard) {
        if self.image_cache.len() <= board.len() && self.shadow_cache.len() <= board.len() {
            return;
        }
        let live: std::collections::HashSet<&GlyphKey> =
            board.stickers_ordered().map(|s| &s.glyph().key).collect();
        self.image_cache.retain(|key, _| live.contains(key));
        self.shadow_cache.retain(|key, _| live.contains(key));
    }

    /// Render one sticker and its shadow.
    fn render_sticker(&mut self, sticker: &Sticker, transform: Affine) {
        let glyph = sticker.glyph();
        if glyph.width == 0 || glyph.height == 0 {
            return;
        }

        let size = sticker.size();
        let bitmap_to_board = Affine::scale_non_uniform(
            size.width / glyph.width as f64,
            size.height / glyph.height as f64,
        );
        let origin = sticker.position().to_vec2();

        let shadow = self.shadow_image(glyph);
        let shadow_transform = transform
            * Affine::translate(origin + self.shadow_style.offset)
            * bitmap_to_board
            * Affine::translate((-shadow.padding, -shadow.padding));
        self.scene.draw_image(&peniko::ImageBrush::from(shadow.image), shadow_transform);

        let image = self.glyph_image(glyph);
        let image_transform = transform * Affine::translate(origin) * bitmap_to_board;
        self.scene.draw_image(&peniko::ImageBrush::from(image), image_transform);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();

        // Page background
        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
        let page = Gradient::new_linear(Point::ZERO, Point::new(viewport.x1, viewport.y1)).with_stops([
            ctx.board_background.from,
            Color::WHITE,
            ctx.board_background.to,
        ]);
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, &page, None, &viewport);

        let transform = ctx.camera.transform();
        let board_rect = ctx.board.bounds();
        let rounded = RoundedRect::from_rect(board_rect, BOARD_RADIUS);

        // Drop shadow under the board card
        self.scene.draw_blurred_rounded_rect(
            transform * Affine::translate((0.0, 4.0)),
            board_rect,
            Color::from_rgba8(0, 0, 0, 40),
            BOARD_RADIUS,
            10.0,
        );

        self.render_board(ctx.board, transform, ctx.board_background, ctx.grid, BOARD_RADIUS);

        self.scene.stroke(
            &Stroke::new(BORDER_WIDTH),
            transform,
            self.border_color,
            None,
            &rounded,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickerboard_core::{Camera, PlacementPolicy};

    fn sticker(glyph: &str, side: u32) -> Sticker {
        let key = GlyphKey::new(glyph, side as f64, 1.0);
        let image = GlyphImage::new(key, side, side, vec![255; (side * side * 4) as usize]).unwrap();
        Sticker::new(image, Size::new(side as f64, side as f64))
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_board() {
        let mut renderer = VelloRenderer::new();
        let board = StickerBoard::default();
        let camera = Camera::new();
        let ctx = RenderContext::new(&board, &camera, Size::new(800.0, 600.0));

        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
        assert_eq!(renderer.cached_images(), 0);
    }

    #[test]
    fn test_stickers_share_cached_images() {
        let mut renderer = VelloRenderer::new();
        let mut board = StickerBoard::default();
        let cat = sticker("🐱", 60);
        board.add(Sticker::new(cat.glyph().clone(), cat.size()).at(Point::new(120.0, 80.0)));
        board.add(cat);
        board.add(sticker("🍎", 50));

        let camera = Camera::new();
        let ctx = RenderContext::new(&board, &camera, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        assert_eq!(renderer.cached_images(), 2);
    }

    #[test]
    fn test_removed_glyphs_leave_the_cache() {
        let mut renderer = VelloRenderer::new();
        let mut board = StickerBoard::default();
        let cat = board.add(sticker("🐱", 60));
        board.add(sticker("🍎", 50));
        let camera = Camera::new();

        renderer.build_scene(&RenderContext::new(&board, &camera, Size::new(800.0, 600.0)));
        assert_eq!(renderer.cached_images(), 2);

        board.remove(cat);
        renderer.build_scene(&RenderContext::new(&board, &camera, Size::new(800.0, 600.0)));
        assert_eq!(renderer.cached_images(), 1);
    }

    #[test]
    fn test_export_scene_size() {
        let mut renderer = VelloRenderer::new();
        let mut board = StickerBoard::default();
        board.add(sticker("🐧", 55));

        let grid = GridOverlay {
            visible: true,
            policy: PlacementPolicy::slots(5, 7).unwrap(),
        };
        let (scene, width, height) =
            renderer.build_export_scene(&board, BoardBackground::default(), grid, 2.0);
        assert_eq!((width, height), (1200, 800));
        assert!(!scene.encoding().is_empty());
        // The export scene is handed off; the live scene starts empty again.
        assert!(renderer.scene().encoding().is_empty());
    }
}
