//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use stickerboard_core::{Camera, PlacementPolicy, StickerBoard};

/// Two-color diagonal gradient, top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardBackground {
    pub from: Color,
    pub to: Color,
}

impl Default for BoardBackground {
    fn default() -> Self {
        Self {
            from: Color::from_rgba8(239, 246, 255, 255), // blue-50
            to: Color::from_rgba8(250, 245, 255, 255),   // purple-50
        }
    }
}

/// How the grid is drawn, if at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOverlay {
    pub visible: bool,
    pub policy: PlacementPolicy,
}

impl Default for GridOverlay {
    fn default() -> Self {
        Self {
            visible: true,
            policy: PlacementPolicy::default(),
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The board to render.
    pub board: &'a StickerBoard,
    /// Board to screen mapping.
    pub camera: &'a Camera,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Page color behind the board.
    pub background_color: Color,
    /// Board fill.
    pub board_background: BoardBackground,
    /// Grid lines over the board.
    pub grid: GridOverlay,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(board: &'a StickerBoard, camera: &'a Camera, viewport_size: Size) -> Self {
        Self {
            board,
            camera,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(248, 250, 252, 255),
            board_background: BoardBackground::default(),
            grid: GridOverlay::default(),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the page background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the board gradient.
    pub fn with_board_background(mut self, background: BoardBackground) -> Self {
        self.board_background = background;
        self
    }

    /// Set the grid overlay.
    pub fn with_grid(mut self, grid: GridOverlay) -> Self {
        self.grid = grid;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene for a frame.
    ///
    /// Called once per frame; prepares all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);
}
