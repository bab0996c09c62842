//! Camera module: places the board inside the window.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Camera manages the view transform for the board.
///
/// The board is drawn at `zoom` physical pixels per board pixel, with its
/// top-left corner at `offset` in window coordinates.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Current translation offset
    pub offset: Vec2,
    /// Physical pixels per board pixel
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts board coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to board coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a board point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Screen rectangle covered by a board of `board` size.
    pub fn board_rect(&self, board: Size) -> Rect {
        self.transform().transform_rect_bbox(board.to_rect())
    }

    /// Center a board of `board` logical size inside `viewport` physical pixels.
    ///
    /// `scale_factor` is the window's physical pixels per logical pixel. The
    /// board is shown at that scale unless it would not fit, in which case it
    /// shrinks to fit inside `padding` logical pixels of margin.
    pub fn center_board(&mut self, board: Size, viewport: Size, scale_factor: f64, padding: f64) {
        let padding = padding * scale_factor;
        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let fit = (available.width / board.width).min(available.height / board.height);
        self.zoom = scale_factor.min(fit).max(f64::EPSILON);

        self.offset = Vec2::new(
            ((viewport.width - board.width * self.zoom) / 2.0).round(),
            ((viewport.height - board.height * self.zoom) / 2.0).round(),
        );
    }
}
