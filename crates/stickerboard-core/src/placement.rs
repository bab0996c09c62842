//! Where new stickers go and where dropped stickers land.
//!
//! Two policies share the same surface:
//! - [`PlacementPolicy::Fixed`]: a uniform grid; new stickers start centered
//!   on the board.
//! - [`PlacementPolicy::Slots`]: the board split into `rows × cols` equal
//!   cells; new stickers take the first free cell in row-major order and fall
//!   back to the center cell once every cell is taken.
//!
//! Either way a released sticker is snapped to the active grid and then kept
//! on the board by stepping back whole cells, so its position stays aligned.

use kurbo::{Point, Size};
use thiserror::Error;

use crate::board::StickerBoard;
use crate::snap::{GRID_SIZE, SnapMode, aligned_floor, cell_index, snap_to_cells};

/// Row counts offered in the grid settings.
pub const ROW_OPTIONS: [u32; 4] = [3, 4, 5, 6];
/// Column counts offered in the grid settings.
pub const COL_OPTIONS: [u32; 4] = [5, 6, 7, 8];

/// Errors raised when configuring a grid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridError {
    #[error("grid needs at least one row and one column, got {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f64),
}

/// A cell in a slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Transient grid settings driven by the grid controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    rows: u32,
    cols: u32,
    pub visible: bool,
    pub mode: SnapMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 7,
            visible: true,
            mode: SnapMode::Slots,
        }
    }
}

impl GridConfig {
    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        let mut config = Self::default();
        config.set_dimensions(rows, cols)?;
        Ok(config)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn set_rows(&mut self, rows: u32) -> Result<(), GridError> {
        self.set_dimensions(rows, self.cols)
    }

    pub fn set_cols(&mut self, cols: u32) -> Result<(), GridError> {
        self.set_dimensions(self.rows, cols)
    }

    fn set_dimensions(&mut self, rows: u32, cols: u32) -> Result<(), GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// The placement policy these settings select.
    pub fn policy(&self) -> PlacementPolicy {
        match self.mode {
            SnapMode::Fixed => PlacementPolicy::Fixed { cell: GRID_SIZE },
            SnapMode::Slots => PlacementPolicy::Slots {
                rows: self.rows,
                cols: self.cols,
            },
        }
    }
}

/// Initial placement and drop snapping rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementPolicy {
    /// Uniform `cell × cell` grid.
    Fixed { cell: f64 },
    /// Board divided into `rows × cols` equal cells.
    Slots { rows: u32, cols: u32 },
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        PlacementPolicy::Fixed { cell: GRID_SIZE }
    }
}

impl PlacementPolicy {
    pub fn fixed(cell: f64) -> Result<Self, GridError> {
        if cell.is_nan() || cell <= 0.0 {
            return Err(GridError::InvalidCellSize(cell));
        }
        Ok(PlacementPolicy::Fixed { cell })
    }

    pub fn slots(rows: u32, cols: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(PlacementPolicy::Slots { rows, cols })
    }

    /// Size of one grid cell on a board of `board` size.
    pub fn cell_size(&self, board: Size) -> Size {
        match *self {
            PlacementPolicy::Fixed { cell } => Size::new(cell, cell),
            PlacementPolicy::Slots { rows, cols } => Size::new(
                board.width / cols.max(1) as f64,
                board.height / rows.max(1) as f64,
            ),
        }
    }

    /// Snap a released position to the grid, keeping the sticker on the board.
    pub fn snap(&self, board: Size, sticker: Size, position: Point) -> Point {
        let cell = self.cell_size(board);
        let snapped = snap_to_cells(position, cell);
        let max_x = aligned_floor(board.width - sticker.width, cell.width);
        let max_y = aligned_floor(board.height - sticker.height, cell.height);
        Point::new(snapped.x.clamp(0.0, max_x), snapped.y.clamp(0.0, max_y))
    }

    /// Where a new sticker of `sticker` size is put on `board`.
    pub fn initial_position(&self, board: &StickerBoard, sticker: Size) -> Point {
        let board_size = board.size();
        match *self {
            PlacementPolicy::Fixed { .. } => {
                let centered = Point::new(
                    board_size.width / 2.0 - sticker.width / 2.0,
                    board_size.height / 2.0 - sticker.height / 2.0,
                );
                self.snap(board_size, sticker, centered)
            }
            PlacementPolicy::Slots { .. } => {
                let cell = self
                    .first_empty_slot(board, sticker)
                    .unwrap_or_else(|| self.center_cell());
                let origin = self.cell_origin(board_size, cell);
                self.snap(board_size, sticker, origin)
            }
        }
    }

    /// First cell in row-major order with no sticker origin inside it and
    /// room for a sticker of `sticker` size.
    ///
    /// A cell too close to the board edge is skipped: clamping would push the
    /// sticker back into a neighbouring cell. Always `None` for the fixed
    /// policy.
    pub fn first_empty_slot(&self, board: &StickerBoard, sticker: Size) -> Option<Cell> {
        let PlacementPolicy::Slots { rows, cols } = *self else {
            return None;
        };
        let board_size = board.size();
        let occupied = self.occupied_cells(board);
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(row, col)))
            .filter(|cell| !occupied.contains(cell))
            .find(|&cell| {
                let landed = self.snap(board_size, sticker, self.cell_origin(board_size, cell));
                self.cell_at(board_size, landed) == Some(cell)
            })
    }

    /// Cells holding at least one sticker's top-left corner.
    pub fn occupied_cells(&self, board: &StickerBoard) -> Vec<Cell> {
        board
            .stickers_ordered()
            .filter_map(|sticker| self.cell_at(board.size(), sticker.position()))
            .collect()
    }

    /// Cell containing `point`, if the point is on the grid.
    pub fn cell_at(&self, board: Size, point: Point) -> Option<Cell> {
        let cell = self.cell_size(board);
        let (rows, cols) = self.dimensions(board);
        let col = cell_index(point.x, cell.width);
        let row = cell_index(point.y, cell.height);
        if col < 0 || row < 0 || col >= cols as i64 || row >= rows as i64 {
            return None;
        }
        Some(Cell::new(row as u32, col as u32))
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, board: Size, cell: Cell) -> Point {
        let size = self.cell_size(board);
        Point::new(cell.col as f64 * size.width, cell.row as f64 * size.height)
    }

    /// Fallback cell once the slot grid is full.
    pub fn center_cell(&self) -> Cell {
        match *self {
            PlacementPolicy::Slots { rows, cols } => Cell::new(rows / 2, cols / 2),
            PlacementPolicy::Fixed { .. } => Cell::new(0, 0),
        }
    }

    /// Number of rows and columns covering the board.
    pub fn dimensions(&self, board: Size) -> (u32, u32) {
        match *self {
            PlacementPolicy::Slots { rows, cols } => (rows, cols),
            PlacementPolicy::Fixed { cell } => (
                (board.height / cell).ceil().max(1.0) as u32,
                (board.width / cell).ceil().max(1.0) as u32,
            ),
        }
    }

    /// Interior grid line offsets: `(vertical x positions, horizontal y positions)`.
    pub fn grid_lines(&self, board: Size) -> (Vec<f64>, Vec<f64>) {
        let cell = self.cell_size(board);
        let (rows, cols) = self.dimensions(board);
        let xs = (1..cols)
            .map(|i| i as f64 * cell.width)
            .filter(|x| *x < board.width)
            .collect();
        let ys = (1..rows)
            .map(|i| i as f64 * cell.height)
            .filter(|y| *y < board.height)
            .collect();
        (xs, ys)
    }

    /// One-line description for the instructions strip.
    pub fn describe(&self, board: Size) -> String {
        match *self {
            PlacementPolicy::Fixed { cell } => format!("Auto-snaps to {cell:.0}px grid"),
            PlacementPolicy::Slots { rows, cols } => {
                let size = self.cell_size(board);
                format!(
                    "Auto-snaps to {rows}×{cols} grid ({:.0}×{:.0} cells)",
                    size.width, size.height
                )
            }
        }
    }
}
