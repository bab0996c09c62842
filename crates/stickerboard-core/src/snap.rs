//! Snapping positions onto the board grid.

use kurbo::{Point, Size};

/// Cell size of the fixed snapping grid.
pub const GRID_SIZE: f64 = 40.0;

/// Slack used when turning a coordinate into a cell index, so values produced
/// by `k * cell` never land one cell short through rounding.
const CELL_EPSILON: f64 = 1e-6;

/// Which grid a sticker snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// Row/column grid that divides the board into equal cells.
    #[default]
    Slots,
    /// Uniform grid with [`GRID_SIZE`] cells.
    Fixed,
}

impl SnapMode {
    /// Short label for the grid settings panel.
    pub fn label(self) -> &'static str {
        match self {
            SnapMode::Slots => "Rows × Columns",
            SnapMode::Fixed => "Fixed 40px",
        }
    }
}

/// Round a single value to the nearest multiple of `cell`.
pub fn snap_value(value: f64, cell: f64) -> f64 {
    if cell <= 0.0 {
        return value;
    }
    (value / cell).round() * cell
}

/// Snap a point to a grid whose cells may be wider than they are tall.
pub fn snap_to_cells(point: Point, cell: Size) -> Point {
    Point::new(snap_value(point.x, cell.width), snap_value(point.y, cell.height))
}

/// Largest multiple of `cell` that is not greater than `max`, and never below zero.
pub fn aligned_floor(max: f64, cell: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    if cell <= 0.0 {
        return max;
    }
    ((max + CELL_EPSILON) / cell).floor() * cell
}

/// Index of the cell containing `value`.
pub fn cell_index(value: f64, cell: f64) -> i64 {
    if cell <= 0.0 {
        return 0;
    }
    ((value + CELL_EPSILON) / cell).floor() as i64
}

/// Check whether `value` sits on a grid line.
pub fn is_aligned(value: f64, cell: f64) -> bool {
    if cell <= 0.0 {
        return true;
    }
    let ratio = value / cell;
    (ratio - ratio.round()).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_square_cells() {
        let cell = Size::new(GRID_SIZE, GRID_SIZE);
        assert_eq!(snap_to_cells(Point::new(23.0, 47.0), cell), Point::new(40.0, 40.0));
        assert_eq!(snap_to_cells(Point::new(80.0, 120.0), cell), Point::new(80.0, 120.0));
        assert_eq!(snap_to_cells(Point::new(59.0, 19.0), cell), Point::new(40.0, 0.0));
    }

    #[test]
    fn test_snap_is_idempotent() {
        let once = snap_to_cells(Point::new(173.0, 91.0), Size::new(120.0, 80.0));
        let twice = snap_to_cells(once, Size::new(120.0, 80.0));
        assert_eq!(once, twice);
        assert_eq!(once, Point::new(120.0, 80.0));
    }

    #[test]
    fn test_snap_to_uneven_cells() {
        let cell = Size::new(600.0 / 7.0, 400.0 / 5.0);
        let snapped = snap_to_cells(Point::new(100.0, 100.0), cell);
        assert!(is_aligned(snapped.x, cell.width));
        assert!(is_aligned(snapped.y, cell.height));
    }

    #[test]
    fn test_aligned_floor() {
        assert_eq!(aligned_floor(540.0, 40.0), 520.0);
        assert_eq!(aligned_floor(520.0, 40.0), 520.0);
        assert_eq!(aligned_floor(-10.0, 40.0), 0.0);
        assert_eq!(aligned_floor(30.0, 40.0), 0.0);
    }

    #[test]
    fn test_cell_index() {
        assert_eq!(cell_index(0.0, 120.0), 0);
        assert_eq!(cell_index(119.9, 120.0), 0);
        assert_eq!(cell_index(120.0, 120.0), 1);
        assert_eq!(cell_index(3.0 * (600.0 / 7.0), 600.0 / 7.0), 3);
    }

    #[test]
    fn test_snap_mode_labels() {
        assert_eq!(SnapMode::default(), SnapMode::Slots);
        assert_eq!(SnapMode::Fixed.label(), "Fixed 40px");
    }
}
