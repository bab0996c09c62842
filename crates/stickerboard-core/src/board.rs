//! The sticker board: a fixed-size canvas holding stickers in z-order.

use std::collections::HashMap;

use kurbo::{Point, Rect, Size};

use crate::sticker::{Sticker, StickerId};

/// Default board width in logical pixels.
pub const BOARD_WIDTH: f64 = 600.0;
/// Default board height in logical pixels.
pub const BOARD_HEIGHT: f64 = 400.0;

/// All placed stickers.
///
/// Every position stored here lies in `[0, W - w] × [0, H - h]`.
#[derive(Debug, Clone)]
pub struct StickerBoard {
    size: Size,
    stickers: HashMap<StickerId, Sticker>,
    /// Z-order of stickers (back to front). Later stickers win hit tests.
    z_order: Vec<StickerId>,
}

impl Default for StickerBoard {
    fn default() -> Self {
        Self::new(Size::new(BOARD_WIDTH, BOARD_HEIGHT))
    }
}

impl StickerBoard {
    /// Create an empty board.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            stickers: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// Clamp a top-left position so a sticker of `sticker_size` stays on the board.
    pub fn clamp_position(&self, sticker_size: Size, position: Point) -> Point {
        let max_x = (self.size.width - sticker_size.width).max(0.0);
        let max_y = (self.size.height - sticker_size.height).max(0.0);
        Point::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
    }

    /// Add a sticker on top of the others, clamping its position.
    pub fn add(&mut self, mut sticker: Sticker) -> StickerId {
        sticker.position = self.clamp_position(sticker.size(), sticker.position);
        let id = sticker.id();
        self.z_order.push(id);
        self.stickers.insert(id, sticker);
        log::debug!("sticker {id} placed, {} on board", self.stickers.len());
        id
    }

    /// Remove a sticker. Unknown ids are a no-op.
    pub fn remove(&mut self, id: StickerId) -> Option<Sticker> {
        let removed = self.stickers.remove(&id)?;
        self.z_order.retain(|&sticker_id| sticker_id != id);
        Some(removed)
    }

    pub fn get(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.get(&id)
    }

    pub fn contains(&self, id: StickerId) -> bool {
        self.stickers.contains_key(&id)
    }

    /// Move a sticker, clamped to the board. Returns the stored position.
    pub fn set_position(&mut self, id: StickerId, position: Point) -> Option<Point> {
        let size = self.stickers.get(&id)?.size();
        let clamped = self.clamp_position(size, position);
        let sticker = self.stickers.get_mut(&id)?;
        sticker.position = clamped;
        Some(clamped)
    }

    /// Stickers in z-order (back to front).
    pub fn stickers_ordered(&self) -> impl Iterator<Item = &Sticker> {
        self.z_order.iter().filter_map(|id| self.stickers.get(id))
    }

    /// Topmost sticker containing `point`.
    pub fn sticker_at(&self, point: Point) -> Option<StickerId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.stickers.get(id).is_some_and(|s| s.hit_test(point)))
    }

    pub fn z_order(&self) -> &[StickerId] {
        &self.z_order
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticker::test_sticker;

    fn assert_in_bounds(board: &StickerBoard) {
        for sticker in board.stickers_ordered() {
            let p = sticker.position();
            let s = sticker.size();
            assert!(p.x >= 0.0 && p.x <= board.size().width - s.width, "{p:?}");
            assert!(p.y >= 0.0 && p.y <= board.size().height - s.height, "{p:?}");
        }
    }

    #[test]
    fn test_board_creation() {
        let board = StickerBoard::default();
        assert!(board.is_empty());
        assert_eq!(board.size(), Size::new(600.0, 400.0));
    }

    #[test]
    fn test_add_clamps_position() {
        let mut board = StickerBoard::default();
        let id = board.add(test_sticker(60.0).at(Point::new(590.0, -20.0)));
        assert_eq!(board.get(id).unwrap().position(), Point::new(540.0, 0.0));
        assert_in_bounds(&board);
    }

    #[test]
    fn test_set_position_clamps() {
        let mut board = StickerBoard::default();
        let id = board.add(test_sticker(50.0));

        for target in [
            Point::new(-100.0, -100.0),
            Point::new(1000.0, 1000.0),
            Point::new(560.0, 20.0),
            Point::new(10.0, 399.0),
        ] {
            board.set_position(id, target);
            assert_in_bounds(&board);
        }
        assert_eq!(board.set_position(id, Point::new(1000.0, 1000.0)), Some(Point::new(550.0, 350.0)));
    }

    #[test]
    fn test_oversized_sticker_pins_to_origin() {
        let mut board = StickerBoard::new(Size::new(40.0, 40.0));
        let id = board.add(test_sticker(60.0).at(Point::new(10.0, 10.0)));
        assert_eq!(board.get(id).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_remove_sticker() {
        let mut board = StickerBoard::default();
        let a = board.add(test_sticker(60.0));
        let b = board.add(test_sticker(60.0));

        assert!(board.remove(a).is_some());
        assert_eq!(board.len(), 1);
        assert_eq!(board.z_order(), &[b]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut board = StickerBoard::default();
        let a = board.add(test_sticker(60.0));
        let stranger = test_sticker(60.0).id();

        assert!(board.remove(stranger).is_none());
        assert!(board.set_position(stranger, Point::ZERO).is_none());
        assert_eq!(board.len(), 1);
        assert!(board.contains(a));
    }

    #[test]
    fn test_topmost_hit() {
        let mut board = StickerBoard::default();
        let back = board.add(test_sticker(60.0).at(Point::new(0.0, 0.0)));
        let front = board.add(test_sticker(60.0).at(Point::new(30.0, 30.0)));

        assert_eq!(board.sticker_at(Point::new(45.0, 45.0)), Some(front));
        assert_eq!(board.sticker_at(Point::new(10.0, 10.0)), Some(back));
        assert_eq!(board.sticker_at(Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_ordered_iteration() {
        let mut board = StickerBoard::default();
        let ids: Vec<_> = (0..3).map(|_| board.add(test_sticker(40.0))).collect();
        let ordered: Vec<_> = board.stickers_ordered().map(|s| s.id()).collect();
        assert_eq!(ordered, ids);

        board.remove(ids[1]);
        assert_eq!(board.z_order(), &[ids[0], ids[2]]);
    }
}
