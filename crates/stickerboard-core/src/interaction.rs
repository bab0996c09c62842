//! Pointer interaction with placed stickers: grab, drag, drop, delete.

use kurbo::{Point, Vec2};

use crate::board::StickerBoard;
use crate::input::{InputState, PointerEvent};
use crate::placement::PlacementPolicy;
use crate::sticker::{Sticker, StickerId};

/// State of an active drag.
#[derive(Debug, Clone)]
pub struct DragState {
    /// The sticker being dragged.
    pub sticker_id: StickerId,
    /// Sticker origin minus pointer position, fixed for the whole drag.
    pub offset: Vec2,
    /// Sticker position when the drag started.
    pub start_position: Point,
    /// Pointer position when the drag started.
    pub start_point: Point,
    /// Latest pointer position.
    pub current_point: Point,
}

impl DragState {
    pub fn new(sticker_id: StickerId, sticker_origin: Point, start_point: Point) -> Self {
        Self {
            sticker_id,
            offset: sticker_origin - start_point,
            start_position: sticker_origin,
            start_point,
            current_point: start_point,
        }
    }

    /// Whether the pointer moved at all while held.
    pub fn has_moved(&self) -> bool {
        self.current_point != self.start_point
    }

    /// Unclamped sticker origin for the current pointer.
    pub fn target_position(&self) -> Point {
        self.current_point + self.offset
    }
}

/// Something that changed on the board because of a pointer event.
#[derive(Debug, Clone)]
pub enum InteractionOutcome {
    /// A sticker was picked up.
    Grabbed(StickerId),
    /// The dragged sticker moved.
    Moved { id: StickerId, position: Point },
    /// The dragged sticker was released and snapped.
    Dropped { id: StickerId, position: Point },
    /// A sticker was removed by double-click or tap.
    Deleted(Sticker),
}

/// Drives drag and delete gestures against a [`StickerBoard`].
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag: Option<DragState>,
    /// Sticker hit by the previous mouse press, the target of a double-click.
    last_pressed: Option<StickerId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragged_sticker(&self) -> Option<StickerId> {
        self.drag.as_ref().map(|d| d.sticker_id)
    }

    /// Start dragging the topmost sticker under `point`.
    pub fn pointer_down(&mut self, board: &StickerBoard, point: Point) -> Option<StickerId> {
        let id = board.sticker_at(point)?;
        let origin = board.get(id)?.position();
        self.drag = Some(DragState::new(id, origin, point));
        log::debug!("grabbed sticker {id} at {point:?}");
        Some(id)
    }

    /// Follow the pointer with the dragged sticker, clamped to the board.
    pub fn pointer_move(&mut self, board: &mut StickerBoard, point: Point) -> Option<(StickerId, Point)> {
        let drag = self.drag.as_mut()?;
        drag.current_point = point;
        let id = drag.sticker_id;
        let target = drag.target_position();
        match board.set_position(id, target) {
            Some(position) => Some((id, position)),
            None => {
                // The sticker vanished mid-drag.
                self.drag = None;
                None
            }
        }
    }

    /// Release the dragged sticker, snapping it to the active grid.
    ///
    /// A press without movement is a click, not a drag, and leaves the
    /// sticker where it is.
    pub fn pointer_up(
        &mut self,
        board: &mut StickerBoard,
        policy: &PlacementPolicy,
    ) -> Option<(StickerId, Point)> {
        let drag = self.drag.take()?;
        if !drag.has_moved() {
            return None;
        }
        let sticker = board.get(drag.sticker_id)?;
        let snapped = policy.snap(board.size(), sticker.size(), sticker.position());
        let position = board.set_position(drag.sticker_id, snapped)?;
        log::debug!("dropped sticker {} at {position:?}", drag.sticker_id);
        Some((drag.sticker_id, position))
    }

    /// Abort the drag and put the sticker back where it started.
    pub fn cancel(&mut self, board: &mut StickerBoard) -> Option<StickerId> {
        let drag = self.drag.take()?;
        board.set_position(drag.sticker_id, drag.start_position);
        Some(drag.sticker_id)
    }

    /// Remove the sticker `id`, ending any drag on it.
    pub fn delete(&mut self, board: &mut StickerBoard, id: StickerId) -> Option<Sticker> {
        if self.dragged_sticker() == Some(id) {
            self.drag = None;
        }
        let removed = board.remove(id)?;
        log::debug!("deleted sticker {id}");
        Some(removed)
    }

    /// Apply a pointer event that `input` has already recorded.
    ///
    /// Deletion targets the sticker the gesture started on, not whatever
    /// lies under the pointer after a snap.
    pub fn handle_pointer_event(
        &mut self,
        board: &mut StickerBoard,
        policy: &PlacementPolicy,
        input: &InputState,
        event: &PointerEvent,
    ) -> Option<InteractionOutcome> {
        match *event {
            PointerEvent::Down { position, .. } => {
                if input.is_double_click() {
                    let id = self.last_pressed.take()?;
                    self.delete(board, id).map(InteractionOutcome::Deleted)
                } else {
                    let grabbed = self.pointer_down(board, position);
                    self.last_pressed = grabbed;
                    grabbed.map(InteractionOutcome::Grabbed)
                }
            }
            PointerEvent::Move { position } => self
                .pointer_move(board, position)
                .map(|(id, position)| InteractionOutcome::Moved { id, position }),
            PointerEvent::Up { .. } => {
                if input.is_tap() {
                    let id = self.drag.take()?.sticker_id;
                    return self.delete(board, id).map(InteractionOutcome::Deleted);
                }
                self.pointer_up(board, policy)
                    .map(|(id, position)| InteractionOutcome::Dropped { id, position })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButton, PointerKind};
    use crate::snap::is_aligned;
    use crate::sticker::test_sticker;
    use std::time::{Duration, Instant};

    fn board_with(positions: &[(f64, f64)]) -> (StickerBoard, Vec<StickerId>) {
        let mut board = StickerBoard::default();
        let ids = positions
            .iter()
            .map(|&(x, y)| board.add(test_sticker(60.0).at(Point::new(x, y))))
            .collect();
        (board, ids)
    }

    fn position(board: &StickerBoard, id: StickerId) -> Point {
        board.get(id).unwrap().position()
    }

    #[test]
    fn test_grab_topmost() {
        let (board, ids) = board_with(&[(0.0, 0.0), (40.0, 40.0)]);
        let mut interaction = Interaction::new();

        assert_eq!(interaction.pointer_down(&board, Point::new(50.0, 50.0)), Some(ids[1]));
        let drag = interaction.drag().unwrap();
        assert_eq!(drag.offset, Vec2::new(-10.0, -10.0));
    }

    #[test]
    fn test_miss_starts_nothing() {
        let (board, _) = board_with(&[(0.0, 0.0)]);
        let mut interaction = Interaction::new();
        assert_eq!(interaction.pointer_down(&board, Point::new(300.0, 300.0)), None);
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_drag_keeps_offset_and_clamps() {
        let (mut board, ids) = board_with(&[(80.0, 80.0)]);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&board, Point::new(100.0, 90.0));

        let moved = interaction.pointer_move(&mut board, Point::new(150.0, 130.0));
        assert_eq!(moved, Some((ids[0], Point::new(130.0, 120.0))));

        interaction.pointer_move(&mut board, Point::new(1000.0, -500.0));
        assert_eq!(position(&board, ids[0]), Point::new(540.0, 0.0));
    }

    #[test]
    fn test_drop_snaps_to_fixed_grid() {
        let (mut board, ids) = board_with(&[(80.0, 80.0)]);
        let policy = PlacementPolicy::default();
        let mut interaction = Interaction::new();

        interaction.pointer_down(&board, Point::new(100.0, 100.0));
        interaction.pointer_move(&mut board, Point::new(163.0, 137.0));
        let (id, dropped) = interaction.pointer_up(&mut board, &policy).unwrap();

        assert_eq!(id, ids[0]);
        // origin (143, 117) -> (160, 120)
        assert_eq!(dropped, Point::new(160.0, 120.0));
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_drop_is_always_aligned_and_in_bounds() {
        let policies = [
            PlacementPolicy::default(),
            PlacementPolicy::slots(5, 7).unwrap(),
            PlacementPolicy::slots(3, 8).unwrap(),
        ];
        let targets = [
            Point::new(-200.0, -200.0),
            Point::new(333.0, 77.0),
            Point::new(598.0, 398.0),
            Point::new(5000.0, 1.0),
        ];

        for policy in policies {
            for target in targets {
                let (mut board, ids) = board_with(&[(120.0, 80.0)]);
                let mut interaction = Interaction::new();
                interaction.pointer_down(&board, Point::new(130.0, 90.0));
                interaction.pointer_move(&mut board, target);
                interaction.pointer_up(&mut board, &policy).unwrap();

                let p = position(&board, ids[0]);
                let cell = policy.cell_size(board.size());
                assert!(is_aligned(p.x, cell.width) && is_aligned(p.y, cell.height), "{p:?}");
                assert!(p.x >= 0.0 && p.x <= 540.0 && p.y >= 0.0 && p.y <= 340.0, "{p:?}");
            }
        }
    }

    #[test]
    fn test_click_without_move_does_not_snap() {
        let (mut board, ids) = board_with(&[(13.0, 27.0)]);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&board, Point::new(20.0, 30.0));
        assert_eq!(interaction.pointer_up(&mut board, &PlacementPolicy::default()), None);
        assert_eq!(position(&board, ids[0]), Point::new(13.0, 27.0));
    }

    #[test]
    fn test_cancel_restores_start() {
        let (mut board, ids) = board_with(&[(40.0, 40.0)]);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&board, Point::new(50.0, 50.0));
        interaction.pointer_move(&mut board, Point::new(250.0, 250.0));

        assert_eq!(interaction.cancel(&mut board), Some(ids[0]));
        assert_eq!(position(&board, ids[0]), Point::new(40.0, 40.0));
        assert_eq!(interaction.cancel(&mut board), None);
    }

    #[test]
    fn test_delete_ends_drag_on_that_sticker() {
        let (mut board, ids) = board_with(&[(0.0, 0.0), (20.0, 20.0)]);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&board, Point::new(30.0, 30.0));

        let removed = interaction.delete(&mut board, ids[1]).unwrap();
        assert_eq!(removed.id(), ids[1]);
        assert!(!interaction.is_dragging());
        assert_eq!(board.len(), 1);
        assert!(board.contains(ids[0]));

        assert!(interaction.delete(&mut board, ids[1]).is_none());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_double_click_deletes() {
        let (mut board, ids) = board_with(&[(0.0, 0.0), (200.0, 200.0)]);
        let policy = PlacementPolicy::default();
        let mut input = InputState::new();
        let mut interaction = Interaction::new();
        let t0 = Instant::now();
        let at = Point::new(220.0, 220.0);

        let events = [
            PointerEvent::Down { position: at, button: MouseButton::Left, kind: PointerKind::Mouse },
            PointerEvent::Up { position: at, button: MouseButton::Left, kind: PointerKind::Mouse },
            PointerEvent::Down { position: at, button: MouseButton::Left, kind: PointerKind::Mouse },
        ];
        let mut outcomes = Vec::new();
        for (i, event) in events.iter().enumerate() {
            input.handle_pointer_event_at(*event, t0 + Duration::from_millis(100 * i as u64));
            outcomes.push(interaction.handle_pointer_event(&mut board, &policy, &input, event));
        }

        assert!(matches!(outcomes[0], Some(InteractionOutcome::Grabbed(id)) if id == ids[1]));
        assert!(outcomes[1].is_none());
        assert!(matches!(&outcomes[2], Some(InteractionOutcome::Deleted(s)) if s.id() == ids[1]));
        assert_eq!(board.z_order(), &[ids[0]]);
    }

    #[test]
    fn test_tap_deletes() {
        let (mut board, ids) = board_with(&[(100.0, 100.0)]);
        let policy = PlacementPolicy::default();
        let mut input = InputState::new();
        let mut interaction = Interaction::new();
        let t0 = Instant::now();
        let at = Point::new(120.0, 120.0);

        let down = PointerEvent::Down { position: at, button: MouseButton::Left, kind: PointerKind::Touch };
        let up = PointerEvent::Up { position: at, button: MouseButton::Left, kind: PointerKind::Touch };

        input.handle_pointer_event_at(down, t0);
        interaction.handle_pointer_event(&mut board, &policy, &input, &down);
        input.handle_pointer_event_at(up, t0 + Duration::from_millis(90));
        let outcome = interaction.handle_pointer_event(&mut board, &policy, &input, &up);

        assert!(matches!(outcome, Some(InteractionOutcome::Deleted(s)) if s.id() == ids[0]));
        assert!(board.is_empty());
    }

    #[test]
    fn test_touch_drag_drops() {
        let (mut board, ids) = board_with(&[(0.0, 0.0)]);
        let policy = PlacementPolicy::default();
        let mut input = InputState::new();
        let mut interaction = Interaction::new();
        let t0 = Instant::now();

        let events = [
            PointerEvent::Down { position: Point::new(10.0, 10.0), button: MouseButton::Left, kind: PointerKind::Touch },
            PointerEvent::Move { position: Point::new(95.0, 52.0) },
            PointerEvent::Up { position: Point::new(95.0, 52.0), button: MouseButton::Left, kind: PointerKind::Touch },
        ];
        let mut last = None;
        for (i, event) in events.iter().enumerate() {
            input.handle_pointer_event_at(*event, t0 + Duration::from_millis(150 * i as u64));
            last = interaction.handle_pointer_event(&mut board, &policy, &input, event);
        }

        // origin (85, 42) -> (80, 40)
        assert!(matches!(last, Some(InteractionOutcome::Dropped { id, position })
            if id == ids[0] && position == Point::new(80.0, 40.0)));
    }

    #[test]
    fn test_tap_deletes_the_tapped_sticker_not_the_one_below() {
        // Top sticker at (0, 0) overlaps the one at (40, 40).
        let (mut board, ids) = board_with(&[(40.0, 40.0), (0.0, 0.0)]);
        let policy = PlacementPolicy::default();
        let mut input = InputState::new();
        let mut interaction = Interaction::new();
        let t0 = Instant::now();

        let events = [
            PointerEvent::Down { position: Point::new(58.0, 58.0), button: MouseButton::Left, kind: PointerKind::Touch },
            PointerEvent::Move { position: Point::new(63.0, 63.0) },
            PointerEvent::Up { position: Point::new(63.0, 63.0), button: MouseButton::Left, kind: PointerKind::Touch },
        ];
        let mut last = None;
        for (i, event) in events.iter().enumerate() {
            input.handle_pointer_event_at(*event, t0 + Duration::from_millis(40 * i as u64));
            last = interaction.handle_pointer_event(&mut board, &policy, &input, event);
        }

        assert!(matches!(&last, Some(InteractionOutcome::Deleted(s)) if s.id() == ids[1]));
        assert_eq!(board.z_order(), &[ids[0]]);
        assert_eq!(position(&board, ids[0]), Point::new(40.0, 40.0));
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_double_click_after_jitter_deletes_first_target() {
        let (mut board, ids) = board_with(&[(40.0, 40.0), (0.0, 0.0)]);
        let policy = PlacementPolicy::default();
        let mut input = InputState::new();
        let mut interaction = Interaction::new();
        let t0 = Instant::now();

        let events = [
            PointerEvent::Down { position: Point::new(58.0, 58.0), button: MouseButton::Left, kind: PointerKind::Mouse },
            PointerEvent::Move { position: Point::new(61.0, 61.0) },
            PointerEvent::Up { position: Point::new(61.0, 61.0), button: MouseButton::Left, kind: PointerKind::Mouse },
            PointerEvent::Down { position: Point::new(61.0, 61.0), button: MouseButton::Left, kind: PointerKind::Mouse },
        ];
        let mut outcomes = Vec::new();
        for (i, event) in events.iter().enumerate() {
            input.handle_pointer_event_at(*event, t0 + Duration::from_millis(60 * i as u64));
            outcomes.push(interaction.handle_pointer_event(&mut board, &policy, &input, event));
        }

        // The jittered first click snapped the top sticker back to (0, 0),
        // leaving the lower sticker under the pointer.
        assert!(matches!(outcomes[2], Some(InteractionOutcome::Dropped { id, .. }) if id == ids[1]));
        assert_eq!(board.sticker_at(Point::new(61.0, 61.0)), Some(ids[0]));
        assert!(matches!(&outcomes[3], Some(InteractionOutcome::Deleted(s)) if s.id() == ids[1]));
        assert_eq!(board.z_order(), &[ids[0]]);
    }

    #[test]
    fn test_double_click_on_empty_board_deletes_nothing() {
        let (mut board, _) = board_with(&[(300.0, 300.0)]);
        let policy = PlacementPolicy::default();
        let mut input = InputState::new();
        let mut interaction = Interaction::new();
        let t0 = Instant::now();
        let at = Point::new(10.0, 10.0);

        let events = [
            PointerEvent::Down { position: at, button: MouseButton::Left, kind: PointerKind::Mouse },
            PointerEvent::Up { position: at, button: MouseButton::Left, kind: PointerKind::Mouse },
            PointerEvent::Down { position: at, button: MouseButton::Left, kind: PointerKind::Mouse },
        ];
        for (i, event) in events.iter().enumerate() {
            input.handle_pointer_event_at(*event, t0 + Duration::from_millis(100 * i as u64));
            assert!(interaction.handle_pointer_event(&mut board, &policy, &input, event).is_none());
        }
        assert_eq!(board.len(), 1);
    }
}
