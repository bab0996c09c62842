//! Translates window pointer events into board interactions.

use kurbo::Point;
use stickerboard_core::{
    Camera, InputState, Interaction, InteractionOutcome, MouseButton, PlacementPolicy, PointerEvent,
    PointerKind, StickerBoard, StickerId,
};
use winit::event::TouchPhase;
use winit::window::CursorIcon;

/// Handles pointer events and translates them to board operations.
///
/// Positions come in as physical window pixels and are mapped through the
/// camera before hit testing.
#[derive(Debug, Default)]
pub struct EventHandler {
    input: InputState,
    interaction: Interaction,
    /// The one touch point being followed; other fingers are ignored.
    active_touch: Option<u64>,
    /// Last pointer position in window pixels.
    pointer_screen: Point,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// Reset per-frame input flags.
    pub fn end_frame(&mut self) {
        self.input.begin_frame();
    }

    fn dispatch(
        &mut self,
        board: &mut StickerBoard,
        policy: &PlacementPolicy,
        event: PointerEvent,
    ) -> Option<InteractionOutcome> {
        self.input.handle_pointer_event(event);
        self.interaction
            .handle_pointer_event(board, policy, &self.input, &event)
    }

    /// Handle cursor movement.
    pub fn pointer_moved(
        &mut self,
        board: &mut StickerBoard,
        camera: &Camera,
        policy: &PlacementPolicy,
        screen: Point,
    ) -> Option<InteractionOutcome> {
        self.pointer_screen = screen;
        let position = camera.screen_to_world(screen);
        self.dispatch(board, policy, PointerEvent::Move { position })
    }

    /// Handle a mouse button press or release at the last cursor position.
    pub fn mouse_button(
        &mut self,
        board: &mut StickerBoard,
        camera: &Camera,
        policy: &PlacementPolicy,
        button: MouseButton,
        pressed: bool,
    ) -> Option<InteractionOutcome> {
        if button != MouseButton::Left {
            return None;
        }
        let position = camera.screen_to_world(self.pointer_screen);
        let kind = PointerKind::Mouse;
        let event = if pressed {
            PointerEvent::Down { position, button, kind }
        } else {
            PointerEvent::Up { position, button, kind }
        };
        self.dispatch(board, policy, event)
    }

    /// Handle a touch event. Only the first finger down drives the board.
    pub fn touch(
        &mut self,
        board: &mut StickerBoard,
        camera: &Camera,
        policy: &PlacementPolicy,
        id: u64,
        phase: TouchPhase,
        screen: Point,
    ) -> Option<InteractionOutcome> {
        match phase {
            TouchPhase::Started if self.active_touch.is_none() => self.active_touch = Some(id),
            _ if self.active_touch != Some(id) => return None,
            _ => {}
        }

        self.pointer_screen = screen;
        let position = camera.screen_to_world(screen);
        let button = MouseButton::Left;
        let kind = PointerKind::Touch;
        match phase {
            TouchPhase::Started => self.dispatch(board, policy, PointerEvent::Down { position, button, kind }),
            TouchPhase::Moved => self.dispatch(board, policy, PointerEvent::Move { position }),
            TouchPhase::Ended => {
                self.active_touch = None;
                self.dispatch(board, policy, PointerEvent::Up { position, button, kind })
            }
            TouchPhase::Cancelled => {
                self.active_touch = None;
                self.cancel(board);
                None
            }
        }
    }

    /// Abort any drag in progress, returning the sticker to where it started.
    pub fn cancel(&mut self, board: &mut StickerBoard) -> Option<StickerId> {
        let id = self.interaction.cancel(board)?;
        self.input = InputState::new();
        log::debug!("drag of {id} cancelled");
        Some(id)
    }

    /// Cursor to show for the current pointer position.
    pub fn cursor(&self, board: &StickerBoard, camera: &Camera) -> CursorIcon {
        if self.interaction.is_dragging() {
            CursorIcon::Grabbing
        } else if board.sticker_at(camera.screen_to_world(self.pointer_screen)).is_some() {
            CursorIcon::Pointer
        } else {
            CursorIcon::Default
        }
    }
}
