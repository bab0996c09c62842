//! Input state management for mouse and touch events.

use kurbo::Point;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        kind: PointerKind,
    },
    Up {
        position: Point,
        button: MouseButton,
        kind: PointerKind,
    },
    Move {
        position: Point,
    },
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tap detection constants.
const TAP_TIME_MS: u128 = 300;
const TAP_DISTANCE: f64 = 8.0;

/// Tracks the current input state across frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
    /// Whether a double-click was detected this frame.
    double_click_detected: bool,
    /// When and where the current touch went down.
    touch_start: Option<(Instant, Point)>,
    /// Whether the last touch release was a tap.
    tap_detected: bool,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.double_click_detected = false;
        self.tap_detected = false;
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { position, button, kind } => {
                self.double_click_detected = false;
                self.tap_detected = false;
                if button == MouseButton::Left {
                    match kind {
                        PointerKind::Mouse => self.track_click(position, now),
                        PointerKind::Touch => self.touch_start = Some((now, position)),
                    }
                }
            }
            PointerEvent::Up { position, button, kind } => {
                if button == MouseButton::Left && kind == PointerKind::Touch {
                    if let Some((started, origin)) = self.touch_start.take() {
                        let elapsed = now.saturating_duration_since(started).as_millis();
                        self.tap_detected =
                            elapsed <= TAP_TIME_MS && origin.distance(position) <= TAP_DISTANCE;
                    }
                }
            }
            PointerEvent::Move { .. } => {}
        }
    }

    fn track_click(&mut self, position: Point, now: Instant) {
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time).as_millis();
            let distance = last_pos.distance(position);

            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                self.double_click_detected = true;
                // Reset so a triple click is not a second double click
                self.last_click_time = None;
                self.last_click_position = None;
                return;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
    }

    /// Check if the last press completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }

    /// Check if the last touch release was a tap.
    pub fn is_tap(&self) -> bool {
        self.tap_detected
    }
}
