//! Reusable egui widget components with Tailwind-inspired styling.
//!
//! - **Buttons**: sticker buttons, option toggles, action buttons
//! - **Frames**: panel, header and toast frames
//! - **Layout**: section labels, separators

pub mod buttons;
pub mod frames;
pub mod layout;

pub use buttons::{ActionButton, OptionGroup, StickerButton, ToggleButton};
pub use frames::{ToastTone, header_frame, panel_frame, toast_frame};
pub use layout::{section_label, separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small button size
    pub const SMALL: f32 = 24.0;
    /// Sticker button size
    pub const STICKER: f32 = 56.0;
    /// Action button height
    pub const ACTION_HEIGHT: f32 = 36.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 6;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 12;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (gray-800)
    pub const TEXT: Color32 = Color32::from_rgb(31, 41, 55);
    /// Muted text color (gray-500)
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(107, 114, 128);
    /// Border color (gray-200)
    pub const BORDER: Color32 = Color32::from_rgb(229, 231, 235);
    /// Selection/active color (blue-500)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(243, 244, 246);
    /// Sticker button background (blue-50)
    pub const STICKER_BG: Color32 = Color32::from_rgb(239, 246, 255);
    /// Download button (green-500)
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
    /// Download button hover (green-600)
    pub const SUCCESS_HOVER: Color32 = Color32::from_rgb(22, 163, 74);
    /// Error accent (red-500)
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 250);
}
