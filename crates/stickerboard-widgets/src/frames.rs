//! Frames for floating panels and toasts.

use egui::{Color32, CornerRadius, Frame, Margin, Stroke};

use crate::{sizing, theme};

/// Create a standard panel frame with shadow.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 12,
            offset: [0, 4],
            color: Color32::from_black_alpha(18),
        })
        .inner_margin(Margin::same(12))
}

/// Frame for the title block: no fill, just spacing.
pub fn header_frame() -> Frame {
    Frame::new().inner_margin(Margin::symmetric(8, 4))
}

/// Toast accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTone {
    Success,
    Error,
}

impl ToastTone {
    pub fn accent(self) -> Color32 {
        match self {
            ToastTone::Success => theme::SUCCESS,
            ToastTone::Error => theme::DANGER,
        }
    }
}

/// Toast card with a colored left edge.
pub fn toast_frame(tone: ToastTone) -> Frame {
    Frame::new()
        .fill(Color32::WHITE)
        .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
        .stroke(Stroke::new(1.0, tone.accent()))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(20),
        })
        .inner_margin(Margin::symmetric(14, 10))
}
