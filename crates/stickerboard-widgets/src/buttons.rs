//! Button components: sticker buttons, toggle buttons, option groups,
//! action buttons.

use egui::{Align2, Color32, CornerRadius, CursorIcon, FontId, Sense, Stroke, StrokeKind, Ui, vec2};

use crate::{sizing, theme};

/// A square button showing a sticker glyph.
pub struct StickerButton<'a> {
    glyph: &'a str,
    tooltip: &'a str,
    size: f32,
    busy: bool,
}

impl<'a> StickerButton<'a> {
    /// Create a new sticker button.
    pub fn new(glyph: &'a str, tooltip: &'a str) -> Self {
        Self {
            glyph,
            tooltip,
            size: sizing::STICKER,
            busy: false,
        }
    }

    /// Set the button side length.
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Dim the button while a sticker of this kind is being prepared.
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(vec2(self.size, self.size), Sense::click());

        if ui.is_rect_visible(rect) {
            let hovered = response.hovered();
            let rect = if hovered { rect.expand(1.5) } else { rect };
            let bg_color = if hovered {
                Color32::from_rgb(219, 234, 254) // blue-100
            } else {
                theme::STICKER_BG
            };
            let border = if hovered { theme::ACCENT } else { theme::BORDER };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                Stroke::new(1.0, border),
                StrokeKind::Inside,
            );

            let text_color = if self.busy {
                Color32::from_gray(170)
            } else {
                theme::TEXT
            };
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.glyph,
                FontId::proportional(self.size * 0.55),
                text_color,
            );
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A toggle button with text label.
/// Uses solid blue background when selected.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    min_width: Option<f32>,
    height: f32,
    font_size: f32,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            min_width: None,
            height: sizing::SMALL,
            font_size: 12.0,
        }
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the button height.
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(self.font_size);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let text_width = galley.size().x;
        let width = self.min_width.unwrap_or(0.0).max(text_width + 16.0);

        let (rect, response) = ui.allocate_exact_size(vec2(width, self.height), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::ACCENT
            } else if response.hovered() {
                Color32::from_gray(229)
            } else {
                theme::HOVER_BG
            };
            let text_color = if self.selected {
                Color32::WHITE
            } else {
                theme::TEXT
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A row of toggle buttons, one per option, with the current one selected.
pub struct OptionGroup<'a, T: Copy + PartialEq> {
    options: &'a [(T, String)],
    current: T,
    min_width: f32,
}

impl<'a, T: Copy + PartialEq> OptionGroup<'a, T> {
    pub fn new(options: &'a [(T, String)], current: T) -> Self {
        Self {
            options,
            current,
            min_width: 32.0,
        }
    }

    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width;
        self
    }

    /// Show the group and return the option clicked, if it differs from the
    /// current one.
    pub fn show(self, ui: &mut Ui) -> Option<T> {
        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            for (value, label) in self.options {
                let selected = *value == self.current;
                if ToggleButton::new(label, selected).min_width(self.min_width).show(ui) && !selected {
                    picked = Some(*value);
                }
            }
        });
        picked
    }
}

/// A full-width solid button for the main action of a panel.
pub struct ActionButton<'a> {
    label: &'a str,
    fill: Color32,
    hover_fill: Color32,
    enabled: bool,
}

impl<'a> ActionButton<'a> {
    /// Create a green action button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            fill: theme::SUCCESS,
            hover_fill: theme::SUCCESS_HOVER,
            enabled: true,
        }
    }

    /// Disable the button (drawn grayed out, never clicked).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(ui.available_width(), sizing::ACTION_HEIGHT);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if !self.enabled {
                Color32::from_gray(200)
            } else if response.hovered() {
                self.hover_fill
            } else {
                self.fill
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.label,
                FontId::proportional(14.0),
                Color32::WHITE,
            );
        }

        let clicked = self.enabled && response.clicked();
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}
