//! UI components using egui.

use egui::{Align2, Color32, Context, RichText, Vec2};
use kurbo::Size;
use stickerboard_core::{COL_OPTIONS, GridConfig, ROW_OPTIONS, SnapMode, StickerPreset};
use stickerboard_widgets::{
    ActionButton, OptionGroup, StickerButton, ToastTone, ToggleButton, header_frame, panel_frame,
    section_label, separator, sizing, theme, toast_frame,
};

use crate::notifications::{Notifications, ToastKind};

const MARGIN: f32 = 16.0;
const PANEL_WIDTH: f32 = 200.0;

/// Actions that can be triggered from the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    AddSticker(StickerPreset),
    ToggleGrid,
    SetRows(u32),
    SetCols(u32),
    SetSnapMode(SnapMode),
    DownloadPng,
}

/// UI state that persists across frames.
#[derive(Debug, Clone)]
pub struct UiState {
    pub grid: GridConfig,
    row_options: Vec<(u32, String)>,
    col_options: Vec<(u32, String)>,
    mode_options: Vec<(SnapMode, String)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl UiState {
    pub fn new(grid: GridConfig) -> Self {
        let labels = |options: &[u32]| options.iter().map(|n| (*n, n.to_string())).collect();
        Self {
            grid,
            row_options: labels(&ROW_OPTIONS),
            col_options: labels(&COL_OPTIONS),
            mode_options: [SnapMode::Fixed, SnapMode::Slots]
                .into_iter()
                .map(|mode| (mode, mode.label().to_string()))
                .collect(),
        }
    }

    /// Apply a grid settings action. Returns false for actions the app
    /// handles itself.
    pub fn apply_grid_action(&mut self, action: UiAction) -> bool {
        match action {
            UiAction::ToggleGrid => self.grid.toggle_visible(),
            UiAction::SetRows(rows) => {
                if let Err(e) = self.grid.set_rows(rows) {
                    log::warn!("{e}");
                }
            }
            UiAction::SetCols(cols) => {
                if let Err(e) = self.grid.set_cols(cols) {
                    log::warn!("{e}");
                }
            }
            UiAction::SetSnapMode(mode) => self.grid.mode = mode,
            UiAction::AddSticker(_) | UiAction::DownloadPng => return false,
        }
        log::debug!("grid settings: {:?}", self.grid);
        true
    }
}

/// Render all UI and return any triggered action.
///
/// `busy` dims the sticker buttons while glyphs are being prepared.
pub fn render_ui(
    ctx: &Context,
    ui_state: &UiState,
    presets: &[StickerPreset],
    busy: bool,
    board_size: Size,
) -> Option<UiAction> {
    render_header(ctx);
    let sticker_action = render_sticker_panel(ctx, presets, busy);
    let grid_action = render_grid_panel(ctx, ui_state);
    let bottom_action = render_bottom_bar(ctx, ui_state, board_size);

    sticker_action.or(grid_action).or(bottom_action)
}

fn render_header(ctx: &Context) {
    egui::Area::new(egui::Id::new("header"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, MARGIN))
        .interactable(false)
        .show(ctx, |ui| {
            header_frame().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("Sticker Canvas Studio")
                            .size(26.0)
                            .strong()
                            .color(theme::TEXT),
                    );
                    ui.label(
                        RichText::new("Create, drag, and design with fun stickers! Double-click to delete.")
                            .size(13.0)
                            .color(theme::TEXT_MUTED),
                    );
                });
            });
        });
}

fn render_sticker_panel(ctx: &Context, presets: &[StickerPreset], busy: bool) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("stickers"))
        .anchor(Align2::LEFT_CENTER, Vec2::new(MARGIN, 0.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 8.0);
                    section_label(ui, "Stickers");
                    for preset in presets {
                        let tooltip = format!("Add {} sticker", preset.label);
                        if StickerButton::new(preset.glyph, &tooltip)
                            .size(sizing::STICKER)
                            .busy(busy)
                            .show(ui)
                        {
                            action = Some(UiAction::AddSticker(*preset));
                        }
                    }
                });
            });
        });

    action
}

fn render_grid_panel(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;
    let grid = &ui_state.grid;

    egui::Area::new(egui::Id::new("grid_settings"))
        .anchor(Align2::RIGHT_CENTER, Vec2::new(-MARGIN, 0.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(PANEL_WIDTH);
                ui.label(RichText::new("Grid Settings").size(14.0).strong().color(theme::TEXT));
                ui.add_space(6.0);

                let label = if grid.visible { "Hide Grid" } else { "Show Grid" };
                if ToggleButton::new(label, grid.visible)
                    .min_width(PANEL_WIDTH)
                    .height(28.0)
                    .show(ui)
                {
                    action = Some(UiAction::ToggleGrid);
                }
                ui.add_space(6.0);
                separator(ui);

                section_label(ui, "Snap");
                if let Some(mode) = OptionGroup::new(&ui_state.mode_options, grid.mode)
                    .min_width(96.0)
                    .show(ui)
                {
                    action = Some(UiAction::SetSnapMode(mode));
                }
                ui.add_space(6.0);

                // Rows and columns only matter for the slot grid.
                ui.add_enabled_ui(grid.mode == SnapMode::Slots, |ui| {
                    section_label(ui, "Rows");
                    if let Some(rows) = OptionGroup::new(&ui_state.row_options, grid.rows()).show(ui) {
                        action = Some(UiAction::SetRows(rows));
                    }
                    ui.add_space(6.0);
                    section_label(ui, "Columns");
                    if let Some(cols) = OptionGroup::new(&ui_state.col_options, grid.cols()).show(ui) {
                        action = Some(UiAction::SetCols(cols));
                    }
                });
            });
        });

    action
}

fn render_bottom_bar(ctx: &Context, ui_state: &UiState, board_size: Size) -> Option<UiAction> {
    let mut action = None;
    let snap_hint = ui_state.grid.policy().describe(board_size);

    egui::Area::new(egui::Id::new("bottom_bar"))
        .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -MARGIN))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_width(220.0);
                if ActionButton::new("⬇ Download PNG").show(ui) {
                    action = Some(UiAction::DownloadPng);
                }
            });
            ui.add_space(10.0);
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 14.0;
                    for hint in [
                        "👆 Click stickers to add them",
                        "✋ Drag to move around",
                        "✖ Double-click to delete",
                    ] {
                        ui.label(RichText::new(hint).size(12.0).color(theme::TEXT_MUTED));
                    }
                    ui.label(RichText::new(format!("▦ {snap_hint}")).size(12.0).color(theme::ACCENT));
                });
            });
        });

    action
}

/// Draw queued toasts in the bottom-right corner, newest at the bottom.
pub fn render_toasts(ctx: &Context, notifications: &Notifications) {
    if notifications.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-MARGIN, -MARGIN))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 8.0;
            for toast in notifications.iter() {
                let tone = match toast.kind {
                    ToastKind::Success => ToastTone::Success,
                    ToastKind::Error => ToastTone::Error,
                };
                toast_frame(tone).show(ui, |ui| {
                    ui.set_min_width(240.0);
                    ui.label(RichText::new(&toast.title).size(13.0).strong().color(tone.accent()));
                    if let Some(description) = &toast.description {
                        ui.label(RichText::new(description).size(12.0).color(Color32::from_gray(90)));
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickerboard_core::STICKER_PRESETS;

    #[test]
    fn test_grid_actions_update_state() {
        let mut state = UiState::default();
        assert!(state.grid.visible);

        assert!(state.apply_grid_action(UiAction::ToggleGrid));
        assert!(!state.grid.visible);

        assert!(state.apply_grid_action(UiAction::SetRows(3)));
        assert!(state.apply_grid_action(UiAction::SetCols(8)));
        assert_eq!((state.grid.rows(), state.grid.cols()), (3, 8));

        assert!(state.apply_grid_action(UiAction::SetSnapMode(SnapMode::Fixed)));
        assert_eq!(state.grid.mode, SnapMode::Fixed);
    }

    #[test]
    fn test_zero_rows_are_ignored() {
        let mut state = UiState::default();
        state.apply_grid_action(UiAction::SetRows(0));
        assert_eq!(state.grid.rows(), 5);
    }

    #[test]
    fn test_app_actions_pass_through() {
        let mut state = UiState::default();
        assert!(!state.apply_grid_action(UiAction::DownloadPng));
        assert!(!state.apply_grid_action(UiAction::AddSticker(STICKER_PRESETS[0])));
    }

    #[test]
    fn test_option_labels() {
        let state = UiState::default();
        let rows: Vec<&str> = state.row_options.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(rows, ["3", "4", "5", "6"]);
        assert_eq!(state.mode_options[0].1, "Fixed 40px");
    }

    #[test]
    fn test_render_without_input_has_no_action() {
        let ctx = Context::default();
        let state = UiState::default();
        let mut notifications = Notifications::new();
        notifications.canvas_downloaded();

        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &state, &STICKER_PRESETS, false, Size::new(600.0, 400.0));
            render_toasts(ctx, &notifications);
        });
        assert!(action.is_none());
    }
}
