//! Sticker Canvas Studio application
//!
//! Windowing, input routing, UI panels, toasts and PNG export around the
//! sticker board.

mod app;
mod event_handler;
mod export;
mod notifications;
mod ui;
mod web;

pub use app::{App, AppConfig, AppEvent};
pub use event_handler::EventHandler;
pub use export::{ExportError, encode_png, export_file_name, png_data_url};
pub use notifications::{Notifications, Toast, ToastKind};
pub use ui::{UiAction, UiState, render_toasts, render_ui};
pub use web::{UrlParams, parse_params};

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
