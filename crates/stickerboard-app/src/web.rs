//! WebAssembly entry point and page URL parameters.

use stickerboard_core::{COL_OPTIONS, GridConfig, ROW_OPTIONS, SnapMode};

/// Grid settings seeded from the page URL, e.g. `?rows=4&cols=6&grid=off&snap=fixed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub grid_visible: Option<bool>,
    pub snap: Option<SnapMode>,
}

impl UrlParams {
    /// Apply the parsed values to `grid`.
    pub fn apply(&self, grid: &mut GridConfig) {
        if let Some(rows) = self.rows {
            if let Err(e) = grid.set_rows(rows) {
                log::warn!("Ignoring rows from URL: {e}");
            }
        }
        if let Some(cols) = self.cols {
            if let Err(e) = grid.set_cols(cols) {
                log::warn!("Ignoring cols from URL: {e}");
            }
        }
        if let Some(visible) = self.grid_visible {
            grid.visible = visible;
        }
        if let Some(mode) = self.snap {
            grid.mode = mode;
        }
    }
}

/// Parse grid parameters from a query string or hash.
///
/// Unknown keys are skipped; recognized keys with bad values are ignored
/// with a warning.
pub fn parse_params(s: &str) -> UrlParams {
    let s = s.trim_start_matches(['?', '#']);
    let mut params = UrlParams::default();

    for pair in s.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "rows" => params.rows = parse_option(key, value, &ROW_OPTIONS),
            "cols" => params.cols = parse_option(key, value, &COL_OPTIONS),
            "grid" => {
                params.grid_visible = match value {
                    "on" | "show" | "true" | "1" => Some(true),
                    "off" | "hide" | "false" | "0" => Some(false),
                    _ => {
                        log::warn!("Ignoring grid={value:?} from URL");
                        None
                    }
                }
            }
            "snap" => {
                params.snap = match value {
                    "fixed" => Some(SnapMode::Fixed),
                    "slots" | "grid" => Some(SnapMode::Slots),
                    _ => {
                        log::warn!("Ignoring snap={value:?} from URL");
                        None
                    }
                }
            }
            _ => {}
        }
    }

    params
}

fn parse_option(key: &str, value: &str, allowed: &[u32]) -> Option<u32> {
    match value.parse::<u32>() {
        Ok(n) if allowed.contains(&n) => Some(n),
        _ => {
            log::warn!("Ignoring {key}={value:?} from URL, expected one of {allowed:?}");
            None
        }
    }
}

/// Read grid parameters from the page location (query first, then hash).
#[cfg(target_arch = "wasm32")]
pub fn get_url_params() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    let location = window.location();

    let mut params = UrlParams::default();
    for source in [location.hash(), location.search()].into_iter().flatten() {
        let parsed = parse_params(&source);
        params.rows = parsed.rows.or(params.rows);
        params.cols = parsed.cols.or(params.cols);
        params.grid_visible = parsed.grid_visible.or(params.grid_visible);
        params.snap = parsed.snap.or(params.snap);
    }
    params
}

/// Initialize and run the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }

    log::info!("Starting Stickerboard (WASM)");

    let params = get_url_params();
    if params != UrlParams::default() {
        log::info!("Grid settings from URL: {params:?}");
    }
    let mut config = crate::AppConfig::default();
    params.apply(&mut config.grid);

    crate::App::run_with_config(config).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_query() {
        let params = parse_params("?rows=4&cols=6&grid=off&snap=fixed");
        assert_eq!(
            params,
            UrlParams {
                rows: Some(4),
                cols: Some(6),
                grid_visible: Some(false),
                snap: Some(SnapMode::Fixed),
            }
        );
    }

    #[test]
    fn test_out_of_range_values_are_ignored() {
        let params = parse_params("#rows=9&cols=abc&grid=maybe&snap=diagonal");
        assert_eq!(params, UrlParams::default());
    }

    #[test]
    fn test_unknown_keys_and_empty() {
        assert_eq!(parse_params(""), UrlParams::default());
        assert_eq!(parse_params("?room=abc&flag"), UrlParams::default());
    }

    #[test]
    fn test_apply_to_grid() {
        let mut grid = GridConfig::default();
        parse_params("rows=3&snap=fixed").apply(&mut grid);
        assert_eq!((grid.rows(), grid.cols()), (3, 7));
        assert_eq!(grid.mode, SnapMode::Fixed);
        assert!(grid.visible);
    }
}
