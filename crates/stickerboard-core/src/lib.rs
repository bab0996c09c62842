//! Stickerboard Core Library
//!
//! Platform-agnostic sticker board model, placement and interaction logic.

pub mod board;
pub mod camera;
pub mod factory;
pub mod glyph;
pub mod input;
pub mod interaction;
pub mod placement;
pub mod snap;
pub mod sticker;

pub use board::{BOARD_HEIGHT, BOARD_WIDTH, StickerBoard};
pub use camera::Camera;
pub use factory::{FactoryResult, StickerFactory, StickerFailure, StickerReady};
pub use glyph::{GlyphError, GlyphImage, GlyphKey, GlyphRasterizer, UnavailableRasterizer};
pub use input::{InputState, MouseButton, PointerEvent, PointerKind};
pub use interaction::{DragState, Interaction, InteractionOutcome};
pub use placement::{COL_OPTIONS, Cell, GridConfig, GridError, PlacementPolicy, ROW_OPTIONS};
pub use snap::{GRID_SIZE, SnapMode, snap_to_cells};
pub use sticker::{STICKER_PRESETS, Sticker, StickerId, StickerPreset};
