//! Stickerboard Render Library
//!
//! Renderer abstraction and implementations for the sticker board.
//! The default implementation uses Vello for GPU-accelerated rendering.

pub mod glyph;
mod renderer;
pub mod shadow;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use glyph::{DEFAULT_FONT_CANDIDATES, FontRasterizer, default_rasterizer};
pub use renderer::{BoardBackground, GridOverlay, RenderContext, Renderer};
pub use shadow::{ShadowImage, ShadowStyle};

#[cfg(target_arch = "wasm32")]
pub use glyph::CanvasRasterizer;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{PngRenderResult, VelloRenderer};
