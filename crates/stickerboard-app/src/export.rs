//! PNG export of the board.
//!
//! The export scene is rendered offscreen, read back from the GPU, encoded
//! with `png` and then saved through a file dialog (native) or downloaded as
//! a data URL (web).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use stickerboard_render::PngRenderResult;
use thiserror::Error;
use vello::peniko::Color;
use vello::{AaConfig, RenderParams, Scene};

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("failed to render export scene: {0}")]
    Render(String),
    #[error("failed to map readback buffer")]
    Map,
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("failed to write file: {0}")]
    Write(#[from] std::io::Error),
}

/// wgpu requires buffer rows to be multiples of this many bytes.
const ROW_ALIGNMENT: u32 = 256;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u128 {
    #[cfg(target_arch = "wasm32")]
    use web_time::{SystemTime, UNIX_EPOCH};
    #[cfg(not(target_arch = "wasm32"))]
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Name of the downloaded file for a given timestamp.
pub fn export_file_name(millis: u128) -> String {
    format!("sticker-canvas-{millis}.png")
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}

/// `data:` URL for PNG bytes.
pub fn png_data_url(png_data: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_data))
}

fn padded_bytes_per_row(width: u32) -> u32 {
    (width * 4).next_multiple_of(ROW_ALIGNMENT)
}

/// Copy tightly packed rows out of a padded readback buffer.
fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let row_len = (width * 4) as usize;
    let mut rgba_data = Vec::with_capacity(row_len * height as usize);
    for row in data.chunks(bytes_per_row as usize).take(height as usize) {
        rgba_data.extend_from_slice(&row[..row_len.min(row.len())]);
    }
    rgba_data
}

fn export_params(width: u32, height: u32) -> RenderParams {
    RenderParams {
        base_color: Color::WHITE,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    }
}

/// Offscreen target and readback buffer for one export.
struct Readback {
    buffer: vello::wgpu::Buffer,
    bytes_per_row: u32,
}

/// Render `scene` offscreen and queue a copy into a mappable buffer.
fn render_for_readback(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<Readback, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage { width, height });
    }

    let size = vello::wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("png export texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let texture_view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    vello_renderer
        .render_to_texture(device, queue, scene, &texture_view, &export_params(width, height))
        .map_err(|e| ExportError::Render(format!("{e:?}")))?;

    let bytes_per_row = padded_bytes_per_row(width);
    let buffer = device.create_buffer(&vello::wgpu::BufferDescriptor {
        label: Some("png readback buffer"),
        size: (bytes_per_row * height) as u64,
        usage: vello::wgpu::BufferUsages::COPY_DST | vello::wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
        label: Some("png copy encoder"),
    });
    encoder.copy_texture_to_buffer(
        vello::wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: vello::wgpu::Origin3d::ZERO,
            aspect: vello::wgpu::TextureAspect::All,
        },
        vello::wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: vello::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        size,
    );
    queue.submit(std::iter::once(encoder.finish()));

    Ok(Readback { buffer, bytes_per_row })
}

fn read_mapped(readback: &Readback, width: u32, height: u32) -> PngRenderResult {
    let data = readback.buffer.slice(..).get_mapped_range();
    let rgba_data = strip_row_padding(&data, width, height, readback.bytes_per_row);
    drop(data);
    readback.buffer.unmap();
    PngRenderResult {
        rgba_data,
        width,
        height,
    }
}

/// Render a Vello scene to RGBA pixels (native version - blocking).
#[cfg(not(target_arch = "wasm32"))]
pub fn render_scene_to_png(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<PngRenderResult, ExportError> {
    let readback = render_for_readback(device, queue, vello_renderer, scene, width, height)?;

    let (tx, rx) = std::sync::mpsc::channel();
    readback
        .buffer
        .slice(..)
        .map_async(vello::wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
    let _ = device.poll(vello::wgpu::PollType::wait_indefinitely());

    match rx.recv() {
        Ok(Ok(())) => Ok(read_mapped(&readback, width, height)),
        _ => Err(ExportError::Map),
    }
}

/// Ask for a destination and write the PNG there. Returns the path written,
/// or `None` if the dialog was dismissed.
#[cfg(feature = "native")]
pub fn save_png(png_data: &[u8], file_name: &str) -> Result<Option<std::path::PathBuf>, ExportError> {
    let dialog = rfd::FileDialog::new()
        .set_title("Download PNG")
        .set_file_name(file_name)
        .add_filter("PNG Image", &["png"]);

    let Some(path) = dialog.save_file() else {
        return Ok(None);
    };
    std::fs::write(&path, png_data)?;
    log::info!("Exported PNG to: {:?}", path);
    Ok(Some(path))
}

#[cfg(target_arch = "wasm32")]
mod web_download {
    use std::cell::RefCell;

    thread_local! {
        static FINISHED_EXPORTS: RefCell<Vec<Result<String, String>>> = const { RefCell::new(Vec::new()) };
    }

    pub fn push_finished(result: Result<String, String>) {
        FINISHED_EXPORTS.with(|cell| cell.borrow_mut().push(result));
    }

    /// Exports that completed since the last call: file name or error text.
    pub fn take_finished_exports() -> Vec<Result<String, String>> {
        FINISHED_EXPORTS.with(|cell| std::mem::take(&mut *cell.borrow_mut()))
    }

    /// Click a temporary anchor pointing at `url`.
    pub fn download_url(url: &str, file_name: &str) -> Result<(), String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let anchor = document
            .create_element("a")
            .map_err(|e| format!("{e:?}"))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "not an anchor element")?;
        anchor.set_href(url);
        anchor.set_download(file_name);
        let body = document.body().ok_or("no body")?;
        body.append_child(&anchor).map_err(|e| format!("{e:?}"))?;
        anchor.click();
        anchor.remove();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_download::take_finished_exports;

/// Async PNG export for WASM - renders the scene and triggers a download
/// when the readback completes. The outcome is reported through
/// [`take_finished_exports`].
#[cfg(target_arch = "wasm32")]
pub fn spawn_png_export_async(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    scene: Scene,
    width: u32,
    height: u32,
    file_name: String,
) {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;

    let mut vello_renderer = match vello::Renderer::new(device, vello::RendererOptions::default()) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to create Vello renderer for export: {:?}", e);
            web_download::push_finished(Err(format!("{e:?}")));
            return;
        }
    };

    let readback = match render_for_readback(device, queue, &mut vello_renderer, &scene, width, height) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{e}");
            web_download::push_finished(Err(e.to_string()));
            return;
        }
    };

    let mapped = Arc::new(AtomicBool::new(false));
    let failed = Arc::new(AtomicBool::new(false));
    {
        let mapped = mapped.clone();
        let failed = failed.clone();
        readback
            .buffer
            .slice(..)
            .map_async(vello::wgpu::MapMode::Read, move |result| match result {
                Ok(()) => mapped.store(true, Ordering::SeqCst),
                Err(e) => {
                    log::error!("Buffer mapping failed: {:?}", e);
                    failed.store(true, Ordering::SeqCst);
                }
            });
    }

    wasm_bindgen_futures::spawn_local(async move {
        const MAX_FRAMES: u32 = 600;

        let mut frames = 0u32;
        while !mapped.load(Ordering::SeqCst) {
            frames += 1;
            if failed.load(Ordering::SeqCst) || frames >= MAX_FRAMES {
                web_download::push_finished(Err(ExportError::Map.to_string()));
                return;
            }
            // Mapping callbacks run on the browser task queue, so wait a frame.
            let promise = js_sys::Promise::new(&mut |resolve, _reject| {
                let Some(window) = web_sys::window() else {
                    let _ = resolve.call0(&JsValue::NULL);
                    return;
                };
                let closure = wasm_bindgen::closure::Closure::once_into_js(move || {
                    let _ = resolve.call0(&JsValue::NULL);
                });
                let _ = window.request_animation_frame(closure.unchecked_ref());
            });
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        }

        let pixels = read_mapped(&readback, width, height);
        let outcome = encode_png(&pixels.rgba_data, pixels.width, pixels.height)
            .map_err(|e| e.to_string())
            .and_then(|png_data| {
                log::info!("PNG export complete: {} bytes", png_data.len());
                web_download::download_url(&png_data_url(&png_data), &file_name)
            })
            .map(|()| file_name);
        web_download::push_finished(outcome);
    });
}
