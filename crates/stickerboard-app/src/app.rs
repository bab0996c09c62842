//! Core application state and lifecycle.

use std::path::PathBuf;
use std::sync::Arc;

use kurbo::{Point, Size};
use peniko::Color;
use stickerboard_core::{
    BOARD_HEIGHT, BOARD_WIDTH, Camera, FactoryResult, GridConfig, InteractionOutcome, MouseButton as BoardButton,
    PlacementPolicy, STICKER_PRESETS, StickerBoard, StickerFactory, StickerPreset,
};
use stickerboard_render::{BoardBackground, GridOverlay, RenderContext, Renderer, VelloRenderer, default_rasterizer};
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{CursorIcon, Window, WindowId};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use crate::event_handler::EventHandler;
use crate::export;
use crate::notifications::Notifications;
use crate::ui::{UiAction, UiState, render_toasts, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Initial window size in logical pixels (native only).
    pub width: u32,
    pub height: u32,
    pub board_size: Size,
    pub background_color: Color,
    pub board_background: BoardBackground,
    /// Pixel ratio used for PNG export.
    pub export_scale: f64,
    pub grid: GridConfig,
    /// Fonts tried in order for sticker glyphs. Empty means the built-in
    /// candidate list.
    pub font_paths: Vec<PathBuf>,
    pub presets: Vec<StickerPreset>,
    /// Minimum margin around the board in logical pixels.
    pub board_padding: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Sticker Canvas Studio".to_string(),
            width: 1280,
            height: 800,
            board_size: Size::new(BOARD_WIDTH, BOARD_HEIGHT),
            background_color: Color::from_rgba8(248, 250, 252, 255),
            board_background: BoardBackground::default(),
            export_scale: 2.0,
            grid: GridConfig::default(),
            font_paths: Vec::new(),
            presets: STICKER_PRESETS.to_vec(),
            board_padding: 24.0,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_board_size(mut self, size: Size) -> Self {
        self.board_size = size;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_board_background(mut self, background: BoardBackground) -> Self {
        self.board_background = background;
        self
    }

    /// Export pixel ratio; non-positive values fall back to 1.
    pub fn with_export_scale(mut self, scale: f64) -> Self {
        self.export_scale = if scale > 0.0 { scale } else { 1.0 };
        self
    }

    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_font_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.font_paths = paths;
        self
    }

    pub fn with_presets(mut self, presets: Vec<StickerPreset>) -> Self {
        self.presets = presets;
        self
    }
}

/// Events sent to the loop from async tasks.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub enum AppEvent {
    /// The web surface finished its async setup.
    SurfaceReady(Box<(vello::util::RenderContext, RenderSurface<'static>)>),
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    board_renderer: VelloRenderer,
    /// Converts the Rgba8Unorm vello target to the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // Board
    board: StickerBoard,
    camera: Camera,
    events: EventHandler,
    factory: StickerFactory,
    notifications: Notifications,
    cursor: CursorIcon,
    config: AppConfig,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    #[cfg(target_arch = "wasm32")]
    proxy: Option<winit::event_loop::EventLoopProxy<AppEvent>>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            proxy: None,
        }
    }

    /// Run the application with the default configuration.
    pub async fn run() {
        Self::run_with_config(AppConfig::default()).await;
    }

    /// Run the application.
    pub async fn run_with_config(config: AppConfig) {
        let event_loop = match EventLoop::<AppEvent>::with_user_event().build() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                log::error!("Failed to create event loop: {e}");
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            let mut app = App::with_config(config);
            app.proxy = Some(event_loop.create_proxy());
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = App::with_config(config);
            if let Err(e) = event_loop.run_app(&mut app) {
                log::error!("Event loop error: {e}");
            }
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let Some(render_cx) = self.render_cx.as_ref() else {
            log::error!("Surface ready without a render context");
            return;
        };
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = match vello::Renderer::new(device, RendererOptions::default()) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to create Vello renderer: {e:?}");
                return;
            }
        };

        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let rasterizer = default_rasterizer(&self.config.font_paths);

        log::info!(
            "Sticker canvas initialized - {}x{} surface, {}x{} board",
            surface.config.width,
            surface.config.height,
            self.config.board_size.width,
            self.config.board_size.height
        );

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            board_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::new(self.config.grid),
            board: StickerBoard::new(self.config.board_size),
            camera: Camera::new(),
            events: EventHandler::new(),
            factory: StickerFactory::new(rasterizer),
            notifications: Notifications::new(),
            cursor: CursorIcon::Default,
            config: self.config.clone(),
        };
        state.recenter();
        self.state = Some(state);
        self.pending_window = None;

        window.request_redraw();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn window_attributes(&self) -> Option<winit::window::WindowAttributes> {
        Some(
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
        )
    }

    /// Attach a full-viewport canvas to the page.
    #[cfg(target_arch = "wasm32")]
    fn window_attributes(&self) -> Option<winit::window::WindowAttributes> {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let web_window = web_sys::window()?;
        let document = web_window.document()?;

        if let Some(loading) = document.get_element_by_id("loading") {
            loading.remove();
        }

        let canvas = document
            .get_element_by_id("stickerboard-canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .or_else(|| {
                let parent = document.get_element_by_id("app").or_else(|| document.body().map(Into::into))?;
                let canvas = document.create_element("canvas").ok()?;
                canvas.set_id("stickerboard-canvas");
                parent.append_child(&canvas).ok()?;
                canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
            })?;

        let (width, height) = web_viewport_size(self.config.width, self.config.height);
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        for (property, value) in [
            ("width", "100%"),
            ("height", "100%"),
            ("display", "block"),
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("touch-action", "none"),
        ] {
            let _ = style.set_property(property, value);
        }
        log::info!("Canvas created: {width}x{height} physical pixels");

        Some(
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas)),
        )
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser viewport size in physical pixels.
#[cfg(target_arch = "wasm32")]
fn web_viewport_size(fallback_width: u32, fallback_height: u32) -> (u32, u32) {
    let Some(web_window) = web_sys::window() else {
        return (fallback_width, fallback_height);
    };
    let dpr = web_window.device_pixel_ratio();
    let width = web_window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_width as f64);
    let height = web_window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_height as f64);
    ((width * dpr) as u32, (height * dpr) as u32)
}

impl AppState {
    fn viewport_size(&self) -> Size {
        Size::new(self.surface.config.width as f64, self.surface.config.height as f64)
    }

    fn policy(&self) -> PlacementPolicy {
        self.ui_state.grid.policy()
    }

    fn grid_overlay(&self) -> GridOverlay {
        GridOverlay {
            visible: self.ui_state.grid.visible,
            policy: self.policy(),
        }
    }

    /// Fit the board in the middle of the window.
    fn recenter(&mut self) {
        self.camera.center_board(
            self.board.size(),
            self.viewport_size(),
            self.window.scale_factor(),
            self.config.board_padding,
        );
    }

    fn apply_outcome(&mut self, outcome: Option<InteractionOutcome>) {
        match outcome {
            Some(InteractionOutcome::Deleted(sticker)) => {
                log::info!("Deleted sticker {}", sticker.id());
                self.notifications.sticker_deleted();
            }
            Some(InteractionOutcome::Dropped { id, position }) => {
                log::debug!("Sticker {id} snapped to {position:?}");
            }
            _ => {}
        }
    }

    fn handle_action(&mut self, action: UiAction, render_cx: Option<&vello::util::RenderContext>) {
        if self.ui_state.apply_grid_action(action) {
            return;
        }
        match action {
            UiAction::AddSticker(preset) => {
                log::info!("Adding {} sticker", preset.label);
                self.factory.request(preset, self.window.scale_factor());
            }
            UiAction::DownloadPng => match render_cx {
                Some(render_cx) => self.download_png(render_cx),
                None => log::error!("Cannot export without a render context"),
            },
            _ => {}
        }
    }

    /// Render the board offscreen and hand the PNG to the platform.
    fn download_png(&mut self, render_cx: &vello::util::RenderContext) {
        let grid = self.grid_overlay();
        let (scene, width, height) = self.board_renderer.build_export_scene(
            &self.board,
            self.config.board_background,
            grid,
            self.config.export_scale,
        );
        let device_handle = &render_cx.devices[self.surface.dev_id];
        let file_name = export::export_file_name(export::now_millis());
        log::info!(
            "Exporting PNG at {}x scale: {width}x{height}",
            self.config.export_scale
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            let encoded = export::render_scene_to_png(
                &device_handle.device,
                &device_handle.queue,
                &mut self.vello_renderer,
                &scene,
                width,
                height,
            )
            .and_then(|image| export::encode_png(&image.rgba_data, image.width, image.height));

            match encoded {
                Ok(png_data) => self.save_png(&png_data, &file_name),
                Err(e) => log::error!("PNG export failed: {e}"),
            }
        }

        #[cfg(target_arch = "wasm32")]
        export::spawn_png_export_async(
            &device_handle.device,
            &device_handle.queue,
            scene,
            width,
            height,
            file_name,
        );
    }

    #[cfg(feature = "native")]
    fn save_png(&mut self, png_data: &[u8], file_name: &str) {
        match export::save_png(png_data, file_name) {
            Ok(Some(_)) => self.notifications.canvas_downloaded(),
            Ok(None) => log::info!("PNG export cancelled"),
            Err(e) => log::error!("PNG export failed: {e}"),
        }
    }

    fn update_cursor(&mut self) {
        let cursor = self.events.cursor(&self.board, &self.camera);
        if cursor != self.cursor {
            self.window.set_cursor(cursor);
            self.cursor = cursor;
        }
    }

    /// Draw the scene, blit it to the surface, then draw egui on top.
    fn present(
        &mut self,
        render_cx: &vello::util::RenderContext,
        scene: &Scene,
        egui_primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        pixels_per_point: f32,
    ) {
        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {e:?}");
                return;
            }
        };

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a storage-capable Rgba8Unorm target; the surface may be Bgra8Unorm.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view = render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = self
            .vello_renderer
            .render_to_texture(device, queue, scene, &render_texture_view, &params)
        {
            log::error!("Failed to render: {e:?}");
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static pass.
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
    }
}

/// Place a finished sticker or report why it could not be made.
fn apply_factory_result(
    board: &mut StickerBoard,
    policy: &PlacementPolicy,
    notifications: &mut Notifications,
    result: FactoryResult,
) {
    match result {
        Ok(ready) => {
            let label = ready.preset.label;
            let sticker = ready.into_sticker();
            let position = policy.initial_position(board, sticker.size());
            let id = board.add(sticker.at(position));
            log::info!("Added {label} sticker {id} at {position:?}");
            notifications.sticker_added(label);
        }
        Err(failure) => {
            log::error!("Failed to create {} sticker: {}", failure.preset.label, failure.error);
            notifications.sticker_failed();
        }
    }
}

fn board_button(button: MouseButton) -> Option<BoardButton> {
    match button {
        MouseButton::Left => Some(BoardButton::Left),
        MouseButton::Right => Some(BoardButton::Right),
        MouseButton::Middle => Some(BoardButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        let Some(window_attrs) = self.window_attributes() else {
            log::error!("Failed to prepare window attributes");
            event_loop.exit();
            return;
        };
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {width}x{height}");

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("Failed to create surface: {e:?}");
                    event_loop.exit();
                    return;
                }
            };
            self.finish_init(window, surface);
        }

        // On WASM, the surface arrives later as an AppEvent
        #[cfg(target_arch = "wasm32")]
        {
            let Some(proxy) = self.proxy.clone() else {
                log::error!("No event loop proxy for surface setup");
                return;
            };
            let (width, height) = web_viewport_size(width, height);
            self.pending_window = Some(window.clone());

            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Creating surface asynchronously...");
                let mut render_cx = vello::util::RenderContext::new();
                match render_cx
                    .create_surface(window, width, height, PresentMode::AutoVsync)
                    .await
                {
                    Ok(surface) => {
                        if proxy
                            .send_event(AppEvent::SurfaceReady(Box::new((render_cx, surface))))
                            .is_err()
                        {
                            log::error!("Event loop closed before the surface was ready");
                        }
                    }
                    Err(e) => log::error!("Failed to create surface: {e:?}"),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::SurfaceReady(ready) => {
                let (render_cx, surface) = *ready;
                let Some(window) = self.pending_window.take() else {
                    log::warn!("Surface ready without a pending window");
                    return;
                };
                log::info!("Surface created successfully");
                self.render_cx = Some(render_cx);
                self.finish_init(window, surface);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);

        // A drag that started on the board keeps the pointer even over panels.
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let board_has_pointer = !egui_wants_pointer || state.events.is_dragging();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.recenter();
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.recenter();
                state.window.request_redraw();
            }

            WindowEvent::Focused(false) | WindowEvent::CursorLeft { .. } => {
                state.events.cancel(&mut state.board);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = Point::new(position.x, position.y);
                let policy = state.policy();
                if board_has_pointer {
                    let outcome = state
                        .events
                        .pointer_moved(&mut state.board, &state.camera, &policy, point);
                    state.apply_outcome(outcome);
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let pressed = button_state == ElementState::Pressed;
                // Presses over panels belong to egui; releases always end a drag.
                if pressed && !board_has_pointer {
                    return;
                }
                let Some(button) = board_button(button) else {
                    return;
                };
                let policy = state.policy();
                let outcome = state
                    .events
                    .mouse_button(&mut state.board, &state.camera, &policy, button, pressed);
                state.apply_outcome(outcome);
            }

            WindowEvent::Touch(touch) => {
                if !board_has_pointer {
                    return;
                }
                let point = Point::new(touch.location.x, touch.location.y);
                let policy = state.policy();
                let outcome = state.events.touch(
                    &mut state.board,
                    &state.camera,
                    &policy,
                    touch.id,
                    touch.phase,
                    point,
                );
                state.apply_outcome(outcome);
            }

            WindowEvent::RedrawRequested => {
                // Stickers whose glyphs finished since the last frame
                let policy = state.policy();
                for result in state.factory.poll() {
                    apply_factory_result(&mut state.board, &policy, &mut state.notifications, result);
                }

                #[cfg(target_arch = "wasm32")]
                for finished in export::take_finished_exports() {
                    match finished {
                        Ok(file_name) => {
                            log::info!("Downloaded {file_name}");
                            state.notifications.canvas_downloaded();
                        }
                        Err(e) => log::error!("PNG export failed: {e}"),
                    }
                }

                state.notifications.prune(Instant::now());

                let egui_input = state.egui_state.take_egui_input(&state.window);
                let busy = state.factory.in_flight() > 0;
                let board_size = state.board.size();
                let mut action = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    action = render_ui(ctx, &state.ui_state, &state.config.presets, busy, board_size);
                    render_toasts(ctx, &state.notifications);
                });

                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                if let Some(action) = action {
                    state.handle_action(action, self.render_cx.as_ref());
                }

                if board_has_pointer {
                    state.update_cursor();
                } else {
                    // egui set its own cursor
                    state.cursor = CursorIcon::Default;
                }

                let render_ctx = RenderContext::new(&state.board, &state.camera, state.viewport_size())
                    .with_scale_factor(state.window.scale_factor())
                    .with_background(state.config.background_color)
                    .with_board_background(state.config.board_background)
                    .with_grid(state.grid_overlay());
                state.board_renderer.build_scene(&render_ctx);
                let scene = state.board_renderer.take_scene();

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.present(
                    render_cx,
                    &scene,
                    &egui_primitives,
                    &egui_output.textures_delta,
                    egui_output.pixels_per_point,
                );
                state.events.end_frame();
                state.window.request_redraw();
            }

            _ => {}
        }
    }
}
