//! wgpu-backed variants: `VulkanBatched` (one submission per frame through
//! the [`FrameEngine`]) and `OpenGLImmediate` (every primitive flushed to the
//! back buffer as it is drawn).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::Window;

use crate::batch::VertexBatch;
use crate::config::{BackendKind, RendererConfig};
use crate::coords::Extent;
use crate::device::{Gpu, WindowSurface};
use crate::draw::geometry::GL_ARC_SEGMENTS;
use crate::draw::Encoder;
use crate::error::{BackendError, FrameError, ImageError};
use crate::frame::{FrameEngine, FrameOutcome};
use crate::input::Event;
use crate::render::{
    FrameBuffers, GpuFence, GpuTexture, ImmediateState, ImmediateTarget, SharedResources, WgpuFrame,
};
use crate::resources::{ImageData, TextureId, TextureStore};
use crate::text::GlyphCache;
use crate::time::TimerId;

use super::common::{Core, HasCore};
use super::platform;
use super::runtime::Runtime;
use super::windows::{WindowSlots, WindowState};
use super::{Backend, Callbacks, CursorKind, FileFilter, TimerCallback, WindowId};

#[self_referencing]
pub(super) struct NativeWindow {
    window: Window,

    #[borrows(window)]
    #[covariant]
    surface: WindowSurface<'this>,
}

/// GPU side of a realized window.
pub(super) struct GpuWindow {
    pub native: NativeWindow,
    pub engine: FrameEngine<GpuFence>,
    pub buffers: FrameBuffers,
    pub serial: u64,
    pub immediate: ImmediateState,
}

pub struct GpuBackend {
    pub(super) core: Core,
    mode: BackendKind,
    gpu: Option<Gpu>,
    shared: Option<SharedResources>,
    textures: TextureStore<GpuTexture>,
    pub(super) windows: WindowSlots<GpuWindow>,
    /// Created through the interface but not yet backed by an OS window;
    /// realized as soon as an event loop is active.
    pending: Vec<WindowId>,
    pub(super) by_native: HashMap<winit::window::WindowId, WindowId>,
    cursor: CursorKind,
}

impl GpuBackend {
    /// `config.backend` selects batched or immediate submission; the panel
    /// variant is treated as batched.
    pub fn new(config: RendererConfig) -> Self {
        let mode = match config.backend {
            BackendKind::OpenGLImmediate => BackendKind::OpenGLImmediate,
            _ => BackendKind::VulkanBatched,
        };
        Self {
            core: Core::new(config),
            mode,
            gpu: None,
            shared: None,
            textures: TextureStore::new(),
            windows: WindowSlots::default(),
            pending: Vec::new(),
            by_native: HashMap::new(),
            cursor: CursorKind::default(),
        }
    }

    fn immediate(&self) -> bool {
        self.mode == BackendKind::OpenGLImmediate
    }

    /// Creates OS windows and swapchains for every pending window.
    pub(super) fn realize_pending(&mut self, event_loop: &ActiveEventLoop) {
        for id in std::mem::take(&mut self.pending) {
            if let Err(err) = self.realize(event_loop, id) {
                log::error!("create_window: window {id} could not be realized: {err:#}");
                self.windows.remove(id);
            }
        }
    }

    fn realize(&mut self, event_loop: &ActiveEventLoop, id: WindowId) -> anyhow::Result<()> {
        let (Some(gpu), Some(shared)) = (&self.gpu, &mut self.shared) else {
            return Err(BackendError::NotInitialized.into());
        };
        let Some(state) = self.windows.get_mut(id) else {
            // Destroyed before it was realized.
            return Ok(());
        };
        let config = &self.core.config;

        let attrs = Window::default_attributes()
            .with_title(state.title.clone())
            .with_inner_size(PhysicalSize::new(state.extent.width, state.extent.height))
            .with_visible(state.visible)
            .with_resizable(state.resizable)
            .with_decorations(state.decorated)
            .with_transparent(state.opacity < 1.0)
            .with_blur(state.blur);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        window.set_cursor(platform::cursor_icon(self.cursor));

        let size = window.inner_size();
        let extent = Extent::new(size.width, size.height);
        let native_id = window.id();

        let native = NativeWindowTryBuilder {
            window,
            surface_builder: |w| {
                gpu.create_surface(w).and_then(|surface| {
                    WindowSurface::new(gpu, surface, extent, &config.gpu).map_err(anyhow::Error::from)
                })
            },
        }
        .try_build()?;

        let format = native.borrow_surface().format();
        shared.ensure_pipelines(gpu, format);

        state.extent = extent;
        state.batch.mark_dirty();
        state.native = Some(GpuWindow {
            native,
            engine: FrameEngine::new(config.frames_in_flight, config.fence_timeout)
                .with_clear_color(platform::translucent_clear(config.clear_color, state.opacity)),
            buffers: FrameBuffers::new(
                gpu,
                shared.params_layout(),
                config.vertex_capacity,
                config.command_capacity,
            ),
            serial: 0,
            immediate: ImmediateState::default(),
        });
        self.by_native.insert(native_id, id);

        if let Some(gw) = &state.native {
            gw.native.with_window(|w| w.request_redraw());
        }
        log::info!("window {id} realized: {}x{} {format:?}", extent.width, extent.height);
        Ok(())
    }

    /// Updates `window`'s extent and swapchain after a resize.
    pub(super) fn resize(&mut self, window: WindowId, extent: Extent) {
        let Some(state) = self.windows.get_mut(window) else {
            return;
        };
        state.extent = extent;
        state.batch.mark_dirty();
        if let (Some(gpu), Some(gw)) = (&self.gpu, state.native.as_mut()) {
            gw.native.with_surface_mut(|surface| surface.resize(gpu, extent));
        }
    }

    /// Queues `event` on `window` and schedules a repaint.
    pub(super) fn push_event(&mut self, window: WindowId, event: &Event) {
        if let Some(state) = self.windows.get_mut(window) {
            state.events.push(event.clone());
        }
        self.request_redraw(window);
    }

    /// Waits until the GPU is done with `gw`, so it can be dropped.
    fn retire(&self, window: WindowId, gw: &mut GpuWindow) {
        let (Some(gpu), Some(shared)) = (&self.gpu, &self.shared) else {
            return;
        };
        let GpuWindow {
            native,
            engine,
            buffers,
            serial,
            ..
        } = gw;
        let idle = native.with_surface_mut(|surface| {
            let mut frame = WgpuFrame::new(gpu, shared, &self.textures, surface, buffers, serial);
            engine.wait_all(&mut frame)
        });
        if !idle {
            log::warn!("window {window}: destroyed with GPU work still pending");
        }
    }

    fn destroy(&mut self, window: WindowId) -> bool {
        self.pending.retain(|&id| id != window);
        let Some(mut state) = self.windows.remove(window) else {
            return false;
        };
        if let Some(mut gw) = state.native.take() {
            self.retire(window, &mut gw);
            let native_id = gw.native.with_window(|w| w.id());
            self.by_native.remove(&native_id);
        }
        log::debug!("window {window} destroyed");
        true
    }

    fn draw_with(
        &mut self,
        window: WindowId,
        op: &str,
        encode: impl FnOnce(&mut Encoder<'_>, Option<&GlyphCache>) -> Option<usize>,
    ) {
        if !self.core.ready(op) {
            return;
        }
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("{op}: {}", BackendError::UnknownWindow(window));
            return;
        };
        let drawn = encode(
            &mut Encoder::new(&mut state.batch, state.extent),
            self.core.glyphs.as_ref(),
        );
        if drawn.is_some() && self.immediate() {
            self.flush_immediate(window, op);
        }
    }

    fn flush_immediate(&mut self, window: WindowId, op: &str) {
        let (Some(gpu), Some(shared)) = (&self.gpu, &self.shared) else {
            return;
        };
        let Some(state) = self.windows.get_mut(window) else {
            return;
        };
        let WindowState {
            batch,
            native,
            opacity,
            ..
        } = state;
        let Some(gw) = native.as_mut() else {
            // Drawn once the window exists.
            return;
        };
        let GpuWindow {
            native, immediate, ..
        } = gw;
        let clear = platform::translucent_clear(self.core.config.clear_color, *opacity);
        let result = native.with_surface_mut(|surface| {
            ImmediateTarget {
                gpu,
                shared,
                textures: &self.textures,
                surface,
                state: immediate,
                clear,
            }
            .flush(batch)
        });
        match result {
            Ok(()) => {}
            Err(FrameError::ZeroExtent) => log::debug!("{op}: {}", BackendError::ZeroExtent(window)),
            Err(err) => log::warn!("{op}: window {window}: {err}"),
        }
    }

    fn upload(&mut self, op: &str, label: &str, decoded: Result<ImageData, ImageError>) -> Option<TextureId> {
        let (Some(gpu), Some(shared)) = (&self.gpu, &self.shared) else {
            log::warn!("{op}: {}", BackendError::NotInitialized);
            return None;
        };
        let max_dim = gpu.device().limits().max_texture_dimension_2d;
        match decoded.and_then(|image| image.ensure_fits(max_dim).map(|()| image)) {
            Ok(image) => {
                let texture = shared.create_texture(gpu, &image, label);
                let id = self.textures.insert(texture);
                log::debug!("{op}: {id:?} ({}x{}) from {label}", image.width, image.height);
                Some(id)
            }
            Err(err) => {
                log::error!("{op}: {}", BackendError::from(err));
                None
            }
        }
    }

    fn with_native(&self, window: WindowId, op: &str, f: impl FnOnce(&Window)) {
        match self.windows.get(window) {
            Some(state) => {
                if let Some(gw) = &state.native {
                    gw.native.with_window(f);
                }
            }
            None => log::warn!("{op}: {}", BackendError::UnknownWindow(window)),
        }
    }
}

impl HasCore for GpuBackend {
    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }
}

impl Backend for GpuBackend {
    fn kind(&self) -> BackendKind {
        self.mode
    }

    fn init(&mut self) -> anyhow::Result<()> {
        if self.core.initialized {
            return Ok(());
        }
        let backends = self.mode.wgpu_backends();
        let gpu = pollster::block_on(Gpu::new(backends, &self.core.config.gpu))
            .with_context(|| format!("{} backend: GPU initialization failed", self.mode))?;

        let mut shared = SharedResources::new(&gpu);
        self.core.load_glyphs();
        let max_dim = gpu.device().limits().max_texture_dimension_2d;
        match self.core.glyphs.as_ref().map(|g| g.atlas().ensure_fits(max_dim)) {
            Some(Ok(())) => {
                if let Some(glyphs) = &self.core.glyphs {
                    shared.upload_glyph_atlas(&gpu, glyphs.atlas());
                }
            }
            Some(Err(err)) => {
                log::error!("init: {}; text is disabled", BackendError::from(err));
                self.core.glyphs = None;
            }
            None => {}
        }

        self.gpu = Some(gpu);
        self.shared = Some(shared);
        self.core.initialized = true;
        log::info!("{} backend ready", self.mode);
        Ok(())
    }

    /// Runs the winit event loop. winit allows one event loop per process, so
    /// this can be called only once.
    fn run(&mut self) -> anyhow::Result<()> {
        if !self.core.initialized {
            bail!("run called before init");
        }
        if self.core.running {
            bail!("run called while the loop is already running");
        }
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        self.core.running = true;
        self.core.close_requested = false;
        let result = event_loop
            .run_app(&mut Runtime::new(self))
            .context("winit event loop terminated with error");
        self.core.running = false;
        result
    }

    fn cleanup(&mut self) {
        for id in self.windows.ids() {
            self.destroy(id);
        }
        if let Some(gpu) = &self.gpu {
            gpu.wait_idle(self.core.config.fence_timeout);
        }
        for (_, texture) in self.textures.drain() {
            texture.destroy();
        }
        self.shared = None;
        self.gpu = None;
        self.core.glyphs = None;
        self.core.initialized = false;
        log::info!("{} backend cleaned up", self.mode);
    }

    fn request_close(&mut self) {
        self.core.close_requested = true;
    }

    fn is_running(&self) -> bool {
        self.core.running
    }

    fn setup_callbacks(&mut self, callbacks: Callbacks) {
        self.core.callbacks = callbacks;
    }

    fn spawn_window(&mut self, title: &str, width: u32, height: u32, visible: bool) -> Option<WindowId> {
        if !self.core.ready("create_window") {
            return None;
        }
        let batch = VertexBatch::with_capacity(
            self.core.config.vertex_capacity,
            self.core.config.command_capacity,
        );
        let state = WindowState::new(title, Extent::new(width, height), batch, visible);
        let id = self.windows.insert(state);
        self.pending.push(id);
        log::debug!("create_window: {id} {title:?} {width}x{height}");
        Some(id)
    }

    fn make_window_visible(&mut self, window: WindowId, visible: bool) {
        if let Some(state) = self.windows.get_mut(window) {
            state.visible = visible;
        }
        self.with_native(window, "make_window_visible", |w| w.set_visible(visible));
    }

    fn make_window_resizable(&mut self, window: WindowId, resizable: bool) {
        if let Some(state) = self.windows.get_mut(window) {
            state.resizable = resizable;
        }
        self.with_native(window, "make_window_resizable", |w| w.set_resizable(resizable));
    }

    fn window_toggle_decorations(&mut self, window: WindowId, enable: bool) {
        if let Some(state) = self.windows.get_mut(window) {
            state.decorated = enable;
        }
        self.with_native(window, "window_toggle_decorations", |w| w.set_decorations(enable));
    }

    fn destroy_window_from_id(&mut self, window: WindowId) {
        if !self.destroy(window) {
            log::warn!("destroy_window_from_id: {}", BackendError::UnknownWindow(window));
        }
    }

    fn destroy_windows(&mut self) {
        for id in self.windows.ids() {
            self.destroy(id);
        }
    }

    fn active_window_count(&self) -> usize {
        self.windows.active_count()
    }

    fn total_window_count(&self) -> usize {
        self.windows.total_count()
    }

    fn make_window_transparent(&mut self, window: WindowId, blur_radius: u32, opacity: f32) {
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("make_window_transparent: {}", BackendError::UnknownWindow(window));
            return;
        };
        state.opacity = opacity.clamp(0.0, 1.0);
        state.blur = blur_radius > 0;
        state.batch.mark_dirty();

        let clear = platform::translucent_clear(self.core.config.clear_color, state.opacity);
        let (transparent, blur) = (state.opacity < 1.0, state.blur);
        if let Some(gw) = state.native.as_mut() {
            gw.engine.set_clear_color(clear);
            gw.native.with_window(|w| {
                w.set_transparent(transparent);
                w.set_blur(blur);
                w.request_redraw();
            });
        }
        log::debug!("make_window_transparent: {window} opacity {opacity} blur {blur_radius}");
    }

    fn get_win_dim(&self, window: WindowId) -> Option<(u32, u32)> {
        self.windows.get(window).map(|w| (w.extent.width, w.extent.height))
    }

    fn set_viewport(&mut self, window: WindowId, width: u32, height: u32) {
        if self.windows.get(window).is_none() {
            log::warn!("set_viewport: {}", BackendError::UnknownWindow(window));
            return;
        }
        self.resize(window, Extent::new(width, height));
    }

    fn request_redraw(&mut self, window: WindowId) {
        match self.windows.get_mut(window) {
            Some(state) => state.batch.mark_dirty(),
            None => {
                log::warn!("request_redraw: {}", BackendError::UnknownWindow(window));
                return;
            }
        }
        self.with_native(window, "request_redraw", |w| w.request_redraw());
    }

    fn get_win_framerate(&self, window: WindowId) -> f64 {
        self.windows.get(window).map_or(0.0, |w| w.frame_rate.fps())
    }

    fn fill_rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: u32,
        window: WindowId,
        rounded: bool,
        corner_radius: f32,
    ) {
        self.draw_with(window, "fill_rectangle", |enc, _| {
            enc.fill_rectangle(x, y, width, height, color, rounded, corner_radius)
        });
    }

    fn draw_rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: u32,
        thickness: f32,
        window: WindowId,
        rounded: bool,
        corner_radius: f32,
    ) {
        self.draw_with(window, "draw_rectangle", |enc, _| {
            enc.draw_rectangle(x, y, width, height, color, thickness, rounded, corner_radius)
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: u32, window: WindowId) {
        self.draw_with(window, "draw_line", |enc, _| enc.draw_line(x1, y1, x2, y2, color));
    }

    fn fill_arc(
        &mut self,
        xc: f32,
        yc: f32,
        width: f32,
        height: f32,
        angle_start: f32,
        angle_end: f32,
        color: u32,
        window: WindowId,
    ) {
        let immediate = self.immediate();
        self.draw_with(window, "fill_arc", |enc, _| {
            if immediate {
                enc.fill_arc_fan(xc, yc, width, height, angle_start, angle_end, color, GL_ARC_SEGMENTS)
            } else {
                enc.fill_arc(xc, yc, width, height, angle_start, angle_end, color)
            }
        });
    }

    fn draw_image(&mut self, texture: TextureId, x: f32, y: f32, width: f32, height: f32, window: WindowId) {
        if !self.textures.contains(texture) {
            log::warn!("draw_image: window {window}: {}", BackendError::UnknownTexture(texture));
            return;
        }
        self.draw_with(window, "draw_image", |enc, _| enc.draw_image(texture, x, y, width, height));
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: u32, font_size: f32, window: WindowId) {
        self.draw_with(window, "draw_text", |enc, glyphs| {
            enc.draw_text(glyphs?, text, x, y, color, font_size)
        });
    }

    fn get_text_width(&self, text: &str, font_size: f32) -> f32 {
        self.core.text_width(text, font_size)
    }

    fn get_text_height(&self, text: &str, font_size: f32) -> f32 {
        self.core.text_height(text, font_size)
    }

    fn load_image(&mut self, path: &Path) -> Option<TextureId> {
        let label = path.display().to_string();
        self.upload("load_image", &label, ImageData::from_path(path))
    }

    fn load_image_from_bin(&mut self, bytes: &[u8]) -> Option<TextureId> {
        self.upload("load_image_from_bin", "memory", ImageData::from_bytes(bytes))
    }

    /// Queued commands that still name the texture are skipped when drawn.
    fn unload_image(&mut self, texture: TextureId) {
        if self.textures.remove(texture).is_none() {
            log::warn!("unload_image: {}", BackendError::UnknownTexture(texture));
        }
    }

    fn create_timer(&mut self) -> Option<TimerId> {
        Some(self.core.create_timer())
    }

    fn set_timer_callback(&mut self, timer: TimerId, interval_ms: u64, callback: TimerCallback) {
        self.core.set_timer_callback(timer, interval_ms, callback);
    }

    fn stop_timer(&mut self, timer: TimerId) {
        self.core.stop_timer(timer);
    }

    fn destroy_timer(&mut self, timer: TimerId) {
        self.core.destroy_timer(timer);
    }

    fn get_events(&self, window: WindowId) -> Option<Event> {
        self.windows.get(window)?.events.latest().cloned()
    }

    fn reset_events(&mut self, window: WindowId) {
        if let Some(state) = self.windows.get_mut(window) {
            state.events.reset();
        }
    }

    fn get_platform_name(&self) -> &'static str {
        platform::platform_name()
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.cursor = cursor;
        let icon = platform::cursor_icon(cursor);
        for (_, state) in self.windows.iter_mut() {
            if let Some(gw) = &state.native {
                gw.native.with_window(|w| w.set_cursor(icon));
            }
        }
    }

    fn get_clipboard_text(&mut self) -> Option<String> {
        platform::clipboard_text()
    }

    fn set_clipboard_text(&mut self, text: &str) -> bool {
        platform::set_clipboard_text(text)
    }

    fn open_file_dialog(&mut self, start: Option<&Path>, filters: &[FileFilter]) -> Option<PathBuf> {
        platform::pick_file(start, filters)
    }

    fn render(&mut self, window: WindowId) {
        let (Some(gpu), Some(shared)) = (&self.gpu, &self.shared) else {
            log::warn!("render: {}", BackendError::NotInitialized);
            return;
        };
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("render: {}", BackendError::UnknownWindow(window));
            return;
        };
        let WindowState {
            batch,
            extent,
            frame_rate,
            native,
            opacity,
            ..
        } = state;
        let Some(gw) = native.as_mut() else {
            return;
        };
        let GpuWindow {
            native,
            engine,
            buffers,
            serial,
            immediate,
        } = gw;
        let extent = *extent;
        let clear = platform::translucent_clear(self.core.config.clear_color, *opacity);
        let textures = &self.textures;

        let outcome = if self.mode == BackendKind::OpenGLImmediate {
            native.with_surface_mut(|surface| {
                ImmediateTarget {
                    gpu,
                    shared,
                    textures,
                    surface,
                    state: immediate,
                    clear,
                }
                .present(batch)
            })
        } else {
            native.with_surface_mut(|surface| {
                if surface.take_rebuilt() {
                    engine.reset_image_tracking();
                }
                let mut frame = WgpuFrame::new(gpu, shared, textures, surface, buffers, serial);
                engine.render(&mut frame, batch, extent)
            })
        };

        match outcome {
            FrameOutcome::Presented => frame_rate.tick(Instant::now()),
            FrameOutcome::Skipped(err) => log::debug!("render: window {window} skipped a frame: {err}"),
            FrameOutcome::Idle => {}
        }
    }

    fn clear(&mut self, window: WindowId) {
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("clear: {}", BackendError::UnknownWindow(window));
            return;
        };
        state.batch.discard();
        if let Some(gw) = state.native.as_mut() {
            gw.immediate.request_clear();
        }
    }
}
