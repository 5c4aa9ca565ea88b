//! `EmbeddedPanel` variant: software rasterization into an RGB888 canvas,
//! pushed to a small display as RGB565.
//!
//! Drawing is immediate: each primitive is rasterized as soon as it is
//! encoded, and arcs use a 36-slice fan. There is no windowing system, so
//! every window is a canvas of the configured panel size.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::bail;

use crate::batch::{Binding, VertexBatch};
use crate::config::{BackendKind, RendererConfig};
use crate::coords::{rgb_to_hex, Extent, Rgb};
use crate::draw::geometry::PANEL_ARC_SEGMENTS;
use crate::draw::Encoder;
use crate::error::{BackendError, ImageError};
use crate::input::Event;
use crate::raster::{draw_command, Canvas, Texels};
use crate::resources::{ImageData, TextureId, TextureStore};
use crate::text::GlyphCache;
use crate::time::TimerId;

use super::common::{dispatch_event, dispatch_redraw, fire_timers, Core, HasCore};
use super::windows::{WindowSlots, WindowState};
use super::{Backend, Callbacks, CursorKind, FileFilter, TimerCallback, WindowId};

/// Longest the run loop sleeps between timer checks.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Destination of finished panel frames.
pub trait PanelSink {
    /// One frame, RGB565, row-major, top row first.
    fn push_frame(&mut self, extent: Extent, pixels: &[u16]);
}

/// Keeps the last pushed frame in memory.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    pub frames: u64,
    pub extent: Extent,
    pub last: Vec<u16>,
}

impl CaptureSink {
    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.last
            .get(y as usize * self.extent.width as usize + x as usize)
            .copied()
    }
}

impl PanelSink for CaptureSink {
    fn push_frame(&mut self, extent: Extent, pixels: &[u16]) {
        self.frames += 1;
        self.extent = extent;
        self.last.clear();
        self.last.extend_from_slice(pixels);
    }
}

pub struct PanelBackend<S = CaptureSink> {
    core: Core,
    sink: S,
    windows: WindowSlots<Canvas>,
    textures: TextureStore<ImageData>,
    clipboard: String,
}

impl<S: PanelSink> PanelBackend<S> {
    pub fn new(config: RendererConfig, sink: S) -> Self {
        Self {
            core: Core::new(config),
            sink,
            windows: WindowSlots::default(),
            textures: TextureStore::new(),
            clipboard: String::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn canvas(&self, window: WindowId) -> Option<&Canvas> {
        self.windows.get(window)?.native.as_ref()
    }

    /// Feeds an input event (e.g. from a touch controller) to `window`.
    pub fn inject_event(&mut self, window: WindowId, event: Event) {
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("inject_event: {}", BackendError::UnknownWindow(window));
            return;
        };
        state.input.apply(&event);
        state.events.push(event.clone());
        state.batch.mark_dirty();
        dispatch_event(self, window, &event);
    }

    fn clear_hex(&self) -> u32 {
        let [r, g, b, _] = self.core.config.clear_color;
        rgb_to_hex(Rgb::new(r, g, b))
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
        encode(
            &mut Encoder::new(&mut state.batch, state.extent),
            self.core.glyphs.as_ref(),
        );
        if let Some(canvas) = state.native.as_mut() {
            rasterize(canvas, &mut state.batch, &self.textures, self.core.glyphs.as_ref());
        }
    }

    fn decode(&mut self, op: &str, decoded: Result<ImageData, ImageError>) -> Option<TextureId> {
        match decoded {
            Ok(image) => {
                let (w, h) = (image.width, image.height);
                let id = self.textures.insert(image);
                log::debug!("{op}: {id:?} ({w}x{h})");
                Some(id)
            }
            Err(err) => {
                log::error!("{op}: {}", BackendError::from(err));
                None
            }
        }
    }
}

/// Draws every queued command onto the canvas, then drops them from the
/// batch while keeping the window scheduled for presentation.
fn rasterize(
    canvas: &mut Canvas,
    batch: &mut VertexBatch,
    textures: &TextureStore<ImageData>,
    glyphs: Option<&GlyphCache>,
) {
    for (index, command) in batch.commands().iter().enumerate() {
        let texels = match command.binding {
            Binding::Solid => Texels::None,
            Binding::Texture(id) => match textures.get(id) {
                Some(image) => Texels::Image(image),
                None => {
                    log::warn!("panel: command {index} skipped: {}", BackendError::UnknownTexture(id));
                    continue;
                }
            },
            Binding::GlyphAtlas => match glyphs {
                Some(cache) => Texels::Coverage(cache.atlas()),
                None => continue,
            },
        };
        draw_command(canvas, batch.vertices(), command, texels);
    }
    batch.discard();
}

impl<S: PanelSink> HasCore for PanelBackend<S> {
    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }
}

impl<S: PanelSink> Backend for PanelBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::EmbeddedPanel
    }

    fn init(&mut self) -> anyhow::Result<()> {
        if self.core.initialized {
            return Ok(());
        }
        let extent = self.core.config.panel_extent;
        if !extent.is_valid() {
            bail!("panel extent {}x{} is empty", extent.width, extent.height);
        }
        self.core.load_glyphs();
        self.core.initialized = true;
        log::info!("panel backend ready ({}x{})", extent.width, extent.height);
        Ok(())
    }

    fn run(&mut self) -> anyhow::Result<()> {
        if !self.core.initialized {
            bail!("run called before init");
        }
        if self.core.running {
            bail!("run called while the loop is already running");
        }
        self.core.running = true;
        self.core.close_requested = false;

        while !self.core.close_requested && self.windows.active_count() > 0 {
            fire_timers(self, Instant::now());

            for id in self.windows.ids() {
                let dirty = self.windows.get(id).is_some_and(|w| w.batch.needs_redraw());
                if dirty {
                    dispatch_redraw(self, id);
                    self.render(id);
                }
            }

            let wait = self
                .core
                .timers
                .next_deadline()
                .map_or(IDLE_POLL, |at| at.saturating_duration_since(Instant::now()))
                .min(IDLE_POLL);
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
        }

        self.core.running = false;
        Ok(())
    }

    fn cleanup(&mut self) {
        self.windows.drain();
        self.textures.drain().for_each(drop);
        self.core.glyphs = None;
        self.core.initialized = false;
        log::info!("panel backend cleaned up");
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
        let extent = self.core.config.panel_extent;
        if (width, height) != (extent.width, extent.height) {
            log::debug!(
                "create_window: {width}x{height} requested, panel is {}x{}",
                extent.width,
                extent.height
            );
        }
        let batch = VertexBatch::with_capacity(
            self.core.config.vertex_capacity,
            self.core.config.command_capacity,
        );
        let mut state = WindowState::new(title, extent, batch, visible);
        state.native = Some(Canvas::new(extent, self.clear_hex()));
        let id = self.windows.insert(state);
        log::debug!("create_window: {id} {title:?}");
        Some(id)
    }

    fn make_window_visible(&mut self, window: WindowId, visible: bool) {
        match self.windows.get_mut(window) {
            Some(state) => state.visible = visible,
            None => log::warn!("make_window_visible: {}", BackendError::UnknownWindow(window)),
        }
    }

    fn make_window_resizable(&mut self, window: WindowId, resizable: bool) {
        match self.windows.get_mut(window) {
            Some(state) => state.resizable = resizable,
            None => log::warn!("make_window_resizable: {}", BackendError::UnknownWindow(window)),
        }
    }

    fn window_toggle_decorations(&mut self, window: WindowId, enable: bool) {
        match self.windows.get_mut(window) {
            Some(state) => state.decorated = enable,
            None => log::warn!("window_toggle_decorations: {}", BackendError::UnknownWindow(window)),
        }
    }

    fn destroy_window_from_id(&mut self, window: WindowId) {
        if self.windows.remove(window).is_none() {
            log::warn!("destroy_window_from_id: {}", BackendError::UnknownWindow(window));
        }
    }

    fn destroy_windows(&mut self) {
        self.windows.drain();
    }

    fn active_window_count(&self) -> usize {
        self.windows.active_count()
    }

    fn total_window_count(&self) -> usize {
        self.windows.total_count()
    }

    /// The panel has no compositor; the opacity is recorded but frames stay opaque.
    fn make_window_transparent(&mut self, window: WindowId, blur_radius: u32, opacity: f32) {
        match self.windows.get_mut(window) {
            Some(state) => {
                state.opacity = opacity.clamp(0.0, 1.0);
                state.blur = blur_radius > 0;
                log::warn!("panel: {}", BackendError::Unsupported("make_window_transparent"));
            }
            None => log::warn!("make_window_transparent: {}", BackendError::UnknownWindow(window)),
        }
    }

    fn get_win_dim(&self, window: WindowId) -> Option<(u32, u32)> {
        self.windows.get(window).map(|w| (w.extent.width, w.extent.height))
    }

    fn set_viewport(&mut self, window: WindowId, width: u32, height: u32) {
        let clear = self.clear_hex();
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("set_viewport: {}", BackendError::UnknownWindow(window));
            return;
        };
        state.extent = Extent::new(width, height);
        if let Some(canvas) = state.native.as_mut() {
            canvas.resize(state.extent, clear);
        }
        state.batch.mark_dirty();
    }

    fn request_redraw(&mut self, window: WindowId) {
        match self.windows.get_mut(window) {
            Some(state) => state.batch.mark_dirty(),
            None => log::warn!("request_redraw: {}", BackendError::UnknownWindow(window)),
        }
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
        self.draw_with(window, "fill_arc", |enc, _| {
            enc.fill_arc_fan(xc, yc, width, height, angle_start, angle_end, color, PANEL_ARC_SEGMENTS)
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
        self.decode("load_image", ImageData::from_path(path))
    }

    fn load_image_from_bin(&mut self, bytes: &[u8]) -> Option<TextureId> {
        self.decode("load_image_from_bin", ImageData::from_bytes(bytes))
    }

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
        "Embedded Panel"
    }

    fn set_cursor(&mut self, _cursor: CursorKind) {}

    fn get_clipboard_text(&mut self) -> Option<String> {
        Some(self.clipboard.clone())
    }

    fn set_clipboard_text(&mut self, text: &str) -> bool {
        self.clipboard = text.to_string();
        true
    }

    fn open_file_dialog(&mut self, _start: Option<&Path>, _filters: &[FileFilter]) -> Option<PathBuf> {
        log::warn!("panel: {}", BackendError::Unsupported("open_file_dialog"));
        None
    }

    fn render(&mut self, window: WindowId) {
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("render: {}", BackendError::UnknownWindow(window));
            return;
        };
        if !state.batch.needs_redraw() {
            return;
        }
        let Some(canvas) = state.native.as_mut() else {
            return;
        };
        // Anything queued before the canvas existed.
        if !state.batch.is_empty() {
            rasterize(canvas, &mut state.batch, &self.textures, self.core.glyphs.as_ref());
        }
        self.sink.push_frame(canvas.extent(), &canvas.to_rgb565());
        state.frame_rate.tick(Instant::now());
        state.batch.reset();
    }

    fn clear(&mut self, window: WindowId) {
        let clear = self.clear_hex();
        let Some(state) = self.windows.get_mut(window) else {
            log::warn!("clear: {}", BackendError::UnknownWindow(window));
            return;
        };
        if let Some(canvas) = state.native.as_mut() {
            canvas.clear(clear);
        }
        state.batch.discard();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::coords::rgb888_to_rgb565;

    const RED: u16 = 0xF800;
    const BLUE: u16 = 0x001F;

    fn backend(extent: Extent) -> PanelBackend {
        let mut config = RendererConfig::default().with_backend(BackendKind::EmbeddedPanel);
        config.panel_extent = extent;
        config.font = crate::text::FontSource::Bytes(Vec::new());
        let mut b = PanelBackend::new(config, CaptureSink::default());
        b.init().expect("panel init");
        b
    }

    fn png_4x4(rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba(rgba));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn top_left_quarter_is_red() {
        let mut b = backend(Extent::new(200, 200));
        let w = b.create_window("panel", 200, 200).expect("window");
        b.fill_rectangle(0.0, 0.0, 100.0, 100.0, 0xFF0000, w, false, 0.0);
        b.render(w);

        let sink = b.sink();
        assert_eq!(sink.frames, 1);
        assert_eq!(sink.pixel(0, 0), Some(RED));
        assert_eq!(sink.pixel(99, 99), Some(RED));
        assert_eq!(sink.pixel(100, 100), Some(rgb888_to_rgb565(0x1A1A1A)));
    }

    #[test]
    fn last_writer_wins() {
        let mut b = backend(Extent::new(100, 100));
        let w = b.create_window("panel", 100, 100).expect("window");
        b.fill_rectangle(10.0, 10.0, 50.0, 50.0, 0xFF0000, w, false, 0.0);
        b.fill_rectangle(30.0, 30.0, 50.0, 50.0, 0x0000FF, w, false, 0.0);
        b.render(w);

        assert_eq!(b.sink().pixel(40, 40), Some(BLUE));
        assert_eq!(b.sink().pixel(15, 15), Some(RED));
    }

    #[test]
    fn png_image_is_drawn() {
        let mut b = backend(Extent::new(32, 32));
        let w = b.create_window("panel", 32, 32).expect("window");
        let tex = b.load_image_from_bin(&png_4x4([0, 128, 255, 255])).expect("texture");
        b.draw_image(tex, 8.0, 8.0, 4.0, 4.0, w);

        let canvas = b.canvas(w).expect("canvas");
        assert_eq!(canvas.pixel(9, 9), Some(0x0080FF));
        assert_eq!(canvas.pixel(12, 12), Some(0x1A1A1A));
    }

    #[test]
    fn arcs_are_filled_with_a_fan() {
        let mut b = backend(Extent::new(64, 64));
        let w = b.create_window("panel", 64, 64).expect("window");
        b.fill_arc(32.0, 32.0, 40.0, 40.0, 0.0, 90.0, 0x00FF00, w);

        let canvas = b.canvas(w).expect("canvas");
        // 0..90 degrees sweeps the lower-right quadrant (pixel y grows downward).
        assert_eq!(canvas.pixel(40, 40), Some(0x00FF00));
        assert_eq!(canvas.pixel(24, 24), Some(0x1A1A1A));
    }

    #[test]
    fn invalid_ids_are_no_ops() {
        let mut b = backend(Extent::new(16, 16));
        let w = b.create_window("panel", 16, 16).expect("window");
        let tex = b.load_image_from_bin(&png_4x4([255; 4])).expect("texture");
        b.unload_image(tex);

        b.draw_image(tex, 0.0, 0.0, 4.0, 4.0, w);
        b.fill_rectangle(0.0, 0.0, 4.0, 4.0, 0xFFFFFF, WindowId(7), false, 0.0);
        assert_eq!(b.canvas(w).and_then(|c| c.pixel(0, 0)), Some(0x1A1A1A));
        assert!(b.load_image_from_bin(b"not an image").is_none());
    }

    #[test]
    fn transparency_keeps_panel_frames_opaque() {
        let mut b = backend(Extent::new(8, 8));
        let w = b.create_window("panel", 8, 8).expect("window");
        b.make_window_transparent(w, 4, 0.5);
        b.make_window_transparent(WindowId(9), 4, 0.5);
        b.fill_rectangle(0.0, 0.0, 8.0, 8.0, 0xFF0000, w, false, 0.0);
        b.render(w);

        assert_eq!(b.sink().pixel(3, 3), Some(RED));
        assert_eq!(b.get_platform_name(), "Embedded Panel");
    }

    #[test]
    fn drawing_before_init_is_ignored() {
        let mut b = PanelBackend::new(RendererConfig::default(), CaptureSink::default());
        assert!(b.create_window("w", 10, 10).is_none());
        b.fill_rectangle(0.0, 0.0, 1.0, 1.0, 0, WindowId(0), false, 0.0);
        assert_eq!(b.active_window_count(), 0);
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn clear_presents_the_clear_color() {
        let mut b = backend(Extent::new(8, 8));
        let w = b.create_window("panel", 8, 8).expect("window");
        b.fill_rectangle(0.0, 0.0, 8.0, 8.0, 0xFFFFFF, w, false, 0.0);
        b.render(w);
        assert_eq!(b.sink().frames, 1);

        b.render(w);
        assert_eq!(b.sink().frames, 1, "clean window renders nothing");

        b.clear(w);
        b.render(w);
        assert_eq!(b.sink().frames, 2);
        assert_eq!(b.sink().pixel(3, 3), Some(rgb888_to_rgb565(0x1A1A1A)));
    }

    #[test]
    fn windows_keep_their_ids() {
        let mut b = backend(Extent::new(8, 8));
        let a = b.create_window("a", 8, 8).expect("a");
        let c = b.spawn_window("c", 8, 8, false).expect("c");
        b.destroy_window_from_id(a);
        assert_eq!(b.active_window_count(), 1);
        assert_eq!(b.total_window_count(), 2);
        assert_eq!(b.get_win_dim(c), Some((8, 8)));
        assert_eq!(b.get_win_dim(a), None);
    }

    // ── run loop ──────────────────────────────────────────────────────────

    #[test]
    fn run_redraws_and_fires_timers_until_closed() {
        let mut b = backend(Extent::new(16, 16));
        let w = b.create_window("panel", 16, 16).expect("window");

        let redraws = Rc::new(Cell::new(0));
        let seen = redraws.clone();
        b.setup_callbacks(Callbacks {
            redraw: Some(Box::new(move |backend, id| {
                seen.set(seen.get() + 1);
                backend.fill_rectangle(0.0, 0.0, 4.0, 4.0, 0x0000FF, id, false, 0.0);
            })),
            event: None,
        });

        let ticks = Rc::new(Cell::new(0));
        let counted = ticks.clone();
        let timer = b.create_timer().expect("timer");
        b.set_timer_callback(
            timer,
            1,
            Box::new(move |backend| {
                counted.set(counted.get() + 1);
                if counted.get() == 3 {
                    backend.request_close();
                }
            }),
        );

        b.run().expect("run");

        assert_eq!(ticks.get(), 3);
        assert_eq!(redraws.get(), 1);
        assert_eq!(b.sink().frames, 1);
        assert_eq!(b.sink().pixel(1, 1), Some(BLUE));
        assert!(!b.is_running());
        assert_eq!(b.get_win_framerate(w), 0.0);
    }

    #[test]
    fn injected_events_reach_the_callback_and_queue() {
        let mut b = backend(Extent::new(16, 16));
        let w = b.create_window("panel", 16, 16).expect("window");
        let got = Rc::new(Cell::new(false));
        let flag = got.clone();
        b.setup_callbacks(Callbacks {
            redraw: None,
            event: Some(Box::new(move |_, _, ev| flag.set(matches!(ev, Event::MouseMove { .. })))),
        });

        b.inject_event(w, Event::MouseMove { x: 3.0, y: 4.0 });
        assert!(got.get());
        assert_eq!(b.get_events(w), Some(Event::MouseMove { x: 3.0, y: 4.0 }));
        b.reset_events(w);
        assert_eq!(b.get_events(w), None);
    }

    #[test]
    fn unread_events_do_not_accumulate() {
        let mut b = backend(Extent::new(8, 8));
        let w = b.create_window("panel", 8, 8).expect("window");
        for i in 0..10_000 {
            b.inject_event(w, Event::MouseMove { x: i as f32, y: 1.0 });
        }
        let state = b.windows.get(w).expect("state");
        assert_eq!(state.events.len(), crate::input::EVENT_CAPACITY);
        assert_eq!(b.get_events(w), Some(Event::MouseMove { x: 9999.0, y: 1.0 }));
    }

    #[test]
    fn in_memory_clipboard() {
        let mut b = backend(Extent::new(4, 4));
        assert!(b.set_clipboard_text("hello"));
        assert_eq!(b.get_clipboard_text().as_deref(), Some("hello"));
        assert!(b.open_file_dialog(None, &[]).is_none());
    }
}
