//! Backend Interface.
//!
//! Widgets depend only on [`Backend`]; which variant sits behind it is picked
//! once, at [`create_backend`]. Interface methods never return internal
//! errors: failures are logged with the operation name and the ids involved,
//! and surface as `None`, `false`, or a no-op.

mod common;
mod gpu;
mod panel;
mod platform;
mod runtime;
mod windows;

use std::fmt;
use std::path::{Path, PathBuf};

pub use crate::config::BackendKind;
use crate::config::RendererConfig;
use crate::input::{key_name, Event};
use crate::resources::TextureId;
use crate::time::TimerId;

pub use gpu::GpuBackend;
pub use panel::{CaptureSink, PanelBackend, PanelSink};

/// Handle of a backend window. Ids are handed out in creation order and are
/// never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub usize);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CursorKind {
    #[default]
    Arrow,
    Hand,
    Text,
    Crosshair,
    ResizeH,
    ResizeV,
}

/// One named extension group of a file dialog, e.g. `("Images", ["png", "jpg"])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Called when a window needs repainting. It issues draw calls and usually
/// ends with [`Backend::render`]; the run loop renders afterwards regardless.
pub type RedrawCallback = Box<dyn FnMut(&mut dyn Backend, WindowId)>;

/// Called for every input or window event, after it has been queued.
pub type EventCallback = Box<dyn FnMut(&mut dyn Backend, WindowId, &Event)>;

pub type TimerCallback = Box<dyn FnMut(&mut dyn Backend)>;

/// Callbacks registered once through [`Backend::setup_callbacks`].
#[derive(Default)]
pub struct Callbacks {
    pub redraw: Option<RedrawCallback>,
    pub event: Option<EventCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("redraw", &self.redraw.is_some())
            .field("event", &self.event.is_some())
            .finish()
    }
}

/// The capability contract every rendering backend implements.
///
/// All methods expect single-threaded entry from the thread that created the
/// backend. Coordinates are window pixels, origin top-left, +Y down; colors
/// are `0xRRGGBB`.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Creates the device and every resource shared across windows:
    /// pipelines, sampler, fallback texture and glyph atlas.
    fn init(&mut self) -> anyhow::Result<()>;

    /// Runs the event loop until [`request_close`](Self::request_close) or
    /// until the last window is closed.
    fn run(&mut self) -> anyhow::Result<()>;

    /// Waits for outstanding GPU work, then releases every resource.
    fn cleanup(&mut self);

    fn request_close(&mut self);

    fn is_running(&self) -> bool;

    fn setup_callbacks(&mut self, callbacks: Callbacks);

    // ── windows ───────────────────────────────────────────────────────────

    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Option<WindowId> {
        self.spawn_window(title, width, height, true)
    }

    fn spawn_window(&mut self, title: &str, width: u32, height: u32, visible: bool) -> Option<WindowId>;

    fn make_window_visible(&mut self, window: WindowId, visible: bool);

    fn make_window_resizable(&mut self, window: WindowId, resizable: bool);

    fn window_toggle_decorations(&mut self, window: WindowId, enable: bool);

    fn destroy_window_from_id(&mut self, window: WindowId);

    fn destroy_windows(&mut self);

    fn active_window_count(&self) -> usize;

    /// Windows ever created, including destroyed ones.
    fn total_window_count(&self) -> usize;

    /// Makes `window` see-through at `opacity` (`0..=1`), blurring what is
    /// behind it when `blur_radius` is non-zero and the platform supports it.
    /// GPU windows need a non-opaque `GpuInit::alpha_mode` for the
    /// compositor to honor the alpha.
    fn make_window_transparent(&mut self, window: WindowId, blur_radius: u32, opacity: f32);

    fn get_win_dim(&self, window: WindowId) -> Option<(u32, u32)>;

    /// Sets the extent drawing and rendering use for `window`.
    fn set_viewport(&mut self, window: WindowId, width: u32, height: u32);

    fn request_redraw(&mut self, window: WindowId);

    /// Presented frames per second, refreshed once a second.
    fn get_win_framerate(&self, window: WindowId) -> f64;

    // ── drawing ───────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
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
    );

    #[allow(clippy::too_many_arguments)]
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
    );

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: u32, window: WindowId);

    #[allow(clippy::too_many_arguments)]
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
    );

    fn draw_image(&mut self, texture: TextureId, x: f32, y: f32, width: f32, height: f32, window: WindowId);

    /// Draws `text` with its baseline at `y`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: u32, font_size: f32, window: WindowId);

    // ── text metrics ──────────────────────────────────────────────────────

    fn get_text_width(&self, text: &str, font_size: f32) -> f32;

    fn get_text_height(&self, text: &str, font_size: f32) -> f32;

    // ── images ────────────────────────────────────────────────────────────

    fn load_image(&mut self, path: &Path) -> Option<TextureId>;

    fn load_image_from_bin(&mut self, bytes: &[u8]) -> Option<TextureId>;

    fn unload_image(&mut self, texture: TextureId);

    // ── timers ────────────────────────────────────────────────────────────

    fn create_timer(&mut self) -> Option<TimerId>;

    /// Installs `callback` and starts the timer; it fires every
    /// `interval_ms` until stopped or destroyed.
    fn set_timer_callback(&mut self, timer: TimerId, interval_ms: u64, callback: TimerCallback);

    fn stop_timer(&mut self, timer: TimerId);

    fn destroy_timer(&mut self, timer: TimerId);

    // ── events ────────────────────────────────────────────────────────────

    /// Most recent event received by `window` since the last reset.
    fn get_events(&self, window: WindowId) -> Option<Event>;

    fn reset_events(&mut self, window: WindowId);

    fn get_key_from_code<'e>(&self, event: &'e Event) -> Option<&'e str> {
        key_name(event)
    }

    // ── platform services ─────────────────────────────────────────────────

    /// Windowing platform, e.g. `"Linux Wayland"` or `"Windows"`.
    fn get_platform_name(&self) -> &'static str;

    fn set_cursor(&mut self, cursor: CursorKind);

    fn get_clipboard_text(&mut self) -> Option<String>;

    fn set_clipboard_text(&mut self, text: &str) -> bool;

    fn open_file_dialog(&mut self, start: Option<&Path>, filters: &[FileFilter]) -> Option<PathBuf>;

    // ── batching ──────────────────────────────────────────────────────────

    /// Submits `window`'s batch (batched) or presents what was already drawn
    /// (immediate). A frame that cannot be rendered keeps its batch.
    fn render(&mut self, window: WindowId);

    /// Drops everything queued for `window`; the next render presents the
    /// clear color.
    fn clear(&mut self, window: WindowId);
}

/// Builds the backend variant named by `config.backend`. Call
/// [`Backend::init`] before use.
pub fn create_backend(config: RendererConfig) -> Box<dyn Backend> {
    match config.backend {
        BackendKind::OpenGLImmediate | BackendKind::VulkanBatched => Box::new(GpuBackend::new(config)),
        BackendKind::EmbeddedPanel => Box::new(PanelBackend::new(config, CaptureSink::default())),
    }
}
