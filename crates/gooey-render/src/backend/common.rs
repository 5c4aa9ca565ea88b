use std::time::{Duration, Instant};

use crate::config::RendererConfig;
use crate::error::BackendError;
use crate::input::Event;
use crate::text::GlyphCache;
use crate::time::{TimerId, Timers};

use super::{Backend, Callbacks, TimerCallback, WindowId};

/// State every backend variant carries: configuration, glyph cache, timers
/// and the registered callbacks.
pub(crate) struct Core {
    pub config: RendererConfig,
    pub glyphs: Option<GlyphCache>,
    pub timers: Timers<TimerCallback>,
    pub callbacks: Callbacks,
    pub initialized: bool,
    pub running: bool,
    pub close_requested: bool,
}

impl Core {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            glyphs: None,
            timers: Timers::new(),
            callbacks: Callbacks::default(),
            initialized: false,
            running: false,
            close_requested: false,
        }
    }

    /// Bakes the configured font. A missing font disables text instead of
    /// failing initialization.
    pub fn load_glyphs(&mut self) {
        match GlyphCache::load(&self.config.font, self.config.font_bake_px) {
            Ok(cache) => {
                log::info!("glyph cache baked at {}px", cache.bake_px());
                self.glyphs = Some(cache);
            }
            Err(err) => log::error!("init: {}; text is disabled", BackendError::from(err)),
        }
    }

    /// Logs and returns false when `init` has not run yet.
    pub fn ready(&self, op: &str) -> bool {
        if !self.initialized {
            log::warn!("{op}: {}", BackendError::NotInitialized);
        }
        self.initialized
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.glyphs
            .as_ref()
            .map_or(0.0, |g| g.measure_width(text, font_size))
    }

    pub fn text_height(&self, text: &str, font_size: f32) -> f32 {
        self.glyphs
            .as_ref()
            .map_or(0.0, |g| g.measure_height(text, font_size))
    }

    pub fn create_timer(&mut self) -> TimerId {
        let id = self.timers.create();
        log::debug!("create_timer: {id:?}");
        id
    }

    pub fn set_timer_callback(&mut self, timer: TimerId, interval_ms: u64, callback: TimerCallback) {
        let interval = Duration::from_millis(interval_ms);
        if let Err(err) = self
            .timers
            .set_callback(timer, interval, callback, Instant::now())
        {
            log::warn!("set_timer_callback: {err}");
        }
    }

    pub fn stop_timer(&mut self, timer: TimerId) {
        if let Err(err) = self.timers.stop(timer) {
            log::warn!("stop_timer: {err}");
        }
    }

    pub fn destroy_timer(&mut self, timer: TimerId) {
        if let Err(err) = self.timers.destroy(timer) {
            log::warn!("destroy_timer: {err}");
        }
    }
}

/// Backends whose run loop dispatches callbacks through the shared [`Core`].
pub(crate) trait HasCore: Backend + Sized {
    fn core_mut(&mut self) -> &mut Core;
}

/// Fires every timer due at `now`. Callbacks get the backend itself and may
/// create, stop or destroy timers while they run.
pub(crate) fn fire_timers<B: HasCore>(backend: &mut B, now: Instant) {
    for (id, mut callback) in backend.core_mut().timers.take_due(now) {
        callback(backend);
        backend.core_mut().timers.restore(id, callback);
    }
}

/// Runs the redraw callback for `window`.
pub(crate) fn dispatch_redraw<B: HasCore>(backend: &mut B, window: WindowId) {
    let Some(mut callback) = backend.core_mut().callbacks.redraw.take() else {
        return;
    };
    callback(backend, window);
    backend.core_mut().callbacks.redraw.get_or_insert(callback);
}

pub(crate) fn dispatch_event<B: HasCore>(backend: &mut B, window: WindowId, event: &Event) {
    let Some(mut callback) = backend.core_mut().callbacks.event.take() else {
        return;
    };
    callback(backend, window, event);
    backend.core_mut().callbacks.event.get_or_insert(callback);
}
