use std::time::{Duration, Instant};

/// Per-window frames-per-second meter.
///
/// Counts presented frames and republishes the rate once per refresh window
/// (one second by default), so the value is stable enough to display.
#[derive(Debug, Clone)]
pub struct FrameRate {
    window_start: Instant,
    frames: u32,
    fps: f64,
    refresh: Duration,
}

impl FrameRate {
    pub fn new(now: Instant) -> Self {
        Self::with_refresh(now, Duration::from_secs(1))
    }

    pub fn with_refresh(now: Instant, refresh: Duration) -> Self {
        debug_assert!(!refresh.is_zero());
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
            refresh,
        }
    }

    /// Records one presented frame at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.frames = self.frames.saturating_add(1);

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.refresh {
            self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
    }

    /// Last published rate; `0.0` until the first refresh window closes.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
