use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::batch::{DEFAULT_COMMAND_CAPACITY, DEFAULT_VERTEX_CAPACITY};
use crate::coords::Extent;
use crate::device::GpuInit;
use crate::frame::{DEFAULT_CLEAR_COLOR, DEFAULT_FENCE_TIMEOUT, DEFAULT_FRAMES_IN_FLIGHT};
use crate::text::{FontSource, DEFAULT_BAKE_PX};

/// Environment variable the demo reads to pick a backend.
pub const BACKEND_ENV: &str = "GOOEY_BACKEND";

/// The three backend variants behind [`Backend`](crate::backend::Backend).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BackendKind {
    /// Each draw is executed as soon as it is issued; no frame pipelining.
    OpenGLImmediate,
    /// Draws are batched per window and replayed by the frame engine.
    #[default]
    VulkanBatched,
    /// Software rasterizer pushing RGB565 frames to a small display.
    EmbeddedPanel,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenGLImmediate => "gl",
            Self::VulkanBatched => "vulkan",
            Self::EmbeddedPanel => "panel",
        }
    }

    /// wgpu backends used by the GPU variants.
    pub fn wgpu_backends(self) -> wgpu::Backends {
        match self {
            Self::OpenGLImmediate => wgpu::Backends::GL,
            Self::VulkanBatched => wgpu::Backends::VULKAN,
            Self::EmbeddedPanel => wgpu::Backends::empty(),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend {0:?} (expected \"vulkan\", \"gl\" or \"panel\")")]
pub struct ParseBackendError(pub String);

impl FromStr for BackendKind {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vulkan" | "vk" | "batched" => Ok(Self::VulkanBatched),
            "gl" | "opengl" | "immediate" => Ok(Self::OpenGLImmediate),
            "panel" | "tft" | "embedded" => Ok(Self::EmbeddedPanel),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

/// Everything a backend needs at [`init`](crate::backend::Backend::init).
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub backend: BackendKind,
    pub gpu: GpuInit,
    pub frames_in_flight: usize,
    /// Upper bound on any single fence wait before the frame is skipped.
    pub fence_timeout: Duration,
    pub clear_color: [f32; 4],
    pub font: FontSource,
    pub font_bake_px: f32,
    pub vertex_capacity: usize,
    pub command_capacity: usize,
    pub panel_extent: Extent,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            gpu: GpuInit::default(),
            frames_in_flight: DEFAULT_FRAMES_IN_FLIGHT,
            fence_timeout: DEFAULT_FENCE_TIMEOUT,
            clear_color: DEFAULT_CLEAR_COLOR,
            font: FontSource::default(),
            font_bake_px: DEFAULT_BAKE_PX,
            vertex_capacity: DEFAULT_VERTEX_CAPACITY,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            panel_extent: Extent::new(320, 240),
        }
    }
}

impl RendererConfig {
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Reads the backend from `GOOEY_BACKEND`, keeping the default when it is
    /// unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(BACKEND_ENV) {
            match value.parse() {
                Ok(kind) => config.backend = kind,
                Err(err) => log::warn!("{BACKEND_ENV}: {err}; using {}", config.backend),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("vulkan".parse(), Ok(BackendKind::VulkanBatched));
        assert_eq!(" GL ".parse(), Ok(BackendKind::OpenGLImmediate));
        assert_eq!("panel".parse(), Ok(BackendKind::EmbeddedPanel));
        assert_eq!(
            "metal".parse::<BackendKind>(),
            Err(ParseBackendError("metal".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for kind in [BackendKind::OpenGLImmediate, BackendKind::VulkanBatched, BackendKind::EmbeddedPanel] {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = RendererConfig::default();
        assert_eq!(c.frames_in_flight, 2);
        assert_eq!(c.fence_timeout, Duration::from_secs(1));
        assert_eq!(c.font_bake_px, 28.0);
        assert_eq!((c.vertex_capacity, c.command_capacity), (1024, 64));
        assert_eq!(c.clear_color, [0.1, 0.1, 0.1, 1.0]);
    }
}
