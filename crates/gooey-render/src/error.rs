use std::path::PathBuf;

use thiserror::Error;

use crate::backend::WindowId;
use crate::resources::TextureId;
use crate::time::TimerId;

/// Errors raised inside the backends.
///
/// These never cross the [`Backend`](crate::backend::Backend) interface
/// directly; interface methods log them and return a sentinel instead.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend is not initialized")]
    NotInitialized,

    #[error("unknown window id {0}")]
    UnknownWindow(WindowId),

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    #[error("unknown timer {0:?}")]
    UnknownTimer(TimerId),

    #[error("window {0} has a zero-sized extent")]
    ZeroExtent(WindowId),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("GPU device error: {0}")]
    Device(String),

    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
}

/// Image decode / rasterization failures.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to parse SVG: {0}")]
    Svg(String),

    #[error("image has zero size")]
    Empty,

    #[error("image is {width}x{height}, the device allows at most {max} texels per side")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Font loading failures.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable system font found")]
    NoSystemFont,

    #[error("failed to parse font: {0}")]
    Parse(&'static str),

    #[error("glyph atlas would be {width}x{height}, above the {max} texel limit; lower the bake size")]
    AtlasTooLarge { width: u32, height: u32, max: u32 },
}

/// Reasons a frame was abandoned. All are transient: the batch is kept and
/// the frame is retried on the next redraw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("window extent is zero")]
    ZeroExtent,

    #[error("swapchain was out of date and has been reconfigured")]
    Outdated,

    #[error("timed out acquiring a swapchain image")]
    AcquireTimeout,

    #[error("fence not signaled within {0:?}")]
    FenceTimeout(std::time::Duration),

    #[error("device lost")]
    DeviceLost,

    #[error("out of memory")]
    OutOfMemory,

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── log messages ─────────────────────────────────────────────────────

    #[test]
    fn backend_errors_name_the_offending_id() {
        assert_eq!(BackendError::UnknownWindow(WindowId(3)).to_string(), "unknown window id #3");
        assert_eq!(BackendError::ZeroExtent(WindowId(1)).to_string(), "window #1 has a zero-sized extent");
        assert_eq!(
            BackendError::Unsupported("open_file_dialog").to_string(),
            "open_file_dialog is not supported by this backend"
        );
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        assert_eq!(BackendError::from(ImageError::Empty).to_string(), "image has zero size");
        let too_large = ImageError::TooLarge { width: 9000, height: 10, max: 8192 };
        assert_eq!(
            BackendError::from(too_large).to_string(),
            "image is 9000x10, the device allows at most 8192 texels per side"
        );
        let atlas = FontError::AtlasTooLarge { width: 512, height: 9000, max: 8192 };
        assert!(BackendError::from(atlas).to_string().starts_with("glyph atlas would be 512x9000"));
    }
}
