//! wgpu side of the renderer.
//!
//! Convention:
//! - Batched vertices arrive in Y-down clip space; both shaders flip Y.
//! - Bind group 0 holds the per-command `ShapeParams` block (dynamic offset),
//!   bind group 1 the sampled texture (white, image, or glyph atlas).

mod batched;
mod buffers;
mod immediate;
mod pipelines;
mod texture;

pub use batched::{GpuFence, WgpuFrame};
pub use buffers::FrameBuffers;
pub use immediate::{ImmediateState, ImmediateTarget};
pub use pipelines::{PipelinePair, SharedResources};
pub use texture::GpuTexture;
