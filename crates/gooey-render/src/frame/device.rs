use std::fmt;
use std::time::Duration;

use crate::batch::{DrawCommand, Vertex};
use crate::coords::Extent;
use crate::error::FrameError;

/// Outcome of a bounded fence wait.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FenceWait {
    Signaled,
    TimedOut,
    /// The device is gone; the fence will never signal.
    Lost,
}

/// The GPU-facing half of the frame cycle for one window.
///
/// [`FrameEngine`](super::FrameEngine) owns the ordering (fences, image
/// tracking, batch reset); implementors only perform each step. A frame is
/// driven as `acquire_image → upload → begin_pass → draw* → submit → present`,
/// or ends early with `abandon` after a successful acquire.
pub trait FrameDevice {
    /// Signaled once the GPU has finished one submission.
    type Fence: Clone + PartialEq + fmt::Debug;

    fn wait_fence(&mut self, fence: &Self::Fence, timeout: Duration) -> FenceWait;

    /// Called once the engine holds no further reference to `fence`.
    fn release_fence(&mut self, _fence: Self::Fence) {}

    /// Index of the swapchain image to render into.
    fn acquire_image(&mut self) -> Result<usize, FrameError>;

    /// Copies the whole batch into device memory.
    ///
    /// Buffers that are too small must be grown, and anything bound to them
    /// rebuilt, here: nothing recorded later may reference a stale buffer.
    fn upload(&mut self, vertices: &[Vertex], commands: &[DrawCommand]) -> Result<(), FrameError>;

    fn begin_pass(&mut self, image: usize, clear: [f32; 4], extent: Extent);

    /// Records the command at `index` of the uploaded batch.
    fn draw(&mut self, index: usize, command: &DrawCommand);

    fn submit(&mut self, image: usize) -> Result<Self::Fence, FrameError>;

    fn present(&mut self, image: usize) -> Result<(), FrameError>;

    /// Releases an acquired image without presenting it.
    fn abandon(&mut self, image: usize);
}
