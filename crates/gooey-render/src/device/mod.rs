//! GPU device and per-window swapchain management.

mod gpu;
mod init;
mod surface;

pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::WindowSurface;
