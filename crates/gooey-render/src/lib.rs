//! Gooey rendering crate.
//!
//! Batched immediate-mode drawing for GUI widgets: widgets issue primitives
//! through the [`Backend`](backend::Backend) trait, which accumulates them per
//! window and submits them to wgpu (batched or immediate) or to a software
//! rasterizer driving an embedded panel.

pub mod backend;
pub mod batch;
pub mod config;
pub mod coords;
pub mod device;
pub mod draw;
pub mod error;
pub mod frame;
pub mod input;
pub mod logging;
pub mod raster;
pub mod render;
pub mod resources;
pub mod text;
pub mod time;

pub use backend::{create_backend, Backend, BackendKind, WindowId};
pub use config::RendererConfig;
