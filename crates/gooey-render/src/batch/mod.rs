//! Vertex Batch: per-window vertex stream plus FIFO draw-command list.

mod batch;
mod command;
mod params;
mod vertex;

pub use batch::{VertexBatch, DEFAULT_COMMAND_CAPACITY, DEFAULT_VERTEX_CAPACITY};
pub use command::{Binding, DrawCommand};
pub use params::{ShapeParams, ShapeType};
pub use vertex::Vertex;
