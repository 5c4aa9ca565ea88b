//! Draw-Command Encoder.
//!
//! Turns primitive calls (pixel coordinates, packed colors) into clip-space
//! vertices plus a [`ShapeParams`](crate::batch::ShapeParams) record appended
//! to a window's [`VertexBatch`](crate::batch::VertexBatch).

mod encoder;
pub mod geometry;

pub use encoder::{Encoder, LINE_WIDTH};
