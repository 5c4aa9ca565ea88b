//! Coordinate Mapper.
//!
//! Canonical CPU space is physical pixels, origin top-left, +X right, +Y down.
//! Colors arrive as packed `0xRRGGBB` integers.

mod color;
mod extent;
mod ndc;

pub use color::{hex_to_rgb, rgb888_to_rgb565, rgb_to_hex, Rgb};
pub use extent::Extent;
pub use ndc::{from_clip, from_ndc, to_clip, to_ndc, to_ndc_extent};
