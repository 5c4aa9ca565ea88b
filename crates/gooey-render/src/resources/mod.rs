//! Resource Manager pieces that do not depend on a GPU API.
//!
//! Textures are addressed through generational [`TextureId`]s; decoded pixel
//! data comes from [`ImageData`].

mod image_data;
mod texture;

pub use image_data::{ImageData, SVG_DPI};
pub use texture::{TextureId, TextureStore};
