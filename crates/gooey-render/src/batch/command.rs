use std::ops::Range;

use crate::resources::TextureId;

use super::ShapeParams;

/// Resource bound for one draw command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Binding {
    /// Untextured shape; backends bind their 1×1 white fallback texture.
    Solid,
    /// A loaded image.
    Texture(TextureId),
    /// The shared glyph atlas (drawn with the text pipeline).
    GlyphAtlas,
}

/// One queued draw: a vertex range plus its parameter block and binding.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCommand {
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub params: ShapeParams,
    pub binding: Binding,
}

impl DrawCommand {
    #[inline]
    pub fn vertex_range(&self) -> Range<u32> {
        self.vertex_offset..self.vertex_offset + self.vertex_count
    }
}
