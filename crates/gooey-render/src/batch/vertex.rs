use bytemuck::{Pod, Zeroable};

/// One batched vertex: clip-space position, normalized RGB color, texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    #[inline]
    pub const fn new(pos: [f32; 2], color: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { pos, color, tex_coord }
    }
}
