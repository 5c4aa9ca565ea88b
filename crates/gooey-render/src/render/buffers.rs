use std::mem::size_of;

use crate::batch::{DrawCommand, ShapeParams, Vertex};
use crate::device::Gpu;

/// One window's vertex buffer and per-command uniform buffer.
///
/// Both mirror the batch's doubling growth. Growth happens in
/// [`upload`](Self::upload), before any command of the frame is recorded,
/// and replaces the params bind group together with its buffer; a recorded
/// frame can therefore never reference a buffer that was reallocated.
pub struct FrameBuffers {
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    params_buffer: wgpu::Buffer,
    params_capacity: usize,
    params_stride: u64,
    params_bind_group: wgpu::BindGroup,
    staging: Vec<u8>,
}

impl FrameBuffers {
    pub fn new(
        gpu: &Gpu,
        params_layout: &wgpu::BindGroupLayout,
        vertex_capacity: usize,
        command_capacity: usize,
    ) -> Self {
        let params_stride = params_stride(gpu.uniform_alignment());
        let vertex_capacity = vertex_capacity.max(1);
        let params_capacity = command_capacity.max(1);
        let params_buffer = create_params_buffer(gpu, params_capacity, params_stride);

        Self {
            vertex_buffer: create_vertex_buffer(gpu, vertex_capacity),
            vertex_capacity,
            params_bind_group: create_params_bind_group(gpu, params_layout, &params_buffer),
            params_buffer,
            params_capacity,
            params_stride,
            staging: Vec::new(),
        }
    }

    pub fn upload(
        &mut self,
        gpu: &Gpu,
        params_layout: &wgpu::BindGroupLayout,
        vertices: &[Vertex],
        commands: &[DrawCommand],
    ) {
        if vertices.len() > self.vertex_capacity {
            let cap = grown(self.vertex_capacity, vertices.len());
            log::debug!("FrameBuffers: vertex buffer {} -> {cap}", self.vertex_capacity);
            self.vertex_buffer = create_vertex_buffer(gpu, cap);
            self.vertex_capacity = cap;
        }
        if commands.len() > self.params_capacity {
            let cap = grown(self.params_capacity, commands.len());
            log::debug!("FrameBuffers: params buffer {} -> {cap}", self.params_capacity);
            self.params_buffer = create_params_buffer(gpu, cap, self.params_stride);
            self.params_bind_group = create_params_bind_group(gpu, params_layout, &self.params_buffer);
            self.params_capacity = cap;
        }

        if !vertices.is_empty() {
            gpu.queue()
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        let stride = self.params_stride as usize;
        self.staging.clear();
        self.staging.resize(commands.len() * stride, 0);
        for (block, command) in self.staging.chunks_exact_mut(stride).zip(commands) {
            block[..size_of::<ShapeParams>()].copy_from_slice(bytemuck::bytes_of(&command.params));
        }
        if !self.staging.is_empty() {
            gpu.queue().write_buffer(&self.params_buffer, 0, &self.staging);
        }
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    #[inline]
    pub fn params_bind_group(&self) -> &wgpu::BindGroup {
        &self.params_bind_group
    }

    /// Dynamic offset of command `index`'s params block.
    #[inline]
    pub fn params_offset(&self, index: usize) -> u32 {
        (index as u64 * self.params_stride) as u32
    }
}

/// Size of one params block rounded up to the device's offset alignment.
pub(crate) fn params_stride(alignment: u64) -> u64 {
    let block = size_of::<ShapeParams>() as u64;
    let alignment = alignment.max(1);
    block.div_ceil(alignment) * alignment
}

/// Smallest doubling of `current` that holds `required`.
pub(crate) fn grown(current: usize, required: usize) -> usize {
    let mut cap = current.max(1);
    while cap < required {
        cap *= 2;
    }
    cap
}

fn create_vertex_buffer(gpu: &Gpu, capacity: usize) -> wgpu::Buffer {
    gpu.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("gooey vertex buffer"),
        size: (capacity * size_of::<Vertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_params_buffer(gpu: &Gpu, capacity: usize, stride: u64) -> wgpu::Buffer {
    gpu.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("gooey params buffer"),
        size: capacity as u64 * stride,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_params_bind_group(
    gpu: &Gpu,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("gooey params bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(size_of::<ShapeParams>() as u64),
            }),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_respects_alignment() {
        assert_eq!(params_stride(256), 256);
        assert_eq!(params_stride(16), 48);
        assert_eq!(params_stride(32), 64);
        assert_eq!(params_stride(0), 48);
    }

    #[test]
    fn growth_doubles_until_it_fits() {
        assert_eq!(grown(1024, 1024), 1024);
        assert_eq!(grown(1024, 1025), 2048);
        assert_eq!(grown(64, 300), 512);
        assert_eq!(grown(0, 3), 4);
    }
}
