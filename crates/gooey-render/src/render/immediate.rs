//! Immediate path (the `OpenGLImmediate` variant).
//!
//! Every primitive is flushed to the window's back buffer as soon as it is
//! encoded; `Render` only presents. There is no frame-in-flight tracking:
//! each flush is an independent queue submission with its own buffers.

use std::mem::size_of;

use wgpu::util::DeviceExt;

use crate::batch::{ShapeParams, VertexBatch};
use crate::device::{Gpu, WindowSurface};
use crate::error::FrameError;
use crate::frame::FrameOutcome;
use crate::resources::TextureStore;

use super::batched::{clear_color, texture_for};
use super::buffers::{create_params_bind_group, params_stride};
use super::pipelines::SharedResources;
use super::texture::GpuTexture;

/// Per-window back-buffer state.
#[derive(Debug, Default)]
pub struct ImmediateState {
    acquired: bool,
    /// The acquired image has been cleared since the last `Clear`.
    cleared: bool,
}

impl ImmediateState {
    /// Next flush starts by clearing the back buffer.
    pub fn request_clear(&mut self) {
        self.cleared = false;
    }

    /// Forgets the acquired image, e.g. after the swapchain was rebuilt.
    pub fn invalidate(&mut self) {
        self.acquired = false;
        self.cleared = false;
    }
}

pub struct ImmediateTarget<'a, 'w> {
    pub gpu: &'a Gpu,
    pub shared: &'a SharedResources,
    pub textures: &'a TextureStore<GpuTexture>,
    pub surface: &'a mut WindowSurface<'w>,
    pub state: &'a mut ImmediateState,
    pub clear: [f32; 4],
}

impl ImmediateTarget<'_, '_> {
    fn ensure_acquired(&mut self) -> Result<(), FrameError> {
        if !self.surface.extent().is_valid() {
            return Err(FrameError::ZeroExtent);
        }
        if self.surface.take_rebuilt() {
            self.state.invalidate();
        }
        if !self.state.acquired {
            self.surface.acquire(self.gpu)?;
            self.state.acquired = true;
            self.state.cleared = false;
        }
        Ok(())
    }

    /// Draws every queued command of `batch` into the back buffer, then
    /// drops them from the batch while keeping it marked for presentation.
    pub fn flush(&mut self, batch: &mut VertexBatch) -> Result<(), FrameError> {
        self.ensure_acquired()?;
        let result = self.draw_queued(batch);
        batch.discard();
        result
    }

    fn draw_queued(&mut self, batch: &VertexBatch) -> Result<(), FrameError> {
        let pipelines = self.shared.pipelines(self.surface.format()).ok_or_else(|| {
            FrameError::Other(format!("no pipelines for surface format {:?}", self.surface.format()))
        })?;
        let view = self
            .surface
            .view()
            .ok_or_else(|| FrameError::Other("no acquired image".into()))?;
        let device = self.gpu.device();

        let vertex_buffer = (!batch.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gooey immediate vertices"),
                contents: bytemuck::cast_slice(batch.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let stride = params_stride(self.gpu.uniform_alignment()) as usize;
        let mut params = vec![0u8; batch.command_count().max(1) * stride];
        for (block, command) in params.chunks_exact_mut(stride).zip(batch.commands()) {
            block[..size_of::<ShapeParams>()].copy_from_slice(bytemuck::bytes_of(&command.params));
        }
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gooey immediate params"),
            contents: &params,
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let params_group = create_params_bind_group(self.gpu, self.shared.params_layout(), &params_buffer);

        let load = if self.state.cleared {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(clear_color(self.clear))
        };
        let extent = self.surface.extent();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("gooey immediate encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gooey immediate pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_viewport(0.0, 0.0, extent.width as f32, extent.height as f32, 0.0, 1.0);

            if let Some(vertex_buffer) = &vertex_buffer {
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                for (index, command) in batch.commands().iter().enumerate() {
                    let Some(texture) = texture_for(self.shared, self.textures, command.binding) else {
                        log::warn!(
                            "immediate flush: command {index} skipped, {:?} is not loaded",
                            command.binding
                        );
                        continue;
                    };
                    pass.set_pipeline(pipelines.for_binding(command.binding));
                    pass.set_bind_group(0, &params_group, &[(index * stride) as u32]);
                    pass.set_bind_group(1, texture.bind_group(), &[]);
                    pass.draw(command.vertex_range(), 0..1);
                }
            }
        }
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        self.state.cleared = true;
        Ok(())
    }

    /// Presents the back buffer. A frame with nothing drawn still presents
    /// the clear color when the batch was marked dirty.
    pub fn present(&mut self, batch: &mut VertexBatch) -> FrameOutcome {
        if !batch.needs_redraw() && !self.state.acquired {
            return FrameOutcome::Idle;
        }
        if !self.state.acquired || !self.state.cleared || !batch.is_empty() {
            if let Err(err) = self.flush(batch) {
                log::warn!("immediate render: frame skipped: {err}");
                return FrameOutcome::Skipped(err);
            }
        }

        self.state.acquired = false;
        self.state.cleared = false;
        match self.surface.present() {
            Ok(()) => {
                batch.reset();
                FrameOutcome::Presented
            }
            Err(err) => {
                log::warn!("immediate render: present failed: {err}");
                FrameOutcome::Skipped(err)
            }
        }
    }
}
