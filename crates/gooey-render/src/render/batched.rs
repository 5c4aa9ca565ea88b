use std::time::Duration;

use crate::batch::{Binding, DrawCommand, Vertex};
use crate::coords::Extent;
use crate::device::{Gpu, WindowSurface};
use crate::error::FrameError;
use crate::frame::{FenceWait, FrameDevice};
use crate::resources::TextureStore;

use super::buffers::FrameBuffers;
use super::pipelines::{PipelinePair, SharedResources};
use super::texture::GpuTexture;

/// Completion handle for one queue submission.
#[derive(Debug, Clone)]
pub struct GpuFence {
    serial: u64,
    submission: wgpu::SubmissionIndex,
}

impl PartialEq for GpuFence {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

/// [`FrameDevice`] over one window's wgpu surface, alive for one `render` call.
pub struct WgpuFrame<'a, 'w> {
    pub gpu: &'a Gpu,
    pub shared: &'a SharedResources,
    pub textures: &'a TextureStore<GpuTexture>,
    pub surface: &'a mut WindowSurface<'w>,
    pub buffers: &'a mut FrameBuffers,
    /// Per-window submission counter, used to tell fences apart.
    pub serial: &'a mut u64,
    encoder: Option<wgpu::CommandEncoder>,
    pass: Option<wgpu::RenderPass<'static>>,
}

impl<'a, 'w> WgpuFrame<'a, 'w> {
    pub fn new(
        gpu: &'a Gpu,
        shared: &'a SharedResources,
        textures: &'a TextureStore<GpuTexture>,
        surface: &'a mut WindowSurface<'w>,
        buffers: &'a mut FrameBuffers,
        serial: &'a mut u64,
    ) -> Self {
        Self {
            gpu,
            shared,
            textures,
            surface,
            buffers,
            serial,
            encoder: None,
            pass: None,
        }
    }

    fn pipelines(&self) -> Option<&'a PipelinePair> {
        self.shared.pipelines(self.surface.format())
    }
}

/// Resolves a command's texture binding, or `None` when it no longer exists.
pub(crate) fn texture_for<'t>(
    shared: &'t SharedResources,
    textures: &'t TextureStore<GpuTexture>,
    binding: Binding,
) -> Option<&'t GpuTexture> {
    match binding {
        Binding::Solid => Some(shared.white()),
        Binding::Texture(id) => textures.get(id),
        Binding::GlyphAtlas => shared.glyph_atlas(),
    }
}

impl FrameDevice for WgpuFrame<'_, '_> {
    type Fence = GpuFence;

    fn wait_fence(&mut self, fence: &GpuFence, timeout: Duration) -> FenceWait {
        self.gpu.wait(&fence.submission, timeout)
    }

    fn acquire_image(&mut self) -> Result<usize, FrameError> {
        self.surface.acquire(self.gpu)
    }

    fn upload(
        &mut self,
        vertices: &[Vertex],
        commands: &[DrawCommand],
    ) -> Result<(), FrameError> {
        if self.pipelines().is_none() {
            return Err(FrameError::Other(format!(
                "no pipelines for surface format {:?}",
                self.surface.format()
            )));
        }
        self.buffers
            .upload(self.gpu, self.shared.params_layout(), vertices, commands);
        Ok(())
    }

    fn begin_pass(&mut self, _image: usize, clear: [f32; 4], extent: Extent) {
        let Some(view) = self.surface.view() else {
            log::warn!("WgpuFrame::begin_pass: no acquired image");
            return;
        };
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gooey frame encoder"),
            });

        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gooey frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(clear)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        pass.set_viewport(0.0, 0.0, extent.width as f32, extent.height as f32, 0.0, 1.0);
        pass.set_scissor_rect(0, 0, extent.width, extent.height);
        pass.set_vertex_buffer(0, self.buffers.vertex_buffer().slice(..));

        self.encoder = Some(encoder);
        self.pass = Some(pass);
    }

    fn draw(&mut self, index: usize, command: &DrawCommand) {
        let Some(pipelines) = self.pipelines() else {
            return;
        };
        let Some(texture) = texture_for(self.shared, self.textures, command.binding) else {
            log::warn!(
                "WgpuFrame::draw: command {index} skipped, {:?} is not loaded",
                command.binding
            );
            return;
        };
        let offset = self.buffers.params_offset(index);
        let Some(pass) = self.pass.as_mut() else {
            return;
        };

        pass.set_pipeline(pipelines.for_binding(command.binding));
        pass.set_bind_group(0, self.buffers.params_bind_group(), &[offset]);
        pass.set_bind_group(1, texture.bind_group(), &[]);
        pass.draw(command.vertex_range(), 0..1);
    }

    fn submit(&mut self, _image: usize) -> Result<GpuFence, FrameError> {
        drop(self.pass.take());
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| FrameError::Other("submit without a recorded pass".into()))?;

        let submission = self.gpu.queue().submit(std::iter::once(encoder.finish()));
        *self.serial += 1;
        Ok(GpuFence {
            serial: *self.serial,
            submission,
        })
    }

    fn present(&mut self, _image: usize) -> Result<(), FrameError> {
        self.surface.present()
    }

    fn abandon(&mut self, _image: usize) {
        self.pass = None;
        self.encoder = None;
        self.surface.abandon();
    }
}

pub(crate) fn clear_color([r, g, b, a]: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}
