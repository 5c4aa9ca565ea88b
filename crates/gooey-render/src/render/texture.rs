use crate::device::Gpu;
use crate::resources::ImageData;
use crate::text::GlyphAtlas;

/// A sampled texture plus the bind group that exposes it to the shaders.
pub struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Uploads RGBA8 pixels, top row first.
    pub fn from_image(
        gpu: &Gpu,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &ImageData,
        label: &str,
    ) -> Self {
        Self::upload(
            gpu,
            layout,
            sampler,
            label,
            wgpu::TextureFormat::Rgba8Unorm,
            (image.width, image.height),
            &image.pixels,
            image.bytes_per_row(),
        )
    }

    /// Uploads the glyph atlas as a single-channel coverage texture.
    pub fn from_atlas(
        gpu: &Gpu,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        atlas: &GlyphAtlas,
    ) -> Self {
        Self::upload(
            gpu,
            layout,
            sampler,
            "gooey glyph atlas",
            wgpu::TextureFormat::R8Unorm,
            (atlas.width, atlas.height),
            &atlas.pixels,
            atlas.width,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn upload(
        gpu: &Gpu,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        pixels: &[u8],
        bytes_per_row: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(size.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self { texture, bind_group }
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Frees the GPU memory now rather than when the last reference drops.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}
