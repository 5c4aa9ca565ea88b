use std::collections::HashMap;
use std::mem::size_of;

use crate::batch::{Binding, ShapeParams, Vertex};
use crate::device::Gpu;
use crate::resources::ImageData;
use crate::text::GlyphAtlas;

use super::texture::GpuTexture;

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3, 2 => Float32x2];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// Shape and text pipelines for one swapchain format.
pub struct PipelinePair {
    pub shape: wgpu::RenderPipeline,
    pub text: wgpu::RenderPipeline,
}

impl PipelinePair {
    pub fn for_binding(&self, binding: Binding) -> &wgpu::RenderPipeline {
        match binding {
            Binding::GlyphAtlas => &self.text,
            Binding::Solid | Binding::Texture(_) => &self.shape,
        }
    }
}

/// GPU objects created once and shared by every window.
///
/// Bind group 0 is the per-command [`ShapeParams`] block, addressed with a
/// dynamic offset; bind group 1 is a texture and its sampler. Solid draws
/// bind a 1×1 white texture so both pipelines share one layout.
pub struct SharedResources {
    params_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shape_shader: wgpu::ShaderModule,
    text_shader: wgpu::ShaderModule,
    pipelines: HashMap<wgpu::TextureFormat, PipelinePair>,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    glyph_atlas: Option<GpuTexture>,
}

impl SharedResources {
    pub fn new(gpu: &Gpu) -> Self {
        let device = gpu.device();

        let params_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gooey params bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size_of::<ShapeParams>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gooey texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gooey pipeline layout"),
            bind_group_layouts: &[&params_layout, &texture_layout],
            immediate_size: 0,
        });

        let shape_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gooey shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });
        let text_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gooey text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gooey sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = GpuTexture::from_image(
            gpu,
            &texture_layout,
            &sampler,
            &ImageData::solid(1, 1, [255; 4]),
            "gooey white texture",
        );

        log::debug!("SharedResources: layouts, shaders and sampler created");

        Self {
            params_layout,
            texture_layout,
            pipeline_layout,
            shape_shader,
            text_shader,
            pipelines: HashMap::new(),
            sampler,
            white,
            glyph_atlas: None,
        }
    }

    /// Builds the pipeline pair for `format` unless it already exists.
    pub fn ensure_pipelines(&mut self, gpu: &Gpu, format: wgpu::TextureFormat) {
        if self.pipelines.contains_key(&format) {
            return;
        }
        let pair = PipelinePair {
            shape: self.build_pipeline(gpu, format, &self.shape_shader, "gooey shape pipeline"),
            text: self.build_pipeline(gpu, format, &self.text_shader, "gooey text pipeline"),
        };
        log::debug!("SharedResources: pipelines built for {format:?}");
        self.pipelines.insert(format, pair);
    }

    fn build_pipeline(
        &self,
        gpu: &Gpu,
        format: wgpu::TextureFormat,
        shader: &wgpu::ShaderModule,
        label: &str,
    ) -> wgpu::RenderPipeline {
        gpu.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    pub fn pipelines(&self, format: wgpu::TextureFormat) -> Option<&PipelinePair> {
        self.pipelines.get(&format)
    }

    pub fn upload_glyph_atlas(&mut self, gpu: &Gpu, atlas: &GlyphAtlas) {
        let texture = GpuTexture::from_atlas(gpu, &self.texture_layout, &self.sampler, atlas);
        if let Some(old) = self.glyph_atlas.replace(texture) {
            old.destroy();
        }
    }

    pub fn create_texture(&self, gpu: &Gpu, image: &ImageData, label: &str) -> GpuTexture {
        GpuTexture::from_image(gpu, &self.texture_layout, &self.sampler, image, label)
    }

    #[inline]
    pub fn params_layout(&self) -> &wgpu::BindGroupLayout {
        &self.params_layout
    }

    #[inline]
    pub fn white(&self) -> &GpuTexture {
        &self.white
    }

    #[inline]
    pub fn glyph_atlas(&self) -> Option<&GpuTexture> {
        self.glyph_atlas.as_ref()
    }
}
