use crate::coords::Extent;
use crate::error::{BackendError, FrameError};

use super::{Gpu, GpuInit};

/// One window's swapchain.
///
/// wgpu does not expose swapchain image indices. Presentable images are
/// handed out in rotation, so the acquisition count modulo the swapchain
/// length stands in for the index.
pub struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    extent: Extent,
    image_count: usize,
    acquisitions: usize,
    acquired: Option<wgpu::SurfaceTexture>,
    /// Set whenever the swapchain is rebuilt; cleared by `take_rebuilt`.
    rebuilt: bool,
}

impl<'w> WindowSurface<'w> {
    pub fn new(
        gpu: &Gpu,
        surface: wgpu::Surface<'w>,
        extent: Extent,
        init: &GpuInit,
    ) -> Result<Self, BackendError> {
        let caps = surface.get_capabilities(gpu.adapter());
        let format = choose_surface_format(&caps, init.prefer_srgb)
            .ok_or_else(|| BackendError::Device("surface is not supported by the adapter".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: extent.width.max(1),
            height: extent.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        if extent.is_valid() {
            surface.configure(gpu.device(), &config);
        }
        log::debug!("WindowSurface: {format:?} {}x{}", extent.width, extent.height);

        Ok(Self {
            surface,
            config,
            extent,
            image_count: init.desired_maximum_frame_latency as usize + 1,
            acquisitions: 0,
            acquired: None,
            rebuilt: false,
        })
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Reconfigures for a new size. A zero extent is recorded but the
    /// swapchain is left alone until the window is restored.
    pub fn resize(&mut self, gpu: &Gpu, extent: Extent) {
        if extent == self.extent {
            return;
        }
        self.extent = extent;
        if !extent.is_valid() {
            return;
        }
        self.config.width = extent.width;
        self.config.height = extent.height;
        self.reconfigure(gpu);
    }

    fn reconfigure(&mut self, gpu: &Gpu) {
        self.acquired = None;
        self.surface.configure(gpu.device(), &self.config);
        self.acquisitions = 0;
        self.rebuilt = true;
    }

    /// True once after every swapchain rebuild.
    pub fn take_rebuilt(&mut self) -> bool {
        std::mem::take(&mut self.rebuilt)
    }

    pub fn acquire(&mut self, gpu: &Gpu) -> Result<usize, FrameError> {
        match self.surface.get_current_texture() {
            Ok(frame) => {
                if frame.suboptimal {
                    log::debug!("WindowSurface: suboptimal swapchain image");
                }
                let index = self.acquisitions % self.image_count;
                self.acquisitions = self.acquisitions.wrapping_add(1);
                self.acquired = Some(frame);
                Ok(index)
            }
            Err(err) => Err(self.recover(gpu, err)),
        }
    }

    /// View of the currently acquired image.
    pub fn view(&self) -> Option<wgpu::TextureView> {
        self.acquired
            .as_ref()
            .map(|frame| frame.texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    pub fn present(&mut self) -> Result<(), FrameError> {
        let frame = self
            .acquired
            .take()
            .ok_or_else(|| FrameError::Other("present without an acquired image".into()))?;
        frame.present();
        Ok(())
    }

    /// Drops the acquired image unpresented.
    pub fn abandon(&mut self) {
        self.acquired = None;
    }

    fn recover(&mut self, gpu: &Gpu, err: wgpu::SurfaceError) -> FrameError {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.extent.is_valid() {
                    self.reconfigure(gpu);
                }
                FrameError::Outdated
            }
            wgpu::SurfaceError::OutOfMemory => {
                log::error!("WindowSurface: out of memory acquiring swapchain image");
                FrameError::OutOfMemory
            }
            wgpu::SurfaceError::Timeout => FrameError::AcquireTimeout,
            wgpu::SurfaceError::Other => FrameError::Other("swapchain acquire failed".into()),
        }
    }
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *caps.formats.first()?;
    let wanted = |f: &&wgpu::TextureFormat| f.is_srgb() == prefer_srgb;
    Some(caps.formats.iter().find(wanted).copied().unwrap_or(first))
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
