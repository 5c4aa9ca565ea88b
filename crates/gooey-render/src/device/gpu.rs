use std::time::Duration;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::frame::FenceWait;

use super::GpuInit;

/// Instance, adapter, device and queue shared by all windows.
///
/// Created once by the backend's `init`, before any window exists, so the
/// adapter is chosen without a surface; each window's surface is checked
/// for compatibility when it is configured.
pub struct Gpu {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    pub async fn new(backends: wgpu::Backends, init: &GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("no GPU adapter for backends {backends:?}"))?;

        let info = adapter.get_info();
        log::info!("Gpu: using {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gooey device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    pub fn create_surface<'w>(&self, window: &'w Window) -> Result<wgpu::Surface<'w>> {
        self.instance
            .create_surface(window)
            .context("failed to create wgpu surface")
    }

    #[inline]
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Required alignment of dynamic uniform-buffer offsets.
    pub fn uniform_alignment(&self) -> u64 {
        u64::from(self.device.limits().min_uniform_buffer_offset_alignment)
    }

    /// Blocks until `submission` completes or `timeout` elapses.
    pub fn wait(&self, submission: &wgpu::SubmissionIndex, timeout: Duration) -> FenceWait {
        self.poll(Some(submission.clone()), timeout)
    }

    /// Blocks until all submitted work completes or `timeout` elapses.
    pub fn wait_idle(&self, timeout: Duration) -> FenceWait {
        self.poll(None, timeout)
    }

    fn poll(&self, submission_index: Option<wgpu::SubmissionIndex>, timeout: Duration) -> FenceWait {
        match self.device.poll(wgpu::PollType::Wait {
            submission_index,
            timeout: Some(timeout),
        }) {
            Ok(_) => FenceWait::Signaled,
            Err(wgpu::PollError::Timeout) => FenceWait::TimedOut,
            Err(err) => {
                log::error!("Gpu::poll: {err}");
                FenceWait::Lost
            }
        }
    }
}
