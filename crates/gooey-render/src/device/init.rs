/// Device and surface options shared by every window of a GPU backend.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when one exists.
    ///
    /// Off by default: widget colors are authored as sRGB hex values and are
    /// written to the swapchain unconverted.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Requested compositing mode; falls back to the first supported one.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Swapchain latency hint. Also the number of images the frame engine
    /// tracks per window (plus one).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
