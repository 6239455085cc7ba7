/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// The image texture is sampled as sRGB, so an sRGB surface writes the
    /// original byte values back out unchanged.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO paces the redraw loop to the display refresh rate.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Adapter selection hint. A single textured quad needs no discrete GPU.
    pub power_preference: wgpu::PowerPreference,

    /// Limits requested from the adapter/device.
    ///
    /// `max_texture_dimension_2d` bounds the largest image that can be shown.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::LowPower,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
