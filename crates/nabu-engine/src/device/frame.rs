/// A single acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: holding the surface texture prevents acquisition of the next
/// one, so it is submitted and presented (or dropped) within the tick.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
