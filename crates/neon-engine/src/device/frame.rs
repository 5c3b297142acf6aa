use winit::dpi::PhysicalSize;

/// A single acquired surface frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// one. Hand it back through [`Gpu::submit`](super::Gpu::submit) or drop it
/// to discard.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Size of the acquired texture in physical pixels.
    ///
    /// This is the size the frame must be rendered at, even if a resize
    /// event arrived after acquisition.
    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        let t = &self.surface_texture.texture;
        PhysicalSize::new(t.width(), t.height())
    }
}
