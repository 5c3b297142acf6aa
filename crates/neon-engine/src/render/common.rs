//! Shared GPU helpers used by the neon passes.

/// Minimum binding size for a uniform of type `T`. Never zero.
pub(super) fn ubo_min_binding_size<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .unwrap_or(std::num::NonZeroU64::MIN)
}

/// Color attachment that clears `view` to transparent black and stores.
pub(super) fn clear_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            store: wgpu::StoreOp::Store,
        },
        depth_slice: None,
    }
}

/// Triangle-list primitive state with culling off.
pub(super) fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}
