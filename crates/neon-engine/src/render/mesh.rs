use wgpu::util::DeviceExt;

use crate::tessellate::{Mesh, StrokeVertex};

/// A stroke mesh resident on the GPU.
///
/// Uploaded once per geometry load; the render loop replaces it as a whole.
pub struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    /// Uploads `mesh`. Returns `None` for a mesh with no triangles.
    pub fn upload(device: &wgpu::Device, mesh: &Mesh) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("neon stroke vbo"),
            contents: bytemuck::cast_slice::<StrokeVertex, u8>(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("neon stroke ibo"),
            contents: bytemuck::cast_slice::<u16, u8>(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(Self {
            vbo,
            ibo,
            index_count: mesh.indices.len() as u32,
        })
    }

    #[inline]
    pub fn vbo(&self) -> &wgpu::Buffer {
        &self.vbo
    }

    #[inline]
    pub fn ibo(&self) -> &wgpu::Buffer {
        &self.ibo
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}
