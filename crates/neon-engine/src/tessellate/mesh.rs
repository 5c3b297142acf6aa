use bytemuck::{Pod, Zeroable};

/// Largest vertex count addressable by `u16` indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Index pattern of one segment quad, relative to its first vertex.
///
/// Vertex order within a quad is `p0+n, p0-n, p1+n, p1-n`, so the two
/// triangles share the `1–2` edge.
pub const QUAD_INDEX_PATTERN: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Stroke vertex (12 bytes):
///
///  offset 0  position       [f32; 2]  loc 0  (content space)
///  offset 8  edge_distance  f32       loc 1  (0 = one edge, 1 = the other)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StrokeVertex {
    pub position: [f32; 2],
    pub edge_distance: f32,
}

impl StrokeVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32    // edge_distance
    ];

    #[inline]
    pub const fn new(position: [f32; 2], edge_distance: f32) -> Self {
        Self {
            position,
            edge_distance,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StrokeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list ready for upload.
///
/// Produced once per geometry load and replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<StrokeVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    /// A mesh without triangles draws nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() || self.vertices.is_empty()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends one quad. The caller guarantees room below [`MAX_VERTICES`].
    pub(crate) fn push_quad(&mut self, quad: [StrokeVertex; 4]) {
        debug_assert!(self.vertices.len() + 4 <= MAX_VERTICES);
        let base = self.vertices.len() as u16;
        self.vertices.extend_from_slice(&quad);
        self.indices
            .extend(QUAD_INDEX_PATTERN.iter().map(|i| base + i));
    }
}
