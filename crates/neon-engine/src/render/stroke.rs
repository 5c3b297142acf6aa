use bytemuck::{Pod, Zeroable};

use crate::coords::ViewUniforms;
use crate::tessellate::StrokeVertex;

use super::common::{clear_attachment, triangle_list, ubo_min_binding_size};
use super::targets::OFFSCREEN_FORMAT;
use super::{GpuMesh, NeonSettings, RenderCtx, RenderTarget};

/// Stroke uniform (32 bytes, matches `StrokeUniform` in `stroke.wgsl`):
///
///  offset  0  viewport  vec2<f32>
///  offset  8  offset    vec2<f32>
///  offset 16  color     vec3<f32>
///  offset 28  scale     f32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StrokeUniform {
    pub viewport: [f32; 2],
    pub offset: [f32; 2],
    pub color: [f32; 3],
    pub scale: f32,
}

impl StrokeUniform {
    pub fn new(view: &ViewUniforms, settings: &NeonSettings) -> Self {
        Self {
            viewport: view.viewport_size.to_array(),
            offset: view.offset.to_array(),
            color: settings.color,
            scale: view.scale,
        }
    }
}

/// Brightness of a stroke fragment at `edge_distance` across the quad.
///
/// Mirrors `fs_main` in `stroke.wgsl`: `pow(clamp(1 - d, 0, 1), 3)`. The
/// result is written as alpha and multiplies the glow color.
#[inline]
pub fn edge_falloff(edge_distance: f32) -> f32 {
    let k = (1.0 - edge_distance).clamp(0.0, 1.0);
    k * k * k
}

/// Geometry pass: draws the stroke mesh into the offscreen "stroke" target.
///
/// The target is cleared to transparent black first, and no blending is
/// applied, so each frame fully replaces its contents.
pub struct StrokePass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,
}

impl StrokePass {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("neon stroke shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/stroke.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("neon stroke bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(ubo_min_binding_size::<StrokeUniform>()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("neon stroke pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("neon stroke pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[StrokeVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: OFFSCREEN_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("neon stroke ubo"),
            size: std::mem::size_of::<StrokeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("neon stroke bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            bind_group,
            ubo,
        }
    }

    /// Uploads this frame's transform and color.
    pub fn write_uniform(&self, ctx: &RenderCtx<'_>, view: &ViewUniforms, settings: &NeonSettings) {
        let u = StrokeUniform::new(view, settings);
        ctx.queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&u));
    }

    /// Clears `target` and draws `mesh` into it.
    ///
    /// Returns whether anything was drawn. Without a mesh the pass still runs
    /// so the target holds no stale stroke from an earlier frame.
    pub fn encode(&self, target: &mut RenderTarget<'_>, mesh: Option<&GpuMesh>) -> bool {
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("neon stroke pass"),
            color_attachments: &[Some(clear_attachment(target.color_view))],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(mesh) = mesh else { return false };

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.vbo().slice(..));
        rpass.set_index_buffer(mesh.ibo().slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..mesh.index_count(), 0, 0..1);
        true
    }
}
