use super::targets::{OffscreenTargets, OFFSCREEN_FORMAT};
use super::RenderCtx;

/// Compute workgroup edge length; matches `@workgroup_size` in `blur.wgsl`.
pub const BLUR_WORKGROUP: u32 = 8;

/// Box blur radius in texels (a 5×5 kernel).
pub const BLUR_RADIUS: u32 = 2;

/// Workgroup counts covering a `width × height` target.
#[inline]
pub fn dispatch_size(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(BLUR_WORKGROUP), height.div_ceil(BLUR_WORKGROUP))
}

/// Blur pass: averages each 5×5 neighbourhood of "stroke" into "glow".
///
/// Samples past the border are clamped to the nearest edge texel. The bind
/// group references both target views, so it is rebuilt whenever the
/// targets are reallocated.
pub struct BlurPass {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<(u64, wgpu::BindGroup)>,
}

impl BlurPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("neon blur shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blur.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("neon blur bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: OFFSCREEN_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("neon blur pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("neon blur pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Records the blur dispatch. Does nothing before the targets exist.
    pub fn encode(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        targets: &OffscreenTargets,
    ) {
        let (Some(stroke), Some(glow)) = (targets.stroke(), targets.glow()) else {
            return;
        };

        let generation = targets.generation();
        if self.bind_group.as_ref().map(|(g, _)| *g) != Some(generation) {
            let bg = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("neon blur bind group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(stroke.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(glow.view()),
                    },
                ],
            });
            self.bind_group = Some((generation, bg));
        }
        let Some((_, bind_group)) = self.bind_group.as_ref() else { return };

        let (width, height) = glow.size();
        debug_assert_eq!(
            (width as f32, height as f32),
            (ctx.viewport.width, ctx.viewport.height),
            "glow target does not match the frame size"
        );
        let (gx, gy) = dispatch_size(width, height);

        let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("neon blur pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(&self.pipeline);
        cpass.set_bind_group(0, bind_group, &[]);
        cpass.dispatch_workgroups(gx, gy, 1);
    }
}

/// CPU reference of the blur for one RGBA texel grid.
///
/// `src` is row-major `width × height`. Used to check the shader's clamping
/// rule and by tests that compare GPU output.
pub fn box_blur_reference(src: &[[f32; 4]], width: usize, height: usize) -> Vec<[f32; 4]> {
    let r = BLUR_RADIUS as isize;
    let taps = ((2 * r + 1) * (2 * r + 1)) as f32;
    let mut out = vec![[0.0f32; 4]; width * height];
    if width == 0 || height == 0 || src.len() < width * height {
        return out;
    }

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0.0f32; 4];
            for dy in -r..=r {
                for dx in -r..=r {
                    let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
                    let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
                    let texel = src[sy * width + sx];
                    for c in 0..4 {
                        sum[c] += texel[c];
                    }
                }
            }
            out[y * width + x] = sum.map(|s| s / taps);
        }
    }
    out
}
