//! Renders into an offscreen texture and reads the pixels back.
//!
//! Each test skips (passes without asserting) when no GPU adapter is available.

use neon_engine::coords::Vec2;
use neon_engine::path::Path;
use neon_engine::render::{BlurMode, FrameOutcome, FrameStage, NeonConfig, NeonRenderer, NeonSettings};
use neon_engine::tessellate::{tessellate_stroke, Mesh, StrokeGeometry};

const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct Headless {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Headless {
    fn new() -> Option<Self> {
        Self::with_limits(wgpu::Limits::downlevel_defaults())
    }

    fn with_limits(limits: wgpu::Limits) -> Option<Self> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            let (device, queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("neon headless test device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: limits,
                    experimental_features: wgpu::ExperimentalFeatures::disabled(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    trace: wgpu::Trace::Off,
                })
                .await
                .ok()?;
            Some(Self { device, queue })
        })
    }

    fn renderer(&self, config: &NeonConfig) -> NeonRenderer {
        NeonRenderer::new(&self.device, &self.queue, OUTPUT_FORMAT, config).unwrap()
    }

    /// Renders one frame at `width × height` and returns tightly packed RGBA8 rows.
    fn render(&self, renderer: &mut NeonRenderer, width: u32, height: u32) -> (FrameOutcome, Vec<u8>) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("neon test output"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = (width * 4).next_multiple_of(256);
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("neon test readback"),
            size: bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let outcome = renderer.render_to(&mut encoder, &view, width, height);

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit([encoder.finish()]);

        readback.slice(..).map_async(wgpu::MapMode::Read, |result| {
            result.expect("failed to map readback buffer");
        });
        self.device.poll(wgpu::PollType::wait_indefinitely()).unwrap();

        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for row in readback
            .slice(..)
            .get_mapped_range()
            .chunks_exact(bytes_per_row as usize)
        {
            pixels.extend_from_slice(&row[..width as usize * 4]);
        }
        readback.unmap();

        (outcome, pixels)
    }
}

fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

/// A horizontal line through the middle of a 100 × 100 content box.
fn horizontal_line() -> StrokeGeometry {
    let mut path = Path::new();
    path.move_to(0.0, 50.0).line_to(100.0, 50.0);
    let mut g = StrokeGeometry::from_path(&path, 1.0, 2.0).unwrap();
    g.bounds = Some(neon_engine::coords::ContentBounds::new(
        Vec2::new(0.0, 0.0),
        Vec2::new(100.0, 100.0),
    ));
    g
}

macro_rules! gpu_or_skip {
    () => {
        gpu_or_skip!(Headless::new())
    };
    ($gpu:expr) => {
        match $gpu {
            Some(gpu) => gpu,
            None => {
                eprintln!("no GPU adapter available, skipping");
                return;
            }
        }
    };
}

#[test]
fn empty_scene_is_opaque_black() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());

    let (outcome, pixels) = gpu.render(&mut renderer, 64, 48);
    assert_eq!(outcome, FrameOutcome::Rendered { stroke_drawn: false });
    assert!(pixels.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn stroke_is_visible_at_the_center() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    renderer.update_settings(NeonSettings::from_rgb(1.0, 0.0, 0.0));
    renderer.update_geometry(horizontal_line());

    let (outcome, pixels) = gpu.render(&mut renderer, 128, 128);
    assert_eq!(outcome, FrameOutcome::Rendered { stroke_drawn: true });

    // The line maps to pixel row 64; its brightest row sits just below.
    let column: Vec<[u8; 4]> = (56..72).map(|y| pixel(&pixels, 128, 64, y)).collect();
    let brightest = column.iter().map(|p| p[0]).max().unwrap();
    assert!(brightest > 128, "column = {column:?}");
    assert!(column.iter().all(|p| p[1] == 0 && p[3] == 255));

    // Far from the line nothing glows.
    assert_eq!(pixel(&pixels, 128, 64, 5), [0, 0, 0, 255]);
}

#[test]
fn repeated_frames_are_identical() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    renderer.update_geometry(horizontal_line());

    let (_, first) = gpu.render(&mut renderer, 96, 64);
    let (_, second) = gpu.render(&mut renderer, 96, 64);
    assert_eq!(first, second);
}

#[test]
fn targets_follow_the_frame_size() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    assert_eq!(renderer.target_size(), None);

    gpu.render(&mut renderer, 64, 32);
    assert_eq!(renderer.target_size(), Some((64, 32)));

    gpu.render(&mut renderer, 40, 80);
    assert_eq!(renderer.target_size(), Some((40, 80)));
    assert_eq!(renderer.stage(), FrameStage::CompositePass);
}

#[test]
fn zero_sized_frame_is_skipped() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: None,
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OUTPUT_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    assert_eq!(renderer.render_to(&mut encoder, &view, 0, 10), FrameOutcome::Skipped);
    assert_eq!(renderer.target_size(), None);
    assert_eq!(renderer.frame_count(), 0);
}

#[test]
fn blur_spreads_glow_beyond_the_stroke() {
    let gpu = gpu_or_skip!();
    let line = horizontal_line;

    let mut blurred = gpu.renderer(&NeonConfig::default());
    blurred.update_settings(NeonSettings::from_rgb(1.0, 1.0, 1.0));
    blurred.update_geometry(line());
    let (_, with_blur) = gpu.render(&mut blurred, 128, 128);

    let mut bypass = gpu.renderer(&NeonConfig {
        blur: BlurMode::Bypass,
        ..Default::default()
    });
    bypass.update_settings(NeonSettings::from_rgb(1.0, 1.0, 1.0));
    bypass.update_geometry(line());
    let (_, without_blur) = gpu.render(&mut bypass, 128, 128);

    let lit = |px: &[u8]| px.chunks_exact(4).filter(|p| p[0] > 0).count();
    assert!(lit(&with_blur) > lit(&without_blur));
}

#[test]
fn pending_updates_apply_on_the_next_frame() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    let handle = renderer.scene_handle();

    std::thread::spawn(move || {
        handle.set_zoom(100.0);
        handle.update_content_bounds(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0));
    })
    .join()
    .unwrap();

    assert_eq!(renderer.zoom(), 1.0);
    gpu.render(&mut renderer, 16, 16);
    assert_eq!(renderer.zoom(), neon_engine::coords::ZOOM_MAX);
    assert_eq!(renderer.content_bounds().min, Vec2::new(0.0, 0.0));
    assert_eq!(renderer.content_bounds().max, Vec2::new(10.0, 10.0));
}

#[test]
fn empty_mesh_replaces_the_previous_stroke() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    renderer.update_geometry(horizontal_line());

    let (outcome, _) = gpu.render(&mut renderer, 64, 64);
    assert_eq!(outcome, FrameOutcome::Rendered { stroke_drawn: true });
    assert!(renderer.has_mesh());

    renderer.update_mesh(Mesh::new());
    let (outcome, pixels) = gpu.render(&mut renderer, 64, 64);
    assert_eq!(outcome, FrameOutcome::Rendered { stroke_drawn: false });
    assert!(!renderer.has_mesh());
    assert!(pixels.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn mesh_and_bounds_can_be_set_separately() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    renderer.update_settings(NeonSettings::from_rgb(0.0, 1.0, 0.0));

    let line = [Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0)];
    let geometry = tessellate_stroke([line], 2.0).unwrap();
    renderer.update_mesh(geometry.mesh);
    renderer.update_content_bounds(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));

    let (outcome, pixels) = gpu.render(&mut renderer, 128, 128);
    assert_eq!(outcome, FrameOutcome::Rendered { stroke_drawn: true });
    assert!(renderer.has_mesh());
    assert_eq!(renderer.content_bounds().max, Vec2::new(100.0, 100.0));

    let brightest = (56..72).map(|y| pixel(&pixels, 128, 64, y)[1]).max().unwrap();
    assert!(brightest > 128);
    assert_eq!(pixel(&pixels, 128, 64, 5), [0, 0, 0, 255]);
}

#[test]
fn device_without_storage_textures_renders_in_bypass() {
    let gpu = gpu_or_skip!(Headless::with_limits(wgpu::Limits::downlevel_webgl2_defaults()));

    let blurred = NeonRenderer::new(&gpu.device, &gpu.queue, OUTPUT_FORMAT, &NeonConfig::default());
    assert!(blurred.is_err());

    let mut renderer = gpu.renderer(&NeonConfig {
        blur: BlurMode::Bypass,
        ..Default::default()
    });
    assert!(!renderer.blur_available());
    assert!(renderer.set_blur_mode(BlurMode::Box5x5).is_err());
    assert_eq!(renderer.blur_mode(), BlurMode::Bypass);

    renderer.update_geometry(horizontal_line());
    let (outcome, _) = gpu.render(&mut renderer, 64, 64);
    assert_eq!(outcome, FrameOutcome::Rendered { stroke_drawn: true });
}

#[test]
fn blur_mode_switches_at_runtime() {
    let gpu = gpu_or_skip!();
    let mut renderer = gpu.renderer(&NeonConfig::default());
    assert!(renderer.blur_available());

    renderer.set_blur_mode(BlurMode::Bypass).unwrap();
    assert_eq!(renderer.blur_mode(), BlurMode::Bypass);
    renderer.set_blur_mode(BlurMode::Box5x5).unwrap();
    assert_eq!(renderer.blur_mode(), BlurMode::Box5x5);
}
