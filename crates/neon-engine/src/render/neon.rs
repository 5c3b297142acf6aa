use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::core::{AppControl, FrameCtx, FrameDriver, Presented};
use crate::coords::{clamp_zoom, ContentBounds, Vec2, ViewUniforms, Viewport};
use crate::device::Gpu;
use crate::tessellate::{Mesh, StrokeGeometry};

use super::blur::BlurPass;
use super::composite::CompositePass;
use super::scene::PendingUpdates;
use super::stroke::StrokePass;
use super::targets::OffscreenTargets;
use super::{
    BlurMode, FrameOutcome, FrameStage, GpuMesh, NeonConfig, NeonSettings, RenderCtx,
    RenderTarget, SceneHandle,
};

/// Glow outline renderer.
///
/// Each frame runs three passes over two offscreen targets sized to the
/// drawable:
///
/// 1. geometry: stroke mesh → "stroke" (cleared, no blending)
/// 2. blur: 5×5 box average of "stroke" → "glow" (compute)
/// 3. composite: `clamp(stroke + glow)` → output, alpha 1
///
/// Scene updates go through [`SceneHandle`] and are applied at the start of
/// the next frame.
pub struct NeonRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,

    scene: SceneHandle,
    settings: NeonSettings,
    bounds: ContentBounds,
    zoom: f32,
    blur_mode: BlurMode,
    mesh: Option<GpuMesh>,

    targets: OffscreenTargets,
    stroke: StrokePass,
    /// `None` when the device cannot bind storage textures.
    blur: Option<BlurPass>,
    composite: CompositePass,

    stage: FrameStage,
    frames: u64,
}

impl NeonRenderer {
    /// Builds the three pipelines for `output_format`.
    ///
    /// Fails if the format cannot be a color render target, if the blur is
    /// enabled on a device without storage texture support, or if the device
    /// reports a validation error while the pipelines are built. Without
    /// storage textures only [`BlurMode::Bypass`] is available.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_format: wgpu::TextureFormat,
        config: &NeonConfig,
    ) -> Result<Self> {
        anyhow::ensure!(
            !output_format.is_depth_stencil_format() && !output_format.is_compressed(),
            "output format {output_format:?} is not a color render target"
        );
        let storage = supports_storage_textures(&device.limits());
        if config.blur == BlurMode::Box5x5 {
            anyhow::ensure!(
                storage,
                "device does not support storage textures, required by the blur pass"
            );
        }

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let stroke = StrokePass::new(device);
        let blur = storage.then(|| BlurPass::new(device));
        let composite = CompositePass::new(device, output_format);
        if let Some(err) = pollster::block_on(scope.pop()) {
            anyhow::bail!("failed to build neon pipelines: {err}");
        }

        log::info!(
            "neon renderer ready (output {:?}, blur {:?}, storage textures {})",
            output_format,
            config.blur,
            storage
        );

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            scene: SceneHandle::new(),
            settings: config.settings.sanitized(),
            bounds: ContentBounds::default(),
            zoom: config.clamped_zoom(),
            blur_mode: config.blur,
            mesh: None,
            targets: OffscreenTargets::new(storage),
            stroke,
            blur,
            composite,
            stage: FrameStage::Idle,
            frames: 0,
        })
    }

    /// Builds a renderer that draws into `gpu`'s surface.
    pub fn for_surface(gpu: &Gpu<'_>, config: &NeonConfig) -> Result<Self> {
        let info = gpu.adapter_info();
        log::info!("adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format(), config)
    }

    /// Writer handle for other threads. Every clone feeds this renderer.
    pub fn scene_handle(&self) -> SceneHandle {
        self.scene.clone()
    }

    pub fn update_mesh(&self, mesh: Mesh) {
        self.scene.update_mesh(mesh);
    }

    pub fn update_settings(&self, settings: NeonSettings) {
        self.scene.update_settings(settings);
    }

    pub fn update_content_bounds(&self, min: Vec2, max: Vec2) {
        self.scene.update_content_bounds(min, max);
    }

    pub fn set_zoom(&self, zoom: f32) {
        self.scene.set_zoom(zoom);
    }

    pub fn update_geometry(&self, geometry: StrokeGeometry) {
        self.scene.update_geometry(geometry);
    }

    /// Switches the blur stage on or off. Takes effect on the next frame.
    ///
    /// [`BlurMode::Box5x5`] is refused on devices without storage textures;
    /// the current mode is kept.
    pub fn set_blur_mode(&mut self, mode: BlurMode) -> Result<()> {
        if mode == BlurMode::Box5x5 && self.blur.is_none() {
            anyhow::bail!("blur unavailable: device does not support storage textures");
        }
        if mode != self.blur_mode {
            log::info!("blur mode {:?} -> {:?}", self.blur_mode, mode);
            self.blur_mode = mode;
        }
        Ok(())
    }

    /// Whether [`BlurMode::Box5x5`] can be selected on this device.
    #[inline]
    pub fn blur_available(&self) -> bool {
        self.blur.is_some()
    }

    #[inline]
    pub fn blur_mode(&self) -> BlurMode {
        self.blur_mode
    }

    /// Settings in effect for the last rendered frame.
    #[inline]
    pub fn settings(&self) -> NeonSettings {
        self.settings
    }

    #[inline]
    pub fn content_bounds(&self) -> ContentBounds {
        self.bounds
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Size of the offscreen targets, `None` before the first frame.
    #[inline]
    pub fn target_size(&self) -> Option<(u32, u32)> {
        self.targets.size()
    }

    #[inline]
    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    /// Number of frames recorded so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Transform the next frame would use for a `width × height` drawable.
    pub fn view_uniforms(&self, width: u32, height: u32) -> ViewUniforms {
        ViewUniforms::fit(self.bounds, Viewport::from_pixels(width, height), self.zoom)
    }

    /// Records one frame into `encoder`, ending with the composite into `output`.
    ///
    /// `width × height` must be the size of `output`. Pending scene updates
    /// are applied and the offscreen targets resized first. A zero-sized
    /// viewport records nothing and returns [`FrameOutcome::Skipped`].
    pub fn render_to(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) -> FrameOutcome {
        let viewport = Viewport::from_pixels(width, height);
        if !viewport.is_valid() {
            log::trace!("frame skipped: viewport {width}x{height}");
            return FrameOutcome::Skipped;
        }

        self.stage = FrameStage::Idle;
        self.apply_pending();
        self.targets.ensure(&self.device, width, height);

        let Some(stroke_target) = self.targets.stroke() else {
            return FrameOutcome::Skipped;
        };

        let ctx = RenderCtx::new(&self.device, &self.queue, viewport);
        let view = ViewUniforms::fit(self.bounds, viewport, self.zoom);

        self.stage.advance(FrameStage::GeometryPass);
        self.stroke.write_uniform(&ctx, &view, &self.settings);
        let stroke_drawn = {
            let mut target = RenderTarget::new(encoder, stroke_target.view());
            self.stroke.encode(&mut target, self.mesh.as_ref())
        };

        self.stage.advance(FrameStage::BlurPass);
        if let (BlurMode::Box5x5, Some(blur)) = (self.blur_mode, self.blur.as_mut()) {
            blur.encode(&ctx, encoder, &self.targets);
        }

        self.stage.advance(FrameStage::CompositePass);
        {
            let mut target = RenderTarget::new(encoder, output);
            self.composite
                .encode(&ctx, &mut target, &self.targets, self.blur_mode);
        }

        self.frames += 1;
        FrameOutcome::Rendered { stroke_drawn }
    }

    /// Marks the recorded frame as handed to the presentation engine.
    pub fn mark_presented(&mut self) {
        if self.stage == FrameStage::CompositePass {
            self.stage.advance(FrameStage::Presented);
        }
    }

    fn apply_pending(&mut self) {
        let pending = self.scene.take();
        if pending.is_empty() {
            return;
        }
        let PendingUpdates {
            mesh,
            settings,
            bounds,
            zoom,
        } = pending;

        if let Some(mesh) = mesh {
            log::debug!(
                "uploading stroke mesh: {} vertices, {} indices",
                mesh.vertices.len(),
                mesh.indices.len()
            );
            self.mesh = GpuMesh::upload(&self.device, &mesh);
        }
        if let Some(settings) = settings {
            self.settings = settings;
        }
        if let Some(bounds) = bounds {
            self.bounds = bounds;
        }
        if let Some(zoom) = zoom {
            self.zoom = clamp_zoom(zoom);
        }
    }
}

#[inline]
fn supports_storage_textures(limits: &wgpu::Limits) -> bool {
    limits.max_storage_textures_per_shader_stage > 0
}

impl FrameDriver for NeonRenderer {
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        // Targets follow the acquired frame size at the next frame.
        log::debug!("drawable resized to {}x{}", size.width, size.height);
    }

    fn on_frame(&mut self, frame: &mut FrameCtx<'_, '_>) -> AppControl {
        let presented = frame.present_with(|encoder, view, size| {
            self.render_to(encoder, view, size.width, size.height)
                .is_rendered()
        });
        if presented == Presented::Yes {
            self.mark_presented();
        }
        presented.control()
    }
}
