//! Offscreen render targets for the stroke and glow stages.

/// Format of both offscreen targets.
///
/// Half-float keeps bright stroke cores from clipping before the blur and
/// composite read them, and supports render, storage and filtered sampling.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

const STROKE_USAGE: wgpu::TextureUsages =
    wgpu::TextureUsages::RENDER_ATTACHMENT.union(wgpu::TextureUsages::TEXTURE_BINDING);

/// Usage of the glow target. Storage writes are only requested when the
/// device can bind storage textures; otherwise the blur never runs and the
/// target is only ever sampled.
fn glow_usage(storage: bool) -> wgpu::TextureUsages {
    if storage {
        wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING
    } else {
        wgpu::TextureUsages::TEXTURE_BINDING
    }
}

/// One offscreen texture plus its default view.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl OffscreenTarget {
    fn new(
        device: &wgpu::Device,
        label: &'static str,
        width: u32,
        height: u32,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

struct TargetPair {
    stroke: OffscreenTarget,
    glow: OffscreenTarget,
}

/// Owns the "stroke" and "glow" targets, always sized to the drawable.
///
/// Both targets are created and replaced together. Passes that bind the
/// views compare [`generation`](Self::generation) to know when to rebuild
/// their bind groups.
pub struct OffscreenTargets {
    pair: Option<TargetPair>,
    generation: u64,
    glow_storage: bool,
}

impl OffscreenTargets {
    /// `glow_storage` requests storage binding on the glow target.
    pub fn new(glow_storage: bool) -> Self {
        Self {
            pair: None,
            generation: 0,
            glow_storage,
        }
    }

    /// Allocates the targets if missing or if their size differs from `width × height`.
    ///
    /// Returns `true` when new targets were created. The previous targets stay
    /// alive until the replacements exist. Zero sizes are rejected (returns `false`
    /// and keeps whatever is allocated).
    pub fn ensure(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if !needs_realloc(self.size(), width, height) {
            return false;
        }

        let pair = TargetPair {
            stroke: OffscreenTarget::new(device, "neon stroke target", width, height, STROKE_USAGE),
            glow: OffscreenTarget::new(
                device,
                "neon glow target",
                width,
                height,
                glow_usage(self.glow_storage),
            ),
        };

        let previous = self.size();
        self.pair = Some(pair);
        self.generation = self.generation.wrapping_add(1);

        match previous {
            Some((pw, ph)) => log::info!("offscreen targets resized {pw}x{ph} -> {width}x{height}"),
            None => log::info!("offscreen targets allocated at {width}x{height}"),
        }
        true
    }

    /// Current target size, or `None` before the first allocation.
    #[inline]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.pair.as_ref().map(|p| p.stroke.size())
    }

    #[inline]
    pub fn stroke(&self) -> Option<&OffscreenTarget> {
        self.pair.as_ref().map(|p| &p.stroke)
    }

    #[inline]
    pub fn glow(&self) -> Option<&OffscreenTarget> {
        self.pair.as_ref().map(|p| &p.glow)
    }

    /// Bumped on every (re)allocation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[inline]
fn needs_realloc(current: Option<(u32, u32)>, width: u32, height: u32) -> bool {
    current != Some((width, height))
}
