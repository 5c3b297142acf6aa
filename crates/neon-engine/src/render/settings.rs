use crate::coords::clamp_zoom;

/// Glow appearance applied by the next rendered frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NeonSettings {
    /// Linear RGB, each component in `[0, 1]`.
    pub color: [f32; 3],
}

impl Default for NeonSettings {
    fn default() -> Self {
        Self {
            color: [0.1, 0.85, 1.0],
        }
    }
}

impl NeonSettings {
    /// Builds settings from a linear RGB triple, clamping each component to `[0, 1]`.
    ///
    /// NaN components become 0.
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            color: [c(r), c(g), c(b)],
        }
    }

    /// Re-applies the clamping of [`from_rgb`](Self::from_rgb).
    #[inline]
    pub fn sanitized(self) -> Self {
        let [r, g, b] = self.color;
        Self::from_rgb(r, g, b)
    }
}

/// Whether the blur stage runs.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum BlurMode {
    /// 5×5 box blur of the stroke into the glow target.
    #[default]
    Box5x5,
    /// Debug path: no blur, the composite reads the stroke as its glow input.
    Bypass,
}

/// Renderer and geometry configuration.
#[derive(Debug, Clone)]
pub struct NeonConfig {
    /// Half of the stroke width, in content units.
    pub half_width: f32,

    /// Curve flattening tolerance, in content units.
    pub tolerance: f32,

    pub blur: BlurMode,

    /// Initial glow settings.
    pub settings: NeonSettings,

    /// Initial user zoom.
    pub zoom: f32,
}

impl Default for NeonConfig {
    fn default() -> Self {
        Self {
            half_width: 2.0,
            tolerance: 1.0,
            blur: BlurMode::Box5x5,
            settings: NeonSettings::default(),
            zoom: 1.0,
        }
    }
}

impl NeonConfig {
    /// Zoom after clamping to the supported range.
    #[inline]
    pub fn clamped_zoom(&self) -> f32 {
        clamp_zoom(self.zoom)
    }
}
