/// Drawable size in physical pixels.
///
/// Offscreen targets and the fit transform both work in this space, so a
/// viewport always matches the surface texture it is rendered into.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Returns `false` for zero, negative or non-finite sizes.
    ///
    /// Frames are skipped for invalid viewports.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
