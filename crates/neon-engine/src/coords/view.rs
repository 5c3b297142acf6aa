use super::{ContentBounds, Vec2, Viewport};

/// Fraction of the viewport the fitted content occupies (10% margin).
pub const FIT_MARGIN: f32 = 0.9;

/// Accepted user zoom range.
pub const ZOOM_MIN: f32 = 0.05;
pub const ZOOM_MAX: f32 = 32.0;

/// Clamps a user zoom factor to `[ZOOM_MIN, ZOOM_MAX]`.
///
/// Non-finite input falls back to 1.
#[inline]
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    } else {
        1.0
    }
}

/// Per-frame content → pixel transform.
///
/// `pixel = content * scale + offset`, with the pixel origin at the top-left of
/// the drawable and +Y down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewUniforms {
    pub viewport_size: Vec2,
    pub offset: Vec2,
    pub scale: f32,
}

impl ViewUniforms {
    /// Fits `bounds` into `viewport`, centered, leaving a 10% margin, then applies `zoom`.
    ///
    /// The zoom scales about the viewport center.
    pub fn fit(bounds: ContentBounds, viewport: Viewport, zoom: f32) -> Self {
        let viewport_size = Vec2::new(viewport.width, viewport.height);
        let content = bounds.size();

        let fit_scale = (viewport_size.x / content.x).min(viewport_size.y / content.y) * FIT_MARGIN;
        let scale = fit_scale * clamp_zoom(zoom);
        let offset = (viewport_size - content * scale) * 0.5 - bounds.min * scale;

        Self {
            viewport_size,
            offset,
            scale,
        }
    }

    /// Content space → pixel space.
    #[inline]
    pub fn to_pixel(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    /// Content space → normalized device coordinates (+Y up).
    ///
    /// Mirrors `vs_main` in `stroke.wgsl`.
    #[inline]
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let px = self.to_pixel(p);
        let size = self.viewport_size.max(Vec2::splat(1.0));
        Vec2::new(px.x / size.x * 2.0 - 1.0, 1.0 - px.y / size.y * 2.0)
    }
}
