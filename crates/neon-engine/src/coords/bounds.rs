use super::Vec2;

/// Smallest extent reported by [`ContentBounds::size`] on either axis.
///
/// Keeps a single point or a perfectly straight horizontal/vertical outline
/// from producing an infinite fit scale.
pub const MIN_EXTENT: f32 = 1e-3;

/// Axis-aligned bounding box of flattened path points in content space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContentBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for ContentBounds {
    /// A unit box at the origin.
    fn default() -> Self {
        Self::new(Vec2::zero(), Vec2::splat(1.0))
    }
}

impl ContentBounds {
    /// Builds bounds from two corners in any order.
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Degenerate bounds covering a single point.
    #[inline]
    pub const fn from_point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    /// Bounds of every point in `points`, or `None` when the iterator is empty.
    ///
    /// Non-finite points are ignored.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut bounds: Option<Self> = None;
        for p in points {
            include_point(&mut bounds, p);
        }
        bounds
    }

    /// Grows the box to contain `p`.
    #[inline]
    pub fn include(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Raw extent, may be zero on either axis.
    #[inline]
    pub fn extent(self) -> Vec2 {
        self.max - self.min
    }

    /// Extent clamped to [`MIN_EXTENT`] per axis.
    #[inline]
    pub fn size(self) -> Vec2 {
        self.extent().max(Vec2::splat(MIN_EXTENT))
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn is_degenerate(self) -> bool {
        let e = self.extent();
        e.x < MIN_EXTENT || e.y < MIN_EXTENT
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Smallest box containing both `self` and `other`.
    #[inline]
    pub fn union(self, other: ContentBounds) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Accumulates `p` into an optional bounding box.
#[inline]
pub(crate) fn include_point(bounds: &mut Option<ContentBounds>, p: Vec2) {
    if !p.is_finite() {
        return;
    }
    match bounds {
        Some(b) => b.include(p),
        None => *bounds = Some(ContentBounds::from_point(p)),
    }
}
