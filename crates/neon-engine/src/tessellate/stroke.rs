use crate::coords::{include_point, ContentBounds, Vec2};
use crate::path::{flatten_path, Path};

use super::{Mesh, StrokeVertex, TessellateError, MAX_VERTICES};

/// Floor for the segment length used when normalizing the direction.
///
/// Zero-length segments produce a collapsed (zero-area) quad instead of NaNs.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Tessellator output: the mesh plus the bounds of every input point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeGeometry {
    pub mesh: Mesh,
    /// `None` when the input had no points at all.
    pub bounds: Option<ContentBounds>,
}

impl StrokeGeometry {
    /// Flattens `path` and tessellates every subpath with the given half width.
    pub fn from_path(path: &Path, tolerance: f32, half_width: f32) -> Result<Self, TessellateError> {
        tessellate_stroke(flatten_path(path, tolerance), half_width)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Builds one unmitred quad per consecutive point pair of every polyline.
///
/// For a segment `p0 → p1` with unit direction `u` and `n = (-u.y, u.x) * half_width`
/// the quad is `p0+n (0)`, `p0-n (1)`, `p1+n (0)`, `p1-n (1)` (edge distance in
/// parentheses), indexed as `(0,1,2), (2,1,3)`.
///
/// Polylines with fewer than two points add no quads but still count toward
/// the bounds.
///
/// Fails with [`TessellateError::IndexOverflow`] when the total would exceed
/// [`MAX_VERTICES`]; no partial mesh is returned.
pub fn tessellate_stroke<I, P>(polylines: I, half_width: f32) -> Result<StrokeGeometry, TessellateError>
where
    I: IntoIterator<Item = P>,
    P: IntoIterator<Item = Vec2>,
{
    // NaN.max(0.0) is 0.0
    let half_width = half_width.max(0.0);

    let mut mesh = Mesh::new();
    let mut bounds: Option<ContentBounds> = None;
    let mut segments = 0usize;
    let mut overflowed = false;

    for line in polylines {
        let mut prev: Option<Vec2> = None;

        for p in line {
            include_point(&mut bounds, p);

            if let Some(p0) = prev {
                segments += 1;
                if !overflowed && mesh.vertices.len() + 4 > MAX_VERTICES {
                    overflowed = true;
                    // Keep counting segments for the error report only.
                    mesh = Mesh::new();
                }
                if !overflowed {
                    mesh.push_quad(segment_quad(p0, p, half_width));
                }
            }
            prev = Some(p);
        }
    }

    if overflowed {
        log::warn!("stroke tessellation rejected: {segments} segments exceed the 16-bit index range");
        return Err(TessellateError::IndexOverflow { segments });
    }

    log::debug!(
        "tessellated {} segments into {} vertices / {} indices",
        segments,
        mesh.vertices.len(),
        mesh.indices.len()
    );

    Ok(StrokeGeometry { mesh, bounds })
}

fn segment_quad(p0: Vec2, p1: Vec2, half_width: f32) -> [StrokeVertex; 4] {
    let d = p1 - p0;
    let u = d / d.length().max(MIN_SEGMENT_LENGTH);
    let n = u.perp() * half_width;

    [
        StrokeVertex::new((p0 + n).to_array(), 0.0),
        StrokeVertex::new((p0 - n).to_array(), 1.0),
        StrokeVertex::new((p1 + n).to_array(), 0.0),
        StrokeVertex::new((p1 - n).to_array(), 1.0),
    ]
}
