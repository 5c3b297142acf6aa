//! Stroke tessellation: polylines → quad-per-segment triangle mesh.
//!
//! Segments are not joined or mitred. Each quad carries an edge distance
//! per vertex (0 on one side, 1 on the other) that the glow shader turns
//! into the bright-core falloff.

mod error;
mod mesh;
mod stroke;

pub use error::TessellateError;
pub use mesh::{Mesh, StrokeVertex, MAX_VERTICES, QUAD_INDEX_PATTERN};
pub use stroke::{tessellate_stroke, StrokeGeometry, MIN_SEGMENT_LENGTH};
