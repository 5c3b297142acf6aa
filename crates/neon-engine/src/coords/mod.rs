//! Coordinate and geometry types shared by the tessellator and renderers.
//!
//! Spaces:
//! - content space: flattened path coordinates, as supplied
//! - pixel space: physical pixels, origin top-left, +X right, +Y down
//! - NDC: computed in the stroke vertex shader from [`ViewUniforms`]

mod bounds;
mod vec2;
mod view;
mod viewport;

pub use bounds::{ContentBounds, MIN_EXTENT};
pub(crate) use bounds::include_point;
pub use vec2::Vec2;
pub use view::{clamp_zoom, ViewUniforms, FIT_MARGIN, ZOOM_MAX, ZOOM_MIN};
pub use viewport::Viewport;
