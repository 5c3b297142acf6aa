//! Vector path input and curve flattening.
//!
//! Paths arrive already parsed as a list of [`PathCmd`]s. Flattening turns
//! them into open polylines that the stroke tessellator consumes.

mod cmd;
mod flatten;

pub use cmd::{Path, PathCmd, Subpaths};
pub use flatten::{flatten, flatten_path, Flatten, MIN_TOLERANCE};
