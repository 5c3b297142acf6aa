//! Neon engine crate.
//!
//! Turns vector paths into a glowing outline:
//!
//! - [`path`]: path commands and curve flattening
//! - [`tessellate`]: polyline → stroke quads with an edge-distance attribute
//! - [`coords`]: content bounds and the fit-to-viewport transform
//! - [`render`]: the geometry, blur and composite passes
//!
//! plus the platform pieces that host them ([`device`], [`window`], [`core`]).

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod path;
pub mod tessellate;
pub mod render;
