//! Glow rendering.
//!
//! [`NeonRenderer`] owns three passes and the offscreen targets they share:
//!
//! - [`StrokePass`]: stroke mesh → "stroke" target
//! - [`BlurPass`]: "stroke" → "glow" target (compute)
//! - [`CompositePass`]: "stroke" + "glow" → output
//!
//! Convention:
//! - Mesh positions are in content space.
//! - The stroke vertex shader maps them to pixels (top-left origin, +Y down)
//!   with [`ViewUniforms`](crate::coords::ViewUniforms), then to NDC.

mod blur;
mod common;
mod composite;
mod ctx;
mod mesh;
mod neon;
mod scene;
mod settings;
mod stage;
mod stroke;
mod targets;

pub use blur::{box_blur_reference, dispatch_size, BlurPass, BLUR_RADIUS, BLUR_WORKGROUP};
pub use composite::{composite_texel, CompositePass};
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::GpuMesh;
pub use neon::NeonRenderer;
pub use scene::SceneHandle;
pub use settings::{BlurMode, NeonConfig, NeonSettings};
pub use stage::{FrameOutcome, FrameStage};
pub use stroke::{edge_falloff, StrokePass, StrokeUniform};
pub use targets::{OffscreenTarget, OffscreenTargets, OFFSCREEN_FORMAT};
