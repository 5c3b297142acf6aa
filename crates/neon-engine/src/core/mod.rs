//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and the renderer driving each window.

mod app;
mod ctx;

pub use app::{AppControl, FrameDriver};
pub use ctx::{FrameCtx, Presented, WindowCtx};
