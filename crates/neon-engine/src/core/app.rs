use winit::dpi::PhysicalSize;

use super::ctx::FrameCtx;

/// Control directive returned by driver callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Per-window frame driver implemented by higher layers.
///
/// The runtime calls [`on_resize`](Self::on_resize) whenever the drawable
/// size changes (after the surface was reconfigured) and
/// [`on_frame`](Self::on_frame) on every redraw.
pub trait FrameDriver {
    /// Called with the new drawable size in physical pixels. May be zero.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, frame: &mut FrameCtx<'_, '_>) -> AppControl;
}
