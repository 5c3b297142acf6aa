use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};

use super::app::AppControl;

/// Per-window handles.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

/// Outcome of [`FrameCtx::present_with`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Presented {
    /// Commands were submitted and the surface texture presented.
    Yes,
    /// No frame this time (zero-sized drawable, transient surface error, or
    /// the draw callback recorded nothing).
    Skipped,
    /// The surface is unusable; the app should exit.
    Fatal,
}

impl Presented {
    /// Maps the outcome to a loop directive.
    #[inline]
    pub fn control(self) -> AppControl {
        match self {
            Presented::Fatal => AppControl::Exit,
            Presented::Yes | Presented::Skipped => AppControl::Continue,
        }
    }
}

/// Per-frame context passed to [`FrameDriver::on_frame`](super::FrameDriver::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a mut Gpu<'w>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the surface texture, lets `draw` record into a fresh encoder,
    /// then submits and presents.
    ///
    /// `draw` receives the encoder, the surface view and the surface texture
    /// size, and returns whether anything was recorded. A zero-sized drawable
    /// skips the frame before any acquisition.
    pub fn present_with<F>(&mut self, draw: F) -> Presented
    where
        F: FnOnce(&mut wgpu::CommandEncoder, &wgpu::TextureView, PhysicalSize<u32>) -> bool,
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            log::trace!("skipping frame for zero-sized drawable");
            return Presented::Skipped;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface acquisition failed: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface is unusable, stopping");
                        Presented::Fatal
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Presented::Skipped
                    }
                };
            }
        };

        let frame_size = frame.size();
        let recorded = draw(&mut frame.encoder, &frame.view, frame_size);
        if !recorded {
            // Dropping the unpresented texture discards it.
            return Presented::Skipped;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        Presented::Yes
    }
}
