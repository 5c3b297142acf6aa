use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{AppControl, FrameCtx, FrameDriver, WindowCtx};
use crate::device::{Gpu, GpuInit};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Redraw every loop iteration instead of waiting for events.
    pub continuous_redraw: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "neon".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            continuous_redraw: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, builds its GPU context, then hands that context to
    /// `make_driver` and drives the returned [`FrameDriver`] until the window
    /// closes.
    ///
    /// Errors from window creation, GPU initialization or `make_driver` stop
    /// the loop and are returned.
    pub fn run<D, F>(config: RuntimeConfig, gpu_init: GpuInit, make_driver: F) -> Result<()>
    where
        D: FrameDriver + 'static,
        F: FnOnce(&Gpu<'_>) -> Result<D> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, make_driver);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<D, F> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    make_driver: Option<F>,

    entry: Option<WindowEntry>,
    driver: Option<D>,

    startup_error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<D, F> AppState<D, F>
where
    D: FrameDriver + 'static,
    F: FnOnce(&Gpu<'_>) -> Result<D> + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, make_driver: F) -> Self {
        Self {
            config,
            gpu_init,
            make_driver: Some(make_driver),
            entry: None,
            driver: None,
            startup_error: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let make_driver = self
            .make_driver
            .take()
            .context("frame driver was already created")?;
        let driver = entry
            .with_gpu(|gpu| make_driver(gpu))
            .context("failed to create frame driver")?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.driver = Some(driver);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(entry), Some(driver)) = (self.entry.as_mut(), self.driver.as_mut()) else {
            return;
        };
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        driver.on_resize(size);
        entry.with_window(|w| w.request_redraw());
    }

    fn redraw(&mut self, window_id: WindowId) -> AppControl {
        let (Some(entry), Some(driver)) = (self.entry.as_mut(), self.driver.as_mut()) else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            driver.on_frame(&mut ctx)
        })
    }
}

impl<D, F> ApplicationHandler for AppState<D, F>
where
    D: FrameDriver + 'static,
    F: FnOnce(&Gpu<'_>) -> Result<D> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("startup failed: {e:#}");
            self.startup_error = Some(e);
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if self.config.continuous_redraw {
            if let Some(entry) = self.entry.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                // Driver first: it holds GPU resources created from the entry's device.
                self.driver = None;
                self.entry = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size()))
                else {
                    return;
                };
                self.resize(size);
            }

            WindowEvent::RedrawRequested => {
                if self.redraw(window_id) == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
