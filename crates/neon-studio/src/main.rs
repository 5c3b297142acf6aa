use std::thread;
use std::time::Duration;

use anyhow::Result;
use winit::dpi::LogicalSize;

use neon_engine::device::GpuInit;
use neon_engine::logging::{init_logging, LoggingConfig};
use neon_engine::path::Path;
use neon_engine::render::{BlurMode, NeonConfig, NeonRenderer, NeonSettings, SceneHandle};
use neon_engine::tessellate::StrokeGeometry;
use neon_engine::window::{Runtime, RuntimeConfig};

const COLOR_CYCLE_STEP: Duration = Duration::from_millis(40);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = NeonConfig::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-blur" => config.blur = BlurMode::Bypass,
            "--thin" => config.half_width = 1.0,
            other => log::warn!("ignoring unknown argument {other:?}"),
        }
    }

    let runtime = RuntimeConfig {
        title: "neon studio".to_string(),
        initial_size: LogicalSize::new(960.0, 640.0),
        ..Default::default()
    };

    Runtime::run(runtime, GpuInit::default(), move |gpu| {
        let renderer = NeonRenderer::for_surface(gpu, &config)?;
        spawn_scene_worker(renderer.scene_handle(), config);
        Ok(renderer)
    })
}

/// Tessellates the sign off the render thread, publishes it, then slowly
/// cycles the glow hue.
fn spawn_scene_worker(scene: SceneHandle, config: NeonConfig) {
    thread::spawn(move || {
        let path = sign_path();
        match StrokeGeometry::from_path(&path, config.tolerance, config.half_width) {
            Ok(geometry) => {
                log::info!("sign tessellated into {} quads", geometry.mesh.quad_count());
                scene.update_geometry(geometry);
            }
            Err(e) => {
                log::error!("failed to tessellate sign: {e}");
                return;
            }
        }

        let mut hue = 190.0f32;
        loop {
            thread::sleep(COLOR_CYCLE_STEP);
            hue = (hue + 0.5) % 360.0;
            let [r, g, b] = hsv_to_rgb(hue, 0.85, 1.0);
            scene.update_settings(NeonSettings::from_rgb(r, g, b));
        }
    });
}

/// A rounded frame, a heart and a wave, in content units (+Y down).
fn sign_path() -> Path {
    let mut p = Path::new();

    // frame
    let (w, h, r) = (400.0, 260.0, 30.0);
    let k = r * 0.5523; // cubic circle constant
    p.move_to(r, 0.0)
        .line_to(w - r, 0.0)
        .cubic_to(w - r + k, 0.0, w, r - k, w, r)
        .line_to(w, h - r)
        .cubic_to(w, h - r + k, w - r + k, h, w - r, h)
        .line_to(r, h)
        .cubic_to(r - k, h, 0.0, h - r + k, 0.0, h - r)
        .line_to(0.0, r)
        .cubic_to(0.0, r - k, r - k, 0.0, r, 0.0)
        .close();

    // heart
    p.move_to(200.0, 90.0)
        .cubic_to(170.0, 40.0, 110.0, 70.0, 130.0, 120.0)
        .quad_to(150.0, 160.0, 200.0, 190.0)
        .quad_to(250.0, 160.0, 270.0, 120.0)
        .cubic_to(290.0, 70.0, 230.0, 40.0, 200.0, 90.0)
        .close();

    // wave
    p.move_to(60.0, 225.0);
    for i in 0..7 {
        let x = 60.0 + i as f32 * 40.0;
        let dy = if i % 2 == 0 { -18.0 } else { 18.0 };
        p.quad_to(x + 20.0, 225.0 + dy, x + 40.0, 225.0);
    }

    p
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r + m, g + m, b + m]
}
