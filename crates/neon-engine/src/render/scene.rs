//! Cross-thread handoff of scene updates to the render loop.
//!
//! Writers (a geometry loader, UI callbacks) may live on any thread. They
//! overwrite pending slots; the renderer drains all slots in one lock at the
//! start of a frame, on the render thread. Nothing the renderer is drawing
//! with is ever touched by a writer.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::coords::{ContentBounds, Vec2};
use crate::tessellate::{Mesh, StrokeGeometry};

use super::NeonSettings;

/// Updates recorded since the last frame. Each slot is last-write-wins.
#[derive(Debug, Default)]
pub(crate) struct PendingUpdates {
    pub mesh: Option<Mesh>,
    pub settings: Option<NeonSettings>,
    pub bounds: Option<ContentBounds>,
    pub zoom: Option<f32>,
}

impl PendingUpdates {
    pub fn is_empty(&self) -> bool {
        self.mesh.is_none() && self.settings.is_none() && self.bounds.is_none() && self.zoom.is_none()
    }
}

/// Thread-safe writer side of the renderer's scene state.
///
/// Obtained from [`NeonRenderer::scene_handle`](super::NeonRenderer::scene_handle).
/// Cloning is cheap; every clone feeds the same renderer.
#[derive(Debug, Clone, Default)]
pub struct SceneHandle {
    pending: Arc<Mutex<PendingUpdates>>,
}

impl SceneHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces the mesh drawn from the next frame on.
    pub fn update_mesh(&self, mesh: Mesh) {
        self.pending.lock().mesh = Some(mesh);
    }

    pub fn update_settings(&self, settings: NeonSettings) {
        self.pending.lock().settings = Some(settings.sanitized());
    }

    /// Sets the content box the fit transform centers on. Corners may be in any order.
    pub fn update_content_bounds(&self, min: Vec2, max: Vec2) {
        self.pending.lock().bounds = Some(ContentBounds::new(min, max));
    }

    pub fn set_zoom(&self, zoom: f32) {
        self.pending.lock().zoom = Some(zoom);
    }

    /// Publishes a mesh and its bounds together so no frame sees one without the other.
    ///
    /// Geometry without bounds keeps the previous bounds.
    pub fn update_geometry(&self, geometry: StrokeGeometry) {
        let StrokeGeometry { mesh, bounds } = geometry;
        let mut pending = self.pending.lock();
        pending.mesh = Some(mesh);
        if bounds.is_some() {
            pending.bounds = bounds;
        }
    }

    /// Takes every pending update, leaving the slots empty.
    pub(crate) fn take(&self) -> PendingUpdates {
        std::mem::take(&mut *self.pending.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellate::tessellate_stroke;

    fn sample_geometry() -> StrokeGeometry {
        tessellate_stroke([vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 3.0)]], 1.0).unwrap()
    }

    #[test]
    fn take_drains_slots() {
        let h = SceneHandle::new();
        h.set_zoom(2.0);
        let first = h.take();
        assert_eq!(first.zoom, Some(2.0));
        assert!(h.take().is_empty());
    }

    #[test]
    fn last_write_wins() {
        let h = SceneHandle::new();
        h.update_settings(NeonSettings::from_rgb(1.0, 0.0, 0.0));
        h.update_settings(NeonSettings::from_rgb(0.0, 1.0, 0.0));
        assert_eq!(h.take().settings, Some(NeonSettings::from_rgb(0.0, 1.0, 0.0)));
    }

    #[test]
    fn settings_are_clamped_on_write() {
        let h = SceneHandle::new();
        h.update_settings(NeonSettings { color: [3.0, -1.0, 0.5] });
        assert_eq!(h.take().settings.unwrap().color, [1.0, 0.0, 0.5]);
    }

    #[test]
    fn geometry_sets_mesh_and_bounds_together() {
        let h = SceneHandle::new();
        h.update_geometry(sample_geometry());
        let p = h.take();
        assert_eq!(p.mesh.map(|m| m.quad_count()), Some(1));
        assert_eq!(p.bounds, Some(ContentBounds::new(Vec2::zero(), Vec2::new(4.0, 3.0))));
    }

    #[test]
    fn geometry_without_bounds_keeps_pending_bounds() {
        let h = SceneHandle::new();
        h.update_content_bounds(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0));
        h.update_geometry(StrokeGeometry::default());
        let p = h.take();
        assert!(p.mesh.is_some());
        assert_eq!(p.bounds, Some(ContentBounds::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0))));
    }

    #[test]
    fn writes_from_other_threads_are_observed() {
        let h = SceneHandle::new();
        let writers: Vec<_> = (0..4)
            .map(|i| {
                let h = h.clone();
                std::thread::spawn(move || {
                    h.set_zoom(1.0 + i as f32);
                    h.update_geometry(sample_geometry());
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }

        let p = h.take();
        let zoom = p.zoom.unwrap();
        assert!((1.0..=4.0).contains(&zoom));
        assert_eq!(p.mesh.unwrap().quad_count(), 1);
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SceneHandle>();
    }
}
