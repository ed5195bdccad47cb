//! Layered compositing.
//!
//! Each z-level owns one surface; layers stack from z=0 upward with the
//! hover overlay on top. `refresh` repaints only levels the scene marked
//! dirty. A separate scratch surface serves the surface-backed hit-test tiers.

mod layer;
mod overlay;
mod painter;

use std::collections::{BTreeSet, HashSet};

use crate::coords::Viewport;
use crate::error::EngineError;
use crate::scene::{Scene, ZLevel};
use crate::surface::{DrawError, Surface, SurfaceFactory, SurfaceRole};

pub use layer::Layer;
pub use overlay::{HoverOverlay, OverlayEntry};

use painter::paint_record;

/// Result of a render or refresh pass.
#[derive(Debug, Default)]
pub struct RedrawReport {
    /// Levels cleared and repainted, ascending.
    pub layers: Vec<ZLevel>,
    /// Records painted.
    pub painted: usize,
    /// Records skipped while an asset they need is pending.
    pub deferred: usize,
    /// Draw faults, for the diagnostic channel.
    pub errors: Vec<EngineError>,
}

impl RedrawReport {
    #[inline]
    pub fn redrawn(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Owns every surface the engine draws on.
pub struct Compositor<F: SurfaceFactory> {
    factory: F,
    viewport: Viewport,
    layers: Vec<Layer<F::Surface>>,
    overlay: F::Surface,
    scratch: F::Surface,
    /// Next refresh repaints every layer.
    structural: bool,
    /// Levels holding records whose assets were not ready.
    pending: BTreeSet<ZLevel>,
    /// Shape tags already reported as unregistered.
    warned: HashSet<String>,
}

impl<F: SurfaceFactory> Compositor<F> {
    pub fn new(mut factory: F) -> Self {
        let viewport = factory.viewport();
        let overlay = factory.create(SurfaceRole::Overlay);
        let scratch = factory.create(SurfaceRole::Scratch);
        log::debug!("compositor created at {}x{}", viewport.width, viewport.height);
        Self {
            factory,
            viewport,
            layers: Vec::new(),
            overlay,
            scratch,
            structural: false,
            pending: BTreeSet::new(),
            warned: HashSet::new(),
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn layers(&self) -> &[Layer<F::Surface>] {
        &self.layers
    }

    pub fn layer(&self, z: ZLevel) -> Option<&Layer<F::Surface>> {
        self.layers.get(z.index())
    }

    pub fn overlay_surface(&self) -> &F::Surface {
        &self.overlay
    }

    pub fn scratch(&self) -> &F::Surface {
        &self.scratch
    }

    /// Surface handed to the surface-backed hit-test tiers.
    pub fn scratch_mut(&mut self) -> &mut dyn Surface {
        &mut self.scratch
    }

    /// Levels waiting on an asset.
    pub fn pending(&self) -> impl Iterator<Item = ZLevel> + '_ {
        self.pending.iter().copied()
    }

    // ── passes ───────────────────────────────────────────────────────────

    /// Clears and repaints every layer.
    pub fn render(&mut self, scene: &mut Scene) -> RedrawReport {
        self.ensure_layers(scene.max_z());
        let levels: Vec<ZLevel> = self.layers.iter().map(Layer::z).collect();
        self.structural = false;
        self.redraw(scene, levels)
    }

    /// Repaints only dirty levels, or every level after a resize.
    pub fn refresh(&mut self, scene: &mut Scene) -> RedrawReport {
        self.ensure_layers(scene.max_z());
        let levels: Vec<ZLevel> = if std::mem::take(&mut self.structural) {
            self.layers.iter().map(Layer::z).collect()
        } else {
            scene.dirty().filter(|z| z.index() < self.layers.len()).collect()
        };
        self.redraw(scene, levels)
    }

    /// Repaints the overlay from `overlay`, draining it. Returns records painted.
    pub fn paint_overlay(&mut self, scene: &Scene, overlay: &mut HoverOverlay) -> usize {
        self.overlay.clear();
        let mut painted = 0;
        for entry in overlay.drain() {
            let Some(record) = scene.get(&entry.id) else {
                continue;
            };
            let Some(plugin) = scene.registry().get(record.shape()) else {
                continue;
            };
            match paint_record(&mut self.overlay, record, plugin, &entry.style) {
                Ok(()) => painted += 1,
                Err(err) => log::debug!("overlay skipped {}: {err}", entry.id),
            }
        }
        painted
    }

    /// Re-reads the viewport from the factory and resizes every surface,
    /// then repaints everything.
    pub fn resize(&mut self, scene: &mut Scene) -> RedrawReport {
        let viewport = self.factory.viewport();
        log::debug!("resize to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        for layer in &mut self.layers {
            layer.surface_mut().resize(viewport);
        }
        self.overlay.resize(viewport);
        self.scratch.resize(viewport);

        scene.mark_all_dirty();
        self.structural = true;
        self.refresh(scene)
    }

    /// Re-dirties every level that skipped a record for a pending asset.
    /// Returns how many levels were marked.
    pub fn asset_ready(&mut self, scene: &mut Scene) -> usize {
        let levels = std::mem::take(&mut self.pending);
        for z in &levels {
            scene.mark_dirty(*z);
        }
        levels.len()
    }

    // ── internals ────────────────────────────────────────────────────────

    fn ensure_layers(&mut self, max_z: ZLevel) {
        while self.layers.len() <= max_z.index() {
            let z = ZLevel(self.layers.len() as u32);
            let surface = self.factory.create(SurfaceRole::Layer(z));
            log::trace!("layer {z} created");
            self.layers.push(Layer::new(z, surface));
        }
    }

    fn redraw(&mut self, scene: &mut Scene, levels: Vec<ZLevel>) -> RedrawReport {
        let mut report = RedrawReport::default();
        for z in levels {
            let Some(layer) = self.layers.get_mut(z.index()) else {
                continue;
            };
            self.pending.remove(&z);
            let surface = layer.begin_redraw();

            for record in scene.bucket(z).filter(|r| !r.invisible) {
                let Some(plugin) = scene.registry().get(record.shape()) else {
                    if self.warned.insert(record.shape().to_string()) {
                        log::warn!("no shape registered for `{}`; records skipped", record.shape());
                    }
                    continue;
                };
                match paint_record(surface, record, plugin, record.style()) {
                    Ok(()) => report.painted += 1,
                    Err(err @ DrawError::NotReady { .. }) => {
                        if let Some(id) = record.id() {
                            let err = EngineError::from_draw(id.clone(), err);
                            log::debug!("{z}: {err}; deferred");
                        }
                        self.pending.insert(z);
                        report.deferred += 1;
                    }
                    Err(err) => {
                        if let Some(id) = record.id() {
                            report.errors.push(EngineError::from_draw(id.clone(), err));
                        }
                    }
                }
            }
            report.layers.push(z);
        }
        scene.clear_dirty();
        log::trace!("redrew {} layer(s), {} record(s)", report.layers.len(), report.painted);
        report
    }
}

impl<F: SurfaceFactory> std::fmt::Debug for Compositor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("viewport", &self.viewport)
            .field("layers", &self.layers.len())
            .field("structural", &self.structural)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::scene::{ShapePatch, ShapeRecord};
    use crate::shape::ShapeRegistry;
    use crate::style::{Style, keys};
    use crate::surface::{DrawOp, RecordingFactory};

    fn rig() -> (Compositor<RecordingFactory>, Scene) {
        let factory = RecordingFactory::new(Viewport::new(200.0, 100.0));
        (
            Compositor::new(factory),
            Scene::new(Rc::new(ShapeRegistry::with_builtins())),
        )
    }

    fn dot(id: &str, z: u32) -> ShapeRecord {
        ShapeRecord::new("circle")
            .with_id(id)
            .with_z(z)
            .with_style(Style::new().with(keys::X, 10.0).with(keys::Y, 10.0).with(keys::R, 5.0))
    }

    // ── refresh ──────────────────────────────────────────────────────────

    #[test]
    fn layers_are_contiguous_up_to_max_z() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 2));
        let report = comp.render(&mut scene);
        assert_eq!(comp.layers().len(), 3);
        assert_eq!(report.layers, vec![ZLevel(0), ZLevel(1), ZLevel(2)]);
        assert_eq!(report.painted, 1);
    }

    #[test]
    fn second_refresh_redraws_nothing() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 0));
        scene.add(dot("b", 1));
        assert_eq!(comp.refresh(&mut scene).redrawn(), 2);
        assert_eq!(comp.refresh(&mut scene).redrawn(), 0);
    }

    #[test]
    fn only_the_touched_level_repaints() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 0));
        scene.add(dot("b", 1));
        comp.render(&mut scene);

        scene.drift(&"b".into(), 5.0, 0.0);
        let report = comp.refresh(&mut scene);
        assert_eq!(report.layers, vec![ZLevel(1)]);
        assert_eq!(comp.layer(ZLevel(0)).map(Layer::redraws), Some(1));
        assert_eq!(comp.layer(ZLevel(1)).map(Layer::redraws), Some(2));
    }

    #[test]
    fn moving_between_levels_repaints_both() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 0));
        scene.add(dot("b", 1));
        comp.render(&mut scene);
        scene.modify(&"a".into(), &ShapePatch::new().z(1));
        let report = comp.refresh(&mut scene);
        assert_eq!(report.layers, vec![ZLevel(0), ZLevel(1)]);
        let fills = |z| comp.layer(ZLevel(z)).map(|l| l.surface().fill_count());
        assert_eq!((fills(0), fills(1)), (Some(0), Some(2)));
    }

    #[test]
    fn invisible_and_unknown_records_are_skipped() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 0).invisible(true));
        scene.add(ShapeRecord::new("hexagon").with_id("h"));
        let report = comp.render(&mut scene);
        assert_eq!(report.painted, 0);
        assert!(report.errors.is_empty());
    }

    // ── labels ───────────────────────────────────────────────────────────

    #[test]
    fn labels_are_painted_after_the_shape() {
        let (mut comp, mut scene) = rig();
        let style = Style::new().with(keys::X, 10.0).with(keys::R, 5.0).with(keys::TEXT, "42");
        scene.add(ShapeRecord::new("circle").with_id("a").with_style(style));
        comp.render(&mut scene);
        let surface = comp.layer(ZLevel(0)).map(Layer::surface);
        assert_eq!(surface.map(|s| s.texts().collect::<Vec<_>>()), Some(vec!["42"]));
    }

    // ── assets ───────────────────────────────────────────────────────────

    #[test]
    fn pending_image_defers_until_ready() {
        let (mut comp, mut scene) = rig();
        let pending = comp.factory().pending_images();
        pending.mark_pending("logo.png");
        scene.add(
            ShapeRecord::new("image").with_id("img").with_style(
                Style::new()
                    .with(keys::IMAGE, "logo.png")
                    .with(keys::WIDTH, 20.0)
                    .with(keys::HEIGHT, 20.0),
            ),
        );
        let first = comp.render(&mut scene);
        assert_eq!(first.deferred, 1);
        assert_eq!(comp.pending().collect::<Vec<_>>(), vec![ZLevel(0)]);

        pending.mark_ready("logo.png");
        assert_eq!(comp.asset_ready(&mut scene), 1);
        let second = comp.refresh(&mut scene);
        assert_eq!((second.painted, second.deferred), (1, 0));
        let ops = comp.layer(ZLevel(0)).map(|l| l.surface().ops().to_vec()).unwrap_or_default();
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
    }

    // ── overlay & resize ─────────────────────────────────────────────────

    #[test]
    fn overlay_paints_entries_and_drains() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 0));
        let mut overlay = HoverOverlay::new();
        let style = scene.get(&"a".into()).map(|r| r.style().clone()).unwrap_or_default();
        overlay.push("a".into(), style);
        overlay.push("gone".into(), Style::new());
        assert_eq!(comp.paint_overlay(&scene, &mut overlay), 1);
        assert!(overlay.is_empty());
        assert_eq!(comp.overlay_surface().fill_count(), 1);
    }

    #[test]
    fn resize_repaints_every_layer() {
        let (mut comp, mut scene) = rig();
        scene.add(dot("a", 1));
        comp.render(&mut scene);
        comp.factory_mut().set_viewport(Viewport::new(400.0, 300.0));
        let report = comp.resize(&mut scene);
        assert_eq!(report.redrawn(), 2);
        assert_eq!(comp.viewport(), Viewport::new(400.0, 300.0));
        assert_eq!(comp.scratch().viewport(), Viewport::new(400.0, 300.0));
        assert!(comp.refresh(&mut scene).is_empty());
    }
}
