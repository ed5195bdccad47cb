//! Engine facade.
//!
//! Wires one scene, compositor, input router and clock together. Nothing is
//! global: each engine gets its own registry handle and configuration, so
//! several engines can share a thread.

use std::rc::Rc;

use crate::animation::{AnimationHandle, Animator, Clock, Easing, TickReport};
use crate::compositor::{Compositor, HoverOverlay, RedrawReport};
use crate::config::EngineConfig;
use crate::coords::Vec2;
use crate::diagnostics::Diagnostics;
use crate::error::EngineError;
use crate::input::{
    EventBus, EventKind, InputRouter, InputState, ListenerId, PointerEvent, RouteCtx, RouteOutcome,
    ShapeEvent, dispatch,
};
use crate::scene::{Scene, ShapeId, ShapePatch, ShapeRecord};
use crate::shape::ShapeRegistry;
use crate::surface::SurfaceFactory;

pub struct Engine<F: SurfaceFactory> {
    config: EngineConfig,
    scene: Scene,
    compositor: Compositor<F>,
    router: InputRouter,
    overlay: HoverOverlay,
    events: EventBus,
    clock: Clock,
    diagnostics: Diagnostics,
}

impl<F: SurfaceFactory> Engine<F> {
    pub fn new(factory: F, registry: Rc<ShapeRegistry>, config: EngineConfig) -> Self {
        log::info!("engine starting with {} shape type(s)", registry.tags().count());
        Self {
            scene: Scene::new(registry),
            compositor: Compositor::new(factory),
            router: InputRouter::new(config.input.clone(), config.highlight.clone()),
            overlay: HoverOverlay::new(),
            events: EventBus::new(),
            clock: Clock::new(),
            diagnostics: Diagnostics::new(config.diagnostics),
            config,
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn compositor(&self) -> &Compositor<F> {
        &self.compositor
    }

    pub fn factory(&self) -> &F {
        self.compositor.factory()
    }

    /// Host-side access to the factory, e.g. to change the viewport before
    /// [`resize`](Self::resize).
    pub fn factory_mut(&mut self) -> &mut F {
        self.compositor.factory_mut()
    }

    pub fn input(&self) -> &InputState {
        self.router.state()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // ── scene ────────────────────────────────────────────────────────────

    pub fn new_id(&mut self, prefix: &str) -> ShapeId {
        self.scene.new_id(prefix)
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&ShapeRecord> {
        self.scene.get(id)
    }

    pub fn add_shape(&mut self, record: ShapeRecord) -> ShapeId {
        let shape = record.shape().to_string();
        let id = self.scene.add(record);
        if !self.scene.registry().contains(&shape) {
            self.diagnostics.report(&EngineError::UnknownShape { id: id.clone(), shape });
        }
        id
    }

    pub fn remove_shape(&mut self, id: &ShapeId) -> bool {
        let hovered = self.forget(id);
        let removed = self.scene.remove(id).is_some();
        if hovered {
            self.repaint_overlay();
        }
        removed
    }

    pub fn remove_shapes<'a>(&mut self, ids: impl IntoIterator<Item = &'a ShapeId>) -> usize {
        let ids: Vec<&ShapeId> = ids.into_iter().collect();
        let mut hovered = false;
        for id in &ids {
            hovered |= self.forget(id);
        }
        let removed = self.scene.remove_many(ids);
        if hovered {
            self.repaint_overlay();
        }
        removed
    }

    /// Removes every record. Running animations keep ticking harmlessly.
    pub fn clear(&mut self) {
        self.cancel_drag();
        self.router.invalidate_hover();
        self.scene.clear();
        self.repaint_overlay();
    }

    /// Merges `patch` into the record. Unknown ids return `false`.
    pub fn modify_shape(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        if self.scene.modify(id, patch) {
            return true;
        }
        self.diagnostics.report(&EngineError::StaleReference(id.clone()));
        false
    }

    // ── drawing ──────────────────────────────────────────────────────────

    /// Full repaint of every layer.
    pub fn render(&mut self) -> RedrawReport {
        let report = self.compositor.render(&mut self.scene);
        self.route_errors(&report.errors);
        report
    }

    /// Repaints dirty layers only.
    pub fn refresh(&mut self) -> RedrawReport {
        let report = self.compositor.refresh(&mut self.scene);
        self.route_errors(&report.errors);
        report
    }

    /// Re-measures the viewport from the factory, repaints everything and
    /// emits `resize`.
    pub fn resize(&mut self) -> RedrawReport {
        self.router.invalidate_hover();
        let report = self.compositor.resize(&mut self.scene);
        self.route_errors(&report.errors);
        dispatch(&self.scene, &self.events, ShapeEvent::new(EventKind::Resize, None, Vec2::zero()));
        report
    }

    /// Call once an asset a surface reported as not ready has loaded.
    pub fn asset_ready(&mut self) -> RedrawReport {
        let levels = self.compositor.asset_ready(&mut self.scene);
        log::debug!("asset ready; {levels} level(s) re-dirtied");
        self.refresh()
    }

    // ── events ───────────────────────────────────────────────────────────

    pub fn on(&mut self, kind: EventKind, listener: impl Fn(&ShapeEvent) + 'static) -> ListenerId {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }

    /// Routes one pointer event, then repaints what it touched.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> RouteOutcome {
        let outcome = {
            let mut ctx = RouteCtx {
                scene: &mut self.scene,
                events: &self.events,
                overlay: &mut self.overlay,
                scratch: Some(self.compositor.scratch_mut()),
            };
            self.router.handle(event, &mut ctx)
        };
        self.after_route(outcome);
        outcome
    }

    /// Aborts an active drag, restoring the dragged record.
    pub fn cancel_drag(&mut self) -> bool {
        let cancelled = {
            let mut ctx = RouteCtx {
                scene: &mut self.scene,
                events: &self.events,
                overlay: &mut self.overlay,
                scratch: Some(self.compositor.scratch_mut()),
            };
            self.router.cancel_drag(&mut ctx)
        };
        if cancelled {
            self.after_route(RouteOutcome { redraw: true, overlay: true });
        }
        cancelled
    }

    // ── animation ────────────────────────────────────────────────────────

    /// Advances animations to `now` (milliseconds on the host clock).
    pub fn tick(&mut self, now: f64) -> TickReport {
        let compositor = &mut self.compositor;
        let diagnostics = &self.diagnostics;
        let report = self.clock.update(now, &mut self.scene, |scene| {
            let redraw = compositor.refresh(scene);
            for err in &redraw.errors {
                diagnostics.report(err);
            }
        });
        self.route_errors(&report.errors);
        let state = self.router.state();
        if report.refreshed && (state.hover.is_some() || state.dragged().is_some()) {
            self.repaint_overlay();
        }
        report
    }

    /// Starts `animator` with its first keyframe at host time `now`.
    pub fn animate(&mut self, animator: Animator, easing: Easing, now: f64) -> AnimationHandle {
        animator.start(&mut self.clock, &self.scene, easing, now)
    }

    /// Stops an animation without firing its `done` callback.
    pub fn stop_animation(&mut self, handle: AnimationHandle) -> usize {
        self.clock.stop(handle)
    }

    /// Callback run after every tick that advanced an animation.
    pub fn on_tick(&mut self, f: impl FnMut(f64) + 'static) {
        self.clock.set_on_tick(f);
    }

    // ── internals ────────────────────────────────────────────────────────

    fn after_route(&mut self, outcome: RouteOutcome) {
        if outcome.redraw {
            self.refresh();
        }
        if outcome.overlay {
            self.compositor.paint_overlay(&self.scene, &mut self.overlay);
        }
    }

    /// Drops router references to `id`. Returns whether it was hovered.
    fn forget(&mut self, id: &ShapeId) -> bool {
        if self.router.state().dragged() == Some(id) {
            self.cancel_drag();
        }
        let hovered = self.router.state().hover.as_ref() == Some(id);
        self.router.forget(id);
        hovered
    }

    /// Rebuilds the overlay from the scene and paints it.
    fn repaint_overlay(&mut self) {
        self.router.rebuild_overlay(&self.scene, &mut self.overlay);
        self.compositor.paint_overlay(&self.scene, &mut self.overlay);
    }

    fn route_errors(&self, errors: &[EngineError]) {
        for err in errors {
            self.diagnostics.report(err);
        }
    }
}

impl<F: SurfaceFactory> std::fmt::Debug for Engine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("records", &self.scene.len())
            .field("compositor", &self.compositor)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
