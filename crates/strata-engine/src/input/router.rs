use crate::compositor::HoverOverlay;
use crate::config::InputConfig;
use crate::coords::Vec2;
use crate::scene::{Scene, ShapeId, ShapePatch};
use crate::style::{HighlightConfig, resolve_highlight};
use crate::surface::Surface;

use super::events::{EventBus, EventKind, ShapeEvent, dispatch};
use super::state::{DragPhase, DragSnapshot, InputState};
use super::types::{MouseWheelDelta, PointerEvent, PointerKind};

/// Borrowed engine pieces the router works against for one event.
pub struct RouteCtx<'a> {
    pub scene: &'a mut Scene,
    pub events: &'a EventBus,
    pub overlay: &'a mut HoverOverlay,
    /// Surface used by the path and pixel hit-test tiers.
    pub scratch: Option<&'a mut dyn Surface>,
}

impl RouteCtx<'_> {
    fn hit(&mut self, pos: Vec2, exclude: Option<&ShapeId>) -> Option<ShapeId> {
        let scratch = self.scratch.as_mut().map(|p| &mut **p as &mut dyn Surface);
        self.scene.hit_test(pos, exclude, scratch)
    }

    fn fire(&self, event: ShapeEvent) {
        dispatch(&*self.scene, self.events, event);
    }
}

/// What the host should repaint after an event.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RouteOutcome {
    /// Some layer went dirty.
    pub redraw: bool,
    /// Overlay contents were rebuilt.
    pub overlay: bool,
}

/// Turns raw pointer input into hover, click and drag events.
#[derive(Debug)]
pub struct InputRouter {
    config: InputConfig,
    highlight: HighlightConfig,
    state: InputState,
}

impl InputRouter {
    pub fn new(config: InputConfig, highlight: HighlightConfig) -> Self {
        Self {
            config,
            highlight,
            state: InputState::default(),
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn handle(&mut self, event: &PointerEvent, ctx: &mut RouteCtx<'_>) -> RouteOutcome {
        match *event {
            PointerEvent::Moved { pos, kind } => self.on_move(pos, kind, ctx),
            PointerEvent::Pressed { pos, button, kind, time_ms } => {
                if !button.is_primary() {
                    log::trace!("ignoring press of {button:?}");
                    return RouteOutcome::default();
                }
                self.state.buttons_down.insert(button);
                self.on_down(pos, kind, time_ms, ctx);
            }
            PointerEvent::Released { pos, button, kind, time_ms } => {
                if !button.is_primary() {
                    return RouteOutcome::default();
                }
                self.state.buttons_down.remove(&button);
                self.on_up(pos, kind, time_ms, ctx);
            }
            PointerEvent::Wheel { pos, delta } => self.on_wheel(pos, delta, ctx),
            PointerEvent::Left => self.on_leave(ctx),
        }

        self.rebuild_overlay(ctx.scene, ctx.overlay);
        RouteOutcome {
            redraw: ctx.scene.has_dirty(),
            overlay: true,
        }
    }

    /// Aborts an active drag, rolling the record back to where it started.
    ///
    /// Fires `dragend` without `drop`. Returns `false` if nothing was dragged.
    pub fn cancel_drag(&mut self, ctx: &mut RouteCtx<'_>) -> bool {
        let snapshot = self.state.snapshot.take();
        let (id, last) = match std::mem::take(&mut self.state.drag) {
            DragPhase::Dragging { id, last } => (id, last),
            DragPhase::Pending { .. } | DragPhase::Idle => return false,
        };
        log::debug!("drag of {id} cancelled");
        if let Some(snap) = snapshot {
            ctx.scene.restore(&id, snap.position, snap.style);
            ctx.scene.modify(&id, &ShapePatch::new().invisible(snap.invisible));
        }
        ctx.fire(
            ShapeEvent::new(EventKind::DragEnd, Some(id.clone()), last).with_dragged(Some(id)),
        );
        self.rebuild_overlay(ctx.scene, ctx.overlay);
        true
    }

    /// Forgets the hovered record so the next move re-resolves it.
    pub fn invalidate_hover(&mut self) {
        self.state.hover = None;
    }

    /// Drops references to a record that left the scene.
    pub fn forget(&mut self, id: &ShapeId) {
        self.state.forget(id);
    }

    // ── handlers ─────────────────────────────────────────────────────────

    fn on_move(&mut self, pos: Vec2, kind: PointerKind, ctx: &mut RouteCtx<'_>) {
        self.state.pointer = Some(pos);

        if let DragPhase::Pending { id, last } = &self.state.drag {
            let (id, last) = (id.clone(), *last);
            if self.begin_drag(&id, last, kind, ctx) {
                self.state.drag = DragPhase::Dragging { id, last };
            } else {
                self.state.drag = DragPhase::Idle;
            }
        }

        if let DragPhase::Dragging { id, last } = &mut self.state.drag {
            let delta = pos - *last;
            *last = pos;
            if !ctx.scene.drift(id, delta.x, delta.y) {
                log::debug!("dragged record {id} vanished");
                self.state.drag = DragPhase::Idle;
                self.state.snapshot = None;
            }
        }

        let dragged = self.state.dragged().cloned();
        let target = ctx.hit(pos, dragged.as_ref());
        self.set_hover(target.clone(), pos, kind, ctx);

        if let (Some(dragged), Some(over)) = (&dragged, &target) {
            ctx.fire(
                ShapeEvent::new(EventKind::DragOver, Some(over.clone()), pos)
                    .with_dragged(Some(dragged.clone()))
                    .with_pointer(kind),
            );
        }
        ctx.fire(ShapeEvent::new(EventKind::MouseMove, target, pos).with_pointer(kind));
    }

    fn on_down(&mut self, pos: Vec2, kind: PointerKind, time_ms: f64, ctx: &mut RouteCtx<'_>) {
        if self.state.is_dragging() {
            self.cancel_drag(ctx);
        }
        self.state.pointer = Some(pos);

        let target = ctx.hit(pos, None);
        if kind == PointerKind::Touch {
            // Touch has no hover phase before the press.
            self.state.touch_down_at = Some(time_ms);
            self.set_hover(target.clone(), pos, kind, ctx);
        }

        ctx.fire(ShapeEvent::new(EventKind::MouseDown, target.clone(), pos).with_pointer(kind));
        self.state.down_target = target.clone();

        if let Some(id) = target {
            if ctx.scene.get(&id).is_some_and(|r| r.draggable && r.hoverable) {
                self.state.drag = DragPhase::Pending { id, last: pos };
            }
        }
    }

    fn on_up(&mut self, pos: Vec2, kind: PointerKind, time_ms: f64, ctx: &mut RouteCtx<'_>) {
        self.state.pointer = Some(pos);

        self.state.down_target = None;
        let drag = std::mem::take(&mut self.state.drag);
        let dragged = match &drag {
            DragPhase::Dragging { id, .. } => Some(id.clone()),
            _ => None,
        };
        let target = ctx.hit(pos, dragged.as_ref());
        ctx.fire(ShapeEvent::new(EventKind::MouseUp, target.clone(), pos).with_pointer(kind));

        match dragged {
            Some(id) => {
                let invisible = self.state.snapshot.take().is_some_and(|s| s.invisible);
                ctx.scene.modify(&id, &ShapePatch::new().invisible(invisible));
                if let Some(over) = &target {
                    ctx.fire(
                        ShapeEvent::new(EventKind::Drop, Some(over.clone()), pos)
                            .with_dragged(Some(id.clone()))
                            .with_pointer(kind),
                    );
                }
                ctx.fire(
                    ShapeEvent::new(EventKind::DragEnd, Some(id.clone()), pos)
                        .with_dragged(Some(id))
                        .with_pointer(kind),
                );
            }
            None => self.click(target, pos, kind, time_ms, ctx),
        }

        if kind == PointerKind::Touch {
            self.state.touch_down_at = None;
            self.set_hover(None, pos, kind, ctx);
        }
    }

    fn click(
        &mut self,
        target: Option<ShapeId>,
        pos: Vec2,
        kind: PointerKind,
        time_ms: f64,
        ctx: &mut RouteCtx<'_>,
    ) {
        let mut target = target;
        if kind == PointerKind::Touch {
            let held = self.state.touch_down_at.map(|down| time_ms - down);
            if held.is_some_and(|ms| ms > self.config.touch_click_delay_ms) {
                log::trace!("touch held {held:?}ms; no click");
                return;
            }
            if target.is_none() {
                target = self.search_cross(pos, ctx);
            }
        }
        // Non-clickable records still let the click reach global listeners.
        let target = target.filter(|id| ctx.scene.get(id).is_some_and(|r| r.clickable));
        ctx.fire(ShapeEvent::new(EventKind::Click, target, pos).with_pointer(kind));
    }

    fn on_wheel(&mut self, pos: Vec2, delta: MouseWheelDelta, ctx: &mut RouteCtx<'_>) {
        self.state.pointer = Some(pos);
        let target = self.state.hover.clone();
        ctx.fire(ShapeEvent::new(EventKind::MouseWheel, target, pos).with_wheel(delta.lines_y()));
    }

    fn on_leave(&mut self, ctx: &mut RouteCtx<'_>) {
        self.cancel_drag(ctx);
        self.state.drag = DragPhase::Idle;

        let pos = self.state.pointer.take().unwrap_or_default();
        self.set_hover(None, pos, PointerKind::Mouse, ctx);
        self.state.touch_down_at = None;
        self.state.down_target = None;
        self.state.buttons_down.clear();
        ctx.fire(ShapeEvent::new(EventKind::GlobalOut, None, pos));
    }

    // ── helpers ──────────────────────────────────────────────────────────

    /// Hides the record in its layer and fires `dragstart`.
    fn begin_drag(
        &mut self,
        id: &ShapeId,
        at: Vec2,
        kind: PointerKind,
        ctx: &mut RouteCtx<'_>,
    ) -> bool {
        let Some(record) = ctx.scene.get(id) else {
            return false;
        };
        self.state.snapshot = Some(DragSnapshot {
            position: record.position(),
            style: record.style().clone(),
            invisible: record.invisible,
        });
        ctx.scene.modify(id, &ShapePatch::new().invisible(true));
        log::debug!("drag of {id} started");
        ctx.fire(
            ShapeEvent::new(EventKind::DragStart, Some(id.clone()), at)
                .with_dragged(Some(id.clone()))
                .with_pointer(kind),
        );
        true
    }

    fn set_hover(
        &mut self,
        target: Option<ShapeId>,
        pos: Vec2,
        kind: PointerKind,
        ctx: &mut RouteCtx<'_>,
    ) {
        if target == self.state.hover {
            return;
        }
        let dragged = self.state.dragged().cloned();

        if let Some(old) = self.state.hover.take() {
            if ctx.scene.contains(&old) {
                ctx.fire(
                    ShapeEvent::new(EventKind::MouseOut, Some(old.clone()), pos).with_pointer(kind),
                );
                if dragged.as_ref().is_some_and(|d| *d != old) {
                    ctx.fire(
                        ShapeEvent::new(EventKind::DragLeave, Some(old), pos)
                            .with_dragged(dragged.clone())
                            .with_pointer(kind),
                    );
                }
            }
        }

        if let Some(new) = &target {
            ctx.fire(
                ShapeEvent::new(EventKind::MouseOver, Some(new.clone()), pos).with_pointer(kind),
            );
            if dragged.is_some() {
                ctx.fire(
                    ShapeEvent::new(EventKind::DragEnter, Some(new.clone()), pos)
                        .with_dragged(dragged)
                        .with_pointer(kind),
                );
            }
        }
        self.state.hover = target;
    }

    /// Looks for a record around an imprecise touch release.
    fn search_cross(&self, pos: Vec2, ctx: &mut RouteCtx<'_>) -> Option<ShapeId> {
        let d = self.config.touch_search_offset;
        [Vec2::new(-d, 0.0), Vec2::new(d, 0.0), Vec2::new(0.0, -d), Vec2::new(0.0, d)]
            .into_iter()
            .find_map(|offset| ctx.hit(pos + offset, None))
    }

    /// Refills `overlay` from the current scene: dragged record first, then
    /// the hover highlight on top.
    pub fn rebuild_overlay(&self, scene: &Scene, overlay: &mut HoverOverlay) {
        overlay.clear();
        if let Some(record) = self.state.dragged().and_then(|id| scene.get(id)) {
            if let Some(id) = record.id() {
                overlay.push(id.clone(), record.style().clone());
            }
        }
        let hovered = self
            .state
            .hover
            .as_ref()
            .and_then(|id| scene.get(id))
            .filter(|r| r.hoverable && !r.invisible);
        if let Some(record) = hovered {
            if let Some(id) = record.id() {
                let style =
                    resolve_highlight(record.style(), &record.highlight_style, &self.highlight);
                overlay.push(id.clone(), style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::MouseButton;
    use crate::scene::ShapeRecord;
    use crate::shape::ShapeRegistry;
    use crate::style::{Style, keys};

    struct Rig {
        scene: Scene,
        bus: EventBus,
        overlay: HoverOverlay,
        router: InputRouter,
        log: Rc<RefCell<Vec<(EventKind, Option<ShapeId>)>>>,
    }

    impl Rig {
        fn new() -> Self {
            let mut bus = EventBus::new();
            let log = Rc::new(RefCell::new(Vec::new()));
            for kind in EventKind::ALL {
                let sink = Rc::clone(&log);
                bus.on(kind, move |e| sink.borrow_mut().push((e.kind, e.target.clone())));
            }
            Self {
                scene: Scene::new(Rc::new(ShapeRegistry::with_builtins())),
                bus,
                overlay: HoverOverlay::new(),
                router: InputRouter::new(InputConfig::default(), HighlightConfig::default()),
                log,
            }
        }

        fn send(&mut self, event: PointerEvent) -> RouteOutcome {
            let mut ctx = RouteCtx {
                scene: &mut self.scene,
                events: &self.bus,
                overlay: &mut self.overlay,
                scratch: None,
            };
            self.router.handle(&event, &mut ctx)
        }

        fn cancel(&mut self) -> bool {
            let mut ctx = RouteCtx {
                scene: &mut self.scene,
                events: &self.bus,
                overlay: &mut self.overlay,
                scratch: None,
            };
            self.router.cancel_drag(&mut ctx)
        }

        fn kinds(&self, filter: impl Fn(EventKind) -> bool) -> Vec<EventKind> {
            self.log.borrow().iter().map(|(k, _)| *k).filter(|k| filter(*k)).collect()
        }

        fn events_on(&self, id: &str) -> Vec<EventKind> {
            self.log
                .borrow()
                .iter()
                .filter(|(_, t)| t.as_ref().is_some_and(|t| t.as_str() == id))
                .map(|(k, _)| *k)
                .collect()
        }
    }

    fn circle(x: f32, y: f32, r: f32) -> Style {
        Style::new().with(keys::X, x).with(keys::Y, y).with(keys::R, r)
    }

    fn dot(id: &str, x: f32, y: f32, r: f32) -> ShapeRecord {
        ShapeRecord::new("circle").with_id(id).with_style(circle(x, y, r))
    }

    // ── hover ────────────────────────────────────────────────────────────

    #[test]
    fn hover_fires_over_and_out_and_highlights() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0));

        rig.send(PointerEvent::mouse_move(10.0, 10.0));
        assert_eq!(rig.router.state().hover, Some(ShapeId::from("a")));
        assert!(rig.overlay.contains(&ShapeId::from("a")));

        rig.send(PointerEvent::mouse_move(50.0, 50.0));
        assert_eq!(
            rig.events_on("a"),
            vec![EventKind::MouseOver, EventKind::MouseMove, EventKind::MouseOut]
        );
        assert!(rig.overlay.is_empty());
    }

    #[test]
    fn leaving_the_root_emits_globalout() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0));
        rig.send(PointerEvent::mouse_move(10.0, 10.0));
        rig.send(PointerEvent::Left);
        let tail = rig.kinds(|_| true);
        assert_eq!(&tail[tail.len() - 2..], &[EventKind::MouseOut, EventKind::GlobalOut]);
        assert_eq!(rig.router.state().hover, None);
    }

    // ── click ────────────────────────────────────────────────────────────

    #[test]
    fn press_and_release_clicks_the_target() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0).clickable(true));
        rig.send(PointerEvent::mouse_down(10.0, 10.0));
        rig.send(PointerEvent::mouse_up(10.0, 10.0));
        assert_eq!(
            rig.events_on("a"),
            vec![EventKind::MouseDown, EventKind::MouseUp, EventKind::Click]
        );
    }

    #[test]
    fn non_clickable_record_is_not_the_click_target() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0).clickable(false));
        rig.send(PointerEvent::mouse_down(10.0, 10.0));
        rig.send(PointerEvent::mouse_up(10.0, 10.0));
        assert_eq!(rig.events_on("a"), vec![EventKind::MouseDown, EventKind::MouseUp]);
        let clicks: Vec<Option<ShapeId>> = rig
            .log
            .borrow()
            .iter()
            .filter(|(k, _)| *k == EventKind::Click)
            .map(|(_, t)| t.clone())
            .collect();
        assert_eq!(clicks, vec![None]);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0));
        let press = PointerEvent::Pressed {
            pos: Vec2::new(10.0, 10.0),
            button: MouseButton::Right,
            kind: PointerKind::Mouse,
            time_ms: 0.0,
        };
        assert_eq!(rig.send(press), RouteOutcome::default());
        assert!(rig.log.borrow().is_empty());
    }

    #[test]
    fn slow_touch_is_not_a_click() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0).clickable(true));
        rig.send(PointerEvent::touch_start(10.0, 10.0, 0.0));
        rig.send(PointerEvent::touch_end(10.0, 10.0, 450.0));
        assert!(!rig.events_on("a").contains(&EventKind::Click));

        rig.send(PointerEvent::touch_start(10.0, 10.0, 1000.0));
        rig.send(PointerEvent::touch_end(10.0, 10.0, 1100.0));
        assert!(rig.events_on("a").contains(&EventKind::Click));
    }

    #[test]
    fn touch_release_near_a_shape_searches_around_it() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 3.0).clickable(true));
        rig.send(PointerEvent::touch_start(20.0, 10.0, 0.0));
        rig.send(PointerEvent::touch_end(20.0, 10.0, 50.0));
        assert_eq!(rig.events_on("a"), vec![EventKind::Click]);
    }

    // ── drag ─────────────────────────────────────────────────────────────

    #[test]
    fn drag_onto_another_record_drops_there() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0).draggable(true));
        rig.scene.add(dot("b", 60.0, 10.0, 5.0));

        rig.send(PointerEvent::mouse_down(10.0, 10.0));
        rig.send(PointerEvent::mouse_move(60.0, 10.0));
        assert!(rig.overlay.contains(&ShapeId::from("a")));
        rig.send(PointerEvent::mouse_up(60.0, 10.0));

        let sequence =
            rig.kinds(|k| k.is_drag() || matches!(k, EventKind::MouseDown | EventKind::MouseUp));
        assert_eq!(
            sequence,
            vec![
                EventKind::MouseDown,
                EventKind::DragStart,
                EventKind::DragEnter,
                EventKind::DragOver,
                EventKind::MouseUp,
                EventKind::Drop,
                EventKind::DragEnd,
            ]
        );
        let a = rig.scene.get(&ShapeId::from("a")).unwrap();
        assert_eq!(a.position(), Vec2::new(50.0, 0.0));
        assert!(!a.invisible);
        assert!(!rig.events_on("a").contains(&EventKind::DragEnter));
        assert!(!rig.events_on("a").contains(&EventKind::DragLeave));
    }

    #[test]
    fn press_without_move_is_a_click_not_a_drag() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0).draggable(true).clickable(true));
        rig.send(PointerEvent::mouse_down(10.0, 10.0));
        rig.send(PointerEvent::mouse_up(10.0, 10.0));
        assert!(rig.kinds(EventKind::is_drag).is_empty());
        assert!(rig.events_on("a").contains(&EventKind::Click));
    }

    #[test]
    fn cancelled_drag_restores_the_record() {
        let mut rig = Rig::new();
        let style = circle(10.0, 10.0, 5.0);
        let record = ShapeRecord::new("circle").with_id("a").with_style(style.clone());
        rig.scene.add(record.draggable(true));

        rig.send(PointerEvent::mouse_down(10.0, 10.0));
        rig.send(PointerEvent::mouse_move(30.0, 40.0));
        assert!(rig.scene.get(&ShapeId::from("a")).unwrap().invisible);
        assert!(rig.cancel());

        let a = rig.scene.get(&ShapeId::from("a")).unwrap();
        assert_eq!(a.position(), Vec2::zero());
        assert_eq!(a.style(), &style);
        assert!(!a.invisible);
        assert_eq!(rig.kinds(EventKind::is_drag), vec![EventKind::DragStart, EventKind::DragEnd]);
        assert!(!rig.cancel());
    }

    #[test]
    fn leaving_mid_drag_cancels_without_drop() {
        let mut rig = Rig::new();
        rig.scene.add(dot("a", 10.0, 10.0, 5.0).draggable(true));
        rig.send(PointerEvent::mouse_down(10.0, 10.0));
        rig.send(PointerEvent::mouse_move(20.0, 10.0));
        rig.send(PointerEvent::Left);
        assert_eq!(rig.scene.get(&ShapeId::from("a")).unwrap().position(), Vec2::zero());
        assert!(!rig.kinds(|_| true).contains(&EventKind::Drop));
        assert_eq!(rig.kinds(|_| true).last(), Some(&EventKind::GlobalOut));
    }
}
