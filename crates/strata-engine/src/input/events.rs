use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::coords::Vec2;
use crate::scene::{Scene, ShapeId};

use super::PointerKind;

/// Semantic interaction events.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Click,
    MouseOver,
    MouseOut,
    MouseMove,
    MouseWheel,
    MouseDown,
    MouseUp,
    DragStart,
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    DragEnd,
    Resize,
    GlobalOut,
}

impl EventKind {
    pub const ALL: [EventKind; 15] = [
        EventKind::Click,
        EventKind::MouseOver,
        EventKind::MouseOut,
        EventKind::MouseMove,
        EventKind::MouseWheel,
        EventKind::MouseDown,
        EventKind::MouseUp,
        EventKind::DragStart,
        EventKind::DragEnter,
        EventKind::DragOver,
        EventKind::DragLeave,
        EventKind::Drop,
        EventKind::DragEnd,
        EventKind::Resize,
        EventKind::GlobalOut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseOut => "mouseout",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseWheel => "mousewheel",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::DragStart => "dragstart",
            EventKind::DragEnter => "dragenter",
            EventKind::DragOver => "dragover",
            EventKind::DragLeave => "dragleave",
            EventKind::Drop => "drop",
            EventKind::DragEnd => "dragend",
            EventKind::Resize => "resize",
            EventKind::GlobalOut => "globalout",
        }
    }

    pub fn is_drag(self) -> bool {
        matches!(
            self,
            EventKind::DragStart
                | EventKind::DragEnter
                | EventKind::DragOver
                | EventKind::DragLeave
                | EventKind::Drop
                | EventKind::DragEnd
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result returned by per-shape handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; global listeners are not notified.
    Consumed,
    /// Event was not handled; keep routing.
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// Event delivered to handlers and listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeEvent {
    pub kind: EventKind,
    /// Record the event is about. `None` for events over empty space.
    pub target: Option<ShapeId>,
    /// Record being dragged, set on drag events.
    pub dragged: Option<ShapeId>,
    pub pos: Vec2,
    /// Wheel delta in lines, positive upwards. Zero for non-wheel events.
    pub wheel: f32,
    pub pointer: PointerKind,
}

impl ShapeEvent {
    pub fn new(kind: EventKind, target: Option<ShapeId>, pos: Vec2) -> Self {
        Self {
            kind,
            target,
            dragged: None,
            pos,
            wheel: 0.0,
            pointer: PointerKind::Mouse,
        }
    }

    pub fn with_dragged(mut self, dragged: Option<ShapeId>) -> Self {
        self.dragged = dragged;
        self
    }

    pub fn with_wheel(mut self, wheel: f32) -> Self {
        self.wheel = wheel;
        self
    }

    pub fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Rc<dyn Fn(&ShapeEvent)>;

/// Global listeners, keyed by event kind.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, listener: impl Fn(&ShapeEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.listeners.entry(kind).or_default().push((id, Rc::new(listener)));
        id
    }

    /// Removes one listener. Returns `false` if it was not subscribed.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        before != list.len()
    }

    /// Removes every listener for `kind`.
    pub fn off_all(&mut self, kind: EventKind) -> usize {
        self.listeners.remove(&kind).map_or(0, |l| l.len())
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn emit(&self, event: &ShapeEvent) {
        if let Some(list) = self.listeners.get(&event.kind) {
            for (_, listener) in list {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.name(), v.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

/// Delivers `event` to the target's own handler, then to global listeners
/// unless the handler consumed it.
pub(crate) fn dispatch(scene: &Scene, bus: &EventBus, event: ShapeEvent) {
    log::trace!("event {} on {:?}", event.kind, event.target);
    let handler = event
        .target
        .as_ref()
        .and_then(|id| scene.get(id))
        .and_then(|record| record.handlers.get(&event.kind))
        .cloned();
    if let Some(handler) = handler {
        if handler(&event).is_consumed() {
            return;
        }
    }
    bus.emit(&event);
}
