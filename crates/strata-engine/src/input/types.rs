use crate::coords::Vec2;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// The button that drives clicks and drags.
    #[inline]
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Vertical component, positive when scrolling up, as lines.
    pub fn lines_y(self) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } => y,
            // Roughly one line per 40 logical pixels.
            MouseWheelDelta::Pixel { y, .. } => y / 40.0,
        }
    }
}

/// Source device of a pointer event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Platform-agnostic pointer input, in logical pixels.
///
/// `time_ms` is the host's monotonic clock; only touch click detection reads it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Moved {
        pos: Vec2,
        kind: PointerKind,
    },
    Pressed {
        pos: Vec2,
        button: MouseButton,
        kind: PointerKind,
        time_ms: f64,
    },
    Released {
        pos: Vec2,
        button: MouseButton,
        kind: PointerKind,
        time_ms: f64,
    },
    Wheel {
        pos: Vec2,
        delta: MouseWheelDelta,
    },
    /// Pointer left the root surface.
    Left,
}

impl PointerEvent {
    pub fn mouse_move(x: f32, y: f32) -> Self {
        PointerEvent::Moved { pos: Vec2::new(x, y), kind: PointerKind::Mouse }
    }

    pub fn mouse_down(x: f32, y: f32) -> Self {
        PointerEvent::Pressed {
            pos: Vec2::new(x, y),
            button: MouseButton::Left,
            kind: PointerKind::Mouse,
            time_ms: 0.0,
        }
    }

    pub fn mouse_up(x: f32, y: f32) -> Self {
        PointerEvent::Released {
            pos: Vec2::new(x, y),
            button: MouseButton::Left,
            kind: PointerKind::Mouse,
            time_ms: 0.0,
        }
    }

    pub fn touch_start(x: f32, y: f32, time_ms: f64) -> Self {
        PointerEvent::Pressed {
            pos: Vec2::new(x, y),
            button: MouseButton::Left,
            kind: PointerKind::Touch,
            time_ms,
        }
    }

    pub fn touch_end(x: f32, y: f32, time_ms: f64) -> Self {
        PointerEvent::Released {
            pos: Vec2::new(x, y),
            button: MouseButton::Left,
            kind: PointerKind::Touch,
            time_ms,
        }
    }

    /// Pointer position carried by the event, if any.
    pub fn pos(&self) -> Option<Vec2> {
        match *self {
            PointerEvent::Moved { pos, .. }
            | PointerEvent::Pressed { pos, .. }
            | PointerEvent::Released { pos, .. }
            | PointerEvent::Wheel { pos, .. } => Some(pos),
            PointerEvent::Left => None,
        }
    }
}
