use std::collections::HashSet;

use crate::coords::Vec2;
use crate::scene::ShapeId;
use crate::style::Style;

use super::types::MouseButton;

/// Drag state machine.
///
/// `Pending` is entered on a primary press over a draggable record and
/// becomes `Dragging` on the first move. `last` is the pointer position the
/// next drift is measured from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Pending { id: ShapeId, last: Vec2 },
    Dragging { id: ShapeId, last: Vec2 },
}

/// What a cancelled drag rolls back to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DragSnapshot {
    pub position: Vec2,
    pub style: Style,
    pub invisible: bool,
}

/// Pointer state tracked across events for one engine.
#[derive(Debug, Default)]
pub struct InputState {
    /// Last known pointer position in logical pixels.
    pub pointer: Option<Vec2>,

    /// Record currently under the pointer.
    pub hover: Option<ShapeId>,

    /// Record under the pointer at the last primary press.
    pub down_target: Option<ShapeId>,

    pub drag: DragPhase,

    /// Host time of the touch press still in flight.
    pub touch_down_at: Option<f64>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    pub(crate) snapshot: Option<DragSnapshot>,
}

impl InputState {
    /// Record being dragged, once the drag has started.
    pub fn dragged(&self) -> Option<&ShapeId> {
        match &self.drag {
            DragPhase::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragPhase::Dragging { .. })
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Drops every reference to `id`.
    pub(crate) fn forget(&mut self, id: &ShapeId) {
        if self.hover.as_ref() == Some(id) {
            self.hover = None;
        }
        if self.down_target.as_ref() == Some(id) {
            self.down_target = None;
        }
        let dragging = match &self.drag {
            DragPhase::Pending { id: d, .. } | DragPhase::Dragging { id: d, .. } => d == id,
            DragPhase::Idle => false,
        };
        if dragging {
            self.drag = DragPhase::Idle;
            self.snapshot = None;
        }
    }
}
