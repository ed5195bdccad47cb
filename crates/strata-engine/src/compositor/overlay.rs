use crate::scene::ShapeId;
use crate::style::Style;

/// A record painted on the hover overlay with a substitute style.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub id: ShapeId,
    pub style: Style,
}

/// Transient contents of the hover overlay.
///
/// Filled by the input router, drained by the compositor on every overlay
/// repaint. Entries paint in push order.
#[derive(Debug, Default)]
pub struct HoverOverlay {
    entries: Vec<OverlayEntry>,
}

impl HoverOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ShapeId, style: Style) {
        self.entries.push(OverlayEntry { id, style });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn entries(&self) -> &[OverlayEntry] {
        &self.entries
    }

    pub fn drain(&mut self) -> impl Iterator<Item = OverlayEntry> + '_ {
        self.entries.drain(..)
    }
}
