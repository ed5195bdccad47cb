use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::coords::{Matrix, Rect, Vec2};
use crate::input::{EventKind, EventResult, ShapeEvent};
use crate::shape::ShapePlugin;
use crate::style::Style;

use super::{ShapeId, ZLevel};

/// Per-shape event handler. Returning [`EventResult::Consumed`] stops the
/// event from reaching global listeners.
pub type ShapeHandler = Rc<dyn Fn(&ShapeEvent) -> EventResult>;

/// Rotation in radians (clockwise on screen) about `pivot`, or the local origin.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rotation {
    pub angle: f32,
    pub pivot: Option<Vec2>,
}

/// Non-uniform scale about `pivot`, or the local origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scale {
    pub sx: f32,
    pub sy: f32,
    pub pivot: Option<Vec2>,
}

impl Default for Scale {
    fn default() -> Self {
        Self { sx: 1.0, sy: 1.0, pivot: None }
    }
}

/// Memo slots for derived geometry. An empty slot means "recompute".
#[derive(Debug, Clone, Default)]
struct Derived {
    world: Cell<Option<Matrix>>,
    bounds: Cell<Option<Rect>>,
}

impl Derived {
    fn invalidate(&self) {
        self.world.set(None);
        self.bounds.set(None);
    }
}

/// One drawable entity.
///
/// Geometry-affecting fields are private so every mutation goes through a
/// path that empties the derived cache.
#[derive(Clone)]
pub struct ShapeRecord {
    id: Option<ShapeId>,
    shape: String,
    z: ZLevel,
    style: Style,
    position: Vec2,
    rotation: Rotation,
    scale: Scale,

    /// Style merged over the automatic emphasis when hovered.
    pub highlight_style: Style,
    pub invisible: bool,
    pub hoverable: bool,
    pub clickable: bool,
    pub draggable: bool,
    pub handlers: HashMap<EventKind, ShapeHandler>,

    derived: Derived,
}

impl ShapeRecord {
    /// New record of type `shape`. Hoverable by default; not clickable or draggable.
    pub fn new(shape: &str) -> Self {
        Self {
            id: None,
            shape: shape.to_string(),
            z: ZLevel::default(),
            style: Style::new(),
            position: Vec2::zero(),
            rotation: Rotation::default(),
            scale: Scale::default(),
            highlight_style: Style::new(),
            invisible: false,
            hoverable: true,
            clickable: false,
            draggable: false,
            handlers: HashMap::new(),
            derived: Derived::default(),
        }
    }

    // ── builder ───────────────────────────────────────────────────────────

    pub fn with_id(mut self, id: impl Into<ShapeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_z(mut self, z: impl Into<ZLevel>) -> Self {
        self.z = z.into();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self.derived.invalidate();
        self
    }

    pub fn with_highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self.derived.invalidate();
        self
    }

    pub fn with_rotation(mut self, angle: f32, pivot: Option<Vec2>) -> Self {
        self.rotation = Rotation { angle, pivot };
        self.derived.invalidate();
        self
    }

    pub fn with_scale(mut self, sx: f32, sy: f32, pivot: Option<Vec2>) -> Self {
        self.scale = Scale { sx, sy, pivot };
        self.derived.invalidate();
        self
    }

    pub fn hoverable(mut self, v: bool) -> Self {
        self.hoverable = v;
        self
    }

    pub fn clickable(mut self, v: bool) -> Self {
        self.clickable = v;
        self
    }

    pub fn draggable(mut self, v: bool) -> Self {
        self.draggable = v;
        self
    }

    pub fn invisible(mut self, v: bool) -> Self {
        self.invisible = v;
        self
    }

    pub fn on(
        mut self,
        kind: EventKind,
        handler: impl Fn(&ShapeEvent) -> EventResult + 'static,
    ) -> Self {
        self.handlers.insert(kind, Rc::new(handler));
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    /// Assigned on [`Scene::add`](super::Scene::add) when absent.
    #[inline]
    pub fn id(&self) -> Option<&ShapeId> {
        self.id.as_ref()
    }

    #[inline]
    pub fn shape(&self) -> &str {
        &self.shape
    }

    #[inline]
    pub fn z(&self) -> ZLevel {
        self.z
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.hoverable || self.clickable || self.draggable
    }

    /// Whether the world transform needs rebuilding before the next use.
    #[inline]
    pub fn needs_transform(&self) -> bool {
        self.derived.world.get().is_none()
    }

    /// Local → layer transform: scale, then rotate, then translate.
    pub fn world_transform(&self) -> Matrix {
        if let Some(m) = self.derived.world.get() {
            return m;
        }
        let origin = Vec2::zero();
        let m = Matrix::identity()
            .then_scale(self.scale.sx, self.scale.sy, self.scale.pivot.unwrap_or(origin))
            .then_rotate(self.rotation.angle, self.rotation.pivot.unwrap_or(origin))
            .then_translate(self.position);
        self.derived.world.set(Some(m));
        m
    }

    /// Local-space bounds as reported by `plugin`, memoised.
    pub fn local_bounds(&self, plugin: &dyn ShapePlugin) -> Rect {
        if let Some(r) = self.derived.bounds.get() {
            return r;
        }
        let r = plugin.bounding_rect(&self.style);
        self.derived.bounds.set(Some(r));
        r
    }

    /// Axis-aligned layer-space bounds.
    pub fn world_bounds(&self, plugin: &dyn ShapePlugin) -> Rect {
        let local = self.local_bounds(plugin);
        let m = self.world_transform();
        let (min, max) = (local.min(), local.max());
        Rect::from_points([
            m.apply(min),
            m.apply(Vec2::new(max.x, min.y)),
            m.apply(max),
            m.apply(Vec2::new(min.x, max.y)),
        ])
    }

    // ── crate-internal mutation ───────────────────────────────────────────

    pub(crate) fn set_id(&mut self, id: ShapeId) {
        self.id = Some(id);
    }

    pub(crate) fn style_mut(&mut self) -> &mut Style {
        self.derived.invalidate();
        &mut self.style
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.derived.invalidate();
    }

    pub(crate) fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.derived.invalidate();
    }

    pub(crate) fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
        self.derived.invalidate();
    }

    /// Gives a plugin mutable access to the drift-relevant fields.
    pub(crate) fn drift_with(&mut self, plugin: &dyn ShapePlugin, delta: Vec2) {
        plugin.drift(&mut self.position, &mut self.style, delta);
        self.derived.invalidate();
    }

    /// Applies `patch`; returns the previous z-level.
    pub(crate) fn apply(&mut self, patch: &ShapePatch) -> ZLevel {
        let old_z = self.z;
        if let Some(shape) = &patch.shape {
            self.shape = shape.clone();
        }
        if let Some(z) = patch.z {
            self.z = z;
        }
        if let Some(style) = &patch.style {
            self.style.merge(style);
        }
        if let Some(style) = &patch.highlight_style {
            self.highlight_style.merge(style);
        }
        if let Some(p) = patch.position {
            self.position = p;
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(s) = patch.scale {
            self.scale = s;
        }
        if let Some(v) = patch.invisible {
            self.invisible = v;
        }
        if let Some(v) = patch.hoverable {
            self.hoverable = v;
        }
        if let Some(v) = patch.clickable {
            self.clickable = v;
        }
        if let Some(v) = patch.draggable {
            self.draggable = v;
        }
        self.derived.invalidate();
        old_z
    }
}

impl fmt::Debug for ShapeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRecord")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .field("z", &self.z)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("invisible", &self.invisible)
            .field("style", &self.style)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

/// Partial update for [`Scene::modify`](super::Scene::modify).
///
/// `None` fields are left untouched. Styles merge key by key (nested maps
/// recursively); every other field is replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub shape: Option<String>,
    pub z: Option<ZLevel>,
    pub style: Option<Style>,
    pub highlight_style: Option<Style>,
    pub position: Option<Vec2>,
    pub rotation: Option<Rotation>,
    pub scale: Option<Scale>,
    pub invisible: Option<bool>,
    pub hoverable: Option<bool>,
    pub clickable: Option<bool>,
    pub draggable: Option<bool>,
}

impl ShapePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn z(mut self, z: impl Into<ZLevel>) -> Self {
        self.z = Some(z.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = Some(style);
        self
    }

    pub fn position(mut self, p: Vec2) -> Self {
        self.position = Some(p);
        self
    }

    pub fn rotation(mut self, angle: f32, pivot: Option<Vec2>) -> Self {
        self.rotation = Some(Rotation { angle, pivot });
        self
    }

    pub fn scale(mut self, sx: f32, sy: f32, pivot: Option<Vec2>) -> Self {
        self.scale = Some(Scale { sx, sy, pivot });
        self
    }

    pub fn invisible(mut self, v: bool) -> Self {
        self.invisible = Some(v);
        self
    }

    pub fn hoverable(mut self, v: bool) -> Self {
        self.hoverable = Some(v);
        self
    }

    pub fn clickable(mut self, v: bool) -> Self {
        self.clickable = Some(v);
        self
    }

    pub fn draggable(mut self, v: bool) -> Self {
        self.draggable = Some(v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CircleShape;
    use crate::style::keys;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn transform_is_memoised_until_mutation() {
        let mut r = ShapeRecord::new("circle").with_position(Vec2::new(5.0, 0.0));
        assert!(r.needs_transform());
        assert!(approx(r.world_transform().apply(Vec2::zero()), Vec2::new(5.0, 0.0)));
        assert!(!r.needs_transform());
        r.set_position(Vec2::new(9.0, 0.0));
        assert!(r.needs_transform());
        assert!(approx(r.world_transform().apply(Vec2::zero()), Vec2::new(9.0, 0.0)));
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let r = ShapeRecord::new("circle")
            .with_scale(2.0, 2.0, None)
            .with_rotation(std::f32::consts::FRAC_PI_2, None)
            .with_position(Vec2::new(10.0, 0.0));
        // (1,0) → scale (2,0) → rotate (0,2) → translate (10,2)
        assert!(approx(r.world_transform().apply(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 2.0)));
    }

    #[test]
    fn rotation_pivot_stays_fixed() {
        let pivot = Vec2::new(3.0, 4.0);
        let r = ShapeRecord::new("circle").with_rotation(1.2, Some(pivot));
        assert!(approx(r.world_transform().apply(pivot), pivot));
    }

    #[test]
    fn bounds_are_invalidated_by_style_patch() {
        let mut r = ShapeRecord::new("circle").with_style(Style::new().with(keys::R, 5.0));
        assert!((r.local_bounds(&CircleShape).size.x - 10.0).abs() < 0.01);
        r.apply(&ShapePatch::new().style(Style::new().with(keys::R, 10.0)));
        assert!((r.local_bounds(&CircleShape).size.x - 20.0).abs() < 0.01);
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let mut r = ShapeRecord::new("circle")
            .with_style(Style::new().with(keys::X, 5.0))
            .draggable(true);
        r.apply(&ShapePatch::new().style(Style::new().with(keys::Y, 1.0)));
        r.apply(&ShapePatch::new());
        assert_eq!(r.style().number(keys::X), Some(5.0));
        assert_eq!(r.style().number(keys::Y), Some(1.0));
        assert!(r.draggable);
    }
}
