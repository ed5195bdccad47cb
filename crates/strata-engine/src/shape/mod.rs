//! Shape plugins and the per-engine registry.
//!
//! A record's `shape` tag selects a [`ShapePlugin`]. Plugins turn a [`Style`]
//! into path geometry; the engine handles transforms, painting order, labels,
//! highlighting and hit-testing around them.

mod builtins;
pub mod hit;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::coords::{Rect, Vec2};
use crate::surface::{DrawError, Path, PathSink, Surface};
use crate::style::Style;

pub use builtins::{
    CircleShape, ImageShape, LineShape, PolygonShape, RectangleShape, RingShape, SectorShape,
};
pub use hit::{HitResult, hit_shape};

/// Geometry capability for one shape type.
///
/// All geometry is in the record's local space; the record's transform is
/// already applied to the surface when [`brush`](Self::brush) runs.
pub trait ShapePlugin {
    /// Emits the outline described by `style`.
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink);

    /// Local-space bounds, including half the stroke width when the shape strokes.
    fn bounding_rect(&self, style: &Style) -> Rect {
        let mut path = Path::new();
        self.build_path(style, &mut path);
        let bounds = path.bounds();
        match style.brush().effective_stroke() {
            Some(stroke) => bounds.expand(stroke.width * 0.5),
            None => bounds,
        }
    }

    /// Analytic containment test for a local-space point.
    ///
    /// `None` defers to the surface-backed tiers.
    fn hit_test(&self, _style: &Style, _local: Vec2) -> Option<bool> {
        None
    }

    /// Moves the shape by `delta`. The default offsets the record position.
    fn drift(&self, position: &mut Vec2, _style: &mut Style, delta: Vec2) {
        *position += delta;
    }

    /// Paints the shape onto `surface` using the style's brush.
    fn brush(&self, style: &Style, surface: &mut dyn Surface) -> Result<(), DrawError> {
        let brush = style.brush();
        surface.set_brush(&brush);
        surface.begin_path();
        self.build_path(style, surface.as_path_sink());
        if brush.effective_fill().is_some() {
            surface.fill();
        }
        if brush.effective_stroke().is_some() {
            surface.stroke();
        }
        Ok(())
    }
}

/// Tag → plugin table. One registry per engine; engines never share global state.
#[derive(Clone, Default)]
pub struct ShapeRegistry {
    plugins: HashMap<String, Rc<dyn ShapePlugin>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in shapes:
    /// `circle`, `rectangle`, `sector`, `ring`, `polygon`, `line`, `image`.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("circle", CircleShape);
        reg.register("rectangle", RectangleShape);
        reg.register("sector", SectorShape);
        reg.register("ring", RingShape);
        reg.register("polygon", PolygonShape);
        reg.register("line", LineShape);
        reg.register("image", ImageShape);
        reg
    }

    /// Registers `plugin` under `tag`, returning the plugin it replaced.
    pub fn register(
        &mut self,
        tag: &str,
        plugin: impl ShapePlugin + 'static,
    ) -> Option<Rc<dyn ShapePlugin>> {
        log::debug!("shape plugin registered: {tag}");
        self.plugins.insert(tag.to_string(), Rc::new(plugin))
    }

    #[inline]
    pub fn get(&self, tag: &str) -> Option<&dyn ShapePlugin> {
        self.plugins.get(tag).map(|p| p.as_ref())
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.plugins.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("ShapeRegistry").field("tags", &tags).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::keys;

    struct Dot;

    impl ShapePlugin for Dot {
        fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
            let x = style.number_or(keys::X, 0.0);
            sink.rect(Rect::new(x, 0.0, 1.0, 1.0));
        }
    }

    #[test]
    fn builtins_are_registered() {
        let reg = ShapeRegistry::with_builtins();
        for tag in ["circle", "rectangle", "sector", "ring", "polygon", "line", "image"] {
            assert!(reg.contains(tag), "{tag}");
        }
        assert!(!reg.contains("star"));
    }

    #[test]
    fn registries_are_independent() {
        let mut a = ShapeRegistry::new();
        let b = ShapeRegistry::new();
        assert!(a.register("dot", Dot).is_none());
        assert!(a.contains("dot"));
        assert!(!b.contains("dot"));
        assert!(a.register("dot", Dot).is_some());
    }

    #[test]
    fn default_bounds_come_from_the_path() {
        let b = Dot.bounding_rect(&Style::new().with(keys::X, 4.0));
        assert_eq!(b, Rect::new(4.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn default_drift_offsets_position() {
        let mut pos = Vec2::new(1.0, 1.0);
        Dot.drift(&mut pos, &mut Style::new(), Vec2::new(2.0, -1.0));
        assert_eq!(pos, Vec2::new(3.0, 0.0));
    }
}
