//! Point-in-shape tests.
//!
//! Tiers, cheapest first:
//! 1. bounding-rect reject in local space,
//! 2. the plugin's analytic test,
//! 3. the scratch surface's path containment query,
//! 4. a pixel readback: paint the shape alone and read the pixel back.

use crate::coords::{Matrix, Vec2};
use crate::style::Style;
use crate::surface::Surface;

use super::ShapePlugin;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HitResult {
    Hit,
    Miss,
    /// No tier could answer. Callers treat this as a miss.
    Unsupported,
}

impl HitResult {
    #[inline]
    pub fn is_hit(self) -> bool {
        self == HitResult::Hit
    }
}

impl From<bool> for HitResult {
    fn from(inside: bool) -> Self {
        if inside { HitResult::Hit } else { HitResult::Miss }
    }
}

/// Tests whether `point` (layer coordinates) hits a shape drawn with `world`.
pub fn hit_shape(
    plugin: &dyn ShapePlugin,
    style: &Style,
    world: Matrix,
    point: Vec2,
    scratch: Option<&mut dyn Surface>,
) -> HitResult {
    let Some(inverse) = world.invert() else {
        return HitResult::Miss;
    };
    let local = inverse.apply(point);

    if !plugin.bounding_rect(style).contains_inclusive(local) {
        return HitResult::Miss;
    }

    if let Some(inside) = plugin.hit_test(style, local) {
        return inside.into();
    }

    let Some(scratch) = scratch else {
        return HitResult::Unsupported;
    };

    scratch.save();
    scratch.set_transform(world);
    scratch.begin_path();
    plugin.build_path(style, scratch.as_path_sink());
    let in_path = scratch.is_point_in_path(point);
    scratch.restore();
    if let Some(inside) = in_path {
        return inside.into();
    }

    scratch.clear();
    scratch.save();
    scratch.set_transform(world);
    let painted = plugin.brush(style, scratch);
    scratch.restore();
    if let Err(e) = painted {
        log::debug!("pixel readback skipped: {e}");
        return HitResult::Unsupported;
    }
    match scratch.read_pixel(point) {
        Some(rgba) => (rgba[3] > 0).into(),
        None => HitResult::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Viewport};
    use crate::paint::Color;
    use crate::style::{Brush, FontSpec, keys};
    use crate::surface::{DrawError, PathSink, RecordingSurface, SurfaceRole};

    /// Triangle with no analytic test, so the surface tiers decide.
    struct Wedge;

    impl ShapePlugin for Wedge {
        fn build_path(&self, _style: &Style, sink: &mut dyn PathSink) {
            sink.move_to(Vec2::new(0.0, 0.0));
            sink.line_to(Vec2::new(20.0, 0.0));
            sink.line_to(Vec2::new(0.0, 20.0));
            sink.close();
        }
    }

    /// Surface with no path query; pixel reads pass through.
    struct Blind(RecordingSurface);

    impl PathSink for Blind {
        fn move_to(&mut self, p: Vec2) {
            self.0.move_to(p)
        }

        fn line_to(&mut self, p: Vec2) {
            self.0.line_to(p)
        }

        fn quad_to(&mut self, c: Vec2, p: Vec2) {
            self.0.quad_to(c, p)
        }

        fn bezier_to(&mut self, a: Vec2, b: Vec2, p: Vec2) {
            self.0.bezier_to(a, b, p)
        }

        fn arc(&mut self, c: Vec2, r: f32, s: f32, e: f32, ccw: bool) {
            self.0.arc(c, r, s, e, ccw)
        }

        fn close(&mut self) {
            self.0.close()
        }
    }

    impl Surface for Blind {
        fn viewport(&self) -> Viewport {
            self.0.viewport()
        }

        fn clear(&mut self) {
            self.0.clear()
        }

        fn resize(&mut self, v: Viewport) {
            self.0.resize(v)
        }

        fn save(&mut self) {
            self.0.save()
        }

        fn restore(&mut self) {
            self.0.restore()
        }

        fn set_transform(&mut self, m: Matrix) {
            self.0.set_transform(m)
        }

        fn begin_path(&mut self) {
            self.0.begin_path()
        }

        fn set_brush(&mut self, b: &Brush) {
            self.0.set_brush(b)
        }

        fn fill(&mut self) {
            self.0.fill()
        }

        fn stroke(&mut self) {
            self.0.stroke()
        }

        fn fill_text(&mut self, t: &str, o: Vec2, f: &FontSpec, c: Color) {
            self.0.fill_text(t, o, f, c)
        }

        fn measure_text(&self, t: &str, f: &FontSpec) -> Vec2 {
            self.0.measure_text(t, f)
        }

        fn draw_image(&mut self, k: &str, d: Rect) -> Result<(), DrawError> {
            self.0.draw_image(k, d)
        }

        fn as_path_sink(&mut self) -> &mut dyn PathSink {
            self
        }

        fn read_pixel(&self, p: Vec2) -> Option<[u8; 4]> {
            self.0.read_pixel(p)
        }
    }

    fn scratch() -> RecordingSurface {
        RecordingSurface::new(SurfaceRole::Scratch, Viewport::new(100.0, 100.0))
    }

    // ── tiers ─────────────────────────────────────────────────────────────

    #[test]
    fn bounding_rect_rejects_before_any_surface_work() {
        let r = hit_shape(&Wedge, &Style::new(), Matrix::identity(), Vec2::new(50.0, 50.0), None);
        assert_eq!(r, HitResult::Miss);
    }

    #[test]
    fn path_query_decides_without_analytic_test() {
        let mut surface = scratch();
        let (style, world) = (Style::new(), Matrix::translation(10.0, 10.0));
        let hit = hit_shape(&Wedge, &style, world, Vec2::new(13.0, 13.0), Some(&mut surface));
        let miss = hit_shape(&Wedge, &style, world, Vec2::new(28.0, 28.0), Some(&mut surface));
        assert_eq!(hit, HitResult::Hit);
        assert_eq!(miss, HitResult::Miss);
    }

    #[test]
    fn no_scratch_surface_is_unsupported() {
        let r = hit_shape(&Wedge, &Style::new(), Matrix::identity(), Vec2::new(2.0, 2.0), None);
        assert_eq!(r, HitResult::Unsupported);
        assert!(!r.is_hit());
    }

    #[test]
    fn pixel_readback_decides_when_path_query_is_missing() {
        let mut blind = Blind(scratch().with_readback(true));
        let style = Style::new().with(keys::COLOR, "#ff0000");
        let world = Matrix::identity();
        let hit = hit_shape(&Wedge, &style, world, Vec2::new(3.0, 3.0), Some(&mut blind));
        let miss = hit_shape(&Wedge, &style, world, Vec2::new(18.0, 18.0), Some(&mut blind));
        assert_eq!(hit, HitResult::Hit);
        assert_eq!(miss, HitResult::Miss);
    }

    #[test]
    fn surface_without_readback_is_unsupported() {
        let mut blind = Blind(scratch());
        let world = Matrix::identity();
        let r = hit_shape(&Wedge, &Style::new(), world, Vec2::new(3.0, 3.0), Some(&mut blind));
        assert_eq!(r, HitResult::Unsupported);
    }

    #[test]
    fn singular_transform_never_hits() {
        let r = hit_shape(&Wedge, &Style::new(), Matrix::scaling(0.0, 1.0), Vec2::zero(), None);
        assert_eq!(r, HitResult::Miss);
    }
}
