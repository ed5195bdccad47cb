use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::style::{Style, keys};
use crate::surface::PathSink;

use super::super::ShapePlugin;
use super::center;

/// Filled disc: `x`, `y`, `r`.
#[derive(Debug, Copy, Clone, Default)]
pub struct CircleShape;

impl ShapePlugin for CircleShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        let r = style.number_or(keys::R, 0.0).max(0.0);
        sink.arc(center(style), r, 0.0, TAU, false);
        sink.close();
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        let r = style.number_or(keys::R, 0.0);
        let d = local.distance(center(style));
        let brush = style.brush();
        let in_fill = brush.effective_fill().is_some() && d < r;
        let in_stroke = brush
            .effective_stroke()
            .is_some_and(|s| (d - r).abs() <= s.width * 0.5);
        Some(in_fill || in_stroke)
    }
}

/// Annulus: `x`, `y`, outer `r`, inner `r0`.
#[derive(Debug, Copy, Clone, Default)]
pub struct RingShape;

impl ShapePlugin for RingShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        let c = center(style);
        let r = style.number_or(keys::R, 0.0).max(0.0);
        let r0 = style.number_or(keys::R0, 0.0).clamp(0.0, r);
        sink.arc(c, r, 0.0, TAU, false);
        sink.close();
        // Opposite direction so the inner disc is a hole under nonzero winding.
        sink.move_to(c + Vec2::new(r0, 0.0));
        sink.arc(c, r0, TAU, 0.0, true);
        sink.close();
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        let r = style.number_or(keys::R, 0.0);
        let r0 = style.number_or(keys::R0, 0.0);
        let d = local.distance(center(style));
        Some(d < r && d > r0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Path;

    fn circle(x: f32, y: f32, r: f32) -> Style {
        Style::new().with(keys::X, x).with(keys::Y, y).with(keys::R, r)
    }

    #[test]
    fn circle_boundary_is_outside() {
        let s = circle(10.0, 10.0, 5.0);
        assert_eq!(CircleShape.hit_test(&s, Vec2::new(12.0, 11.0)), Some(true));
        assert_eq!(CircleShape.hit_test(&s, Vec2::new(15.0, 10.0)), Some(false));
        assert_eq!(CircleShape.hit_test(&s, Vec2::new(30.0, 10.0)), Some(false));
    }

    #[test]
    fn stroked_circle_hits_its_ring() {
        let s = circle(0.0, 0.0, 10.0)
            .with(keys::BRUSH_TYPE, "stroke")
            .with(keys::LINE_WIDTH, 4.0);
        assert_eq!(CircleShape.hit_test(&s, Vec2::new(11.0, 0.0)), Some(true));
        assert_eq!(CircleShape.hit_test(&s, Vec2::new(2.0, 0.0)), Some(false));
    }

    #[test]
    fn circle_bounds_cover_the_disc() {
        let b = CircleShape.bounding_rect(&circle(10.0, 10.0, 5.0));
        assert!((b.origin.x - 5.0).abs() < 0.01 && (b.size.y - 10.0).abs() < 0.01);
    }

    #[test]
    fn ring_path_has_a_hole() {
        let s = circle(0.0, 0.0, 10.0).with(keys::R0, 5.0);
        let mut path = Path::new();
        RingShape.build_path(&s, &mut path);
        assert!(path.contains(Vec2::new(7.5, 0.0)));
        assert!(!path.contains(Vec2::new(1.0, 0.0)));
        assert_eq!(RingShape.hit_test(&s, Vec2::new(0.0, 7.0)), Some(true));
        assert_eq!(RingShape.hit_test(&s, Vec2::new(0.0, 3.0)), Some(false));
    }
}
