use crate::coords::Vec2;
use crate::style::{Style, keys};
use crate::surface::PathSink;
use crate::surface::path::normalize_degrees;

use super::super::ShapePlugin;
use super::center;

/// Pie slice: `x`, `y`, `r`, optional inner `r0`, `start_angle` / `end_angle`
/// in degrees and an optional `clockwise` flag.
#[derive(Debug, Copy, Clone, Default)]
pub struct SectorShape;

struct Slice {
    center: Vec2,
    r: f32,
    r0: f32,
    start: f32,
    end: f32,
    clockwise: bool,
}

impl Slice {
    fn read(style: &Style) -> Self {
        let r = style.number_or(keys::R, 0.0).max(0.0);
        Self {
            center: center(style),
            r,
            r0: style.number_or(keys::R0, 0.0).clamp(0.0, r),
            start: style.number_or(keys::START_ANGLE, 0.0),
            end: style.number_or(keys::END_ANGLE, 360.0),
            clockwise: style.flag(keys::CLOCKWISE).unwrap_or(false),
        }
    }

    /// Sweep in degrees, always positive, 360 for a full turn.
    fn span(&self) -> f32 {
        let raw = if self.clockwise { self.start - self.end } else { self.end - self.start };
        if raw >= 360.0 { 360.0 } else { raw.rem_euclid(360.0) }
    }

    /// Whether the chart-convention angle `deg` falls inside the slice.
    fn covers(&self, deg: f32) -> bool {
        let span = self.span();
        if span >= 360.0 {
            return true;
        }
        let offset = if self.clockwise {
            normalize_degrees(self.start - deg)
        } else {
            normalize_degrees(deg - self.start)
        };
        offset <= span
    }
}

impl ShapePlugin for SectorShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        let s = Slice::read(style);
        // Chart angles turn counter-clockwise with +Y up; canvas angles turn
        // clockwise with +Y down, hence the negation.
        let (a0, a1) = ((-s.start).to_radians(), (-s.end).to_radians());
        let outer_ccw = !s.clockwise;

        if s.r0 > 0.0 {
            sink.arc(s.center, s.r, a0, a1, outer_ccw);
            sink.arc(s.center, s.r0, a1, a0, !outer_ccw);
        } else {
            sink.move_to(s.center);
            sink.arc(s.center, s.r, a0, a1, outer_ccw);
        }
        sink.close();
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        let s = Slice::read(style);
        let d = local - s.center;
        let dist = d.length();
        if dist >= s.r || dist < s.r0 {
            return Some(false);
        }
        let deg = normalize_degrees((-d.y).atan2(d.x).to_degrees());
        Some(s.covers(deg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Path;

    fn slice(start: f32, end: f32) -> Style {
        Style::new()
            .with(keys::R, 10.0)
            .with(keys::START_ANGLE, start)
            .with(keys::END_ANGLE, end)
    }

    #[test]
    fn quarter_slice_covers_upper_right() {
        let s = slice(0.0, 90.0);
        // +Y is down on screen, so the upper-right quadrant has negative y.
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(3.0, -3.0)), Some(true));
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(3.0, 3.0)), Some(false));
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(-3.0, -3.0)), Some(false));
    }

    #[test]
    fn slice_wrapping_through_zero() {
        let s = slice(315.0, 45.0);
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(5.0, 0.5)), Some(true));
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(-5.0, 0.0)), Some(false));
    }

    #[test]
    fn clockwise_slice_takes_the_other_side() {
        let s = slice(0.0, 90.0).with(keys::CLOCKWISE, true);
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(3.0, -3.0)), Some(false));
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(-3.0, 3.0)), Some(true));
    }

    #[test]
    fn inner_radius_makes_a_donut_slice() {
        let s = slice(0.0, 360.0).with(keys::R0, 5.0);
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(2.0, 0.0)), Some(false));
        assert_eq!(SectorShape.hit_test(&s, Vec2::new(7.0, 0.0)), Some(true));
    }

    #[test]
    fn path_matches_analytic_test() {
        let s = slice(0.0, 90.0);
        let mut path = Path::new();
        SectorShape.build_path(&s, &mut path);
        for p in [Vec2::new(3.0, -3.0), Vec2::new(3.0, 3.0), Vec2::new(-3.0, -3.0)] {
            assert_eq!(Some(path.contains(p)), SectorShape.hit_test(&s, p), "{p:?}");
        }
    }
}
