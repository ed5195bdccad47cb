use std::f32::consts::{FRAC_PI_2, PI};

use crate::coords::{CornerRadii, Rect, Vec2};
use crate::style::{Style, Value, keys};
use crate::surface::PathSink;

use super::super::ShapePlugin;

/// Axis-aligned box: `x`, `y`, `width`, `height`, optional `radius`
/// (a number, or `[tl, tr, br, bl]`).
#[derive(Debug, Copy, Clone, Default)]
pub struct RectangleShape;

impl RectangleShape {
    fn rect(style: &Style) -> Rect {
        Rect::new(
            style.number_or(keys::X, 0.0),
            style.number_or(keys::Y, 0.0),
            style.number_or(keys::WIDTH, 0.0),
            style.number_or(keys::HEIGHT, 0.0),
        )
        .normalized()
    }

    fn radii(style: &Style, rect: Rect) -> CornerRadii {
        let radii = match style.get(keys::RADIUS) {
            Some(Value::Number(r)) => CornerRadii::all(*r),
            Some(Value::Array(items)) => {
                let at = |i: usize| items.get(i).and_then(Value::as_number).unwrap_or(0.0);
                CornerRadii::new(at(0), at(1), at(2), at(3))
            }
            _ => CornerRadii::default(),
        };
        radii.fitted(rect.size.x, rect.size.y)
    }
}

impl ShapePlugin for RectangleShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        let rect = Self::rect(style);
        let radii = Self::radii(style, rect);
        if radii.is_zero() {
            sink.rect(rect);
            return;
        }

        let (min, max) = (rect.min(), rect.max());
        let (tl, tr) = (radii.top_left, radii.top_right);
        let (br, bl) = (radii.bottom_right, radii.bottom_left);

        sink.move_to(Vec2::new(min.x + tl, min.y));
        sink.line_to(Vec2::new(max.x - tr, min.y));
        if tr > 0.0 {
            sink.arc(Vec2::new(max.x - tr, min.y + tr), tr, -FRAC_PI_2, 0.0, false);
        }
        sink.line_to(Vec2::new(max.x, max.y - br));
        if br > 0.0 {
            sink.arc(Vec2::new(max.x - br, max.y - br), br, 0.0, FRAC_PI_2, false);
        }
        sink.line_to(Vec2::new(min.x + bl, max.y));
        if bl > 0.0 {
            sink.arc(Vec2::new(min.x + bl, max.y - bl), bl, FRAC_PI_2, PI, false);
        }
        sink.line_to(Vec2::new(min.x, min.y + tl));
        if tl > 0.0 {
            sink.arc(Vec2::new(min.x + tl, min.y + tl), tl, PI, PI + FRAC_PI_2, false);
        }
        sink.close();
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        let rect = Self::rect(style);
        if !rect.contains_inclusive(local) {
            return Some(false);
        }
        let radii = Self::radii(style, rect);
        if radii.is_zero() {
            return Some(true);
        }

        let (min, max) = (rect.min(), rect.max());
        let (tl, tr) = (radii.top_left, radii.top_right);
        let (br, bl) = (radii.bottom_right, radii.bottom_left);
        // (radius, arc center, outward direction)
        let corners = [
            (tl, Vec2::new(min.x + tl, min.y + tl), Vec2::new(-1.0, -1.0)),
            (tr, Vec2::new(max.x - tr, min.y + tr), Vec2::new(1.0, -1.0)),
            (br, Vec2::new(max.x - br, max.y - br), Vec2::new(1.0, 1.0)),
            (bl, Vec2::new(min.x + bl, max.y - bl), Vec2::new(-1.0, 1.0)),
        ];
        for (r, c, out) in corners {
            let d = local - c;
            if r > 0.0 && d.x * out.x > 0.0 && d.y * out.y > 0.0 && d.length() > r {
                return Some(false);
            }
        }
        Some(true)
    }
}
