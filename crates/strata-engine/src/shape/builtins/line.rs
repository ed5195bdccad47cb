use crate::coords::{Rect, Vec2};
use crate::style::{BrushType, Style, keys};
use crate::surface::{DrawError, PathSink, Surface};

use super::super::ShapePlugin;

/// Minimum pick distance for thin lines.
const LINE_HIT_SLOP: f32 = 2.5;

/// Straight segment from (`x_start`, `y_start`) to (`x_end`, `y_end`). Always stroked.
#[derive(Debug, Copy, Clone, Default)]
pub struct LineShape;

impl LineShape {
    fn ends(style: &Style) -> (Vec2, Vec2) {
        (
            Vec2::new(style.number_or(keys::X_START, 0.0), style.number_or(keys::Y_START, 0.0)),
            Vec2::new(style.number_or(keys::X_END, 0.0), style.number_or(keys::Y_END, 0.0)),
        )
    }

    fn reach(style: &Style) -> f32 {
        (style.number_or(keys::LINE_WIDTH, 1.0) * 0.5).max(LINE_HIT_SLOP)
    }
}

impl ShapePlugin for LineShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        let (a, b) = Self::ends(style);
        sink.move_to(a);
        sink.line_to(b);
    }

    fn bounding_rect(&self, style: &Style) -> Rect {
        let (a, b) = Self::ends(style);
        Rect::from_points([a, b]).expand(Self::reach(style))
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        let (a, b) = Self::ends(style);
        Some(local.distance_to_segment(a, b) <= Self::reach(style))
    }

    fn brush(&self, style: &Style, surface: &mut dyn Surface) -> Result<(), DrawError> {
        let mut brush = style.brush();
        brush.kind = BrushType::Stroke;
        if !style.contains(keys::STROKE_COLOR) {
            brush.stroke.paint = brush.fill.clone();
        }
        surface.set_brush(&brush);
        surface.begin_path();
        self.build_path(style, surface.as_path_sink());
        surface.stroke();
        Ok(())
    }
}
