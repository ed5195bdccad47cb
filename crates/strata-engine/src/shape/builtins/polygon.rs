use crate::coords::Vec2;
use crate::style::{Style, keys};
use crate::surface::{Path, PathSink};

use super::super::ShapePlugin;

/// Closed polygon through `points` (`[[x, y], …]`). Fewer than three points
/// produce an empty outline.
#[derive(Debug, Copy, Clone, Default)]
pub struct PolygonShape;

impl ShapePlugin for PolygonShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        let Some(points) = style.points(keys::POINTS).filter(|p| p.len() >= 3) else {
            return;
        };
        sink.move_to(points[0]);
        for p in &points[1..] {
            sink.line_to(*p);
        }
        sink.close();
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        let mut path = Path::new();
        self.build_path(style, &mut path);
        let brush = style.brush();
        let in_fill = brush.effective_fill().is_some() && path.contains(local);
        let in_stroke = brush
            .effective_stroke()
            .is_some_and(|s| path.stroke_contains(local, s.width * 0.5));
        Some(in_fill || in_stroke)
    }
}
