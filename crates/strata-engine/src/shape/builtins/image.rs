use crate::coords::{Rect, Vec2};
use crate::style::{Style, keys};
use crate::surface::{DrawError, PathSink, Surface};

use super::super::ShapePlugin;

/// Bitmap drawn into `x`, `y`, `width`, `height`. `image` names the asset
/// the host surface loads.
#[derive(Debug, Copy, Clone, Default)]
pub struct ImageShape;

impl ImageShape {
    fn dest(style: &Style) -> Rect {
        Rect::new(
            style.number_or(keys::X, 0.0),
            style.number_or(keys::Y, 0.0),
            style.number_or(keys::WIDTH, 0.0),
            style.number_or(keys::HEIGHT, 0.0),
        )
        .normalized()
    }
}

impl ShapePlugin for ImageShape {
    fn build_path(&self, style: &Style, sink: &mut dyn PathSink) {
        sink.rect(Self::dest(style));
    }

    fn bounding_rect(&self, style: &Style) -> Rect {
        Self::dest(style)
    }

    fn hit_test(&self, style: &Style, local: Vec2) -> Option<bool> {
        Some(Self::dest(style).contains_inclusive(local))
    }

    fn brush(&self, style: &Style, surface: &mut dyn Surface) -> Result<(), DrawError> {
        let key = style
            .text(keys::IMAGE)
            .ok_or_else(|| DrawError::Failed("image shape without `image` key".to_string()))?;
        surface.set_brush(&style.brush());
        surface.draw_image(key, Self::dest(style))
    }
}
