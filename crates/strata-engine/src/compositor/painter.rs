use crate::coords::{Rect, Vec2};
use crate::scene::ShapeRecord;
use crate::shape::ShapePlugin;
use crate::style::{Style, TextLabel, TextPosition};
use crate::surface::{DrawError, Surface};

/// Space between a shape's bounds and an outside label.
const LABEL_GAP: f32 = 5.0;

/// Paints one record with `style` under its world transform.
pub(crate) fn paint_record(
    surface: &mut dyn Surface,
    record: &ShapeRecord,
    plugin: &dyn ShapePlugin,
    style: &Style,
) -> Result<(), DrawError> {
    surface.save();
    surface.set_transform(record.world_transform());
    let result = plugin.brush(style, surface).map(|()| {
        if let Some(label) = style.label() {
            let bounds = plugin.bounding_rect(style);
            paint_label(surface, &label, bounds);
        }
    });
    surface.restore();
    result
}

fn paint_label(surface: &mut dyn Surface, label: &TextLabel, bounds: Rect) {
    let size = surface.measure_text(&label.text, &label.font);
    let (min, max, c) = (bounds.min(), bounds.max(), bounds.center());
    let origin = match label.position {
        TextPosition::Inside => Vec2::new(c.x - size.x * 0.5, c.y - size.y * 0.5),
        TextPosition::Top => Vec2::new(c.x - size.x * 0.5, min.y - size.y - LABEL_GAP),
        TextPosition::Bottom => Vec2::new(c.x - size.x * 0.5, max.y + LABEL_GAP),
        TextPosition::Left => Vec2::new(min.x - size.x - LABEL_GAP, c.y - size.y * 0.5),
        TextPosition::Right => Vec2::new(max.x + LABEL_GAP, c.y - size.y * 0.5),
    };
    surface.fill_text(&label.text, origin, &label.font, label.color);
}
