use crate::paint::Color;

use super::{BrushType, Style, keys};

/// How hovered shapes are emphasised on the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightConfig {
    /// Stroke color of the emphasis ring. `None` derives it from the shape's
    /// own fill by lightening it.
    pub color: Option<Color>,
    /// Added to the shape's own line width.
    pub extra_width: f32,
    /// Lift level used when `color` is `None`.
    pub lift: f32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            color: Some(Color::from_straight(1.0, 1.0, 0.0, 0.5)),
            extra_width: 6.0,
            lift: 0.5,
        }
    }
}

impl HighlightConfig {
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_extra_width(mut self, extra_width: f32) -> Self {
        self.extra_width = extra_width.max(0.0);
        self
    }
}

/// Resolves the style used to paint a hovered record on the overlay.
///
/// The base style is copied, an emphasis stroke is layered on top of it, then
/// the record's explicit `highlight` style is merged last so it always wins.
///
/// Filled shapes keep their fill and gain a stroke; stroke-only shapes get a
/// wider, recolored stroke.
pub fn resolve_highlight(base: &Style, highlight: &Style, config: &HighlightConfig) -> Style {
    let mut out = base.clone();

    let kind = base
        .text(keys::BRUSH_TYPE)
        .and_then(BrushType::parse)
        .unwrap_or_default();
    let base_width = base.number(keys::LINE_WIDTH).unwrap_or(1.0);

    let emphasis = config.color.unwrap_or_else(|| {
        let source = match kind {
            BrushType::Stroke => base.paint(keys::STROKE_COLOR),
            _ => base.paint(keys::COLOR),
        };
        source
            .map_or(Color::black(), |p| p.representative_color())
            .lift(config.lift)
    });

    out.set(keys::STROKE_COLOR, emphasis);
    out.set(keys::LINE_WIDTH, base_width + config.extra_width);
    if kind == BrushType::Fill {
        out.set(keys::BRUSH_TYPE, "both");
    }

    out.merge(highlight);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Paint;

    fn filled() -> Style {
        Style::new().with(keys::COLOR, "#336699").with(keys::R, 10.0)
    }

    #[test]
    fn filled_shape_gains_emphasis_stroke() {
        let out = resolve_highlight(&filled(), &Style::new(), &HighlightConfig::default());
        assert_eq!(out.text(keys::BRUSH_TYPE), Some("both"));
        assert_eq!(out.number(keys::LINE_WIDTH), Some(7.0));
        assert_eq!(
            out.paint(keys::STROKE_COLOR),
            Some(Paint::Solid(Color::from_straight(1.0, 1.0, 0.0, 0.5)))
        );
        // Fill and geometry are untouched.
        assert_eq!(out.paint(keys::COLOR), filled().paint(keys::COLOR));
        assert_eq!(out.number(keys::R), Some(10.0));
    }

    #[test]
    fn stroke_only_shape_keeps_brush_type() {
        let base = Style::new().with(keys::BRUSH_TYPE, "stroke").with(keys::LINE_WIDTH, 2.0);
        let out = resolve_highlight(&base, &Style::new(), &HighlightConfig::default());
        assert_eq!(out.text(keys::BRUSH_TYPE), Some("stroke"));
        assert_eq!(out.number(keys::LINE_WIDTH), Some(8.0));
    }

    #[test]
    fn explicit_highlight_style_wins() {
        let hl = Style::new().with(keys::LINE_WIDTH, 1.0).with(keys::COLOR, "#ff0000");
        let out = resolve_highlight(&filled(), &hl, &HighlightConfig::default());
        assert_eq!(out.number(keys::LINE_WIDTH), Some(1.0));
        assert_eq!(out.paint(keys::COLOR), Some(Paint::Solid(Color::from_hex("#ff0000").unwrap())));
    }

    #[test]
    fn derived_color_lightens_the_fill() {
        let config = HighlightConfig::default().with_color(None);
        let base = Style::new().with(keys::COLOR, Color::black());
        let out = resolve_highlight(&base, &Style::new(), &config);
        let stroke = out.paint(keys::STROKE_COLOR).unwrap().representative_color();
        assert!(stroke.r > 0.4 && stroke.r < 0.6);
    }
}
