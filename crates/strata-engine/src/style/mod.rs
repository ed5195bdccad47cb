//! Style bags, paint state and highlight resolution.
//!
//! A [`Style`] is an ordered map of [`Value`]s. The engine understands the keys
//! listed in [`keys`]; shape plugins read their own geometry keys (`x`, `r`,
//! `points`, …) and everything else rides along untouched.

mod brush;
mod highlight;
mod value;

use std::collections::BTreeMap;

pub use brush::{
    Brush, BrushType, FontSpec, LineCap, LineJoin, Shadow, Stroke, TextLabel, TextPosition,
};
pub use highlight::{HighlightConfig, resolve_highlight};
pub use value::Value;

use crate::coords::Vec2;
use crate::paint::{Color, Paint};

/// Well-known style keys.
pub mod keys {
    pub const BRUSH_TYPE: &str = "brush_type";
    pub const COLOR: &str = "color";
    pub const STROKE_COLOR: &str = "stroke_color";
    pub const LINE_WIDTH: &str = "line_width";
    pub const LINE_CAP: &str = "line_cap";
    pub const LINE_JOIN: &str = "line_join";
    pub const LINE_DASH: &str = "line_dash";
    pub const OPACITY: &str = "opacity";
    pub const SHADOW_COLOR: &str = "shadow_color";
    pub const SHADOW_BLUR: &str = "shadow_blur";
    pub const SHADOW_OFFSET_X: &str = "shadow_offset_x";
    pub const SHADOW_OFFSET_Y: &str = "shadow_offset_y";

    pub const TEXT: &str = "text";
    pub const TEXT_POSITION: &str = "text_position";
    pub const TEXT_COLOR: &str = "text_color";
    pub const TEXT_FONT: &str = "text_font";
    pub const TEXT_SIZE: &str = "text_size";

    // Geometry keys understood by the built-in shapes.
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const R: &str = "r";
    pub const R0: &str = "r0";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const RADIUS: &str = "radius";
    pub const START_ANGLE: &str = "start_angle";
    pub const END_ANGLE: &str = "end_angle";
    pub const CLOCKWISE: &str = "clockwise";
    pub const POINTS: &str = "points";
    pub const X_START: &str = "x_start";
    pub const Y_START: &str = "y_start";
    pub const X_END: &str = "x_end";
    pub const Y_END: &str = "y_end";
    pub const IMAGE: &str = "image";
}

/// Ordered property bag attached to a shape record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    props: BTreeMap<String, Value>,
}

impl Style {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.props.insert(key.to_string(), value.into());
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.props.remove(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (head, rest) = path.split_first()?;
        self.props.get(*head)?.get_path(rest)
    }

    /// Writes a nested value. Returns `false` when the path runs through a scalar.
    pub fn set_path(&mut self, path: &[&str], value: Value) -> bool {
        let Some((head, rest)) = path.split_first() else {
            return false;
        };
        if rest.is_empty() {
            self.props.insert((*head).to_string(), value);
            return true;
        }
        self.props
            .entry((*head).to_string())
            .or_insert_with(|| Value::Map(BTreeMap::new()))
            .set_path(rest, value)
    }

    /// Recursively merges `patch` into `self`. Keys absent from `patch` are kept.
    pub fn merge(&mut self, patch: &Style) {
        value::merge_maps(&mut self.props, &patch.props);
    }

    /// Returns a copy of `self` with `patch` merged on top.
    pub fn merged(&self, patch: &Style) -> Style {
        let mut out = self.clone();
        out.merge(patch);
        out
    }

    // ── typed accessors ───────────────────────────────────────────────────

    #[inline]
    pub fn number(&self, key: &str) -> Option<f32> {
        self.get(key)?.as_number()
    }

    #[inline]
    pub fn number_or(&self, key: &str, default: f32) -> f32 {
        self.number(key).unwrap_or(default)
    }

    #[inline]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    #[inline]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    #[inline]
    pub fn paint(&self, key: &str) -> Option<Paint> {
        self.get(key)?.as_paint()
    }

    #[inline]
    pub fn vec2(&self, key: &str) -> Option<Vec2> {
        self.get(key)?.as_vec2()
    }

    #[inline]
    pub fn points(&self, key: &str) -> Option<Vec<Vec2>> {
        self.get(key)?.as_points()
    }

    // ── paint resolution ──────────────────────────────────────────────────

    /// Resolves the paint state for this style. Missing keys fall back to a
    /// black 1px brush that fills.
    pub fn brush(&self) -> Brush {
        let mut brush = Brush::default();

        if let Some(kind) = self.text(keys::BRUSH_TYPE).and_then(BrushType::parse) {
            brush.kind = kind;
        }
        if let Some(fill) = self.paint(keys::COLOR) {
            brush.fill = fill;
        }
        if let Some(stroke) = self.paint(keys::STROKE_COLOR) {
            brush.stroke.paint = stroke;
        }
        if let Some(w) = self.number(keys::LINE_WIDTH) {
            brush.stroke.width = w.max(0.0);
        }
        brush.stroke.cap = match self.text(keys::LINE_CAP) {
            Some("round") => LineCap::Round,
            Some("square") => LineCap::Square,
            _ => LineCap::Butt,
        };
        brush.stroke.join = match self.text(keys::LINE_JOIN) {
            Some("round") => LineJoin::Round,
            Some("bevel") => LineJoin::Bevel,
            _ => LineJoin::Miter,
        };
        if let Some(dash) = self.get(keys::LINE_DASH).and_then(Value::as_array) {
            brush.stroke.dash = dash.iter().filter_map(Value::as_number).collect();
        }
        brush.opacity = self.number_or(keys::OPACITY, 1.0).clamp(0.0, 1.0);

        if let Some(Paint::Solid(color)) = self.paint(keys::SHADOW_COLOR) {
            brush.shadow = Some(Shadow {
                color,
                blur: self.number_or(keys::SHADOW_BLUR, 0.0),
                offset: Vec2::new(
                    self.number_or(keys::SHADOW_OFFSET_X, 0.0),
                    self.number_or(keys::SHADOW_OFFSET_Y, 0.0),
                ),
            });
        }

        brush
    }

    /// Text label carried by `style.text`, if any.
    pub fn label(&self) -> Option<TextLabel> {
        let text = self.text(keys::TEXT).filter(|t| !t.is_empty())?;
        let color = match self.paint(keys::TEXT_COLOR) {
            Some(p) => p.representative_color(),
            None => self
                .paint(keys::COLOR)
                .map_or(Color::black(), |p| p.representative_color()),
        };
        let mut font = FontSpec::default();
        if let Some(family) = self.text(keys::TEXT_FONT) {
            font.family = family.to_string();
        }
        if let Some(size) = self.number(keys::TEXT_SIZE) {
            font.size = size;
        }
        Some(TextLabel {
            text: text.to_string(),
            position: self
                .text(keys::TEXT_POSITION)
                .and_then(TextPosition::parse)
                .unwrap_or_default(),
            color,
            font,
        })
    }
}

impl FromIterator<(String, Value)> for Style {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { props: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_merge_is_a_noop() {
        let mut s = Style::new().with(keys::X, 5.0);
        s.merge(&Style::new());
        assert_eq!(s.number(keys::X), Some(5.0));
    }

    #[test]
    fn merge_overwrites_only_present_keys() {
        let mut s = Style::new().with(keys::X, 1.0).with(keys::Y, 2.0);
        s.merge(&Style::new().with(keys::Y, 9.0));
        assert_eq!(s.number(keys::X), Some(1.0));
        assert_eq!(s.number(keys::Y), Some(9.0));
    }

    #[test]
    fn brush_defaults_to_black_fill() {
        let b = Style::new().brush();
        assert_eq!(b.kind, BrushType::Fill);
        assert_eq!(b.fill, Paint::Solid(Color::black()));
        assert!(b.effective_stroke().is_none());
    }

    #[test]
    fn brush_reads_stroke_and_opacity() {
        let b = Style::new()
            .with(keys::BRUSH_TYPE, "both")
            .with(keys::STROKE_COLOR, "#ff0000")
            .with(keys::LINE_WIDTH, 3.0)
            .with(keys::OPACITY, 2.0)
            .brush();
        assert_eq!(b.kind, BrushType::Both);
        assert_eq!(b.effective_stroke().map(|s| s.width), Some(3.0));
        assert_eq!(b.opacity, 1.0);
    }

    #[test]
    fn label_falls_back_to_fill_color() {
        let label = Style::new()
            .with(keys::TEXT, "42%")
            .with(keys::COLOR, Color::white())
            .with(keys::TEXT_POSITION, "top")
            .label()
            .unwrap();
        assert_eq!(label.color, Color::white());
        assert_eq!(label.position, TextPosition::Top);
        assert!(Style::new().with(keys::TEXT, "").label().is_none());
    }

    #[test]
    fn set_path_into_nested_map() {
        let mut s = Style::new();
        assert!(s.set_path(&["label", "offset"], Value::Number(4.0)));
        assert_eq!(s.get_path(&["label", "offset"]), Some(&Value::Number(4.0)));
        s.set(keys::X, 1.0);
        assert!(!s.set_path(&[keys::X, "deeper"], Value::Number(1.0)));
    }
}
