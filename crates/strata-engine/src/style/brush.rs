use crate::coords::Vec2;
use crate::paint::{Color, Paint};

/// Which passes a shape's path receives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BrushType {
    #[default]
    Fill,
    Stroke,
    Both,
}

impl BrushType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fill" => Some(BrushType::Fill),
            "stroke" => Some(BrushType::Stroke),
            "both" => Some(BrushType::Both),
            _ => None,
        }
    }

    #[inline]
    pub fn fills(self) -> bool {
        matches!(self, BrushType::Fill | BrushType::Both)
    }

    #[inline]
    pub fn strokes(self) -> bool {
        matches!(self, BrushType::Stroke | BrushType::Both)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Stroke parameters handed to [`Surface::stroke`](crate::surface::Surface::stroke).
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    /// Dash pattern in logical pixels. Empty = solid.
    pub dash: Vec<f32>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset: Vec2,
}

/// Fully resolved paint state for one shape draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub kind: BrushType,
    pub fill: Paint,
    pub stroke: Stroke,
    /// Global opacity in [0, 1].
    pub opacity: f32,
    pub shadow: Option<Shadow>,
}

impl Brush {
    /// Fill paint if this brush fills.
    pub fn effective_fill(&self) -> Option<&Paint> {
        self.kind.fills().then_some(&self.fill)
    }

    pub fn effective_stroke(&self) -> Option<&Stroke> {
        (self.kind.strokes() && self.stroke.width > 0.0).then_some(&self.stroke)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            kind: BrushType::Fill,
            fill: Paint::Solid(Color::black()),
            stroke: Stroke {
                paint: Paint::Solid(Color::black()),
                width: 1.0,
                cap: LineCap::Butt,
                join: LineJoin::Miter,
                dash: Vec::new(),
            },
            opacity: 1.0,
            shadow: None,
        }
    }
}

/// Where a shape's text label sits relative to its bounding rect.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextPosition {
    #[default]
    Inside,
    Top,
    Bottom,
    Left,
    Right,
}

impl TextPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inside" => Some(TextPosition::Inside),
            "top" => Some(TextPosition::Top),
            "bottom" => Some(TextPosition::Bottom),
            "left" => Some(TextPosition::Left),
            "right" => Some(TextPosition::Right),
            _ => None,
        }
    }
}

/// Font description passed through to the host surface untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// CSS-like font string, e.g. `"12px sans-serif"`.
    pub family: String,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self { family: "sans-serif".to_string(), size: 12.0 }
    }
}

/// Text label attached to a shape through `style.text`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: TextPosition,
    pub color: Color,
    pub font: FontSpec,
}
