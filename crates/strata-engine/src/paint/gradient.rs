use crate::coords::Vec2;

use super::Color;

/// A single gradient stop.
///
/// `t` is expected in [0, 1] in typical usage; surfaces may clamp/sort stops.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient in the local space of the shape being filled.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && stops_valid(&self.stops)
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Two-circle radial gradient, same semantics as the canvas `createRadialGradient`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub inner_center: Vec2,
    pub inner_radius: f32,
    pub outer_center: Vec2,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, inner_radius: f32, outer_radius: f32, stops: Vec<ColorStop>) -> Self {
        Self {
            inner_center: center,
            inner_radius,
            outer_center: center,
            outer_radius,
            stops,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.inner_center.is_finite()
            && self.outer_center.is_finite()
            && self.inner_radius >= 0.0
            && self.outer_radius > 0.0
            && stops_valid(&self.stops)
    }
}

fn stops_valid(stops: &[ColorStop]) -> bool {
    stops.len() >= 2 && stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
}

/// Flat color a gradient degrades to when a consumer cannot shade it (first stop).
pub(crate) fn representative(stops: &[ColorStop]) -> Color {
    stops.first().map_or(Color::transparent(), |s| s.color)
}
