//! Paint model shared between styles, surfaces and the compositor.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - paint sources (solid, gradients, image patterns)

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{ColorStop, LinearGradient, RadialGradient};

/// Paint source for filling or stroking geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    /// Repeating image, referenced by the key the host surface loads it under.
    Pattern { image: String },
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0,
            Paint::LinearGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
            Paint::RadialGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
            // Image content is unknown to the engine.
            Paint::Pattern { .. } => false,
        }
    }

    /// Best flat approximation, used by pixel readback hit tests and highlight derivation.
    pub fn representative_color(&self) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::LinearGradient(g) => gradient::representative(&g.stops),
            Paint::RadialGradient(g) => gradient::representative(&g.stops),
            Paint::Pattern { .. } => Color::black(),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}
