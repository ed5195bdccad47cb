//! Built-in shape plugins.
//!
//! Angles in style keys are degrees, counter-clockwise from +X as charts
//! expect; they are converted to canvas radians at the path boundary.

mod circle;
mod image;
mod line;
mod polygon;
mod rectangle;
mod sector;

pub use circle::{CircleShape, RingShape};
pub use image::ImageShape;
pub use line::LineShape;
pub use polygon::PolygonShape;
pub use rectangle::RectangleShape;
pub use sector::SectorShape;

use crate::coords::Vec2;
use crate::style::{Style, keys};

/// Center read from `x` / `y`.
#[inline]
fn center(style: &Style) -> Vec2 {
    Vec2::new(style.number_or(keys::X, 0.0), style.number_or(keys::Y, 0.0))
}
