//! Coordinate and geometry types shared by the scene, compositor and hit tests.
//!
//! Canonical space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shape geometry lives in local space; a record's [`Matrix`] maps it to the layer.

mod corner_radii;
mod matrix;
mod rect;
mod vec2;
mod viewport;

pub use corner_radii::CornerRadii;
pub use matrix::Matrix;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
