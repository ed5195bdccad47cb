//! Retained scene graph.
//!
//! Responsibilities:
//! - own every [`ShapeRecord`], keyed by [`ShapeId`]
//! - keep deterministic ordering (z-level + insertion order)
//! - track which z-levels need repainting

mod graph;
mod id;
mod property;
mod record;
mod z_level;

pub use graph::{Order, Scene};
pub use id::ShapeId;
pub use record::{Rotation, Scale, ShapeHandler, ShapePatch, ShapeRecord};
pub use z_level::ZLevel;
