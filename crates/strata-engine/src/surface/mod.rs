//! Drawing-surface capability.
//!
//! The engine never rasterizes anything itself. Every layer, the hover overlay
//! and the hit-test scratch surface are [`Surface`]s created by a host-supplied
//! [`SurfaceFactory`]. The interface is canvas-shaped: a current transform, a
//! current path, a current brush, and a save/restore stack for all three.
//!
//! [`RecordingSurface`] is the headless implementation used by tests and the
//! studio binary.

pub mod path;
mod recording;

use std::fmt;

use crate::coords::{Matrix, Rect, Vec2, Viewport};
use crate::paint::Color;
use crate::scene::ZLevel;
use crate::style::{Brush, FontSpec};

pub use path::{Path, PathCmd, Polyline};
pub use recording::{DrawOp, PendingImages, RecordingFactory, RecordingSurface};

/// Error returned by drawing operations that touch external resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// An external asset (image) is still loading. The caller should skip
    /// the record and retry once the host reports the asset ready.
    NotReady { resource: String },
    /// Any other backend failure.
    Failed(String),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::NotReady { resource } => write!(f, "resource not ready: {resource}"),
            DrawError::Failed(msg) => write!(f, "draw failed: {msg}"),
        }
    }
}

impl std::error::Error for DrawError {}

/// Receives path geometry.
///
/// Implemented by every [`Surface`] and by the pure [`Path`] shim, so shape
/// plugins can build their outline once for drawing, bounds and hit tests.
pub trait PathSink {
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn quad_to(&mut self, ctrl: Vec2, p: Vec2);
    fn bezier_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2);
    /// Canvas-style arc. Angles are radians, clockwise on screen.
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, anticlockwise: bool);
    fn close(&mut self);

    fn rect(&mut self, r: Rect) {
        let r = r.normalized();
        let max = r.max();
        self.move_to(r.origin);
        self.line_to(Vec2::new(max.x, r.origin.y));
        self.line_to(max);
        self.line_to(Vec2::new(r.origin.x, max.y));
        self.close();
    }
}

/// A drawing surface supplied by the host.
pub trait Surface: PathSink {
    fn viewport(&self) -> Viewport;

    /// Erases every pixel and resets the transform/brush stack.
    fn clear(&mut self);
    fn resize(&mut self, viewport: Viewport);

    fn save(&mut self);
    fn restore(&mut self);
    /// Replaces the current transform.
    fn set_transform(&mut self, m: Matrix);

    /// Starts a new current path.
    fn begin_path(&mut self);
    fn set_brush(&mut self, brush: &Brush);
    fn fill(&mut self);
    fn stroke(&mut self);

    /// Whether `p` (surface coordinates) lies inside the current path.
    /// `None` when the backend cannot answer.
    fn is_point_in_path(&self, _p: Vec2) -> Option<bool> {
        None
    }

    /// Draws `text` with its top-left corner at `origin` (current transform applies).
    fn fill_text(&mut self, text: &str, origin: Vec2, font: &FontSpec, color: Color);
    /// Logical size of `text` rendered with `font`.
    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2;

    /// Draws the image registered under `key` into `dest`.
    fn draw_image(&mut self, key: &str, dest: Rect) -> Result<(), DrawError>;

    /// RGBA pixel at `p` (surface coordinates). `None` when readback is unsupported.
    fn read_pixel(&self, _p: Vec2) -> Option<[u8; 4]> {
        None
    }

    /// `self` as a bare path sink, for plugins that only emit geometry.
    fn as_path_sink(&mut self) -> &mut dyn PathSink;
}

/// What a surface is used for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SurfaceRole {
    Layer(ZLevel),
    Overlay,
    /// Offscreen surface used by the pixel-readback hit test.
    Scratch,
}

/// Creates surfaces for the compositor.
pub trait SurfaceFactory {
    type Surface: Surface;

    /// Current host viewport. Re-read on every
    /// [`Compositor::resize`](crate::compositor::Compositor::resize).
    fn viewport(&self) -> Viewport;

    fn create(&mut self, role: SurfaceRole) -> Self::Surface;
}
