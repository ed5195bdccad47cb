use std::fmt;

use crate::scene::ShapeId;
use crate::surface::DrawError;

/// Errors raised inside the engine.
///
/// None of these abort a frame. They are reported through
/// [`Diagnostics`](crate::diagnostics::Diagnostics) and the offending record
/// or property is skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A record names a shape tag with no registered plugin.
    UnknownShape { id: ShapeId, shape: String },
    /// An operation referenced a record that no longer exists.
    StaleReference(ShapeId),
    /// An external asset was still loading.
    ResourceNotReady { id: ShapeId, resource: String },
    /// Two keyframe values of different kinds cannot be blended.
    Interpolation(InterpolationError),
    /// The surface rejected a draw.
    DrawFailed { id: ShapeId, reason: String },
    /// No hit-test tier could answer for this record.
    UnsupportedHitTest(ShapeId),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownShape { id, shape } => {
                write!(f, "shape `{id}` uses unregistered type `{shape}`")
            }
            EngineError::StaleReference(id) => write!(f, "shape `{id}` no longer exists"),
            EngineError::ResourceNotReady { id, resource } => {
                write!(f, "shape `{id}` waits on resource `{resource}`")
            }
            EngineError::Interpolation(e) => write!(f, "{e}"),
            EngineError::DrawFailed { id, reason } => write!(f, "drawing `{id}` failed: {reason}"),
            EngineError::UnsupportedHitTest(id) => {
                write!(f, "no hit-test tier available for `{id}`")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Interpolation(e) => Some(e),
            _ => None,
        }
    }
}

impl EngineError {
    /// Maps a surface error for the record `id`.
    pub fn from_draw(id: ShapeId, err: DrawError) -> Self {
        match err {
            DrawError::NotReady { resource } => EngineError::ResourceNotReady { id, resource },
            DrawError::Failed(reason) => EngineError::DrawFailed { id, reason },
        }
    }
}

/// Keyframe values of mismatched kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationError {
    pub path: String,
    pub from: &'static str,
    pub to: &'static str,
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot interpolate `{}` from {} to {}", self.path, self.from, self.to)
    }
}

impl std::error::Error for InterpolationError {}

impl From<InterpolationError> for EngineError {
    fn from(e: InterpolationError) -> Self {
        EngineError::Interpolation(e)
    }
}
