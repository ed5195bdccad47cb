//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Hosts translate platform events into [`PointerEvent`]s (see
//! [`platform::winit`]) and feed them to the engine, which routes them
//! through [`InputRouter`].

mod events;
pub mod platform;
mod router;
mod state;
mod types;

pub use events::{EventBus, EventKind, EventResult, Listener, ListenerId, ShapeEvent};
pub(crate) use events::dispatch;
pub use router::{InputRouter, RouteCtx, RouteOutcome};
pub use state::{DragPhase, InputState};
pub use types::{MouseButton, MouseWheelDelta, PointerEvent, PointerKind};
