//! Strata engine crate.
//!
//! A retained-mode 2D engine for charts: a scene of styled shape records,
//! composited onto one surface per z-level, with pointer interaction
//! (hover, click, drag and drop) and tick-driven tweening. Drawing goes
//! through the [`surface::Surface`] capability, so hosts bring their own
//! rasterizer; [`surface::RecordingSurface`] is a headless implementation.
//!
//! ```ignore
//! let registry = Rc::new(ShapeRegistry::with_builtins());
//! let factory = RecordingFactory::new(Viewport::new(640.0, 480.0));
//! let mut engine = Engine::new(factory, registry, EngineConfig::default());
//! engine.add_shape(ShapeRecord::new("circle").with_style(style));
//! engine.render();
//! ```

pub mod animation;
pub mod compositor;
pub mod config;
pub mod coords;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod logging;
pub mod paint;
pub mod scene;
pub mod shape;
pub mod style;
pub mod surface;
pub mod time;

mod engine;

pub use animation::{AnimationHandle, Animator, Clock, Controller, Curve, Easing};
pub use config::{EngineConfig, InputConfig};
pub use diagnostics::{DiagnosticMode, Diagnostics};
pub use engine::Engine;
pub use error::{EngineError, InterpolationError};
pub use input::{EventKind, EventResult, PointerEvent, ShapeEvent};
pub use scene::{Order, Scene, ShapeId, ShapePatch, ShapeRecord, ZLevel};
pub use shape::{ShapePlugin, ShapeRegistry};
pub use style::{HighlightConfig, Style, Value};
