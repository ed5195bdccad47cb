//! Tick-driven animation.
//!
//! A [`Clock`] owns running [`Controller`]s and advances them from host
//! timestamps. [`Animator`] builds keyframe tweens over record property
//! paths on top of it.

mod animator;
mod clock;
mod controller;
mod easing;
mod interpolate;

pub use animator::Animator;
pub use clock::{Clock, TickReport};
pub use controller::{AnimationHandle, Controller, FrameCtx, FrameFn, LifecycleFn, Step};
pub use easing::{Curve, Easing};
pub use interpolate::interpolate;
