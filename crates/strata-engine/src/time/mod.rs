//! Time subsystem.
//!
//! The engine never reads the wall clock; hosts own a `FrameClock` and pass
//! `FrameTime::now_ms` to `Engine::tick` once per frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
