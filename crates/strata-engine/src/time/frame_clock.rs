use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in milliseconds.
    pub dt_ms: f64,

    /// Engine timeline position, in milliseconds. Feed this to `Engine::tick`.
    pub now_ms: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Host-side clock producing millisecond timestamps for the engine.
///
/// The timeline advances by the clamped delta, so a stalled host (debugger,
/// minimized window) resumes animations where they left off instead of
/// jumping to their end.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    timeline_ms: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            timeline_ms: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline without moving the timeline.
    ///
    /// Useful after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Current timeline position without advancing.
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.timeline_ms
    }

    /// Advances the clock to the current instant.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let dt_ms = dt.as_secs_f64() * 1000.0;
        self.timeline_ms += dt_ms;

        let ft = FrameTime {
            dt_ms,
            now_ms: self.timeline_ms,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_accumulates_deltas() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let t0 = Instant::now();
        clock.last = t0;
        let a = clock.tick_at(t0 + Duration::from_millis(16));
        let b = clock.tick_at(t0 + Duration::from_millis(40));
        assert!((a.now_ms - 16.0).abs() < 1e-6);
        assert!((b.dt_ms - 24.0).abs() < 1e-6);
        assert!((b.now_ms - 40.0).abs() < 1e-6);
        assert_eq!(b.frame_index, 1);
    }

    #[test]
    fn stalls_are_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.last = t0;
        let ft = clock.tick_at(t0 + Duration::from_secs(10));
        assert!((ft.dt_ms - 250.0).abs() < 1e-6);
        assert!((clock.now_ms() - 250.0).abs() < 1e-6);
    }
}
