use std::collections::HashSet;
use std::fmt;

use crate::error::EngineError;
use crate::scene::Scene;

use super::controller::{AnimationHandle, Controller, FrameCtx, Step};

struct Entry {
    handle: AnimationHandle,
    controller: Controller,
}

/// What one [`Clock::update`] pass did.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Controllers that ran a frame (past their delay).
    pub active: usize,
    /// Controllers removed after finishing.
    pub finished: usize,
    /// Whether the refresh callback ran.
    pub refreshed: bool,
    /// Faults raised by callbacks, for the diagnostic channel.
    pub errors: Vec<EngineError>,
}

/// Drives every running [`Controller`] from host-supplied timestamps.
#[derive(Default)]
pub struct Clock {
    entries: Vec<Entry>,
    now: f64,
    next_handle: u64,
    on_tick: Option<Box<dyn FnMut(f64)>>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the last pass.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Reserves a handle for a group of controllers.
    pub fn new_handle(&mut self) -> AnimationHandle {
        let h = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    /// Starts `controller` at the time of the last pass and returns its handle.
    ///
    /// Hosts that stop ticking while idle should use [`add_at`](Self::add_at).
    pub fn add(&mut self, controller: Controller) -> AnimationHandle {
        self.add_at(self.now, controller)
    }

    /// Starts `controller` at host time `now` and returns its handle.
    pub fn add_at(&mut self, now: f64, controller: Controller) -> AnimationHandle {
        let handle = self.new_handle();
        self.add_to(handle, now, controller);
        handle
    }

    /// Starts `controller` at host time `now` as part of an existing group.
    pub fn add_to(&mut self, handle: AnimationHandle, now: f64, mut controller: Controller) {
        controller.begin(now);
        log::trace!("controller {:?} starts at {}", controller.target(), controller.start());
        self.entries.push(Entry { handle, controller });
    }

    /// Removes every controller in `handle` without firing `on_destroy`.
    pub fn stop(&mut self, handle: AnimationHandle) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Callback run after each pass that had an active controller.
    pub fn set_on_tick(&mut self, f: impl FnMut(f64) + 'static) {
        self.on_tick = Some(Box::new(f));
    }

    /// Advances all controllers to `now`.
    ///
    /// Finished controllers are removed after the pass and then destroyed;
    /// cancellations requested from callbacks also apply after the pass. When
    /// anything ran, `refresh` is called exactly once, then the tick callback.
    pub fn update(
        &mut self,
        now: f64,
        scene: &mut Scene,
        refresh: impl FnOnce(&mut Scene),
    ) -> TickReport {
        self.now = now;
        let mut report = TickReport::default();
        let mut ctx = FrameCtx::new(scene, now);

        let mut finished = Vec::new();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            match entry.controller.step(now, &mut ctx) {
                Step::Waiting => {}
                Step::Running | Step::Restarted => report.active += 1,
                Step::Finished => {
                    report.active += 1;
                    finished.push(i);
                }
            }
        }

        let cancelled: HashSet<AnimationHandle> = ctx.cancelled.drain(..).collect();
        let mut done = Vec::with_capacity(finished.len());
        for i in finished.into_iter().rev() {
            let entry = self.entries.remove(i);
            if !cancelled.contains(&entry.handle) {
                done.push(entry);
            }
        }
        if !cancelled.is_empty() {
            self.entries.retain(|e| !cancelled.contains(&e.handle));
        }

        // Destroy in start order.
        for mut entry in done.into_iter().rev() {
            entry.controller.destroy(&mut ctx);
            report.finished += 1;
        }
        if !ctx.cancelled.is_empty() {
            let late: HashSet<AnimationHandle> = ctx.cancelled.drain(..).collect();
            self.entries.retain(|e| !late.contains(&e.handle));
        }

        report.errors = std::mem::take(&mut ctx.errors);
        drop(ctx);

        if report.active > 0 {
            refresh(scene);
            report.refreshed = true;
            if let Some(f) = self.on_tick.as_mut() {
                f(now);
            }
        }
        report
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("controllers", &self.entries.len())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}
