use std::fmt;

use crate::error::EngineError;
use crate::scene::Scene;

use super::Easing;

/// Identifies the group of controllers started together.
///
/// Returned by [`Clock::add`](super::Clock::add) and
/// [`Animator::start`](super::Animator::start).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AnimationHandle(pub(crate) u64);

/// Mutable view handed to controller callbacks during a clock pass.
pub struct FrameCtx<'a> {
    pub scene: &'a mut Scene,
    /// Timestamp of the pass, in milliseconds.
    pub now: f64,
    pub(crate) cancelled: Vec<AnimationHandle>,
    pub(crate) errors: Vec<EngineError>,
}

impl<'a> FrameCtx<'a> {
    pub fn new(scene: &'a mut Scene, now: f64) -> Self {
        Self {
            scene,
            now,
            cancelled: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Stops every controller in `handle` once the current pass completes.
    pub fn cancel(&mut self, handle: AnimationHandle) {
        self.cancelled.push(handle);
    }

    pub fn report(&mut self, err: impl Into<EngineError>) {
        self.errors.push(err.into());
    }
}

pub type FrameFn = Box<dyn FnMut(&mut FrameCtx<'_>, f32)>;
pub type LifecycleFn = Box<dyn FnMut(&mut FrameCtx<'_>)>;

/// Outcome of one [`Controller::step`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Step {
    /// Still inside the delay.
    Waiting,
    Running,
    /// Reached the end and looped.
    Restarted,
    /// Reached the end; the clock destroys it after the pass.
    Finished,
}

/// One time-bounded tween.
///
/// Times are milliseconds on the host clock passed to
/// [`Engine::tick`](crate::Engine::tick).
pub struct Controller {
    target: String,
    life: f64,
    delay: f64,
    gap: f64,
    looped: bool,
    easing: Easing,
    start: f64,
    on_frame: Option<FrameFn>,
    on_restart: Option<LifecycleFn>,
    on_destroy: Option<LifecycleFn>,
}

impl Controller {
    pub fn new(life: f64) -> Self {
        Self {
            target: String::new(),
            life: life.max(0.0),
            delay: 0.0,
            gap: 0.0,
            looped: false,
            easing: Easing::Linear,
            start: 0.0,
            on_frame: None,
            on_restart: None,
            on_destroy: None,
        }
    }

    /// Free-form description of what the controller animates, for logs.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Pause between the end of one loop and the start of the next.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_frame(mut self, f: impl FnMut(&mut FrameCtx<'_>, f32) + 'static) -> Self {
        self.on_frame = Some(Box::new(f));
        self
    }

    pub fn on_restart(mut self, f: impl FnMut(&mut FrameCtx<'_>) + 'static) -> Self {
        self.on_restart = Some(Box::new(f));
        self
    }

    pub fn on_destroy(mut self, f: impl FnMut(&mut FrameCtx<'_>) + 'static) -> Self {
        self.on_destroy = Some(Box::new(f));
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn life(&self) -> f64 {
        self.life
    }

    #[inline]
    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Time at which the current run begins.
    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Schedules the first run relative to `now`, honouring the delay.
    pub fn begin(&mut self, now: f64) {
        self.start = now + self.delay;
    }

    /// Linear progress at `now`, in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.life <= 0.0 {
            return if now >= self.start { 1.0 } else { 0.0 };
        }
        ((now - self.start) / self.life).clamp(0.0, 1.0)
    }

    /// Advances to `now`, invoking `on_frame` with eased progress.
    pub fn step(&mut self, now: f64, ctx: &mut FrameCtx<'_>) -> Step {
        if now < self.start {
            return Step::Waiting;
        }
        let p = self.progress(now);
        if let Some(f) = self.on_frame.as_mut() {
            f(ctx, self.easing.apply(p as f32));
        }
        if p < 1.0 {
            return Step::Running;
        }
        if self.looped {
            self.start = now + self.gap;
            if let Some(f) = self.on_restart.as_mut() {
                f(ctx);
            }
            Step::Restarted
        } else {
            Step::Finished
        }
    }

    /// Fires `on_destroy`, at most once.
    pub(crate) fn destroy(&mut self, ctx: &mut FrameCtx<'_>) {
        if let Some(mut f) = self.on_destroy.take() {
            f(ctx);
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("target", &self.target)
            .field("life", &self.life)
            .field("delay", &self.delay)
            .field("gap", &self.gap)
            .field("looped", &self.looped)
            .field("easing", &self.easing)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}
