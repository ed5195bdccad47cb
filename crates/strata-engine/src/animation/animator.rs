use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::scene::{Scene, ShapeId};
use crate::style::Value;

use super::controller::{AnimationHandle, Controller};
use super::interpolate::interpolate;
use super::{Clock, Easing};

type DuringFn = Rc<RefCell<Box<dyn FnMut(&ShapeId, f32)>>>;
type DoneFn = Box<dyn FnOnce()>;

/// Keyframe tween builder for one record's properties.
///
/// ```ignore
/// let handle = Animator::new("bar_3")
///     .when(500.0, [("style.height", Value::from(120.0))])
///     .when(800.0, [("position", Value::from(vec![0.0, -10.0]))])
///     .done(|| log::info!("settled"))
///     .start(&mut clock, &scene, Easing::Out(Curve::Cubic), now_ms);
/// ```
pub struct Animator {
    target: ShapeId,
    keyframes: Vec<(f64, Vec<(String, Value)>)>,
    delay: f64,
    looped: bool,
    during: Option<Box<dyn FnMut(&ShapeId, f32)>>,
    done: Option<DoneFn>,
}

impl Animator {
    pub fn new(target: impl Into<ShapeId>) -> Self {
        Self {
            target: target.into(),
            keyframes: Vec::new(),
            delay: 0.0,
            looped: false,
            during: None,
            done: None,
        }
    }

    /// Adds a keyframe: at `time` ms the listed property paths reach their values.
    pub fn when<K, V>(mut self, time: f64, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let props = props.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.keyframes.push((time.max(0.0), props));
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Called at most once per clock pass while any segment runs.
    pub fn during(mut self, f: impl FnMut(&ShapeId, f32) + 'static) -> Self {
        self.during = Some(Box::new(f));
        self
    }

    /// Called once every segment has finished. Never called when stopped or looping.
    pub fn done(mut self, f: impl FnOnce() + 'static) -> Self {
        self.done = Some(Box::new(f));
        self
    }

    /// Schedules one controller per keyframe segment per property path, with
    /// keyframe time 0 at host time `now`.
    ///
    /// Paths with no keyframe at time 0 start from the record's current value.
    pub fn start(
        self,
        clock: &mut Clock,
        scene: &Scene,
        easing: Easing,
        now: f64,
    ) -> AnimationHandle {
        let handle = clock.new_handle();
        let Animator { target, mut keyframes, delay, looped, during, done } = self;

        keyframes.sort_by(|a, b| a.0.total_cmp(&b.0));
        let total = keyframes.last().map_or(0.0, |k| k.0);

        let mut tracks: BTreeMap<String, Vec<(f64, Value)>> = BTreeMap::new();
        for (time, props) in keyframes {
            for (path, value) in props {
                tracks.entry(path).or_default().push((time, value));
            }
        }

        let mut segments = Vec::new();
        for (path, mut frames) in tracks {
            if frames.first().is_some_and(|f| f.0 > 0.0) {
                match scene.property(&target, &path) {
                    Some(current) => frames.insert(0, (0.0, current)),
                    None => {
                        log::debug!("no current value for {target}.{path}; track skipped");
                        continue;
                    }
                }
            }
            for pair in frames.windows(2) {
                let ((t0, from), (t1, to)) = (&pair[0], &pair[1]);
                segments.push((path.clone(), *t0, *t1, from.clone(), to.clone()));
            }
        }

        let done: Rc<RefCell<Option<DoneFn>>> = Rc::new(RefCell::new(done));
        if segments.is_empty() {
            if let Some(f) = done.borrow_mut().take() {
                f();
            }
            return handle;
        }

        let remaining = Rc::new(Cell::new(segments.len()));
        let during: Option<DuringFn> = during.map(|f| Rc::new(RefCell::new(f)));
        let last_during = Rc::new(Cell::new(f64::NAN));

        for (path, t0, t1, from, to) in segments {
            let life = t1 - t0;
            let mut controller = Controller::new(life)
                .with_target(format!("{target}.{path}"))
                .with_delay(delay + t0)
                .with_easing(easing)
                .looped(looped);
            if looped {
                controller = controller.with_gap(total - life);
            }

            let id = target.clone();
            let during = during.clone();
            let last_during = Rc::clone(&last_during);
            controller = controller.on_frame(move |ctx, p| {
                match interpolate(&path, &from, &to, p) {
                    Ok(value) => {
                        ctx.scene.set_property(&id, &path, value);
                    }
                    Err(err) => ctx.report(err),
                }
                if let Some(during) = &during {
                    if last_during.get() != ctx.now {
                        last_during.set(ctx.now);
                        let mut f = during.borrow_mut();
                        (*f)(&id, p);
                    }
                }
            });

            let remaining = Rc::clone(&remaining);
            let done = Rc::clone(&done);
            controller = controller.on_destroy(move |_| {
                remaining.set(remaining.get().saturating_sub(1));
                if remaining.get() == 0 {
                    if let Some(f) = done.borrow_mut().take() {
                        f();
                    }
                }
            });

            clock.add_to(handle, now, controller);
        }
        handle
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("target", &self.target)
            .field("keyframes", &self.keyframes)
            .field("delay", &self.delay)
            .field("looped", &self.looped)
            .finish_non_exhaustive()
    }
}
