use std::f32::consts::PI;

/// Shape of an easing curve, expressed as its ease-in form.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Curve {
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    Sinusoidal,
    Exponential,
    Circular,
    Elastic,
    Back,
    Bounce,
}

impl Curve {
    pub const ALL: [Curve; 10] = [
        Curve::Quadratic,
        Curve::Cubic,
        Curve::Quartic,
        Curve::Quintic,
        Curve::Sinusoidal,
        Curve::Exponential,
        Curve::Circular,
        Curve::Elastic,
        Curve::Back,
        Curve::Bounce,
    ];

    fn name(self) -> &'static str {
        match self {
            Curve::Quadratic => "Quadratic",
            Curve::Cubic => "Cubic",
            Curve::Quartic => "Quartic",
            Curve::Quintic => "Quintic",
            Curve::Sinusoidal => "Sinusoidal",
            Curve::Exponential => "Exponential",
            Curve::Circular => "Circular",
            Curve::Elastic => "Elastic",
            Curve::Back => "Back",
            Curve::Bounce => "Bounce",
        }
    }

    /// Ease-in form. `ease_in(0) == 0`, `ease_in(1) == 1`.
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Curve::Quadratic => t * t,
            Curve::Cubic => t * t * t,
            Curve::Quartic => t * t * t * t,
            Curve::Quintic => t * t * t * t * t,
            Curve::Sinusoidal => 1.0 - (t * PI / 2.0).cos(),
            Curve::Exponential => {
                if t == 0.0 {
                    0.0
                } else {
                    1024f32.powf(t - 1.0)
                }
            }
            Curve::Circular => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Curve::Elastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let p = 0.4;
                let s = p / 4.0;
                let t = t - 1.0;
                -(2f32.powf(10.0 * t) * ((t - s) * (2.0 * PI) / p).sin())
            }
            Curve::Back => {
                let s = 1.70158;
                t * t * ((s + 1.0) * t - s)
            }
            Curve::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

/// Easing function mapping linear progress in `[0, 1]` onto eased progress.
///
/// Named after the classic Penner set: `Easing::from_name("CubicOut")`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Easing {
    #[default]
    Linear,
    In(Curve),
    Out(Curve),
    InOut(Curve),
}

impl Easing {
    /// Eased progress for `t`, clamped into `[0, 1]` first.
    ///
    /// Elastic and back curves overshoot, so the result is not clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::In(c) => c.ease_in(t),
            Easing::Out(c) => 1.0 - c.ease_in(1.0 - t),
            Easing::InOut(c) => {
                if t < 0.5 {
                    c.ease_in(t * 2.0) * 0.5
                } else {
                    1.0 - c.ease_in((1.0 - t) * 2.0) * 0.5
                }
            }
        }
    }

    /// Parses `"Linear"`, `"<Curve>In"`, `"<Curve>Out"` or `"<Curve>InOut"`.
    pub fn from_name(name: &str) -> Option<Easing> {
        if name.eq_ignore_ascii_case("linear") {
            return Some(Easing::Linear);
        }
        Curve::ALL.into_iter().find_map(|c| {
            let rest = name.strip_prefix(c.name())?;
            match rest {
                "In" => Some(Easing::In(c)),
                "Out" => Some(Easing::Out(c)),
                "InOut" => Some(Easing::InOut(c)),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<Easing> {
        let mut v = vec![Easing::Linear];
        for c in Curve::ALL {
            v.extend([Easing::In(c), Easing::Out(c), Easing::InOut(c)]);
        }
        v
    }

    #[test]
    fn every_curve_starts_at_zero_and_ends_at_one() {
        for e in all() {
            assert!(e.apply(0.0).abs() < 1e-4, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-4, "{e:?} at 1");
        }
    }

    #[test]
    fn in_out_is_symmetric_at_the_midpoint() {
        for c in Curve::ALL {
            assert!((Easing::InOut(c).apply(0.5) - 0.5).abs() < 1e-4, "{c:?}");
        }
    }

    #[test]
    fn quadratic_in_is_slow_then_fast() {
        assert!((Easing::In(Curve::Quadratic).apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::Out(Curve::Quadratic).apply(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn names_parse() {
        assert_eq!(Easing::from_name("CubicOut"), Some(Easing::Out(Curve::Cubic)));
        assert_eq!(Easing::from_name("BounceInOut"), Some(Easing::InOut(Curve::Bounce)));
        assert_eq!(Easing::from_name("linear"), Some(Easing::Linear));
        assert_eq!(Easing::from_name("Wobbly"), None);
    }
}
