//! Easing curves
//!
//! The classic Penner catalog. Every curve has the signature
//! `ease(t, start, delta, duration)`: `t` is the elapsed time, the result moves
//! from `start` at `t = 0` to `start + delta` at `t = duration`.

use std::f64::consts::PI;

/// Overshoot used by the back curves
const BACK_OVERSHOOT: f64 = 1.70158;

/// A named easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    /// Every curve in the catalog
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    /// Conventional name, e.g. `"easeOutQuad"`
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::InQuad => "easeInQuad",
            Easing::OutQuad => "easeOutQuad",
            Easing::InOutQuad => "easeInOutQuad",
            Easing::InCubic => "easeInCubic",
            Easing::OutCubic => "easeOutCubic",
            Easing::InOutCubic => "easeInOutCubic",
            Easing::InQuart => "easeInQuart",
            Easing::OutQuart => "easeOutQuart",
            Easing::InOutQuart => "easeInOutQuart",
            Easing::InQuint => "easeInQuint",
            Easing::OutQuint => "easeOutQuint",
            Easing::InOutQuint => "easeInOutQuint",
            Easing::InSine => "easeInSine",
            Easing::OutSine => "easeOutSine",
            Easing::InOutSine => "easeInOutSine",
            Easing::InExpo => "easeInExpo",
            Easing::OutExpo => "easeOutExpo",
            Easing::InOutExpo => "easeInOutExpo",
            Easing::InCirc => "easeInCirc",
            Easing::OutCirc => "easeOutCirc",
            Easing::InOutCirc => "easeInOutCirc",
            Easing::InElastic => "easeInElastic",
            Easing::OutElastic => "easeOutElastic",
            Easing::InOutElastic => "easeInOutElastic",
            Easing::InBack => "easeInBack",
            Easing::OutBack => "easeOutBack",
            Easing::InOutBack => "easeInOutBack",
            Easing::InBounce => "easeInBounce",
            Easing::OutBounce => "easeOutBounce",
            Easing::InOutBounce => "easeInOutBounce",
        }
    }

    /// Look up a curve by name, falling back to [`Easing::Linear`]
    pub fn from_name(name: &str) -> Easing {
        match Easing::ALL.iter().find(|easing| easing.name() == name) {
            Some(&easing) => easing,
            None => {
                tracing::warn!(name, "unknown easing, using linear");
                Easing::Linear
            }
        }
    }

    /// Evaluate the curve at elapsed time `t`
    pub fn ease(self, t: f64, start: f64, delta: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return start + delta;
        }
        let (b, c, d) = (start, delta, duration);

        match self {
            Easing::Linear => c * t / d + b,

            Easing::InQuad => {
                let t = t / d;
                c * t * t + b
            }
            Easing::OutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Easing::InOutQuad => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t + b
                } else {
                    let t = t - 1.0;
                    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
                }
            }

            Easing::InCubic => {
                let t = t / d;
                c * t * t * t + b
            }
            Easing::OutCubic => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Easing::InOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t * t + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * t + 2.0) + b
                }
            }

            Easing::InQuart => {
                let t = t / d;
                c * t.powi(4) + b
            }
            Easing::OutQuart => {
                let t = t / d - 1.0;
                -c * (t.powi(4) - 1.0) + b
            }
            Easing::InOutQuart => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t.powi(4) + b
                } else {
                    let t = t - 2.0;
                    -c / 2.0 * (t.powi(4) - 2.0) + b
                }
            }

            Easing::InQuint => {
                let t = t / d;
                c * t.powi(5) + b
            }
            Easing::OutQuint => {
                let t = t / d - 1.0;
                c * (t.powi(5) + 1.0) + b
            }
            Easing::InOutQuint => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t.powi(5) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t.powi(5) + 2.0) + b
                }
            }

            Easing::InSine => -c * (t / d * (PI / 2.0)).cos() + c + b,
            Easing::OutSine => c * (t / d * (PI / 2.0)).sin() + b,
            Easing::InOutSine => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,

            Easing::InExpo => {
                if t == 0.0 {
                    b
                } else {
                    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
                }
            }
            Easing::OutExpo => {
                if t == d {
                    b + c
                } else {
                    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
                }
            }
            Easing::InOutExpo => {
                if t == 0.0 {
                    return b;
                }
                if t == d {
                    return b + c;
                }
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b
                } else {
                    c / 2.0 * (-(2f64.powf(-10.0 * (t - 1.0))) + 2.0) + b
                }
            }

            Easing::InCirc => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            Easing::OutCirc => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            Easing::InOutCirc => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
                }
            }

            Easing::InElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                let t = t - 1.0;
                -(c * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
            }
            Easing::OutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                c * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
            }
            Easing::InOutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / (d / 2.0);
                if t == 2.0 {
                    return b + c;
                }
                let p = d * (0.3 * 1.5);
                let s = p / 4.0;
                let t = t - 1.0;
                let wave = ((t * d - s) * (2.0 * PI) / p).sin();
                if t < 0.0 {
                    -0.5 * (c * 2f64.powf(10.0 * t) * wave) + b
                } else {
                    c * 2f64.powf(-10.0 * t) * wave * 0.5 + c + b
                }
            }

            Easing::InBack => {
                let s = BACK_OVERSHOOT;
                let t = t / d;
                c * t * t * ((s + 1.0) * t - s) + b
            }
            Easing::OutBack => {
                let s = BACK_OVERSHOOT;
                let t = t / d - 1.0;
                c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
            }
            Easing::InOutBack => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
                }
            }

            Easing::InBounce => c - bounce_out(d - t, 0.0, c, d) + b,
            Easing::OutBounce => bounce_out(t, b, c, d),
            Easing::InOutBounce => {
                if t < d / 2.0 {
                    Easing::InBounce.ease(t * 2.0, 0.0, c, d) * 0.5 + b
                } else {
                    bounce_out(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
                }
            }
        }
    }
}

fn bounce_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

/// Evaluate a named curve; unknown names ease linearly
pub fn ease(name: &str, t: f64, start: f64, delta: f64, duration: f64) -> f64 {
    Easing::from_name(name).ease(t, start, delta, duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_endpoints() {
        for easing in Easing::ALL {
            let start = easing.ease(0.0, 5.0, 10.0, 2.0);
            let end = easing.ease(2.0, 5.0, 10.0, 2.0);
            assert!((start - 5.0).abs() < EPSILON, "{} at 0: {}", easing.name(), start);
            assert!((end - 15.0).abs() < EPSILON, "{} at d: {}", easing.name(), end);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(Easing::Linear.ease(0.5, 0.0, 10.0, 1.0), 5.0);
        assert_eq!(Easing::Linear.ease(0.0, 0.0, 10.0, 1.0), 0.0);
    }

    #[test]
    fn test_in_out_symmetry() {
        let mid = Easing::InOutCubic.ease(0.5, 0.0, 1.0, 1.0);
        assert!((mid - 0.5).abs() < EPSILON);

        let early_in = Easing::InQuad.ease(0.25, 0.0, 1.0, 1.0);
        let early_out = Easing::OutQuad.ease(0.25, 0.0, 1.0, 1.0);
        assert!(early_in < 0.25);
        assert!(early_out > 0.25);
    }

    #[test]
    fn test_back_overshoots() {
        let value = Easing::InBack.ease(0.2, 0.0, 1.0, 1.0);
        assert!(value < 0.0);
        let value = Easing::OutBack.ease(0.8, 0.0, 1.0, 1.0);
        assert!(value > 1.0);
    }

    #[test]
    fn test_names_roundtrip() {
        for easing in Easing::ALL {
            assert_eq!(Easing::from_name(easing.name()), easing);
        }
    }

    #[test]
    fn test_unknown_name_is_linear() {
        assert_eq!(Easing::from_name("easeSideways"), Easing::Linear);
        assert_eq!(ease("wobble", 0.25, 0.0, 8.0, 1.0), 2.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        assert_eq!(Easing::OutExpo.ease(0.0, 1.0, 2.0, 0.0), 3.0);
    }
}
