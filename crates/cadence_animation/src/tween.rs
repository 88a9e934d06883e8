//! Property tweens
//!
//! A [`Tween`] captures, for every requested field, the target's value at
//! creation time and the signed change to the requested end value. Each step
//! advances elapsed time and rewrites the fields through the easing curve;
//! [`Tween::finish`] snaps every field to its exact end value so no
//! floating-point drift survives the animation.
//!
//! The target is shared, not owned. Nothing stops other code from writing the
//! same fields while a tween runs; the last writer wins for that frame.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::values::{FieldMap, Tweenable};

/// Shared handle to a tween target
pub type TweenTarget = Rc<RefCell<dyn Tweenable>>;

#[derive(Clone, Debug)]
struct Channel {
    field: String,
    start: f64,
    delta: f64,
    end: f64,
}

/// Time-driven interpolation of named fields on a shared target
pub struct Tween {
    target: TweenTarget,
    channels: SmallVec<[Channel; 4]>,
    elapsed: f64,
    duration: f64,
    easing: Easing,
}

impl Tween {
    /// Capture start values and deltas for every end value the target has
    ///
    /// A tween whose end values all equal the current values is instant: its
    /// elapsed time starts at its duration.
    pub fn new(target: TweenTarget, duration: f64, easing: Easing, end_values: &FieldMap) -> Self {
        let channels: SmallVec<[Channel; 4]> = {
            let current = target.borrow();
            end_values
                .iter()
                .filter_map(|(field, end)| match current.get(field) {
                    Some(start) => Some(Channel {
                        field: field.to_owned(),
                        start,
                        delta: end - start,
                        end,
                    }),
                    None => {
                        tracing::warn!(field, "tween target has no such field");
                        None
                    }
                })
                .collect()
        };

        let duration = duration.max(0.0);
        let changed = channels.iter().any(|channel| channel.delta != 0.0);
        Self {
            target,
            channels,
            elapsed: if changed { 0.0 } else { duration },
            duration,
            easing,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// True when no field needs to change
    pub fn is_instant(&self) -> bool {
        self.channels.iter().all(|channel| channel.delta == 0.0)
    }

    /// True once elapsed time has reached the duration
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Eased value of `field` at `elapsed` seconds, without touching the target
    pub fn sample(&self, field: &str, elapsed: f64) -> Option<f64> {
        self.channels
            .iter()
            .find(|channel| channel.field == field)
            .map(|channel| {
                self.easing
                    .ease(elapsed, channel.start, channel.delta, self.duration)
            })
    }

    /// Advance by `dt` seconds
    ///
    /// Returns `true` and writes eased values while elapsed time is below the
    /// duration; returns `false` without writing once it is reached.
    pub fn step(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            return false;
        }

        match self.target.try_borrow_mut() {
            Ok(mut target) => {
                for channel in &self.channels {
                    let value =
                        self.easing
                            .ease(self.elapsed, channel.start, channel.delta, self.duration);
                    target.set(&channel.field, value);
                }
            }
            Err(_) => tracing::warn!("tween target borrowed elsewhere; frame skipped"),
        }
        true
    }

    /// Write the exact end value of every field
    pub fn finish(&self) {
        match self.target.try_borrow_mut() {
            Ok(mut target) => {
                for channel in &self.channels {
                    target.set(&channel.field, channel.end);
                }
            }
            Err(_) => tracing::warn!("tween target borrowed elsewhere; end values not applied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Color;

    fn target(fields: FieldMap) -> Rc<RefCell<FieldMap>> {
        Rc::new(RefCell::new(fields))
    }

    #[test]
    fn test_linear_steps() {
        let object = target(FieldMap::new().with("x", 0.0));
        let mut tween = Tween::new(
            object.clone(),
            1.0,
            Easing::Linear,
            &FieldMap::new().with("x", 10.0),
        );

        assert_eq!(tween.sample("x", 0.0), Some(0.0));
        assert!(tween.step(0.25));
        assert_eq!(object.borrow().get("x"), Some(2.5));
        assert!(tween.step(0.25));
        assert_eq!(object.borrow().get("x"), Some(5.0));
    }

    #[test]
    fn test_finish_snaps_exactly() {
        let object = target(FieldMap::new().with("x", 0.1));
        let mut tween = Tween::new(
            object.clone(),
            1.0,
            Easing::OutElastic,
            &FieldMap::new().with("x", 0.3),
        );

        let mut frames = 0;
        while tween.step(1.0 / 60.0) {
            frames += 1;
        }
        tween.finish();

        assert!(frames > 50);
        assert_eq!(object.borrow().get("x"), Some(0.3));
    }

    #[test]
    fn test_unchanged_values_are_instant() {
        let object = target(FieldMap::new().with("x", 4.0));
        let mut tween = Tween::new(
            object.clone(),
            2.0,
            Easing::Linear,
            &FieldMap::new().with("x", 4.0),
        );

        assert!(tween.is_instant());
        assert!(tween.is_complete());
        assert!(!tween.step(1.0 / 60.0));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let object = target(FieldMap::new().with("x", 0.0));
        let tween = Tween::new(
            object,
            1.0,
            Easing::Linear,
            &FieldMap::new().with("y", 1.0),
        );
        assert!(tween.is_instant());
        assert_eq!(tween.sample("y", 0.5), None);
    }

    #[test]
    fn test_color_fade() {
        let mask = Rc::new(RefCell::new(Color::TRANSPARENT));
        let mut tween = Tween::new(
            mask.clone(),
            0.5,
            Easing::Linear,
            &Color::BLACK.to_fields(),
        );

        while tween.step(0.1) {}
        tween.finish();
        assert_eq!(*mask.borrow(), Color::BLACK);
    }
}
