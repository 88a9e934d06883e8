//! Cadence Animation
//!
//! Pure interpolation helpers, independent of the scheduler.
//!
//! # Features
//!
//! - **Easing Catalog**: linear plus in/out/in-out quad, cubic, quart, quint,
//!   sine, expo, circ, elastic, back and bounce curves
//! - **Tweenable Targets**: colors, field maps, or any type naming its numeric fields
//! - **Tweens**: frame-stepped interpolation that snaps to exact end values

pub mod easing;
pub mod tween;
pub mod values;

pub use easing::{ease, Easing};
pub use tween::{Tween, TweenTarget};
pub use values::{Color, FieldMap, Tweenable};
