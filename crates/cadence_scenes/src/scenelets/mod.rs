//! Built-in scenelets
//!
//! Each built-in is registered by name like any host-defined kind and gets a
//! typed builder method on [`Scene`](crate::Scene):
//!
//! - `call`: invoke a host closure (instantaneous)
//! - `fade_to`: animate the engine's screen mask
//! - `marquee`: scrolling announcement banner
//! - `pause`: wait a number of seconds of frame time
//! - `play_sound`: play a sound and wait for it to end
//! - `tween`: interpolate fields of a shared target

mod call;
mod fade;
mod marquee;
mod pause;
mod sound;
mod tween;

use crate::engine::SceneEngine;
use crate::error::Result;

pub use marquee::Banner;

pub(crate) fn register_builtins(engine: &SceneEngine) -> Result<()> {
    engine.register(call::NAME, call::def())?;
    engine.register(fade::NAME, fade::def())?;
    engine.register(marquee::NAME, marquee::def())?;
    engine.register(pause::NAME, pause::def())?;
    engine.register(sound::NAME, sound::def())?;
    engine.register(tween::NAME, tween::def())?;
    Ok(())
}
