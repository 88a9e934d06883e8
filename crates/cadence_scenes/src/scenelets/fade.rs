use cadence_animation::{Color, Easing, TweenTarget};

use crate::args::Args;
use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::scene::Scene;

pub(super) const NAME: &str = "fade_to";

const DEFAULT_DURATION: f64 = 0.25;

pub(super) fn def() -> SceneletDef {
    SceneletDef::new(|state, activation, args| {
        let Some(color) = args.color(0) else {
            tracing::warn!("fade_to: first argument is not a color");
            return;
        };
        let duration = match args.number(1) {
            Some(duration) if duration >= 0.0 => duration,
            _ => DEFAULT_DURATION,
        };

        let engine = activation.engine();
        let mask: TweenTarget = engine.screen_mask_target();
        let fader = engine.scene();
        if let Err(err) = fader
            .tween(mask, duration, Easing::Linear, color.to_fields())
            .and_then(|fader| fader.run(false))
        {
            tracing::error!(%err, "fade_to: failed to start fader");
            return;
        }
        state.insert(fader);
    })
    .update(|state, _| state.get::<Scene>().is_some_and(Scene::is_running))
}

impl Scene {
    /// Fade the screen mask to `color` over `duration` seconds
    ///
    /// A negative duration selects the default of 0.25 s.
    pub fn fade_to(&self, color: Color, duration: f64) -> Result<&Self> {
        self.op(NAME, Args::new().with(color).with(duration))
    }
}
