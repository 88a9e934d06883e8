use cadence_animation::{Easing, FieldMap, Tween, TweenTarget};

use crate::args::Args;
use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::scene::Scene;

pub(super) const NAME: &str = "tween";

// Arguments: target, duration, easing name, end values
pub(super) fn def() -> SceneletDef {
    SceneletDef::new(|state, _, args| {
        let (Some(target), Some(end_values)) = (args.target(0), args.fields(3)) else {
            tracing::warn!("tween: expected a target and end values");
            return;
        };
        let duration = args.number(1).unwrap_or(0.0);
        let easing = args.text(2).map_or(Easing::Linear, Easing::from_name);
        state.insert(Tween::new(target, duration, easing, end_values));
    })
    .update(|state, scene| {
        let delta = scene.scheduler().frame_delta();
        state
            .get_mut::<Tween>()
            .is_some_and(|tween| tween.step(delta))
    })
    .finish(|state, _| {
        if let Some(tween) = state.get::<Tween>() {
            tween.finish();
        }
    })
}

impl Scene {
    /// Interpolate the fields named in `end_values` on `target` over `duration` seconds
    pub fn tween(
        &self,
        target: TweenTarget,
        duration: f64,
        easing: Easing,
        end_values: FieldMap,
    ) -> Result<&Self> {
        self.op(
            NAME,
            Args::new()
                .with(target)
                .with(duration)
                .with(easing.name())
                .with(end_values),
        )
    }
}
