use crate::args::Args;
use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::scene::Scene;

pub(super) const NAME: &str = "pause";

struct Pause {
    duration: f64,
    elapsed: f64,
}

pub(super) fn def() -> SceneletDef {
    SceneletDef::new(|state, _, args| {
        state.insert(Pause {
            duration: args.number(0).unwrap_or(0.0),
            elapsed: 0.0,
        });
    })
    .update(|state, scene| {
        let delta = scene.scheduler().frame_delta();
        state.get_mut::<Pause>().is_some_and(|pause| {
            pause.elapsed += delta;
            pause.elapsed < pause.duration
        })
    })
}

impl Scene {
    /// Hold this timeline for `seconds` of frame time
    pub fn pause(&self, seconds: f64) -> Result<&Self> {
        self.op(NAME, Args::new().with(seconds))
    }
}
