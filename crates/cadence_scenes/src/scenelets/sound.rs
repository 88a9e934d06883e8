use crate::args::Args;
use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::scene::Scene;
use crate::services::SoundId;

pub(super) const NAME: &str = "play_sound";

pub(super) fn def() -> SceneletDef {
    SceneletDef::new(|state, activation, args| {
        let Some(name) = args.text(0) else {
            tracing::warn!("play_sound: missing sound name");
            return;
        };
        let sound = activation.engine().services().audio.borrow_mut().play(name);
        tracing::debug!(name, sound = sound.0, "sound started");
        state.insert(sound);
    })
    .update(|state, scene| {
        state.get::<SoundId>().is_some_and(|&sound| {
            scene
                .engine()
                .services()
                .audio
                .borrow()
                .is_playing(sound)
        })
    })
}

impl Scene {
    /// Play a sound and hold this timeline until it ends
    pub fn play_sound(&self, name: &str) -> Result<&Self> {
        self.op(NAME, Args::new().with(name))
    }
}
