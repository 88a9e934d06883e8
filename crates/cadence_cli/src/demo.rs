//! Demo cutscene
//!
//! A title card: fade in from black, slide a sprite in a fork while a marquee
//! plays, wait for both, then fade back out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use cadence_animation::{Color, Easing, FieldMap};
use cadence_core::{Scheduler, SchedulerConfig};
use cadence_scenes::{DrawCommand, RecordingCanvas, SceneEngine, Services, SilentAudio};

pub struct Report {
    pub finished: bool,
    pub frames: u64,
    pub seconds: f64,
    pub rects: usize,
    pub texts: usize,
    pub sounds: Vec<String>,
}

pub fn play(config: SchedulerConfig, max_frames: u64) -> Result<Report> {
    let scheduler = Scheduler::new(config);
    let canvas = Rc::new(RefCell::new(RecordingCanvas::new(320.0, 240.0)));
    let audio = Rc::new(RefCell::new(SilentAudio::default()));
    let engine = SceneEngine::new(
        scheduler.clone(),
        Services::new(canvas.clone(), audio.clone()),
    )?;

    let rects = Rc::new(Cell::new(0usize));
    let texts = Rc::new(Cell::new(0usize));
    {
        let canvas = Rc::clone(&canvas);
        let rects = Rc::clone(&rects);
        let texts = Rc::clone(&texts);
        scheduler.set_present_callback(move || {
            for command in canvas.borrow_mut().take_commands() {
                match command {
                    DrawCommand::FillRect { .. } => rects.set(rects.get() + 1),
                    DrawCommand::Text { .. } => texts.set(texts.get() + 1),
                }
            }
        });
    }

    let sprite = Rc::new(RefCell::new(FieldMap::new().with("x", -32.0).with("y", 180.0)));
    engine.set_screen_mask(Color::BLACK);

    let scene = engine.scene();
    scene
        .fade_to(Color::TRANSPARENT, 0.5)?
        .play_sound("title.ogg")?
        .fork()?
        .tween(sprite.clone(), 1.5, Easing::OutBack, FieldMap::new().with("x", 144.0))?
        .pause(0.5)?
        .tween(sprite.clone(), 0.5, Easing::InQuad, FieldMap::new().with("y", 160.0))?
        .end()?
        .marquee("Cadence", Color::rgba(0.1, 0.1, 0.3, 1.0), Color::WHITE)?
        .resync()?
        .fade_to(Color::BLACK, 0.5)?
        .run(false)?;

    let start = scheduler.frame_count();
    while scene.is_running() && scheduler.frame_count() - start < max_frames {
        scheduler.tick();
    }

    let frames = scheduler.frame_count() - start;
    let sounds = audio.borrow().played().to_vec();
    Ok(Report {
        finished: !scene.is_running(),
        frames,
        seconds: frames as f64 * scheduler.frame_delta(),
        rects: rects.get(),
        texts: texts.get(),
        sounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_finishes() {
        let report = play(SchedulerConfig::default().with_frame_rate(30), 10_000).unwrap();
        assert!(report.finished);
        assert_eq!(report.sounds, ["title.ogg"]);
        assert!(report.rects > 0);
        assert!(report.texts > 0);
        assert!(report.seconds > 3.0);
    }
}
