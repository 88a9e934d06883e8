//! Host services used by built-in scenelets
//!
//! Drawing and audio belong to the host. The scene engine only sees these
//! narrow traits; [`RecordingCanvas`] and [`SilentAudio`] stand in for them in
//! headless runs.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_animation::Color;

/// 2D drawing surface
pub trait Canvas {
    /// Screen size in pixels
    fn size(&self) -> (f32, f32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Rendered width of `text` in the default font
    fn text_width(&self, text: &str) -> f32;

    /// Height of one line of the default font
    fn line_height(&self) -> f32;

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color);
}

/// Handle to a sound started by [`Audio::play`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundId(pub u64);

/// Sound playback
pub trait Audio {
    /// Load and start playing a sound
    fn play(&mut self, name: &str) -> SoundId;

    fn is_playing(&self, sound: SoundId) -> bool;
}

/// Services shared by every scene of an engine
#[derive(Clone)]
pub struct Services {
    pub canvas: Rc<RefCell<dyn Canvas>>,
    pub audio: Rc<RefCell<dyn Audio>>,
}

impl Services {
    pub fn new(canvas: Rc<RefCell<dyn Canvas>>, audio: Rc<RefCell<dyn Audio>>) -> Self {
        Self { canvas, audio }
    }

    /// Recording canvas of the given size and silent audio
    pub fn headless(width: f32, height: f32) -> Self {
        Self {
            canvas: Rc::new(RefCell::new(RecordingCanvas::new(width, height))),
            audio: Rc::new(RefCell::new(SilentAudio::default())),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::headless(320.0, 240.0)
    }
}

// ============================================================================
// Recording canvas
// ============================================================================

/// A recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
    },
}

/// Canvas that records draw calls instead of rasterizing them
///
/// Text metrics come from a fixed-width font model.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    width: f32,
    height: f32,
    glyph_width: f32,
    line_height: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            glyph_width: 8.0,
            line_height: 12.0,
            commands: Vec::new(),
        }
    }

    /// Override the fixed-width font model
    pub fn with_font_metrics(mut self, glyph_width: f32, line_height: f32) -> Self {
        self.glyph_width = glyph_width;
        self.line_height = line_height;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_owned(),
            color,
        });
    }
}

// ============================================================================
// Silent audio
// ============================================================================

/// Audio backend where every sound finishes immediately
#[derive(Debug, Default)]
pub struct SilentAudio {
    played: Vec<String>,
}

impl SilentAudio {
    /// Names passed to `play`, in order
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl Audio for SilentAudio {
    fn play(&mut self, name: &str) -> SoundId {
        self.played.push(name.to_owned());
        SoundId(self.played.len() as u64)
    }

    fn is_playing(&self, _sound: SoundId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_canvas() {
        let mut canvas = RecordingCanvas::new(320.0, 240.0);
        canvas.fill_rect(0.0, 0.0, 320.0, 240.0, Color::BLACK);
        canvas.draw_text(4.0, 4.0, "hi", Color::WHITE);

        assert_eq!(canvas.text_width("hi"), 16.0);
        assert_eq!(canvas.commands().len(), 2);
        assert_eq!(canvas.take_commands().len(), 2);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_silent_audio() {
        let mut audio = SilentAudio::default();
        let sound = audio.play("chime.ogg");
        assert!(!audio.is_playing(sound));
        assert_eq!(audio.played(), ["chime.ogg"]);
    }
}
