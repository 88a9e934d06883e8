//! Cadence Scenes
//!
//! Declarative timelines for cutscenes and scripted sequences, executed by the
//! cooperative scheduler in `cadence_core`.
//!
//! # Features
//!
//! - **Sequential timelines**: instructions run one after another, one step per frame
//! - **Control blocks**: `do_if`, `do_while` and `fork` compile to jumps patched at `end`
//! - **Resynchronization**: `resync` waits for forks, and a timeline never ends before its forks
//! - **Extensible**: new instruction kinds are registered by name on the [`SceneEngine`]
//! - **Built-ins**: host calls, screen fades, pauses, sounds, marquees and property tweens
//!
//! # Example
//!
//! ```ignore
//! use cadence_scenes::{SceneEngine, Services};
//!
//! let engine = SceneEngine::new(scheduler.clone(), Services::headless(320.0, 240.0))?;
//! engine
//!     .scene()
//!     .fade_to(Color::BLACK, 0.5)?
//!     .marquee("Stage 2", Color::BLACK, Color::WHITE)?
//!     .fade_to(Color::TRANSPARENT, 0.5)?
//!     .run(true)?;
//! ```

pub mod args;
pub mod engine;
pub mod error;
pub mod instruction;
pub mod registry;
pub mod scene;
pub mod scenelets;
pub mod services;

pub use args::{Arg, Args};
pub use engine::SceneEngine;
pub use error::{Result, SceneError};
pub use instruction::{FinishFn, HookFn, Instruction, OpState, SceneletDef, StartFn, UpdateFn};
pub use registry::SceneletRegistry;
pub use scene::{Activation, Scene};
pub use scenelets::Banner;
pub use services::{Audio, Canvas, DrawCommand, RecordingCanvas, Services, SilentAudio, SoundId};
