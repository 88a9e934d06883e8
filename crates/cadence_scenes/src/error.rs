//! Scene definition errors

use cadence_core::SchedulerError;
use thiserror::Error;

/// Errors raised synchronously to the scene author
///
/// These are authoring mistakes; they surface at the offending builder call
/// so they are caught before playback starts.
#[derive(Error, Debug)]
pub enum SceneError {
    /// `run` was called with control blocks still open
    #[error("unclosed block in scene definition ({open} still open)")]
    UnclosedBlock { open: usize },

    /// `end` was called with no open block
    #[error("mismatched end() in scene definition")]
    MismatchedEnd,

    /// A scenelet with this name is already registered
    #[error("scenelet `{0}` is already registered")]
    DuplicateScenelet(String),

    /// No scenelet with this name is registered
    #[error("unknown scenelet `{0}`")]
    UnknownScenelet(String),

    /// The scene definition was modified during playback
    #[error("cannot modify scene definition during playback")]
    ModifiedWhileRunning,

    /// The scheduler rejected an operation
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
