//! Scheduler error types

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

/// Scheduler-related errors
///
/// All of these represent programmer mistakes caught at the offending call.
/// Nothing here is transient, so nothing is retried.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A task description was registered without an update callback
    #[error("task description has no update callback")]
    MissingUpdate,

    /// A task tried to join on its own id
    #[error("task {0} attempted to join itself")]
    SelfJoin(TaskId),

    /// The join target is suspended further up the dispatch stack and can never advance
    #[error("joining task {0} would deadlock: it is suspended further up the dispatch stack")]
    JoinDeadlock(TaskId),

    /// `join` was called while a render or input callback was executing
    #[error("join called from a render or input callback")]
    JoinOutsideUpdate,

    /// Configuration could not be parsed
    #[error("invalid scheduler configuration: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
