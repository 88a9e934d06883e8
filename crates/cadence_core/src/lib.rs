//! Cadence Core Runtime
//!
//! A deterministic, single-threaded cooperative scheduler for game loops.
//!
//! - **Task Registry**: create, kill, query and join cooperative tasks
//! - **Frame Driver**: per-frame update, render and input dispatch
//! - **Configuration**: fixed frame clock and dispatch options from TOML
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Entity, Scheduler};
//!
//! struct Blink {
//!     frames_left: u32,
//! }
//!
//! impl Entity for Blink {
//!     fn update(&mut self, _scheduler: &Scheduler) -> bool {
//!         self.frames_left -= 1;
//!         self.frames_left > 0
//!     }
//! }
//!
//! let scheduler = Scheduler::default();
//! let blink = scheduler.create(Blink { frames_left: 3 }, 0);
//!
//! scheduler.join(&[blink]).unwrap();
//! assert!(!scheduler.is_running(blink));
//! assert_eq!(scheduler.frame_count(), 3);
//! ```

pub mod config;
pub mod error;
pub mod scheduler;
pub mod task;

pub use config::{InputMode, SchedulerConfig};
pub use error::{Result, SchedulerError};
pub use scheduler::{PresentCallback, Scheduler};
pub use task::{Entity, HookFn, TaskDesc, TaskId, UpdateFn};
