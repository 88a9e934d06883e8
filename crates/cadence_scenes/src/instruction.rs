//! Instructions and scenelet definitions
//!
//! A scenelet is a named instruction kind: a bundle of callbacks describing one
//! step of a timeline. `start` runs once when the program counter reaches the
//! instruction. If the scenelet has an `update`, the instruction becomes a
//! per-frame task of its own and the timeline waits on it; `finish` runs once
//! that task ends, before the next instruction starts.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::args::Args;
use crate::scene::{Activation, Scene};

/// Called once when the instruction is reached
pub type StartFn = Rc<dyn Fn(&mut OpState, &mut Activation<'_>, &Args)>;

/// Called once per frame while the instruction is active; `false` ends it
pub type UpdateFn = Rc<dyn Fn(&mut OpState, &Scene) -> bool>;

/// Per-frame render or input callback
pub type HookFn = Rc<dyn Fn(&mut OpState, &Scene)>;

/// Called once after the instruction ends, before the next one starts
pub type FinishFn = Rc<dyn Fn(&mut OpState, &mut Activation<'_>)>;

/// Private state of one executing instruction
///
/// Holds a single value of any type, shared by every callback of the
/// instruction. Each activation starts with an empty slot.
#[derive(Default)]
pub struct OpState {
    value: Option<Box<dyn Any>>,
}

impl OpState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing anything already held
    pub fn insert<T: 'static>(&mut self, value: T) {
        self.value = Some(Box::new(value));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.as_ref()?.downcast_ref()
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.as_mut()?.downcast_mut()
    }

    pub fn take<T: 'static>(&mut self) -> Option<T> {
        let value = self.value.take()?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                self.value = Some(value);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// Callback set of an instruction kind
#[derive(Clone)]
pub struct SceneletDef {
    pub(crate) start: StartFn,
    pub(crate) update: Option<UpdateFn>,
    pub(crate) render: Option<HookFn>,
    pub(crate) get_input: Option<HookFn>,
    pub(crate) finish: Option<FinishFn>,
}

impl SceneletDef {
    /// Define a scenelet; without an `update` it is instantaneous
    pub fn new<F>(start: F) -> Self
    where
        F: Fn(&mut OpState, &mut Activation<'_>, &Args) + 'static,
    {
        Self {
            start: Rc::new(start),
            update: None,
            render: None,
            get_input: None,
            finish: None,
        }
    }

    pub fn update<F>(mut self, update: F) -> Self
    where
        F: Fn(&mut OpState, &Scene) -> bool + 'static,
    {
        self.update = Some(Rc::new(update));
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&mut OpState, &Scene) + 'static,
    {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn get_input<F>(mut self, get_input: F) -> Self
    where
        F: Fn(&mut OpState, &Scene) + 'static,
    {
        self.get_input = Some(Rc::new(get_input));
        self
    }

    pub fn finish<F>(mut self, finish: F) -> Self
    where
        F: Fn(&mut OpState, &mut Activation<'_>) + 'static,
    {
        self.finish = Some(Rc::new(finish));
        self
    }

    /// True when the instruction completes within its `start`
    pub fn is_instantaneous(&self) -> bool {
        self.update.is_none()
    }
}

impl fmt::Debug for SceneletDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneletDef")
            .field("update", &self.update.is_some())
            .field("render", &self.render.is_some())
            .field("get_input", &self.get_input.is_some())
            .field("finish", &self.finish.is_some())
            .finish()
    }
}

/// One enqueued step of a timeline; immutable once enqueued
#[derive(Clone, Debug)]
pub struct Instruction {
    pub(crate) def: Rc<SceneletDef>,
    pub(crate) args: Args,
}

impl Instruction {
    pub fn new(def: Rc<SceneletDef>, args: Args) -> Self {
        Self { def, args }
    }

    /// An instruction with no arguments, built around a one-off start callback
    pub fn from_start<F>(start: F) -> Self
    where
        F: Fn(&mut OpState, &mut Activation<'_>, &Args) + 'static,
    {
        Self::new(Rc::new(SceneletDef::new(start)), Args::new())
    }

    pub fn def(&self) -> &SceneletDef {
        &self.def
    }

    pub fn args(&self) -> &Args {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_state_slot() {
        let mut state = OpState::new();
        assert!(state.is_empty());

        state.insert(3u32);
        assert_eq!(state.get::<u32>(), Some(&3));
        assert_eq!(state.get::<i64>(), None);

        *state.get_mut::<u32>().unwrap() += 1;
        assert_eq!(state.take::<String>(), None);
        assert_eq!(state.take::<u32>(), Some(4));
        assert!(state.is_empty());
    }

    #[test]
    fn test_def_builder() {
        let def = SceneletDef::new(|_, _, _| {});
        assert!(def.is_instantaneous());

        let def = def.update(|_, _| false).finish(|_, _| {});
        assert!(!def.is_instantaneous());
        assert!(def.finish.is_some());
        assert!(def.render.is_none());
    }
}
