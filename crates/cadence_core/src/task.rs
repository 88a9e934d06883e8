//! Task identities and callback bundles
//!
//! A task is a resumable unit of per-frame work: an update callback that
//! returns `true` while the task wants to keep running, plus optional render
//! and input callbacks. Tasks are created either from an [`Entity`] value or
//! from a raw [`TaskDesc`] bound to an explicit receiver.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::scheduler::Scheduler;

/// Identity of a registered task
///
/// Ids are assigned in strictly increasing order and never reused for the
/// lifetime of a scheduler. `TaskId::NONE` (0) never names a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// The "no task" sentinel; also what `self_id()` reports outside dispatch
    pub const NONE: TaskId = TaskId(0);

    pub(crate) fn from_raw(raw: u64) -> Self {
        TaskId(raw)
    }

    /// Raw numeric value
    pub fn to_raw(self) -> u64 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An object that can be driven by the scheduler
///
/// `update` is called once per frame until it returns `false`. `render` and
/// `get_input` are only dispatched when `has_renderer` / `has_input` report
/// `true`; these are sampled once, when the task is created.
pub trait Entity: 'static {
    fn update(&mut self, scheduler: &Scheduler) -> bool;

    fn render(&mut self, _scheduler: &Scheduler) {}

    fn get_input(&mut self, _scheduler: &Scheduler) {}

    fn has_renderer(&self) -> bool {
        false
    }

    fn has_input(&self) -> bool {
        false
    }
}

/// Update callback bound to a receiver of type `R`
pub type UpdateFn<R> = Box<dyn FnMut(&mut R, &Scheduler) -> bool>;

/// Render or input callback bound to a receiver of type `R`
pub type HookFn<R> = Box<dyn FnMut(&mut R, &Scheduler)>;

/// Raw task description for [`Scheduler::create_ex`]
///
/// ```ignore
/// let state = Rc::new(RefCell::new(0u32));
/// let id = scheduler.create_ex(
///     state,
///     TaskDesc::new()
///         .update(|frames, _| {
///             *frames += 1;
///             *frames < 10
///         })
///         .priority(5),
/// )?;
/// ```
pub struct TaskDesc<R> {
    pub update: Option<UpdateFn<R>>,
    pub render: Option<HookFn<R>>,
    pub get_input: Option<HookFn<R>>,
    pub priority: i32,
}

impl<R> TaskDesc<R> {
    pub fn new() -> Self {
        Self {
            update: None,
            render: None,
            get_input: None,
            priority: 0,
        }
    }

    pub fn update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut R, &Scheduler) -> bool + 'static,
    {
        self.update = Some(Box::new(f));
        self
    }

    pub fn render<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut R, &Scheduler) + 'static,
    {
        self.render = Some(Box::new(f));
        self
    }

    pub fn get_input<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut R, &Scheduler) + 'static,
    {
        self.get_input = Some(Box::new(f));
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<R> Default for TaskDesc<R> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Type-erased dispatch
// ============================================================================

/// Outcome of dispatching a callback whose receiver may already be borrowed
pub(crate) enum Dispatched<T> {
    Ran(T),
    /// The receiver is borrowed further up the stack (reentrant join)
    Reentrant,
}

/// Type-erased callback bundle stored in the registry
pub(crate) trait Dispatch {
    fn update(&self, scheduler: &Scheduler) -> Dispatched<bool>;
    fn render(&self, scheduler: &Scheduler) -> Dispatched<()>;
    fn input(&self, scheduler: &Scheduler) -> Dispatched<()>;
    fn has_renderer(&self) -> bool;
    fn has_input(&self) -> bool;
}

/// An [`Entity`] owned by the registry
pub(crate) struct EntityTask<E: Entity> {
    entity: RefCell<E>,
    renders: bool,
    handles_input: bool,
}

impl<E: Entity> EntityTask<E> {
    pub(crate) fn new(entity: E) -> Self {
        let renders = entity.has_renderer();
        let handles_input = entity.has_input();
        Self {
            entity: RefCell::new(entity),
            renders,
            handles_input,
        }
    }
}

impl<E: Entity> Dispatch for EntityTask<E> {
    fn update(&self, scheduler: &Scheduler) -> Dispatched<bool> {
        match self.entity.try_borrow_mut() {
            Ok(mut entity) => Dispatched::Ran(entity.update(scheduler)),
            Err(_) => Dispatched::Reentrant,
        }
    }

    fn render(&self, scheduler: &Scheduler) -> Dispatched<()> {
        match self.entity.try_borrow_mut() {
            Ok(mut entity) => Dispatched::Ran(entity.render(scheduler)),
            Err(_) => Dispatched::Reentrant,
        }
    }

    fn input(&self, scheduler: &Scheduler) -> Dispatched<()> {
        match self.entity.try_borrow_mut() {
            Ok(mut entity) => Dispatched::Ran(entity.get_input(scheduler)),
            Err(_) => Dispatched::Reentrant,
        }
    }

    fn has_renderer(&self) -> bool {
        self.renders
    }

    fn has_input(&self) -> bool {
        self.handles_input
    }
}

/// Raw callbacks bound to a shared receiver
pub(crate) struct BoundTask<R> {
    receiver: Rc<RefCell<R>>,
    update: RefCell<UpdateFn<R>>,
    render: Option<RefCell<HookFn<R>>>,
    input: Option<RefCell<HookFn<R>>>,
}

impl<R> BoundTask<R> {
    pub(crate) fn new(
        receiver: Rc<RefCell<R>>,
        update: UpdateFn<R>,
        render: Option<HookFn<R>>,
        input: Option<HookFn<R>>,
    ) -> Self {
        Self {
            receiver,
            update: RefCell::new(update),
            render: render.map(RefCell::new),
            input: input.map(RefCell::new),
        }
    }
}

fn call_hook<R>(
    receiver: &RefCell<R>,
    hook: Option<&RefCell<HookFn<R>>>,
    scheduler: &Scheduler,
) -> Dispatched<()> {
    let Some(hook) = hook else {
        return Dispatched::Ran(());
    };
    match (hook.try_borrow_mut(), receiver.try_borrow_mut()) {
        (Ok(mut hook), Ok(mut receiver)) => Dispatched::Ran(hook(&mut *receiver, scheduler)),
        _ => Dispatched::Reentrant,
    }
}

impl<R> Dispatch for BoundTask<R> {
    fn update(&self, scheduler: &Scheduler) -> Dispatched<bool> {
        match (self.update.try_borrow_mut(), self.receiver.try_borrow_mut()) {
            (Ok(mut update), Ok(mut receiver)) => {
                Dispatched::Ran(update(&mut *receiver, scheduler))
            }
            _ => Dispatched::Reentrant,
        }
    }

    fn render(&self, scheduler: &Scheduler) -> Dispatched<()> {
        call_hook(&self.receiver, self.render.as_ref(), scheduler)
    }

    fn input(&self, scheduler: &Scheduler) -> Dispatched<()> {
        call_hook(&self.receiver, self.input.as_ref(), scheduler)
    }

    fn has_renderer(&self) -> bool {
        self.render.is_some()
    }

    fn has_input(&self) -> bool {
        self.input.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_sentinel() {
        assert!(TaskId::NONE.is_none());
        assert!(!TaskId::from_raw(3).is_none());
        assert_eq!(TaskId::from_raw(3).to_string(), "#3");
    }

    #[test]
    fn test_task_desc_builder() {
        let desc: TaskDesc<u32> = TaskDesc::new()
            .update(|n, _| {
                *n += 1;
                true
            })
            .priority(7);

        assert!(desc.update.is_some());
        assert!(desc.render.is_none());
        assert!(desc.get_input.is_none());
        assert_eq!(desc.priority, 7);
    }
}
