//! Cooperative task scheduler
//!
//! Owns every live task and drives them once per frame:
//! - **Update pass**: over a snapshot of valid, non-busy tasks, in registration order
//! - **Render pass**: over valid tasks with a renderer, by ascending priority then id
//! - **Input pass**: inline after each surviving update, or as a separate pass
//!
//! There is no real concurrency. A task's callbacks run synchronously from the
//! host's frame loop and must return promptly; multi-frame work is expressed by
//! returning `true` from `update` until done. The one blocking operation is
//! [`Scheduler::join`], which re-enters the frame cycle on the caller's stack.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::config::{InputMode, SchedulerConfig};
use crate::error::{Result, SchedulerError};
use crate::task::{BoundTask, Dispatch, Dispatched, Entity, EntityTask, TaskDesc, TaskId};

/// Callback that presents a finished frame (e.g. swaps buffers)
pub type PresentCallback = Box<dyn FnMut()>;

/// Which kind of callback is currently executing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Update,
    Render,
    Input,
}

/// Registry record for a live task
struct TaskSlot {
    valid: Cell<bool>,
    busy: Cell<bool>,
    priority: Cell<i32>,
    hooks: Box<dyn Dispatch>,
}

struct SchedulerInner {
    config: SchedulerConfig,
    /// Live tasks in registration order
    tasks: RefCell<IndexMap<TaskId, Rc<TaskSlot>>>,
    next_id: Cell<u64>,
    current: Cell<TaskId>,
    phase: Cell<Phase>,
    frame_count: Cell<u64>,
    present: RefCell<Option<PresentCallback>>,
}

/// Handle to a cooperative scheduler
///
/// Cloning is cheap and every clone refers to the same registry. Create one per
/// game session; the handle is passed into every task callback.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

/// Restores dispatch bookkeeping when a callback returns or unwinds
struct DispatchGuard<'a> {
    scheduler: &'a Scheduler,
    slot: &'a TaskSlot,
    marks_busy: bool,
    previous_self: TaskId,
    previous_phase: Phase,
}

impl<'a> DispatchGuard<'a> {
    fn enter(
        scheduler: &'a Scheduler,
        id: TaskId,
        slot: &'a TaskSlot,
        phase: Phase,
        marks_busy: bool,
    ) -> Self {
        let inner = &scheduler.inner;
        if marks_busy {
            slot.busy.set(true);
        }
        Self {
            scheduler,
            slot,
            marks_busy,
            previous_self: inner.current.replace(id),
            previous_phase: inner.phase.replace(phase),
        }
    }

    fn set_phase(&self, phase: Phase) {
        self.scheduler.inner.phase.set(phase);
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        let inner = &self.scheduler.inner;
        inner.current.set(self.previous_self);
        inner.phase.set(self.previous_phase);
        if self.marks_busy {
            self.slot.busy.set(false);
        }
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                config,
                tasks: RefCell::new(IndexMap::new()),
                next_id: Cell::new(1),
                current: Cell::new(TaskId::NONE),
                phase: Cell::new(Phase::Idle),
                frame_count: Cell::new(0),
                present: RefCell::new(None),
            }),
        }
    }

    /// Set the callback that ends a frame
    ///
    /// Called by [`tick`](Self::tick) and between the render and update passes
    /// of every frame driven by [`join`](Self::join).
    pub fn set_present_callback<F>(&self, callback: F)
    where
        F: FnMut() + 'static,
    {
        *self.inner.present.borrow_mut() = Some(Box::new(callback));
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Seconds advanced by one frame of the fixed frame clock
    pub fn frame_delta(&self) -> f64 {
        self.inner.config.frame_delta()
    }

    /// Number of completed update passes
    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count.get()
    }

    /// Number of live tasks
    pub fn task_count(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    // =========================================================================
    // Task Registry
    // =========================================================================

    /// Register an entity as a task
    ///
    /// `entity.update()` is called once per frame until it returns `false`.
    /// Higher `priority` renders later in the frame.
    pub fn create<E: Entity>(&self, entity: E, priority: i32) -> TaskId {
        self.register(Box::new(EntityTask::new(entity)), priority)
    }

    /// Register raw callbacks bound to an explicit receiver
    ///
    /// Fails with [`SchedulerError::MissingUpdate`] when the description has no
    /// update callback.
    pub fn create_ex<R: 'static>(
        &self,
        receiver: Rc<RefCell<R>>,
        desc: TaskDesc<R>,
    ) -> Result<TaskId> {
        let TaskDesc {
            update,
            render,
            get_input,
            priority,
        } = desc;
        let update = update.ok_or(SchedulerError::MissingUpdate)?;
        let hooks = BoundTask::new(receiver, update, render, get_input);
        Ok(self.register(Box::new(hooks), priority))
    }

    fn register(&self, hooks: Box<dyn Dispatch>, priority: i32) -> TaskId {
        let inner = &self.inner;
        let id = TaskId::from_raw(inner.next_id.get());
        inner.next_id.set(id.to_raw() + 1);

        let slot = Rc::new(TaskSlot {
            valid: Cell::new(true),
            busy: Cell::new(false),
            priority: Cell::new(priority),
            hooks,
        });
        inner.tasks.borrow_mut().insert(id, slot);

        tracing::debug!(task = %id, priority, "task created");
        id
    }

    /// Check whether a task is registered; `TaskId::NONE` is never running
    pub fn is_running(&self, id: TaskId) -> bool {
        if id.is_none() {
            return false;
        }
        self.inner
            .tasks
            .borrow()
            .get(&id)
            .is_some_and(|slot| slot.valid.get())
    }

    /// Forcibly terminate a task
    ///
    /// Removal is immediate; a frame pass in progress skips the task when it
    /// reaches it. Unknown ids are ignored. No cleanup callbacks run.
    pub fn kill(&self, id: TaskId) {
        let removed = self.inner.tasks.borrow_mut().shift_remove(&id);
        if let Some(slot) = removed {
            slot.valid.set(false);
            tracing::debug!(task = %id, "task killed");
        }
    }

    /// Id of the task whose callback is currently executing, or `TaskId::NONE`
    pub fn self_id(&self) -> TaskId {
        self.inner.current.get()
    }

    pub fn priority(&self, id: TaskId) -> Option<i32> {
        self.inner
            .tasks
            .borrow()
            .get(&id)
            .map(|slot| slot.priority.get())
    }

    /// Change a task's render priority; no-op for unknown ids
    pub fn set_priority(&self, id: TaskId, priority: i32) {
        if let Some(slot) = self.inner.tasks.borrow().get(&id) {
            slot.priority.set(priority);
        }
    }

    /// Block the caller until every task in `ids` has ended
    ///
    /// Runs full frame cycles (render, present, update) on the caller's stack
    /// until none of the ids is running. Returns immediately, without running
    /// a frame, when they have all already ended.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::JoinOutsideUpdate`] from a render or input callback
    /// - [`SchedulerError::SelfJoin`] when the caller's own id is in `ids`
    /// - [`SchedulerError::JoinDeadlock`] when a target is suspended further up
    ///   the dispatch stack
    pub fn join(&self, ids: &[TaskId]) -> Result<()> {
        match self.inner.phase.get() {
            Phase::Render | Phase::Input => return Err(SchedulerError::JoinOutsideUpdate),
            Phase::Idle | Phase::Update => {}
        }

        let me = self.self_id();
        for &id in ids {
            if !me.is_none() && id == me {
                return Err(SchedulerError::SelfJoin(id));
            }
            if self.slot(id).is_some_and(|slot| slot.busy.get()) {
                return Err(SchedulerError::JoinDeadlock(id));
            }
        }

        if !ids.iter().any(|&id| self.is_running(id)) {
            return Ok(());
        }

        tracing::debug!(caller = %me, targets = ?ids, "join started");
        let mut frames = 0u64;
        while ids.iter().any(|&id| self.is_running(id)) {
            self.render_all();
            self.present();
            self.update_all();
            frames += 1;
        }
        tracing::debug!(caller = %me, frames, "join finished");
        Ok(())
    }

    fn slot(&self, id: TaskId) -> Option<Rc<TaskSlot>> {
        self.inner.tasks.borrow().get(&id).cloned()
    }

    /// Copy of the live tasks, in registration order
    fn snapshot(&self) -> SmallVec<[(TaskId, Rc<TaskSlot>); 16]> {
        self.inner
            .tasks
            .borrow()
            .iter()
            .map(|(&id, slot)| (id, Rc::clone(slot)))
            .collect()
    }

    // =========================================================================
    // Frame Driver
    // =========================================================================

    /// Run one host frame: input (when separate), update, render, present
    pub fn tick(&self) {
        if self.inner.config.input_mode == InputMode::Separate {
            self.dispatch_input();
        }
        self.update_all();
        self.render_all();
        self.present();
    }

    /// Input pass over tasks with an input handler, in registration order
    ///
    /// Only meaningful in [`InputMode::Separate`]; in inline mode input runs
    /// from the update pass and this is a no-op.
    pub fn dispatch_input(&self) {
        if self.inner.config.input_mode != InputMode::Separate {
            return;
        }
        for (id, slot) in self.snapshot() {
            if !slot.valid.get() || slot.busy.get() || !slot.hooks.has_input() {
                continue;
            }
            let _guard = DispatchGuard::enter(self, id, &slot, Phase::Input, true);
            if let Dispatched::Reentrant = slot.hooks.input(self) {
                tracing::trace!(task = %id, "input skipped: receiver in use");
            }
        }
    }

    /// Update pass
    ///
    /// Tasks whose update returns `false` are removed once the pass completes.
    /// Tasks created during the pass first update on the next pass.
    pub fn update_all(&self) {
        let inline_input = self.inner.config.input_mode == InputMode::Inline;
        let mut ending: SmallVec<[TaskId; 8]> = SmallVec::new();

        for (id, slot) in self.snapshot() {
            // Re-checked here: earlier updates in this pass may kill or suspend it
            if !slot.valid.get() || slot.busy.get() {
                continue;
            }

            let running = {
                let guard = DispatchGuard::enter(self, id, &slot, Phase::Update, true);
                let running = match slot.hooks.update(self) {
                    Dispatched::Ran(running) => running,
                    Dispatched::Reentrant => {
                        tracing::warn!(task = %id, "update skipped: receiver in use");
                        true
                    }
                };
                if running && inline_input && slot.hooks.has_input() {
                    guard.set_phase(Phase::Input);
                    if let Dispatched::Reentrant = slot.hooks.input(self) {
                        tracing::trace!(task = %id, "input skipped: receiver in use");
                    }
                }
                running
            };

            if !running {
                ending.push(id);
            }
        }

        for id in ending {
            self.kill(id);
        }
        let inner = &self.inner;
        inner.frame_count.set(inner.frame_count.get() + 1);
    }

    /// Render pass, lowest priority first, ties in creation order
    pub fn render_all(&self) {
        let mut order: SmallVec<[(TaskId, Rc<TaskSlot>); 16]> = self
            .snapshot()
            .into_iter()
            .filter(|(_, slot)| slot.hooks.has_renderer())
            .collect();
        order.sort_by_key(|(id, slot)| (slot.priority.get(), *id));

        for (id, slot) in order {
            if !slot.valid.get() {
                continue;
            }
            let _guard = DispatchGuard::enter(self, id, &slot, Phase::Render, false);
            if let Dispatched::Reentrant = slot.hooks.render(self) {
                tracing::trace!(task = %id, "render skipped: receiver in use");
            }
        }
    }

    fn present(&self) {
        match self.inner.present.try_borrow_mut() {
            Ok(mut present) => {
                if let Some(present) = present.as_mut() {
                    present();
                }
            }
            Err(_) => tracing::warn!("present callback re-entered; frame not presented"),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
