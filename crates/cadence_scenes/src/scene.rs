//! Scene timelines
//!
//! A [`Scene`] is built like a small program: instructions are appended in
//! order, and control blocks (`do_if`, `do_while`, `fork`) are compiled into
//! ordinary instructions whose `start` moves the program counter. Jump targets
//! are back-patched when the matching `end` closes the block.
//!
//! ```ignore
//! let scene = engine.scene();
//! scene
//!     .fade_to(Color::BLACK, 0.5)?
//!     .fork()?
//!         .tween(hero.clone(), 1.0, Easing::OutQuad, FieldMap::new().with("x", 160.0))?
//!     .end()?
//!     .marquee("Chapter 1", Color::BLACK, Color::WHITE)?
//!     .resync()?
//!     .fade_to(Color::TRANSPARENT, 0.5)?
//!     .run(true)?;
//! ```
//!
//! Running a scene registers one task per timeline (the main sequence and every
//! fork activation). Each frame that task advances its program by exactly one
//! instruction, or waits while the current instruction's own task runs.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::rc::Rc;

use cadence_core::{Scheduler, TaskDesc, TaskId};

use crate::args::Args;
use crate::engine::SceneEngine;
use crate::error::{Result, SceneError};
use crate::instruction::{Instruction, OpState, SceneletDef, UpdateFn};

type InstructionList = Rc<[Rc<Instruction>]>;

/// An open control block awaiting its `end`
enum Block {
    Branch { exit: Rc<Cell<usize>> },
    Loop { start: usize, exit: Rc<Cell<usize>> },
    Fork,
}

/// Definition-time state
#[derive(Default)]
struct SceneDef {
    /// Instructions of the block currently being filled
    queue: Vec<Rc<Instruction>>,
    /// Outer queues suspended by open forks
    forked_queues: Vec<Vec<Rc<Instruction>>>,
    open_blocks: Vec<Block>,
    main_task: TaskId,
    /// Every task spawned by the current playback
    tasks: Vec<TaskId>,
}

struct SceneInner {
    engine: SceneEngine,
    def: RefCell<SceneDef>,
}

/// A scene definition and its playback handle
///
/// Cheap to clone; clones refer to the same scene.
#[derive(Clone)]
pub struct Scene {
    inner: Rc<SceneInner>,
}

/// The instruction currently holding the program counter
struct ActiveOp {
    instruction: Rc<Instruction>,
    state: Rc<RefCell<OpState>>,
    task: TaskId,
}

/// Execution state of one running timeline
struct Program {
    instructions: InstructionList,
    pc: usize,
    forks: Vec<TaskId>,
    active: Option<ActiveOp>,
}

impl Program {
    fn new(instructions: InstructionList) -> Self {
        Self {
            instructions,
            pc: 0,
            forks: Vec::new(),
            active: None,
        }
    }
}

/// Control handle passed to `start` and `finish` callbacks
///
/// Gives the executing instruction direct access to its timeline's program
/// counter and fork list.
pub struct Activation<'a> {
    scene: &'a Scene,
    program: &'a mut Program,
}

impl<'a> Activation<'a> {
    fn new(scene: &'a Scene, program: &'a mut Program) -> Self {
        Self { scene, program }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn engine(&self) -> &SceneEngine {
        self.scene.engine()
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.scene.scheduler()
    }

    /// Index of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.program.pc
    }

    /// Jump: the instruction at `address` executes next
    pub fn goto(&mut self, address: usize) {
        tracing::trace!(from = self.program.pc, to = address, "jump");
        self.program.pc = address;
    }

    /// Number of instructions in this timeline
    pub fn instruction_count(&self) -> usize {
        self.program.instructions.len()
    }

    /// Forks spawned so far by this timeline
    pub fn forks(&self) -> &[TaskId] {
        &self.program.forks
    }

    /// Record a spawned fork, dropping forks that have already ended
    pub(crate) fn record_fork(&mut self, id: TaskId) {
        let scheduler = self.scene.scheduler();
        self.program.forks.retain(|&fork| scheduler.is_running(fork));
        self.program.forks.push(id);
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Scene");
        match self.inner.def.try_borrow() {
            Ok(def) => out
                .field("instructions", &def.queue.len())
                .field("open_blocks", &def.open_blocks.len())
                .field("main_task", &def.main_task),
            Err(_) => out.field("definition", &"<borrowed>"),
        };
        out.finish()
    }
}

impl Scene {
    pub fn new(engine: SceneEngine) -> Self {
        Self {
            inner: Rc::new(SceneInner {
                engine,
                def: RefCell::new(SceneDef::default()),
            }),
        }
    }

    pub fn engine(&self) -> &SceneEngine {
        &self.inner.engine
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.inner.engine.scheduler()
    }

    /// Number of instructions in the block currently being defined
    pub fn len(&self) -> usize {
        self.inner.def.borrow().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the main timeline is still playing
    pub fn is_running(&self) -> bool {
        let main = self.inner.def.borrow().main_task;
        self.scheduler().is_running(main)
    }

    // =========================================================================
    // Builder
    // =========================================================================

    fn ensure_editable(&self) -> Result<()> {
        if self.is_running() {
            return Err(SceneError::ModifiedWhileRunning);
        }
        Ok(())
    }

    /// Append an already-built instruction
    pub fn enqueue(&self, instruction: Instruction) -> Result<&Self> {
        self.ensure_editable()?;
        self.inner
            .def
            .borrow_mut()
            .queue
            .push(Rc::new(instruction));
        Ok(self)
    }

    /// Append an instruction of a registered kind
    pub fn op(&self, name: &str, args: Args) -> Result<&Self> {
        let def = self
            .engine()
            .scenelet(name)
            .ok_or_else(|| SceneError::UnknownScenelet(name.to_owned()))?;
        self.enqueue(Instruction::new(def, args))
    }

    /// Execute the following block only if `predicate` holds when reached
    pub fn do_if<P>(&self, predicate: P) -> Result<&Self>
    where
        P: Fn(&Scene) -> bool + 'static,
    {
        let exit = Rc::new(Cell::new(0));
        let target = Rc::clone(&exit);
        self.enqueue(Instruction::from_start(move |_, activation, _| {
            if !predicate(activation.scene()) {
                activation.goto(target.get());
            }
        }))?;
        self.inner
            .def
            .borrow_mut()
            .open_blocks
            .push(Block::Branch { exit });
        Ok(self)
    }

    /// Repeat the following block for as long as `predicate` holds
    pub fn do_while<P>(&self, predicate: P) -> Result<&Self>
    where
        P: Fn(&Scene) -> bool + 'static,
    {
        let start = self.len();
        let exit = Rc::new(Cell::new(0));
        let target = Rc::clone(&exit);
        self.enqueue(Instruction::from_start(move |_, activation, _| {
            if !predicate(activation.scene()) {
                activation.goto(target.get());
            }
        }))?;
        self.inner
            .def
            .borrow_mut()
            .open_blocks
            .push(Block::Loop { start, exit });
        Ok(self)
    }

    /// Run the following block as an independent timeline alongside this one
    pub fn fork(&self) -> Result<&Self> {
        self.ensure_editable()?;
        let mut def = self.inner.def.borrow_mut();
        let outer = mem::take(&mut def.queue);
        def.forked_queues.push(outer);
        def.open_blocks.push(Block::Fork);
        Ok(self)
    }

    /// Close the most recently opened block
    pub fn end(&self) -> Result<&Self> {
        self.ensure_editable()?;
        let mut def = self.inner.def.borrow_mut();
        let block = def.open_blocks.pop().ok_or(SceneError::MismatchedEnd)?;

        match block {
            Block::Branch { exit } => {
                exit.set(def.queue.len());
            }
            Block::Loop { start, exit } => {
                def.queue.push(Rc::new(Instruction::from_start(
                    move |_, activation, _| activation.goto(start),
                )));
                exit.set(def.queue.len());
            }
            Block::Fork => {
                let outer = def.forked_queues.pop().unwrap_or_default();
                let body: InstructionList = mem::replace(&mut def.queue, outer).into();
                def.queue
                    .push(Rc::new(Instruction::from_start(move |_, activation, _| {
                        let scene = activation.scene().clone();
                        match scene.spawn_timeline(Rc::clone(&body)) {
                            Ok(id) => {
                                tracing::trace!(fork = %id, "fork spawned");
                                activation.record_fork(id);
                            }
                            Err(err) => tracing::error!(%err, "failed to spawn fork"),
                        }
                    })));
            }
        }
        Ok(self)
    }

    /// Suspend this timeline until every fork it has spawned so far has ended
    pub fn resync(&self) -> Result<&Self> {
        let def = SceneletDef::new(|state, activation, _| {
            state.insert(activation.forks().to_vec());
        })
        .update(|state, scene| {
            state.get::<Vec<TaskId>>().is_some_and(|forks| {
                forks
                    .iter()
                    .any(|&id| scene.scheduler().is_running(id))
            })
        });
        self.enqueue(Instruction::new(Rc::new(def), Args::new()))
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Start playback from the beginning
    ///
    /// No-op if the scene is already playing. With `wait_until_done` the call
    /// blocks, driving frames, until the main timeline ends.
    pub fn run(&self, wait_until_done: bool) -> Result<&Self> {
        let instructions: InstructionList = {
            let def = self.inner.def.borrow();
            if !def.open_blocks.is_empty() {
                return Err(SceneError::UnclosedBlock {
                    open: def.open_blocks.len(),
                });
            }
            def.queue.iter().cloned().collect()
        };
        if self.is_running() {
            return Ok(self);
        }

        let main = self.spawn_timeline(instructions)?;
        self.inner.def.borrow_mut().main_task = main;
        tracing::debug!(task = %main, instructions = self.len(), "scene started");

        if wait_until_done {
            self.scheduler().join(&[main])?;
        }
        Ok(self)
    }

    /// Halt playback immediately
    ///
    /// Kills the main timeline, every fork and every instruction task. Pending
    /// `finish` callbacks are not run.
    pub fn stop(&self) {
        let tasks = mem::take(&mut self.inner.def.borrow_mut().tasks);
        if tasks.is_empty() {
            return;
        }
        tracing::debug!(tasks = tasks.len(), "scene stopped");
        for id in tasks {
            self.scheduler().kill(id);
        }
    }

    /// Stop, then run again from the beginning
    pub fn restart(&self) -> Result<&Self> {
        self.stop();
        self.run(false)
    }

    // =========================================================================
    // Interpreter
    // =========================================================================

    fn track(&self, id: TaskId) {
        self.inner.def.borrow_mut().tasks.push(id);
    }

    fn forget(&self, id: TaskId) {
        self.inner.def.borrow_mut().tasks.retain(|&task| task != id);
    }

    fn spawn_timeline(&self, instructions: InstructionList) -> Result<TaskId> {
        let program = Rc::new(RefCell::new(Program::new(instructions)));
        let scene = self.clone();
        let id = self.scheduler().create_ex(
            program,
            TaskDesc::new()
                .update(move |program: &mut Program, _| scene.advance(program))
                .priority(self.scheduler().config().scene_priority),
        )?;
        self.track(id);
        Ok(id)
    }

    fn spawn_instruction(
        &self,
        instruction: &Instruction,
        state: &Rc<RefCell<OpState>>,
        update: UpdateFn,
    ) -> Result<TaskId> {
        let def = instruction.def();
        let scene = self.clone();
        let mut desc = TaskDesc::new()
            .update(move |state: &mut OpState, _| update(state, &scene))
            .priority(self.scheduler().config().scene_priority);
        if let Some(render) = def.render.clone() {
            let scene = self.clone();
            desc = desc.render(move |state: &mut OpState, _| render(state, &scene));
        }
        if let Some(get_input) = def.get_input.clone() {
            let scene = self.clone();
            desc = desc.get_input(move |state: &mut OpState, _| get_input(state, &scene));
        }

        let id = self.scheduler().create_ex(Rc::clone(state), desc)?;
        self.track(id);
        Ok(id)
    }

    fn finish_instruction(
        &self,
        program: &mut Program,
        instruction: &Instruction,
        state: &mut OpState,
    ) {
        if let Some(finish) = instruction.def.finish.clone() {
            finish(state, &mut Activation::new(self, program));
        }
    }

    /// One interpreter step; the update callback of every timeline task
    fn advance(&self, program: &mut Program) -> bool {
        if let Some(active) = program.active.take() {
            if self.scheduler().is_running(active.task) {
                program.active = Some(active);
                return true;
            }
            self.forget(active.task);
            let mut state = active.state.borrow_mut();
            self.finish_instruction(program, &active.instruction, &mut state);
        }

        if program.pc < program.instructions.len() {
            let instruction = Rc::clone(&program.instructions[program.pc]);
            program.pc += 1;
            tracing::trace!(pc = program.pc - 1, "instruction start");

            let state = Rc::new(RefCell::new(OpState::new()));
            {
                let start = Rc::clone(&instruction.def.start);
                let mut op_state = state.borrow_mut();
                start(
                    &mut *op_state,
                    &mut Activation::new(self, program),
                    &instruction.args,
                );
            }

            // `start` may have stopped this scene
            let scheduler = self.scheduler();
            if !scheduler.is_running(scheduler.self_id()) {
                return false;
            }

            match instruction.def.update.clone() {
                Some(update) => match self.spawn_instruction(&instruction, &state, update) {
                    Ok(task) => {
                        program.active = Some(ActiveOp {
                            instruction,
                            state,
                            task,
                        });
                        return true;
                    }
                    Err(err) => tracing::error!(%err, "failed to spawn instruction task"),
                },
                None => {
                    let mut op_state = state.borrow_mut();
                    self.finish_instruction(program, &instruction, &mut op_state);
                }
            }

            if program.pc < program.instructions.len() {
                return true;
            }
        }

        // Implicit resync: the timeline ends only once its forks have ended
        let scheduler = self.scheduler();
        if program.forks.iter().any(|&id| scheduler.is_running(id)) {
            return true;
        }
        self.forget(scheduler.self_id());
        false
    }
}
