//! Frame dispatch behavior of the cooperative scheduler

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use cadence_core::{
    Entity, InputMode, Scheduler, SchedulerConfig, SchedulerError, TaskDesc, TaskId,
};

/// Records render/input calls under a label
struct Probe {
    label: &'static str,
    frames_left: u32,
    log: Rc<RefCell<Vec<String>>>,
}

impl Probe {
    fn new(label: &'static str, frames_left: u32, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            label,
            frames_left,
            log: Rc::clone(log),
        }
    }
}

impl Entity for Probe {
    fn update(&mut self, _scheduler: &Scheduler) -> bool {
        self.log.borrow_mut().push(format!("update:{}", self.label));
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frames_left > 0
    }

    fn render(&mut self, _scheduler: &Scheduler) {
        self.log.borrow_mut().push(format!("render:{}", self.label));
    }

    fn get_input(&mut self, _scheduler: &Scheduler) {
        self.log.borrow_mut().push(format!("input:{}", self.label));
    }

    fn has_renderer(&self) -> bool {
        true
    }

    fn has_input(&self) -> bool {
        true
    }
}

fn renders(log: &Rc<RefCell<Vec<String>>>) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|entry| entry.starts_with("render:"))
        .cloned()
        .collect()
}

#[test]
fn test_is_running_tracks_kill_and_completion() {
    let scheduler = Scheduler::default();
    let log = Rc::new(RefCell::new(Vec::new()));

    let short = scheduler.create(Probe::new("short", 1, &log), 0);
    let long = scheduler.create(Probe::new("long", 100, &log), 0);
    assert!(scheduler.is_running(short));
    assert!(scheduler.is_running(long));

    scheduler.kill(long);
    assert!(!scheduler.is_running(long));

    scheduler.update_all();
    assert!(!scheduler.is_running(short));
    scheduler.update_all();
    assert!(!scheduler.is_running(short));
    assert!(!scheduler.is_running(long));
}

#[test]
fn test_render_order_by_priority_then_creation() {
    let scheduler = Scheduler::default();
    let log = Rc::new(RefCell::new(Vec::new()));

    scheduler.create(Probe::new("first@3", 10, &log), 3);
    scheduler.create(Probe::new("second@1", 10, &log), 1);
    scheduler.create(Probe::new("third@2", 10, &log), 2);
    scheduler.create(Probe::new("fourth@1", 10, &log), 1);

    scheduler.render_all();
    assert_eq!(
        renders(&log),
        vec![
            "render:second@1",
            "render:fourth@1",
            "render:third@2",
            "render:first@3"
        ]
    );
}

#[test]
fn test_tasks_without_renderer_are_skipped() {
    let scheduler = Scheduler::default();
    let rendered = Rc::new(Cell::new(0));

    scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new().update(|_, _| true),
        )
        .unwrap();
    let counter = Rc::clone(&rendered);
    scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new()
                .update(|_, _| true)
                .render(move |_, _| counter.set(counter.get() + 1)),
        )
        .unwrap();

    scheduler.render_all();
    assert_eq!(rendered.get(), 1);
}

#[test]
fn test_inline_input_only_while_running() {
    let scheduler = Scheduler::default();
    let log = Rc::new(RefCell::new(Vec::new()));

    scheduler.create(Probe::new("a", 2, &log), 0);
    scheduler.update_all();
    scheduler.update_all();

    assert_eq!(
        *log.borrow(),
        vec!["update:a", "input:a", "update:a"],
        "the final frame's input must not be processed"
    );
}

#[test]
fn test_separate_input_pass_in_registration_order() {
    let config = SchedulerConfig::default().with_input_mode(InputMode::Separate);
    let scheduler = Scheduler::new(config);
    let log = Rc::new(RefCell::new(Vec::new()));

    scheduler.create(Probe::new("low", 5, &log), 10);
    scheduler.create(Probe::new("high", 5, &log), -10);

    scheduler.tick();
    assert_eq!(
        *log.borrow(),
        vec![
            "input:low",
            "input:high",
            "update:low",
            "update:high",
            "render:high",
            "render:low"
        ]
    );
}

#[test]
fn test_tasks_created_mid_pass_wait_for_next_pass() {
    let scheduler = Scheduler::default();
    let child_updates = Rc::new(Cell::new(0));

    let counter = Rc::clone(&child_updates);
    scheduler
        .create_ex(
            Rc::new(RefCell::new(false)),
            TaskDesc::new().update(move |spawned: &mut bool, scheduler| {
                if !*spawned {
                    *spawned = true;
                    let counter = Rc::clone(&counter);
                    scheduler
                        .create_ex(
                            Rc::new(RefCell::new(())),
                            TaskDesc::new().update(move |_, _| {
                                counter.set(counter.get() + 1);
                                true
                            }),
                        )
                        .unwrap();
                }
                true
            }),
        )
        .unwrap();

    scheduler.update_all();
    assert_eq!(child_updates.get(), 0);
    scheduler.update_all();
    assert_eq!(child_updates.get(), 1);
}

#[test]
fn test_kill_during_pass_skips_victim() {
    let scheduler = Scheduler::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let victim = Rc::new(Cell::new(TaskId::NONE));

    let target = Rc::clone(&victim);
    scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new().update(move |_, scheduler| {
                scheduler.kill(target.get());
                false
            }),
        )
        .unwrap();
    victim.set(scheduler.create(Probe::new("victim", 10, &log), 0));

    scheduler.update_all();
    assert!(log.borrow().is_empty());
    assert_eq!(scheduler.task_count(), 0);
}

#[test]
fn test_self_id_during_dispatch() {
    let scheduler = Scheduler::default();
    let seen = Rc::new(Cell::new(TaskId::NONE));

    let slot = Rc::clone(&seen);
    let id = scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new().update(move |_, scheduler| {
                slot.set(scheduler.self_id());
                false
            }),
        )
        .unwrap();

    scheduler.update_all();
    assert_eq!(seen.get(), id);
    assert_eq!(scheduler.self_id(), TaskId::NONE);
}

#[test]
fn test_join_finished_task_runs_no_frames() {
    let scheduler = Scheduler::default();
    let presented = Rc::new(Cell::new(0));
    let counter = Rc::clone(&presented);
    scheduler.set_present_callback(move || counter.set(counter.get() + 1));

    let log = Rc::new(RefCell::new(Vec::new()));
    let id = scheduler.create(Probe::new("done", 1, &log), 0);
    scheduler.update_all();
    let frames = scheduler.frame_count();

    scheduler.join(&[id]).unwrap();
    assert_eq!(scheduler.frame_count(), frames);
    assert_eq!(presented.get(), 0);
}

#[test]
fn test_join_drives_render_present_update() {
    let scheduler = Scheduler::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let presented = Rc::new(Cell::new(0));
    let counter = Rc::clone(&presented);
    scheduler.set_present_callback(move || counter.set(counter.get() + 1));

    let a = scheduler.create(Probe::new("a", 2, &log), 0);
    let b = scheduler.create(Probe::new("b", 3, &log), 0);
    scheduler.join(&[a, b]).unwrap();

    assert!(!scheduler.is_running(a));
    assert!(!scheduler.is_running(b));
    assert_eq!(scheduler.frame_count(), 3);
    assert_eq!(presented.get(), 3);
    assert_eq!(log.borrow()[0], "render:a");
}

#[test]
fn test_join_from_update_skips_busy_caller() {
    let scheduler = Scheduler::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let worker = scheduler.create(Probe::new("worker", 3, &log), 0);
    let caller_updates = Rc::new(Cell::new(0));

    let counter = Rc::clone(&caller_updates);
    scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new().update(move |_, scheduler| {
                counter.set(counter.get() + 1);
                scheduler.join(&[worker]).unwrap();
                false
            }),
        )
        .unwrap();

    scheduler.update_all();
    assert!(!scheduler.is_running(worker));
    assert_eq!(caller_updates.get(), 1);
    assert_eq!(scheduler.task_count(), 0);
}

#[test]
fn test_self_join_is_rejected() {
    let scheduler = Scheduler::default();
    let outcome = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&outcome);
    scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new().update(move |_, scheduler| {
                let me = scheduler.self_id();
                *slot.borrow_mut() = Some(scheduler.join(&[me]));
                false
            }),
        )
        .unwrap();

    scheduler.update_all();
    assert!(matches!(
        outcome.borrow_mut().take(),
        Some(Err(SchedulerError::SelfJoin(_)))
    ));
}

#[test]
fn test_join_on_waiting_ancestor_is_rejected() {
    let scheduler = Scheduler::default();
    let outcome = Rc::new(RefCell::new(None));
    let parent = Rc::new(Cell::new(TaskId::NONE));
    let child = Rc::new(Cell::new(TaskId::NONE));

    // Registered first, so it updates first and waits on the child
    let child_id = Rc::clone(&child);
    parent.set(
        scheduler
            .create_ex(
                Rc::new(RefCell::new(())),
                TaskDesc::new().update(move |_, scheduler| {
                    scheduler.join(&[child_id.get()]).unwrap();
                    false
                }),
            )
            .unwrap(),
    );

    let parent_id = Rc::clone(&parent);
    let slot = Rc::clone(&outcome);
    child.set(
        scheduler
            .create_ex(
                Rc::new(RefCell::new(())),
                TaskDesc::new().update(move |_, scheduler| {
                    *slot.borrow_mut() = Some(scheduler.join(&[parent_id.get()]));
                    false
                }),
            )
            .unwrap(),
    );

    scheduler.update_all();
    assert!(matches!(
        outcome.borrow_mut().take(),
        Some(Err(SchedulerError::JoinDeadlock(_)))
    ));
    assert_eq!(scheduler.task_count(), 0);
}

#[test]
fn test_join_from_render_is_rejected() {
    let scheduler = Scheduler::default();
    let outcome = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&outcome);
    scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new()
                .update(|_, _| true)
                .render(move |_, scheduler| {
                    *slot.borrow_mut() = Some(scheduler.join(&[TaskId::NONE]));
                }),
        )
        .unwrap();

    scheduler.render_all();
    assert!(matches!(
        outcome.borrow_mut().take(),
        Some(Err(SchedulerError::JoinOutsideUpdate))
    ));
}

#[test]
fn test_busy_cleared_after_panicking_update() {
    let scheduler = Scheduler::default();
    let should_panic = Rc::new(Cell::new(true));
    let updates = Rc::new(Cell::new(0));

    let trigger = Rc::clone(&should_panic);
    let counter = Rc::clone(&updates);
    let id = scheduler
        .create_ex(
            Rc::new(RefCell::new(())),
            TaskDesc::new().update(move |_, _| {
                counter.set(counter.get() + 1);
                if trigger.get() {
                    panic!("update failed");
                }
                true
            }),
        )
        .unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| scheduler.update_all()));
    assert!(result.is_err());
    assert_eq!(scheduler.self_id(), TaskId::NONE);

    should_panic.set(false);
    scheduler.update_all();
    assert_eq!(updates.get(), 2);
    assert!(scheduler.is_running(id));
}

#[test]
fn test_inline_input_skipped_while_receiver_borrowed_by_join() {
    let scheduler = Scheduler::default();
    let shared = Rc::new(RefCell::new(0u32));
    let joined = Rc::new(RefCell::new(None));

    let timer = scheduler
        .create_ex(
            Rc::new(RefCell::new(0u32)),
            TaskDesc::new().update(|ticks: &mut u32, _| {
                *ticks += 1;
                *ticks < 2
            }),
        )
        .unwrap();

    let outcome = Rc::clone(&joined);
    scheduler
        .create_ex(
            Rc::clone(&shared),
            TaskDesc::new().update(move |_: &mut u32, scheduler| {
                if outcome.borrow().is_none() {
                    *outcome.borrow_mut() = Some(scheduler.join(&[timer]));
                }
                true
            }),
        )
        .unwrap();

    let listener = scheduler
        .create_ex(
            Rc::clone(&shared),
            TaskDesc::new()
                .update(|_: &mut u32, _| true)
                .get_input(|inputs: &mut u32, _| *inputs += 1),
        )
        .unwrap();

    scheduler.update_all();

    assert!(matches!(joined.borrow().as_ref(), Some(Ok(()))));
    assert!(!scheduler.is_running(timer));
    assert!(scheduler.is_running(listener));
    // Only the outer pass reached the listener's input
    assert_eq!(*shared.borrow(), 1);
}
