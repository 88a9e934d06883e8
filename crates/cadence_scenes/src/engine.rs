//! Scene engine
//!
//! One engine per game session. It owns the scenelet registry, the host
//! services, and the screen mask that fade instructions animate. The mask is
//! drawn by a long-lived task at the configured scene priority.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cadence_animation::Color;
use cadence_core::{Scheduler, TaskDesc, TaskId};

use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::registry::SceneletRegistry;
use crate::scene::Scene;
use crate::scenelets;
use crate::services::Services;

struct EngineInner {
    scheduler: Scheduler,
    registry: RefCell<SceneletRegistry>,
    services: Services,
    screen_mask: Rc<RefCell<Color>>,
    mask_task: Cell<TaskId>,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.scheduler.kill(self.mask_task.get());
    }
}

/// Handle to a scene engine; clones share the same registry and services
#[derive(Clone)]
pub struct SceneEngine {
    inner: Rc<EngineInner>,
}

impl SceneEngine {
    /// Create an engine with the built-in scenelets registered
    pub fn new(scheduler: Scheduler, services: Services) -> Result<Self> {
        let engine = Self {
            inner: Rc::new(EngineInner {
                scheduler,
                registry: RefCell::new(SceneletRegistry::new()),
                services,
                screen_mask: Rc::new(RefCell::new(Color::TRANSPARENT)),
                mask_task: Cell::new(TaskId::NONE),
            }),
        };
        scenelets::register_builtins(&engine)?;
        engine.start_mask_task()?;
        Ok(engine)
    }

    fn start_mask_task(&self) -> Result<()> {
        let inner = &self.inner;
        let canvas = Rc::clone(&inner.services.canvas);
        let priority = inner.scheduler.config().scene_priority;

        let id = inner.scheduler.create_ex(
            Rc::clone(&inner.screen_mask),
            TaskDesc::new()
                .update(|_: &mut Color, _| true)
                .render(move |mask: &mut Color, _| {
                    if mask.a <= 0.0 {
                        return;
                    }
                    let mut canvas = canvas.borrow_mut();
                    let (width, height) = canvas.size();
                    canvas.fill_rect(0.0, 0.0, width, height, *mask);
                })
                .priority(priority),
        )?;
        inner.mask_task.set(id);
        Ok(())
    }

    /// Register a new instruction kind
    ///
    /// Fails with [`SceneError::DuplicateScenelet`](crate::SceneError::DuplicateScenelet)
    /// if the name is taken.
    pub fn register(&self, name: &str, def: SceneletDef) -> Result<()> {
        self.inner.registry.borrow_mut().register(name, def)
    }

    pub fn scenelet(&self, name: &str) -> Option<Rc<SceneletDef>> {
        self.inner.registry.borrow().get(name)
    }

    pub fn has_scenelet(&self, name: &str) -> bool {
        self.inner.registry.borrow().contains(name)
    }

    pub fn scenelet_names(&self) -> Vec<String> {
        self.inner.registry.borrow().names()
    }

    /// Start a new, empty scene definition
    pub fn scene(&self) -> Scene {
        Scene::new(self.clone())
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    pub fn services(&self) -> &Services {
        &self.inner.services
    }

    /// Current screen mask color
    pub fn screen_mask(&self) -> Color {
        *self.inner.screen_mask.borrow()
    }

    pub fn set_screen_mask(&self, color: Color) {
        *self.inner.screen_mask.borrow_mut() = color;
    }

    pub(crate) fn screen_mask_target(&self) -> Rc<RefCell<Color>> {
        Rc::clone(&self.inner.screen_mask)
    }

    /// Id of the task drawing the screen mask
    pub fn mask_task(&self) -> TaskId {
        self.inner.mask_task.get()
    }
}
