//! Scenelet registry
//!
//! Maps instruction kind names to their callback sets. The timeline
//! interpreter is generic over whatever kinds are registered here.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{Result, SceneError};
use crate::instruction::SceneletDef;

#[derive(Default)]
pub struct SceneletRegistry {
    kinds: FxHashMap<String, Rc<SceneletDef>>,
}

impl SceneletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new kind; names are unique
    pub fn register(&mut self, name: &str, def: SceneletDef) -> Result<()> {
        if self.kinds.contains_key(name) {
            return Err(SceneError::DuplicateScenelet(name.to_owned()));
        }
        tracing::debug!(name, "scenelet registered");
        self.kinds.insert(name.to_owned(), Rc::new(def));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Rc<SceneletDef>> {
        self.kinds.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
