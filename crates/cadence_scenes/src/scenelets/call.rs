use std::rc::Rc;

use crate::args::{Arg, Args};
use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::scene::Scene;

pub(super) const NAME: &str = "call";

pub(super) fn def() -> SceneletDef {
    SceneletDef::new(|_, _, args| match args.call(0) {
        Some(f) => f(),
        None => tracing::warn!("call: first argument is not a function"),
    })
}

impl Scene {
    /// Invoke `f` when the timeline reaches this point
    pub fn call<F>(&self, f: F) -> Result<&Self>
    where
        F: Fn() + 'static,
    {
        self.op(NAME, Args::new().with(Arg::Call(Rc::new(f))))
    }
}
