//! Instruction arguments
//!
//! Arguments are captured when an instruction is enqueued and handed to the
//! scenelet's `start` callback when the program counter reaches it.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use cadence_animation::{Color, FieldMap, TweenTarget};
use smallvec::SmallVec;

/// A single captured argument
#[derive(Clone)]
pub enum Arg {
    Number(f64),
    Text(String),
    Bool(bool),
    Color(Color),
    /// Named numeric values, e.g. tween end values
    Fields(FieldMap),
    /// Shared object whose fields a tween rewrites
    Target(TweenTarget),
    /// Host function invoked by the instruction
    Call(Rc<dyn Fn()>),
    /// Anything else; recovered with [`Args::opaque`]
    Opaque(Rc<dyn Any>),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Number(value) => f.debug_tuple("Number").field(value).finish(),
            Arg::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Arg::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Arg::Color(value) => f.debug_tuple("Color").field(value).finish(),
            Arg::Fields(value) => f.debug_tuple("Fields").field(value).finish(),
            Arg::Target(_) => f.write_str("Target(..)"),
            Arg::Call(_) => f.write_str("Call(..)"),
            Arg::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Number(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Number(f64::from(value))
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Number(f64::from(value))
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<Color> for Arg {
    fn from(value: Color) -> Self {
        Arg::Color(value)
    }
}

impl From<FieldMap> for Arg {
    fn from(value: FieldMap) -> Self {
        Arg::Fields(value)
    }
}

impl From<TweenTarget> for Arg {
    fn from(value: TweenTarget) -> Self {
        Arg::Target(value)
    }
}

/// Arguments captured by one instruction
#[derive(Clone, Debug, Default)]
pub struct Args(SmallVec<[Arg; 4]>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, arg: impl Into<Arg>) -> Self {
        self.0.push(arg.into());
        self
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.0.push(arg.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.0.iter()
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        match self.get(index)? {
            Arg::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.get(index)? {
            Arg::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn bool(&self, index: usize) -> Option<bool> {
        match self.get(index)? {
            Arg::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn color(&self, index: usize) -> Option<Color> {
        match self.get(index)? {
            Arg::Color(value) => Some(*value),
            _ => None,
        }
    }

    pub fn fields(&self, index: usize) -> Option<&FieldMap> {
        match self.get(index)? {
            Arg::Fields(value) => Some(value),
            _ => None,
        }
    }

    pub fn target(&self, index: usize) -> Option<TweenTarget> {
        match self.get(index)? {
            Arg::Target(value) => Some(Rc::clone(value)),
            _ => None,
        }
    }

    pub fn call(&self, index: usize) -> Option<Rc<dyn Fn()>> {
        match self.get(index)? {
            Arg::Call(value) => Some(Rc::clone(value)),
            _ => None,
        }
    }

    /// Recover an opaque argument of a known type
    pub fn opaque<T: 'static>(&self, index: usize) -> Option<Rc<T>> {
        match self.get(index)? {
            Arg::Opaque(value) => Rc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build [`Args`] from values convertible into [`Arg`]
///
/// ```ignore
/// scene.op("pause", args![0.5])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Args::new()$(.with($arg))+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_typed_accessors() {
        let args = Args::new()
            .with(1.5)
            .with("easeInQuad")
            .with(true)
            .with(Color::WHITE);

        assert_eq!(args.len(), 4);
        assert_eq!(args.number(0), Some(1.5));
        assert_eq!(args.text(1), Some("easeInQuad"));
        assert_eq!(args.bool(2), Some(true));
        assert_eq!(args.color(3), Some(Color::WHITE));
        assert_eq!(args.number(1), None);
        assert_eq!(args.number(9), None);
    }

    #[test]
    fn test_target_and_opaque() {
        let target: TweenTarget = Rc::new(RefCell::new(FieldMap::new().with("x", 1.0)));
        let mut args = Args::new().with(target);
        args.push(Arg::Opaque(Rc::new(7u32)));

        assert!(args.target(0).is_some());
        assert_eq!(args.opaque::<u32>(1).as_deref(), Some(&7));
        assert!(args.opaque::<String>(1).is_none());
    }

    #[test]
    fn test_args_macro() {
        let args = crate::args![2.0, "fade"];
        assert_eq!(args.number(0), Some(2.0));
        assert_eq!(args.text(1), Some("fade"));
        assert!(crate::args![].is_empty());
    }
}
